//! Implementation of [AddressSpace], an in-memory mutable OPC-UA address space.

mod core_namespace;
mod instantiate;
mod mutation;
mod type_check;
mod validation;

pub use instantiate::InstantiationHook;
pub use type_check::{
    compatible_array_dimensions, compatible_value_rank_array_dimensions, compatible_value_ranks,
};
#[cfg(test)]
pub(crate) use type_check::type_check_variable;

use hashbrown::{HashMap, HashSet};
use ua_nodes::{
    HasNodeId, NodeBase, NodeInsertTarget, NodeType, ReferenceDirection, ReferenceRef, References,
    TypeTree,
};
use ua_types::{BrowseDirection, NodeClass, NodeId, QualifiedName, ReferenceTypeId, StatusCode};

/// First numeric identifier handed out when a node is inserted with a
/// placeholder id. Picked clear of the identifiers used by nodeset files.
const FIRST_ASSIGNED_ID: u32 = 1_000_000;

/// Upper bound on the number of types visited when walking a type
/// hierarchy. A well formed address space stays far below this.
const MAX_TYPE_TREE_NODES: usize = 1024;

/// The in-memory node store: an owned map of nodes keyed by node id, plus
/// the bidirectional reference store between them.
///
/// This type exposes the *internal*, non-locking mutation surface. The
/// public service surface lives on
/// [`AddressSpaceManager`](crate::AddressSpaceManager), which wraps an
/// address space in a writer lock.
#[derive(Debug)]
pub struct AddressSpace {
    node_map: HashMap<NodeId, NodeType>,
    references: References,
    namespaces: Vec<String>,
    next_assigned_id: u32,
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace {
    /// Create an address space holding the minimal namespace zero skeleton:
    /// the well-known reference types, base data types, base object and
    /// variable types, and the folder hierarchy.
    pub fn new() -> AddressSpace {
        let mut space = Self::new_empty();
        core_namespace::populate(&mut space);
        space
    }

    /// Create an address space with no nodes at all. Only useful for tests
    /// and for embedders that import a complete nodeset themselves.
    pub fn new_empty() -> AddressSpace {
        AddressSpace {
            node_map: HashMap::new(),
            references: References::new(),
            namespaces: vec!["http://opcfoundation.org/UA/".to_owned()],
            next_assigned_id: FIRST_ASSIGNED_ID,
        }
    }

    /// Register a namespace URI, returning its index. Registering the same
    /// URI twice returns the existing index.
    pub fn add_namespace(&mut self, namespace: &str) -> u16 {
        if let Some(idx) = self.namespace_index(namespace) {
            return idx;
        }
        self.namespaces.push(namespace.to_owned());
        (self.namespaces.len() - 1) as u16
    }

    /// The index of a registered namespace URI.
    pub fn namespace_index(&self, namespace: &str) -> Option<u16> {
        self.namespaces
            .iter()
            .position(|ns| ns == namespace)
            .map(|v| v as u16)
    }

    /// The registered namespace URIs, position is the namespace index.
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Insert a node, taking ownership. A node id with a numeric identifier
    /// of 0 is replaced by a freshly assigned numeric id in the node's
    /// namespace.
    pub fn insert_node(&mut self, mut node: NodeType) -> Result<NodeId, StatusCode> {
        let mut id = node.node_id().clone();
        if id.is_placeholder() {
            id = self.assign_node_id(id.namespace);
            node.set_node_id(id.clone());
        } else if self.node_map.contains_key(&id) {
            return Err(StatusCode::BadNodeIdExists);
        }
        self.node_map.insert(id.clone(), node);
        Ok(id)
    }

    fn assign_node_id(&mut self, namespace: u16) -> NodeId {
        loop {
            let candidate = NodeId::new(namespace, self.next_assigned_id);
            self.next_assigned_id += 1;
            if !self.node_map.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// Find a node by id. The borrow is valid until the next mutation of
    /// the store.
    pub fn find(&self, node_id: &NodeId) -> Option<&NodeType> {
        self.node_map.get(node_id)
    }

    /// Find a node by id for mutation.
    pub fn find_mut(&mut self, node_id: &NodeId) -> Option<&mut NodeType> {
        self.node_map.get_mut(node_id)
    }

    /// Whether a node with the given id exists.
    pub fn node_exists(&self, node_id: &NodeId) -> bool {
        self.node_map.contains_key(node_id)
    }

    /// Deep copy of a node, owned by the caller. Lifecycle handles stay
    /// with the original.
    pub fn clone_node(&self, node_id: &NodeId) -> Option<NodeType> {
        self.node_map.get(node_id).cloned()
    }

    /// Remove a node from the store and return it. References are not
    /// touched; use [`AddressSpace::delete_node`] for a full teardown.
    pub fn take_node(&mut self, node_id: &NodeId) -> Result<NodeType, StatusCode> {
        self.node_map
            .remove(node_id)
            .ok_or(StatusCode::BadNodeIdUnknown)
    }

    /// The reference store.
    pub fn references(&self) -> &References {
        &self.references
    }

    /// The reference store, for mutation.
    pub fn references_mut(&mut self) -> &mut References {
        &mut self.references
    }

    /// Whether the given forward reference exists.
    pub fn has_reference(
        &self,
        source: &NodeId,
        target: &NodeId,
        reference_type: impl Into<NodeId>,
    ) -> bool {
        self.references.has_reference(source, target, reference_type)
    }

    /// Iterate the references of `node_id`, optionally filtered on a
    /// reference type (and, with the flag set, its subtypes).
    pub fn find_references<'a: 'b, 'b>(
        &'a self,
        node_id: &'b NodeId,
        filter: Option<(impl Into<NodeId>, bool)>,
        direction: BrowseDirection,
    ) -> impl Iterator<Item = ReferenceRef<'a>> + 'b {
        self.references.find_references(node_id, filter, self, direction)
    }

    /// The target of the node's HasTypeDefinition reference, if any.
    pub fn type_definition_of(&self, node_id: &NodeId) -> Option<NodeId> {
        self.find_references(
            node_id,
            Some((ReferenceTypeId::HasTypeDefinition, false)),
            BrowseDirection::Forward,
        )
        .next()
        .map(|r| r.target_node.clone())
    }

    /// Find the aggregated child of `node_id` carrying `browse_name`.
    /// Aggregation includes all subtypes of the Aggregates reference.
    pub fn find_aggregate_by_browse_name(
        &self,
        node_id: &NodeId,
        browse_name: &QualifiedName,
    ) -> Option<NodeId> {
        let mut it = self.find_references(
            node_id,
            Some((ReferenceTypeId::Aggregates, true)),
            BrowseDirection::Forward,
        );
        it.find(|r| {
            self.find(r.target_node)
                .map(|n| n.as_node().browse_name() == browse_name)
                .unwrap_or(false)
        })
        .map(|r| r.target_node.clone())
    }

    /// The sequence `[start, super, super², …]` produced by following
    /// inverse HasSubtype edges to a fixed point. A node encountered twice
    /// means the subtype graph is malformed and yields `BadInternalError`.
    pub fn supertype_chain(&self, start: &NodeId) -> Result<Vec<NodeId>, StatusCode> {
        let mut chain = vec![start.clone()];
        let mut seen: HashSet<NodeId> = HashSet::new();
        seen.insert(start.clone());
        let mut i = 0;
        while i < chain.len() {
            if chain.len() > MAX_TYPE_TREE_NODES {
                return Err(StatusCode::BadInternalError);
            }
            let supers: Vec<NodeId> = self
                .find_references(
                    &chain[i],
                    Some((ReferenceTypeId::HasSubtype, false)),
                    BrowseDirection::Inverse,
                )
                .map(|r| r.target_node.clone())
                .collect();
            for s in supers {
                if !seen.insert(s.clone()) {
                    return Err(StatusCode::BadInternalError);
                }
                chain.push(s);
            }
            i += 1;
        }
        Ok(chain)
    }

    /// Return `true` iff `root` is reachable from `start` by walking
    /// inverse edges whose reference type is a subtype of one of
    /// `allowed_ref_types`. This backs both data type subtyping and
    /// reference type hierarchy checks.
    pub fn is_node_in_tree(
        &self,
        start: &NodeId,
        root: &NodeId,
        allowed_ref_types: &[NodeId],
    ) -> bool {
        if start == root {
            return true;
        }
        let mut seen: HashSet<NodeId> = HashSet::new();
        seen.insert(start.clone());
        let mut stack = vec![start.clone()];
        while let Some(id) = stack.pop() {
            if seen.len() > MAX_TYPE_TREE_NODES {
                return false;
            }
            let parents: Vec<NodeId> = self
                .find_references(&id, None::<(NodeId, bool)>, BrowseDirection::Inverse)
                .filter(|r| {
                    allowed_ref_types
                        .iter()
                        .any(|allowed| self.is_subtype_of(r.reference_type, allowed))
                })
                .map(|r| r.target_node.clone())
                .collect();
            for p in parents {
                if &p == root {
                    return true;
                }
                if seen.insert(p.clone()) {
                    stack.push(p);
                }
            }
        }
        false
    }
}

impl TypeTree for AddressSpace {
    /// Walk inverse HasSubtype edges from `child` looking for `ancestor`.
    fn is_subtype_of(&self, child: &NodeId, ancestor: &NodeId) -> bool {
        if child == ancestor {
            return true;
        }
        let mut seen: HashSet<NodeId> = HashSet::new();
        seen.insert(child.clone());
        let mut stack = vec![child.clone()];
        while let Some(id) = stack.pop() {
            if seen.len() > MAX_TYPE_TREE_NODES {
                return false;
            }
            let supers: Vec<NodeId> = self
                .references
                .find_references(
                    &id,
                    Some((ReferenceTypeId::HasSubtype, false)),
                    self,
                    BrowseDirection::Inverse,
                )
                .map(|r| r.target_node.clone())
                .collect();
            for s in supers {
                if &s == ancestor {
                    return true;
                }
                if seen.insert(s.clone()) {
                    stack.push(s);
                }
            }
        }
        false
    }
}

impl NodeInsertTarget for AddressSpace {
    /// Insert a node with a concrete node id, plus any references. Used by
    /// the node builders; returns false if the id is already taken.
    fn insert<'a>(
        &mut self,
        node: impl Into<NodeType>,
        references: Option<&'a [(&'a NodeId, &NodeId, ReferenceDirection)]>,
    ) -> bool {
        let node = node.into();
        let id = node.node_id().clone();
        if self.node_map.contains_key(&id) {
            return false;
        }
        self.node_map.insert(id.clone(), node);
        if let Some(references) = references {
            self.references.insert(&id, references);
        }
        true
    }
}

pub(crate) fn is_instance_class(class: NodeClass) -> bool {
    matches!(
        class,
        NodeClass::Object | NodeClass::Variable | NodeClass::Method
    )
}
