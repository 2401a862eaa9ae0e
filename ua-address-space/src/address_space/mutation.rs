//! The mutation orchestrators: the two-phase node adder, the node deleter
//! and the reference manager.
//!
//! Everything here assumes the caller already holds the writer side of the
//! address space lock; the public locking surface is
//! [`AddressSpaceManager`](crate::AddressSpaceManager).

use log::debug;
use ua_nodes::{new_node_from_attributes, HasNodeId, NodeType, ReferenceDirection, TypeTree};
use ua_types::{
    AddNodesItem, AddNodesResult, AddReferencesItem, DeleteReferencesItem, NodeClass, NodeId,
    ObjectTypeId, StatusCode, VariableTypeId,
};

use super::instantiate::{instantiate_node, InstantiationHook};
use super::type_check::type_check_node;
use super::validation::check_parent_reference;
use super::AddressSpace;

impl AddressSpace {
    /// First phase of adding a node: validate the namespace index and
    /// insert into the store, assigning a numeric id when the requested id
    /// is a placeholder. The returned id identifies the pending node for
    /// [`AddressSpace::add_node_finish`].
    ///
    /// On failure the node is dropped and the store is untouched.
    pub fn add_node_begin(&mut self, node: NodeType) -> Result<NodeId, StatusCode> {
        let namespace = node.node_id().namespace;
        if namespace as usize >= self.namespaces().len() {
            return Err(StatusCode::BadNodeIdInvalid);
        }
        self.insert_node(node)
    }

    /// Second phase of adding a node: validate the parent reference, run
    /// the type checks, instantiate type-mandated children, and link the
    /// node under its parent.
    ///
    /// `parent` is `(parent id, reference type id)`; only Objects may omit
    /// it. A missing `type_definition` defaults to BaseObjectType for
    /// Objects and BaseDataVariableType for Variables.
    ///
    /// Any failure deletes the pending node again: a failed add leaves no
    /// trace.
    pub fn add_node_finish(
        &mut self,
        node_id: &NodeId,
        parent: Option<(NodeId, NodeId)>,
        type_definition: Option<&NodeId>,
        hook: Option<InstantiationHook>,
    ) -> Result<(), StatusCode> {
        if let Err(status) = self.add_node_finish_inner(node_id, &parent, type_definition, hook) {
            debug!("Adding node {} failed with {}, removing it again", node_id, status);
            let _ = self.delete_node(node_id, true);
            return Err(status);
        }
        Ok(())
    }

    fn add_node_finish_inner(
        &mut self,
        node_id: &NodeId,
        parent: &Option<(NodeId, NodeId)>,
        type_definition: Option<&NodeId>,
        hook: Option<InstantiationHook>,
    ) -> Result<(), StatusCode> {
        let node_class = self
            .find(node_id)
            .map(|n| n.node_class())
            .ok_or(StatusCode::BadNodeIdUnknown)?;

        match parent {
            Some((parent_id, reference_type_id)) => {
                check_parent_reference(self, node_class, parent_id, reference_type_id)?;
            }
            None => {
                // Only objects may dangle without a parent.
                if node_class != NodeClass::Object {
                    return Err(StatusCode::BadParentNodeIdInvalid);
                }
            }
        }

        let default_type_definition: Option<NodeId> = match (node_class, type_definition) {
            (NodeClass::Object, None) => Some(ObjectTypeId::BaseObjectType.into()),
            (NodeClass::Variable, None) => Some(VariableTypeId::BaseDataVariableType.into()),
            _ => type_definition.cloned(),
        };

        type_check_node(
            self,
            node_id,
            node_class,
            default_type_definition.as_ref(),
            parent.as_ref().map(|(p, _)| p),
        )?;

        if let Some(type_definition) = &default_type_definition {
            instantiate_node(self, node_id, node_class, type_definition, hook)?;
        }

        if let Some((parent_id, reference_type_id)) = parent {
            self.references_mut()
                .try_insert_reference(parent_id, node_id, reference_type_id)?;
        }

        Ok(())
    }

    /// Add a node in a single step. See [`AddressSpace::add_node_begin`]
    /// and [`AddressSpace::add_node_finish`].
    pub fn add_node(
        &mut self,
        node: impl Into<NodeType>,
        parent: Option<(&NodeId, &NodeId)>,
        type_definition: Option<&NodeId>,
    ) -> Result<NodeId, StatusCode> {
        let node_id = self.add_node_begin(node.into())?;
        let parent = parent.map(|(p, r)| (p.clone(), r.clone()));
        self.add_node_finish(&node_id, parent, type_definition, None)?;
        Ok(node_id)
    }

    /// Process one item of an `AddNodes` request.
    pub fn add_node_item(&mut self, item: &AddNodesItem) -> AddNodesResult {
        match self.add_node_item_inner(item) {
            Ok(node_id) => AddNodesResult {
                status_code: StatusCode::Good,
                added_node_id: node_id,
            },
            Err(status) => AddNodesResult::error(status),
        }
    }

    fn add_node_item_inner(&mut self, item: &AddNodesItem) -> Result<NodeId, StatusCode> {
        if item.node_class == NodeClass::Unspecified {
            return Err(StatusCode::BadNodeClassInvalid);
        }
        if item.browse_name.is_null() {
            return Err(StatusCode::BadBrowseNameInvalid);
        }
        // Expanded ids referring to other servers have no meaning here.
        if !item.requested_new_node_id.is_local() {
            return Err(StatusCode::BadNodeIdInvalid);
        }
        if !item.parent_node_id.is_local() {
            return Err(StatusCode::BadParentNodeIdInvalid);
        }
        if !item.type_definition.is_local() {
            return Err(StatusCode::BadTypeDefinitionInvalid);
        }

        let node = new_node_from_attributes(
            &item.requested_new_node_id.node_id,
            &item.browse_name,
            item.node_class,
            item.node_attributes.clone(),
        )
        .map_err(|_| StatusCode::BadNodeAttributesInvalid)?;

        let node_id = self.add_node_begin(node)?;
        let parent = if item.parent_node_id.is_null() && item.reference_type_id.is_null() {
            None
        } else {
            Some((
                item.parent_node_id.node_id.clone(),
                item.reference_type_id.clone(),
            ))
        };
        let type_definition = if item.type_definition.is_null() {
            None
        } else {
            Some(item.type_definition.node_id.clone())
        };
        self.add_node_finish(&node_id, parent, type_definition.as_ref(), None)?;
        Ok(node_id)
    }

    /// Delete a node: run the destructors of its type chain for Objects,
    /// optionally tear down the references other nodes hold to it, and
    /// remove it from the store.
    ///
    /// With `delete_target_references` unset, the node's own reference
    /// entries disappear with it but entries on its peers stay behind.
    pub fn delete_node(
        &mut self,
        node_id: &NodeId,
        delete_target_references: bool,
    ) -> Result<(), StatusCode> {
        let Some(node) = self.find(node_id) else {
            return Err(StatusCode::BadNodeIdUnknown);
        };

        if matches!(node, NodeType::Object(_)) {
            if let Some(type_definition) = self.type_definition_of(node_id) {
                let chain = self.supertype_chain(&type_definition)?;
                let handle = match self.find_mut(node_id) {
                    Some(NodeType::Object(object)) => object.take_instance_handle(),
                    _ => None,
                };
                // Destructors fire most-derived first, all with the same
                // handle.
                for type_id in &chain {
                    let destructor = match self.find(type_id) {
                        Some(NodeType::ObjectType(t)) => {
                            t.lifecycle().and_then(|l| l.destructor.clone())
                        }
                        _ => None,
                    };
                    if let Some(destructor) = destructor {
                        destructor(node_id, handle.as_ref());
                    }
                }
            }
        }

        self.references_mut()
            .delete_node_references(node_id, delete_target_references);
        let _ = self.take_node(node_id)?;
        Ok(())
    }

    /// Process one item of an `AddReferences` request. The forward and
    /// inverse entries are committed together or not at all.
    pub fn add_reference_item(&mut self, item: &AddReferencesItem) -> Result<(), StatusCode> {
        if !item.target_server_uri.is_empty() {
            return Err(StatusCode::BadNotImplemented);
        }
        if !item.target_node_id.is_local() {
            return Err(StatusCode::BadNotImplemented);
        }
        let Some(NodeType::ReferenceType(_)) = self.find(&item.reference_type_id) else {
            return Err(StatusCode::BadReferenceTypeIdInvalid);
        };
        if !self.node_exists(&item.source_node_id) {
            return Err(StatusCode::BadSourceNodeIdInvalid);
        }
        let target_id = &item.target_node_id.node_id;
        let Some(target) = self.find(target_id) else {
            return Err(StatusCode::BadTargetNodeIdInvalid);
        };
        if item.target_node_class != NodeClass::Unspecified
            && target.node_class() != item.target_node_class
        {
            return Err(StatusCode::BadNodeClassInvalid);
        }

        let (source, target) = if item.is_forward {
            (&item.source_node_id, target_id)
        } else {
            (target_id, &item.source_node_id)
        };
        self.references_mut()
            .try_insert_reference(source, target, &item.reference_type_id)
    }

    /// Process one item of a `DeleteReferences` request. Removal of the
    /// entry on the source side is authoritative; a missing inverse entry
    /// is surfaced as uncertain but nothing is rolled back.
    pub fn delete_reference_item(&mut self, item: &DeleteReferencesItem) -> StatusCode {
        let direction = if item.is_forward {
            ReferenceDirection::Forward
        } else {
            ReferenceDirection::Inverse
        };
        let target_id = &item.target_node_id.node_id;

        let found = self.references_mut().delete_half(
            &item.source_node_id,
            target_id,
            &item.reference_type_id,
            direction,
        );
        if !found {
            return StatusCode::UncertainReferenceNotDeleted;
        }

        if item.delete_bidirectional && item.target_node_id.server_index == 0 {
            let found_inverse = self.references_mut().delete_half(
                target_id,
                &item.source_node_id,
                &item.reference_type_id,
                direction.opposite(),
            );
            if !found_inverse {
                return StatusCode::UncertainReferenceNotDeleted;
            }
        }

        StatusCode::Good
    }

    /// Check that `reference_type_id` names a concrete hierarchical
    /// reference type usable between instances. Exposed for embedders that
    /// validate references before batching them.
    pub fn is_hierarchical_reference(&self, reference_type_id: &NodeId) -> bool {
        self.is_subtype_of(
            reference_type_id,
            &ua_types::ReferenceTypeId::HierarchicalReferences.into(),
        )
    }
}
