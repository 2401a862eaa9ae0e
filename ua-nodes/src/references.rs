use hashbrown::{Equivalent, HashMap, HashSet};
use ua_types::{BrowseDirection, NodeId, StatusCode};

use crate::ReferenceDirection;

/// Trait for types that can answer reference type and data type subtype
/// queries. Implemented by the address space itself.
pub trait TypeTree {
    /// Return `true` if `child` is `ancestor` or a transitive subtype of it.
    fn is_subtype_of(&self, child: &NodeId, ancestor: &NodeId) -> bool;
}

#[derive(PartialEq, Eq, Clone, Debug, Hash)]
/// Owned OPC-UA reference.
pub struct Reference {
    /// Reference type ID.
    pub reference_type: NodeId,
    /// Target node ID.
    pub target_node: NodeId,
}

// Note, must have same hash and eq implementation as Reference.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
struct ReferenceKey<'a> {
    pub reference_type: &'a NodeId,
    pub target_node: &'a NodeId,
}

impl Equivalent<Reference> for ReferenceKey<'_> {
    fn equivalent(&self, key: &Reference) -> bool {
        &key.reference_type == self.reference_type && &key.target_node == self.target_node
    }
}

#[derive(PartialEq, Eq, Clone, Debug, Hash)]
/// A borrowed version of an OPC-UA reference.
pub struct ReferenceRef<'a> {
    /// Reference type ID.
    pub reference_type: &'a NodeId,
    /// Target node ID.
    pub target_node: &'a NodeId,
    /// Reference direction.
    pub direction: ReferenceDirection,
}

// There is a significant benefit to using hashbrown directly here (which is
// what the std HashMap is built on), since it lets us look up references
// in the hash sets without cloning node IDs.
#[derive(Debug, Default)]
/// Structure for storing and accessing OPC-UA references.
///
/// Every reference is stored twice, under its source and under its target,
/// so both browse directions are a single lookup. The two entries are
/// inserted and removed together, except through [`References::delete_half`]
/// which peels off a single direction.
pub struct References {
    /// References by source node ID.
    by_source: HashMap<NodeId, HashSet<Reference>>,
    /// References by target node ID.
    by_target: HashMap<NodeId, HashSet<Reference>>,
}

impl References {
    /// Create a new empty reference store.
    pub fn new() -> Self {
        Self {
            by_source: HashMap::new(),
            by_target: HashMap::new(),
        }
    }

    /// Insert a list of references.
    pub fn insert<'a, S>(
        &mut self,
        source: &NodeId,
        references: &'a [(&'a NodeId, &S, ReferenceDirection)],
    ) where
        S: Into<NodeId> + Clone,
    {
        for (target, typ, direction) in references {
            let typ: NodeId = (*typ).clone().into();
            match direction {
                ReferenceDirection::Forward => self.insert_reference(source, target, typ),
                ReferenceDirection::Inverse => self.insert_reference(target, source, typ),
            }
        }
    }

    /// Insert a new reference. Inserting a reference that already exists is
    /// a no-op. Panics on a self reference, this entry point is for address
    /// space construction where that is always a programming error.
    pub fn insert_reference(
        &mut self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
    ) {
        if source_node == target_node {
            panic!(
                "Node id from == node id to {}, self reference is not allowed",
                source_node
            );
        }
        let _ = self.try_insert_reference(source_node, target_node, reference_type);
    }

    /// Insert a new reference, storing the forward entry under the source
    /// and the inverse entry under the target. The pair is inserted
    /// atomically: on error nothing is changed.
    pub fn try_insert_reference(
        &mut self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
    ) -> Result<(), StatusCode> {
        if source_node == target_node {
            return Err(StatusCode::BadInvalidSelfReference);
        }

        let forward_refs = match self.by_source.get_mut(source_node) {
            Some(r) => r,
            None => self.by_source.entry(source_node.clone()).or_default(),
        };

        let reference_type = reference_type.into();

        if !forward_refs.insert(Reference {
            reference_type: reference_type.clone(),
            target_node: target_node.clone(),
        }) {
            // The reference is already added, the inverse is in place too.
            return Err(StatusCode::BadDuplicateReferenceNotAllowed);
        }

        let inverse_refs = match self.by_target.get_mut(target_node) {
            Some(r) => r,
            None => self.by_target.entry(target_node.clone()).or_default(),
        };

        inverse_refs.insert(Reference {
            reference_type,
            target_node: source_node.clone(),
        });

        Ok(())
    }

    /// Insert a list of references (source, target, reference type)
    pub fn insert_references<'a>(
        &mut self,
        references: impl Iterator<Item = (&'a NodeId, &'a NodeId, impl Into<NodeId>)>,
    ) {
        for (source, target, typ) in references {
            self.insert_reference(source, target, typ);
        }
    }

    /// Delete both entries of a reference, given in forward orientation.
    ///
    /// Returns whether any entry was found.
    pub fn delete_reference(
        &mut self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
    ) -> bool {
        let reference_type = reference_type.into();
        let found = self.delete_half(
            source_node,
            target_node,
            &reference_type,
            ReferenceDirection::Forward,
        );
        self.delete_half(
            target_node,
            source_node,
            &reference_type,
            ReferenceDirection::Inverse,
        ) || found
    }

    /// Delete the single entry of a reference as seen from `node`:
    /// the forward entry when `direction` is forward, the inverse entry
    /// when it is inverse. The matching entry on the peer is left alone.
    ///
    /// Returns whether the entry was found.
    pub fn delete_half(
        &mut self,
        node: &NodeId,
        peer: &NodeId,
        reference_type: &NodeId,
        direction: ReferenceDirection,
    ) -> bool {
        let map = match direction {
            ReferenceDirection::Forward => &mut self.by_source,
            ReferenceDirection::Inverse => &mut self.by_target,
        };
        let Some(refs) = map.get_mut(node) else {
            return false;
        };
        let found = refs.remove(&ReferenceKey {
            reference_type,
            target_node: peer,
        });
        if refs.is_empty() {
            map.remove(node);
        }
        found
    }

    /// Delete references from the given node.
    /// Optionally deleting references _to_ the given node.
    ///
    /// Returns whether any references were found.
    pub fn delete_node_references(
        &mut self,
        source_node: &NodeId,
        delete_target_references: bool,
    ) -> bool {
        let mut found = false;
        let source = self.by_source.remove(source_node);
        found |= source.is_some();
        if delete_target_references {
            for rf in source.into_iter().flatten() {
                if let Some(rec) = self.by_target.get_mut(&rf.target_node) {
                    rec.remove(&ReferenceKey {
                        reference_type: &rf.reference_type,
                        target_node: source_node,
                    });
                }
            }
        }

        let target = self.by_target.remove(source_node);
        found |= target.is_some();

        if delete_target_references {
            for rf in target.into_iter().flatten() {
                if let Some(rec) = self.by_source.get_mut(&rf.target_node) {
                    rec.remove(&ReferenceKey {
                        reference_type: &rf.reference_type,
                        target_node: source_node,
                    });
                }
            }
        }

        found
    }

    /// Return `true` if the given forward reference exists.
    pub fn has_reference(
        &self,
        source_node: &NodeId,
        target_node: &NodeId,
        reference_type: impl Into<NodeId>,
    ) -> bool {
        let reference_type = reference_type.into();
        self.by_source
            .get(source_node)
            .map(|n| {
                n.contains(&ReferenceKey {
                    reference_type: &reference_type,
                    target_node,
                })
            })
            .unwrap_or_default()
    }

    /// Return an iterator over references matching the given filters. When
    /// the filter asks for subtypes, `type_tree` answers the subtype
    /// queries.
    pub fn find_references<'a: 'b, 'b>(
        &'a self,
        source_node: &'b NodeId,
        filter: Option<(impl Into<NodeId>, bool)>,
        type_tree: &'b dyn TypeTree,
        direction: BrowseDirection,
    ) -> impl Iterator<Item = ReferenceRef<'a>> + 'b {
        ReferenceIterator::new(
            source_node,
            direction,
            self,
            filter.map(|f| (f.0.into(), f.1)),
            type_tree,
        )
    }
}

// Handy feature to let us easily return a concrete type from `find_references`.
struct ReferenceIterator<'a, 'b> {
    filter: Option<(NodeId, bool)>,
    type_tree: &'b dyn TypeTree,
    iter_s: Option<hashbrown::hash_set::Iter<'a, Reference>>,
    iter_t: Option<hashbrown::hash_set::Iter<'a, Reference>>,
}

impl<'a> Iterator for ReferenceIterator<'a, '_> {
    type Item = ReferenceRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let inner = self.next_inner()?;

            if let Some(filter) = &self.filter {
                if !filter.1 && inner.reference_type != &filter.0
                    || filter.1
                        && !self
                            .type_tree
                            .is_subtype_of(inner.reference_type, &filter.0)
                {
                    continue;
                }
            }

            break Some(inner);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let mut lower = 0;
        let mut upper = None;
        if let Some(iter_s) = &self.iter_s {
            let (lower_i, upper_i) = iter_s.size_hint();
            lower = lower_i;
            upper = upper_i;
        }

        if let Some(iter_t) = &self.iter_t {
            let (lower_i, upper_i) = iter_t.size_hint();
            lower += lower_i;
            upper = match (upper, upper_i) {
                (Some(l), Some(r)) => Some(l + r),
                _ => None,
            }
        }

        (lower, upper)
    }
}

impl<'a, 'b> ReferenceIterator<'a, 'b> {
    pub fn new(
        source_node: &'b NodeId,
        direction: BrowseDirection,
        references: &'a References,
        filter: Option<(NodeId, bool)>,
        type_tree: &'b dyn TypeTree,
    ) -> Self {
        Self {
            filter,
            type_tree,
            iter_s: matches!(direction, BrowseDirection::Both | BrowseDirection::Forward)
                .then(|| references.by_source.get(source_node))
                .flatten()
                .map(|r| r.iter()),
            iter_t: matches!(direction, BrowseDirection::Both | BrowseDirection::Inverse)
                .then(|| references.by_target.get(source_node))
                .flatten()
                .map(|r| r.iter()),
        }
    }

    fn next_inner(&mut self) -> Option<ReferenceRef<'a>> {
        if let Some(iter_s) = &mut self.iter_s {
            match iter_s.next() {
                Some(r) => {
                    return Some(ReferenceRef {
                        reference_type: &r.reference_type,
                        target_node: &r.target_node,
                        direction: ReferenceDirection::Forward,
                    })
                }
                None => self.iter_s = None,
            }
        }

        if let Some(iter_t) = &mut self.iter_t {
            match iter_t.next() {
                Some(r) => {
                    return Some(ReferenceRef {
                        reference_type: &r.reference_type,
                        target_node: &r.target_node,
                        direction: ReferenceDirection::Inverse,
                    })
                }
                None => self.iter_t = None,
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::{References, TypeTree};
    use crate::ReferenceDirection;
    use ua_types::{BrowseDirection, NodeId, ReferenceTypeId, StatusCode};

    struct NoSubtypes;

    impl TypeTree for NoSubtypes {
        fn is_subtype_of(&self, child: &NodeId, ancestor: &NodeId) -> bool {
            child == ancestor
        }
    }

    fn n(v: u32) -> NodeId {
        NodeId::new(1, v)
    }

    #[test]
    fn insert_creates_both_directions() {
        let mut refs = References::new();
        refs.try_insert_reference(&n(1), &n(2), ReferenceTypeId::HasComponent)
            .unwrap();

        let fwd: Vec<_> = refs
            .find_references(
                &n(1),
                None::<(NodeId, bool)>,
                &NoSubtypes,
                BrowseDirection::Forward,
            )
            .collect();
        assert_eq!(fwd.len(), 1);
        assert_eq!(fwd[0].target_node, &n(2));
        assert_eq!(fwd[0].direction, ReferenceDirection::Forward);

        let inv: Vec<_> = refs
            .find_references(
                &n(2),
                None::<(NodeId, bool)>,
                &NoSubtypes,
                BrowseDirection::Inverse,
            )
            .collect();
        assert_eq!(inv.len(), 1);
        assert_eq!(inv[0].target_node, &n(1));
        assert_eq!(inv[0].direction, ReferenceDirection::Inverse);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut refs = References::new();
        refs.try_insert_reference(&n(1), &n(2), ReferenceTypeId::HasComponent)
            .unwrap();
        assert_eq!(
            refs.try_insert_reference(&n(1), &n(2), ReferenceTypeId::HasComponent),
            Err(StatusCode::BadDuplicateReferenceNotAllowed)
        );
        // A reference of a different type between the same pair is fine.
        refs.try_insert_reference(&n(1), &n(2), ReferenceTypeId::Organizes)
            .unwrap();
    }

    #[test]
    fn self_reference_is_rejected() {
        let mut refs = References::new();
        assert_eq!(
            refs.try_insert_reference(&n(1), &n(1), ReferenceTypeId::HasComponent),
            Err(StatusCode::BadInvalidSelfReference)
        );
    }

    #[test]
    fn delete_half_leaves_peer_entry() {
        let mut refs = References::new();
        refs.try_insert_reference(&n(1), &n(2), ReferenceTypeId::HasComponent)
            .unwrap();
        let typ: NodeId = ReferenceTypeId::HasComponent.into();
        assert!(refs.delete_half(&n(1), &n(2), &typ, ReferenceDirection::Forward));

        assert!(!refs.has_reference(&n(1), &n(2), ReferenceTypeId::HasComponent));
        let inv: Vec<_> = refs
            .find_references(
                &n(2),
                None::<(NodeId, bool)>,
                &NoSubtypes,
                BrowseDirection::Inverse,
            )
            .collect();
        assert_eq!(inv.len(), 1);
    }

    #[test]
    fn delete_node_references_removes_remote_entries() {
        let mut refs = References::new();
        refs.try_insert_reference(&n(1), &n(2), ReferenceTypeId::HasComponent)
            .unwrap();
        refs.try_insert_reference(&n(3), &n(1), ReferenceTypeId::Organizes)
            .unwrap();
        assert!(refs.delete_node_references(&n(1), true));

        assert!(refs
            .find_references(
                &n(2),
                None::<(NodeId, bool)>,
                &NoSubtypes,
                BrowseDirection::Both,
            )
            .next()
            .is_none());
        assert!(refs
            .find_references(
                &n(3),
                None::<(NodeId, bool)>,
                &NoSubtypes,
                BrowseDirection::Both,
            )
            .next()
            .is_none());
    }
}
