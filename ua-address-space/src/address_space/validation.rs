//! Validation of the parent reference supplied with a new node.

use ua_nodes::{NodeType, TypeTree};
use ua_types::{NodeClass, NodeId, ReferenceTypeId, StatusCode};

use super::AddressSpace;

/// Validate that a new node of `node_class` may hang off `parent_id` through
/// a reference of `reference_type_id`.
///
/// Type nodes must be attached to a parent of the same class through
/// HasSubtype. Instance nodes need a concrete hierarchical reference.
/// Orphan objects bypass this check entirely (see the node adder).
pub(crate) fn check_parent_reference(
    space: &AddressSpace,
    node_class: NodeClass,
    parent_id: &NodeId,
    reference_type_id: &NodeId,
) -> Result<(), StatusCode> {
    let Some(parent) = space.find(parent_id) else {
        return Err(StatusCode::BadParentNodeIdInvalid);
    };

    let Some(NodeType::ReferenceType(reference_type)) = space.find(reference_type_id) else {
        return Err(StatusCode::BadReferenceTypeIdInvalid);
    };

    if reference_type.is_abstract() {
        return Err(StatusCode::BadReferenceNotAllowed);
    }

    if node_class.is_type() {
        // Types hang off their supertype, and nothing else.
        if *reference_type_id != ReferenceTypeId::HasSubtype {
            return Err(StatusCode::BadReferenceNotAllowed);
        }
        if parent.node_class() != node_class {
            return Err(StatusCode::BadParentNodeIdInvalid);
        }
    } else if !space.is_subtype_of(
        reference_type_id,
        &ReferenceTypeId::HierarchicalReferences.into(),
    ) {
        return Err(StatusCode::BadReferenceTypeIdInvalid);
    }

    Ok(())
}
