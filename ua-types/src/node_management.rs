// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Per-item types for the node management service set: AddNodes,
//! AddReferences, DeleteNodes and DeleteReferences.

use crate::{
    attributes::AddNodeAttributes, enums::NodeClass, expanded_node_id::ExpandedNodeId,
    node_id::NodeId, qualified_name::QualifiedName, status_code::StatusCode, string::UAString,
};

/// A single node to add in an `AddNodes` request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddNodesItem {
    /// Node id of the parent the new node hangs off, null for an orphan
    /// object.
    pub parent_node_id: ExpandedNodeId,
    /// Reference type between the parent and the new node.
    pub reference_type_id: NodeId,
    /// Requested node id. A numeric identifier of 0 asks the server to
    /// assign one.
    pub requested_new_node_id: ExpandedNodeId,
    /// Browse name of the new node.
    pub browse_name: QualifiedName,
    /// Class of the new node.
    pub node_class: NodeClass,
    /// Class-specific attribute block. Must match `node_class`.
    pub node_attributes: AddNodeAttributes,
    /// Type definition for Object and Variable nodes, null to use the base
    /// type.
    pub type_definition: ExpandedNodeId,
}

/// Per-item result of an `AddNodes` request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddNodesResult {
    /// Status of the operation.
    pub status_code: StatusCode,
    /// Node id assigned to the new node, null on failure.
    pub added_node_id: NodeId,
}

impl AddNodesResult {
    /// A failed result carrying `status` and no node id.
    pub fn error(status: StatusCode) -> Self {
        Self {
            status_code: status,
            added_node_id: NodeId::null(),
        }
    }
}

/// A single reference to create in an `AddReferences` request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AddReferencesItem {
    /// Node the reference starts at.
    pub source_node_id: NodeId,
    /// Type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the reference points from source to target.
    pub is_forward: bool,
    /// URI of the server holding the target node, null for the local
    /// server.
    pub target_server_uri: UAString,
    /// Node the reference points at.
    pub target_node_id: ExpandedNodeId,
    /// Expected class of the target node.
    pub target_node_class: NodeClass,
}

/// A single node to delete in a `DeleteNodes` request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteNodesItem {
    /// Node to delete.
    pub node_id: NodeId,
    /// Whether to also delete references pointing at the node from other
    /// nodes.
    pub delete_target_references: bool,
}

/// A single reference to delete in a `DeleteReferences` request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeleteReferencesItem {
    /// Node the reference starts at.
    pub source_node_id: NodeId,
    /// Type of the reference.
    pub reference_type_id: NodeId,
    /// Whether the reference points from source to target.
    pub is_forward: bool,
    /// Node the reference points at.
    pub target_node_id: ExpandedNodeId,
    /// Whether to delete the matching inverse entry on the target as well.
    pub delete_bidirectional: bool,
}
