// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `ExpandedNodeId`.

use std::fmt;

use crate::{node_id::NodeId, string::UAString};

/// A node id that may refer to a node in another server's address space,
/// by namespace URI and server index.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Default)]
pub struct ExpandedNodeId {
    /// The inner node id.
    pub node_id: NodeId,
    /// Namespace URI, overriding the node id's namespace index when set.
    pub namespace_uri: UAString,
    /// Index into the server table, 0 for the local server.
    pub server_index: u32,
}

impl ExpandedNodeId {
    /// Construct an expanded node id referring to a local node.
    pub fn new(node_id: impl Into<NodeId>) -> ExpandedNodeId {
        ExpandedNodeId {
            node_id: node_id.into(),
            namespace_uri: UAString::null(),
            server_index: 0,
        }
    }

    /// The null expanded node id.
    pub fn null() -> ExpandedNodeId {
        Self::new(NodeId::null())
    }

    /// Whether the inner node id is null.
    pub fn is_null(&self) -> bool {
        self.node_id.is_null()
    }

    /// Whether this refers to a node on the local server by namespace index.
    pub fn is_local(&self) -> bool {
        self.server_index == 0 && self.namespace_uri.is_null()
    }
}

impl fmt::Display for ExpandedNodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.server_index != 0 {
            write!(f, "svr={};", self.server_index)?;
        }
        if !self.namespace_uri.is_null() {
            write!(f, "nsu={};{}", self.namespace_uri, self.node_id.identifier)
        } else {
            write!(f, "{}", self.node_id)
        }
    }
}

impl From<NodeId> for ExpandedNodeId {
    fn from(node_id: NodeId) -> Self {
        Self::new(node_id)
    }
}

impl From<&NodeId> for ExpandedNodeId {
    fn from(node_id: &NodeId) -> Self {
        Self::new(node_id.clone())
    }
}
