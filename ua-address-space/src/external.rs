//! Routing of node management requests to foreign namespace handlers.

use ua_types::{
    AddNodesItem, AddNodesResult, AddReferencesItem, DeleteNodesItem, DeleteReferencesItem,
    StatusCode,
};

/// Handler for a namespace whose nodes live outside the local address
/// space, e.g. bridged from another server or generated on the fly.
///
/// [`AddressSpaceManager`](crate::AddressSpaceManager) routes every item
/// whose governing namespace index matches a registered handler to that
/// handler, and handles the remainder locally. Handlers receive only their
/// own items and must return one result per item, in order.
pub trait ExternalNamespaceManager: Send + Sync {
    /// Add nodes in the foreign namespace.
    fn add_nodes(&self, items: &[AddNodesItem]) -> Vec<AddNodesResult>;

    /// Add references originating in the foreign namespace.
    fn add_references(&self, items: &[AddReferencesItem]) -> Vec<StatusCode>;

    /// Delete nodes of the foreign namespace.
    fn delete_nodes(&self, items: &[DeleteNodesItem]) -> Vec<StatusCode>;

    /// Delete references originating in the foreign namespace.
    fn delete_references(&self, items: &[DeleteReferencesItem]) -> Vec<StatusCode>;
}
