#![warn(missing_docs)]

//! A mutable, in-memory OPC-UA address space with the node management
//! service set: AddNodes, AddReferences, DeleteNodes and DeleteReferences.
//!
//! The heavy lifting is the consistency machinery around mutation: parent
//! reference validation, structural type checking of variables against
//! their variable type templates, recursive type-driven instantiation with
//! browse name merging, bidirectional reference maintenance, and atomic
//! unwinding of partially applied adds.
//!
//! [`AddressSpace`] is the store with the non-locking mutation internals;
//! [`AddressSpaceManager`] wraps it in a writer lock and adds the service
//! surface plus routing to [`ExternalNamespaceManager`]s.

mod address_space;
mod external;
mod manager;

#[cfg(test)]
mod tests;

pub use address_space::{
    compatible_array_dimensions, compatible_value_rank_array_dimensions, compatible_value_ranks,
    AddressSpace, InstantiationHook,
};
pub use external::ExternalNamespaceManager;
pub use manager::AddressSpaceManager;

pub use ua_nodes::*;
