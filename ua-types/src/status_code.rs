// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! The subset of OPC UA status codes produced by the address space crates.
//!
//! Numeric values are taken from the standard status code table, so results
//! can be surfaced on the wire unchanged by an embedding server.

use std::fmt;

/// An OPC UA status code. The top two bits encode the severity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum StatusCode {
    /// The operation succeeded.
    #[default]
    Good = 0x0000_0000,
    /// The requested reference to delete was not found.
    UncertainReferenceNotDeleted = 0x40BC_0000,
    /// An unexpected error occurred.
    BadUnexpectedError = 0x8001_0000,
    /// An internal error occurred as a result of a programming or
    /// configuration error.
    BadInternalError = 0x8002_0000,
    /// Not enough memory to complete the operation.
    BadOutOfMemory = 0x8003_0000,
    /// There was nothing to do because the request specified no work.
    BadNothingToDo = 0x800F_0000,
    /// The user does not have permission to perform the requested operation.
    BadUserAccessDenied = 0x801F_0000,
    /// The syntax of the node id is not valid.
    BadNodeIdInvalid = 0x8033_0000,
    /// The node id refers to a node that does not exist.
    BadNodeIdUnknown = 0x8034_0000,
    /// The attribute is not supported for the specified node.
    BadAttributeIdInvalid = 0x8035_0000,
    /// The syntax of the index range parameter is invalid.
    BadIndexRangeInvalid = 0x8036_0000,
    /// The access level does not allow reading the node.
    BadNotReadable = 0x803A_0000,
    /// The access level does not allow writing to the node.
    BadNotWritable = 0x803B_0000,
    /// The value was out of range.
    BadOutOfRange = 0x803C_0000,
    /// The requested operation is not supported.
    BadNotSupported = 0x803D_0000,
    /// The requested item was not found.
    BadNotFound = 0x803E_0000,
    /// The requested operation is not implemented.
    BadNotImplemented = 0x8040_0000,
    /// The reference type id does not refer to a valid reference type node.
    BadReferenceTypeIdInvalid = 0x804C_0000,
    /// The parent node id does not refer to a valid node.
    BadParentNodeIdInvalid = 0x805B_0000,
    /// The reference could not be created because it violates constraints
    /// imposed by the data model.
    BadReferenceNotAllowed = 0x805C_0000,
    /// The requested node id is already used by another node.
    BadNodeIdExists = 0x805E_0000,
    /// The node class is not valid.
    BadNodeClassInvalid = 0x805F_0000,
    /// The browse name is invalid.
    BadBrowseNameInvalid = 0x8060_0000,
    /// The browse name is not unique among nodes that share the same
    /// relationship with the parent.
    BadBrowseNameDuplicated = 0x8061_0000,
    /// The node attributes are not valid for the node class.
    BadNodeAttributesInvalid = 0x8062_0000,
    /// The type definition node id does not reference an appropriate type
    /// node.
    BadTypeDefinitionInvalid = 0x8063_0000,
    /// The source node id does not reference a valid node.
    BadSourceNodeIdInvalid = 0x8064_0000,
    /// The target node id does not reference a valid node.
    BadTargetNodeIdInvalid = 0x8065_0000,
    /// The reference could not be created because a matching reference
    /// already exists.
    BadDuplicateReferenceNotAllowed = 0x8066_0000,
    /// The server does not allow this type of self reference on this node.
    BadInvalidSelfReference = 0x8067_0000,
    /// The reference type is not valid for a reference to a remote server.
    BadReferenceLocalOnly = 0x8068_0000,
    /// The server will not allow the node to be deleted.
    BadNoDeleteRights = 0x8069_0000,
    /// The value supplied for the attribute is not of the same type as the
    /// attribute's value.
    BadTypeMismatch = 0x8074_0000,
}

impl StatusCode {
    /// The raw numeric status code.
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Whether the severity is good.
    pub fn is_good(&self) -> bool {
        self.code() >> 30 == 0
    }

    /// Whether the severity is uncertain.
    pub fn is_uncertain(&self) -> bool {
        self.code() >> 30 == 1
    }

    /// Whether the severity is bad.
    pub fn is_bad(&self) -> bool {
        self.code() >> 30 >= 2
    }

    /// The symbolic name of this status code.
    pub fn name(&self) -> &'static str {
        match self {
            StatusCode::Good => "Good",
            StatusCode::UncertainReferenceNotDeleted => "UncertainReferenceNotDeleted",
            StatusCode::BadUnexpectedError => "BadUnexpectedError",
            StatusCode::BadInternalError => "BadInternalError",
            StatusCode::BadOutOfMemory => "BadOutOfMemory",
            StatusCode::BadNothingToDo => "BadNothingToDo",
            StatusCode::BadUserAccessDenied => "BadUserAccessDenied",
            StatusCode::BadNodeIdInvalid => "BadNodeIdInvalid",
            StatusCode::BadNodeIdUnknown => "BadNodeIdUnknown",
            StatusCode::BadAttributeIdInvalid => "BadAttributeIdInvalid",
            StatusCode::BadIndexRangeInvalid => "BadIndexRangeInvalid",
            StatusCode::BadNotReadable => "BadNotReadable",
            StatusCode::BadNotWritable => "BadNotWritable",
            StatusCode::BadOutOfRange => "BadOutOfRange",
            StatusCode::BadNotSupported => "BadNotSupported",
            StatusCode::BadNotFound => "BadNotFound",
            StatusCode::BadNotImplemented => "BadNotImplemented",
            StatusCode::BadReferenceTypeIdInvalid => "BadReferenceTypeIdInvalid",
            StatusCode::BadParentNodeIdInvalid => "BadParentNodeIdInvalid",
            StatusCode::BadReferenceNotAllowed => "BadReferenceNotAllowed",
            StatusCode::BadNodeIdExists => "BadNodeIdExists",
            StatusCode::BadNodeClassInvalid => "BadNodeClassInvalid",
            StatusCode::BadBrowseNameInvalid => "BadBrowseNameInvalid",
            StatusCode::BadBrowseNameDuplicated => "BadBrowseNameDuplicated",
            StatusCode::BadNodeAttributesInvalid => "BadNodeAttributesInvalid",
            StatusCode::BadTypeDefinitionInvalid => "BadTypeDefinitionInvalid",
            StatusCode::BadSourceNodeIdInvalid => "BadSourceNodeIdInvalid",
            StatusCode::BadTargetNodeIdInvalid => "BadTargetNodeIdInvalid",
            StatusCode::BadDuplicateReferenceNotAllowed => "BadDuplicateReferenceNotAllowed",
            StatusCode::BadInvalidSelfReference => "BadInvalidSelfReference",
            StatusCode::BadReferenceLocalOnly => "BadReferenceLocalOnly",
            StatusCode::BadNoDeleteRights => "BadNoDeleteRights",
            StatusCode::BadTypeMismatch => "BadTypeMismatch",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::StatusCode;

    #[test]
    fn severity() {
        assert!(StatusCode::Good.is_good());
        assert!(!StatusCode::Good.is_bad());
        assert!(StatusCode::UncertainReferenceNotDeleted.is_uncertain());
        assert!(!StatusCode::UncertainReferenceNotDeleted.is_bad());
        assert!(StatusCode::BadTypeMismatch.is_bad());
        assert!(!StatusCode::BadTypeMismatch.is_good());
    }
}
