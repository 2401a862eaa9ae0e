// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Conversion errors raised by the types in this crate.

use thiserror::Error;

/// Error from converting between OPC UA types and their raw representations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The value is not a valid attribute ID.
    #[error("{0} is not a valid attribute ID")]
    InvalidAttributeId(u32),
    /// The value is not a valid node class.
    #[error("{0} is not a valid node class")]
    InvalidNodeClass(i32),
    /// The node id does not identify a builtin data type.
    #[error("node id is not a builtin data type")]
    NotBuiltinDataType,
    /// The variant cannot be converted to the requested type.
    #[error("variant cannot be converted to the requested type")]
    VariantConversion,
    /// The values of an array do not all match the declared scalar type.
    #[error("array values must all be scalars of the declared type")]
    InvalidArrayContents,
    /// The declared array dimensions do not match the number of values.
    #[error("array dimensions do not match the number of values")]
    InvalidArrayDimensions,
}
