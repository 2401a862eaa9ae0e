// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! The [`AttributeId`] enum, identifying OPC UA node attributes by a numeric value.

use crate::errors::Error;

/// Node attribute ID, from the OPC UA standard.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq)]
#[repr(u32)]
pub enum AttributeId {
    /// Node ID.
    NodeId = 1,
    /// Node class.
    NodeClass = 2,
    /// Browse name.
    BrowseName = 3,
    /// Display name.
    DisplayName = 4,
    /// Description.
    Description = 5,
    /// Write mask.
    WriteMask = 6,
    /// User write mask.
    UserWriteMask = 7,
    /// Is abstract.
    IsAbstract = 8,
    /// Is symmetric, applies to reference types.
    Symmetric = 9,
    /// Inverse name of reference type.
    InverseName = 10,
    /// For views, contains no loops.
    ContainsNoLoops = 11,
    /// Whether this object can produce events.
    EventNotifier = 12,
    /// Variable value.
    Value = 13,
    /// Data type.
    DataType = 14,
    /// Variable value rank.
    ValueRank = 15,
    /// Variable array dimensions.
    ArrayDimensions = 16,
    /// Variable access level.
    AccessLevel = 17,
    /// Variable user access level.
    UserAccessLevel = 18,
    /// Variable minimum sampling interval.
    MinimumSamplingInterval = 19,
    /// Whether a variable stores history.
    Historizing = 20,
    /// Whether this method is executable.
    Executable = 21,
    /// Whether this method is executable by the current user.
    UserExecutable = 22,
}

impl AttributeId {
    /// Try to get this attribute ID from a 32 bit integer.
    pub fn from_u32(attribute_id: u32) -> Result<AttributeId, Error> {
        let attribute_id = match attribute_id {
            1 => AttributeId::NodeId,
            2 => AttributeId::NodeClass,
            3 => AttributeId::BrowseName,
            4 => AttributeId::DisplayName,
            5 => AttributeId::Description,
            6 => AttributeId::WriteMask,
            7 => AttributeId::UserWriteMask,
            8 => AttributeId::IsAbstract,
            9 => AttributeId::Symmetric,
            10 => AttributeId::InverseName,
            11 => AttributeId::ContainsNoLoops,
            12 => AttributeId::EventNotifier,
            13 => AttributeId::Value,
            14 => AttributeId::DataType,
            15 => AttributeId::ValueRank,
            16 => AttributeId::ArrayDimensions,
            17 => AttributeId::AccessLevel,
            18 => AttributeId::UserAccessLevel,
            19 => AttributeId::MinimumSamplingInterval,
            20 => AttributeId::Historizing,
            21 => AttributeId::Executable,
            22 => AttributeId::UserExecutable,
            _ => {
                return Err(Error::InvalidAttributeId(attribute_id));
            }
        };
        Ok(attribute_id)
    }
}
