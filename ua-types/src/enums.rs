// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Basic enumerations shared across the address space crates.

use crate::errors::Error;

/// The class of a node, determining which attribute block it carries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum NodeClass {
    /// No node class specified.
    #[default]
    Unspecified = 0,
    /// Objects are general structural nodes without special meaning.
    Object = 1,
    /// Variables are nodes with a current value.
    Variable = 2,
    /// Methods are nodes that can be called with the `Call` service.
    Method = 4,
    /// Object types define properties of object nodes.
    ObjectType = 8,
    /// Variable types define properties of variable nodes.
    VariableType = 16,
    /// Reference types define properties of references.
    ReferenceType = 32,
    /// Data types define different types used by variables.
    DataType = 64,
    /// Views are pre-defined subsets of the address space.
    View = 128,
}

impl NodeClass {
    /// Whether this is one of the four type node classes.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            NodeClass::ObjectType
                | NodeClass::VariableType
                | NodeClass::ReferenceType
                | NodeClass::DataType
        )
    }
}

impl TryFrom<i32> for NodeClass {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => NodeClass::Unspecified,
            1 => NodeClass::Object,
            2 => NodeClass::Variable,
            4 => NodeClass::Method,
            8 => NodeClass::ObjectType,
            16 => NodeClass::VariableType,
            32 => NodeClass::ReferenceType,
            64 => NodeClass::DataType,
            128 => NodeClass::View,
            _ => return Err(Error::InvalidNodeClass(value)),
        })
    }
}

/// Direction to browse references in, relative to the starting node.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BrowseDirection {
    /// References where the starting node is the source.
    Forward,
    /// References where the starting node is the target.
    Inverse,
    /// References in both directions.
    Both,
}
