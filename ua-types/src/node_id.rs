// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `NodeId`.

use std::fmt;

use crate::{byte_string::ByteString, guid::Guid, string::UAString};

/// The kind of identifier, numeric, string, guid or byte
#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub enum Identifier {
    /// Numeric node ID identifier. i=123
    Numeric(u32),
    /// String node ID identifier, s=...
    String(UAString),
    /// GUID node ID identifier, g=...
    Guid(Guid),
    /// Opaque node ID identifier, b=...
    ByteString(ByteString),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Identifier::Numeric(v) => write!(f, "i={}", *v),
            Identifier::String(v) => write!(f, "s={}", v),
            Identifier::Guid(v) => write!(f, "g={}", v),
            Identifier::ByteString(v) => write!(f, "b={}", v.as_base64()),
        }
    }
}

impl From<u32> for Identifier {
    fn from(v: u32) -> Self {
        Identifier::Numeric(v)
    }
}

impl<'a> From<&'a str> for Identifier {
    fn from(v: &'a str) -> Self {
        Identifier::from(UAString::from(v))
    }
}

impl From<String> for Identifier {
    fn from(v: String) -> Self {
        Identifier::from(UAString::from(v))
    }
}

impl From<UAString> for Identifier {
    fn from(v: UAString) -> Self {
        Identifier::String(v)
    }
}

impl From<Guid> for Identifier {
    fn from(v: Guid) -> Self {
        Identifier::Guid(v)
    }
}

impl From<ByteString> for Identifier {
    fn from(v: ByteString) -> Self {
        Identifier::ByteString(v)
    }
}

/// An identifier for a node in the address space of an OPC UA server.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct NodeId {
    /// The index for a namespace
    pub namespace: u16,
    /// The identifier for the node in the address space
    pub identifier: Identifier,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.namespace != 0 {
            write!(f, "ns={};{}", self.namespace, self.identifier)
        } else {
            write!(f, "{}", self.identifier)
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        NodeId::null()
    }
}

impl From<&NodeId> for NodeId {
    fn from(v: &NodeId) -> Self {
        v.clone()
    }
}

impl<T> From<(u16, T)> for NodeId
where
    T: Into<Identifier>,
{
    fn from(v: (u16, T)) -> Self {
        Self::new(v.0, v.1)
    }
}

impl NodeId {
    /// Construct a new node id from a namespace index and an identifier.
    pub fn new<T>(namespace: u16, value: T) -> NodeId
    where
        T: Into<Identifier>,
    {
        NodeId {
            namespace,
            identifier: value.into(),
        }
    }

    /// The null node id, numeric 0 in namespace 0.
    pub fn null() -> NodeId {
        NodeId::new(0, 0u32)
    }

    /// Whether this node id is null.
    pub fn is_null(&self) -> bool {
        self.namespace == 0 && self.identifier == Identifier::Numeric(0)
    }

    /// Whether the identifier is numeric 0, the store's cue to assign a
    /// fresh numeric identifier on insert.
    pub fn is_placeholder(&self) -> bool {
        self.identifier == Identifier::Numeric(0)
    }

    /// The numeric identifier, if the identifier is of numeric kind.
    pub fn as_u32(&self) -> Option<u32> {
        match self.identifier {
            Identifier::Numeric(v) => Some(v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::NodeId;

    #[test]
    fn display() {
        assert_eq!(NodeId::new(0, 85u32).to_string(), "i=85");
        assert_eq!(NodeId::new(2, "Pump").to_string(), "ns=2;s=Pump");
    }

    #[test]
    fn null_and_placeholder() {
        assert!(NodeId::null().is_null());
        assert!(NodeId::null().is_placeholder());
        assert!(NodeId::new(3, 0u32).is_placeholder());
        assert!(!NodeId::new(3, 0u32).is_null());
        assert!(!NodeId::new(0, 1u32).is_placeholder());
    }
}
