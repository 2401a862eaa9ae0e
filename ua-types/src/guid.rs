// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `Guid`.

use std::fmt;

use uuid::Uuid;

/// A globally unique identifier, used as one of the node id identifier kinds.
#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Default)]
pub struct Guid {
    uuid: Uuid,
}

impl Guid {
    /// Create a new random Guid.
    pub fn new() -> Guid {
        Guid {
            uuid: Uuid::new_v4(),
        }
    }

    /// Create a null (all zero) Guid.
    pub fn null() -> Guid {
        Guid { uuid: Uuid::nil() }
    }

    /// Whether the Guid is null.
    pub fn is_null(&self) -> bool {
        self.uuid.is_nil()
    }

    /// The raw bytes of the Guid.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.uuid.as_bytes()
    }
}

impl From<Uuid> for Guid {
    fn from(uuid: Uuid) -> Self {
        Guid { uuid }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}

impl fmt::Debug for Guid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.uuid)
    }
}
