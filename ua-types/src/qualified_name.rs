// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `QualifiedName`.

use std::fmt;

use crate::string::UAString;

/// A namespace-qualified name, unique among the aggregates of a node's
/// parent. Child lookup during instantiation matches on the full pair.
#[derive(PartialEq, Eq, Clone, Debug, Hash, Default)]
pub struct QualifiedName {
    /// The namespace index of the name.
    pub namespace_index: u16,
    /// The unqualified name.
    pub name: UAString,
}

impl QualifiedName {
    /// Construct a qualified name from a namespace index and a name.
    pub fn new(namespace_index: u16, name: impl Into<UAString>) -> QualifiedName {
        QualifiedName {
            namespace_index,
            name: name.into(),
        }
    }

    /// The null qualified name.
    pub fn null() -> QualifiedName {
        QualifiedName {
            namespace_index: 0,
            name: UAString::null(),
        }
    }

    /// Whether the qualified name is null.
    pub fn is_null(&self) -> bool {
        self.namespace_index == 0 && self.name.is_null()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "{}:{}", self.namespace_index, self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(value: &str) -> Self {
        QualifiedName::new(0, value)
    }
}

impl From<String> for QualifiedName {
    fn from(value: String) -> Self {
        QualifiedName::new(0, value)
    }
}

impl From<(u16, &str)> for QualifiedName {
    fn from(value: (u16, &str)) -> Self {
        QualifiedName::new(value.0, value.1)
    }
}
