// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `ByteString`.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

/// An OPC UA byte string is either null or an arbitrary run of bytes. It is
/// not to be confused with `UAString`, which holds text.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Clone, Hash, Default)]
pub struct ByteString {
    value: Option<Vec<u8>>,
}

impl ByteString {
    /// Create a null byte string.
    pub fn null() -> ByteString {
        ByteString { value: None }
    }

    /// Whether the byte string is null.
    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Whether the byte string is null or empty.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map_or(true, |v| v.is_empty())
    }

    /// The raw bytes, empty when null.
    pub fn as_ref(&self) -> &[u8] {
        self.value.as_deref().unwrap_or(&[])
    }

    /// Create a byte string from its base64 representation.
    pub fn from_base64(data: &str) -> Option<ByteString> {
        STANDARD.decode(data).map(Self::from).ok()
    }

    /// Render the bytes as base64, null as the empty string.
    pub fn as_base64(&self) -> String {
        STANDARD.encode(self.as_ref())
    }
}

impl fmt::Display for ByteString {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_base64())
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(value: Vec<u8>) -> Self {
        Self { value: Some(value) }
    }
}

impl From<&[u8]> for ByteString {
    fn from(value: &[u8]) -> Self {
        Self {
            value: Some(value.to_vec()),
        }
    }
}
