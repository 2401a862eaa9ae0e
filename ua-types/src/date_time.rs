// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `DateTime`.

use std::fmt;

use chrono::Utc;

/// An OPC UA timestamp, backed by a UTC date time.
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash)]
pub struct DateTime {
    value: chrono::DateTime<Utc>,
}

impl DateTime {
    /// The current time.
    pub fn now() -> DateTime {
        DateTime { value: Utc::now() }
    }

    /// The null timestamp, the UNIX epoch.
    pub fn null() -> DateTime {
        DateTime {
            value: chrono::DateTime::UNIX_EPOCH,
        }
    }

    /// Whether the timestamp is the null timestamp.
    pub fn is_null(&self) -> bool {
        self.value == chrono::DateTime::UNIX_EPOCH
    }

    /// The inner chrono value.
    pub fn as_chrono(&self) -> &chrono::DateTime<Utc> {
        &self.value
    }
}

impl Default for DateTime {
    fn default() -> Self {
        Self::null()
    }
}

impl From<chrono::DateTime<Utc>> for DateTime {
    fn from(value: chrono::DateTime<Utc>) -> Self {
        DateTime { value }
    }
}

impl fmt::Display for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value.to_rfc3339())
    }
}

impl fmt::Debug for DateTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.value.to_rfc3339())
    }
}
