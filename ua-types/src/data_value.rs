// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `DataValue`.

use crate::{date_time::DateTime, status_code::StatusCode, variant::Variant};

/// A value with an associated status code and timestamps, the unit of
/// exchange for variable values and attribute reads.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataValue {
    /// The value, `None` when the read produced no value.
    pub value: Option<Variant>,
    /// Status associated with the value, `Good` when absent.
    pub status: Option<StatusCode>,
    /// Timestamp the source produced the value.
    pub source_timestamp: Option<DateTime>,
    /// Timestamp the server observed the value.
    pub server_timestamp: Option<DateTime>,
}

impl DataValue {
    /// A data value with no value, status or timestamps.
    pub fn null() -> DataValue {
        DataValue::default()
    }

    /// A good data value carrying `value`, timestamped now.
    pub fn new_now(value: impl Into<Variant>) -> DataValue {
        let now = DateTime::now();
        DataValue {
            value: Some(value.into()),
            status: Some(StatusCode::Good),
            source_timestamp: Some(now),
            server_timestamp: Some(now),
        }
    }

    /// A data value carrying only `value`.
    pub fn value_only(value: impl Into<Variant>) -> DataValue {
        DataValue {
            value: Some(value.into()),
            status: None,
            source_timestamp: None,
            server_timestamp: None,
        }
    }

    /// The status, `Good` when not set.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or_default()
    }

    /// Whether the data value holds an actual value.
    pub fn is_empty(&self) -> bool {
        self.value.as_ref().map_or(true, |v| v.is_empty())
    }
}

impl From<Variant> for DataValue {
    fn from(value: Variant) -> Self {
        DataValue::value_only(value)
    }
}
