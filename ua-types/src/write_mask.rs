// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! The `WriteMask` attribute bits, from OPC UA Part 3.

use bitflags::bitflags;

bitflags! {
    /// Bits describing which attributes of a node are writable through the
    /// attribute service set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct WriteMask: u32 {
        /// Indicates if the AccessLevel attribute is writable.
        const ACCESS_LEVEL = 1;
        /// Indicates if the ArrayDimensions attribute is writable.
        const ARRAY_DIMENSIONS = 1 << 1;
        /// Indicates if the BrowseName attribute is writable.
        const BROWSE_NAME = 1 << 2;
        /// Indicates if the ContainsNoLoops attribute is writable.
        const CONTAINS_NO_LOOPS = 1 << 3;
        /// Indicates if the DataType attribute is writable.
        const DATA_TYPE = 1 << 4;
        /// Indicates if the Description attribute is writable.
        const DESCRIPTION = 1 << 5;
        /// Indicates if the DisplayName attribute is writable.
        const DISPLAY_NAME = 1 << 6;
        /// Indicates if the EventNotifier attribute is writable.
        const EVENT_NOTIFIER = 1 << 7;
        /// Indicates if the Executable attribute is writable.
        const EXECUTABLE = 1 << 8;
        /// Indicates if the Historizing attribute is writable.
        const HISTORIZING = 1 << 9;
        /// Indicates if the InverseName attribute is writable.
        const INVERSE_NAME = 1 << 10;
        /// Indicates if the IsAbstract attribute is writable.
        const IS_ABSTRACT = 1 << 11;
        /// Indicates if the MinimumSamplingInterval attribute is writable.
        const MINIMUM_SAMPLING_INTERVAL = 1 << 12;
        /// Indicates if the NodeClass attribute is writable.
        const NODE_CLASS = 1 << 13;
        /// Indicates if the NodeId attribute is writable.
        const NODE_ID = 1 << 14;
        /// Indicates if the Symmetric attribute is writable.
        const SYMMETRIC = 1 << 15;
        /// Indicates if the UserAccessLevel attribute is writable.
        const USER_ACCESS_LEVEL = 1 << 16;
        /// Indicates if the UserExecutable attribute is writable.
        const USER_EXECUTABLE = 1 << 17;
        /// Indicates if the UserWriteMask attribute is writable.
        const USER_WRITE_MASK = 1 << 18;
        /// Indicates if the ValueRank attribute is writable.
        const VALUE_RANK = 1 << 19;
        /// Indicates if the WriteMask attribute is writable.
        const WRITE_MASK = 1 << 20;
        /// Indicates if the Value attribute is writable for a VariableType.
        const VALUE_FOR_VARIABLE_TYPE = 1 << 21;
    }
}
