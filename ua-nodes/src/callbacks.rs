// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! User callback types attached to nodes.
//!
//! All callbacks run synchronously while the address space writer lock is
//! held. A callback must not call back into the public mutation surface of
//! the owning manager; doing so deadlocks.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ua_types::{DataValue, NodeId, StatusCode, Variant};

/// Opaque per-instance state produced by an ObjectType constructor and handed
/// back to its destructor.
pub struct InstanceHandle(Box<dyn Any + Send + Sync>);

impl InstanceHandle {
    /// Wrap a value as an instance handle.
    pub fn new<T: Any + Send + Sync>(value: T) -> InstanceHandle {
        InstanceHandle(Box::new(value))
    }

    /// Borrow the inner value if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for InstanceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InstanceHandle")
    }
}

/// Constructor callback of an ObjectType, invoked after the mandated
/// children of a new instance have been created. The returned handle is
/// stored on the instance.
pub type NodeConstructor =
    Arc<dyn Fn(&NodeId) -> Result<Option<InstanceHandle>, StatusCode> + Send + Sync>;

/// Destructor callback of an ObjectType, invoked before an instance is
/// removed from the store.
pub type NodeDestructor = Arc<dyn Fn(&NodeId, Option<&InstanceHandle>) + Send + Sync>;

/// Constructor/destructor pair registered on an ObjectType. Instances of the
/// type, and of its subtypes, run these on creation and deletion.
#[derive(Clone, Default)]
pub struct NodeLifecycle {
    /// Called once the instance and its mandated children exist.
    pub constructor: Option<NodeConstructor>,
    /// Called before the instance is removed.
    pub destructor: Option<NodeDestructor>,
}

impl NodeLifecycle {
    /// A lifecycle with only a constructor.
    pub fn with_constructor(
        constructor: impl Fn(&NodeId) -> Result<Option<InstanceHandle>, StatusCode>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        NodeLifecycle {
            constructor: Some(Arc::new(constructor)),
            destructor: None,
        }
    }

    /// A lifecycle with only a destructor.
    pub fn with_destructor(
        destructor: impl Fn(&NodeId, Option<&InstanceHandle>) + Send + Sync + 'static,
    ) -> Self {
        NodeLifecycle {
            constructor: None,
            destructor: Some(Arc::new(destructor)),
        }
    }

    /// A lifecycle with both callbacks.
    pub fn new(
        constructor: impl Fn(&NodeId) -> Result<Option<InstanceHandle>, StatusCode>
            + Send
            + Sync
            + 'static,
        destructor: impl Fn(&NodeId, Option<&InstanceHandle>) + Send + Sync + 'static,
    ) -> Self {
        NodeLifecycle {
            constructor: Some(Arc::new(constructor)),
            destructor: Some(Arc::new(destructor)),
        }
    }
}

impl fmt::Debug for NodeLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeLifecycle")
            .field("constructor", &self.constructor.is_some())
            .field("destructor", &self.destructor.is_some())
            .finish()
    }
}

/// Notification callbacks around reads and writes of a variable's inline
/// value.
#[derive(Clone, Default)]
pub struct ValueCallback {
    /// Called with the current value before each read.
    pub on_read: Option<Arc<dyn Fn(&NodeId, &DataValue) + Send + Sync>>,
    /// Called with the new value after each successful write.
    pub on_write: Option<Arc<dyn Fn(&NodeId, &DataValue) + Send + Sync>>,
}

impl fmt::Debug for ValueCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueCallback")
            .field("on_read", &self.on_read.is_some())
            .field("on_write", &self.on_write.is_some())
            .finish()
    }
}

/// External value storage for a variable. When set, the variable's inline
/// value is bypassed and reads and writes go through these callbacks.
#[derive(Clone)]
pub struct DataSource {
    /// Produce the current value.
    pub read: Arc<dyn Fn(&NodeId) -> Result<DataValue, StatusCode> + Send + Sync>,
    /// Accept a new value. A data source without a write function is read
    /// only.
    pub write: Option<Arc<dyn Fn(&NodeId, &DataValue) -> Result<(), StatusCode> + Send + Sync>>,
}

impl DataSource {
    /// A read only data source.
    pub fn read_only(
        read: impl Fn(&NodeId) -> Result<DataValue, StatusCode> + Send + Sync + 'static,
    ) -> Self {
        DataSource {
            read: Arc::new(read),
            write: None,
        }
    }

    /// A read/write data source.
    pub fn read_write(
        read: impl Fn(&NodeId) -> Result<DataValue, StatusCode> + Send + Sync + 'static,
        write: impl Fn(&NodeId, &DataValue) -> Result<(), StatusCode> + Send + Sync + 'static,
    ) -> Self {
        DataSource {
            read: Arc::new(read),
            write: Some(Arc::new(write)),
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("writable", &self.write.is_some())
            .finish()
    }
}

/// Which storage currently backs a variable's value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// The inline data value on the node.
    Data,
    /// A registered external data source.
    DataSource,
}

/// Handler invoked when a method node is called.
#[derive(Clone)]
pub struct MethodCallback {
    handler: Arc<dyn Fn(&NodeId, &[Variant]) -> Result<Vec<Variant>, StatusCode> + Send + Sync>,
}

impl MethodCallback {
    /// Wrap a handler function.
    pub fn new(
        handler: impl Fn(&NodeId, &[Variant]) -> Result<Vec<Variant>, StatusCode>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        MethodCallback {
            handler: Arc::new(handler),
        }
    }

    /// Invoke the handler with the id of the method node and input
    /// arguments.
    pub fn call(
        &self,
        method_id: &NodeId,
        arguments: &[Variant],
    ) -> Result<Vec<Variant>, StatusCode> {
        (self.handler)(method_id, arguments)
    }
}

impl fmt::Debug for MethodCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MethodCallback")
    }
}
