// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `Method` and `MethodBuilder`.

use log::error;
use ua_types::{AttributeId, AttributesMask, DataValue, MethodAttributes, StatusCode, Variant};

use crate::{FromAttributesError, MethodCallback};

use super::{base::Base, node::Node, node::NodeBase};

node_builder_impl!(MethodBuilder, Method);
node_builder_impl_component_of!(MethodBuilder);

impl MethodBuilder {
    /// Set whether this method is executable, meaning it can be
    /// called by users at all.
    pub fn executable(mut self, executable: bool) -> Self {
        self.node.set_executable(executable);
        self
    }

    /// Set whether this method is executable by the current user.
    /// This value is usually modified by the server depending on the
    /// user asking for it.
    pub fn user_executable(mut self, executable: bool) -> Self {
        self.node.set_user_executable(executable);
        self
    }

    /// Set the write mask for this method.
    pub fn write_mask(mut self, write_mask: WriteMask) -> Self {
        self.node.set_write_mask(write_mask);
        self
    }

    /// Attach the handler invoked when the method is called.
    pub fn callback(mut self, callback: MethodCallback) -> Self {
        self.node.set_callback(Some(callback));
        self
    }
}

/// A `Method` is a type of node within the `AddressSpace`.
#[derive(Debug, Clone)]
pub struct Method {
    pub(super) base: Base,
    pub(super) executable: bool,
    pub(super) user_executable: bool,
    pub(super) callback: Option<MethodCallback>,
}

impl Default for Method {
    fn default() -> Self {
        Self {
            base: Base::new(NodeClass::Method, &NodeId::null(), "", ""),
            executable: false,
            user_executable: false,
            callback: None,
        }
    }
}

node_base_impl!(Method);

impl Node for Method {
    fn get_attribute(&self, attribute_id: AttributeId) -> Option<DataValue> {
        match attribute_id {
            AttributeId::Executable => Some(DataValue::value_only(self.executable())),
            AttributeId::UserExecutable => Some(DataValue::value_only(self.user_executable())),
            _ => self.base.get_attribute(attribute_id),
        }
    }

    fn set_attribute(
        &mut self,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), StatusCode> {
        match attribute_id {
            AttributeId::Executable => {
                if let Variant::Boolean(v) = value {
                    self.set_executable(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::UserExecutable => {
                if let Variant::Boolean(v) = value {
                    self.set_user_executable(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            _ => self.base.set_attribute(attribute_id, value),
        }
    }
}

impl Method {
    /// Create a new method.
    pub fn new(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        display_name: impl Into<LocalizedText>,
        executable: bool,
        user_executable: bool,
    ) -> Method {
        Method {
            base: Base::new(NodeClass::Method, node_id, browse_name, display_name),
            executable,
            user_executable,
            callback: None,
        }
    }

    /// Create a new method from [MethodAttributes].
    pub fn from_attributes(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        attributes: MethodAttributes,
    ) -> Result<Self, FromAttributesError> {
        let mandatory_attributes = AttributesMask::DISPLAY_NAME
            | AttributesMask::EXECUTABLE
            | AttributesMask::USER_EXECUTABLE;
        let mask = AttributesMask::from_bits(attributes.specified_attributes)
            .ok_or(FromAttributesError::InvalidMask)?;
        if mask.contains(mandatory_attributes) {
            let mut node = Self::new(
                node_id,
                browse_name,
                attributes.display_name,
                attributes.executable,
                attributes.user_executable,
            );
            if mask.contains(AttributesMask::DESCRIPTION) {
                node.set_description(attributes.description);
            }
            if mask.contains(AttributesMask::WRITE_MASK) {
                node.set_write_mask(WriteMask::from_bits_truncate(attributes.write_mask));
            }
            if mask.contains(AttributesMask::USER_WRITE_MASK) {
                node.set_user_write_mask(WriteMask::from_bits_truncate(attributes.user_write_mask));
            }
            Ok(node)
        } else {
            error!("Method cannot be created from attributes - missing mandatory values");
            Err(FromAttributesError::MissingMandatoryValues)
        }
    }

    /// Get whether this method is valid.
    pub fn is_valid(&self) -> bool {
        self.base.is_valid()
    }

    /// Get whether this method is executable.
    pub fn executable(&self) -> bool {
        self.executable
    }

    /// Set whether this method is executable.
    pub fn set_executable(&mut self, executable: bool) {
        self.executable = executable;
    }

    /// Get whether this method is executable by the current user by default.
    pub fn user_executable(&self) -> bool {
        // User executable cannot be true unless executable is true
        self.executable && self.user_executable
    }

    /// Set whether this method is executable by the current user by default.
    pub fn set_user_executable(&mut self, user_executable: bool) {
        self.user_executable = user_executable;
    }

    /// Get the handler invoked when the method is called.
    pub fn callback(&self) -> Option<&MethodCallback> {
        self.callback.as_ref()
    }

    /// Attach or clear the handler invoked when the method is called.
    pub fn set_callback(&mut self, callback: Option<MethodCallback>) {
        self.callback = callback;
    }
}
