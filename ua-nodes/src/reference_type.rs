// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `ReferenceType` and `ReferenceTypeBuilder`.

use log::error;
use ua_types::{
    AttributeId, AttributesMask, DataValue, ReferenceTypeAttributes, StatusCode, Variant,
};

use crate::FromAttributesError;

use super::{base::Base, node::Node, node::NodeBase};

node_builder_impl!(ReferenceTypeBuilder, ReferenceType);
node_builder_impl_subtype!(ReferenceTypeBuilder);

impl ReferenceTypeBuilder {
    /// Set the `IsAbstract` attribute of this reference type,
    /// indicating whether references in the instance hierarchy
    /// are allowed to use this reference type.
    pub fn is_abstract(mut self, is_abstract: bool) -> Self {
        self.node.set_is_abstract(is_abstract);
        self
    }

    /// Set the write mask of this type.
    pub fn write_mask(mut self, write_mask: WriteMask) -> Self {
        self.node.set_write_mask(write_mask);
        self
    }

    /// Set whether references of this type are symmetric, meaning
    /// they have the same name in both directions.
    pub fn symmetric(mut self, symmetric: bool) -> Self {
        self.node.set_symmetric(symmetric);
        self
    }

    /// Set the inverse name of this reference type.
    pub fn inverse_name(mut self, inverse_name: impl Into<LocalizedText>) -> Self {
        self.node.set_inverse_name(inverse_name.into());
        self
    }
}

/// A `ReferenceType` is a type of node within the `AddressSpace`.
#[derive(Debug, Clone)]
pub struct ReferenceType {
    pub(super) base: Base,
    pub(super) symmetric: bool,
    pub(super) is_abstract: bool,
    pub(super) inverse_name: Option<LocalizedText>,
}

impl Default for ReferenceType {
    fn default() -> Self {
        Self {
            base: Base::new(NodeClass::ReferenceType, &NodeId::null(), "", ""),
            symmetric: false,
            is_abstract: false,
            inverse_name: None,
        }
    }
}

node_base_impl!(ReferenceType);

impl Node for ReferenceType {
    fn get_attribute(&self, attribute_id: AttributeId) -> Option<DataValue> {
        match attribute_id {
            AttributeId::Symmetric => Some(DataValue::value_only(self.symmetric())),
            AttributeId::IsAbstract => Some(DataValue::value_only(self.is_abstract())),
            AttributeId::InverseName => self.inverse_name().map(DataValue::value_only),
            _ => self.base.get_attribute(attribute_id),
        }
    }

    fn set_attribute(
        &mut self,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), StatusCode> {
        match attribute_id {
            AttributeId::Symmetric => {
                if let Variant::Boolean(v) = value {
                    self.symmetric = v;
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::IsAbstract => {
                if let Variant::Boolean(v) = value {
                    self.is_abstract = v;
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::InverseName => {
                if let Variant::LocalizedText(v) = value {
                    self.inverse_name = Some(*v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            _ => self.base.set_attribute(attribute_id, value),
        }
    }
}

impl ReferenceType {
    /// Create a new reference type.
    pub fn new(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        display_name: impl Into<LocalizedText>,
        inverse_name: Option<LocalizedText>,
        symmetric: bool,
        is_abstract: bool,
    ) -> ReferenceType {
        ReferenceType {
            base: Base::new(NodeClass::ReferenceType, node_id, browse_name, display_name),
            symmetric,
            is_abstract,
            inverse_name,
        }
    }

    /// Create a new reference type from [ReferenceTypeAttributes].
    pub fn from_attributes(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        attributes: ReferenceTypeAttributes,
    ) -> Result<Self, FromAttributesError> {
        let mandatory_attributes =
            AttributesMask::DISPLAY_NAME | AttributesMask::IS_ABSTRACT | AttributesMask::SYMMETRIC;
        let mask = AttributesMask::from_bits(attributes.specified_attributes)
            .ok_or(FromAttributesError::InvalidMask)?;
        if mask.contains(mandatory_attributes) {
            let mut node = Self::new(
                node_id,
                browse_name,
                attributes.display_name,
                None,
                attributes.symmetric,
                attributes.is_abstract,
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
            if mask.contains(AttributesMask::INVERSE_NAME) {
                node.set_inverse_name(attributes.inverse_name);
            }
            Ok(node)
        } else {
            error!("ReferenceType cannot be created from attributes - missing mandatory values");
            Err(FromAttributesError::MissingMandatoryValues)
        }
    }

    /// Get whether this reference type is valid.
    pub fn is_valid(&self) -> bool {
        self.base.is_valid()
    }

    /// Get whether this reference type is symmetric.
    pub fn symmetric(&self) -> bool {
        self.symmetric
    }

    /// Set whether this reference type is symmetric.
    pub fn set_symmetric(&mut self, symmetric: bool) {
        self.symmetric = symmetric;
    }

    /// Get whether this reference type is abstract.
    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Set whether this reference type is abstract.
    pub fn set_is_abstract(&mut self, is_abstract: bool) {
        self.is_abstract = is_abstract;
    }

    /// Get the inverse name of this reference type.
    pub fn inverse_name(&self) -> Option<LocalizedText> {
        self.inverse_name.clone()
    }

    /// Set the inverse name of this reference type.
    pub fn set_inverse_name(&mut self, inverse_name: LocalizedText) {
        self.inverse_name = Some(inverse_name);
    }
}
