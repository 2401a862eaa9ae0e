// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `Variable` and `VariableBuilder`.

use log::error;
use ua_types::{
    AttributeId, AttributesMask, DataValue, StatusCode, VariableAttributes, Variant,
};

use crate::{AccessLevel, DataSource, FromAttributesError, ValueCallback, ValueSource};

use super::{base::Base, node::Node, node::NodeBase};

node_builder_impl!(VariableBuilder, Variable);
node_builder_impl_component_of!(VariableBuilder);
node_builder_impl_property_of!(VariableBuilder);

impl VariableBuilder {
    /// Set the value of the variable.
    pub fn value(mut self, value: impl Into<Variant>) -> Self {
        self.node.set_value(value);
        self
    }

    /// Set the data type of the variable.
    pub fn data_type(mut self, data_type: impl Into<NodeId>) -> Self {
        self.node.set_data_type(data_type);
        self
    }

    /// Set the value rank of the variable.
    pub fn value_rank(mut self, value_rank: i32) -> Self {
        self.node.set_value_rank(value_rank);
        self
    }

    /// Set the array dimensions of the variable.
    pub fn array_dimensions(mut self, array_dimensions: &[u32]) -> Self {
        self.node.set_array_dimensions(array_dimensions);
        self
    }

    /// Set whether the variable stores history.
    pub fn historizing(mut self, historizing: bool) -> Self {
        self.node.set_historizing(historizing);
        self
    }

    /// Set the access level of the variable.
    pub fn access_level(mut self, access_level: AccessLevel) -> Self {
        self.node.set_access_level(access_level);
        self
    }

    /// Set the user access level of the variable.
    pub fn user_access_level(mut self, user_access_level: AccessLevel) -> Self {
        self.node.set_user_access_level(user_access_level);
        self
    }

    /// Make the value writable in both access level and user access level.
    pub fn writable(mut self) -> Self {
        self.node
            .set_user_access_level(self.node.user_access_level() | AccessLevel::CURRENT_WRITE);
        self.node
            .set_access_level(self.node.access_level() | AccessLevel::CURRENT_WRITE);
        self
    }

    /// Set the minimum sampling interval of the variable in milliseconds.
    pub fn minimum_sampling_interval(mut self, minimum_sampling_interval: f64) -> Self {
        self.node
            .set_minimum_sampling_interval(minimum_sampling_interval);
        self
    }

    /// Set the write mask of the variable.
    pub fn write_mask(mut self, write_mask: WriteMask) -> Self {
        self.node.set_write_mask(write_mask);
        self
    }

    /// Replace inline value storage with an external data source.
    pub fn data_source(mut self, data_source: DataSource) -> Self {
        self.node.set_data_source(Some(data_source));
        self
    }

    /// Register notification callbacks around value reads and writes.
    pub fn value_callback(mut self, value_callback: ValueCallback) -> Self {
        self.node.set_value_callback(Some(value_callback));
        self
    }

    /// Add a `HasTypeDefinition` reference to the given variable type.
    pub fn has_type_definition(self, type_id: impl Into<NodeId>) -> Self {
        self.reference(
            type_id,
            ReferenceTypeId::HasTypeDefinition,
            ReferenceDirection::Forward,
        )
    }
}

/// A `Variable` is a type of node within the `AddressSpace`.
#[derive(Debug, Clone)]
pub struct Variable {
    pub(super) base: Base,
    pub(super) data_type: NodeId,
    pub(super) historizing: bool,
    pub(super) value_rank: i32,
    pub(super) value: DataValue,
    pub(super) access_level: AccessLevel,
    pub(super) user_access_level: AccessLevel,
    pub(super) array_dimensions: Option<Vec<u32>>,
    pub(super) minimum_sampling_interval: Option<f64>,
    pub(super) value_callback: Option<ValueCallback>,
    pub(super) data_source: Option<DataSource>,
}

impl Default for Variable {
    fn default() -> Self {
        Self {
            base: Base::new(NodeClass::Variable, &NodeId::null(), "", ""),
            data_type: NodeId::null(),
            historizing: false,
            value_rank: -1,
            value: DataValue::null(),
            access_level: AccessLevel::CURRENT_READ,
            user_access_level: AccessLevel::CURRENT_READ,
            array_dimensions: None,
            minimum_sampling_interval: None,
            value_callback: None,
            data_source: None,
        }
    }
}

node_base_impl!(Variable);

impl Node for Variable {
    fn get_attribute(&self, attribute_id: AttributeId) -> Option<DataValue> {
        match attribute_id {
            AttributeId::Value => Some(match self.read_value() {
                Ok(value) => value,
                Err(status) => DataValue {
                    status: Some(status),
                    ..Default::default()
                },
            }),
            AttributeId::DataType => Some(DataValue::value_only(self.data_type().clone())),
            AttributeId::ValueRank => Some(DataValue::value_only(self.value_rank())),
            AttributeId::AccessLevel => Some(DataValue::value_only(self.access_level().bits())),
            AttributeId::UserAccessLevel => {
                Some(DataValue::value_only(self.user_access_level().bits()))
            }
            AttributeId::Historizing => Some(DataValue::value_only(self.historizing())),
            // Optional attributes
            AttributeId::ArrayDimensions => {
                self.array_dimensions().map(|v| {
                    DataValue::value_only(to_u32_array(&v))
                })
            }
            AttributeId::MinimumSamplingInterval => self
                .minimum_sampling_interval()
                .map(DataValue::value_only),
            _ => self.base.get_attribute(attribute_id),
        }
    }

    fn set_attribute(
        &mut self,
        attribute_id: AttributeId,
        value: Variant,
    ) -> Result<(), StatusCode> {
        match attribute_id {
            AttributeId::DataType => {
                if let Variant::NodeId(v) = value {
                    self.set_data_type(*v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::ValueRank => {
                if let Variant::Int32(v) = value {
                    self.set_value_rank(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::Value => self.write_value(DataValue::new_now(value)),
            AttributeId::AccessLevel => {
                if let Variant::Byte(v) = value {
                    self.set_access_level(AccessLevel::from_bits_truncate(v));
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::UserAccessLevel => {
                if let Variant::Byte(v) = value {
                    self.set_user_access_level(AccessLevel::from_bits_truncate(v));
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::Historizing => {
                if let Variant::Boolean(v) = value {
                    self.set_historizing(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::ArrayDimensions => {
                let array_dimensions = <Vec<u32>>::try_from(&value);
                if let Ok(array_dimensions) = array_dimensions {
                    self.set_array_dimensions(&array_dimensions);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            AttributeId::MinimumSamplingInterval => {
                if let Variant::Double(v) = value {
                    self.set_minimum_sampling_interval(v);
                    Ok(())
                } else {
                    Err(StatusCode::BadTypeMismatch)
                }
            }
            _ => self.base.set_attribute(attribute_id, value),
        }
    }
}

fn to_u32_array(values: &[u32]) -> ua_types::Array {
    ua_types::Array {
        value_type: ua_types::VariantScalarTypeId::UInt32,
        values: values.iter().map(|v| Variant::UInt32(*v)).collect(),
        dimensions: None,
    }
}

impl Variable {
    /// Create a new variable with the given initial value.
    pub fn new(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        display_name: impl Into<LocalizedText>,
        data_type: impl Into<NodeId>,
        value: impl Into<Variant>,
    ) -> Variable {
        Variable {
            base: Base::new(NodeClass::Variable, node_id, browse_name, display_name),
            data_type: data_type.into(),
            value: DataValue::new_now(value),
            ..Default::default()
        }
    }

    /// Create a new variable from [VariableAttributes].
    pub fn from_attributes(
        node_id: &NodeId,
        browse_name: impl Into<QualifiedName>,
        attributes: VariableAttributes,
    ) -> Result<Self, FromAttributesError> {
        let mandatory_attributes = AttributesMask::DISPLAY_NAME
            | AttributesMask::ACCESS_LEVEL
            | AttributesMask::USER_ACCESS_LEVEL
            | AttributesMask::DATA_TYPE
            | AttributesMask::HISTORIZING
            | AttributesMask::VALUE
            | AttributesMask::VALUE_RANK;
        let mask = AttributesMask::from_bits(attributes.specified_attributes)
            .ok_or(FromAttributesError::InvalidMask)?;
        if mask.contains(mandatory_attributes) {
            let mut node = Variable {
                base: Base::new(
                    NodeClass::Variable,
                    node_id,
                    browse_name,
                    attributes.display_name,
                ),
                data_type: attributes.data_type,
                historizing: attributes.historizing,
                value_rank: attributes.value_rank,
                value: attributes.value,
                access_level: AccessLevel::from_bits_truncate(attributes.access_level),
                user_access_level: AccessLevel::from_bits_truncate(attributes.user_access_level),
                ..Default::default()
            };
            if mask.contains(AttributesMask::DESCRIPTION) {
                node.set_description(attributes.description);
            }
            if mask.contains(AttributesMask::WRITE_MASK) {
                node.set_write_mask(WriteMask::from_bits_truncate(attributes.write_mask));
            }
            if mask.contains(AttributesMask::USER_WRITE_MASK) {
                node.set_user_write_mask(WriteMask::from_bits_truncate(attributes.user_write_mask));
            }
            if mask.contains(AttributesMask::ARRAY_DIMENSIONS) {
                if let Some(array_dimensions) = attributes.array_dimensions {
                    node.set_array_dimensions(&array_dimensions);
                }
            }
            if mask.contains(AttributesMask::MINIMUM_SAMPLING_INTERVAL) {
                node.set_minimum_sampling_interval(attributes.minimum_sampling_interval);
            }
            Ok(node)
        } else {
            error!("Variable cannot be created from attributes - missing mandatory values");
            Err(FromAttributesError::MissingMandatoryValues)
        }
    }

    /// Get whether this variable is valid.
    pub fn is_valid(&self) -> bool {
        self.base.is_valid()
    }

    /// Which storage currently backs the value of this variable.
    pub fn value_source(&self) -> ValueSource {
        if self.data_source.is_some() {
            ValueSource::DataSource
        } else {
            ValueSource::Data
        }
    }

    /// Read the current value, from the data source when one is registered,
    /// the inline value otherwise.
    pub fn read_value(&self) -> Result<DataValue, StatusCode> {
        if let Some(source) = &self.data_source {
            return (source.read)(self.base.node_id());
        }
        if let Some(cb) = self.value_callback.as_ref().and_then(|v| v.on_read.as_ref()) {
            cb(self.base.node_id(), &self.value);
        }
        Ok(self.value.clone())
    }

    /// Write a new value, through the data source when one is registered,
    /// to the inline value otherwise.
    pub fn write_value(&mut self, value: DataValue) -> Result<(), StatusCode> {
        if let Some(source) = &self.data_source {
            let Some(write) = &source.write else {
                return Err(StatusCode::BadNotWritable);
            };
            return write(self.base.node_id(), &value);
        }
        self.value = value;
        if let Some(cb) = self
            .value_callback
            .as_ref()
            .and_then(|v| v.on_write.as_ref())
        {
            cb(self.base.node_id(), &self.value);
        }
        Ok(())
    }

    /// Set the inline value of the variable, timestamped now.
    pub fn set_value(&mut self, value: impl Into<Variant>) {
        self.value = DataValue::new_now(value);
    }

    /// Set the inline value of the variable to a full data value.
    pub fn set_data_value(&mut self, value: DataValue) {
        self.value = value;
    }

    /// Get the data type of this variable.
    pub fn data_type(&self) -> &NodeId {
        &self.data_type
    }

    /// Set the data type of this variable.
    pub fn set_data_type(&mut self, data_type: impl Into<NodeId>) {
        self.data_type = data_type.into();
    }

    /// Get whether this variable stores history.
    pub fn historizing(&self) -> bool {
        self.historizing
    }

    /// Set whether this variable stores history.
    pub fn set_historizing(&mut self, historizing: bool) {
        self.historizing = historizing;
    }

    /// Get the value rank of this variable.
    pub fn value_rank(&self) -> i32 {
        self.value_rank
    }

    /// Set the value rank of this variable.
    pub fn set_value_rank(&mut self, value_rank: i32) {
        self.value_rank = value_rank;
    }

    /// Get the array dimensions of this variable.
    pub fn array_dimensions(&self) -> Option<Vec<u32>> {
        self.array_dimensions.clone()
    }

    /// Set the array dimensions of this variable.
    pub fn set_array_dimensions(&mut self, array_dimensions: &[u32]) {
        self.array_dimensions = Some(array_dimensions.to_vec());
    }

    /// Clear the array dimensions of this variable.
    pub fn clear_array_dimensions(&mut self) {
        self.array_dimensions = None;
    }

    /// Get the access level of this variable.
    pub fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Set the access level of this variable.
    pub fn set_access_level(&mut self, access_level: AccessLevel) {
        self.access_level = access_level;
    }

    /// Get the user access level of this variable.
    pub fn user_access_level(&self) -> AccessLevel {
        self.user_access_level
    }

    /// Set the user access level of this variable.
    pub fn set_user_access_level(&mut self, user_access_level: AccessLevel) {
        self.user_access_level = user_access_level;
    }

    /// Get the minimum sampling interval of this variable in milliseconds.
    pub fn minimum_sampling_interval(&self) -> Option<f64> {
        self.minimum_sampling_interval
    }

    /// Set the minimum sampling interval of this variable in milliseconds.
    pub fn set_minimum_sampling_interval(&mut self, minimum_sampling_interval: f64) {
        self.minimum_sampling_interval = Some(minimum_sampling_interval);
    }

    /// Get the value callback of this variable.
    pub fn value_callback(&self) -> Option<&ValueCallback> {
        self.value_callback.as_ref()
    }

    /// Register or clear notification callbacks around value reads and
    /// writes.
    pub fn set_value_callback(&mut self, value_callback: Option<ValueCallback>) {
        self.value_callback = value_callback;
    }

    /// Get the data source of this variable.
    pub fn data_source(&self) -> Option<&DataSource> {
        self.data_source.as_ref()
    }

    /// Register or clear the external data source backing the value.
    pub fn set_data_source(&mut self, data_source: Option<DataSource>) {
        self.data_source = data_source;
    }
}
