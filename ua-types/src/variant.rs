// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Contains the implementation of `Variant`.

use crate::{
    byte_string::ByteString, date_time::DateTime, errors::Error, expanded_node_id::ExpandedNodeId,
    guid::Guid, localized_text::LocalizedText, node_id::NodeId, node_ids::DataTypeId,
    qualified_name::QualifiedName, status_code::StatusCode, string::UAString,
};

/// The scalar type held by a variant, or by every element of a variant array.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VariantScalarTypeId {
    /// Boolean.
    Boolean,
    /// Signed 8 bit integer.
    SByte,
    /// Unsigned 8 bit integer.
    Byte,
    /// Signed 16 bit integer.
    Int16,
    /// Unsigned 16 bit integer.
    UInt16,
    /// Signed 32 bit integer.
    Int32,
    /// Unsigned 32 bit integer.
    UInt32,
    /// Signed 64 bit integer.
    Int64,
    /// Unsigned 64 bit integer.
    UInt64,
    /// 32 bit floating point number.
    Float,
    /// 64 bit floating point number.
    Double,
    /// UTF-8 string.
    String,
    /// Timestamp.
    DateTime,
    /// Globally unique identifier.
    Guid,
    /// Run of bytes.
    ByteString,
    /// Status code.
    StatusCode,
    /// Qualified name.
    QualifiedName,
    /// Localized text.
    LocalizedText,
    /// Node id.
    NodeId,
    /// Expanded node id.
    ExpandedNodeId,
}

impl VariantScalarTypeId {
    /// The data type node describing values of this type.
    pub fn data_type_id(&self) -> DataTypeId {
        match self {
            VariantScalarTypeId::Boolean => DataTypeId::Boolean,
            VariantScalarTypeId::SByte => DataTypeId::SByte,
            VariantScalarTypeId::Byte => DataTypeId::Byte,
            VariantScalarTypeId::Int16 => DataTypeId::Int16,
            VariantScalarTypeId::UInt16 => DataTypeId::UInt16,
            VariantScalarTypeId::Int32 => DataTypeId::Int32,
            VariantScalarTypeId::UInt32 => DataTypeId::UInt32,
            VariantScalarTypeId::Int64 => DataTypeId::Int64,
            VariantScalarTypeId::UInt64 => DataTypeId::UInt64,
            VariantScalarTypeId::Float => DataTypeId::Float,
            VariantScalarTypeId::Double => DataTypeId::Double,
            VariantScalarTypeId::String => DataTypeId::String,
            VariantScalarTypeId::DateTime => DataTypeId::DateTime,
            VariantScalarTypeId::Guid => DataTypeId::Guid,
            VariantScalarTypeId::ByteString => DataTypeId::ByteString,
            VariantScalarTypeId::StatusCode => DataTypeId::StatusCode,
            VariantScalarTypeId::QualifiedName => DataTypeId::QualifiedName,
            VariantScalarTypeId::LocalizedText => DataTypeId::LocalizedText,
            VariantScalarTypeId::NodeId => DataTypeId::NodeId,
            VariantScalarTypeId::ExpandedNodeId => DataTypeId::ExpandedNodeId,
        }
    }

    /// The scalar type for a builtin data type node, `None` for abstract
    /// or structured data types that have no variant representation.
    pub fn from_data_type_id(id: DataTypeId) -> Option<Self> {
        Some(match id {
            DataTypeId::Boolean => VariantScalarTypeId::Boolean,
            DataTypeId::SByte => VariantScalarTypeId::SByte,
            DataTypeId::Byte => VariantScalarTypeId::Byte,
            DataTypeId::Int16 => VariantScalarTypeId::Int16,
            DataTypeId::UInt16 => VariantScalarTypeId::UInt16,
            DataTypeId::Int32 => VariantScalarTypeId::Int32,
            DataTypeId::UInt32 => VariantScalarTypeId::UInt32,
            DataTypeId::Int64 => VariantScalarTypeId::Int64,
            DataTypeId::UInt64 => VariantScalarTypeId::UInt64,
            DataTypeId::Float => VariantScalarTypeId::Float,
            DataTypeId::Double => VariantScalarTypeId::Double,
            DataTypeId::String => VariantScalarTypeId::String,
            DataTypeId::DateTime => VariantScalarTypeId::DateTime,
            DataTypeId::Guid => VariantScalarTypeId::Guid,
            DataTypeId::ByteString => VariantScalarTypeId::ByteString,
            DataTypeId::StatusCode => VariantScalarTypeId::StatusCode,
            DataTypeId::QualifiedName => VariantScalarTypeId::QualifiedName,
            DataTypeId::LocalizedText => VariantScalarTypeId::LocalizedText,
            DataTypeId::NodeId => VariantScalarTypeId::NodeId,
            DataTypeId::ExpandedNodeId => VariantScalarTypeId::ExpandedNodeId,
            _ => return None,
        })
    }

    /// The scalar type for a data type node id, if it names a builtin
    /// concrete data type.
    pub fn from_data_type(id: &NodeId) -> Option<Self> {
        DataTypeId::try_from(id).ok().and_then(Self::from_data_type_id)
    }

    /// Whether this type is one of the integer or floating point types.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            VariantScalarTypeId::SByte
                | VariantScalarTypeId::Byte
                | VariantScalarTypeId::Int16
                | VariantScalarTypeId::UInt16
                | VariantScalarTypeId::Int32
                | VariantScalarTypeId::UInt32
                | VariantScalarTypeId::Int64
                | VariantScalarTypeId::UInt64
                | VariantScalarTypeId::Float
                | VariantScalarTypeId::Double
        )
    }
}

/// A multi dimensional array of variants, all of the same scalar type.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
    /// The scalar type of every element.
    pub value_type: VariantScalarTypeId,
    /// Elements in flat row-major order.
    pub values: Vec<Variant>,
    /// Explicit dimensions, a flat one dimensional array when absent.
    pub dimensions: Option<Vec<u32>>,
}

impl Array {
    /// Create a one dimensional array.
    pub fn new(
        value_type: VariantScalarTypeId,
        values: impl Into<Vec<Variant>>,
    ) -> Result<Array, Error> {
        let values = values.into();
        if !values_are_of_type(&values, value_type) {
            return Err(Error::InvalidArrayContents);
        }
        Ok(Array {
            value_type,
            values,
            dimensions: None,
        })
    }

    /// Create an array with explicit dimensions. The product of the
    /// dimensions must match the number of values.
    pub fn new_multi(
        value_type: VariantScalarTypeId,
        values: impl Into<Vec<Variant>>,
        dimensions: Vec<u32>,
    ) -> Result<Array, Error> {
        let values = values.into();
        if !values_are_of_type(&values, value_type) {
            return Err(Error::InvalidArrayContents);
        }
        let expected: u64 = dimensions.iter().map(|d| *d as u64).product();
        if expected != values.len() as u64 {
            return Err(Error::InvalidArrayDimensions);
        }
        Ok(Array {
            value_type,
            values,
            dimensions: Some(dimensions),
        })
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Dimensions of the array, a single dimension of the value count when
    /// none were given explicitly.
    pub fn effective_dimensions(&self) -> Vec<u32> {
        match &self.dimensions {
            Some(d) => d.clone(),
            None => vec![self.values.len() as u32],
        }
    }
}

fn values_are_of_type(values: &[Variant], value_type: VariantScalarTypeId) -> bool {
    values.iter().all(|v| v.scalar_type_id() == Some(value_type))
}

/// A tagged union over the builtin OPC UA scalar types and arrays of them.
///
/// Larger values are boxed to keep the variant itself small.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// The empty variant, carrying no value.
    #[default]
    Empty,
    /// Boolean.
    Boolean(bool),
    /// Signed 8 bit integer.
    SByte(i8),
    /// Unsigned 8 bit integer.
    Byte(u8),
    /// Signed 16 bit integer.
    Int16(i16),
    /// Unsigned 16 bit integer.
    UInt16(u16),
    /// Signed 32 bit integer.
    Int32(i32),
    /// Unsigned 32 bit integer.
    UInt32(u32),
    /// Signed 64 bit integer.
    Int64(i64),
    /// Unsigned 64 bit integer.
    UInt64(u64),
    /// 32 bit floating point number.
    Float(f32),
    /// 64 bit floating point number.
    Double(f64),
    /// UTF-8 string.
    String(UAString),
    /// Timestamp.
    DateTime(Box<DateTime>),
    /// Globally unique identifier.
    Guid(Box<Guid>),
    /// Status code.
    StatusCode(StatusCode),
    /// Run of bytes.
    ByteString(ByteString),
    /// Qualified name.
    QualifiedName(Box<QualifiedName>),
    /// Localized text.
    LocalizedText(Box<LocalizedText>),
    /// Node id.
    NodeId(Box<NodeId>),
    /// Expanded node id.
    ExpandedNodeId(Box<ExpandedNodeId>),
    /// Array of scalars.
    Array(Box<Array>),
}

impl Variant {
    /// Whether this is the empty variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Whether this is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, Variant::Array(_))
    }

    /// The scalar type of this value; `None` for `Empty` and arrays.
    pub fn scalar_type_id(&self) -> Option<VariantScalarTypeId> {
        Some(match self {
            Variant::Boolean(_) => VariantScalarTypeId::Boolean,
            Variant::SByte(_) => VariantScalarTypeId::SByte,
            Variant::Byte(_) => VariantScalarTypeId::Byte,
            Variant::Int16(_) => VariantScalarTypeId::Int16,
            Variant::UInt16(_) => VariantScalarTypeId::UInt16,
            Variant::Int32(_) => VariantScalarTypeId::Int32,
            Variant::UInt32(_) => VariantScalarTypeId::UInt32,
            Variant::Int64(_) => VariantScalarTypeId::Int64,
            Variant::UInt64(_) => VariantScalarTypeId::UInt64,
            Variant::Float(_) => VariantScalarTypeId::Float,
            Variant::Double(_) => VariantScalarTypeId::Double,
            Variant::String(_) => VariantScalarTypeId::String,
            Variant::DateTime(_) => VariantScalarTypeId::DateTime,
            Variant::Guid(_) => VariantScalarTypeId::Guid,
            Variant::StatusCode(_) => VariantScalarTypeId::StatusCode,
            Variant::ByteString(_) => VariantScalarTypeId::ByteString,
            Variant::QualifiedName(_) => VariantScalarTypeId::QualifiedName,
            Variant::LocalizedText(_) => VariantScalarTypeId::LocalizedText,
            Variant::NodeId(_) => VariantScalarTypeId::NodeId,
            Variant::ExpandedNodeId(_) => VariantScalarTypeId::ExpandedNodeId,
            Variant::Empty | Variant::Array(_) => return None,
        })
    }

    /// The scalar type of this value, or of the elements for an array.
    pub fn value_type_id(&self) -> Option<VariantScalarTypeId> {
        match self {
            Variant::Array(a) => Some(a.value_type),
            v => v.scalar_type_id(),
        }
    }

    /// The data type node id describing this value, element type for arrays.
    pub fn data_type(&self) -> Option<NodeId> {
        self.value_type_id().map(|t| t.data_type_id().into())
    }

    /// Dimensions of the value, `None` for scalars.
    pub fn array_dimensions(&self) -> Option<Vec<u32>> {
        match self {
            Variant::Array(a) => Some(a.effective_dimensions()),
            _ => None,
        }
    }

    /// A zero initialized scalar of the given type.
    pub fn null_scalar(value_type: VariantScalarTypeId) -> Variant {
        match value_type {
            VariantScalarTypeId::Boolean => Variant::Boolean(false),
            VariantScalarTypeId::SByte => Variant::SByte(0),
            VariantScalarTypeId::Byte => Variant::Byte(0),
            VariantScalarTypeId::Int16 => Variant::Int16(0),
            VariantScalarTypeId::UInt16 => Variant::UInt16(0),
            VariantScalarTypeId::Int32 => Variant::Int32(0),
            VariantScalarTypeId::UInt32 => Variant::UInt32(0),
            VariantScalarTypeId::Int64 => Variant::Int64(0),
            VariantScalarTypeId::UInt64 => Variant::UInt64(0),
            VariantScalarTypeId::Float => Variant::Float(0.0),
            VariantScalarTypeId::Double => Variant::Double(0.0),
            VariantScalarTypeId::String => Variant::String(UAString::null()),
            VariantScalarTypeId::DateTime => Variant::DateTime(Box::new(DateTime::null())),
            VariantScalarTypeId::Guid => Variant::Guid(Box::new(Guid::null())),
            VariantScalarTypeId::StatusCode => Variant::StatusCode(StatusCode::Good),
            VariantScalarTypeId::ByteString => Variant::ByteString(ByteString::null()),
            VariantScalarTypeId::QualifiedName => {
                Variant::QualifiedName(Box::new(QualifiedName::null()))
            }
            VariantScalarTypeId::LocalizedText => {
                Variant::LocalizedText(Box::new(LocalizedText::null()))
            }
            VariantScalarTypeId::NodeId => Variant::NodeId(Box::new(NodeId::null())),
            VariantScalarTypeId::ExpandedNodeId => {
                Variant::ExpandedNodeId(Box::new(ExpandedNodeId::null()))
            }
        }
    }

    /// An empty one dimensional array of the given type.
    pub fn empty_array(value_type: VariantScalarTypeId) -> Variant {
        Variant::Array(Box::new(Array {
            value_type,
            values: Vec::new(),
            dimensions: None,
        }))
    }

    /// The value as a signed 64 bit integer, for integer and boolean values.
    fn as_i64(&self) -> Option<i64> {
        match *self {
            Variant::Boolean(v) => Some(v as i64),
            Variant::SByte(v) => Some(v as i64),
            Variant::Byte(v) => Some(v as i64),
            Variant::Int16(v) => Some(v as i64),
            Variant::UInt16(v) => Some(v as i64),
            Variant::Int32(v) => Some(v as i64),
            Variant::UInt32(v) => Some(v as i64),
            Variant::Int64(v) => Some(v),
            Variant::UInt64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    /// The value as an unsigned 64 bit integer, for non-negative integers.
    fn as_u64(&self) -> Option<u64> {
        match *self {
            Variant::UInt64(v) => Some(v),
            _ => self.as_i64().and_then(|v| u64::try_from(v).ok()),
        }
    }

    /// The value as a 64 bit float, for all numeric and boolean values.
    fn as_f64(&self) -> Option<f64> {
        match *self {
            Variant::Float(v) => Some(v as f64),
            Variant::Double(v) => Some(v),
            _ => self.as_i64().map(|v| v as f64),
        }
    }

    /// Cast the value to the target scalar type, returning `Empty` when the
    /// value cannot represent the target type. Integer casts are range
    /// checked; floating point values do not cast to integers. Arrays cast
    /// element-wise and fail as a whole if any element fails.
    pub fn cast(&self, target: VariantScalarTypeId) -> Variant {
        if self.scalar_type_id() == Some(target) {
            return self.clone();
        }
        match self {
            Variant::Array(a) => {
                let mut values = Vec::with_capacity(a.values.len());
                for v in &a.values {
                    let cast = v.cast(target);
                    if cast.is_empty() {
                        return Variant::Empty;
                    }
                    values.push(cast);
                }
                Variant::Array(Box::new(Array {
                    value_type: target,
                    values,
                    dimensions: a.dimensions.clone(),
                }))
            }
            Variant::String(s) => match s.value() {
                Some(s) => cast_str(s, target),
                None => Variant::Empty,
            },
            _ => match target {
                VariantScalarTypeId::Boolean => self
                    .as_i64()
                    .map(|v| Variant::Boolean(v != 0))
                    .unwrap_or(Variant::Empty),
                VariantScalarTypeId::SByte => {
                    cast_integer(self.as_i64(), |v| i8::try_from(v).ok(), Variant::SByte)
                }
                VariantScalarTypeId::Byte => {
                    cast_integer(self.as_u64(), |v| u8::try_from(v).ok(), Variant::Byte)
                }
                VariantScalarTypeId::Int16 => {
                    cast_integer(self.as_i64(), |v| i16::try_from(v).ok(), Variant::Int16)
                }
                VariantScalarTypeId::UInt16 => {
                    cast_integer(self.as_u64(), |v| u16::try_from(v).ok(), Variant::UInt16)
                }
                VariantScalarTypeId::Int32 => {
                    cast_integer(self.as_i64(), |v| i32::try_from(v).ok(), Variant::Int32)
                }
                VariantScalarTypeId::UInt32 => {
                    cast_integer(self.as_u64(), |v| u32::try_from(v).ok(), Variant::UInt32)
                }
                VariantScalarTypeId::Int64 => {
                    self.as_i64().map(Variant::Int64).unwrap_or(Variant::Empty)
                }
                VariantScalarTypeId::UInt64 => {
                    self.as_u64().map(Variant::UInt64).unwrap_or(Variant::Empty)
                }
                VariantScalarTypeId::Float => self
                    .as_f64()
                    .map(|v| Variant::Float(v as f32))
                    .unwrap_or(Variant::Empty),
                VariantScalarTypeId::Double => {
                    self.as_f64().map(Variant::Double).unwrap_or(Variant::Empty)
                }
                VariantScalarTypeId::String => match self {
                    Variant::Boolean(v) => Variant::String(v.to_string().into()),
                    v => match v.as_f64() {
                        Some(_) => Variant::String(scalar_to_string(v).into()),
                        None => Variant::Empty,
                    },
                },
                _ => Variant::Empty,
            },
        }
    }
}

fn cast_integer<W, T>(
    value: Option<W>,
    convert: impl Fn(W) -> Option<T>,
    wrap: impl Fn(T) -> Variant,
) -> Variant {
    value.and_then(convert).map(wrap).unwrap_or(Variant::Empty)
}

fn scalar_to_string(value: &Variant) -> String {
    match *value {
        Variant::SByte(v) => v.to_string(),
        Variant::Byte(v) => v.to_string(),
        Variant::Int16(v) => v.to_string(),
        Variant::UInt16(v) => v.to_string(),
        Variant::Int32(v) => v.to_string(),
        Variant::UInt32(v) => v.to_string(),
        Variant::Int64(v) => v.to_string(),
        Variant::UInt64(v) => v.to_string(),
        Variant::Float(v) => v.to_string(),
        Variant::Double(v) => v.to_string(),
        _ => String::new(),
    }
}

fn cast_str(s: &str, target: VariantScalarTypeId) -> Variant {
    match target {
        VariantScalarTypeId::Boolean => s.parse().map(Variant::Boolean).unwrap_or(Variant::Empty),
        VariantScalarTypeId::SByte => s.parse().map(Variant::SByte).unwrap_or(Variant::Empty),
        VariantScalarTypeId::Byte => s.parse().map(Variant::Byte).unwrap_or(Variant::Empty),
        VariantScalarTypeId::Int16 => s.parse().map(Variant::Int16).unwrap_or(Variant::Empty),
        VariantScalarTypeId::UInt16 => s.parse().map(Variant::UInt16).unwrap_or(Variant::Empty),
        VariantScalarTypeId::Int32 => s.parse().map(Variant::Int32).unwrap_or(Variant::Empty),
        VariantScalarTypeId::UInt32 => s.parse().map(Variant::UInt32).unwrap_or(Variant::Empty),
        VariantScalarTypeId::Int64 => s.parse().map(Variant::Int64).unwrap_or(Variant::Empty),
        VariantScalarTypeId::UInt64 => s.parse().map(Variant::UInt64).unwrap_or(Variant::Empty),
        VariantScalarTypeId::Float => s.parse().map(Variant::Float).unwrap_or(Variant::Empty),
        VariantScalarTypeId::Double => s.parse().map(Variant::Double).unwrap_or(Variant::Empty),
        _ => Variant::Empty,
    }
}

impl TryFrom<&Variant> for Vec<u32> {
    type Error = Error;

    fn try_from(value: &Variant) -> Result<Self, Self::Error> {
        let Variant::Array(a) = value else {
            return Err(Error::VariantConversion);
        };
        a.values
            .iter()
            .map(|v| match v {
                Variant::UInt32(v) => Ok(*v),
                _ => Err(Error::VariantConversion),
            })
            .collect()
    }
}

macro_rules! variant_from {
    ( $( ($ty:ty, $variant:ident) ),* ) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::$variant(value)
                }
            }
        )*
    };
}

macro_rules! variant_from_boxed {
    ( $( ($ty:ty, $variant:ident) ),* ) => {
        $(
            impl From<$ty> for Variant {
                fn from(value: $ty) -> Self {
                    Variant::$variant(Box::new(value))
                }
            }
        )*
    };
}

variant_from!(
    (bool, Boolean),
    (i8, SByte),
    (u8, Byte),
    (i16, Int16),
    (u16, UInt16),
    (i32, Int32),
    (u32, UInt32),
    (i64, Int64),
    (u64, UInt64),
    (f32, Float),
    (f64, Double),
    (UAString, String),
    (StatusCode, StatusCode),
    (ByteString, ByteString)
);

variant_from_boxed!(
    (DateTime, DateTime),
    (Guid, Guid),
    (QualifiedName, QualifiedName),
    (LocalizedText, LocalizedText),
    (NodeId, NodeId),
    (ExpandedNodeId, ExpandedNodeId)
);

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::String(value.into())
    }
}

impl From<String> for Variant {
    fn from(value: String) -> Self {
        Variant::String(value.into())
    }
}

impl From<&NodeId> for Variant {
    fn from(value: &NodeId) -> Self {
        Variant::NodeId(Box::new(value.clone()))
    }
}

impl From<Array> for Variant {
    fn from(value: Array) -> Self {
        Variant::Array(Box::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::{Array, Variant, VariantScalarTypeId};

    #[test]
    fn cast_integers_range_checked() {
        assert_eq!(
            Variant::Int32(200).cast(VariantScalarTypeId::Byte),
            Variant::Byte(200)
        );
        assert_eq!(
            Variant::Int32(300).cast(VariantScalarTypeId::Byte),
            Variant::Empty
        );
        assert_eq!(
            Variant::Int32(-1).cast(VariantScalarTypeId::UInt32),
            Variant::Empty
        );
    }

    #[test]
    fn cast_string_roundtrip() {
        assert_eq!(
            Variant::from("42").cast(VariantScalarTypeId::Int32),
            Variant::Int32(42)
        );
        assert_eq!(
            Variant::Int32(42).cast(VariantScalarTypeId::String),
            Variant::from("42")
        );
    }

    #[test]
    fn cast_array_elementwise() {
        let arr: Variant = Array::new(
            VariantScalarTypeId::Int32,
            vec![Variant::Int32(1), Variant::Int32(2)],
        )
        .unwrap()
        .into();
        let cast = arr.cast(VariantScalarTypeId::Int64);
        let Variant::Array(cast) = cast else {
            panic!("expected array");
        };
        assert_eq!(cast.value_type, VariantScalarTypeId::Int64);
        assert_eq!(cast.values, vec![Variant::Int64(1), Variant::Int64(2)]);
    }

    #[test]
    fn array_dimension_mismatch() {
        assert!(Array::new_multi(
            VariantScalarTypeId::Int32,
            vec![Variant::Int32(1), Variant::Int32(2), Variant::Int32(3)],
            vec![2, 2],
        )
        .is_err());
    }

    #[test]
    fn data_type_of_array_is_element_type() {
        let arr: Variant = Array::new(VariantScalarTypeId::Double, vec![Variant::Double(1.0)])
            .unwrap()
            .into();
        assert_eq!(
            arr.data_type(),
            Some(crate::DataTypeId::Double.into())
        );
        assert_eq!(arr.array_dimensions(), Some(vec![1]));
    }
}
