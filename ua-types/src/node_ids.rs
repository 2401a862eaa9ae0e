// OPCUA for Rust
// SPDX-License-Identifier: MPL-2.0

//! Well-known namespace zero node ids used by the address space machinery.
//!
//! Numeric values are from the standard NodeIds table.

use crate::{errors::Error, node_id::Identifier, node_id::NodeId};

macro_rules! well_known_id {
    ( $enum_ty:ident ) => {
        impl From<$enum_ty> for NodeId {
            fn from(value: $enum_ty) -> Self {
                NodeId::new(0, value as u32)
            }
        }

        impl From<$enum_ty> for Identifier {
            fn from(value: $enum_ty) -> Self {
                Identifier::Numeric(value as u32)
            }
        }

        impl PartialEq<$enum_ty> for NodeId {
            fn eq(&self, other: &$enum_ty) -> bool {
                self.namespace == 0 && self.identifier == Identifier::Numeric(*other as u32)
            }
        }
    };
}

/// Builtin and abstract data type nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DataTypeId {
    /// Boolean.
    Boolean = 1,
    /// Signed 8 bit integer.
    SByte = 2,
    /// Unsigned 8 bit integer.
    Byte = 3,
    /// Signed 16 bit integer.
    Int16 = 4,
    /// Unsigned 16 bit integer.
    UInt16 = 5,
    /// Signed 32 bit integer.
    Int32 = 6,
    /// Unsigned 32 bit integer.
    UInt32 = 7,
    /// Signed 64 bit integer.
    Int64 = 8,
    /// Unsigned 64 bit integer.
    UInt64 = 9,
    /// 32 bit floating point number.
    Float = 10,
    /// 64 bit floating point number.
    Double = 11,
    /// UTF-8 string.
    String = 12,
    /// Timestamp.
    DateTime = 13,
    /// Globally unique identifier.
    Guid = 14,
    /// Run of bytes.
    ByteString = 15,
    /// XML element, kept for node ids only.
    XmlElement = 16,
    /// Node id.
    NodeId = 17,
    /// Expanded node id.
    ExpandedNodeId = 18,
    /// Status code.
    StatusCode = 19,
    /// Qualified name.
    QualifiedName = 20,
    /// Localized text.
    LocalizedText = 21,
    /// Abstract base type of all structures.
    Structure = 22,
    /// Data value.
    DataValue = 23,
    /// Abstract root of the data type hierarchy.
    BaseDataType = 24,
    /// Diagnostic info, kept for node ids only.
    DiagnosticInfo = 25,
    /// Abstract supertype of all numbers.
    Number = 26,
    /// Abstract supertype of the signed integers.
    Integer = 27,
    /// Abstract supertype of the unsigned integers.
    UInteger = 28,
    /// Abstract supertype of all enumerations.
    Enumeration = 29,
    /// Abstract supertype of image byte strings.
    Image = 30,
}

well_known_id!(DataTypeId);

impl TryFrom<&NodeId> for DataTypeId {
    type Error = Error;

    fn try_from(value: &NodeId) -> Result<Self, Self::Error> {
        if value.namespace != 0 {
            return Err(Error::NotBuiltinDataType);
        }
        let Identifier::Numeric(v) = value.identifier else {
            return Err(Error::NotBuiltinDataType);
        };
        Ok(match v {
            1 => DataTypeId::Boolean,
            2 => DataTypeId::SByte,
            3 => DataTypeId::Byte,
            4 => DataTypeId::Int16,
            5 => DataTypeId::UInt16,
            6 => DataTypeId::Int32,
            7 => DataTypeId::UInt32,
            8 => DataTypeId::Int64,
            9 => DataTypeId::UInt64,
            10 => DataTypeId::Float,
            11 => DataTypeId::Double,
            12 => DataTypeId::String,
            13 => DataTypeId::DateTime,
            14 => DataTypeId::Guid,
            15 => DataTypeId::ByteString,
            16 => DataTypeId::XmlElement,
            17 => DataTypeId::NodeId,
            18 => DataTypeId::ExpandedNodeId,
            19 => DataTypeId::StatusCode,
            20 => DataTypeId::QualifiedName,
            21 => DataTypeId::LocalizedText,
            22 => DataTypeId::Structure,
            23 => DataTypeId::DataValue,
            24 => DataTypeId::BaseDataType,
            25 => DataTypeId::DiagnosticInfo,
            26 => DataTypeId::Number,
            27 => DataTypeId::Integer,
            28 => DataTypeId::UInteger,
            29 => DataTypeId::Enumeration,
            30 => DataTypeId::Image,
            _ => return Err(Error::NotBuiltinDataType),
        })
    }
}

/// Reference type nodes that structure the address space.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ReferenceTypeId {
    /// Abstract root of the reference type hierarchy.
    References = 31,
    /// Abstract supertype of the non hierarchical references.
    NonHierarchicalReferences = 32,
    /// Abstract supertype of the hierarchical references.
    HierarchicalReferences = 33,
    /// Abstract supertype of references from parent to child.
    HasChild = 34,
    /// Loose organization of nodes, e.g. folder contents.
    Organizes = 35,
    /// Relates a notifier to the nodes it raises events for.
    HasEventSource = 36,
    /// Relates an instance declaration to its modelling rule.
    HasModellingRule = 37,
    /// Relates a data type to its encodings.
    HasEncoding = 38,
    /// Relates an encoding to its description.
    HasDescription = 39,
    /// Relates an instance to its type definition node.
    HasTypeDefinition = 40,
    /// Relates a type to the event types it can generate.
    GeneratesEvent = 41,
    /// Abstract supertype of references composing a node of its parts.
    Aggregates = 44,
    /// Relates a type to its subtypes.
    HasSubtype = 45,
    /// Relates a node to a property.
    HasProperty = 46,
    /// Relates a node to one of its components.
    HasComponent = 47,
    /// Relates a notifier to a contained notifier.
    HasNotifier = 48,
    /// HasComponent where the order of components matters.
    HasOrderedComponent = 49,
}

well_known_id!(ReferenceTypeId);

/// Well-known object nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ObjectId {
    /// Root of the address space.
    RootFolder = 84,
    /// Folder containing the server's instance hierarchy.
    ObjectsFolder = 85,
    /// Folder containing the type hierarchies.
    TypesFolder = 86,
    /// Folder containing views.
    ViewsFolder = 87,
    /// Folder containing the object types.
    ObjectTypesFolder = 88,
    /// Folder containing the variable types.
    VariableTypesFolder = 89,
    /// Folder containing the data types.
    DataTypesFolder = 90,
    /// Folder containing the reference types.
    ReferenceTypesFolder = 91,
}

well_known_id!(ObjectId);

/// Well-known object type nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ObjectTypeId {
    /// Root of the object type hierarchy.
    BaseObjectType = 58,
    /// Type of folder objects.
    FolderType = 61,
}

well_known_id!(ObjectTypeId);

/// Well-known variable type nodes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum VariableTypeId {
    /// Abstract root of the variable type hierarchy.
    BaseVariableType = 62,
    /// Type of plain data variables.
    BaseDataVariableType = 63,
    /// Type of property variables.
    PropertyType = 68,
}

well_known_id!(VariableTypeId);
