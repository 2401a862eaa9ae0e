//! The minimal namespace zero skeleton the mutation machinery depends on:
//! the well-known reference types, the builtin data type hierarchy, the base
//! object and variable types, and the folder hierarchy.
//!
//! This is deliberately not a full standard nodeset. Embedders that need
//! one import it on top; everything here uses the ordinary store and
//! reference paths.

use ua_nodes::{
    DataTypeBuilder, EventNotifier, ObjectBuilder, ObjectTypeBuilder, ReferenceTypeBuilder,
    VariableTypeBuilder,
};
use ua_types::{DataTypeId, NodeId, ObjectId, ObjectTypeId, ReferenceTypeId, VariableTypeId};

use super::AddressSpace;

pub(super) fn populate(space: &mut AddressSpace) {
    add_reference_types(space);
    add_data_types(space);
    add_object_types(space);
    add_variable_types(space);
    add_folders(space);
}

fn add_reference_types(space: &mut AddressSpace) {
    use ReferenceTypeId::*;

    // (type, supertype, inverse name, symmetric, abstract)
    let reference_types: &[(ReferenceTypeId, Option<ReferenceTypeId>, Option<&str>, bool, bool)] = &[
        (References, None, None, true, true),
        (HierarchicalReferences, Some(References), None, false, true),
        (NonHierarchicalReferences, Some(References), None, false, true),
        (HasChild, Some(HierarchicalReferences), Some("ChildOf"), false, true),
        (Organizes, Some(HierarchicalReferences), Some("OrganizedBy"), false, false),
        (HasEventSource, Some(HierarchicalReferences), Some("EventSourceOf"), false, false),
        (HasNotifier, Some(HasEventSource), Some("NotifierOf"), false, false),
        (Aggregates, Some(HasChild), Some("AggregatedBy"), false, true),
        (HasSubtype, Some(HasChild), Some("SubtypeOf"), false, false),
        (HasProperty, Some(Aggregates), Some("PropertyOf"), false, false),
        (HasComponent, Some(Aggregates), Some("ComponentOf"), false, false),
        (HasOrderedComponent, Some(HasComponent), Some("OrderedComponentOf"), false, false),
        (HasTypeDefinition, Some(NonHierarchicalReferences), Some("TypeDefinitionOf"), false, false),
    ];

    for (type_id, supertype, inverse_name, symmetric, is_abstract) in reference_types {
        let name = format!("{:?}", type_id);
        let id: NodeId = (*type_id).into();
        let mut builder = ReferenceTypeBuilder::new(&id, name.as_str(), name.as_str())
            .symmetric(*symmetric)
            .is_abstract(*is_abstract);
        if let Some(inverse_name) = inverse_name {
            builder = builder.inverse_name(*inverse_name);
        }
        if let Some(supertype) = supertype {
            builder = builder.subtype_of(*supertype);
        }
        builder.insert(space);
    }
}

fn add_data_types(space: &mut AddressSpace) {
    use DataTypeId::*;

    // (type, supertype, abstract)
    let data_types: &[(DataTypeId, Option<DataTypeId>, bool)] = &[
        (BaseDataType, None, true),
        (Boolean, Some(BaseDataType), false),
        (Number, Some(BaseDataType), true),
        (Integer, Some(Number), true),
        (UInteger, Some(Number), true),
        (SByte, Some(Integer), false),
        (Int16, Some(Integer), false),
        (Int32, Some(Integer), false),
        (Int64, Some(Integer), false),
        (Byte, Some(UInteger), false),
        (UInt16, Some(UInteger), false),
        (UInt32, Some(UInteger), false),
        (UInt64, Some(UInteger), false),
        (Float, Some(Number), false),
        (Double, Some(Number), false),
        (String, Some(BaseDataType), false),
        (DateTime, Some(BaseDataType), false),
        (Guid, Some(BaseDataType), false),
        (ByteString, Some(BaseDataType), false),
        (Image, Some(ByteString), true),
        (XmlElement, Some(BaseDataType), false),
        (NodeId, Some(BaseDataType), false),
        (ExpandedNodeId, Some(BaseDataType), false),
        (StatusCode, Some(BaseDataType), false),
        (QualifiedName, Some(BaseDataType), false),
        (LocalizedText, Some(BaseDataType), false),
        (Structure, Some(BaseDataType), true),
        (DataValue, Some(BaseDataType), false),
        (DiagnosticInfo, Some(BaseDataType), false),
        (Enumeration, Some(BaseDataType), true),
    ];

    for (type_id, supertype, is_abstract) in data_types {
        let name = format!("{:?}", type_id);
        let id: ua_types::NodeId = (*type_id).into();
        let mut builder =
            DataTypeBuilder::new(&id, name.as_str(), name.as_str()).is_abstract(*is_abstract);
        if let Some(supertype) = supertype {
            builder = builder.subtype_of(*supertype);
        }
        builder.insert(space);
    }
}

fn add_object_types(space: &mut AddressSpace) {
    let base: NodeId = ObjectTypeId::BaseObjectType.into();
    ObjectTypeBuilder::new(&base, "BaseObjectType", "BaseObjectType").insert(space);

    let folder: NodeId = ObjectTypeId::FolderType.into();
    ObjectTypeBuilder::new(&folder, "FolderType", "FolderType")
        .subtype_of(ObjectTypeId::BaseObjectType)
        .insert(space);
}

fn add_variable_types(space: &mut AddressSpace) {
    let base: NodeId = VariableTypeId::BaseVariableType.into();
    VariableTypeBuilder::new(&base, "BaseVariableType", "BaseVariableType")
        .is_abstract(true)
        .data_type(DataTypeId::BaseDataType)
        .value_rank(-2)
        .insert(space);

    let data_variable: NodeId = VariableTypeId::BaseDataVariableType.into();
    VariableTypeBuilder::new(&data_variable, "BaseDataVariableType", "BaseDataVariableType")
        .subtype_of(VariableTypeId::BaseVariableType)
        .data_type(DataTypeId::BaseDataType)
        .value_rank(-2)
        .insert(space);

    let property: NodeId = VariableTypeId::PropertyType.into();
    VariableTypeBuilder::new(&property, "PropertyType", "PropertyType")
        .subtype_of(VariableTypeId::BaseVariableType)
        .data_type(DataTypeId::BaseDataType)
        .value_rank(-2)
        .insert(space);
}

fn add_folders(space: &mut AddressSpace) {
    let root: NodeId = ObjectId::RootFolder.into();
    ObjectBuilder::new(&root, "Root", "Root")
        .is_folder()
        .event_notifier(EventNotifier::empty())
        .insert(space);

    // (folder, name, organized by)
    let folders: &[(ObjectId, &str, ObjectId)] = &[
        (ObjectId::ObjectsFolder, "Objects", ObjectId::RootFolder),
        (ObjectId::TypesFolder, "Types", ObjectId::RootFolder),
        (ObjectId::ViewsFolder, "Views", ObjectId::RootFolder),
        (ObjectId::ObjectTypesFolder, "ObjectTypes", ObjectId::TypesFolder),
        (ObjectId::VariableTypesFolder, "VariableTypes", ObjectId::TypesFolder),
        (ObjectId::DataTypesFolder, "DataTypes", ObjectId::TypesFolder),
        (ObjectId::ReferenceTypesFolder, "ReferenceTypes", ObjectId::TypesFolder),
    ];

    for (folder, name, parent) in folders {
        let id: NodeId = (*folder).into();
        ObjectBuilder::new(&id, *name, *name)
            .is_folder()
            .organized_by(*parent)
            .insert(space);
    }

    // Hang the roots of the type hierarchies under their folders.
    let organizes: &[(ObjectId, NodeId)] = &[
        (ObjectId::ObjectTypesFolder, ObjectTypeId::BaseObjectType.into()),
        (ObjectId::VariableTypesFolder, VariableTypeId::BaseVariableType.into()),
        (ObjectId::DataTypesFolder, DataTypeId::BaseDataType.into()),
        (ObjectId::ReferenceTypesFolder, ReferenceTypeId::References.into()),
    ];
    for (folder, target) in organizes {
        let folder: NodeId = (*folder).into();
        space
            .references_mut()
            .insert_reference(&folder, target, ReferenceTypeId::Organizes);
    }
}
