use std::sync::Arc;

use parking_lot::Mutex;
use ua_types::{
    AddNodesItem, AddNodesResult, AddReferencesItem, AttributesMask, BrowseDirection, DataTypeId,
    DataValue, DeleteNodesItem, DeleteReferencesItem, ExpandedNodeId, NodeClass, NodeId, ObjectId,
    ObjectTypeAttributes, ObjectTypeId, QualifiedName, ReferenceTypeId, StatusCode,
    VariableAttributes, VariableTypeId, Variant,
};

use crate::{
    AddressSpaceManager, ExternalNamespaceManager, InstanceHandle, MethodBuilder, MethodCallback,
    NodeBase, NodeLifecycle, NodeType, ObjectBuilder, ObjectTypeBuilder, ReferenceTypeBuilder,
    VariableBuilder, VariableTypeBuilder,
};

const TEST_NAMESPACE: &str = "urn:ua-address-space:tests";

fn test_manager() -> AddressSpaceManager {
    let manager = AddressSpaceManager::new();
    assert_eq!(manager.add_namespace(TEST_NAMESPACE), 1);
    manager
}

fn objects_folder() -> NodeId {
    ObjectId::ObjectsFolder.into()
}

fn organizes() -> NodeId {
    ReferenceTypeId::Organizes.into()
}

fn has_component() -> NodeId {
    ReferenceTypeId::HasComponent.into()
}

fn has_subtype() -> NodeId {
    ReferenceTypeId::HasSubtype.into()
}

fn base_data_variable_type() -> NodeId {
    VariableTypeId::BaseDataVariableType.into()
}

/// An object type in ns=1 aggregating a Double variable "Temp" with
/// initial value 0.0.
fn add_my_type(manager: &AddressSpaceManager) -> NodeId {
    let my_type = NodeId::new(1, 1000u32);
    manager
        .add_node(
            ObjectTypeBuilder::new(&my_type, (1, "MyType"), "MyType").build(),
            Some((&ObjectTypeId::BaseObjectType.into(), &has_subtype())),
            None,
        )
        .unwrap();
    let temp = NodeId::new(1, 1001u32);
    manager
        .add_node(
            VariableBuilder::new(&temp, (1, "Temp"), "Temp")
                .data_type(DataTypeId::Double)
                .value(0.0f64)
                .build(),
            Some((&my_type, &has_component())),
            Some(&base_data_variable_type()),
        )
        .unwrap();
    my_type
}

fn component_children(manager: &AddressSpaceManager, node_id: &NodeId) -> Vec<NodeId> {
    manager
        .read()
        .find_references(
            node_id,
            Some((ReferenceTypeId::HasComponent, true)),
            BrowseDirection::Forward,
        )
        .map(|r| r.target_node.clone())
        .collect()
}

mod add_nodes {
    use super::*;

    fn object_type_item(node_id: NodeId, browse_name: &str, is_abstract: bool) -> AddNodesItem {
        AddNodesItem {
            parent_node_id: ExpandedNodeId::new(ObjectTypeId::BaseObjectType),
            reference_type_id: has_subtype(),
            requested_new_node_id: node_id.into(),
            browse_name: QualifiedName::new(1, browse_name),
            node_class: NodeClass::ObjectType,
            node_attributes: ua_types::AddNodeAttributes::ObjectType(ObjectTypeAttributes {
                specified_attributes: (AttributesMask::DISPLAY_NAME | AttributesMask::IS_ABSTRACT)
                    .bits(),
                display_name: browse_name.into(),
                is_abstract,
                ..Default::default()
            }),
            type_definition: ExpandedNodeId::null(),
        }
    }

    fn variable_item(
        node_id: NodeId,
        browse_name: &str,
        data_type: NodeId,
        value: DataValue,
        value_rank: i32,
    ) -> AddNodesItem {
        AddNodesItem {
            parent_node_id: ExpandedNodeId::new(ObjectId::ObjectsFolder),
            reference_type_id: organizes(),
            requested_new_node_id: node_id.into(),
            browse_name: QualifiedName::new(1, browse_name),
            node_class: NodeClass::Variable,
            node_attributes: ua_types::AddNodeAttributes::Variable(VariableAttributes {
                specified_attributes: (AttributesMask::DISPLAY_NAME
                    | AttributesMask::ACCESS_LEVEL
                    | AttributesMask::USER_ACCESS_LEVEL
                    | AttributesMask::DATA_TYPE
                    | AttributesMask::HISTORIZING
                    | AttributesMask::VALUE
                    | AttributesMask::VALUE_RANK)
                    .bits(),
                display_name: browse_name.into(),
                access_level: 1,
                user_access_level: 1,
                data_type,
                value,
                value_rank,
                ..Default::default()
            }),
            type_definition: ExpandedNodeId::new(VariableTypeId::BaseDataVariableType),
        }
    }

    #[test]
    fn add_object_type_as_subtype() {
        let manager = test_manager();
        let requested = NodeId::new(1, 1000u32);
        let results = manager
            .add_nodes(&[object_type_item(requested.clone(), "MyType", false)])
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status_code, StatusCode::Good);
        assert_eq!(results[0].added_node_id, requested);

        // Browsing forward HasSubtype from BaseObjectType lists the new type.
        let space = manager.read();
        let subtypes: Vec<NodeId> = space
            .find_references(
                &ObjectTypeId::BaseObjectType.into(),
                Some((ReferenceTypeId::HasSubtype, false)),
                BrowseDirection::Forward,
            )
            .map(|r| r.target_node.clone())
            .collect();
        assert!(subtypes.contains(&requested));
    }

    #[test]
    fn add_variable_under_objects_folder() {
        let manager = test_manager();
        let requested = NodeId::new(1, 2000u32);
        let results = manager
            .add_nodes(&[variable_item(
                requested.clone(),
                "Counter",
                DataTypeId::Int32.into(),
                DataValue::new_now(42i32),
                -1,
            )])
            .unwrap();
        assert_eq!(results[0].status_code, StatusCode::Good);

        let space = manager.read();
        let variable = space.find(&requested).unwrap().as_variable().unwrap();
        let value = variable.read_value().unwrap();
        assert_eq!(value.value, Some(Variant::Int32(42)));

        // The inverse Organizes edge lands on the objects folder.
        let parents: Vec<NodeId> = space
            .find_references(
                &requested,
                Some((ReferenceTypeId::Organizes, false)),
                BrowseDirection::Inverse,
            )
            .map(|r| r.target_node.clone())
            .collect();
        assert_eq!(parents, vec![objects_folder()]);
    }

    #[test]
    fn requested_id_already_taken() {
        let manager = test_manager();
        let requested = NodeId::new(1, 2000u32);
        let item = object_type_item(requested.clone(), "MyType", false);
        let results = manager.add_nodes(&[item.clone()]).unwrap();
        assert_eq!(results[0].status_code, StatusCode::Good);
        let results = manager
            .add_nodes(&[object_type_item(requested, "Other", false)])
            .unwrap();
        assert_eq!(results[0].status_code, StatusCode::BadNodeIdExists);
    }

    #[test]
    fn placeholder_id_is_assigned_by_the_store() {
        let manager = test_manager();
        let results = manager
            .add_nodes(&[variable_item(
                NodeId::new(1, 0u32),
                "Assigned",
                DataTypeId::Int32.into(),
                DataValue::new_now(1i32),
                -1,
            )])
            .unwrap();
        assert_eq!(results[0].status_code, StatusCode::Good);
        let id = &results[0].added_node_id;
        assert_eq!(id.namespace, 1);
        assert!(!id.is_placeholder());
        assert!(manager.read().node_exists(id));
    }

    #[test]
    fn namespace_index_out_of_range() {
        let manager = test_manager();
        let results = manager
            .add_nodes(&[variable_item(
                NodeId::new(7, 1u32),
                "Nowhere",
                DataTypeId::Int32.into(),
                DataValue::new_now(1i32),
                -1,
            )])
            .unwrap();
        assert_eq!(results[0].status_code, StatusCode::BadNodeIdInvalid);
    }

    #[test]
    fn mismatched_attributes_rejected() {
        let manager = test_manager();
        let mut item = object_type_item(NodeId::new(1, 10u32), "Broken", false);
        item.node_class = NodeClass::Variable;
        let results = manager.add_nodes(&[item]).unwrap();
        assert_eq!(
            results[0].status_code,
            StatusCode::BadNodeAttributesInvalid
        );
        assert!(!manager.read().node_exists(&NodeId::new(1, 10u32)));
    }

    #[test]
    fn missing_parent_leaves_no_residue() {
        let manager = test_manager();
        let requested = NodeId::new(1, 11u32);
        let mut item = variable_item(
            requested.clone(),
            "Orphaned",
            DataTypeId::Int32.into(),
            DataValue::new_now(1i32),
            -1,
        );
        item.parent_node_id = ExpandedNodeId::new(NodeId::new(1, 424242u32));
        let results = manager.add_nodes(&[item]).unwrap();
        assert_eq!(results[0].status_code, StatusCode::BadParentNodeIdInvalid);
        assert!(!manager.read().node_exists(&requested));
    }

    #[test]
    fn empty_request_is_nothing_to_do() {
        let manager = test_manager();
        assert_eq!(manager.add_nodes(&[]), Err(StatusCode::BadNothingToDo));
        assert_eq!(
            manager.add_references(&[]),
            Err(StatusCode::BadNothingToDo)
        );
        assert_eq!(manager.delete_nodes(&[]), Err(StatusCode::BadNothingToDo));
        assert_eq!(
            manager.delete_references(&[]),
            Err(StatusCode::BadNothingToDo)
        );
    }

    #[test]
    fn orphan_object_is_allowed_orphan_variable_is_not() {
        let manager = test_manager();
        let orphan = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 20u32), (1, "Orphan"), "Orphan").build(),
                None,
                None,
            )
            .unwrap();
        // The orphan still gets its type definition.
        assert_eq!(
            manager.read().type_definition_of(&orphan),
            Some(ObjectTypeId::BaseObjectType.into())
        );

        let status = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 21u32), (1, "NoParent"), "NoParent")
                    .data_type(DataTypeId::Int32)
                    .value(1i32)
                    .build(),
                None,
                None,
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadParentNodeIdInvalid);
        assert!(!manager.read().node_exists(&NodeId::new(1, 21u32)));
    }

    #[test]
    fn non_hierarchical_parent_reference_rejected() {
        let manager = test_manager();
        let custom_ref = NodeId::new(1, 30u32);
        manager
            .add_node(
                ReferenceTypeBuilder::new(&custom_ref, (1, "Annotates"), "Annotates").build(),
                Some((
                    &ReferenceTypeId::NonHierarchicalReferences.into(),
                    &has_subtype(),
                )),
                None,
            )
            .unwrap();

        let status = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 31u32), (1, "Thing"), "Thing").build(),
                Some((&objects_folder(), &custom_ref)),
                None,
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadReferenceTypeIdInvalid);
        assert!(!manager.read().node_exists(&NodeId::new(1, 31u32)));
    }

    #[test]
    fn abstract_reference_type_rejected_as_parent_edge() {
        let manager = test_manager();
        let status = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 32u32), (1, "Thing"), "Thing").build(),
                Some((&objects_folder(), &ReferenceTypeId::HierarchicalReferences.into())),
                None,
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadReferenceNotAllowed);
    }

    #[test]
    fn type_node_parent_must_share_class() {
        let manager = test_manager();
        let status = manager
            .add_node(
                ObjectTypeBuilder::new(&NodeId::new(1, 33u32), (1, "OddType"), "OddType").build(),
                Some((&base_data_variable_type(), &has_subtype())),
                None,
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadParentNodeIdInvalid);

        let status = manager
            .add_node(
                ObjectTypeBuilder::new(&NodeId::new(1, 34u32), (1, "OddType"), "OddType").build(),
                Some((&ObjectTypeId::BaseObjectType.into(), &organizes())),
                None,
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadReferenceNotAllowed);
    }
}

mod type_checking {
    use super::*;

    #[test]
    fn data_type_must_be_subtype_of_template() {
        let manager = test_manager();
        let vt = NodeId::new(1, 3000u32);
        manager
            .add_node(
                VariableTypeBuilder::new(&vt, (1, "Int32Type"), "Int32Type")
                    .data_type(DataTypeId::Int32)
                    .value_rank(-1)
                    .build(),
                Some((&base_data_variable_type(), &has_subtype())),
                None,
            )
            .unwrap();

        let requested = NodeId::new(1, 3001u32);
        let status = manager
            .add_node(
                VariableBuilder::new(&requested, (1, "Wrong"), "Wrong")
                    .data_type(DataTypeId::String)
                    .value("hello")
                    .build(),
                Some((&objects_folder(), &organizes())),
                Some(&vt),
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadTypeMismatch);
        assert!(!manager.read().node_exists(&requested));

        // An Int32 variable under the same template is fine.
        manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3002u32), (1, "Right"), "Right")
                    .data_type(DataTypeId::Int32)
                    .value(5i32)
                    .build(),
                Some((&objects_folder(), &organizes())),
                Some(&vt),
            )
            .unwrap();
    }

    #[test]
    fn abstract_variable_type_cannot_be_instantiated() {
        let manager = test_manager();
        let status = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3010u32), (1, "Abstract"), "Abstract")
                    .data_type(DataTypeId::Int32)
                    .value(1i32)
                    .build(),
                Some((&objects_folder(), &organizes())),
                Some(&VariableTypeId::BaseVariableType.into()),
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadTypeDefinitionInvalid);
    }

    #[test]
    fn empty_value_of_concrete_type_is_synthesized() {
        let manager = test_manager();
        let id = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3020u32), (1, "Zeroed"), "Zeroed")
                    .data_type(DataTypeId::Int32)
                    .build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();
        let space = manager.read();
        let value = space.find(&id).unwrap().as_variable().unwrap().read_value().unwrap();
        assert_eq!(value.value, Some(Variant::Int32(0)));
    }

    #[test]
    fn empty_array_is_synthesized_for_rank_one() {
        let manager = test_manager();
        let id = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3021u32), (1, "Empties"), "Empties")
                    .data_type(DataTypeId::Double)
                    .value_rank(1)
                    .array_dimensions(&[0])
                    .build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();
        let space = manager.read();
        let value = space.find(&id).unwrap().as_variable().unwrap().read_value().unwrap();
        let Some(Variant::Array(array)) = value.value else {
            panic!("expected an array value");
        };
        assert!(array.is_empty());
    }

    #[test]
    fn scalar_with_unset_rank_adopts_template_rank() {
        let manager = test_manager();
        let id = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3030u32), (1, "Adopted"), "Adopted")
                    .data_type(DataTypeId::Int32)
                    .value(3i32)
                    .value_rank(0)
                    .build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();
        let space = manager.read();
        // BaseDataVariableType has value rank -2.
        assert_eq!(
            space.find(&id).unwrap().as_variable().unwrap().value_rank(),
            -2
        );
    }

    #[test]
    fn rank_and_dimensions_must_agree() {
        let manager = test_manager();
        let status = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3040u32), (1, "Shapes"), "Shapes")
                    .data_type(DataTypeId::Int32)
                    .value(3i32)
                    .value_rank(-1)
                    .array_dimensions(&[4])
                    .build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadTypeMismatch);
    }

    #[test]
    fn inline_value_is_coerced_to_declared_type() {
        let manager = test_manager();
        let id = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3050u32), (1, "Coerced"), "Coerced")
                    .data_type(DataTypeId::Int64)
                    .value(7i32)
                    .build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();
        let space = manager.read();
        let value = space.find(&id).unwrap().as_variable().unwrap().read_value().unwrap();
        assert_eq!(value.value, Some(Variant::Int64(7)));
    }

    #[test]
    fn type_check_is_idempotent_on_a_valid_variable() {
        let manager = test_manager();
        let id = manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 3060u32), (1, "Stable"), "Stable")
                    .data_type(DataTypeId::Int32)
                    .value(42i32)
                    .build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();

        let mut space = manager.write();
        let before = space
            .find(&id)
            .unwrap()
            .as_variable()
            .unwrap()
            .read_value()
            .unwrap();
        let vt = base_data_variable_type();
        crate::address_space::type_check_variable(&mut space, &id, &vt).unwrap();
        let after = space
            .find(&id)
            .unwrap()
            .as_variable()
            .unwrap()
            .read_value()
            .unwrap();
        assert_eq!(before, after);
        assert_eq!(
            space.find(&id).unwrap().as_variable().unwrap().value_rank(),
            -1
        );
    }
}

mod instantiation {
    use super::*;

    #[test]
    fn instance_gets_copies_of_type_mandated_children() {
        let manager = test_manager();
        let my_type = add_my_type(&manager);

        let instance = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 0u32), (1, "Instance"), "Instance").build(),
                Some((&objects_folder(), &organizes())),
                Some(&my_type),
            )
            .unwrap();

        assert_eq!(
            manager.read().type_definition_of(&instance),
            Some(my_type.clone())
        );

        let children = component_children(&manager, &instance);
        assert_eq!(children.len(), 1);
        let child = &children[0];
        // Fresh id in the instance's namespace, not the declaration's id.
        assert_eq!(child.namespace, 1);
        assert_ne!(child, &NodeId::new(1, 1001u32));

        let space = manager.read();
        let child_node = space.find(child).unwrap();
        assert_eq!(child_node.node_class(), NodeClass::Variable);
        assert_eq!(
            child_node.as_node().browse_name(),
            &QualifiedName::new(1, "Temp")
        );
        let value = child_node.as_variable().unwrap().read_value().unwrap();
        assert_eq!(value.value, Some(Variant::Double(0.0)));
        assert_eq!(
            space.type_definition_of(child),
            Some(base_data_variable_type())
        );
    }

    #[test]
    fn abstract_object_type_cannot_be_instantiated() {
        let manager = test_manager();
        let abstract_type = NodeId::new(1, 1100u32);
        manager
            .add_node(
                ObjectTypeBuilder::new(&abstract_type, (1, "AbstractType"), "AbstractType")
                    .is_abstract(true)
                    .build(),
                Some((&ObjectTypeId::BaseObjectType.into(), &has_subtype())),
                None,
            )
            .unwrap();

        let status = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 1101u32), (1, "Nope"), "Nope").build(),
                Some((&objects_folder(), &organizes())),
                Some(&abstract_type),
            )
            .unwrap_err();
        assert_eq!(status, StatusCode::BadTypeDefinitionInvalid);
        assert!(!manager.read().node_exists(&NodeId::new(1, 1101u32)));
    }

    #[test]
    fn children_merge_on_browse_name_across_the_type_chain() {
        let manager = test_manager();
        let my_type = add_my_type(&manager);

        // A subtype that redefines Temp with a different initial value.
        let derived = NodeId::new(1, 1200u32);
        manager
            .add_node(
                ObjectTypeBuilder::new(&derived, (1, "DerivedType"), "DerivedType").build(),
                Some((&my_type, &has_subtype())),
                None,
            )
            .unwrap();
        manager
            .add_node(
                VariableBuilder::new(&NodeId::new(1, 1201u32), (1, "Temp"), "Temp")
                    .data_type(DataTypeId::Double)
                    .value(1.5f64)
                    .build(),
                Some((&derived, &has_component())),
                Some(&base_data_variable_type()),
            )
            .unwrap();

        let instance = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 0u32), (1, "Derived"), "Derived").build(),
                Some((&objects_folder(), &organizes())),
                Some(&derived),
            )
            .unwrap();

        // One Temp only; the most derived declaration wins.
        let children = component_children(&manager, &instance);
        assert_eq!(children.len(), 1);
        let space = manager.read();
        let value = space
            .find(&children[0])
            .unwrap()
            .as_variable()
            .unwrap()
            .read_value()
            .unwrap();
        assert_eq!(value.value, Some(Variant::Double(1.5)));
    }

    #[test]
    fn methods_are_linked_not_cloned() {
        let manager = test_manager();
        let machine_type = NodeId::new(1, 1300u32);
        manager
            .add_node(
                ObjectTypeBuilder::new(&machine_type, (1, "MachineType"), "MachineType").build(),
                Some((&ObjectTypeId::BaseObjectType.into(), &has_subtype())),
                None,
            )
            .unwrap();
        let method = NodeId::new(1, 1301u32);
        manager
            .add_node(
                MethodBuilder::new(&method, (1, "Reset"), "Reset")
                    .executable(true)
                    .user_executable(true)
                    .build(),
                Some((&machine_type, &has_component())),
                None,
            )
            .unwrap();

        let instance = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 0u32), (1, "Machine"), "Machine").build(),
                Some((&objects_folder(), &organizes())),
                Some(&machine_type),
            )
            .unwrap();

        let children = component_children(&manager, &instance);
        assert_eq!(children, vec![method.clone()]);

        // The shared method node is callable through the instance's link.
        manager
            .set_method_callback(
                &method,
                MethodCallback::new(|_, args| Ok(vec![args.first().cloned().unwrap_or_default()])),
            )
            .unwrap();
        let outputs = manager
            .call_method(&method, &[Variant::Int32(3)])
            .unwrap();
        assert_eq!(outputs, vec![Variant::Int32(3)]);
    }

    #[test]
    fn constructor_runs_after_children_and_hook_fires() {
        let manager = test_manager();
        let my_type = add_my_type(&manager);

        let constructor_ran = Arc::new(Mutex::new(false));
        let seen = constructor_ran.clone();
        manager
            .set_object_type_lifecycle(
                &my_type,
                NodeLifecycle::with_constructor(move |_node_id| {
                    *seen.lock() = true;
                    Ok(Some(InstanceHandle::new(7u32)))
                }),
            )
            .unwrap();

        let hook_calls: Mutex<Vec<(NodeId, NodeId)>> = Mutex::new(Vec::new());
        let hook = |node_id: &NodeId, type_id: &NodeId| {
            hook_calls.lock().push((node_id.clone(), type_id.clone()));
        };

        let instance = manager
            .add_node_begin(
                ObjectBuilder::new(&NodeId::new(1, 0u32), (1, "Hooked"), "Hooked").build(),
            )
            .unwrap();
        manager
            .add_node_finish(
                &instance,
                Some((objects_folder(), organizes())),
                Some(&my_type),
                Some(&hook),
            )
            .unwrap();

        assert!(*constructor_ran.lock());
        let calls = hook_calls.into_inner();
        // Once for the copied child, once for the instance itself.
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], (instance.clone(), my_type.clone()));
        assert_eq!(calls[0].1, base_data_variable_type());

        let space = manager.read();
        let NodeType::Object(object) = space.find(&instance).unwrap() else {
            panic!("expected an object");
        };
        assert_eq!(
            object.instance_handle().and_then(|h| h.downcast_ref::<u32>()),
            Some(&7u32)
        );
    }
}

mod deletion {
    use super::*;

    #[test]
    fn destructors_fire_and_references_are_torn_down() {
        let manager = test_manager();
        let my_type = add_my_type(&manager);

        let destructor_calls: Arc<Mutex<Vec<(NodeId, Option<u32>)>>> =
            Arc::new(Mutex::new(Vec::new()));
        let calls = destructor_calls.clone();
        manager
            .set_object_type_lifecycle(
                &my_type,
                NodeLifecycle::new(
                    |_node_id| Ok(Some(InstanceHandle::new(7u32))),
                    move |node_id, handle| {
                        calls.lock().push((
                            node_id.clone(),
                            handle.and_then(|h| h.downcast_ref::<u32>().copied()),
                        ));
                    },
                ),
            )
            .unwrap();

        let instance = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 0u32), (1, "Doomed"), "Doomed").build(),
                Some((&objects_folder(), &organizes())),
                Some(&my_type),
            )
            .unwrap();

        manager.delete_node(&instance, true).unwrap();

        let calls = destructor_calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (instance.clone(), Some(7)));
        drop(calls);

        let space = manager.read();
        assert!(!space.node_exists(&instance));
        // The parent holds no dangling reference.
        let dangling = space
            .find_references(
                &objects_folder(),
                None::<(NodeId, bool)>,
                BrowseDirection::Both,
            )
            .any(|r| r.target_node == &instance);
        assert!(!dangling);
    }

    #[test]
    fn destructors_of_the_whole_chain_fire() {
        let manager = test_manager();
        let my_type = add_my_type(&manager);
        let derived = NodeId::new(1, 1400u32);
        manager
            .add_node(
                ObjectTypeBuilder::new(&derived, (1, "Derived"), "Derived").build(),
                Some((&my_type, &has_subtype())),
                None,
            )
            .unwrap();

        let fired: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let fired_base = fired.clone();
        manager
            .set_object_type_lifecycle(
                &my_type,
                NodeLifecycle::with_destructor(move |_, _| fired_base.lock().push("base")),
            )
            .unwrap();
        let fired_derived = fired.clone();
        manager
            .set_object_type_lifecycle(
                &derived,
                NodeLifecycle::with_destructor(move |_, _| fired_derived.lock().push("derived")),
            )
            .unwrap();

        let instance = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 0u32), (1, "Mixin"), "Mixin").build(),
                Some((&objects_folder(), &organizes())),
                Some(&derived),
            )
            .unwrap();
        manager.delete_node(&instance, true).unwrap();

        assert_eq!(*fired.lock(), vec!["derived", "base"]);
    }

    #[test]
    fn deleting_unknown_node_fails() {
        let manager = test_manager();
        assert_eq!(
            manager.delete_node(&NodeId::new(1, 999_999u32), true),
            Err(StatusCode::BadNodeIdUnknown)
        );
    }

    #[test]
    fn delete_nodes_service_reports_per_item() {
        let manager = test_manager();
        let a = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 1500u32), (1, "A"), "A").build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();
        let results = manager
            .delete_nodes(&[
                DeleteNodesItem {
                    node_id: a.clone(),
                    delete_target_references: true,
                },
                DeleteNodesItem {
                    node_id: NodeId::new(1, 424242u32),
                    delete_target_references: true,
                },
            ])
            .unwrap();
        assert_eq!(
            results,
            vec![StatusCode::Good, StatusCode::BadNodeIdUnknown]
        );
    }
}

mod references {
    use super::*;

    fn add_reference_item(source: &NodeId, target: &NodeId, is_forward: bool) -> AddReferencesItem {
        AddReferencesItem {
            source_node_id: source.clone(),
            reference_type_id: has_component(),
            is_forward,
            target_server_uri: Default::default(),
            target_node_id: target.clone().into(),
            target_node_class: NodeClass::Object,
        }
    }

    fn two_objects(manager: &AddressSpaceManager) -> (NodeId, NodeId) {
        let a = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 4000u32), (1, "A"), "A").build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();
        let b = manager
            .add_node(
                ObjectBuilder::new(&NodeId::new(1, 4001u32), (1, "B"), "B").build(),
                Some((&objects_folder(), &organizes())),
                None,
            )
            .unwrap();
        (a, b)
    }

    #[test]
    fn added_reference_is_visible_from_both_ends() {
        let manager = test_manager();
        let (a, b) = two_objects(&manager);
        manager.add_reference(&add_reference_item(&a, &b, true)).unwrap();

        let space = manager.read();
        assert!(space.has_reference(&a, &b, ReferenceTypeId::HasComponent));
        let inverse: Vec<NodeId> = space
            .find_references(
                &b,
                Some((ReferenceTypeId::HasComponent, false)),
                BrowseDirection::Inverse,
            )
            .map(|r| r.target_node.clone())
            .collect();
        assert_eq!(inverse, vec![a.clone()]);
    }

    #[test]
    fn duplicate_reference_is_rejected() {
        let manager = test_manager();
        let (a, b) = two_objects(&manager);
        manager.add_reference(&add_reference_item(&a, &b, true)).unwrap();
        assert_eq!(
            manager.add_reference(&add_reference_item(&a, &b, true)),
            Err(StatusCode::BadDuplicateReferenceNotAllowed)
        );
    }

    #[test]
    fn inverse_item_normalizes_to_the_forward_pair() {
        let manager = test_manager();
        let (a, b) = two_objects(&manager);
        // "b is component of a", expressed from b's point of view.
        manager.add_reference(&add_reference_item(&b, &a, false)).unwrap();
        assert!(manager
            .read()
            .has_reference(&a, &b, ReferenceTypeId::HasComponent));
    }

    #[test]
    fn foreign_server_references_are_not_implemented() {
        let manager = test_manager();
        let (a, b) = two_objects(&manager);
        let mut item = add_reference_item(&a, &b, true);
        item.target_server_uri = "opc.tcp://elsewhere".into();
        assert_eq!(
            manager.add_reference(&item),
            Err(StatusCode::BadNotImplemented)
        );
    }

    #[test]
    fn missing_endpoints_are_validated() {
        let manager = test_manager();
        let (a, _) = two_objects(&manager);
        let missing = NodeId::new(1, 424242u32);
        assert_eq!(
            manager.add_reference(&add_reference_item(&missing, &a, true)),
            Err(StatusCode::BadSourceNodeIdInvalid)
        );
        assert_eq!(
            manager.add_reference(&add_reference_item(&a, &missing, true)),
            Err(StatusCode::BadTargetNodeIdInvalid)
        );
        // Nothing stuck to the source.
        assert!(!manager
            .read()
            .has_reference(&a, &missing, ReferenceTypeId::HasComponent));
    }

    #[test]
    fn delete_reference_one_way_and_bidirectional() {
        let manager = test_manager();
        let (a, b) = two_objects(&manager);
        manager.add_reference(&add_reference_item(&a, &b, true)).unwrap();

        let one_way = DeleteReferencesItem {
            source_node_id: a.clone(),
            reference_type_id: has_component(),
            is_forward: true,
            target_node_id: b.clone().into(),
            delete_bidirectional: false,
        };
        assert_eq!(manager.delete_reference(&one_way), StatusCode::Good);
        {
            let space = manager.read();
            assert!(!space.has_reference(&a, &b, ReferenceTypeId::HasComponent));
            // The inverse entry survives a one-way delete.
            let inverse_left = space
                .find_references(
                    &b,
                    Some((ReferenceTypeId::HasComponent, false)),
                    BrowseDirection::Inverse,
                )
                .count();
            assert_eq!(inverse_left, 1);
        }

        // Deleting again reports uncertain.
        assert_eq!(
            manager.delete_reference(&one_way),
            StatusCode::UncertainReferenceNotDeleted
        );

        // Re-add and delete both halves.
        manager.add_reference(&add_reference_item(&a, &b, true)).unwrap();
        let both = DeleteReferencesItem {
            delete_bidirectional: true,
            ..one_way.clone()
        };
        assert_eq!(manager.delete_reference(&both), StatusCode::Good);
        let space = manager.read();
        let inverse_left = space
            .find_references(
                &b,
                Some((ReferenceTypeId::HasComponent, false)),
                BrowseDirection::Inverse,
            )
            .count();
        assert_eq!(inverse_left, 0);
    }
}

mod external_namespaces {
    use super::*;

    #[derive(Default)]
    struct RecordingHandler {
        add_nodes_seen: Mutex<Vec<AddNodesItem>>,
    }

    impl ExternalNamespaceManager for RecordingHandler {
        fn add_nodes(&self, items: &[AddNodesItem]) -> Vec<AddNodesResult> {
            self.add_nodes_seen.lock().extend(items.iter().cloned());
            items
                .iter()
                .map(|item| AddNodesResult {
                    status_code: StatusCode::Good,
                    added_node_id: item.requested_new_node_id.node_id.clone(),
                })
                .collect()
        }

        fn add_references(&self, items: &[AddReferencesItem]) -> Vec<StatusCode> {
            items.iter().map(|_| StatusCode::Good).collect()
        }

        fn delete_nodes(&self, items: &[DeleteNodesItem]) -> Vec<StatusCode> {
            items.iter().map(|_| StatusCode::Good).collect()
        }

        fn delete_references(&self, items: &[DeleteReferencesItem]) -> Vec<StatusCode> {
            items.iter().map(|_| StatusCode::Good).collect()
        }
    }

    #[test]
    fn items_are_routed_by_namespace_and_results_keep_request_order() {
        let manager = test_manager();
        let handler = Arc::new(RecordingHandler::default());
        manager.register_external_namespace(2, handler.clone());

        let local = NodeId::new(1, 5000u32);
        let foreign = NodeId::new(2, 5001u32);
        let items = vec![
            AddNodesItem {
                parent_node_id: ExpandedNodeId::new(ObjectId::ObjectsFolder),
                reference_type_id: organizes(),
                requested_new_node_id: foreign.clone().into(),
                browse_name: QualifiedName::new(2, "Foreign"),
                node_class: NodeClass::Object,
                node_attributes: ua_types::AddNodeAttributes::Object(ua_types::ObjectAttributes {
                    specified_attributes: (AttributesMask::DISPLAY_NAME
                        | AttributesMask::EVENT_NOTIFIER)
                        .bits(),
                    display_name: "Foreign".into(),
                    ..Default::default()
                }),
                type_definition: ExpandedNodeId::null(),
            },
            AddNodesItem {
                parent_node_id: ExpandedNodeId::new(ObjectId::ObjectsFolder),
                reference_type_id: organizes(),
                requested_new_node_id: local.clone().into(),
                browse_name: QualifiedName::new(1, "Local"),
                node_class: NodeClass::Object,
                node_attributes: ua_types::AddNodeAttributes::Object(ua_types::ObjectAttributes {
                    specified_attributes: (AttributesMask::DISPLAY_NAME
                        | AttributesMask::EVENT_NOTIFIER)
                        .bits(),
                    display_name: "Local".into(),
                    ..Default::default()
                }),
                type_definition: ExpandedNodeId::null(),
            },
        ];

        let results = manager.add_nodes(&items).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].added_node_id, foreign);
        assert_eq!(results[1].added_node_id, local);
        assert_eq!(results[0].status_code, StatusCode::Good);
        assert_eq!(results[1].status_code, StatusCode::Good);

        // The handler saw exactly its own item, the local store holds only
        // the local node.
        assert_eq!(handler.add_nodes_seen.lock().len(), 1);
        assert!(manager.read().node_exists(&local));
        assert!(!manager.read().node_exists(&foreign));
    }
}
