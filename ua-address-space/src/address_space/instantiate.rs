//! Type-driven instantiation: materializing the aggregated children of a
//! type, and of all its supertypes, onto a freshly created instance.

use ua_nodes::{NodeBase, NodeType};
use ua_types::{BrowseDirection, NodeClass, NodeId, ReferenceTypeId, StatusCode};

use super::{is_instance_class, AddressSpace};

/// Hook invoked for every instance the instantiator finishes, with the id
/// of the new node and the type it was stamped from. Runs under the writer
/// lock, so it must not re-enter the public mutation surface.
pub type InstantiationHook<'a> = &'a dyn Fn(&NodeId, &NodeId);

/// Materialize `node_id` as an instance of `type_definition`.
///
/// Only Objects and Variables are instantiated, every other node class
/// returns immediately. Children are copied before the constructors run, so
/// a constructor observes its mandated subtree.
pub(crate) fn instantiate_node(
    space: &mut AddressSpace,
    node_id: &NodeId,
    node_class: NodeClass,
    type_definition: &NodeId,
    hook: Option<InstantiationHook>,
) -> Result<(), StatusCode> {
    if !matches!(node_class, NodeClass::Object | NodeClass::Variable) {
        return Ok(());
    }

    match (node_class, space.find(type_definition)) {
        (NodeClass::Object, Some(NodeType::ObjectType(t))) => {
            if t.is_abstract() {
                return Err(StatusCode::BadTypeDefinitionInvalid);
            }
        }
        (NodeClass::Variable, Some(NodeType::VariableType(t))) => {
            if t.is_abstract() {
                return Err(StatusCode::BadTypeDefinitionInvalid);
            }
        }
        _ => return Err(StatusCode::BadTypeDefinitionInvalid),
    }

    // Most-derived first: a subtype's child wins the browse name merge
    // against the same child of a supertype.
    let chain = space.supertype_chain(type_definition)?;
    for type_id in &chain {
        copy_child_nodes(space, type_id, node_id, hook)?;
    }

    if node_class == NodeClass::Object {
        // Constructors run base-first. Each may produce a handle, the most
        // derived result is the one stored on the instance.
        let mut handle = None;
        for type_id in chain.iter().rev() {
            let constructor = match space.find(type_id) {
                Some(NodeType::ObjectType(t)) => {
                    t.lifecycle().and_then(|l| l.constructor.clone())
                }
                _ => None,
            };
            if let Some(constructor) = constructor {
                if let Some(h) = constructor(node_id)? {
                    handle = Some(h);
                }
            }
        }
        if let Some(NodeType::Object(object)) = space.find_mut(node_id) {
            object.set_instance_handle(handle);
        }
    }

    match space.references_mut().try_insert_reference(
        node_id,
        type_definition,
        ReferenceTypeId::HasTypeDefinition,
    ) {
        Ok(()) | Err(StatusCode::BadDuplicateReferenceNotAllowed) => {}
        Err(e) => return Err(e),
    }

    if let Some(hook) = hook {
        hook(node_id, type_definition);
    }

    Ok(())
}

/// Copy the aggregated Object/Variable/Method children of `source` onto
/// `destination`, merging on browse name.
///
/// A child whose browse name already exists on the destination keeps the
/// destination node and merges one level deeper. Methods are shared by
/// reference, never cloned. Everything else is cloned with a fresh store
/// assigned id in the destination's namespace and pushed through the full
/// add pipeline, which instantiates recursively.
pub(crate) fn copy_child_nodes(
    space: &mut AddressSpace,
    source: &NodeId,
    destination: &NodeId,
    hook: Option<InstantiationHook>,
) -> Result<(), StatusCode> {
    let children: Vec<(NodeId, NodeId)> = space
        .find_references(
            source,
            Some((ReferenceTypeId::Aggregates, true)),
            BrowseDirection::Forward,
        )
        .map(|r| (r.target_node.clone(), r.reference_type.clone()))
        .collect();

    for (child_id, reference_type_id) in children {
        let Some(child) = space.find(&child_id) else {
            continue;
        };
        let child_class = child.node_class();
        if !is_instance_class(child_class) {
            continue;
        }
        let browse_name = child.as_node().browse_name().clone();

        if let Some(existing) = space.find_aggregate_by_browse_name(destination, &browse_name) {
            // The shared child keeps its identity, only its own children
            // are reconciled against the source child's children.
            copy_child_nodes(space, &child_id, &existing, hook)?;
        } else if child_class == NodeClass::Method {
            match space.references_mut().try_insert_reference(
                destination,
                &child_id,
                reference_type_id,
            ) {
                Ok(()) | Err(StatusCode::BadDuplicateReferenceNotAllowed) => {}
                Err(e) => return Err(e),
            }
        } else {
            let Some(mut copy) = space.clone_node(&child_id) else {
                continue;
            };
            copy.set_node_id(NodeId::new(destination.namespace, 0u32));
            let type_definition = space.type_definition_of(&child_id);
            let new_id = space.add_node_begin(copy)?;
            space.add_node_finish(
                &new_id,
                Some((destination.clone(), reference_type_id)),
                type_definition.as_ref(),
                hook,
            )?;
            // Children declared on the child declaration itself, rather
            // than on its type, are copied as well.
            copy_child_nodes(space, &child_id, &new_id, hook)?;
        }
    }

    Ok(())
}
