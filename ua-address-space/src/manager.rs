//! The public, locking surface over [`AddressSpace`]: the node management
//! service set and the in-process mutation API.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use ua_nodes::{
    DataSource, Method, MethodCallback, NodeLifecycle, NodeType, ValueCallback, Variable,
};
use ua_types::{
    AddNodesItem, AddNodesResult, AddReferencesItem, DeleteNodesItem, DeleteReferencesItem, NodeId,
    StatusCode, Variant,
};

use crate::address_space::{AddressSpace, InstantiationHook};
use crate::external::ExternalNamespaceManager;

/// An address space behind a reader/writer lock, with the node management
/// services and the programmatic mutation surface on top.
///
/// Every mutation entry point takes the write guard for the whole call, so
/// each call is atomic to any other observer of the lock. User callbacks
/// (constructors, destructors, data sources, value callbacks, instantiation
/// hooks) run synchronously under that guard and must not call back into
/// this type; doing so deadlocks.
pub struct AddressSpaceManager {
    address_space: RwLock<AddressSpace>,
    external_namespaces: RwLock<HashMap<u16, Arc<dyn ExternalNamespaceManager>>>,
}

impl Default for AddressSpaceManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpaceManager {
    /// A manager over a fresh address space with the minimal namespace
    /// zero skeleton.
    pub fn new() -> AddressSpaceManager {
        Self::from_address_space(AddressSpace::new())
    }

    /// A manager over an address space built by the caller.
    pub fn from_address_space(address_space: AddressSpace) -> AddressSpaceManager {
        AddressSpaceManager {
            address_space: RwLock::new(address_space),
            external_namespaces: RwLock::new(HashMap::new()),
        }
    }

    /// Take the reader side of the lock, for browsing and reads.
    pub fn read(&self) -> RwLockReadGuard<'_, AddressSpace> {
        self.address_space.read()
    }

    /// Take the writer side of the lock. Mutations made through the guard
    /// bypass the external namespace table.
    pub fn write(&self) -> RwLockWriteGuard<'_, AddressSpace> {
        self.address_space.write()
    }

    /// Register a namespace URI, returning its index.
    pub fn add_namespace(&self, namespace: &str) -> u16 {
        self.address_space.write().add_namespace(namespace)
    }

    /// Route all mutations governed by namespace `index` to `handler`.
    pub fn register_external_namespace(
        &self,
        index: u16,
        handler: Arc<dyn ExternalNamespaceManager>,
    ) {
        self.external_namespaces.write().insert(index, handler);
    }

    /// Split items between the local store and registered external
    /// handlers, preserving per-item order in the combined results.
    fn dispatch<T: Clone, R: Clone>(
        &self,
        items: &[T],
        namespace_of: impl Fn(&T) -> u16,
        mut local: impl FnMut(&mut AddressSpace, &T) -> R,
        foreign: impl Fn(&dyn ExternalNamespaceManager, &[T]) -> Vec<R>,
        fallback: R,
    ) -> Vec<R> {
        let externals = self.external_namespaces.read();
        let mut results: Vec<Option<R>> = vec![None; items.len()];

        let mut foreign_indices: HashMap<u16, Vec<usize>> = HashMap::new();
        {
            let mut address_space = self.address_space.write();
            for (i, item) in items.iter().enumerate() {
                let namespace = namespace_of(item);
                if externals.contains_key(&namespace) {
                    foreign_indices.entry(namespace).or_default().push(i);
                } else {
                    results[i] = Some(local(&mut address_space, item));
                }
            }
        }

        for (namespace, indices) in foreign_indices {
            let Some(handler) = externals.get(&namespace) else {
                continue;
            };
            let sub_items: Vec<T> = indices.iter().map(|i| items[*i].clone()).collect();
            let sub_results = foreign(handler.as_ref(), &sub_items);
            for (j, i) in indices.iter().enumerate() {
                results[*i] = sub_results.get(j).cloned();
            }
        }

        results
            .into_iter()
            .map(|r| r.unwrap_or_else(|| fallback.clone()))
            .collect()
    }

    /// The `AddNodes` service: one result per item, in request order.
    pub fn add_nodes(&self, items: &[AddNodesItem]) -> Result<Vec<AddNodesResult>, StatusCode> {
        if items.is_empty() {
            return Err(StatusCode::BadNothingToDo);
        }
        Ok(self.dispatch(
            items,
            |item| item.requested_new_node_id.node_id.namespace,
            |space, item| space.add_node_item(item),
            |handler, sub| handler.add_nodes(sub),
            AddNodesResult::error(StatusCode::BadInternalError),
        ))
    }

    /// The `AddReferences` service: one status per item, in request order.
    pub fn add_references(
        &self,
        items: &[AddReferencesItem],
    ) -> Result<Vec<StatusCode>, StatusCode> {
        if items.is_empty() {
            return Err(StatusCode::BadNothingToDo);
        }
        Ok(self.dispatch(
            items,
            |item| item.source_node_id.namespace,
            |space, item| match space.add_reference_item(item) {
                Ok(()) => StatusCode::Good,
                Err(status) => status,
            },
            |handler, sub| handler.add_references(sub),
            StatusCode::BadInternalError,
        ))
    }

    /// The `DeleteNodes` service: one status per item, in request order.
    pub fn delete_nodes(&self, items: &[DeleteNodesItem]) -> Result<Vec<StatusCode>, StatusCode> {
        if items.is_empty() {
            return Err(StatusCode::BadNothingToDo);
        }
        Ok(self.dispatch(
            items,
            |item| item.node_id.namespace,
            |space, item| match space.delete_node(&item.node_id, item.delete_target_references) {
                Ok(()) => StatusCode::Good,
                Err(status) => status,
            },
            |handler, sub| handler.delete_nodes(sub),
            StatusCode::BadInternalError,
        ))
    }

    /// The `DeleteReferences` service: one status per item, in request
    /// order.
    pub fn delete_references(
        &self,
        items: &[DeleteReferencesItem],
    ) -> Result<Vec<StatusCode>, StatusCode> {
        if items.is_empty() {
            return Err(StatusCode::BadNothingToDo);
        }
        Ok(self.dispatch(
            items,
            |item| item.source_node_id.namespace,
            |space, item| space.delete_reference_item(item),
            |handler, sub| handler.delete_references(sub),
            StatusCode::BadInternalError,
        ))
    }

    /// Add a node under `parent` in a single call. Pass `None` as the
    /// parent only for orphan objects.
    pub fn add_node(
        &self,
        node: impl Into<NodeType>,
        parent: Option<(&NodeId, &NodeId)>,
        type_definition: Option<&NodeId>,
    ) -> Result<NodeId, StatusCode> {
        self.address_space
            .write()
            .add_node(node, parent, type_definition)
    }

    /// First phase of a two-phase add; see
    /// [`AddressSpace::add_node_begin`].
    pub fn add_node_begin(&self, node: impl Into<NodeType>) -> Result<NodeId, StatusCode> {
        self.address_space.write().add_node_begin(node.into())
    }

    /// Second phase of a two-phase add; see
    /// [`AddressSpace::add_node_finish`].
    pub fn add_node_finish(
        &self,
        node_id: &NodeId,
        parent: Option<(NodeId, NodeId)>,
        type_definition: Option<&NodeId>,
        hook: Option<InstantiationHook>,
    ) -> Result<(), StatusCode> {
        self.address_space
            .write()
            .add_node_finish(node_id, parent, type_definition, hook)
    }

    /// Add a variable whose value lives behind `data_source` instead of
    /// inline storage.
    pub fn add_data_source_variable(
        &self,
        mut variable: Variable,
        data_source: DataSource,
        parent: (&NodeId, &NodeId),
        type_definition: Option<&NodeId>,
    ) -> Result<NodeId, StatusCode> {
        variable.set_data_source(Some(data_source));
        self.address_space
            .write()
            .add_node(variable, Some(parent), type_definition)
    }

    /// Add a method with its call handler attached.
    pub fn add_method(
        &self,
        mut method: Method,
        callback: MethodCallback,
        parent: (&NodeId, &NodeId),
    ) -> Result<NodeId, StatusCode> {
        method.set_callback(Some(callback));
        self.address_space.write().add_node(method, Some(parent), None)
    }

    /// Add a single reference pair.
    pub fn add_reference(&self, item: &AddReferencesItem) -> Result<(), StatusCode> {
        self.address_space.write().add_reference_item(item)
    }

    /// Delete a node, see [`AddressSpace::delete_node`].
    pub fn delete_node(
        &self,
        node_id: &NodeId,
        delete_target_references: bool,
    ) -> Result<(), StatusCode> {
        self.address_space
            .write()
            .delete_node(node_id, delete_target_references)
    }

    /// Delete a single reference, see
    /// [`AddressSpace::delete_reference_item`].
    pub fn delete_reference(&self, item: &DeleteReferencesItem) -> StatusCode {
        self.address_space.write().delete_reference_item(item)
    }

    /// Invoke the call handler of a method node. The handler runs after
    /// the lock is released, so it may call back into this manager.
    pub fn call_method(
        &self,
        method_id: &NodeId,
        arguments: &[Variant],
    ) -> Result<Vec<Variant>, StatusCode> {
        let callback = {
            let address_space = self.address_space.read();
            let Some(node) = address_space.find(method_id) else {
                return Err(StatusCode::BadNodeIdUnknown);
            };
            let NodeType::Method(method) = node else {
                return Err(StatusCode::BadNodeClassInvalid);
            };
            if !method.executable() {
                return Err(StatusCode::BadUserAccessDenied);
            }
            method
                .callback()
                .cloned()
                .ok_or(StatusCode::BadNotImplemented)?
        };
        callback.call(method_id, arguments)
    }

    /// Register notification callbacks on a variable's inline value.
    pub fn set_variable_value_callback(
        &self,
        node_id: &NodeId,
        callback: ValueCallback,
    ) -> Result<(), StatusCode> {
        self.with_variable(node_id, |v| v.set_value_callback(Some(callback)))
    }

    /// Replace a variable's inline value storage with a data source.
    pub fn set_variable_data_source(
        &self,
        node_id: &NodeId,
        data_source: DataSource,
    ) -> Result<(), StatusCode> {
        self.with_variable(node_id, |v| v.set_data_source(Some(data_source)))
    }

    /// Register the constructor/destructor pair of an object type.
    pub fn set_object_type_lifecycle(
        &self,
        node_id: &NodeId,
        lifecycle: NodeLifecycle,
    ) -> Result<(), StatusCode> {
        let mut address_space = self.address_space.write();
        match address_space.find_mut(node_id) {
            Some(NodeType::ObjectType(object_type)) => {
                object_type.set_lifecycle(Some(lifecycle));
                Ok(())
            }
            Some(_) => Err(StatusCode::BadNodeClassInvalid),
            None => Err(StatusCode::BadNodeIdUnknown),
        }
    }

    /// Attach the call handler of a method node.
    pub fn set_method_callback(
        &self,
        node_id: &NodeId,
        callback: MethodCallback,
    ) -> Result<(), StatusCode> {
        let mut address_space = self.address_space.write();
        match address_space.find_mut(node_id) {
            Some(NodeType::Method(method)) => {
                method.set_callback(Some(callback));
                Ok(())
            }
            Some(_) => Err(StatusCode::BadNodeClassInvalid),
            None => Err(StatusCode::BadNodeIdUnknown),
        }
    }

    fn with_variable(
        &self,
        node_id: &NodeId,
        f: impl FnOnce(&mut Variable),
    ) -> Result<(), StatusCode> {
        let mut address_space = self.address_space.write();
        match address_space.find_mut(node_id) {
            Some(NodeType::Variable(variable)) => {
                f(variable);
                Ok(())
            }
            Some(_) => Err(StatusCode::BadNodeClassInvalid),
            None => Err(StatusCode::BadNodeIdUnknown),
        }
    }
}
