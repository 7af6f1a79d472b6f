// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Presentation-model tree nodes
//!
//! Nodes form a named hierarchy: every node knows its parent through a weak
//! link and owns its children. Besides children a node holds value
//! properties and named variables; variables are visible to expressions
//! evaluated on the node or on any of its descendants.
//!
//! Nodes use interior mutability and may be read from several threads.
//! Concurrent writes to the same tree must be serialized by the caller.

use super::{NodeType, Value};
use crate::cache::PropertyCache;
use indexmap::IndexMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::{Arc, Weak};

/// A named value slot visible to expressions as a variable.
///
/// Clones share the same slot.
#[derive(Debug, Clone)]
pub struct NamedValue {
    slot: Arc<RwLock<Value>>,
    writable: bool,
}

impl NamedValue {
    /// A variable that expressions may assign
    pub fn writable(value: Value) -> Self {
        Self {
            slot: Arc::new(RwLock::new(value)),
            writable: true,
        }
    }

    /// A variable that ignores assignments
    pub fn constant(value: Value) -> Self {
        Self {
            slot: Arc::new(RwLock::new(value)),
            writable: false,
        }
    }

    /// Current value
    pub fn get(&self) -> Value {
        self.slot.read().clone()
    }

    /// Whether assignments are accepted
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// Store a new value; returns `false` and leaves the slot alone when read-only
    pub fn set(&self, value: Value) -> bool {
        if !self.writable {
            return false;
        }
        *self.slot.write() = value;
        true
    }
}

/// Node of a presentation-model tree
pub struct PmNode {
    name: Arc<str>,
    node_type: Arc<NodeType>,
    parent: Weak<PmNode>,
    children: RwLock<IndexMap<Arc<str>, Arc<PmNode>>>,
    properties: RwLock<FxHashMap<Arc<str>, Value>>,
    variables: RwLock<FxHashMap<Arc<str>, NamedValue>>,
    cache: PropertyCache,
}

impl PmNode {
    fn new(name: Arc<str>, node_type: Arc<NodeType>, parent: Weak<PmNode>) -> Self {
        Self {
            name,
            node_type,
            parent,
            children: RwLock::new(IndexMap::new()),
            properties: RwLock::new(FxHashMap::default()),
            variables: RwLock::new(FxHashMap::default()),
            cache: PropertyCache::new(),
        }
    }

    /// Create the root of a tree
    pub fn root(name: impl Into<Arc<str>>, node_type: &Arc<NodeType>) -> Arc<PmNode> {
        Arc::new(Self::new(name.into(), Arc::clone(node_type), Weak::new()))
    }

    /// Create a child node; an existing child with the same name is replaced
    pub fn add_child(
        self: &Arc<Self>,
        name: impl Into<Arc<str>>,
        node_type: &Arc<NodeType>,
    ) -> Arc<PmNode> {
        let name = name.into();
        let child = Arc::new(Self::new(
            Arc::clone(&name),
            Arc::clone(node_type),
            Arc::downgrade(self),
        ));
        self.children.write().insert(name, Arc::clone(&child));
        child
    }

    /// Node name, unique among its siblings
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn node_type(&self) -> &Arc<NodeType> {
        &self.node_type
    }

    /// Parent node, `None` for the root or a detached node
    pub fn parent(&self) -> Option<Arc<PmNode>> {
        self.parent.upgrade()
    }

    /// This node followed by its ancestors, nearest first
    pub fn self_and_ancestors(self: &Arc<Self>) -> impl Iterator<Item = Arc<PmNode>> + use<> {
        std::iter::successors(Some(Arc::clone(self)), |node| node.parent())
    }

    /// Child by name
    pub fn child(&self, name: &str) -> Option<Arc<PmNode>> {
        self.children.read().get(name).cloned()
    }

    /// Children in insertion order
    pub fn children(&self) -> Vec<Arc<PmNode>> {
        self.children.read().values().cloned().collect()
    }

    /// Property value, null when never set
    pub fn property(&self, name: &str) -> Value {
        self.properties.read().get(name).cloned().unwrap_or_default()
    }

    /// Set a property value
    pub fn set_property(&self, name: impl Into<Arc<str>>, value: Value) {
        self.properties.write().insert(name.into(), value);
    }

    /// Define a writable variable on this node
    pub fn define_variable(&self, name: impl Into<Arc<str>>, value: Value) {
        self.variables
            .write()
            .insert(name.into(), NamedValue::writable(value));
    }

    /// Define a read-only variable on this node
    pub fn define_constant(&self, name: impl Into<Arc<str>>, value: Value) {
        self.variables
            .write()
            .insert(name.into(), NamedValue::constant(value));
    }

    /// Variable defined directly on this node
    pub fn local_variable(&self, name: &str) -> Option<NamedValue> {
        self.variables.read().get(name).cloned()
    }

    /// Find a variable on this node or the nearest ancestor defining it
    pub fn find_variable(self: &Arc<Self>, name: &str) -> Option<NamedValue> {
        self.self_and_ancestors()
            .find_map(|node| node.local_variable(name))
    }

    /// Memoized computed values of this node
    pub fn property_cache(&self) -> &PropertyCache {
        &self.cache
    }

    /// Dotted names from the root down to this node
    pub fn path(&self) -> String {
        let mut names = vec![Arc::clone(&self.name)];
        let mut current = self.parent();
        while let Some(node) = current {
            names.push(Arc::clone(&node.name));
            current = node.parent();
        }
        names.reverse();
        names.join(".")
    }
}

impl fmt::Debug for PmNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PmNode")
            .field("path", &self.path())
            .field("type", &self.node_type.name())
            .finish_non_exhaustive()
    }
}
