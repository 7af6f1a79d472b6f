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

//! Pre-built accessor registry

use super::{Accessor, AccessorResolver};
use crate::evaluator::{EvaluationError, EvaluationResult};
use crate::model::{Bean, FieldDecl, FieldKind, PmNode, TypeKey, Value};
use rustc_hash::FxHashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Registry of bean accessors.
///
/// Bean properties are registered explicitly as getter/setter closures.
/// Nodes need no registration: their [`TypeKey`] carries the node type, which
/// answers from its declared fields. A child field reads the child node, a
/// property field reads and writes the node's property slot.
#[derive(Default)]
pub struct AccessorRegistry {
    beans: FxHashMap<TypeKey, FxHashMap<Arc<str>, Accessor>>,
}

impl AccessorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register accessors for the bean type `T`
    pub fn bean<T: Bean>(&mut self) -> BeanAccessors<'_, T> {
        BeanAccessors {
            registry: self,
            _marker: PhantomData,
        }
    }

    /// Number of registered bean accessors
    pub fn bean_accessor_count(&self) -> usize {
        self.beans.values().map(FxHashMap::len).sum()
    }

    fn insert(&mut self, accessor: Accessor) {
        self.beans
            .entry(accessor.owner().clone())
            .or_default()
            .insert(Arc::from(accessor.name()), accessor);
    }
}

impl AccessorResolver for AccessorRegistry {
    fn resolve(&self, type_key: &TypeKey, name: &str) -> Option<Accessor> {
        match type_key {
            TypeKey::Node(node_type) => {
                let field = node_type.find_field(name)?;
                Some(node_field_accessor(type_key, field))
            }
            _ => self.beans.get(type_key)?.get(name).cloned(),
        }
    }
}

fn target_node<'v>(target: &'v Value, owner: &TypeKey) -> EvaluationResult<&'v Arc<PmNode>> {
    target
        .as_node()
        .ok_or_else(|| EvaluationError::TypeMismatch {
            expected: owner.to_string(),
            actual: target.type_name(),
        })
}

fn node_field_accessor(owner: &TypeKey, field: &FieldDecl) -> Accessor {
    let name: Arc<str> = Arc::from(field.name());
    let read_owner = owner.clone();
    let read_name = Arc::clone(&name);

    match field.kind() {
        FieldKind::Child => Accessor::read_only(owner.clone(), name, move |target| {
            let node = target_node(target, &read_owner)?;
            Ok(node.child(&read_name).map(Value::Node).unwrap_or_default())
        }),
        FieldKind::Property => {
            let write_owner = owner.clone();
            let write_name = Arc::clone(&name);
            Accessor::read_only(owner.clone(), name, move |target| {
                let node = target_node(target, &read_owner)?;
                Ok(node.property(&read_name))
            })
            .with_write(move |target, value| {
                let node = target_node(target, &write_owner)?;
                node.set_property(Arc::clone(&write_name), value);
                Ok(())
            })
        }
    }
}

fn downcast<T: Bean>(target: &Value) -> EvaluationResult<&T> {
    target
        .downcast_ref::<T>()
        .ok_or_else(|| EvaluationError::TypeMismatch {
            expected: std::any::type_name::<T>().to_string(),
            actual: target.type_name(),
        })
}

/// Builder registering the accessors of one bean type
pub struct BeanAccessors<'r, T> {
    registry: &'r mut AccessorRegistry,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Bean> BeanAccessors<'_, T> {
    /// Register a read-only property
    pub fn getter<G>(self, name: &str, get: G) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let accessor = Accessor::read_only(TypeKey::native::<T>(), name, move |target| {
            downcast::<T>(target).map(&get)
        });
        self.registry.insert(accessor);
        self
    }

    /// Register a readable and writable property
    pub fn property<G, S>(self, name: &str, get: G, set: S) -> Self
    where
        G: Fn(&T) -> Value + Send + Sync + 'static,
        S: Fn(&T, Value) -> EvaluationResult<()> + Send + Sync + 'static,
    {
        let accessor = Accessor::read_only(TypeKey::native::<T>(), name, move |target| {
            downcast::<T>(target).map(&get)
        })
        .with_write(move |target, value| set(downcast::<T>(target)?, value));
        self.registry.insert(accessor);
        self
    }
}
