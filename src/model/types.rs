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

//! Node type declarations
//!
//! A [`NodeType`] describes the shape of presentation-model nodes: which
//! children and value properties they declare, which type they extend and
//! which cache declarations are attached to the type and to its fields.
//! Declarations are immutable once built and shared behind `Arc`.

use super::TypeKey;
use crate::cache::DeclarationFragment;
use indexmap::IndexMap;
use std::sync::Arc;

/// What a declared field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A child node; read-only from expressions
    Child,
    /// A value slot on the node itself; readable and writable
    Property,
}

/// A field declared on a node type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    name: Arc<str>,
    kind: FieldKind,
    cache: Option<DeclarationFragment>,
}

impl FieldDecl {
    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field kind
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Cache declaration attached to this field, if any
    pub fn cache(&self) -> Option<&DeclarationFragment> {
        self.cache.as_ref()
    }
}

/// Declaration of a node type
#[derive(Debug)]
pub struct NodeType {
    name: Arc<str>,
    super_type: Option<Arc<NodeType>>,
    fields: IndexMap<Arc<str>, FieldDecl>,
    cache: Option<DeclarationFragment>,
}

impl NodeType {
    /// Start declaring a node type
    pub fn builder(name: impl Into<Arc<str>>) -> NodeTypeBuilder {
        NodeTypeBuilder {
            name: name.into(),
            super_type: None,
            fields: IndexMap::new(),
            cache: None,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Accessor lookup key for nodes of this type
    pub fn type_key(self: &Arc<Self>) -> TypeKey {
        TypeKey::node(self)
    }

    /// Directly extended type
    pub fn super_type(&self) -> Option<&Arc<NodeType>> {
        self.super_type.as_ref()
    }

    /// Cache declaration attached to this type itself
    pub fn declared_cache(&self) -> Option<&DeclarationFragment> {
        self.cache.as_ref()
    }

    /// Fields declared directly on this type, in declaration order
    pub fn declared_fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.fields.values()
    }

    /// This type followed by its super types, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &NodeType> {
        std::iter::successors(Some(self), |t| t.super_type.as_deref())
    }

    /// Find a field on this type or the nearest super type declaring it
    pub fn find_field(&self, name: &str) -> Option<&FieldDecl> {
        self.ancestors().find_map(|t| t.fields.get(name))
    }

    /// Whether this type is `type_name` or extends it
    pub fn is_subtype_of(&self, type_name: &str) -> bool {
        self.ancestors().any(|t| t.name() == type_name)
    }
}

/// Builder for [`NodeType`]
#[derive(Debug)]
pub struct NodeTypeBuilder {
    name: Arc<str>,
    super_type: Option<Arc<NodeType>>,
    fields: IndexMap<Arc<str>, FieldDecl>,
    cache: Option<DeclarationFragment>,
}

impl NodeTypeBuilder {
    /// Extend another node type
    pub fn extends(mut self, super_type: &Arc<NodeType>) -> Self {
        self.super_type = Some(Arc::clone(super_type));
        self
    }

    /// Attach a type-level cache declaration
    pub fn cache(mut self, fragment: DeclarationFragment) -> Self {
        self.cache = Some(fragment);
        self
    }

    /// Declare a child node field
    pub fn child(self, name: impl Into<Arc<str>>) -> Self {
        self.field(name, FieldKind::Child, None)
    }

    /// Declare a child node field carrying its own cache declaration
    pub fn child_with_cache(
        self,
        name: impl Into<Arc<str>>,
        fragment: DeclarationFragment,
    ) -> Self {
        self.field(name, FieldKind::Child, Some(fragment))
    }

    /// Declare a value property
    pub fn property(self, name: impl Into<Arc<str>>) -> Self {
        self.field(name, FieldKind::Property, None)
    }

    fn field(
        mut self,
        name: impl Into<Arc<str>>,
        kind: FieldKind,
        cache: Option<DeclarationFragment>,
    ) -> Self {
        let name = name.into();
        self.fields.insert(Arc::clone(&name), FieldDecl { name, kind, cache });
        self
    }

    /// Finish the declaration
    pub fn build(self) -> Arc<NodeType> {
        Arc::new(NodeType {
            name: self.name,
            super_type: self.super_type,
            fields: self.fields,
            cache: self.cache,
        })
    }
}
