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

//! Declaration fragment discovery
//!
//! Discovery supplies the fragments that apply to one node, most specific
//! first:
//!
//! 1. the declaration on the field of the parent's type that holds the node;
//! 2. the declaration on the node's own type;
//! 3. the declarations on its super types, nearest first.
//!
//! Policy resolution stops at the first deciding fragment, so discoveries
//! produce fragments lazily and never reorder them.

use super::{
    CacheMode, CacheProperty, DeclarationFragment, EffectivePolicies, PolicyDefaults,
    resolve_policy,
};
use crate::model::{FieldDecl, PmNode};
use smallvec::SmallVec;

/// Boxed iterator of fragments in precedence order
pub type Fragments<'a> = Box<dyn Iterator<Item = DeclarationFragment> + 'a>;

/// Source of the cache declarations applying to a node
pub trait FragmentDiscovery: Send + Sync {
    /// Fragments for `node`, most specific first
    fn fragments<'a>(&'a self, node: &'a PmNode) -> Fragments<'a>;
}

/// Discovery reading declarations from [`NodeType`](crate::model::NodeType)s
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeTypeDiscovery;

impl NodeTypeDiscovery {
    /// Declaration on the parent type's field holding `node`
    fn field_fragment(node: &PmNode) -> Option<DeclarationFragment> {
        let parent = node.parent()?;
        parent
            .node_type()
            .find_field(node.name())
            .and_then(FieldDecl::cache)
            .copied()
    }
}

impl FragmentDiscovery for NodeTypeDiscovery {
    fn fragments<'a>(&'a self, node: &'a PmNode) -> Fragments<'a> {
        let field = std::iter::once_with(move || Self::field_fragment(node)).flatten();
        let types = node
            .node_type()
            .ancestors()
            .filter_map(|node_type| node_type.declared_cache().copied());
        Box::new(field.chain(types))
    }
}

/// Effective cache mode of `property` for `node`
pub fn effective_policy<D>(
    discovery: &D,
    node: &PmNode,
    property: CacheProperty,
    defaults: &PolicyDefaults,
) -> CacheMode
where
    D: FragmentDiscovery + ?Sized,
{
    resolve_policy(property, discovery.fragments(node), defaults.get(property))
}

/// Effective cache modes of all properties for `node`
pub fn effective_policies<D>(
    discovery: &D,
    node: &PmNode,
    defaults: &PolicyDefaults,
) -> EffectivePolicies
where
    D: FragmentDiscovery + ?Sized,
{
    let fragments: SmallVec<[DeclarationFragment; 4]> = discovery.fragments(node).collect();
    EffectivePolicies::resolve(&fragments, defaults)
}
