//! Cache-policy resolution
//!
//! Declarations attached to node types and their fields decide whether a
//! computed UI property is memoized. [`resolve_policy`] scans fragments in
//! precedence order, [`FragmentDiscovery`] supplies them for a node and
//! [`PropertyCache`] applies the resulting [`CacheMode`].

mod defaults;
mod discovery;
mod fragment;
mod mode;
mod property_cache;
mod resolver;

pub use defaults::PolicyDefaults;
pub use discovery::{
    FragmentDiscovery, Fragments, NodeTypeDiscovery, effective_policies, effective_policy,
};
pub use fragment::DeclarationFragment;
pub use mode::{CacheMode, CacheProperty};
pub use property_cache::{PropertyCache, RequestId};
pub use resolver::{EffectivePolicies, resolve_policy, resolve_policy_named};
