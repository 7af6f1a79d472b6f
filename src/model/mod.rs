//! Value model for path expressions
//!
//! Expressions navigate two kinds of data: presentation-model trees made of
//! typed [`PmNode`]s, and plain host objects ([`Bean`]s) reachable through
//! registered accessors. Both are carried by [`Value`].

mod node;
mod types;
mod value;

pub use node::{NamedValue, PmNode};
pub use types::{FieldDecl, FieldKind, NodeType, NodeTypeBuilder};
pub use value::{Bean, TypeKey, Value};
