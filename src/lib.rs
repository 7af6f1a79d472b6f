//! Path expressions and cache policies for presentation models
//!
//! Two independent pieces:
//!
//! - a small path-expression language (`order.?customer.name`, `$total`)
//!   that reads and writes values in a tree of presentation-model nodes or in
//!   plain host objects;
//! - a cache-policy resolver deciding, from layered declarations, whether a
//!   computed UI property is memoized.
//!
//! ```
//! use pm_expr::{AccessorRegistry, ExpressionEngine, NodeType, PmNode, Value};
//! use std::sync::Arc;
//!
//! let order_type = NodeType::builder("OrderPm").property("note").build();
//! let engine = ExpressionEngine::new(Arc::new(AccessorRegistry::new()));
//! let order = PmNode::root("order", &order_type);
//! order.define_variable("total", Value::from(42));
//!
//! assert_eq!(engine.evaluate_on_node("$total", &order).unwrap(), Value::from(42));
//! ```

pub mod accessor;
pub mod ast;
pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;

// Re-export main types
pub use accessor::{Accessor, AccessorRegistry, AccessorResolver, CachingResolver};
pub use ast::{Expression, NameWithModifier};
pub use cache::{
    CacheMode, CacheProperty, DeclarationFragment, EffectivePolicies, FragmentDiscovery,
    NodeTypeDiscovery, PolicyDefaults, PropertyCache, RequestId, resolve_policy,
    resolve_policy_named,
};
pub use config::{EngineConfig, ParserConfig};
pub use error::{ContractViolation, PmError, Result};
pub use evaluator::{
    ContextKind, EvaluationContext, EvaluationError, EvaluationResult, ExpressionEngine,
};
pub use model::{Bean, NodeType, PmNode, TypeKey, Value};
pub use parser::{ParseError, parse, parse_with_config};
