//! Path expression evaluator
//!
//! Evaluation walks a parsed [`Expression`](crate::ast::Expression) against an
//! [`EvaluationContext`]. [`ExpressionEngine`] adds compiled-expression caching
//! and accessor memoization on top.

mod context;
mod engine;
mod error;
mod evaluation;

pub use context::{ContextKind, EvaluationContext};
pub use engine::ExpressionEngine;
pub use error::{EvaluationError, EvaluationResult};
