//! Abstract Syntax Tree (AST) definitions for path expressions
//!
//! Names with their modifiers and the expression nodes built from them.
//! Nodes are plain data; evaluation is implemented in [`crate::evaluator`].

#![warn(missing_docs)]

mod expression;
mod name;

pub use expression::*;
pub use name::*;
