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

//! Expression node definitions

use super::NameWithModifier;
use crate::config::DEFAULT_SEPARATOR;
use crate::model::Value;
use std::fmt;

/// Parsed path expression.
///
/// Expressions are immutable once parsed and may be shared between threads;
/// evaluation lives in [`crate::evaluator`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// The current value itself
    This,

    /// Constant value
    Literal(Value),

    /// Name resolved only through the context's named variables
    Variable(VariableExpression),

    /// Name resolved as an attribute first, falling back to a variable
    AttributeOrVariable(AttributeOrVariableExpression),

    /// Left-to-right navigation
    Chain(ChainExpression),
}

impl Expression {
    /// Build the node for a parsed name
    pub fn from_name(name: NameWithModifier) -> Self {
        if name.is_variable() {
            Expression::Variable(VariableExpression::new(name))
        } else {
            Expression::AttributeOrVariable(AttributeOrVariableExpression::new(name))
        }
    }

    /// Whether a failed resolution of this expression yields null instead of an error
    pub fn is_optional(&self) -> bool {
        match self {
            Expression::This | Expression::Literal(_) => false,
            Expression::Variable(expr) => expr.name().is_optional(),
            Expression::AttributeOrVariable(expr) => expr.name().is_optional(),
            Expression::Chain(chain) => chain.segments().iter().any(Expression::is_optional),
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::This => f.write_str("this"),
            Expression::Literal(Value::String(s)) => write!(f, "'{s}'"),
            Expression::Literal(value) => write!(f, "{value}"),
            Expression::Variable(expr) => write!(f, "{}", expr.name()),
            Expression::AttributeOrVariable(expr) => write!(f, "{}", expr.name()),
            Expression::Chain(chain) => write!(f, "{chain}"),
        }
    }
}

/// Reference to a named variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableExpression {
    name: NameWithModifier,
}

impl VariableExpression {
    /// Create a variable reference; the variable flag is always set on the stored name
    pub fn new(name: NameWithModifier) -> Self {
        let name = if name.is_variable() {
            name
        } else {
            name.as_variable()
        };
        Self { name }
    }

    /// The referenced name
    pub fn name(&self) -> &NameWithModifier {
        &self.name
    }
}

/// Reference resolved against the current value's accessors, or a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeOrVariableExpression {
    name: NameWithModifier,
}

impl AttributeOrVariableExpression {
    /// Create an attribute-or-variable reference
    pub fn new(name: NameWithModifier) -> Self {
        Self { name }
    }

    /// The referenced name
    pub fn name(&self) -> &NameWithModifier {
        &self.name
    }
}

/// Sequence of expressions where each result is the next step's current value.
///
/// The chain keeps the separator it was parsed with; equality compares the
/// segments only.
#[derive(Debug, Clone)]
pub struct ChainExpression {
    segments: Vec<Expression>,
    separator: char,
}

impl ChainExpression {
    /// Create a chain rendered with the default separator
    pub fn new(segments: Vec<Expression>) -> Self {
        Self::with_separator(segments, DEFAULT_SEPARATOR)
    }

    /// Create a chain rendered with `separator`
    pub fn with_separator(segments: Vec<Expression>, separator: char) -> Self {
        Self {
            segments,
            separator,
        }
    }

    /// The chained steps in evaluation order
    pub fn segments(&self) -> &[Expression] {
        &self.segments
    }

    /// Collapse trivial chains: none becomes `This`, one becomes the segment itself
    pub fn into_expression(mut self) -> Expression {
        match self.segments.len() {
            0 => Expression::This,
            1 => self.segments.swap_remove(0),
            _ => Expression::Chain(self),
        }
    }

    /// Render the first `count` segments, used to report where navigation stopped
    pub fn render_prefix(&self, count: usize) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().take(count).enumerate() {
            if i > 0 {
                out.push(self.separator);
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl PartialEq for ChainExpression {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl fmt::Display for ChainExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_prefix(self.segments.len()))
    }
}
