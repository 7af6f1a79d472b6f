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

//! Evaluation context for path expressions
//!
//! A context carries the value the next expression step operates on, the
//! node evaluation started from and the accessor resolver. Two kinds exist:
//!
//! - **Node contexts** start from a [`PmNode`]; names that are no attribute of
//!   the current value fall back to variables defined on the originating node
//!   or its ancestors.
//! - **Plain contexts** start from an arbitrary value and only resolve
//!   attributes.
//!
//! Deriving a context for the next chain step keeps the kind and the
//! originating node; only the current value changes.

use crate::accessor::AccessorResolver;
use crate::model::{NamedValue, PmNode, Value};
use std::fmt;
use std::sync::Arc;

/// Kind of evaluation context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// Evaluation started from a presentation-model node; variables available
    Node,
    /// Evaluation over a plain object graph; attributes only
    Plain,
}

/// Context for evaluating path expressions
#[derive(Clone)]
pub struct EvaluationContext {
    current: Value,
    origin: Option<Arc<PmNode>>,
    resolver: Arc<dyn AccessorResolver>,
}

impl EvaluationContext {
    /// Create a node context whose current value is `node`
    pub fn for_node(node: &Arc<PmNode>, resolver: Arc<dyn AccessorResolver>) -> Self {
        Self {
            current: Value::Node(Arc::clone(node)),
            origin: Some(Arc::clone(node)),
            resolver,
        }
    }

    /// Create a plain context over `value`
    pub fn plain(value: Value, resolver: Arc<dyn AccessorResolver>) -> Self {
        Self {
            current: value,
            origin: None,
            resolver,
        }
    }

    /// Value the next expression step operates on
    pub fn current_value(&self) -> &Value {
        &self.current
    }

    /// Node evaluation started from, `None` for plain contexts
    pub fn originating_node(&self) -> Option<&Arc<PmNode>> {
        self.origin.as_ref()
    }

    /// Kind of this context
    pub fn kind(&self) -> ContextKind {
        if self.origin.is_some() {
            ContextKind::Node
        } else {
            ContextKind::Plain
        }
    }

    /// Whether named variables can be looked up
    pub fn supports_variables(&self) -> bool {
        self.origin.is_some()
    }

    /// Variable visible from the originating node; always `None` for plain contexts
    pub fn find_variable(&self, name: &str) -> Option<NamedValue> {
        self.origin.as_ref()?.find_variable(name)
    }

    /// Accessor resolver used for attribute names
    pub fn resolver(&self) -> &dyn AccessorResolver {
        self.resolver.as_ref()
    }

    /// Same context positioned on another value
    pub fn with_current_value(&self, value: Value) -> Self {
        Self {
            current: value,
            origin: self.origin.clone(),
            resolver: Arc::clone(&self.resolver),
        }
    }
}

impl fmt::Debug for EvaluationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvaluationContext")
            .field("kind", &self.kind())
            .field("current", &self.current)
            .field("origin", &self.origin.as_ref().map(|node| node.path()))
            .finish_non_exhaustive()
    }
}
