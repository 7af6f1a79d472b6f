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

//! Crate-level error types
//!
//! Each subsystem owns its own error enum ([`ParseError`] for the parser,
//! [`EvaluationError`] for the evaluator). [`PmError`] wraps them for callers
//! that drive the whole pipeline through the [`ExpressionEngine`].
//!
//! [`ExpressionEngine`]: crate::evaluator::ExpressionEngine

use crate::evaluator::EvaluationError;
use crate::parser::ParseError;
use thiserror::Error;

/// Result type alias for operations spanning parsing and evaluation
pub type Result<T> = std::result::Result<T, PmError>;

/// A caller broke an API contract at the crate boundary.
///
/// Raised for input that static typing could not rule out, e.g. a cache
/// property name read from configuration, or a parser configuration whose
/// marker characters collide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Contract violation: {detail}")]
pub struct ContractViolation {
    /// What was violated
    pub detail: String,
}

impl ContractViolation {
    /// Create a new contract violation
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Error type for the expression engine facade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PmError {
    /// Expression text could not be parsed
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Expression could not be evaluated or assigned
    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    /// API contract violation
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {message}")]
    Config {
        /// Underlying deserialization message
        message: String,
    },
}

impl From<serde_json::Error> for PmError {
    fn from(err: serde_json::Error) -> Self {
        PmError::Config {
            message: err.to_string(),
        }
    }
}
