// Error types for path expression evaluation

use thiserror::Error;

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;

/// Errors that can occur while evaluating or assigning an expression
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// No accessor for the name on the current value's type, and no variable fallback
    #[error("Unable to resolve '{name}' in type '{type_name}'")]
    UnresolvedName {
        /// Name that failed to resolve
        name: String,
        /// Runtime type it was resolved against
        type_name: String,
    },

    /// Variable not found
    #[error("Variable '{name}' not found")]
    UnresolvedVariable {
        /// Variable name
        name: String,
    },

    /// A non-optional path navigated onto a null value
    #[error("Unable to navigate past null value at '{path}'")]
    NullNavigation {
        /// Path evaluated up to and including the segment yielding null
        path: String,
    },

    /// Expression cannot be assigned to
    #[error("Expression '{expression}' is not assignable")]
    NotAssignable {
        /// The offending expression
        expression: String,
    },

    /// Type error during evaluation
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected type
        expected: String,
        /// Actual type found
        actual: String,
    },
}
