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

//! Parser error types

use thiserror::Error;

/// Result type for parser operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Parse error with location information
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Character that cannot appear at this point of a path
    #[error("Unexpected character '{found}' at position {position}")]
    UnexpectedCharacter {
        /// The unexpected character
        found: char,
        /// Position where the character was found
        position: usize,
    },

    /// A separator was not followed by a name
    #[error("Expected a name at position {position}")]
    ExpectedName {
        /// Position where the name was expected
        position: usize,
    },

    /// A modifier was not followed by a valid identifier
    #[error("Invalid identifier at position {position}: {message}")]
    InvalidIdentifier {
        /// Position of the malformed identifier
        position: usize,
        /// What is wrong with it
        message: String,
    },

    /// Invalid literal value
    #[error("Invalid {literal_type} literal at position {position}: {value}")]
    InvalidLiteral {
        /// Type of literal that failed to parse
        literal_type: &'static str,
        /// The invalid value that was encountered
        value: String,
        /// Position where the invalid literal was found
        position: usize,
    },

    /// Unclosed string literal
    #[error("Unclosed string literal starting at position {position}")]
    UnclosedString {
        /// Position where the unclosed string started
        position: usize,
    },
}

impl ParseError {
    /// Position in the input where parsing failed
    pub fn position(&self) -> usize {
        match self {
            ParseError::UnexpectedCharacter { position, .. }
            | ParseError::ExpectedName { position }
            | ParseError::InvalidIdentifier { position, .. }
            | ParseError::InvalidLiteral { position, .. }
            | ParseError::UnclosedString { position } => *position,
        }
    }

    /// Human-readable reason without the position
    pub fn reason(&self) -> String {
        match self {
            ParseError::UnexpectedCharacter { found, .. } => {
                format!("unexpected character '{found}'")
            }
            ParseError::ExpectedName { .. } => "expected a name".to_string(),
            ParseError::InvalidIdentifier { message, .. } => message.clone(),
            ParseError::InvalidLiteral {
                literal_type,
                value,
                ..
            } => format!("invalid {literal_type} literal '{value}'"),
            ParseError::UnclosedString { .. } => "unclosed string literal".to_string(),
        }
    }
}
