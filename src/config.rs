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

//! Engine configuration options

use crate::error::{ContractViolation, Result};
use crate::parser::lexer::is_identifier_continue;
use serde::{Deserialize, Serialize};

/// Default prefix marking a name as optional
pub const DEFAULT_OPTIONAL_MARKER: char = '?';

/// Default prefix marking a name as a named variable
pub const DEFAULT_VARIABLE_MARKER: char = '$';

/// Default path separator
pub const DEFAULT_SEPARATOR: char = '.';

/// Delimiter characters of the path syntax.
///
/// Fixed once per engine; every expression compiled by that engine uses the
/// same characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Prefix marking a name that may fail to resolve without an error
    pub optional_marker: char,

    /// Prefix forcing a name to resolve as a named variable
    pub variable_marker: char,

    /// Separator between path segments
    pub separator: char,
}

impl ParserConfig {
    /// Create a parser configuration with custom delimiters
    pub fn new(optional_marker: char, variable_marker: char, separator: char) -> Self {
        Self {
            optional_marker,
            variable_marker,
            separator,
        }
    }

    /// Check that the delimiters are distinct and cannot be confused with names
    pub fn validate(&self) -> std::result::Result<(), ContractViolation> {
        let markers = [
            ("optional marker", self.optional_marker),
            ("variable marker", self.variable_marker),
            ("separator", self.separator),
        ];

        for (role, c) in markers {
            if is_identifier_continue(c) || c.is_whitespace() || c == '\'' || c == '-' {
                return Err(ContractViolation::new(format!(
                    "{role} '{c}' is not usable as a path delimiter"
                )));
            }
        }

        if self.optional_marker == self.variable_marker
            || self.optional_marker == self.separator
            || self.variable_marker == self.separator
        {
            return Err(ContractViolation::new(format!(
                "path delimiters must be distinct, got '{}', '{}' and '{}'",
                self.optional_marker, self.variable_marker, self.separator
            )));
        }

        Ok(())
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            optional_marker: DEFAULT_OPTIONAL_MARKER,
            variable_marker: DEFAULT_VARIABLE_MARKER,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

/// Configuration for the expression engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path syntax delimiters
    pub parser: ParserConfig,

    /// Maximum number of compiled expressions kept in the LRU cache (0 disables it)
    pub ast_cache_size: usize,

    /// Whether accessor resolutions are memoized per (type, name)
    pub memoize_accessors: bool,
}

impl EngineConfig {
    /// Create a configuration with all caching disabled
    pub fn uncached() -> Self {
        Self {
            parser: ParserConfig::default(),
            ast_cache_size: 0,
            memoize_accessors: false,
        }
    }

    /// Use custom path delimiters
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Load a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ContractViolation> {
        self.parser.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            ast_cache_size: 1_024,
            memoize_accessors: true,
        }
    }
}
