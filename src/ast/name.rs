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

//! Parsed path segment names

use crate::config::ParserConfig;
use crate::parser::lexer::{is_identifier_continue, is_identifier_start};
use crate::parser::{ParseCursor, ParseError, ParseResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

/// A name together with its modifiers, e.g. `?$total`.
///
/// Names remember the delimiters they were parsed with so that rendering
/// produces text the same parser accepts. Equality and hashing look at the
/// identifier and the two flags only.
#[derive(Debug, Clone)]
pub struct NameWithModifier {
    name: Arc<str>,
    optional: bool,
    variable: bool,
    delimiters: ParserConfig,
}

impl NameWithModifier {
    /// Create a name, rejecting anything that is not a single identifier
    pub fn new(name: impl Into<Arc<str>>, optional: bool, variable: bool) -> ParseResult<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self::parsed(name, optional, variable, ParserConfig::default()))
    }

    /// A plain name without modifiers
    pub fn plain(name: impl Into<Arc<str>>) -> ParseResult<Self> {
        Self::new(name, false, false)
    }

    /// Build a name the lexer has already matched as an identifier
    pub(crate) fn parsed(
        name: impl Into<Arc<str>>,
        optional: bool,
        variable: bool,
        delimiters: ParserConfig,
    ) -> Self {
        Self {
            name: name.into(),
            optional,
            variable,
            delimiters,
        }
    }

    /// The bare identifier
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether resolution may fail without raising an error
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the name must resolve as a named variable
    pub fn is_variable(&self) -> bool {
        self.variable
    }

    /// Delimiters used by `Display`
    pub fn delimiters(&self) -> &ParserConfig {
        &self.delimiters
    }

    /// Copy of this name with the variable flag set
    pub fn as_variable(&self) -> Self {
        Self {
            variable: true,
            ..self.clone()
        }
    }

    /// Render the name using the given delimiters
    pub fn render(&self, config: &ParserConfig) -> String {
        let mut out = String::with_capacity(self.name.len() + 2);
        if self.optional {
            out.push(config.optional_marker);
        }
        if self.variable {
            out.push(config.variable_marker);
        }
        out.push_str(&self.name);
        out
    }
}

fn validate_identifier(name: &str) -> ParseResult<()> {
    let mut chars = name.char_indices();
    let invalid = match chars.next() {
        None => Some((0, "empty name".to_string())),
        Some((_, c)) if !is_identifier_start(c) => Some((0, format!("'{c}' cannot start a name"))),
        Some(_) => chars
            .find(|&(_, c)| !is_identifier_continue(c))
            .map(|(i, c)| (i, format!("'{c}' cannot appear in a name"))),
    };
    match invalid {
        Some((position, message)) => Err(ParseError::InvalidIdentifier { position, message }),
        None => Ok(()),
    }
}

impl PartialEq for NameWithModifier {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.optional == other.optional
            && self.variable == other.variable
    }
}

impl Eq for NameWithModifier {}

impl Hash for NameWithModifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.optional.hash(state);
        self.variable.hash(state);
    }
}

impl fmt::Display for NameWithModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&self.delimiters))
    }
}

impl FromStr for NameWithModifier {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config = ParserConfig::default();
        let mut cursor = ParseCursor::new(s, &config);
        let name = cursor
            .parse_name_with_modifier()?
            .ok_or_else(|| cursor.unexpected())?;
        if !cursor.is_eof() {
            return Err(cursor.unexpected());
        }
        Ok(name.into_inner())
    }
}
