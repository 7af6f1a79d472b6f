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

//! Path expression parser
//!
//! Turns text such as `?order.customer.$currency` into an [`Expression`].
//!
//! Grammar (delimiters come from [`ParserConfig`]):
//!
//! ```text
//! expression := ws* ( literal | path )? ws*
//! path       := name ( separator name )*
//! name       := optional_marker? variable_marker? identifier
//! literal    := "'" [^']* "'" | "-"? digit+
//! ```
//!
//! An empty expression is a reference to the current value.

#![warn(missing_docs)]

pub mod error;
pub mod lexer;
pub mod span;

pub use error::{ParseError, ParseResult};
pub use lexer::ParseCursor;
pub use span::{Span, Spanned};

use crate::ast::{ChainExpression, Expression};
use crate::config::ParserConfig;

/// Parse an expression using the default delimiters
pub fn parse(input: &str) -> ParseResult<Expression> {
    parse_with_config(input, &ParserConfig::default())
}

/// Parse an expression using custom delimiters
pub fn parse_with_config(input: &str, config: &ParserConfig) -> ParseResult<Expression> {
    let mut cursor = ParseCursor::new(input, config);
    cursor.skip_whitespace();

    if cursor.is_eof() {
        return Ok(Expression::This);
    }

    if let Some(literal) = cursor.parse_literal()? {
        finish(&mut cursor)?;
        return Ok(Expression::Literal(literal.into_inner()));
    }

    let Some(first) = cursor.parse_name_with_modifier()? else {
        return Err(cursor.unexpected());
    };

    let mut segments = vec![Expression::from_name(first.into_inner())];
    while cursor.consume_separator() {
        match cursor.parse_name_with_modifier()? {
            Some(name) => segments.push(Expression::from_name(name.into_inner())),
            None => {
                return Err(ParseError::ExpectedName {
                    position: cursor.position(),
                });
            }
        }
    }
    finish(&mut cursor)?;

    Ok(ChainExpression::with_separator(segments, config.separator).into_expression())
}

fn finish(cursor: &mut ParseCursor<'_, '_>) -> ParseResult<()> {
    cursor.skip_whitespace();
    if cursor.is_eof() {
        Ok(())
    } else {
        Err(cursor.unexpected())
    }
}
