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

//! Lexical analysis utilities and the parse cursor

use super::error::{ParseError, ParseResult};
use super::span::{Span, Spanned};
use crate::ast::NameWithModifier;
use crate::config::ParserConfig;
use crate::model::Value;
use nom::bytes::complete::{take_till, take_while};
use nom::character::complete::{char, digit1, multispace0, satisfy};
use nom::combinator::{opt, recognize};
use nom::sequence::{delimited, pair};
use nom::{IResult, Parser};

type SpanResult<'a, O> = IResult<Span<'a>, O>;

/// Check if a character can start an identifier
pub fn is_identifier_start(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_start(c) || c == '_'
}

/// Check if a character can continue an identifier
pub fn is_identifier_continue(c: char) -> bool {
    unicode_xid::UnicodeXID::is_xid_continue(c)
}

fn identifier(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    recognize(pair(
        satisfy(is_identifier_start),
        take_while(is_identifier_continue),
    ))
    .parse(input)
}

fn string_literal(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    delimited(char('\''), take_till(|c: char| c == '\''), char('\'')).parse(input)
}

fn integer_literal(input: Span<'_>) -> SpanResult<'_, Span<'_>> {
    recognize(pair(opt(char('-')), digit1)).parse(input)
}

/// Cursor over a path expression.
///
/// Reads one token at a time and never consumes more than the token it was
/// asked for; assembling names into chains is left to the caller.
#[derive(Debug, Clone, Copy)]
pub struct ParseCursor<'input, 'cfg> {
    rest: Span<'input>,
    config: &'cfg ParserConfig,
}

impl<'input, 'cfg> ParseCursor<'input, 'cfg> {
    /// Create a cursor at the start of `input`
    pub fn new(input: &'input str, config: &'cfg ParserConfig) -> Self {
        Self {
            rest: Span::new(input),
            config,
        }
    }

    /// Current byte offset in the input
    pub fn position(&self) -> usize {
        self.rest.location_offset()
    }

    /// Peek at the next character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.rest.fragment().chars().next()
    }

    /// Check if the whole input has been consumed
    pub fn is_eof(&self) -> bool {
        self.rest.fragment().is_empty()
    }

    /// Skip any whitespace at the cursor
    pub fn skip_whitespace(&mut self) {
        let result: SpanResult<'input, Span<'input>> = multispace0(self.rest);
        if let Ok((rest, _)) = result {
            self.rest = rest;
        }
    }

    /// Consume the path separator if it is the next character
    pub fn consume_separator(&mut self) -> bool {
        self.consume_char(self.config.separator)
    }

    fn consume_char(&mut self, expected: char) -> bool {
        let result: SpanResult<'input, char> = char(expected).parse(self.rest);
        match result {
            Ok((rest, _)) => {
                self.rest = rest;
                true
            }
            Err(_) => false,
        }
    }

    /// Parse a name with its leading modifiers.
    ///
    /// Returns `Ok(None)` without consuming anything when the next token
    /// cannot start a name. Once a modifier has been consumed an identifier
    /// must follow.
    pub fn parse_name_with_modifier(&mut self) -> ParseResult<Option<Spanned<NameWithModifier>>> {
        let start = self.position();
        let optional = self.consume_char(self.config.optional_marker);
        let variable = self.consume_char(self.config.variable_marker);

        match identifier(self.rest) {
            Ok((rest, ident)) => {
                self.rest = rest;
                let name =
                    NameWithModifier::parsed(*ident.fragment(), optional, variable, *self.config);
                Ok(Some(Spanned::new(name, start, self.position())))
            }
            Err(_) if !optional && !variable => Ok(None),
            Err(_) => {
                let marker = if variable {
                    self.config.variable_marker
                } else {
                    self.config.optional_marker
                };
                let found = match self.peek() {
                    Some(c) => format!("'{c}'"),
                    None => "end of input".to_string(),
                };
                Err(ParseError::InvalidIdentifier {
                    position: self.position(),
                    message: format!("expected identifier after '{marker}', found {found}"),
                })
            }
        }
    }

    /// Parse a string or integer literal.
    ///
    /// Returns `Ok(None)` without consuming anything when the next token is
    /// not a literal.
    pub fn parse_literal(&mut self) -> ParseResult<Option<Spanned<Value>>> {
        let start = self.position();

        match self.peek() {
            Some('\'') => {
                let (rest, body) = string_literal(self.rest)
                    .map_err(|_| ParseError::UnclosedString { position: start })?;
                self.rest = rest;
                let value = Value::from(*body.fragment());
                Ok(Some(Spanned::new(value, start, self.position())))
            }
            Some(c) if c.is_ascii_digit() || c == '-' => {
                let (rest, digits) =
                    integer_literal(self.rest).map_err(|_| ParseError::InvalidLiteral {
                        literal_type: "integer",
                        value: c.to_string(),
                        position: start,
                    })?;
                let number =
                    digits
                        .fragment()
                        .parse::<i64>()
                        .map_err(|_| ParseError::InvalidLiteral {
                            literal_type: "integer",
                            value: digits.fragment().to_string(),
                            position: start,
                        })?;
                self.rest = rest;
                Ok(Some(Spanned::new(Value::Integer(number), start, self.position())))
            }
            _ => Ok(None),
        }
    }

    /// Build an error for whatever character sits at the cursor
    pub fn unexpected(&self) -> ParseError {
        match self.peek() {
            Some(found) => ParseError::UnexpectedCharacter {
                found,
                position: self.position(),
            },
            None => ParseError::ExpectedName {
                position: self.position(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('Z'));
        assert!(is_identifier_start('_'));
        assert!(!is_identifier_start('0'));
        assert!(!is_identifier_start('-'));

        assert!(is_identifier_continue('a'));
        assert!(is_identifier_continue('0'));
        assert!(is_identifier_continue('_'));
        assert!(!is_identifier_continue('-'));
    }

    #[test]
    fn test_cursor_reads_one_name_at_a_time() {
        let config = ParserConfig::default();
        let mut cursor = ParseCursor::new("?address.$city", &config);

        let first = cursor.parse_name_with_modifier().unwrap().unwrap();
        assert_eq!(first.value, NameWithModifier::new("address", true, false).unwrap());
        assert_eq!((first.start, first.end), (0, 8));

        // The separator is left for the caller
        assert_eq!(cursor.peek(), Some('.'));
        assert!(cursor.consume_separator());

        let second = cursor.parse_name_with_modifier().unwrap().unwrap();
        assert_eq!(second.value, NameWithModifier::new("city", false, true).unwrap());
        assert!(cursor.is_eof());
    }

    #[test]
    fn test_cursor_returns_none_for_non_name() {
        let config = ParserConfig::default();
        let mut cursor = ParseCursor::new("'text'", &config);
        assert_eq!(cursor.parse_name_with_modifier().unwrap(), None);
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_cursor_rejects_dangling_modifier() {
        let config = ParserConfig::default();
        let mut cursor = ParseCursor::new("?$9", &config);
        let err = cursor.parse_name_with_modifier().unwrap_err();
        assert_eq!(err.position(), 2);
        assert!(err.reason().contains("'$'"));
    }

    #[test]
    fn test_cursor_literals() {
        let config = ParserConfig::default();

        let mut cursor = ParseCursor::new("'hello world'", &config);
        let literal = cursor.parse_literal().unwrap().unwrap();
        assert_eq!(literal.value, Value::from("hello world"));
        assert!(cursor.is_eof());

        let mut cursor = ParseCursor::new("-42", &config);
        let literal = cursor.parse_literal().unwrap().unwrap();
        assert_eq!(literal.value, Value::Integer(-42));

        let mut cursor = ParseCursor::new("'open", &config);
        assert_eq!(
            cursor.parse_literal().unwrap_err(),
            ParseError::UnclosedString { position: 0 }
        );

        let mut cursor = ParseCursor::new("99999999999999999999", &config);
        assert!(matches!(
            cursor.parse_literal().unwrap_err(),
            ParseError::InvalidLiteral { .. }
        ));
    }

    #[test]
    fn test_cursor_custom_markers() {
        let config = ParserConfig::new('~', '#', '/');
        let mut cursor = ParseCursor::new("~#total/x", &config);
        let name = cursor.parse_name_with_modifier().unwrap().unwrap();
        assert_eq!(name.value, NameWithModifier::new("total", true, true).unwrap());
        assert_eq!(name.value.to_string(), "~#total");
        assert!(cursor.consume_separator());
    }
}
