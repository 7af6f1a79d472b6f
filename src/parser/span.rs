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

//! Byte offsets attached to parsed tokens

use nom_locate::LocatedSpan;
use std::fmt;

/// Remaining input of the parse cursor, tracking its offset into the expression
pub type Span<'a> = LocatedSpan<&'a str>;

/// A token read by [`ParseCursor`](super::ParseCursor) and the byte range it covered
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    /// The token
    pub value: T,
    /// Offset of the first byte, modifiers included
    pub start: usize,
    /// Offset just past the last byte
    pub end: usize,
}

impl<T> Spanned<T> {
    /// Wrap a token read between `start` and `end`
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self { value, start, end }
    }

    /// Drop the offsets and keep the token
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: fmt::Display> fmt::Display for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}..{}", self.value, self.start, self.end)
    }
}
