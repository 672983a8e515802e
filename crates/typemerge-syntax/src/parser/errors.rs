// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use peg::error::ParseError;
use peg::str::LineCol;
use thiserror::Error;

/// Failure to parse a type fragment or declaration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FragmentParseError {
    /// The parser options do not enable type syntax.
    #[error("type syntax is not enabled (missing `flow` plugin)")]
    DialectDisabled,

    /// The text is not valid under the grammar.
    #[error("invalid {what} `{text}` at offset {offset}: expected {expected}")]
    Syntax {
        /// What was being parsed ("type", "class declaration").
        what: &'static str,
        /// The text as given by the caller, before wrapping.
        text: String,
        /// Byte offset of the failure within `text`.
        offset: usize,
        expected: String,
    },
}

impl FragmentParseError {
    /// Convert a grammar error on wrapped source back to caller coordinates.
    ///
    /// `prefix_len` is the number of synthetic bytes placed before `text`.
    pub(crate) fn from_peg(
        what: &'static str,
        text: &str,
        prefix_len: usize,
        err: ParseError<LineCol>,
    ) -> Self {
        let offset = err
            .location
            .offset
            .saturating_sub(prefix_len)
            .min(text.len());
        FragmentParseError::Syntax {
            what,
            text: text.to_string(),
            offset,
            expected: err.expected.to_string(),
        }
    }
}
