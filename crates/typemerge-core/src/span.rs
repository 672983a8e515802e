//! Source coordinates shared by syntax trees and type facts.
//!
//! Both artifacts use the same convention: lines are 1-indexed, columns are
//! 0-indexed, and the end position is exclusive. Engines that report other
//! conventions must convert at their boundary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single point in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (0-indexed).
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The full start/end extent of a node or fact, possibly spanning lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    pub fn new(start: Position, end: Position) -> Self {
        SourceRange { start, end }
    }

    /// Range on a single line from `start_column` to `end_column`.
    pub fn on_line(line: u32, start_column: u32, end_column: u32) -> Self {
        SourceRange {
            start: Position::new(line, start_column),
            end: Position::new(line, end_column),
        }
    }

    /// Whether the range starts and ends on the same line.
    pub fn is_single_line(&self) -> bool {
        self.start.line == self.end.line
    }

    /// The single-line key for this range, or `None` if it spans lines.
    pub fn as_span(&self) -> Option<Span> {
        if self.is_single_line() {
            Some(Span {
                line: self.start.line,
                start_column: self.start.column,
                end_column: self.end.column,
            })
        } else {
            None
        }
    }
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Exact single-line lookup key: `(line, start_column, end_column)`.
///
/// Spans only exist for single-line ranges. Multi-line extents have no span
/// and can never be matched against an indexed fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    pub start_column: u32,
    pub end_column: u32,
}

impl Span {
    pub fn new(line: u32, start_column: u32, end_column: u32) -> Self {
        Span {
            line,
            start_column,
            end_column,
        }
    }

    pub fn start(&self) -> Position {
        Position::new(self.line, self.start_column)
    }

    pub fn range(&self) -> SourceRange {
        SourceRange::on_line(self.line, self.start_column, self.end_column)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}, {})", self.line, self.start_column, self.end_column)
    }
}
