//! Exact-span lookup of type facts from a bulk dump.

use std::collections::HashMap;

use typemerge_core::{SourceRange, Span, TypeFact};

/// `line -> start column -> end column -> fact`.
///
/// Only single-line facts are indexed. Inserting a fact for an occupied key
/// replaces the earlier one, so after [`PositionIndex::build`] each key holds
/// the last fact given for it. Lookups match spans exactly; overlapping or
/// enclosing spans never match.
#[derive(Debug, Clone, Default)]
pub struct PositionIndex {
    lines: HashMap<u32, HashMap<u32, HashMap<u32, TypeFact>>>,
    len: usize,
    skipped: usize,
}

impl PositionIndex {
    pub fn build<I>(facts: I) -> Self
    where
        I: IntoIterator<Item = TypeFact>,
    {
        let mut index = PositionIndex::default();
        for fact in facts {
            index.insert(fact);
        }
        index
    }

    /// Index one fact. Returns `false` if it spans lines and was skipped.
    pub fn insert(&mut self, fact: TypeFact) -> bool {
        let Some(span) = fact.span() else {
            self.skipped += 1;
            return false;
        };
        let previous = self
            .lines
            .entry(span.line)
            .or_default()
            .entry(span.start_column)
            .or_default()
            .insert(span.end_column, fact);
        if previous.is_none() {
            self.len += 1;
        }
        true
    }

    pub fn lookup(&self, span: Span) -> Option<&TypeFact> {
        self.lines
            .get(&span.line)?
            .get(&span.start_column)?
            .get(&span.end_column)
    }

    /// Look up a node range. Multi-line ranges never match.
    pub fn lookup_range(&self, range: SourceRange) -> Option<&TypeFact> {
        self.lookup(range.as_span()?)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of multi-line facts left out.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
