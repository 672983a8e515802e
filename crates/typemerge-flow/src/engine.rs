//! The type engine capability.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value};
use typemerge_core::{SourceRange, TypeFact, UNKNOWN_TYPE};

use crate::error::EngineError;

/// Answer to a point query.
#[derive(Debug, Clone, PartialEq)]
pub struct PointAnswer {
    /// The engine's textual rendering of the type.
    pub raw_type: String,
    /// Where the engine says the answer applies, when it says so.
    pub range: Option<SourceRange>,
    /// Remaining engine fields, unscrubbed.
    pub metadata: Map<String, Value>,
}

impl PointAnswer {
    pub fn new(raw_type: impl Into<String>) -> Self {
        PointAnswer {
            raw_type: raw_type.into(),
            range: None,
            metadata: Map::new(),
        }
    }

    /// The "no information" answer.
    pub fn unknown() -> Self {
        PointAnswer::new(UNKNOWN_TYPE)
    }

    pub fn is_unknown(&self) -> bool {
        self.raw_type == UNKNOWN_TYPE
    }

    /// Turn the answer into a fact about the node occupying `range`.
    pub fn into_fact(self, range: SourceRange) -> TypeFact {
        TypeFact::new(range, self.raw_type).with_metadata(self.metadata)
    }
}

/// An external type-checking engine.
///
/// Both call shapes may fail at the process level. Callers decide whether a
/// failure is scoped to one node or fatal; [`TypeEngine::ensure_available`]
/// exists so that global unavailability is reported once, up front.
///
/// The `#[async_trait]` macro keeps the trait object-safe so merges can hold
/// a `&dyn TypeEngine`.
#[async_trait]
pub trait TypeEngine: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Check that the engine can be invoked for `file`.
    async fn ensure_available(&self, file: &Path) -> Result<(), EngineError>;

    /// Type at a position. `line` is 1-based, `column` is 1-based.
    async fn type_at_pos(
        &self,
        file: &Path,
        line: u32,
        column: u32,
    ) -> Result<PointAnswer, EngineError>;

    /// Every fact the engine has for `file`.
    ///
    /// Records whose type is not a string are dropped. Multi-line facts are
    /// returned as-is.
    async fn dump_types(&self, file: &Path) -> Result<Vec<TypeFact>, EngineError>;
}
