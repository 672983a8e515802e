//! Where type facts come from: the two merge strategies.
//!
//! Both strategies implement [`FactSource`], which maps the merge's target
//! nodes to facts. Everything after that (parsing, attaching, propagation)
//! is shared, so the strategies differ only in how many engine calls they
//! make.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use typemerge_core::TypeFact;
use typemerge_flow::{EngineError, PointAnswer, TypeEngine};
use typemerge_syntax::{NodeId, SyntaxTree};

use crate::index::PositionIndex;

/// How facts are obtained.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One `dump-types` call, correlated through a [`PositionIndex`].
    #[default]
    Bulk,
    /// One `type-at-pos` call per target node, issued concurrently.
    Point,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Bulk => write!(f, "bulk"),
            Strategy::Point => write!(f, "point"),
        }
    }
}

/// Facts gathered for a set of targets.
#[derive(Debug, Default)]
pub struct CollectedFacts {
    /// Fact per target. Targets without a fact are absent.
    pub facts: HashMap<NodeId, TypeFact>,
    pub engine_calls: usize,
    /// Point queries that failed; those targets have no fact.
    pub failed_queries: usize,
}

/// A provider of facts for the merge.
#[async_trait]
pub trait FactSource: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn engine_name(&self) -> &str;

    /// Fatal precondition check, run once before [`FactSource::collect`].
    async fn ensure_available(&self, file: &Path) -> Result<(), EngineError>;

    /// Find facts for `targets`. An `Err` aborts the merge.
    async fn collect(
        &self,
        file: &Path,
        tree: &SyntaxTree,
        targets: &[NodeId],
    ) -> Result<CollectedFacts, EngineError>;
}

/// Build the source for `strategy` over `engine`.
pub fn source_for<'a>(strategy: Strategy, engine: &'a dyn TypeEngine) -> Box<dyn FactSource + 'a> {
    match strategy {
        Strategy::Bulk => Box::new(BulkDumpSource::new(engine)),
        Strategy::Point => Box::new(PointQuerySource::new(engine)),
    }
}

// ============================================================================
// Point queries
// ============================================================================

/// One query per target at the node's start position.
///
/// Queries are independent and all in flight at once on the calling task. A
/// failed query leaves only its own node without a fact. An answer located
/// at a different span than the node is dropped, as a bulk lookup would miss
/// it.
pub struct PointQuerySource<'a> {
    engine: &'a dyn TypeEngine,
}

impl<'a> PointQuerySource<'a> {
    pub fn new(engine: &'a dyn TypeEngine) -> Self {
        PointQuerySource { engine }
    }
}

#[async_trait]
impl FactSource for PointQuerySource<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::Point
    }

    fn engine_name(&self) -> &str {
        self.engine.name()
    }

    async fn ensure_available(&self, file: &Path) -> Result<(), EngineError> {
        self.engine.ensure_available(file).await
    }

    async fn collect(
        &self,
        file: &Path,
        tree: &SyntaxTree,
        targets: &[NodeId],
    ) -> Result<CollectedFacts, EngineError> {
        let engine = self.engine;
        let queries = targets.iter().map(|&id| {
            let range = tree[id].range();
            async move {
                // Engine columns are 1-based.
                let answer = engine
                    .type_at_pos(file, range.start.line, range.start.column + 1)
                    .await;
                (id, range, answer)
            }
        });
        let answers = join_all(queries).await;

        let mut collected = CollectedFacts {
            engine_calls: answers.len(),
            ..CollectedFacts::default()
        };
        for (id, range, answer) in answers {
            match answer {
                Ok(PointAnswer {
                    range: Some(located),
                    ..
                }) if located != range => {
                    debug!(
                        line = range.start.line,
                        column = range.start.column,
                        kind = %tree[id].kind(),
                        answered = %located,
                        "point answer belongs to another span"
                    );
                }
                Ok(answer) => {
                    collected.facts.insert(id, answer.into_fact(range));
                }
                Err(err) => {
                    warn!(
                        file = %file.display(),
                        line = range.start.line,
                        column = range.start.column,
                        kind = %tree[id].kind(),
                        error = %err,
                        "type query failed"
                    );
                    collected.failed_queries += 1;
                }
            }
        }
        Ok(collected)
    }
}

// ============================================================================
// Bulk dump
// ============================================================================

/// One dump for the whole file, looked up by exact node span.
pub struct BulkDumpSource<'a> {
    engine: &'a dyn TypeEngine,
}

impl<'a> BulkDumpSource<'a> {
    pub fn new(engine: &'a dyn TypeEngine) -> Self {
        BulkDumpSource { engine }
    }
}

#[async_trait]
impl FactSource for BulkDumpSource<'_> {
    fn strategy(&self) -> Strategy {
        Strategy::Bulk
    }

    fn engine_name(&self) -> &str {
        self.engine.name()
    }

    async fn ensure_available(&self, file: &Path) -> Result<(), EngineError> {
        self.engine.ensure_available(file).await
    }

    async fn collect(
        &self,
        file: &Path,
        tree: &SyntaxTree,
        targets: &[NodeId],
    ) -> Result<CollectedFacts, EngineError> {
        let index = PositionIndex::build(self.engine.dump_types(file).await?);
        debug!(
            indexed = index.len(),
            multi_line = index.skipped(),
            "built position index"
        );

        let facts = targets
            .iter()
            .filter_map(|&id| {
                index
                    .lookup_range(tree[id].range())
                    .map(|fact| (id, fact.clone()))
            })
            .collect();
        Ok(CollectedFacts {
            facts,
            engine_calls: 1,
            failed_queries: 0,
        })
    }
}
