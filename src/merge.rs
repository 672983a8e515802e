//! The merge driver.
//!
//! A merge runs in four steps:
//!
//! 1. Check once that the engine is usable. Failure here is fatal and
//!    happens before any query.
//! 2. Collect facts for the eligible nodes through the configured
//!    [`FactSource`]. Every query settles before anything is written.
//! 3. Identifier pass, in pre-order: attach each identifier's type, then
//!    give the parent the same annotation if the parent is eligible and has
//!    none yet.
//! 4. General pass, in pre-order: attach each remaining eligible node's own
//!    type unless it was annotated by propagation.
//!
//! A node is written at most once, and writes happen in walk order, so the
//! result does not depend on the order in which queries complete.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};
use typemerge_core::{MergeError, MergeResult, TypeFact};
use typemerge_flow::TypeEngine;
use typemerge_syntax::{FragmentParseError, NodeId, NodeKind, ParserOptions, SyntaxTree};

use crate::annotate::annotation_for;
use crate::eligibility::{target_set, EligibilityFilter};
use crate::fragment::resolve;
use crate::source::{source_for, FactSource, Strategy};

/// Everything a merge needs besides the tree and the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOptions {
    pub strategy: Strategy,
    pub eligibility: EligibilityFilter,
    /// Dialect of the source file; fragments are parsed with the same one.
    pub parser: ParserOptions,
}

/// Counters for one merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    /// Nodes that passed the eligibility filter.
    pub eligible: usize,
    pub engine_calls: usize,
    /// Eligible nodes for which the engine had a fact.
    pub facts_found: usize,
    /// Nodes annotated from their own fact.
    pub annotated: usize,
    /// Parents annotated from an identifier.
    pub propagated: usize,
    /// Facts that said `(unknown)`.
    pub unknown: usize,
    /// Facts whose type text could not be parsed.
    pub failed: usize,
    /// Point queries that failed.
    pub failed_queries: usize,
}

/// A tree with its merge statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedTree {
    pub tree: SyntaxTree,
    pub stats: MergeStats,
}

/// Merges engine facts into trees for one engine and one set of options.
pub struct Merger<'a> {
    engine: &'a dyn TypeEngine,
    options: MergeOptions,
}

impl<'a> Merger<'a> {
    pub fn new(engine: &'a dyn TypeEngine, options: MergeOptions) -> Self {
        Merger { engine, options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Annotate `tree`, the parse of `file`.
    ///
    /// Annotations already present on `tree` are discarded first.
    pub async fn merge(&self, tree: SyntaxTree, file: &Path) -> MergeResult<AnnotatedTree> {
        let source = source_for(self.options.strategy, self.engine);
        merge_with_source(
            tree,
            file,
            source.as_ref(),
            &self.options.eligibility,
            &self.options.parser,
        )
        .await
    }

    /// [`Merger::merge`] on a private current-thread runtime.
    ///
    /// Must not be called from within an async runtime.
    pub fn merge_blocking(&self, tree: SyntaxTree, file: &Path) -> MergeResult<AnnotatedTree> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| MergeError::internal(format!("failed to start runtime: {}", e)))?;
        runtime.block_on(self.merge(tree, file))
    }
}

/// Annotate `tree` with facts from `engine`.
pub async fn merge(
    tree: SyntaxTree,
    file: &Path,
    engine: &dyn TypeEngine,
    options: &MergeOptions,
) -> MergeResult<AnnotatedTree> {
    Merger::new(engine, options.clone()).merge(tree, file).await
}

/// Blocking form of [`merge`].
pub fn merge_blocking(
    tree: SyntaxTree,
    file: &Path,
    engine: &dyn TypeEngine,
    options: &MergeOptions,
) -> MergeResult<AnnotatedTree> {
    Merger::new(engine, options.clone()).merge_blocking(tree, file)
}

/// Annotate `tree` with facts from an explicit source.
pub async fn merge_with_source(
    mut tree: SyntaxTree,
    file: &Path,
    source: &dyn FactSource,
    filter: &EligibilityFilter,
    parser: &ParserOptions,
) -> MergeResult<AnnotatedTree> {
    source
        .ensure_available(file)
        .await
        .map_err(|err| MergeError::EngineUnavailable {
            engine: source.engine_name().to_string(),
            reason: err.to_string(),
        })?;

    tree.clear_annotations();
    let targets = filter.targets(&tree);
    let eligible = target_set(&targets);
    debug!(
        file = %file.display(),
        strategy = %source.strategy(),
        targets = targets.len(),
        "collecting facts"
    );

    let collected = source
        .collect(file, &tree, &targets)
        .await
        .map_err(|err| err.into_merge_error(source.engine_name()))?;
    let mut stats = MergeStats {
        eligible: targets.len(),
        engine_calls: collected.engine_calls,
        facts_found: collected.facts.len(),
        failed_queries: collected.failed_queries,
        ..MergeStats::default()
    };

    let mut writer = Writer {
        tree: &mut tree,
        file,
        parser,
        stats: &mut stats,
    };

    let (identifiers, others): (Vec<NodeId>, Vec<NodeId>) = targets
        .iter()
        .copied()
        .partition(|&id| *writer.tree[id].kind() == NodeKind::Identifier);

    for id in identifiers {
        if writer.tree.annotation(id).is_some() {
            continue;
        }
        let Some(fact) = collected.facts.get(&id) else {
            continue;
        };
        if writer.write(id, fact) {
            writer.propagate_to_parent(id, &eligible);
        }
    }

    for id in others {
        if writer.tree.annotation(id).is_some() {
            continue;
        }
        if let Some(fact) = collected.facts.get(&id) {
            writer.write(id, fact);
        }
    }

    info!(
        file = %file.display(),
        strategy = %source.strategy(),
        eligible = stats.eligible,
        engine_calls = stats.engine_calls,
        facts = stats.facts_found,
        annotated = stats.annotated,
        propagated = stats.propagated,
        unknown = stats.unknown,
        failed = stats.failed,
        failed_queries = stats.failed_queries,
        "merge complete"
    );
    Ok(AnnotatedTree { tree, stats })
}

struct Writer<'t> {
    tree: &'t mut SyntaxTree,
    file: &'t Path,
    parser: &'t ParserOptions,
    stats: &'t mut MergeStats,
}

impl Writer<'_> {
    /// Resolve and attach `fact` to `id`. Returns whether it was attached.
    fn write(&mut self, id: NodeId, fact: &TypeFact) -> bool {
        match resolve(fact, self.parser) {
            Ok(Some(parsed)) => {
                self.tree.set_annotation(id, annotation_for(fact, parsed));
                self.stats.annotated += 1;
                true
            }
            Ok(None) => {
                self.stats.unknown += 1;
                false
            }
            Err(err) => {
                self.report(id, fact, &err);
                self.stats.failed += 1;
                false
            }
        }
    }

    fn propagate_to_parent(&mut self, id: NodeId, eligible: &HashSet<NodeId>) {
        let Some(parent) = self.tree.parent_of(id) else {
            return;
        };
        if !eligible.contains(&parent) || self.tree.annotation(parent).is_some() {
            return;
        }
        if let Some(annotation) = self.tree.annotation(id).cloned() {
            self.tree.set_annotation(parent, annotation);
            self.stats.propagated += 1;
        }
    }

    fn report(&self, id: NodeId, fact: &TypeFact, err: &FragmentParseError) {
        let node = &self.tree[id];
        let start = node.range().start;
        warn!(
            file = %self.file.display(),
            line = start.line,
            column = start.column,
            kind = %node.kind(),
            context = %describe_context(self.tree, id),
            raw = %fact.raw_type,
            error = %err,
            "could not parse inferred type"
        );
    }
}

/// Kinds and start positions of up to two enclosing nodes, innermost first.
pub fn describe_context(tree: &SyntaxTree, id: NodeId) -> String {
    tree.ancestors(id)
        .take(2)
        .map(|ancestor| {
            let node = &tree[ancestor];
            let start = node.range().start;
            format!("{}@{}:{}", node.kind(), start.line, start.column)
        })
        .collect::<Vec<_>>()
        .join(" < ")
}
