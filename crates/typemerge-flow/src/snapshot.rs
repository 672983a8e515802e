//! Replay of a recorded `dump-types` response.
//!
//! A `SnapshotEngine` answers both call shapes from one fixed fact set, so
//! it stands in for Flow in offline runs (`--dump`) and in tests.

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use typemerge_core::{Position, TypeFact};

use crate::engine::{PointAnswer, TypeEngine};
use crate::error::EngineError;
use crate::record::decode_dump;

#[derive(Debug, Clone, Default)]
pub struct SnapshotEngine {
    facts: Vec<TypeFact>,
}

impl SnapshotEngine {
    pub fn new(facts: Vec<TypeFact>) -> Self {
        SnapshotEngine { facts }
    }

    /// Load from Flow's `dump-types --json` output.
    pub fn from_json(value: Value) -> Result<Self, EngineError> {
        Ok(SnapshotEngine::new(decode_dump(value)?))
    }

    pub fn from_json_str(text: &str) -> Result<Self, EngineError> {
        SnapshotEngine::from_json(serde_json::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path)?;
        SnapshotEngine::from_json_str(&text)
    }

    pub fn facts(&self) -> &[TypeFact] {
        &self.facts
    }

    /// The fact a point query at `position` resolves to: among facts starting
    /// there, the one ending first; the later-recorded one on ties.
    pub fn fact_at(&self, position: Position) -> Option<&TypeFact> {
        self.facts
            .iter()
            .enumerate()
            .filter(|(_, fact)| fact.range.start == position)
            .min_by(|(ia, a), (ib, b)| {
                (a.range.end.line, a.range.end.column)
                    .cmp(&(b.range.end.line, b.range.end.column))
                    .then(ib.cmp(ia))
            })
            .map(|(_, fact)| fact)
    }
}

#[async_trait]
impl TypeEngine for SnapshotEngine {
    fn name(&self) -> &str {
        "snapshot"
    }

    async fn ensure_available(&self, _file: &Path) -> Result<(), EngineError> {
        Ok(())
    }

    async fn type_at_pos(
        &self,
        _file: &Path,
        line: u32,
        column: u32,
    ) -> Result<PointAnswer, EngineError> {
        let position = Position::new(line, column.saturating_sub(1));
        Ok(match self.fact_at(position) {
            Some(fact) => PointAnswer {
                raw_type: fact.raw_type.clone(),
                range: Some(fact.range),
                metadata: fact.metadata.clone(),
            },
            None => PointAnswer::unknown(),
        })
    }

    async fn dump_types(&self, _file: &Path) -> Result<Vec<TypeFact>, EngineError> {
        Ok(self.facts.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use typemerge_core::SourceRange;

    fn engine() -> SnapshotEngine {
        SnapshotEngine::new(vec![
            TypeFact::new(SourceRange::on_line(1, 6, 11), "{ a: number }"),
            TypeFact::new(SourceRange::on_line(1, 6, 7), "number"),
            TypeFact::new(SourceRange::on_line(1, 6, 7), "string"),
            TypeFact::new(SourceRange::on_line(2, 0, 3), "boolean"),
        ])
    }

    #[tokio::test]
    async fn point_query_prefers_narrowest_then_latest() {
        let answer = engine()
            .type_at_pos(Path::new("a.js"), 1, 7)
            .await
            .unwrap();
        assert_eq!(answer.raw_type, "string");
        assert_eq!(answer.range, Some(SourceRange::on_line(1, 6, 7)));
    }

    #[tokio::test]
    async fn point_query_without_fact_is_unknown() {
        let answer = engine()
            .type_at_pos(Path::new("a.js"), 1, 8)
            .await
            .unwrap();
        assert!(answer.is_unknown());
    }

    #[tokio::test]
    async fn dump_returns_every_fact() {
        let facts = engine().dump_types(Path::new("a.js")).await.unwrap();
        assert_eq!(facts.len(), 4);
    }

    #[test]
    fn loads_flow_dump_json() {
        let engine = SnapshotEngine::from_json(json!([
            {"type": "number", "line": 1, "endline": 1, "start": 7, "end": 7}
        ]))
        .unwrap();
        assert_eq!(
            engine.fact_at(Position::new(1, 6)).map(|f| f.raw_type.as_str()),
            Some("number")
        );
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("dump.json");
        std::fs::write(
            &path,
            r#"[{"type": "string", "line": 3, "endline": 3, "start": 1, "end": 4}]"#,
        )
        .unwrap();
        let engine = SnapshotEngine::from_path(&path).unwrap();
        assert_eq!(engine.facts()[0].range, SourceRange::on_line(3, 0, 4));
    }
}
