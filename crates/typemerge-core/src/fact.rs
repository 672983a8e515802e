//! Type facts reported by an external type-checking engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::span::{SourceRange, Span};

/// The engine's rendering for "no type information at this position".
pub const UNKNOWN_TYPE: &str = "(unknown)";

/// Metadata keys removed by [`TypeFact::scrubbed`].
///
/// `path`, `source` and `reasons` carry absolute file paths. The positional
/// keys duplicate the node's own location.
pub const SCRUBBED_KEYS: &[&str] = &[
    "path", "source", "reasons", "loc", "line", "endline", "start", "end", "range",
];

/// One positional type datum produced by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeFact {
    /// Where the engine says this fact applies.
    pub range: SourceRange,
    /// The engine's textual rendering of the type.
    pub raw_type: String,
    /// Engine-specific fields, passed through opaquely.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl TypeFact {
    pub fn new(range: SourceRange, raw_type: impl Into<String>) -> Self {
        TypeFact {
            range,
            raw_type: raw_type.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// The single-line index key, absent for multi-line facts.
    pub fn span(&self) -> Option<Span> {
        self.range.as_span()
    }

    pub fn is_unknown(&self) -> bool {
        self.raw_type == UNKNOWN_TYPE
    }

    /// Copy of this fact with non-reproducible and redundant metadata removed.
    pub fn scrubbed(&self) -> TypeFact {
        let metadata = self
            .metadata
            .iter()
            .filter(|(key, _)| !SCRUBBED_KEYS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        TypeFact {
            range: self.range,
            raw_type: self.raw_type.clone(),
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test metadata must be an object"),
        }
    }

    #[test]
    fn scrub_removes_paths_and_positions() {
        let fact = TypeFact::new(SourceRange::on_line(1, 6, 7), "number").with_metadata(metadata(
            json!({
                "path": "/home/someone/project/a.js",
                "line": 1,
                "endline": 1,
                "start": 7,
                "end": 7,
                "reasons": [{"path": "/home/someone/project/a.js"}],
                "loc": {"source": "/home/someone/project/a.js"},
                "expanded": false,
            }),
        ));

        let scrubbed = fact.scrubbed();
        assert_eq!(scrubbed.raw_type, "number");
        assert_eq!(scrubbed.range, fact.range);
        assert_eq!(scrubbed.metadata.len(), 1);
        assert_eq!(scrubbed.metadata.get("expanded"), Some(&json!(false)));
    }

    #[test]
    fn scrubbing_twice_is_stable() {
        let fact = TypeFact::new(SourceRange::on_line(2, 0, 3), "string")
            .with_metadata(metadata(json!({"path": "/tmp/x.js", "kind": "var"})));
        assert_eq!(fact.scrubbed(), fact.scrubbed().scrubbed());
    }

    #[test]
    fn unknown_marker() {
        let fact = TypeFact::new(SourceRange::on_line(1, 0, 1), UNKNOWN_TYPE);
        assert!(fact.is_unknown());
        assert!(!TypeFact::new(SourceRange::on_line(1, 0, 1), "any").is_unknown());
    }
}
