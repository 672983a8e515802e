//! Decoding of Flow's JSON records.
//!
//! `flow type-at-pos --json` prints one record; `flow dump-types --json`
//! prints an array of them. A record looks like:
//!
//! ```json
//! {"type": "number", "reasons": [], "loc": {...}, "path": "/abs/a.js",
//!  "line": 1, "endline": 1, "start": 7, "end": 7}
//! ```
//!
//! `start` and `end` are 1-based and inclusive. Tree columns are 0-based with
//! an exclusive end, so a record covering columns 7..=7 becomes `6..7`.

use serde_json::{Map, Value};
use tracing::debug;
use typemerge_core::{Position, SourceRange, TypeFact};

use crate::engine::PointAnswer;
use crate::error::EngineError;

/// Convert Flow's 1-based inclusive columns to a tree range.
pub fn flow_range(line: u32, start: u32, endline: u32, end: u32) -> SourceRange {
    SourceRange::new(
        Position::new(line, start.saturating_sub(1)),
        Position::new(endline, end),
    )
}

fn field_u32(record: &Map<String, Value>, key: &str) -> Option<u32> {
    record
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|n| u32::try_from(n).ok())
}

/// The record's range, when it names a real location.
///
/// Flow reports line 0 for answers it cannot place.
fn record_range(record: &Map<String, Value>) -> Option<SourceRange> {
    let line = field_u32(record, "line")?;
    let endline = field_u32(record, "endline").unwrap_or(line);
    let start = field_u32(record, "start")?;
    let end = field_u32(record, "end")?;
    if line == 0 {
        return None;
    }
    Some(flow_range(line, start, endline, end))
}

fn metadata_of(mut record: Map<String, Value>) -> Map<String, Value> {
    record.remove("type");
    record
}

/// Decode a `type-at-pos` response.
pub fn decode_point(value: Value) -> Result<PointAnswer, EngineError> {
    let Value::Object(record) = value else {
        return Err(EngineError::malformed("type-at-pos output is not an object"));
    };
    let raw_type = match record.get("type") {
        Some(Value::String(ty)) => ty.clone(),
        Some(_) => return Err(EngineError::malformed("`type` is not a string")),
        None => return Err(EngineError::malformed("missing `type`")),
    };
    let range = record_range(&record);
    Ok(PointAnswer {
        raw_type,
        range,
        metadata: metadata_of(record),
    })
}

/// Decode a `dump-types` response.
///
/// Entries whose `type` is not a string, and entries without a usable
/// location, are skipped.
pub fn decode_dump(value: Value) -> Result<Vec<TypeFact>, EngineError> {
    let Value::Array(entries) = value else {
        return Err(EngineError::malformed("dump-types output is not an array"));
    };
    let mut facts = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let Value::Object(record) = entry else {
            return Err(EngineError::malformed(format!("entry {} is not an object", i)));
        };
        let raw_type = match record.get("type") {
            Some(Value::String(ty)) => ty.clone(),
            _ => continue,
        };
        let Some(range) = record_range(&record) else {
            debug!(entry = i, raw = %raw_type, "skipping unlocated dump entry");
            continue;
        };
        facts.push(TypeFact::new(range, raw_type).with_metadata(metadata_of(record)));
    }
    Ok(facts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(ty: Value, line: u32, start: u32, endline: u32, end: u32) -> Value {
        json!({
            "type": ty,
            "reasons": [],
            "path": "/home/dev/project/a.js",
            "line": line,
            "endline": endline,
            "start": start,
            "end": end
        })
    }

    #[test]
    fn columns_convert_to_tree_coordinates() {
        assert_eq!(flow_range(1, 7, 1, 7), SourceRange::on_line(1, 6, 7));
        assert_eq!(flow_range(2, 1, 2, 5), SourceRange::on_line(2, 0, 5));
    }

    #[test]
    fn point_record() {
        let answer = decode_point(record(json!("number"), 1, 7, 1, 7)).unwrap();
        assert_eq!(answer.raw_type, "number");
        assert_eq!(answer.range, Some(SourceRange::on_line(1, 6, 7)));
        assert!(!answer.metadata.contains_key("type"));
        assert!(answer.metadata.contains_key("path"));
    }

    #[test]
    fn unplaced_point_record_has_no_range() {
        let answer = decode_point(record(json!("(unknown)"), 0, 1, 0, 0)).unwrap();
        assert!(answer.is_unknown());
        assert_eq!(answer.range, None);
    }

    #[test]
    fn point_record_requires_string_type() {
        assert!(matches!(
            decode_point(record(json!(null), 1, 1, 1, 1)),
            Err(EngineError::Malformed { .. })
        ));
        assert!(matches!(
            decode_point(json!([])),
            Err(EngineError::Malformed { .. })
        ));
    }

    #[test]
    fn dump_skips_non_string_types_and_keeps_multi_line() {
        let facts = decode_dump(json!([
            record(json!("number"), 1, 7, 1, 7),
            record(json!({"kind": "Obj"}), 1, 1, 1, 3),
            record(json!("string"), 2, 1, 4, 2),
        ]))
        .unwrap();
        assert_eq!(facts.len(), 2);
        assert_eq!(facts[0].span().map(|s| s.start_column), Some(6));
        assert!(facts[1].span().is_none());
    }

    #[test]
    fn dump_skips_unlocated_entries() {
        let facts = decode_dump(json!([
            {"type": "number"},
            record(json!("string"), 0, 0, 0, 0),
            record(json!("boolean"), 3, 1, 3, 4),
        ]))
        .unwrap();
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].raw_type, "boolean");
        assert_eq!(facts[0].range, SourceRange::on_line(3, 0, 4));
    }

    #[test]
    fn dump_rejects_non_array_output() {
        let err = decode_dump(json!({"type": "number"})).unwrap_err();
        assert!(matches!(err, EngineError::Malformed { .. }));
    }
}
