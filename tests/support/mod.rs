//! Shared fixtures for the merge integration tests.
//!
//! The fixture source is:
//!
//! ```text
//! const x = 1;
//! const s = foo(x);
//! ```

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use typemerge::TypeFact;
use typemerge_flow::{EngineError, PointAnswer, SnapshotEngine, TypeEngine};

pub const SOURCE: &str = "const x = 1;\nconst s = foo(x);\n";

fn loc(line: u32, start: u32, end: u32) -> Value {
    json!({"start": {"line": line, "column": start}, "end": {"line": line, "column": end}})
}

fn identifier(name: &str, line: u32, start: u32) -> Value {
    json!({
        "type": "Identifier",
        "loc": loc(line, start, start + name.len() as u32),
        "name": name
    })
}

/// Babel output for [`SOURCE`], trimmed to `type`, `loc` and names.
pub fn babel_ast() -> Value {
    json!({
        "type": "Program",
        "loc": {"start": {"line": 1, "column": 0}, "end": {"line": 2, "column": 17}},
        "sourceType": "module",
        "body": [
            {
                "type": "VariableDeclaration",
                "loc": loc(1, 0, 12),
                "kind": "const",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "loc": loc(1, 6, 11),
                    "id": identifier("x", 1, 6),
                    "init": {
                        "type": "NumericLiteral",
                        "loc": loc(1, 10, 11),
                        "value": 1,
                        "extra": {"rawValue": 1, "raw": "1"}
                    }
                }]
            },
            {
                "type": "VariableDeclaration",
                "loc": loc(2, 0, 17),
                "kind": "const",
                "declarations": [{
                    "type": "VariableDeclarator",
                    "loc": loc(2, 6, 16),
                    "id": identifier("s", 2, 6),
                    "init": {
                        "type": "CallExpression",
                        "loc": loc(2, 10, 16),
                        "callee": identifier("foo", 2, 10),
                        "arguments": [identifier("x", 2, 14)]
                    }
                }]
            }
        ],
        "directives": []
    })
}

/// One `dump-types` record, with Flow's 1-based inclusive columns.
pub fn flow_record(ty: &str, line: u32, start: u32, end: u32) -> Value {
    json!({
        "type": ty,
        "reasons": [],
        "path": "/home/dev/project/fixture.js",
        "line": line,
        "endline": line,
        "start": start,
        "end": end
    })
}

/// What Flow reports for [`SOURCE`].
pub fn flow_dump() -> Value {
    json!([
        flow_record("number", 1, 7, 7),
        flow_record("number", 1, 11, 11),
        flow_record("string", 2, 7, 7),
        flow_record("(n: number) => string", 2, 11, 13),
        flow_record("string", 2, 11, 16),
        flow_record("number", 2, 15, 15)
    ])
}

pub fn snapshot(dump: Value) -> SnapshotEngine {
    match SnapshotEngine::from_json(dump) {
        Ok(engine) => engine,
        Err(err) => panic!("fixture dump does not decode: {}", err),
    }
}

/// Delegates to a snapshot, counting calls and failing where told to.
pub struct ScriptedEngine {
    pub inner: SnapshotEngine,
    pub unavailable: bool,
    pub fail_dump: bool,
    /// Point queries at this (line, 1-based column) fail.
    pub fail_at: Option<(u32, u32)>,
    pub queries: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(inner: SnapshotEngine) -> Self {
        ScriptedEngine {
            inner,
            unavailable: false,
            fail_dump: false,
            fail_at: None,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TypeEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn ensure_available(&self, _file: &Path) -> Result<(), EngineError> {
        if self.unavailable {
            return Err(EngineError::NotFound {
                searched: "node_modules/.bin, PATH".to_string(),
            });
        }
        Ok(())
    }

    async fn type_at_pos(
        &self,
        file: &Path,
        line: u32,
        column: u32,
    ) -> Result<PointAnswer, EngineError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some((line, column)) {
            return Err(EngineError::Timeout {
                command: format!("flow type-at-pos {} {}", line, column),
                seconds: 60,
            });
        }
        self.inner.type_at_pos(file, line, column).await
    }

    async fn dump_types(&self, file: &Path) -> Result<Vec<TypeFact>, EngineError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_dump {
            return Err(EngineError::NonZeroExit {
                command: "flow dump-types".to_string(),
                status: "exit status: 2".to_string(),
                stderr: "Could not find a .flowconfig".to_string(),
            });
        }
        self.inner.dump_types(file).await
    }
}
