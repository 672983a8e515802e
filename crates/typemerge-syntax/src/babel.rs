// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Import and export of Babel-shaped JSON trees.
//!
//! The parser itself is an external collaborator; it hands over its output
//! as Babel AST JSON. Any object carrying a string `type` is a node, and
//! every node must carry a `loc` with `start`/`end` positions. Everything
//! else is kept as an opaque attribute, so exporting an unannotated tree
//! reproduces the input object for object. Key order is kept, which makes
//! field order (and so pre-order) follow the parser's output.

use serde_json::{json, Map, Value};
use thiserror::Error;
use typemerge_core::{MergeError, Position, SourceRange};

use crate::annotation::ANNOTATION_KEY;
use crate::kind::NodeKind;
use crate::tree::{Field, NodeId, SyntaxNode, SyntaxTree};

/// Keys whose values are never treated as child nodes, even when they hold
/// objects with a `type` (comments and tokens do).
const OPAQUE_KEYS: &[&str] = &[
    "loc",
    "extra",
    "leadingComments",
    "trailingComments",
    "innerComments",
    "comments",
    "tokens",
    "errors",
];

/// Errors importing or exporting a tree.
#[derive(Debug, Error)]
pub enum TreeError {
    #[error("expected a node object at {path}")]
    NotANode { path: String },

    #[error("node at {path} has no `loc`")]
    MissingLocation { path: String },

    #[error("invalid `loc` at {path}: {reason}")]
    InvalidLocation { path: String, reason: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<TreeError> for MergeError {
    fn from(err: TreeError) -> Self {
        MergeError::InvalidTree {
            message: err.to_string(),
        }
    }
}

/// Parse Babel AST JSON text into a tree.
pub fn from_babel_str(text: &str) -> Result<SyntaxTree, TreeError> {
    let value: Value = serde_json::from_str(text)?;
    from_babel_json(&value)
}

/// Build a tree from a Babel AST JSON value (usually a `File` or `Program`).
pub fn from_babel_json(value: &Value) -> Result<SyntaxTree, TreeError> {
    let mut nodes = Vec::new();
    import_node(&mut nodes, value, None, "$")?;
    Ok(SyntaxTree { nodes })
}

/// Serialize a tree, annotations included, as Babel AST JSON.
pub fn to_babel_json(tree: &SyntaxTree) -> Result<Value, TreeError> {
    if tree.is_empty() {
        return Ok(Value::Null);
    }
    export_node(tree, tree.root())
}

fn is_node(value: &Value) -> bool {
    value
        .as_object()
        .and_then(|object| object.get("type"))
        .is_some_and(Value::is_string)
}

fn import_node(
    nodes: &mut Vec<SyntaxNode>,
    value: &Value,
    parent: Option<NodeId>,
    path: &str,
) -> Result<NodeId, TreeError> {
    let not_a_node = || TreeError::NotANode {
        path: path.to_string(),
    };
    let object = value.as_object().ok_or_else(not_a_node)?;
    let kind = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(not_a_node)?;
    let loc = object.get("loc").ok_or_else(|| TreeError::MissingLocation {
        path: path.to_string(),
    })?;
    let range = read_range(loc, path)?;

    let id = NodeId(nodes.len() as u32);
    nodes.push(SyntaxNode {
        kind: NodeKind::from_name(kind),
        range,
        parent,
        fields: Vec::new(),
        annotation: None,
    });

    let mut fields = Vec::with_capacity(object.len());
    for (key, child) in object {
        if key == "type" || key == ANNOTATION_KEY {
            continue;
        }
        let child_path = format!("{}.{}", path, key);
        let field = if OPAQUE_KEYS.contains(&key.as_str()) {
            Field::Attr(child.clone())
        } else if is_node(child) {
            Field::Node(import_node(nodes, child, Some(id), &child_path)?)
        } else if is_node_list(child) {
            let mut items = Vec::new();
            for (i, item) in child.as_array().into_iter().flatten().enumerate() {
                if item.is_null() {
                    items.push(None);
                } else {
                    let item_path = format!("{}[{}]", child_path, i);
                    items.push(Some(import_node(nodes, item, Some(id), &item_path)?));
                }
            }
            Field::List(items)
        } else {
            Field::Attr(child.clone())
        };
        fields.push((key.clone(), field));
    }
    nodes[id.0 as usize].fields = fields;
    Ok(id)
}

/// A non-empty array of nodes, possibly with `null` holes.
fn is_node_list(value: &Value) -> bool {
    match value.as_array() {
        Some(items) => {
            items.iter().any(is_node) && items.iter().all(|item| item.is_null() || is_node(item))
        }
        None => false,
    }
}

fn read_range(loc: &Value, path: &str) -> Result<SourceRange, TreeError> {
    let start = read_position(loc.get("start"), path, "start")?;
    let end = read_position(loc.get("end"), path, "end")?;
    Ok(SourceRange::new(start, end))
}

fn read_position(value: Option<&Value>, path: &str, which: &str) -> Result<Position, TreeError> {
    let invalid = |reason: String| TreeError::InvalidLocation {
        path: path.to_string(),
        reason,
    };
    let value = value.ok_or_else(|| invalid(format!("missing `{}`", which)))?;
    let number = |key: &str| -> Result<u32, TreeError> {
        value
            .get(key)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| invalid(format!("`{}.{}` is not a line/column number", which, key)))
    };
    Ok(Position::new(number("line")?, number("column")?))
}

fn export_node(tree: &SyntaxTree, id: NodeId) -> Result<Value, TreeError> {
    let node = &tree[id];
    let mut map = Map::new();
    map.insert("type".to_string(), Value::from(node.kind().as_str()));
    for (key, field) in node.fields() {
        let value = match field {
            Field::Attr(value) => value.clone(),
            Field::Node(child) => export_node(tree, *child)?,
            Field::List(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Some(child) => values.push(export_node(tree, *child)?),
                        None => values.push(Value::Null),
                    }
                }
                Value::Array(values)
            }
        };
        map.insert(key.to_string(), value);
    }
    if !map.contains_key("loc") {
        let range = node.range();
        map.insert(
            "loc".to_string(),
            json!({
                "start": {"line": range.start.line, "column": range.start.column},
                "end": {"line": range.end.line, "column": range.end.column},
            }),
        );
    }
    if let Some(annotation) = node.annotation() {
        map.insert(ANNOTATION_KEY.to_string(), serde_json::to_value(annotation)?);
    }
    Ok(Value::Object(map))
}
