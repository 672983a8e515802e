//! End-to-end merges over Babel JSON.

mod support;

use std::path::Path;

use serde_json::json;
use typemerge::{
    merge, EligibilityFilter, MergeError, MergeOptions, OutputErrorCode, Override, Strategy,
};
use typemerge_syntax::{
    from_babel_json, from_babel_str, to_babel_json, NodeId, NodeKind, SyntaxTree, ANNOTATION_KEY,
};

use support::{babel_ast, flow_dump, flow_record, snapshot, ScriptedEngine};

const FILE: &str = "fixture.js";

fn options(strategy: Strategy) -> MergeOptions {
    MergeOptions {
        strategy,
        ..MergeOptions::default()
    }
}

fn tree() -> SyntaxTree {
    from_babel_json(&babel_ast()).unwrap()
}

/// The first node of `kind` on `line`, in pre-order.
fn find(tree: &SyntaxTree, kind: NodeKind, line: u32) -> NodeId {
    tree.preorder()
        .into_iter()
        .find(|&id| *tree[id].kind() == kind && tree[id].range().start.line == line)
        .unwrap()
}

fn find_named(tree: &SyntaxTree, name: &str, line: u32) -> NodeId {
    tree.preorder()
        .into_iter()
        .find(|&id| tree[id].name() == Some(name) && tree[id].range().start.line == line)
        .unwrap()
}

fn printed(tree: &SyntaxTree, id: NodeId) -> Option<String> {
    tree.annotation(id).map(|a| a.parsed_type.to_string())
}

#[tokio::test]
async fn const_binding_is_annotated_through_babel_json() {
    let engine = snapshot(flow_dump());
    let merged = merge(tree(), Path::new(FILE), &engine, &options(Strategy::Bulk))
        .await
        .unwrap();

    let json = to_babel_json(&merged.tree).unwrap();
    let declarator = &json["body"][0]["declarations"][0];
    assert_eq!(
        declarator["id"][ANNOTATION_KEY],
        json!({"type": {"type": "NumberTypeAnnotation"}, "raw": "number"})
    );
    assert_eq!(declarator[ANNOTATION_KEY], declarator["id"][ANNOTATION_KEY]);
    // Literals and statements never carry a type.
    assert!(declarator["init"].get(ANNOTATION_KEY).is_none());
    assert!(json["body"][0].get(ANNOTATION_KEY).is_none());
    assert!(json.get(ANNOTATION_KEY).is_none());
}

#[tokio::test]
async fn callee_type_propagates_to_call() {
    let engine = snapshot(flow_dump());
    let merged = merge(tree(), Path::new(FILE), &engine, &options(Strategy::Bulk))
        .await
        .unwrap();
    let tree = &merged.tree;

    let call = find(tree, NodeKind::CallExpression, 2);
    assert_eq!(
        printed(tree, call).as_deref(),
        Some("(n: number) => string")
    );
    let declarator = find(tree, NodeKind::VariableDeclarator, 2);
    assert_eq!(printed(tree, declarator).as_deref(), Some("string"));

    assert_eq!(merged.stats.annotated, 4);
    assert_eq!(merged.stats.propagated, 3);
    assert_eq!(merged.stats.failed, 0);
}

#[tokio::test]
async fn strategies_produce_the_same_tree() {
    let bulk_engine = ScriptedEngine::new(snapshot(flow_dump()));
    let bulk = merge(tree(), Path::new(FILE), &bulk_engine, &options(Strategy::Bulk))
        .await
        .unwrap();

    let point_engine = ScriptedEngine::new(snapshot(flow_dump()));
    let point = merge(tree(), Path::new(FILE), &point_engine, &options(Strategy::Point))
        .await
        .unwrap();

    assert_eq!(bulk.tree, point.tree);
    assert_eq!(
        to_babel_json(&bulk.tree).unwrap(),
        to_babel_json(&point.tree).unwrap()
    );
    assert_eq!(bulk_engine.queries(), 1);
    assert_eq!(point_engine.queries(), point.stats.eligible);
}

#[tokio::test]
async fn merging_an_annotated_tree_again_is_byte_identical() {
    let engine = snapshot(flow_dump());
    let first = merge(tree(), Path::new(FILE), &engine, &options(Strategy::Bulk))
        .await
        .unwrap();
    let first_text = serde_json::to_string(&to_babel_json(&first.tree).unwrap()).unwrap();

    let reimported = from_babel_str(&first_text).unwrap();
    let second = merge(reimported, Path::new(FILE), &engine, &options(Strategy::Bulk))
        .await
        .unwrap();
    let second_text = serde_json::to_string(&to_babel_json(&second.tree).unwrap()).unwrap();

    assert_eq!(first_text, second_text);
    assert_eq!(first.stats, second.stats);
}

#[tokio::test]
async fn only_eligible_nodes_are_annotated() {
    let engine = snapshot(flow_dump());
    let mut options = options(Strategy::Point);
    options.eligibility = EligibilityFilter::with_overrides([(
        NodeKind::CallExpression,
        Override::Never,
    )]);
    let input = tree();
    let targets = options.eligibility.targets(&input);

    let merged = merge(input, Path::new(FILE), &engine, &options).await.unwrap();
    let tree = &merged.tree;
    for id in tree.annotated() {
        assert!(targets.contains(&id), "{} is not eligible", tree[id].kind());
    }
    assert!(tree
        .annotation(find(tree, NodeKind::CallExpression, 2))
        .is_none());
    assert!(tree
        .annotation(find(tree, NodeKind::NumericLiteral, 1))
        .is_none());
    // `foo` is still typed; its parent is not.
    assert!(tree.annotation(find_named(tree, "foo", 2)).is_some());
}

#[tokio::test]
async fn class_description_without_body_leaves_node_bare() {
    let engine = snapshot(json!([
        flow_record("class Foo", 1, 7, 7),
        flow_record("class Bar { x: number }", 2, 7, 7)
    ]));
    let merged = merge(tree(), Path::new(FILE), &engine, &options(Strategy::Bulk))
        .await
        .unwrap();
    let tree = &merged.tree;

    assert!(tree.annotation(find_named(tree, "x", 1)).is_none());
    assert!(tree
        .annotation(find(tree, NodeKind::VariableDeclarator, 1))
        .is_none());
    assert_eq!(
        printed(tree, find_named(tree, "s", 2)).as_deref(),
        Some("typeof Bar")
    );
    assert_eq!(merged.stats.failed, 1);
}

#[tokio::test]
async fn failed_point_query_affects_only_its_node() {
    let mut engine = ScriptedEngine::new(snapshot(flow_dump()));
    // The argument `x` on line 2 starts at column 14.
    engine.fail_at = Some((2, 15));
    let merged = merge(tree(), Path::new(FILE), &engine, &options(Strategy::Point))
        .await
        .unwrap();
    let tree = &merged.tree;

    assert!(tree.annotation(find_named(tree, "x", 2)).is_none());
    assert_eq!(
        printed(tree, find_named(tree, "x", 1)).as_deref(),
        Some("number")
    );
    assert!(tree
        .annotation(find(tree, NodeKind::CallExpression, 2))
        .is_some());
    assert_eq!(merged.stats.failed_queries, 1);
}

#[tokio::test]
async fn unavailable_engine_fails_before_any_query() {
    for strategy in [Strategy::Bulk, Strategy::Point] {
        let mut engine = ScriptedEngine::new(snapshot(flow_dump()));
        engine.unavailable = true;
        let err = merge(tree(), Path::new(FILE), &engine, &options(strategy))
            .await
            .unwrap_err();

        assert!(err.is_precondition(), "{err}");
        assert_eq!(OutputErrorCode::from(&err).code(), 3);
        assert_eq!(engine.queries(), 0);
    }
}

#[tokio::test]
async fn failed_dump_is_fatal() {
    let mut engine = ScriptedEngine::new(snapshot(flow_dump()));
    engine.fail_dump = true;
    let err = merge(tree(), Path::new(FILE), &engine, &options(Strategy::Bulk))
        .await
        .unwrap_err();

    assert!(
        matches!(&err, MergeError::EngineFailed { engine, .. } if engine == "scripted"),
        "{err}"
    );
    assert_eq!(OutputErrorCode::from(&err).code(), 4);
}

/// `a.b.c;`
fn member_chain() -> SyntaxTree {
    let loc = |start: u32, end: u32| {
        json!({"start": {"line": 1, "column": start}, "end": {"line": 1, "column": end}})
    };
    let ident = |name: &str, start: u32| {
        json!({"type": "Identifier", "loc": loc(start, start + 1), "name": name})
    };
    from_babel_json(&json!({
        "type": "Program",
        "loc": loc(0, 6),
        "sourceType": "module",
        "body": [{
            "type": "ExpressionStatement",
            "loc": loc(0, 6),
            "expression": {
                "type": "MemberExpression",
                "loc": loc(0, 5),
                "object": {
                    "type": "MemberExpression",
                    "loc": loc(0, 3),
                    "object": ident("a", 0),
                    "property": ident("b", 2),
                    "computed": false
                },
                "property": ident("c", 4),
                "computed": false
            }
        }],
        "directives": []
    }))
    .unwrap()
}

#[tokio::test]
async fn shared_start_column_does_not_leak_into_outer_node() {
    let dump = json!([flow_record("A", 1, 1, 1)]);
    let bulk = merge(
        member_chain(),
        Path::new(FILE),
        &snapshot(dump.clone()),
        &options(Strategy::Bulk),
    )
    .await
    .unwrap();
    let point = merge(
        member_chain(),
        Path::new(FILE),
        &snapshot(dump),
        &options(Strategy::Point),
    )
    .await
    .unwrap();

    assert_eq!(bulk.tree, point.tree);
    let tree = &point.tree;
    let members: Vec<NodeId> = tree
        .preorder()
        .into_iter()
        .filter(|&id| *tree[id].kind() == NodeKind::MemberExpression)
        .collect();
    let [outer, inner] = members[..] else {
        panic!("expected two member expressions, got {:?}", members);
    };
    assert!(tree.annotation(outer).is_none());
    assert_eq!(printed(tree, inner).as_deref(), Some("A"));
    assert_eq!(printed(tree, find_named(tree, "a", 1)).as_deref(), Some("A"));
}
