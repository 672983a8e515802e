//! Attaching annotations to nodes.

use typemerge_core::TypeFact;
use typemerge_syntax::{Annotation, NodeId, SyntaxTree, TypeAnnotation};

/// Build the annotation for a fact, scrubbing run-specific metadata.
pub fn annotation_for(fact: &TypeFact, parsed_type: TypeAnnotation) -> Annotation {
    Annotation::new(parsed_type, fact.scrubbed())
}

/// Set `node`'s annotation from a fact and its parsed type.
///
/// Returns `false` if `node` is not in `tree`.
pub fn attach(
    tree: &mut SyntaxTree,
    node: NodeId,
    fact: &TypeFact,
    parsed_type: TypeAnnotation,
) -> bool {
    if tree.get(node).is_none() {
        return false;
    }
    tree.set_annotation(node, annotation_for(fact, parsed_type));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};
    use typemerge_core::SourceRange;
    use typemerge_syntax::{to_babel_json, NodeKind, ANNOTATION_KEY};

    fn flow_fact() -> TypeFact {
        let metadata: Map<String, Value> = serde_json::from_value(json!({
            "reasons": [],
            "path": "/home/dev/project/a.js",
            "loc": {"source": "/home/dev/project/a.js"},
            "line": 1, "endline": 1, "start": 7, "end": 7,
            "expanded": false
        }))
        .unwrap();
        TypeFact::new(SourceRange::on_line(1, 6, 7), "number").with_metadata(metadata)
    }

    #[test]
    fn scrubs_paths_and_positions() {
        let annotation = annotation_for(&flow_fact(), TypeAnnotation::Number);
        let keys: Vec<&str> = annotation.source.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["expanded"]);
    }

    #[test]
    fn attached_annotation_serializes_under_node() {
        let mut tree =
            SyntaxTree::builder(NodeKind::Identifier, SourceRange::on_line(1, 6, 7)).build();
        let root = tree.root();
        assert!(attach(&mut tree, root, &flow_fact(), TypeAnnotation::Number));

        let json = to_babel_json(&tree).unwrap();
        assert_eq!(
            json[ANNOTATION_KEY],
            json!({
                "type": {"type": "NumberTypeAnnotation"},
                "raw": "number",
                "expanded": false
            })
        );
    }

    #[test]
    fn foreign_node_is_rejected() {
        let mut tree =
            SyntaxTree::builder(NodeKind::Identifier, SourceRange::on_line(1, 0, 1)).build();
        assert!(!attach(&mut tree, NodeId(7), &flow_fact(), TypeAnnotation::Any));
    }
}
