//! Which nodes may carry an inferred type.
//!
//! Eligibility depends only on a node's kind and its parent's kind. A fixed
//! set of rules excludes nodes whose type is their own syntax (literals,
//! statements, type annotations) or that the engine cannot resolve usefully.
//! A per-kind override table is consulted first; by default it makes every
//! `Identifier` eligible.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use typemerge_syntax::{NodeId, NodeKind, SyntaxTree};

/// Per-kind override of the exclusion rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Override {
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EligibilityFilter {
    overrides: HashMap<NodeKind, Override>,
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        let mut overrides = HashMap::new();
        overrides.insert(NodeKind::Identifier, Override::Always);
        EligibilityFilter { overrides }
    }
}

impl EligibilityFilter {
    pub fn new() -> Self {
        EligibilityFilter::default()
    }

    /// The default table extended (and possibly overridden) by `overrides`.
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (NodeKind, Override)>,
    {
        let mut filter = EligibilityFilter::default();
        filter.overrides.extend(overrides);
        filter
    }

    pub fn set_override(&mut self, kind: NodeKind, value: Override) {
        self.overrides.insert(kind, value);
    }

    pub fn override_for(&self, kind: &NodeKind) -> Option<Override> {
        self.overrides.get(kind).copied()
    }

    pub fn is_eligible(&self, kind: &NodeKind, parent: Option<&NodeKind>) -> bool {
        match self.override_for(kind) {
            Some(Override::Always) => true,
            Some(Override::Never) => false,
            None => !is_excluded(kind, parent),
        }
    }

    pub fn node_is_eligible(&self, tree: &SyntaxTree, id: NodeId) -> bool {
        let Some(node) = tree.get(id) else {
            return false;
        };
        let parent = node.parent().map(|p| tree[p].kind());
        self.is_eligible(node.kind(), parent)
    }

    /// Eligible nodes in pre-order.
    pub fn targets(&self, tree: &SyntaxTree) -> Vec<NodeId> {
        tree.preorder()
            .into_iter()
            .filter(|&id| self.node_is_eligible(tree, id))
            .collect()
    }
}

/// The fixed exclusion rules, without overrides.
pub fn is_excluded(kind: &NodeKind, parent: Option<&NodeKind>) -> bool {
    let parent_is = |k: &NodeKind| parent == Some(k);

    kind.is_root()
        || kind.is_import()
        || *kind == NodeKind::TypeAlias
        || parent_is(&NodeKind::TypeAlias)
        || *kind == NodeKind::GenericTypeAnnotation
        || parent_is(&NodeKind::GenericTypeAnnotation)
        || matches!(
            kind,
            NodeKind::NewExpression
                | NodeKind::UnaryExpression
                | NodeKind::TypeParameterDeclaration
                | NodeKind::ArrowFunctionExpression
                | NodeKind::VariableDeclaration
                | NodeKind::ExportNamedDeclaration
        )
        || kind.is_literal()
        || kind.is_statement()
        || kind.is_primitive_type_annotation()
}

/// Eligible node ids as a set, for parent checks during propagation.
pub fn target_set(targets: &[NodeId]) -> HashSet<NodeId> {
    targets.iter().copied().collect()
}
