// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Arena-backed syntax tree.
//!
//! The tree owns every node in a flat `Vec`; nodes refer to each other by
//! [`NodeId`]. Parent links are plain ids used for lookup only, so there is
//! no ownership cycle between a node and its parent.
//!
//! Each node keeps its named fields in source order. A field is either an
//! attribute (any JSON value the tree does not interpret), a single child,
//! or a list of children (with holes, as in `[, a]`). This keeps enough
//! structure to write the tree back in the shape it was read.
//!
//! # Usage
//!
//! ```
//! use typemerge_core::SourceRange;
//! use typemerge_syntax::{NodeKind, SyntaxTree};
//!
//! // const x = 1;
//! let mut builder = SyntaxTree::builder(NodeKind::Program, SourceRange::on_line(1, 0, 12));
//! let program = builder.root();
//! let decl = builder.push(program, "body", NodeKind::VariableDeclaration, SourceRange::on_line(1, 0, 12));
//! let declarator = builder.push(decl, "declarations", NodeKind::VariableDeclarator, SourceRange::on_line(1, 6, 11));
//! let x = builder.child(declarator, "id", NodeKind::Identifier, SourceRange::on_line(1, 6, 7));
//! builder.attr(x, "name", "x");
//! let tree = builder.build();
//!
//! assert_eq!(tree.parent_of(x), Some(declarator));
//! assert_eq!(tree[x].name(), Some("x"));
//! ```

use serde_json::Value;
use std::fmt;
use std::ops::Index;
use typemerge_core::SourceRange;

use crate::annotation::Annotation;
use crate::kind::NodeKind;

/// Index of a node within its [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The value of one named field of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    /// A value the tree does not interpret (names, operators, flags, `loc`).
    Attr(Value),
    /// A single child node.
    Node(NodeId),
    /// A list of child nodes; `None` entries are holes.
    List(Vec<Option<NodeId>>),
}

/// One node of the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub(crate) kind: NodeKind,
    pub(crate) range: SourceRange,
    pub(crate) parent: Option<NodeId>,
    pub(crate) fields: Vec<(String, Field)>,
    pub(crate) annotation: Option<Annotation>,
}

impl SyntaxNode {
    fn new(kind: NodeKind, range: SourceRange, parent: Option<NodeId>) -> Self {
        SyntaxNode {
            kind,
            range,
            parent,
            fields: Vec::new(),
            annotation: None,
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn range(&self) -> SourceRange {
        self.range
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn annotation(&self) -> Option<&Annotation> {
        self.annotation.as_ref()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Field)> {
        self.fields.iter().map(|(name, field)| (name.as_str(), field))
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, field)| field)
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        match self.field(name)? {
            Field::Attr(value) => Some(value),
            _ => None,
        }
    }

    /// The `name` attribute, for identifiers.
    pub fn name(&self) -> Option<&str> {
        self.attr("name").and_then(Value::as_str)
    }

    /// Child ids in field order, skipping holes.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.fields.iter().flat_map(|(_, field)| {
            let ids: Vec<NodeId> = match field {
                Field::Attr(_) => Vec::new(),
                Field::Node(id) => vec![*id],
                Field::List(items) => items.iter().flatten().copied().collect(),
            };
            ids
        })
    }

    fn set_field(&mut self, name: &str, field: Field) {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = field,
            None => self.fields.push((name.to_string(), field)),
        }
    }

    fn push_list_item(&mut self, name: &str, item: Option<NodeId>) {
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, Field::List(items))) => items.push(item),
            Some((_, other)) => *other = Field::List(vec![item]),
            None => self.fields.push((name.to_string(), Field::List(vec![item]))),
        }
    }
}

/// A syntax tree owning all of its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    pub(crate) nodes: Vec<SyntaxNode>,
}

impl SyntaxTree {
    /// Start building a tree with the given root.
    pub fn builder(kind: NodeKind, range: SourceRange) -> TreeBuilder {
        TreeBuilder::new(kind, range)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.nodes.get(id.index())
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    /// Enclosing nodes from the immediate parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent_of(id),
        }
    }

    /// All node ids in pre-order (parents before children, fields in order).
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        if self.nodes.is_empty() {
            return order;
        }
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.get(id) {
                let children: Vec<NodeId> = node.children().collect();
                stack.extend(children.into_iter().rev());
            }
        }
        order
    }

    pub fn annotation(&self, id: NodeId) -> Option<&Annotation> {
        self.get(id).and_then(SyntaxNode::annotation)
    }

    /// Store an annotation on a node, returning any previous one.
    ///
    /// Returns `None` without effect for an id outside this tree.
    pub fn set_annotation(&mut self, id: NodeId, annotation: Annotation) -> Option<Annotation> {
        let node = self.nodes.get_mut(id.index())?;
        node.annotation.replace(annotation)
    }

    /// Ids of all annotated nodes, in id order.
    pub fn annotated(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.annotation.is_some())
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Remove every annotation.
    pub fn clear_annotations(&mut self) {
        for node in &mut self.nodes {
            node.annotation = None;
        }
    }
}

impl Index<NodeId> for SyntaxTree {
    type Output = SyntaxNode;

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    fn index(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }
}

/// Iterator over enclosing nodes, see [`SyntaxTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent_of(current);
        Some(current)
    }
}

/// Incremental construction of a [`SyntaxTree`].
///
/// Parent links are recorded as children are added, so a built tree always
/// has consistent parent/child relations.
pub struct TreeBuilder {
    nodes: Vec<SyntaxNode>,
}

impl TreeBuilder {
    pub fn new(kind: NodeKind, range: SourceRange) -> Self {
        TreeBuilder {
            nodes: vec![SyntaxNode::new(kind, range, None)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn add(&mut self, parent: NodeId, kind: NodeKind, range: SourceRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode::new(kind, range, Some(parent)));
        id
    }

    /// Add a child stored in the single-node field `field` of `parent`.
    pub fn child(
        &mut self,
        parent: NodeId,
        field: &str,
        kind: NodeKind,
        range: SourceRange,
    ) -> NodeId {
        let id = self.add(parent, kind, range);
        self.nodes[parent.index()].set_field(field, Field::Node(id));
        id
    }

    /// Append a child to the list field `field` of `parent`.
    pub fn push(
        &mut self,
        parent: NodeId,
        field: &str,
        kind: NodeKind,
        range: SourceRange,
    ) -> NodeId {
        let id = self.add(parent, kind, range);
        self.nodes[parent.index()].push_list_item(field, Some(id));
        id
    }

    /// Append a hole to the list field `field` of `parent`.
    pub fn push_hole(&mut self, parent: NodeId, field: &str) {
        self.nodes[parent.index()].push_list_item(field, None);
    }

    /// Make sure `field` exists on `node` as a list, even if it stays empty.
    pub fn empty_list(&mut self, node: NodeId, field: &str) {
        let target = &mut self.nodes[node.index()];
        if target.field(field).is_none() {
            target.set_field(field, Field::List(Vec::new()));
        }
    }

    /// Set an attribute on `node`.
    pub fn attr(&mut self, node: NodeId, key: &str, value: impl Into<Value>) -> &mut Self {
        self.nodes[node.index()].set_field(key, Field::Attr(value.into()));
        self
    }

    pub fn build(self) -> SyntaxTree {
        SyntaxTree { nodes: self.nodes }
    }
}
