// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The host-grammar side of typemerge.
//!
//! This crate models JavaScript/Flow syntax trees as produced by a
//! Babel-compatible parser, and parses the type text reported by a type
//! engine into structured type annotations.
//!
//! # Overview
//!
//! - **Trees**: [`SyntaxTree`] is an arena of [`SyntaxNode`]s with stable
//!   [`NodeId`]s, pre-order traversal and an annotation slot per node.
//!   Trees are imported from and exported to Babel AST JSON with
//!   [`from_babel_json`] and [`to_babel_json`].
//! - **Node kinds**: [`NodeKind`] names every node type the merge cares
//!   about and keeps unknown names as [`NodeKind::Other`].
//! - **Type fragments**: [`parse_type_fragment`] parses engine output such
//!   as `?Array<string>` into a [`TypeAnnotation`].
//!
//! # Quick Start
//!
//! ```
//! use typemerge_syntax::{parse_type_fragment, ParserOptions};
//!
//! let ty = parse_type_fragment("Array<number> | void", &ParserOptions::default()).unwrap();
//! assert_eq!(ty.to_string(), "Array<number> | void");
//! ```

// ============================================================================
// Public modules and re-exports
// ============================================================================

pub mod annotation;
pub mod babel;
pub mod kind;
pub mod options;
pub mod parser;
pub mod tree;
pub mod type_expr;

pub use annotation::{Annotation, ANNOTATION_KEY};
pub use babel::{from_babel_json, from_babel_str, to_babel_json, TreeError};
pub use kind::NodeKind;
pub use options::{ParserOptions, Plugin, SourceType};
pub use parser::{
    parse_class_declaration, parse_type_alias, parse_type_fragment, FragmentParseError, TypeAlias,
};
pub use tree::{Ancestors, Field, NodeId, SyntaxNode, SyntaxTree, TreeBuilder};
pub use type_expr::{
    FunctionTypeParam, Identifier, ObjectTypeCallProperty, ObjectTypeIndexer, ObjectTypeMember,
    PropertyKey, TypeAnnotation, TypeName, TypeParameter, TypeParameterDeclaration,
    TypeParameterInstantiation, Variance, VarianceKind,
};
