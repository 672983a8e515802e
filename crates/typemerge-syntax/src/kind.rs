// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node kinds of the host grammar (Babel with the Flow plugin).
//!
//! Kinds are identified by their Babel `type` name. Names the enum does not
//! know are preserved as [`NodeKind::Other`] so that any tree the parser
//! produces can be imported and written back unchanged.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! node_kinds {
    ($($variant:ident),* $(,)?) => {
        /// Identifies the kind of a syntax node.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant,)*
            /// A kind not listed above, kept by name.
            Other(Box<str>),
        }

        impl NodeKind {
            /// Look up a kind by its Babel `type` name.
            pub fn from_name(name: &str) -> NodeKind {
                match name {
                    $(stringify!($variant) => NodeKind::$variant,)*
                    other => NodeKind::Other(other.into()),
                }
            }

            /// The Babel `type` name of this kind.
            pub fn as_str(&self) -> &str {
                match self {
                    $(NodeKind::$variant => stringify!($variant),)*
                    NodeKind::Other(name) => &**name,
                }
            }
        }
    };
}

node_kinds! {
    // Roots
    File,
    Program,

    // Names
    Identifier,
    PrivateName,

    // Literals
    StringLiteral,
    NumericLiteral,
    NullLiteral,
    BooleanLiteral,
    RegExpLiteral,
    BigIntLiteral,
    DecimalLiteral,
    TemplateLiteral,

    // Statements and declarations
    BlockStatement,
    BreakStatement,
    ContinueStatement,
    DebuggerStatement,
    DoWhileStatement,
    EmptyStatement,
    ExpressionStatement,
    ForInStatement,
    ForOfStatement,
    ForStatement,
    FunctionDeclaration,
    IfStatement,
    LabeledStatement,
    ReturnStatement,
    SwitchStatement,
    ThrowStatement,
    TryStatement,
    VariableDeclaration,
    WhileStatement,
    WithStatement,
    ClassDeclaration,
    ExportAllDeclaration,
    ExportDefaultDeclaration,
    ExportNamedDeclaration,
    ImportDeclaration,
    DeclareClass,
    DeclareFunction,
    DeclareInterface,
    DeclareModule,
    DeclareModuleExports,
    DeclareTypeAlias,
    DeclareOpaqueType,
    DeclareVariable,
    DeclareExportDeclaration,
    DeclareExportAllDeclaration,
    InterfaceDeclaration,
    OpaqueType,
    TypeAlias,
    EnumDeclaration,

    // Expressions and patterns
    ArrayExpression,
    ArrowFunctionExpression,
    AssignmentExpression,
    AwaitExpression,
    BinaryExpression,
    CallExpression,
    ClassExpression,
    ConditionalExpression,
    FunctionExpression,
    LogicalExpression,
    MemberExpression,
    NewExpression,
    ObjectExpression,
    OptionalCallExpression,
    OptionalMemberExpression,
    ParenthesizedExpression,
    SequenceExpression,
    TaggedTemplateExpression,
    ThisExpression,
    TypeCastExpression,
    UnaryExpression,
    UpdateExpression,
    YieldExpression,
    Super,
    Import,
    SpreadElement,
    RestElement,
    AssignmentPattern,
    ArrayPattern,
    ObjectPattern,
    ObjectProperty,
    ObjectMethod,

    // Other structure
    ClassBody,
    ClassMethod,
    ClassPrivateMethod,
    ClassProperty,
    ClassPrivateProperty,
    VariableDeclarator,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ExportSpecifier,
    ExportDefaultSpecifier,
    ExportNamespaceSpecifier,
    SwitchCase,
    CatchClause,
    TemplateElement,
    Directive,
    DirectiveLiteral,
    Decorator,

    // Flow type syntax
    TypeAnnotation,
    TypeParameterDeclaration,
    TypeParameterInstantiation,
    TypeParameter,
    AnyTypeAnnotation,
    MixedTypeAnnotation,
    EmptyTypeAnnotation,
    VoidTypeAnnotation,
    NullLiteralTypeAnnotation,
    NumberTypeAnnotation,
    StringTypeAnnotation,
    BooleanTypeAnnotation,
    SymbolTypeAnnotation,
    BooleanLiteralTypeAnnotation,
    StringLiteralTypeAnnotation,
    NumberLiteralTypeAnnotation,
    GenericTypeAnnotation,
    QualifiedTypeIdentifier,
    UnionTypeAnnotation,
    IntersectionTypeAnnotation,
    NullableTypeAnnotation,
    ArrayTypeAnnotation,
    TupleTypeAnnotation,
    FunctionTypeAnnotation,
    FunctionTypeParam,
    ObjectTypeAnnotation,
    ObjectTypeProperty,
    ObjectTypeIndexer,
    ObjectTypeSpreadProperty,
    ObjectTypeCallProperty,
    TypeofTypeAnnotation,
    ExistsTypeAnnotation,
    InterfaceExtends,
}

impl NodeKind {
    /// Root nodes of a parse (`File`, `Program`).
    pub fn is_root(&self) -> bool {
        matches!(self, NodeKind::File | NodeKind::Program)
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            NodeKind::StringLiteral
                | NodeKind::NumericLiteral
                | NodeKind::NullLiteral
                | NodeKind::BooleanLiteral
                | NodeKind::RegExpLiteral
                | NodeKind::BigIntLiteral
                | NodeKind::DecimalLiteral
                | NodeKind::TemplateLiteral
        )
    }

    /// Babel's `Statement` alias, which includes declarations.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            NodeKind::BlockStatement
                | NodeKind::BreakStatement
                | NodeKind::ContinueStatement
                | NodeKind::DebuggerStatement
                | NodeKind::DoWhileStatement
                | NodeKind::EmptyStatement
                | NodeKind::ExpressionStatement
                | NodeKind::ForInStatement
                | NodeKind::ForOfStatement
                | NodeKind::ForStatement
                | NodeKind::FunctionDeclaration
                | NodeKind::IfStatement
                | NodeKind::LabeledStatement
                | NodeKind::ReturnStatement
                | NodeKind::SwitchStatement
                | NodeKind::ThrowStatement
                | NodeKind::TryStatement
                | NodeKind::VariableDeclaration
                | NodeKind::WhileStatement
                | NodeKind::WithStatement
                | NodeKind::ClassDeclaration
                | NodeKind::ExportAllDeclaration
                | NodeKind::ExportDefaultDeclaration
                | NodeKind::ExportNamedDeclaration
                | NodeKind::ImportDeclaration
                | NodeKind::DeclareClass
                | NodeKind::DeclareFunction
                | NodeKind::DeclareInterface
                | NodeKind::DeclareModule
                | NodeKind::DeclareModuleExports
                | NodeKind::DeclareTypeAlias
                | NodeKind::DeclareOpaqueType
                | NodeKind::DeclareVariable
                | NodeKind::DeclareExportDeclaration
                | NodeKind::DeclareExportAllDeclaration
                | NodeKind::InterfaceDeclaration
                | NodeKind::OpaqueType
                | NodeKind::TypeAlias
                | NodeKind::EnumDeclaration
        )
    }

    /// Import declarations and the specifiers inside them.
    pub fn is_import(&self) -> bool {
        matches!(
            self,
            NodeKind::ImportDeclaration
                | NodeKind::ImportSpecifier
                | NodeKind::ImportDefaultSpecifier
                | NodeKind::ImportNamespaceSpecifier
        )
    }

    /// The annotation wrapper and the primitive annotation variants.
    pub fn is_primitive_type_annotation(&self) -> bool {
        matches!(
            self,
            NodeKind::TypeAnnotation
                | NodeKind::AnyTypeAnnotation
                | NodeKind::MixedTypeAnnotation
                | NodeKind::BooleanLiteralTypeAnnotation
                | NodeKind::StringTypeAnnotation
                | NodeKind::StringLiteralTypeAnnotation
                | NodeKind::NullLiteralTypeAnnotation
                | NodeKind::UnionTypeAnnotation
                | NodeKind::VoidTypeAnnotation
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(NodeKind::from_name(&name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for kind in [
            NodeKind::Identifier,
            NodeKind::VariableDeclarator,
            NodeKind::GenericTypeAnnotation,
            NodeKind::Other("JSXElement".into()),
        ] {
            assert_eq!(NodeKind::from_name(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_names_are_preserved() {
        let kind = NodeKind::from_name("JSXOpeningElement");
        assert_eq!(kind, NodeKind::Other("JSXOpeningElement".into()));
        assert_eq!(kind.to_string(), "JSXOpeningElement");
        assert!(!kind.is_statement());
    }

    #[test]
    fn categories() {
        assert!(NodeKind::TemplateLiteral.is_literal());
        assert!(NodeKind::VariableDeclaration.is_statement());
        assert!(NodeKind::TypeAlias.is_statement());
        assert!(!NodeKind::VariableDeclarator.is_statement());
        assert!(NodeKind::ImportDefaultSpecifier.is_import());
        assert!(NodeKind::UnionTypeAnnotation.is_primitive_type_annotation());
        assert!(!NodeKind::NumberTypeAnnotation.is_primitive_type_annotation());
        assert!(NodeKind::Program.is_root());
    }

    #[test]
    fn serde_uses_babel_names() {
        let json = serde_json::to_string(&NodeKind::CallExpression).unwrap();
        assert_eq!(json, "\"CallExpression\"");
        let kind: NodeKind = serde_json::from_str("\"ThisExpression\"").unwrap();
        assert_eq!(kind, NodeKind::ThisExpression);
    }
}
