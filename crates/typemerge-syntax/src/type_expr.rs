// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Structured Flow type expressions.
//!
//! [`TypeAnnotation`] mirrors the shape of Babel's Flow type nodes, so a
//! serialized annotation reads like a fragment of the host tree. Positions
//! are not recorded: fragments come from synthetic source, and their
//! offsets would only describe that synthetic text.
//!
//! `Display` prints a type back as Flow syntax, inserting parentheses only
//! where precedence requires them.

use serde::Serialize;
use std::fmt;

/// A Flow type expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TypeAnnotation {
    #[serde(rename = "AnyTypeAnnotation")]
    Any,
    #[serde(rename = "MixedTypeAnnotation")]
    Mixed,
    #[serde(rename = "EmptyTypeAnnotation")]
    Empty,
    #[serde(rename = "VoidTypeAnnotation")]
    Void,
    #[serde(rename = "NullLiteralTypeAnnotation")]
    Null,
    #[serde(rename = "NumberTypeAnnotation")]
    Number,
    #[serde(rename = "StringTypeAnnotation")]
    String,
    #[serde(rename = "BooleanTypeAnnotation")]
    Boolean,
    #[serde(rename = "SymbolTypeAnnotation")]
    Symbol,
    #[serde(rename = "BigIntTypeAnnotation")]
    BigInt,
    /// `*`
    #[serde(rename = "ExistsTypeAnnotation")]
    Exists,
    #[serde(rename = "StringLiteralTypeAnnotation")]
    StringLiteral { value: String },
    #[serde(rename = "NumberLiteralTypeAnnotation")]
    NumberLiteral {
        value: f64,
        #[serde(skip)]
        raw: String,
    },
    #[serde(rename = "BigIntLiteralTypeAnnotation")]
    BigIntLiteral { value: String },
    #[serde(rename = "BooleanLiteralTypeAnnotation")]
    BooleanLiteral { value: bool },
    /// A named reference, e.g. `Map<K, V>` or `React.Node`.
    #[serde(rename = "GenericTypeAnnotation", rename_all = "camelCase")]
    Generic {
        id: TypeName,
        type_parameters: Option<TypeParameterInstantiation>,
    },
    #[serde(rename = "TypeofTypeAnnotation")]
    Typeof { argument: Box<TypeAnnotation> },
    #[serde(rename = "NullableTypeAnnotation", rename_all = "camelCase")]
    Nullable { type_annotation: Box<TypeAnnotation> },
    #[serde(rename = "ArrayTypeAnnotation", rename_all = "camelCase")]
    Array { element_type: Box<TypeAnnotation> },
    #[serde(rename = "UnionTypeAnnotation")]
    Union { types: Vec<TypeAnnotation> },
    #[serde(rename = "IntersectionTypeAnnotation")]
    Intersection { types: Vec<TypeAnnotation> },
    #[serde(rename = "TupleTypeAnnotation")]
    Tuple { types: Vec<TypeAnnotation> },
    #[serde(rename = "FunctionTypeAnnotation", rename_all = "camelCase")]
    Function {
        type_parameters: Option<TypeParameterDeclaration>,
        params: Vec<FunctionTypeParam>,
        rest: Option<Box<FunctionTypeParam>>,
        return_type: Box<TypeAnnotation>,
    },
    #[serde(rename = "ObjectTypeAnnotation", rename_all = "camelCase")]
    Object {
        properties: Vec<ObjectTypeMember>,
        indexers: Vec<ObjectTypeIndexer>,
        call_properties: Vec<ObjectTypeCallProperty>,
        exact: bool,
        inexact: bool,
    },
}

/// A plain identifier inside a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "Identifier")]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Identifier { name: name.into() }
    }
}

/// The name of a referenced type, possibly qualified (`A.B.C`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TypeName {
    #[serde(rename = "Identifier")]
    Identifier { name: String },
    #[serde(rename = "QualifiedTypeIdentifier")]
    Qualified {
        qualification: Box<TypeName>,
        id: Identifier,
    },
}

impl TypeName {
    /// Build a name from dotted segments. Returns `None` for no segments.
    pub fn from_segments<I, S>(segments: I) -> Option<TypeName>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = segments.into_iter();
        let mut name = TypeName::Identifier {
            name: iter.next()?.into(),
        };
        for segment in iter {
            name = TypeName::Qualified {
                qualification: Box::new(name),
                id: Identifier::new(segment),
            };
        }
        Some(name)
    }

    /// The unqualified name, if this is a single identifier.
    pub fn as_simple(&self) -> Option<&str> {
        match self {
            TypeName::Identifier { name } => Some(name),
            TypeName::Qualified { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TypeParameterInstantiation")]
pub struct TypeParameterInstantiation {
    pub params: Vec<TypeAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TypeParameterDeclaration")]
pub struct TypeParameterDeclaration {
    pub params: Vec<TypeParameter>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "TypeParameter")]
pub struct TypeParameter {
    pub name: String,
    pub variance: Option<Variance>,
    pub bound: Option<TypeAnnotation>,
    pub default: Option<TypeAnnotation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "Variance")]
pub struct Variance {
    pub kind: VarianceKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VarianceKind {
    Plus,
    Minus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "FunctionTypeParam", rename_all = "camelCase")]
pub struct FunctionTypeParam {
    pub name: Option<Identifier>,
    pub optional: bool,
    pub type_annotation: TypeAnnotation,
}

/// Property keys in object types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum PropertyKey {
    #[serde(rename = "Identifier")]
    Identifier { name: String },
    #[serde(rename = "StringLiteral")]
    StringLiteral { value: String },
}

/// Entries of `ObjectTypeAnnotation.properties`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ObjectTypeMember {
    #[serde(rename = "ObjectTypeProperty")]
    Property {
        key: PropertyKey,
        value: TypeAnnotation,
        optional: bool,
        method: bool,
        #[serde(rename = "static")]
        is_static: bool,
        variance: Option<Variance>,
    },
    #[serde(rename = "ObjectTypeSpreadProperty")]
    Spread { argument: TypeAnnotation },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ObjectTypeIndexer")]
pub struct ObjectTypeIndexer {
    pub id: Option<Identifier>,
    pub key: TypeAnnotation,
    pub value: TypeAnnotation,
    pub variance: Option<Variance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "ObjectTypeCallProperty")]
pub struct ObjectTypeCallProperty {
    pub value: TypeAnnotation,
    #[serde(rename = "static")]
    pub is_static: bool,
}

impl TypeAnnotation {
    /// A reference to a named type without type arguments.
    pub fn named(name: impl Into<String>) -> Self {
        TypeAnnotation::Generic {
            id: TypeName::Identifier { name: name.into() },
            type_parameters: None,
        }
    }

    /// `typeof <name>`.
    pub fn type_of(name: impl Into<String>) -> Self {
        TypeAnnotation::Typeof {
            argument: Box::new(TypeAnnotation::named(name)),
        }
    }

    pub fn number_literal(raw: impl Into<String>, value: f64) -> Self {
        TypeAnnotation::NumberLiteral {
            value,
            raw: raw.into(),
        }
    }

    /// The Babel node name of this type.
    pub fn babel_type(&self) -> &'static str {
        match self {
            TypeAnnotation::Any => "AnyTypeAnnotation",
            TypeAnnotation::Mixed => "MixedTypeAnnotation",
            TypeAnnotation::Empty => "EmptyTypeAnnotation",
            TypeAnnotation::Void => "VoidTypeAnnotation",
            TypeAnnotation::Null => "NullLiteralTypeAnnotation",
            TypeAnnotation::Number => "NumberTypeAnnotation",
            TypeAnnotation::String => "StringTypeAnnotation",
            TypeAnnotation::Boolean => "BooleanTypeAnnotation",
            TypeAnnotation::Symbol => "SymbolTypeAnnotation",
            TypeAnnotation::BigInt => "BigIntTypeAnnotation",
            TypeAnnotation::Exists => "ExistsTypeAnnotation",
            TypeAnnotation::StringLiteral { .. } => "StringLiteralTypeAnnotation",
            TypeAnnotation::NumberLiteral { .. } => "NumberLiteralTypeAnnotation",
            TypeAnnotation::BigIntLiteral { .. } => "BigIntLiteralTypeAnnotation",
            TypeAnnotation::BooleanLiteral { .. } => "BooleanLiteralTypeAnnotation",
            TypeAnnotation::Generic { .. } => "GenericTypeAnnotation",
            TypeAnnotation::Typeof { .. } => "TypeofTypeAnnotation",
            TypeAnnotation::Nullable { .. } => "NullableTypeAnnotation",
            TypeAnnotation::Array { .. } => "ArrayTypeAnnotation",
            TypeAnnotation::Union { .. } => "UnionTypeAnnotation",
            TypeAnnotation::Intersection { .. } => "IntersectionTypeAnnotation",
            TypeAnnotation::Tuple { .. } => "TupleTypeAnnotation",
            TypeAnnotation::Function { .. } => "FunctionTypeAnnotation",
            TypeAnnotation::Object { .. } => "ObjectTypeAnnotation",
        }
    }
}

// ============================================================================
// Printing
// ============================================================================

/// Binding strength of the context a type is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Prec {
    Top,
    Union,
    Intersection,
    Prefix,
    Postfix,
}

impl TypeAnnotation {
    fn prec(&self) -> Prec {
        match self {
            TypeAnnotation::Function { .. } => Prec::Top,
            TypeAnnotation::Union { .. } => Prec::Union,
            TypeAnnotation::Intersection { .. } => Prec::Intersection,
            TypeAnnotation::Nullable { .. } | TypeAnnotation::Typeof { .. } => Prec::Prefix,
            _ => Prec::Postfix,
        }
    }

    /// Function types bind loosest: `() => A | B` returns a union.
    fn write_in(&self, f: &mut fmt::Formatter<'_>, context: Prec) -> fmt::Result {
        if self.prec() < context {
            write!(f, "(")?;
            self.write_bare(f)?;
            write!(f, ")")
        } else {
            self.write_bare(f)
        }
    }

    fn write_bare(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeAnnotation::Any => f.write_str("any"),
            TypeAnnotation::Mixed => f.write_str("mixed"),
            TypeAnnotation::Empty => f.write_str("empty"),
            TypeAnnotation::Void => f.write_str("void"),
            TypeAnnotation::Null => f.write_str("null"),
            TypeAnnotation::Number => f.write_str("number"),
            TypeAnnotation::String => f.write_str("string"),
            TypeAnnotation::Boolean => f.write_str("boolean"),
            TypeAnnotation::Symbol => f.write_str("symbol"),
            TypeAnnotation::BigInt => f.write_str("bigint"),
            TypeAnnotation::Exists => f.write_str("*"),
            TypeAnnotation::StringLiteral { value } => write_string_literal(f, value),
            TypeAnnotation::NumberLiteral { value, raw } => {
                if raw.is_empty() {
                    write!(f, "{}", value)
                } else {
                    f.write_str(raw)
                }
            }
            TypeAnnotation::BigIntLiteral { value } => f.write_str(value),
            TypeAnnotation::BooleanLiteral { value } => write!(f, "{}", value),
            TypeAnnotation::Generic {
                id,
                type_parameters,
            } => {
                write!(f, "{}", id)?;
                if let Some(args) = type_parameters {
                    write!(f, "<")?;
                    write_separated(f, &args.params, ", ", Prec::Top)?;
                    write!(f, ">")?;
                }
                Ok(())
            }
            TypeAnnotation::Typeof { argument } => {
                write!(f, "typeof ")?;
                argument.write_in(f, Prec::Postfix)
            }
            TypeAnnotation::Nullable { type_annotation } => {
                write!(f, "?")?;
                type_annotation.write_in(f, Prec::Prefix)
            }
            TypeAnnotation::Array { element_type } => {
                element_type.write_in(f, Prec::Postfix)?;
                write!(f, "[]")
            }
            TypeAnnotation::Union { types } => write_separated(f, types, " | ", Prec::Intersection),
            TypeAnnotation::Intersection { types } => {
                write_separated(f, types, " & ", Prec::Prefix)
            }
            TypeAnnotation::Tuple { types } => {
                write!(f, "[")?;
                write_separated(f, types, ", ", Prec::Top)?;
                write!(f, "]")
            }
            TypeAnnotation::Function {
                type_parameters,
                params,
                rest,
                return_type,
            } => {
                write_signature(f, type_parameters.as_ref(), params, rest.as_deref())?;
                write!(f, " => ")?;
                return_type.write_in(f, Prec::Top)
            }
            TypeAnnotation::Object {
                properties,
                indexers,
                call_properties,
                exact,
                inexact,
            } => {
                let (open, close) = if *exact { ("{|", "|}") } else { ("{", "}") };
                let mut members: Vec<String> = Vec::new();
                for property in properties {
                    members.push(property.to_string());
                }
                for indexer in indexers {
                    members.push(indexer.to_string());
                }
                for call in call_properties {
                    members.push(call.to_string());
                }
                if *inexact {
                    members.push("...".to_string());
                }
                if members.is_empty() {
                    write!(f, "{}{}", open, close)
                } else {
                    write!(f, "{} {} {}", open, members.join(", "), close)
                }
            }
        }
    }
}

fn write_separated(
    f: &mut fmt::Formatter<'_>,
    types: &[TypeAnnotation],
    separator: &str,
    context: Prec,
) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        ty.write_in(f, context)?;
    }
    Ok(())
}

fn write_string_literal(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    write!(f, "\"")?;
    for c in value.chars() {
        match c {
            '"' => write!(f, "\\\"")?,
            '\\' => write!(f, "\\\\")?,
            '\n' => write!(f, "\\n")?,
            other => write!(f, "{}", other)?,
        }
    }
    write!(f, "\"")
}

fn write_signature(
    f: &mut fmt::Formatter<'_>,
    type_parameters: Option<&TypeParameterDeclaration>,
    params: &[FunctionTypeParam],
    rest: Option<&FunctionTypeParam>,
) -> fmt::Result {
    if let Some(decl) = type_parameters {
        write!(f, "{}", decl)?;
    }
    write!(f, "(")?;
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", param)?;
    }
    if let Some(rest) = rest {
        if !params.is_empty() {
            write!(f, ", ")?;
        }
        write!(f, "...{}", rest)?;
    }
    write!(f, ")")
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_in(f, Prec::Top)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeName::Identifier { name } => f.write_str(name),
            TypeName::Qualified { qualification, id } => {
                write!(f, "{}.{}", qualification, id.name)
            }
        }
    }
}

impl fmt::Display for FunctionTypeParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => {
                let optional = if self.optional { "?" } else { "" };
                write!(f, "{}{}: {}", name.name, optional, self.type_annotation)
            }
            None => write!(f, "{}", self.type_annotation),
        }
    }
}

impl fmt::Display for TypeParameterDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if let Some(variance) = param.variance {
                write!(f, "{}", variance)?;
            }
            write!(f, "{}", param.name)?;
            if let Some(bound) = &param.bound {
                write!(f, ": {}", bound)?;
            }
            if let Some(default) = &param.default {
                write!(f, " = {}", default)?;
            }
        }
        write!(f, ">")
    }
}

impl fmt::Display for Variance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            VarianceKind::Plus => f.write_str("+"),
            VarianceKind::Minus => f.write_str("-"),
        }
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKey::Identifier { name } => f.write_str(name),
            PropertyKey::StringLiteral { value } => write_string_literal(f, value),
        }
    }
}

impl fmt::Display for ObjectTypeMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectTypeMember::Property {
                key,
                value,
                optional,
                method,
                is_static,
                variance,
            } => {
                if *is_static {
                    write!(f, "static ")?;
                }
                if let Some(variance) = variance {
                    write!(f, "{}", variance)?;
                }
                write!(f, "{}", key)?;
                match value {
                    TypeAnnotation::Function {
                        type_parameters,
                        params,
                        rest,
                        return_type,
                    } if *method => {
                        write_signature(f, type_parameters.as_ref(), params, rest.as_deref())?;
                        write!(f, ": {}", return_type)
                    }
                    _ => {
                        let optional = if *optional { "?" } else { "" };
                        write!(f, "{}: {}", optional, value)
                    }
                }
            }
            ObjectTypeMember::Spread { argument } => write!(f, "...{}", argument),
        }
    }
}

impl fmt::Display for ObjectTypeIndexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(variance) = self.variance {
            write!(f, "{}", variance)?;
        }
        match &self.id {
            Some(id) => write!(f, "[{}: {}]: {}", id.name, self.key, self.value),
            None => write!(f, "[{}]: {}", self.key, self.value),
        }
    }
}

impl fmt::Display for ObjectTypeCallProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static ")?;
        }
        match &self.value {
            TypeAnnotation::Function {
                type_parameters,
                params,
                rest,
                return_type,
            } => {
                write_signature(f, type_parameters.as_ref(), params, rest.as_deref())?;
                write!(f, ": {}", return_type)
            }
            other => write!(f, "{}", other),
        }
    }
}
