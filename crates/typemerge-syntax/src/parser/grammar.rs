// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! PEG grammar for Flow type declarations.
//!
//! Covers the declarations the fragment parser needs (`type S = …` and
//! `[declare] class Name … { … }`) and the full type-expression grammar
//! they contain. Precedence from loosest to tightest: function arrow,
//! union, intersection, prefix `?`, postfix `[]`, primary.

use crate::type_expr::{
    FunctionTypeParam, Identifier, ObjectTypeCallProperty, ObjectTypeIndexer, ObjectTypeMember,
    PropertyKey, TypeAnnotation, TypeName, TypeParameter, TypeParameterDeclaration,
    TypeParameterInstantiation, Variance, VarianceKind,
};

use super::TypeAlias;

/// One entry of an object type body, before it is sorted into the
/// properties / indexers / call-properties lists.
enum Member {
    Property(ObjectTypeMember),
    Indexer(ObjectTypeIndexer),
    Call(ObjectTypeCallProperty),
    Inexact,
}

type Params = (Vec<FunctionTypeParam>, Option<FunctionTypeParam>);

fn build_object(members: Vec<Member>, exact: bool) -> TypeAnnotation {
    let mut properties = Vec::new();
    let mut indexers = Vec::new();
    let mut call_properties = Vec::new();
    let mut inexact = false;
    for member in members {
        match member {
            Member::Property(property) => properties.push(property),
            Member::Indexer(indexer) => indexers.push(indexer),
            Member::Call(call) => call_properties.push(call),
            Member::Inexact => inexact = true,
        }
    }
    TypeAnnotation::Object {
        properties,
        indexers,
        call_properties,
        exact,
        inexact,
    }
}

fn function(
    type_parameters: Option<TypeParameterDeclaration>,
    (params, rest): Params,
    return_type: TypeAnnotation,
) -> TypeAnnotation {
    TypeAnnotation::Function {
        type_parameters,
        params,
        rest: rest.map(Box::new),
        return_type: Box::new(return_type),
    }
}

fn join(first: TypeAnnotation, rest: Vec<TypeAnnotation>, union: bool) -> TypeAnnotation {
    if rest.is_empty() {
        return first;
    }
    let mut types = Vec::with_capacity(rest.len() + 1);
    types.push(first);
    types.extend(rest);
    if union {
        TypeAnnotation::Union { types }
    } else {
        TypeAnnotation::Intersection { types }
    }
}

/// Builtin type keywords are only keywords without type arguments.
fn keyword_or_generic(
    id: TypeName,
    args: Option<Vec<TypeAnnotation>>,
) -> TypeAnnotation {
    if args.is_none() {
        let keyword = match id.as_simple() {
            Some("any") => Some(TypeAnnotation::Any),
            Some("mixed") => Some(TypeAnnotation::Mixed),
            Some("empty") => Some(TypeAnnotation::Empty),
            Some("void") => Some(TypeAnnotation::Void),
            Some("null") => Some(TypeAnnotation::Null),
            Some("number") => Some(TypeAnnotation::Number),
            Some("string") => Some(TypeAnnotation::String),
            Some("boolean") | Some("bool") => Some(TypeAnnotation::Boolean),
            Some("symbol") => Some(TypeAnnotation::Symbol),
            Some("bigint") => Some(TypeAnnotation::BigInt),
            _ => None,
        };
        if let Some(keyword) = keyword {
            return keyword;
        }
    }
    TypeAnnotation::Generic {
        id,
        type_parameters: args.map(|params| TypeParameterInstantiation { params }),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

peg::parser! {
    pub(crate) grammar flow() for str {
        // ------------------------------------------------------------------
        // Lexical
        // ------------------------------------------------------------------

        rule ws() = quiet!{ ([' ' | '\t' | '\n' | '\r'] / block_comment() / line_comment())* }

        rule block_comment() = "/*" (!"*/" [_])* "*/"

        rule line_comment() = "//" [^'\n']*

        rule ident_start() = ['a'..='z' | 'A'..='Z' | '_' | '$']

        rule ident_char() = ['a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '$']

        rule kw(word: &'static str)
            = s:$(ident_start() ident_char()*) {? if s == word { Ok(()) } else { Err(word) } }

        rule identifier() -> String
            = quiet!{ s:$(ident_start() ident_char()*) { s.to_string() } }
            / expected!("identifier")

        rule string_literal() -> String
            = "\"" s:$(("\\" [_] / [^'"' | '\\'])*) "\"" { unescape(s) }
            / "'" s:$(("\\" [_] / [^'\'' | '\\'])*) "'" { unescape(s) }

        rule digits() = ['0'..='9']+

        rule number_literal() -> TypeAnnotation
            = s:$("-"? digits() ("." digits())? (['e' | 'E'] ['+' | '-']? digits())?) !ident_char()
            {? s.parse::<f64>().map(|value| TypeAnnotation::number_literal(s, value)).or(Err("number")) }

        rule bigint_literal() -> TypeAnnotation
            = s:$("-"? digits() "n") !ident_char()
            { TypeAnnotation::BigIntLiteral { value: s.to_string() } }

        // ------------------------------------------------------------------
        // Declarations
        // ------------------------------------------------------------------

        pub rule type_alias() -> TypeAlias
            = ws() kw("type") ws() id:identifier() ws() tp:type_params()? ws() "=" ws()
              right:flow_type() ws() ";"? ws()
            { TypeAlias { id, type_parameters: tp, right } }

        // Yields the declared class name.
        pub rule class_declaration() -> String
            = ws() (kw("declare") ws())? kw("class") ws() name:identifier() ws()
              type_params()? ws()
              (kw("extends") ws() generic() ws())?
              (kw("implements") ws() (generic() ++ (ws() "," ws())) ws())?
              object_type() ws() ";"? ws()
            { name }

        // ------------------------------------------------------------------
        // Types
        // ------------------------------------------------------------------

        pub rule flow_type() -> TypeAnnotation = union()

        rule union() -> TypeAnnotation
            = ("|" ws())? first:intersection() rest:(ws() "|" ws() t:intersection() { t })*
            { join(first, rest, true) }

        rule intersection() -> TypeAnnotation
            = ("&" ws())? first:prefix() rest:(ws() "&" ws() t:prefix() { t })*
            { join(first, rest, false) }

        rule prefix() -> TypeAnnotation
            = "?" ws() t:prefix() { TypeAnnotation::Nullable { type_annotation: Box::new(t) } }
            / postfix()

        rule postfix() -> TypeAnnotation
            = t:primary() dims:(ws() "[" ws() "]")*
            {
                let mut ty = t;
                for _ in dims {
                    ty = TypeAnnotation::Array { element_type: Box::new(ty) };
                }
                ty
            }

        #[cache]
        rule primary() -> TypeAnnotation
            = function_type()
            / "(" ws() t:flow_type() ws() ")" { t }
            / object_type()
            / tuple_type()
            / kw("typeof") ws() id:type_name()
              { TypeAnnotation::Typeof { argument: Box::new(TypeAnnotation::Generic { id, type_parameters: None }) } }
            / value:string_literal() { TypeAnnotation::StringLiteral { value } }
            / bigint_literal()
            / number_literal()
            / kw("true") { TypeAnnotation::BooleanLiteral { value: true } }
            / kw("false") { TypeAnnotation::BooleanLiteral { value: false } }
            / "*" { TypeAnnotation::Exists }
            / generic()

        rule generic() -> TypeAnnotation
            = id:type_name() args:(ws() a:type_args() { a })?
            { keyword_or_generic(id, args) }

        rule type_name() -> TypeName
            = segments:(identifier() ++ (ws() "." ws()))
            {? TypeName::from_segments(segments).ok_or("type name") }

        rule type_args() -> Vec<TypeAnnotation>
            = "<" ws() params:(flow_type() ** (ws() "," ws())) ws() ","? ws() ">" { params }

        rule tuple_type() -> TypeAnnotation
            = "[" ws() types:(flow_type() ** (ws() "," ws())) ws() ","? ws() "]"
            { TypeAnnotation::Tuple { types } }

        // ------------------------------------------------------------------
        // Functions and type parameters
        // ------------------------------------------------------------------

        rule function_type() -> TypeAnnotation
            = tp:type_params()? ws() "(" ws() params:function_params() ws() ")" ws() "=>" ws()
              ret:flow_type()
            { function(tp, params, ret) }

        rule function_params() -> Params
            = params:(function_param() ** (ws() "," ws()))
              rest:(ws() ","? ws() r:rest_param() { r })? ws() ","?
            { (params, rest) }

        rule function_param() -> FunctionTypeParam
            = name:identifier() ws() optional:"?"? ws() ":" ws() t:flow_type()
            {
                FunctionTypeParam {
                    name: Some(Identifier { name }),
                    optional: optional.is_some(),
                    type_annotation: t,
                }
            }
            / t:flow_type()
            { FunctionTypeParam { name: None, optional: false, type_annotation: t } }

        rule rest_param() -> FunctionTypeParam = "..." ws() p:function_param() { p }

        rule type_params() -> TypeParameterDeclaration
            = "<" ws() params:(type_param() ++ (ws() "," ws())) ws() ","? ws() ">"
            { TypeParameterDeclaration { params } }

        rule type_param() -> TypeParameter
            = variance:variance()? name:identifier()
              bound:(ws() ":" ws() t:flow_type() { t })?
              default:(ws() "=" ws() t:flow_type() { t })?
            { TypeParameter { name, variance, bound, default } }

        rule variance() -> Variance
            = "+" { Variance { kind: VarianceKind::Plus } }
            / "-" { Variance { kind: VarianceKind::Minus } }

        // ------------------------------------------------------------------
        // Objects
        // ------------------------------------------------------------------

        rule object_type() -> TypeAnnotation
            = "{|" ws() members:object_members() ws() "|}" { build_object(members, true) }
            / "{" ws() members:object_members() ws() "}" { build_object(members, false) }

        rule object_members() -> Vec<Member>
            = members:(object_member() ** (ws() [',' | ';'] ws())) (ws() [',' | ';'])?
            { members }

        rule static_kw() -> () = kw("static") ws() ![':' | '?'] { }

        rule property_key() -> PropertyKey
            = name:identifier() { PropertyKey::Identifier { name } }
            / value:string_literal() { PropertyKey::StringLiteral { value } }

        rule object_member() -> Member
            = "..." ws() argument:flow_type()
              { Member::Property(ObjectTypeMember::Spread { argument }) }
            / "..." { Member::Inexact }
            / static_kw()? variance:variance()? "[" ws()
              id:(name:identifier() ws() ":" ws() { Identifier { name } })?
              key:flow_type() ws() "]" ws() ":" ws() value:flow_type()
              { Member::Indexer(ObjectTypeIndexer { id, key, value, variance }) }
            / is_static:static_kw()? tp:type_params()? ws() "(" ws() params:function_params() ws() ")"
              ws() ":" ws() ret:flow_type()
              {
                  Member::Call(ObjectTypeCallProperty {
                      value: function(tp, params, ret),
                      is_static: is_static.is_some(),
                  })
              }
            / is_static:static_kw()? variance:variance()? key:property_key() ws() tp:type_params()? ws()
              "(" ws() params:function_params() ws() ")" ws() ":" ws() ret:flow_type()
              {
                  Member::Property(ObjectTypeMember::Property {
                      key,
                      value: function(tp, params, ret),
                      optional: false,
                      method: true,
                      is_static: is_static.is_some(),
                      variance,
                  })
              }
            / is_static:static_kw()? variance:variance()? key:property_key() ws() optional:"?"? ws()
              ":" ws() value:flow_type()
              {
                  Member::Property(ObjectTypeMember::Property {
                      key,
                      value,
                      optional: optional.is_some(),
                      method: false,
                      is_static: is_static.is_some(),
                      variance,
                  })
              }
    }
}
