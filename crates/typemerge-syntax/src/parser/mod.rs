// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Parsing of Flow type text.
//!
//! Type engines report types as source text (`?string`, `Array<number>`,
//! `(x: number) => void`). The fragment parser turns that text into a
//! [`TypeAnnotation`] by wrapping it in a synthetic alias declaration,
//! `type S = <text>;`, parsing the declaration, and taking its right-hand
//! side. Anything that is not a complete type, including trailing
//! declarations smuggled in after a `;`, is rejected.

mod errors;
mod grammar;

pub use errors::FragmentParseError;

use crate::options::ParserOptions;
use crate::type_expr::{TypeAnnotation, TypeParameterDeclaration};

/// Name of the synthetic alias wrapped around fragments.
const FRAGMENT_ALIAS: &str = "S";

/// A parsed `type Name<Params> = Right;` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub id: String,
    pub type_parameters: Option<TypeParameterDeclaration>,
    pub right: TypeAnnotation,
}

/// Parse a complete type alias declaration.
pub fn parse_type_alias(
    source: &str,
    options: &ParserOptions,
) -> Result<TypeAlias, FragmentParseError> {
    require_type_syntax(options)?;
    grammar::flow::type_alias(source)
        .map_err(|err| FragmentParseError::from_peg("type alias", source, 0, err))
}

/// Parse type text as it appears on the right of a type alias.
///
/// # Example
///
/// ```
/// use typemerge_syntax::{parse_type_fragment, ParserOptions, TypeAnnotation};
///
/// let ty = parse_type_fragment("?number", &ParserOptions::default()).unwrap();
/// assert_eq!(
///     ty,
///     TypeAnnotation::Nullable { type_annotation: Box::new(TypeAnnotation::Number) }
/// );
/// ```
pub fn parse_type_fragment(
    text: &str,
    options: &ParserOptions,
) -> Result<TypeAnnotation, FragmentParseError> {
    require_type_syntax(options)?;
    let prefix = format!("type {} = ", FRAGMENT_ALIAS);
    let source = format!("{}{};", prefix, text);
    grammar::flow::type_alias(&source)
        .map(|alias| alias.right)
        .map_err(|err| FragmentParseError::from_peg("type", text, prefix.len(), err))
}

/// Parse a class declaration and return the class name.
///
/// The body is required: `class Foo` on its own is rejected.
pub fn parse_class_declaration(
    text: &str,
    options: &ParserOptions,
) -> Result<String, FragmentParseError> {
    require_type_syntax(options)?;
    grammar::flow::class_declaration(text)
        .map_err(|err| FragmentParseError::from_peg("class declaration", text, 0, err))
}

fn require_type_syntax(options: &ParserOptions) -> Result<(), FragmentParseError> {
    if options.supports_type_syntax() {
        Ok(())
    } else {
        Err(FragmentParseError::DialectDisabled)
    }
}
