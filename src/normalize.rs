//! Canonicalization of engine type text before fragment parsing.
//!
//! Flow's rendering is valid type syntax except in two cases: `any` carries
//! a provenance suffix, and a class value is printed as its declaration.

use std::borrow::Cow;

use typemerge_syntax::{parse_class_declaration, FragmentParseError, ParserOptions};

pub const EXPLICIT_ANY: &str = "any (explicit)";
pub const IMPLICIT_ANY: &str = "any (implicit)";
pub const CLASS_MARKER: &str = "class ";

/// Rewrite `raw` into parseable type text.
///
/// Rules, first match wins:
/// 1. `any (explicit)` / `any (implicit)` become `any`.
/// 2. `class Name …{…}` becomes `typeof Name`. The declaration must parse;
///    a class description without a body is an error.
/// 3. Anything else is returned unchanged.
///
/// # Example
///
/// ```
/// use typemerge::normalize::normalize;
/// use typemerge_syntax::ParserOptions;
///
/// let options = ParserOptions::default();
/// assert_eq!(normalize("any (implicit)", &options).unwrap(), "any");
/// assert_eq!(normalize("class Foo { x: number }", &options).unwrap(), "typeof Foo");
/// assert_eq!(normalize("?string", &options).unwrap(), "?string");
/// ```
pub fn normalize<'a>(
    raw: &'a str,
    options: &ParserOptions,
) -> Result<Cow<'a, str>, FragmentParseError> {
    if raw == EXPLICIT_ANY || raw == IMPLICIT_ANY {
        return Ok(Cow::Borrowed("any"));
    }
    if raw.starts_with(CLASS_MARKER) {
        let name = parse_class_declaration(raw, options)?;
        return Ok(Cow::Owned(format!("typeof {}", name)));
    }
    Ok(Cow::Borrowed(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(raw: &str) -> Result<String, FragmentParseError> {
        normalize(raw, &ParserOptions::default()).map(Cow::into_owned)
    }

    #[test]
    fn any_variants_collapse() {
        assert_eq!(run(EXPLICIT_ANY).unwrap(), "any");
        assert_eq!(run(IMPLICIT_ANY).unwrap(), "any");
        assert_eq!(run("any").unwrap(), "any");
    }

    #[test]
    fn class_descriptions_become_typeof() {
        assert_eq!(run("class Foo {}").unwrap(), "typeof Foo");
        assert_eq!(
            run("class Point<T> extends Base { x: T; y: T; static origin(): Point<T> }").unwrap(),
            "typeof Point"
        );
    }

    #[test]
    fn class_without_body_is_malformed() {
        assert!(matches!(
            run("class Foo"),
            Err(FragmentParseError::Syntax { .. })
        ));
    }

    #[test]
    fn other_text_passes_through() {
        for raw in ["number", "Array<string>", "classic", "(x: number) => void"] {
            assert_eq!(run(raw).unwrap(), raw);
        }
    }

    #[test]
    fn passthrough_borrows() {
        let options = ParserOptions::default();
        assert!(matches!(
            normalize("number", &options).unwrap(),
            Cow::Borrowed(_)
        ));
    }
}
