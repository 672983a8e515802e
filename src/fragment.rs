//! Turning a type fact into a parsed type expression.

use typemerge_core::TypeFact;
use typemerge_syntax::{parse_type_fragment, FragmentParseError, ParserOptions, TypeAnnotation};

use crate::normalize::normalize;

/// Resolve a fact's type text.
///
/// Returns `Ok(None)` when the engine had no information (`(unknown)`);
/// parsing is not attempted in that case.
pub fn resolve(
    fact: &TypeFact,
    options: &ParserOptions,
) -> Result<Option<TypeAnnotation>, FragmentParseError> {
    if fact.is_unknown() {
        return Ok(None);
    }
    let normalized = normalize(&fact.raw_type, options)?;
    parse_type_fragment(&normalized, options).map(Some)
}
