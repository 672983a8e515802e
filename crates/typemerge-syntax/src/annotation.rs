// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! The type annotation slot carried by syntax nodes.

use serde::ser::{Serialize, SerializeMap, Serializer};
use typemerge_core::TypeFact;

use crate::type_expr::TypeAnnotation;

/// Node key under which annotations appear in serialized trees.
pub const ANNOTATION_KEY: &str = "inferredType";

/// Type information attached to a node.
///
/// `source` is expected to be scrubbed before it is stored here; see
/// [`TypeFact::scrubbed`].
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub parsed_type: TypeAnnotation,
    pub source: TypeFact,
}

impl Annotation {
    pub fn new(parsed_type: TypeAnnotation, source: TypeFact) -> Self {
        Annotation {
            parsed_type,
            source,
        }
    }
}

/// Serialized as `{"type": <parsed>, "raw": <engine text>, ...metadata}`.
///
/// The fact's range is left out: it duplicates the node's own location.
impl Serialize for Annotation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self
            .source
            .metadata
            .iter()
            .filter(|(key, _)| key.as_str() != "type" && key.as_str() != "raw");
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.parsed_type)?;
        map.serialize_entry("raw", &self.source.raw_type)?;
        for (key, value) in extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}
