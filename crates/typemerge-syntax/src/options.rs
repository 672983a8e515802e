// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Grammar configuration shared by the main parse and fragment parses.
//!
//! [`ParserOptions`] describes the dialect the source file was parsed with:
//! the module kind and the set of enabled language-extension plugins. The
//! merge engine passes the caller's options through unchanged to every
//! fragment parse, so that any extension enabled for the file is also
//! enabled when a type description is reparsed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How the source file is interpreted at the top level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// ES module (the default).
    #[default]
    Module,
    /// Classic script.
    Script,
    /// Module if it contains import/export, script otherwise.
    Unambiguous,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Module => write!(f, "module"),
            SourceType::Script => write!(f, "script"),
            SourceType::Unambiguous => write!(f, "unambiguous"),
        }
    }
}

/// A language-extension flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Plugin {
    /// Flow type syntax. Required for type fragments.
    Flow,
    /// Flow types inside `/*: */` comments.
    FlowComments,
    Jsx,
    ClassProperties,
}

impl fmt::Display for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Plugin::Flow => "flow",
            Plugin::FlowComments => "flowComments",
            Plugin::Jsx => "jsx",
            Plugin::ClassProperties => "classProperties",
        };
        f.write_str(name)
    }
}

/// Dialect configuration for parsing.
///
/// # Example
///
/// ```
/// use typemerge_syntax::{ParserOptions, Plugin, SourceType};
///
/// let options = ParserOptions::default();
/// assert_eq!(options.source_type, SourceType::Module);
/// assert!(options.has_plugin(Plugin::Flow));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserOptions {
    #[serde(default)]
    pub source_type: SourceType,
    #[serde(default = "default_plugins")]
    pub plugins: Vec<Plugin>,
}

fn default_plugins() -> Vec<Plugin> {
    vec![Plugin::Flow, Plugin::FlowComments]
}

impl Default for ParserOptions {
    /// Module source with the `flow` and `flowComments` plugins.
    fn default() -> Self {
        ParserOptions {
            source_type: SourceType::Module,
            plugins: default_plugins(),
        }
    }
}

impl ParserOptions {
    pub fn new(source_type: SourceType, plugins: Vec<Plugin>) -> Self {
        ParserOptions {
            source_type,
            plugins,
        }
    }

    pub fn has_plugin(&self, plugin: Plugin) -> bool {
        self.plugins.contains(&plugin)
    }

    /// Whether type fragments can be parsed under these options.
    pub fn supports_type_syntax(&self) -> bool {
        self.has_plugin(Plugin::Flow)
    }
}
