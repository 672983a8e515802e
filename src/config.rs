//! Configuration files.
//!
//! ```toml
//! [engine]
//! binary = "node_modules/.bin/flow"
//! root = "."
//! expand_type_aliases = true
//! timeout_secs = 60
//!
//! [merge]
//! strategy = "bulk"            # or "point"
//!
//! [merge.eligibility]
//! CallExpression = "never"
//! NumericLiteral = "always"
//!
//! [parser]
//! source_type = "module"
//! plugins = ["flow", "flowComments"]
//! ```
//!
//! Every section and key is optional. A `Config` is an explicit value: it is
//! turned into [`MergeOptions`] and an [`EngineConfig`] for each merge, never
//! stored globally.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use typemerge_flow::EngineConfig;
use typemerge_syntax::{NodeKind, ParserOptions};

use crate::eligibility::{EligibilityFilter, Override};
use crate::merge::MergeOptions;
use crate::source::Strategy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub engine: EngineConfig,
    pub merge: MergeSection,
    pub parser: ParserOptions,
}

/// The `[merge]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeSection {
    pub strategy: Strategy,
    /// Node kind name to override, applied on top of the defaults.
    pub eligibility: BTreeMap<String, Override>,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&text)
    }

    pub fn eligibility_filter(&self) -> EligibilityFilter {
        EligibilityFilter::with_overrides(
            self.merge
                .eligibility
                .iter()
                .map(|(kind, value)| (NodeKind::from_name(kind), *value)),
        )
    }

    pub fn merge_options(&self) -> MergeOptions {
        MergeOptions {
            strategy: self.merge.strategy,
            eligibility: self.eligibility_filter(),
            parser: self.parser.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typemerge_syntax::{Plugin, SourceType};

    #[test]
    fn empty_file_gives_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.merge.strategy, Strategy::Bulk);
        assert_eq!(config.parser.source_type, SourceType::Module);
        assert_eq!(config.parser.plugins, vec![Plugin::Flow, Plugin::FlowComments]);
        assert_eq!(config.engine.timeout_secs, 60);
    }

    #[test]
    fn full_file() {
        let config = Config::from_toml_str(
            r#"
            [engine]
            binary = "/opt/flow/bin/flow"
            expand_type_aliases = false
            timeout_secs = 5

            [merge]
            strategy = "point"

            [merge.eligibility]
            CallExpression = "never"
            NumericLiteral = "always"

            [parser]
            source_type = "script"
            plugins = ["flow", "jsx"]
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.binary, Some(PathBuf::from("/opt/flow/bin/flow")));
        assert!(!config.engine.expand_type_aliases);
        assert_eq!(config.engine.timeout_secs, 5);

        let options = config.merge_options();
        assert_eq!(options.strategy, Strategy::Point);
        assert!(!options
            .eligibility
            .is_eligible(&NodeKind::CallExpression, None));
        assert!(options.eligibility.is_eligible(&NodeKind::NumericLiteral, None));
        assert!(options.eligibility.is_eligible(&NodeKind::Identifier, None));
        assert_eq!(options.parser.source_type, SourceType::Script);
        assert!(options.parser.has_plugin(Plugin::Jsx));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("[merge]\nstratgy = \"point\"\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[merge]\nstrategy = \"sideways\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("typemerge.toml");
        let err = Config::load(&missing).unwrap_err();
        assert!(err.to_string().contains("typemerge.toml"), "{err}");

        std::fs::write(&missing, "[merge]\nstrategy = \"point\"\n").unwrap();
        assert_eq!(
            Config::load(&missing).unwrap().merge.strategy,
            Strategy::Point
        );
    }
}
