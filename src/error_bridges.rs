//! Error bridge implementations for errors defined in this crate.
//!
//! Bridges for `EngineError` and `TreeError` live next to those types in
//! `typemerge-flow` and `typemerge-syntax`, since `MergeError` is foreign to
//! this crate as well.

use typemerge_core::MergeError;

use crate::config::ConfigError;

// ============================================================================
// Bridge: ConfigError -> MergeError
// ============================================================================

impl From<ConfigError> for MergeError {
    fn from(err: ConfigError) -> Self {
        MergeError::Config {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typemerge_core::OutputErrorCode;

    #[test]
    fn config_error_maps_to_invalid_input() {
        let err = crate::config::Config::from_toml_str("[merge]\nstrategy = 1\n").unwrap_err();
        let merged: MergeError = err.into();
        assert!(matches!(merged, MergeError::Config { .. }));
        assert_eq!(
            OutputErrorCode::from(&merged),
            OutputErrorCode::InvalidInput
        );
    }
}
