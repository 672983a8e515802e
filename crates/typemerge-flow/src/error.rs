//! Errors from the type engine boundary.

use std::io;

use thiserror::Error;
use typemerge_core::MergeError;

/// Error invoking or decoding a type engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No engine binary could be located.
    #[error("flow binary not found ({searched})")]
    NotFound { searched: String },

    /// The binary exists but the process could not be started.
    #[error("failed to start `{program}`: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The process ran and reported failure.
    #[error("`{command}` exited with {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: String,
        stderr: String,
    },

    /// The process output is not in the expected shape.
    #[error("malformed engine output: {message}")]
    Malformed { message: String },

    /// The request did not complete within the configured timeout.
    #[error("`{command}` timed out after {seconds}s")]
    Timeout { command: String, seconds: u64 },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EngineError {
    pub fn malformed(message: impl Into<String>) -> Self {
        EngineError::Malformed {
            message: message.into(),
        }
    }

    /// Whether this error means the engine cannot be used at all, as
    /// opposed to a single request failing.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            EngineError::NotFound { .. } | EngineError::SpawnFailed { .. }
        )
    }
}

// ============================================================================
// Bridge: EngineError -> MergeError
// ============================================================================

impl EngineError {
    /// Convert into the unified error for a call that cannot be scoped to a
    /// single node.
    pub fn into_merge_error(self, engine: &str) -> MergeError {
        if self.is_unavailable() {
            MergeError::EngineUnavailable {
                engine: engine.to_string(),
                reason: self.to_string(),
            }
        } else {
            MergeError::EngineFailed {
                engine: engine.to_string(),
                message: self.to_string(),
            }
        }
    }
}

impl From<EngineError> for MergeError {
    fn from(err: EngineError) -> Self {
        err.into_merge_error("flow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_classification() {
        assert!(EngineError::NotFound {
            searched: "PATH".into()
        }
        .is_unavailable());
        assert!(EngineError::SpawnFailed {
            program: "flow".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        }
        .is_unavailable());
        assert!(!EngineError::malformed("not an object").is_unavailable());
        assert!(!EngineError::Timeout {
            command: "flow type-at-pos".into(),
            seconds: 60
        }
        .is_unavailable());
    }

    #[test]
    fn bridges_to_merge_error() {
        let unavailable: MergeError = EngineError::NotFound {
            searched: "PATH".into(),
        }
        .into();
        assert!(unavailable.is_precondition());

        let failed = EngineError::malformed("truncated").into_merge_error("snapshot");
        assert!(matches!(
            failed,
            MergeError::EngineFailed { ref engine, .. } if engine == "snapshot"
        ));
    }
}
