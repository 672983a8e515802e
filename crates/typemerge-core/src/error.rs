//! Error types and exit codes for typemerge.
//!
//! This module provides a unified error type (`MergeError`) that bridges
//! subsystem errors (engine driver, tree import, configuration) into a
//! single type with stable exit codes for the CLI.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Engine unavailable (binary missing, cannot be invoked at all)
//! - `4`: Engine call failed (non-zero exit, malformed response)
//! - `5`: Invalid input (unreadable tree, missing file, bad config)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Per-node problems (a fragment that does not parse, a span with no fact)
//! are never errors at this level. They leave the node unannotated.

use std::fmt;

use thiserror::Error;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Stable process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller.
    InvalidArguments = 2,
    /// The type engine could not be located or started.
    EngineUnavailable = 3,
    /// A required engine call failed.
    EngineFailed = 4,
    /// Input tree, source file or configuration could not be used.
    InvalidInput = 5,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for merge operations and the CLI.
///
/// Only fatal conditions are represented here. A merge that returns `Ok`
/// may still have left any number of nodes unannotated.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// The engine cannot be used at all. Detected once, before any query.
    #[error("{engine} is unavailable: {reason}")]
    EngineUnavailable { engine: String, reason: String },

    /// A call whose failure cannot be scoped to a single node.
    #[error("{engine} call failed: {message}")]
    EngineFailed { engine: String, message: String },

    /// The syntax tree could not be imported or exported.
    #[error("invalid syntax tree: {message}")]
    InvalidTree { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// Configuration could not be read or parsed.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

/// Result alias for merge operations.
pub type MergeResult<T> = Result<T, MergeError>;

impl From<&MergeError> for OutputErrorCode {
    fn from(err: &MergeError) -> Self {
        match err {
            MergeError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            MergeError::EngineUnavailable { .. } => OutputErrorCode::EngineUnavailable,
            MergeError::EngineFailed { .. } => OutputErrorCode::EngineFailed,
            MergeError::InvalidTree { .. } => OutputErrorCode::InvalidInput,
            MergeError::FileNotFound { .. } => OutputErrorCode::InvalidInput,
            MergeError::Config { .. } => OutputErrorCode::InvalidInput,
            MergeError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<MergeError> for OutputErrorCode {
    fn from(err: MergeError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl MergeError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        MergeError::InvalidArguments {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MergeError::InternalError {
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        MergeError::FileNotFound { path: path.into() }
    }

    /// Whether this error means the engine could not be used at all.
    pub fn is_precondition(&self) -> bool {
        matches!(self, MergeError::EngineUnavailable { .. })
    }
}
