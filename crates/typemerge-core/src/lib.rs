//! Core infrastructure for typemerge.
//!
//! This crate provides the language-agnostic pieces shared by the syntax
//! model, the engine driver and the merge engine:
//! - Source positions, ranges and single-line spans
//! - Type facts and metadata scrubbing
//! - The unified error type and exit codes

pub mod error;
pub mod fact;
pub mod span;

pub use error::{MergeError, MergeResult, OutputErrorCode};
pub use fact::{TypeFact, UNKNOWN_TYPE};
pub use span::{Position, SourceRange, Span};
