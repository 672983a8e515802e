//! Typemerge: Flow type facts merged into Babel syntax trees.
//!
//! Given the Babel AST of a Flow-typed JavaScript file and a Flow engine,
//! typemerge asks the engine what type each eligible node has and attaches
//! the answer to the node as a parsed type annotation. The result is the
//! same Babel JSON with an extra `inferredType` member on annotated nodes.
//!
//! ```no_run
//! use std::path::Path;
//! use typemerge::{merge_blocking, MergeOptions};
//! use typemerge_flow::{EngineConfig, FlowCli};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("a.ast.json")?;
//! let tree = typemerge_syntax::from_babel_str(&json)?;
//! let engine = FlowCli::new(EngineConfig::default());
//! let merged = merge_blocking(tree, Path::new("a.js"), &engine, &MergeOptions::default())?;
//! println!("{}", typemerge_syntax::to_babel_json(&merged.tree)?);
//! # Ok(())
//! # }
//! ```

// Merge pipeline
pub mod annotate;
pub mod eligibility;
pub mod fragment;
pub mod index;
pub mod merge;
pub mod normalize;
pub mod source;

// Configuration
pub mod config;

// Error bridges - converts crate-local errors to MergeError
mod error_bridges;

pub use typemerge_core::{MergeError, MergeResult, OutputErrorCode, TypeFact};

pub use config::{Config, ConfigError};
pub use eligibility::{EligibilityFilter, Override};
pub use index::PositionIndex;
pub use merge::{merge, merge_blocking, AnnotatedTree, MergeOptions, MergeStats, Merger};
pub use source::{BulkDumpSource, FactSource, PointQuerySource, Strategy};
