//! The external type engine boundary for typemerge.
//!
//! - [`TypeEngine`]: the capability the merge depends on (point queries,
//!   whole-file dumps, an availability check)
//! - [`FlowCli`]: drives the `flow` binary as a subprocess
//! - [`SnapshotEngine`]: replays a recorded `dump-types` response
//! - Flow JSON record decoding and binary discovery

pub mod cli;
pub mod engine;
pub mod error;
pub mod locate;
pub mod record;
pub mod snapshot;

pub use cli::{EngineConfig, FlowCli, DEFAULT_TIMEOUT_SECS};
pub use engine::{PointAnswer, TypeEngine};
pub use error::EngineError;
pub use locate::locate_flow;
pub use snapshot::SnapshotEngine;
