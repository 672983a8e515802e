//! Flow binary discovery.
//!
//! Priority order:
//! 1. Configured path (or bare command name, resolved on `PATH`)
//! 2. Nearest `node_modules/.bin/flow`, walking up from the source file
//! 3. `flow` on `PATH`

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::EngineError;

const FLOW: &str = "flow";

/// Locate the Flow binary to use for `source`.
pub fn locate_flow(configured: Option<&Path>, source: &Path) -> Result<PathBuf, EngineError> {
    if let Some(path) = configured {
        return resolve_configured(path);
    }

    if let Some(local) = find_in_node_modules(source) {
        debug!(path = %local.display(), "using project-local flow");
        return Ok(local);
    }

    which::which(FLOW).map_err(|_| EngineError::NotFound {
        searched: format!(
            "node_modules/.bin above {} and PATH",
            source.display()
        ),
    })
}

fn resolve_configured(path: &Path) -> Result<PathBuf, EngineError> {
    if path.components().count() == 1 && !path.is_file() {
        return which::which(path).map_err(|_| EngineError::NotFound {
            searched: format!("PATH for `{}`", path.display()),
        });
    }
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(EngineError::NotFound {
            searched: path.display().to_string(),
        })
    }
}

/// Walk up from the directory containing `source` looking for
/// `node_modules/.bin/flow`.
pub fn find_in_node_modules(source: &Path) -> Option<PathBuf> {
    let absolute = std::fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
    let start = if absolute.is_dir() {
        absolute.as_path()
    } else {
        absolute.parent()?
    };
    start
        .ancestors()
        .map(|dir| dir.join("node_modules").join(".bin").join(FLOW))
        .find(|candidate| candidate.is_file())
}
