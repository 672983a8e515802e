//! Subprocess driver for the `flow` command-line tool.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::process::Command;
use tracing::{debug, info};
use typemerge_core::TypeFact;

use crate::engine::{PointAnswer, TypeEngine};
use crate::error::EngineError;
use crate::locate::locate_flow;
use crate::record::{decode_dump, decode_point};

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Settings for driving the engine. Appears as `[engine]` in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Explicit binary path or command name. Discovered when absent.
    pub binary: Option<PathBuf>,
    /// Flow root passed as `--root`.
    pub root: Option<PathBuf>,
    /// Pass `--expand-type-aliases` to point queries.
    pub expand_type_aliases: bool,
    pub timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            binary: None,
            root: None,
            expand_type_aliases: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Drives `flow type-at-pos`, `flow dump-types` and `flow version`.
///
/// The binary is discovered on first use and kept for the lifetime of the
/// value, so one `FlowCli` corresponds to one merge configuration.
#[derive(Debug)]
pub struct FlowCli {
    config: EngineConfig,
    binary: OnceLock<PathBuf>,
}

impl FlowCli {
    pub fn new(config: EngineConfig) -> Self {
        FlowCli {
            config,
            binary: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The binary to run for `file`, discovering it on first call.
    pub fn binary_for(&self, file: &Path) -> Result<&Path, EngineError> {
        if let Some(binary) = self.binary.get() {
            return Ok(binary.as_path());
        }
        let found = locate_flow(self.config.binary.as_deref(), file)?;
        Ok(self.binary.get_or_init(|| found).as_path())
    }

    fn root_args(&self, args: &mut Vec<OsString>) {
        if let Some(root) = &self.config.root {
            args.push("--root".into());
            args.push(root.as_os_str().to_owned());
        }
    }

    /// Arguments for a point query. `column` is already 1-based.
    pub fn point_args(&self, file: &Path, line: u32, column: u32) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["type-at-pos".into()];
        if self.config.expand_type_aliases {
            args.push("--expand-type-aliases".into());
        }
        args.push("--json".into());
        self.root_args(&mut args);
        args.push(file.as_os_str().to_owned());
        args.push(line.to_string().into());
        args.push(column.to_string().into());
        args
    }

    /// Arguments for a whole-file dump.
    pub fn dump_args(&self, file: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["dump-types".into(), "--json".into()];
        self.root_args(&mut args);
        args.push(file.as_os_str().to_owned());
        args
    }

    async fn run_json(&self, binary: &Path, args: Vec<OsString>) -> Result<Value, EngineError> {
        let command_line = describe(binary, &args);
        debug!(command = %command_line, "running flow");

        let child = Command::new(binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| EngineError::SpawnFailed {
                program: binary.display().to_string(),
                source,
            })?;

        let seconds = self.config.timeout_secs;
        let output =
            match tokio::time::timeout(Duration::from_secs(seconds), child.wait_with_output())
                .await
            {
                Ok(result) => result?,
                Err(_) => {
                    return Err(EngineError::Timeout {
                        command: command_line,
                        seconds,
                    })
                }
            };

        if !output.status.success() {
            return Err(EngineError::NonZeroExit {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(serde_json::from_slice(&output.stdout)?)
    }
}

fn describe(binary: &Path, args: &[OsString]) -> String {
    let mut line = binary.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

#[async_trait]
impl TypeEngine for FlowCli {
    fn name(&self) -> &str {
        "flow"
    }

    async fn ensure_available(&self, file: &Path) -> Result<(), EngineError> {
        let binary = self.binary_for(file)?;
        let version = self
            .run_json(binary, vec!["version".into(), "--json".into()])
            .await?;
        let semver = version
            .get("semver")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        info!(binary = %binary.display(), version = semver, "flow available");
        Ok(())
    }

    async fn type_at_pos(
        &self,
        file: &Path,
        line: u32,
        column: u32,
    ) -> Result<PointAnswer, EngineError> {
        let binary = self.binary_for(file)?;
        let value = self
            .run_json(binary, self.point_args(file, line, column))
            .await?;
        decode_point(value)
    }

    async fn dump_types(&self, file: &Path) -> Result<Vec<TypeFact>, EngineError> {
        let binary = self.binary_for(file)?;
        let value = self.run_json(binary, self.dump_args(file)).await?;
        let facts = decode_dump(value)?;
        debug!(count = facts.len(), "flow dump-types");
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn default_config() {
        let config = EngineConfig::default();
        assert!(config.expand_type_aliases);
        assert_eq!(config.timeout_secs, 60);
        assert!(config.binary.is_none());
    }

    #[test]
    fn point_query_arguments() {
        let cli = FlowCli::new(EngineConfig::default());
        assert_eq!(
            strings(cli.point_args(Path::new("src/a.js"), 1, 7)),
            vec![
                "type-at-pos",
                "--expand-type-aliases",
                "--json",
                "src/a.js",
                "1",
                "7"
            ]
        );

        let cli = FlowCli::new(EngineConfig {
            expand_type_aliases: false,
            root: Some(PathBuf::from("/repo")),
            ..EngineConfig::default()
        });
        assert_eq!(
            strings(cli.point_args(Path::new("a.js"), 2, 1)),
            vec!["type-at-pos", "--json", "--root", "/repo", "a.js", "2", "1"]
        );
    }

    #[test]
    fn dump_arguments() {
        let cli = FlowCli::new(EngineConfig {
            root: Some(PathBuf::from("/repo")),
            ..EngineConfig::default()
        });
        assert_eq!(
            strings(cli.dump_args(Path::new("a.js"))),
            vec!["dump-types", "--json", "--root", "/repo", "a.js"]
        );
    }

    #[test]
    fn config_from_partial_json() {
        let config: EngineConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert!(config.expand_type_aliases);
    }

    #[tokio::test]
    async fn missing_binary_is_unavailable() {
        let dir = tempfile::TempDir::new().unwrap();
        let cli = FlowCli::new(EngineConfig {
            binary: Some(dir.path().join("missing").join("flow")),
            ..EngineConfig::default()
        });
        let err = cli
            .ensure_available(&dir.path().join("a.js"))
            .await
            .unwrap_err();
        assert!(err.is_unavailable(), "{err}");
    }
}
