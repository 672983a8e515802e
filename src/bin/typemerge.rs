//! typemerge CLI binary entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use typemerge::{Config, MergeError, MergeResult, Merger, OutputErrorCode, Strategy};
use typemerge_flow::{FlowCli, SnapshotEngine, TypeEngine};

/// Annotate a Babel syntax tree with the types Flow infers for it.
#[derive(Parser)]
#[command(name = "typemerge")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Babel AST of the source file, as JSON
    #[arg(long)]
    ast: PathBuf,

    /// How to obtain types (default: from configuration, else bulk)
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Flow binary to run (default: discovered from the source file)
    #[arg(long)]
    flow: Option<PathBuf>,

    /// Flow root passed to every query
    #[arg(long)]
    root: Option<PathBuf>,

    /// Replay a recorded `flow dump-types --json` output instead of running Flow
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print merge statistics to stderr as JSON
    #[arg(long)]
    stats: bool,

    /// The JavaScript file the AST was parsed from
    source: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level.as_str())),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(&cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(err) => {
            let code = OutputErrorCode::from(&err);
            eprintln!(
                "{}",
                json!({
                    "status": "error",
                    "error": { "code": code.code(), "message": err.to_string() }
                })
            );
            ExitCode::from(code.code())
        }
    }
}

async fn run(cli: &Cli) -> MergeResult<String> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.merge.strategy = strategy;
    }
    if let Some(flow) = &cli.flow {
        config.engine.binary = Some(flow.clone());
    }
    if let Some(root) = &cli.root {
        config.engine.root = Some(root.clone());
    }

    if !cli.source.is_file() {
        return Err(MergeError::file_not_found(cli.source.display().to_string()));
    }
    let tree = read_tree(&cli.ast)?;

    let engine: Box<dyn TypeEngine> = match &cli.dump {
        Some(path) => Box::new(
            SnapshotEngine::from_path(path).map_err(|e| e.into_merge_error("snapshot"))?,
        ),
        None => Box::new(FlowCli::new(config.engine.clone())),
    };
    debug!(engine = engine.name(), strategy = %config.merge.strategy, "starting merge");

    let merged = Merger::new(engine.as_ref(), config.merge_options())
        .merge(tree, &cli.source)
        .await?;
    if cli.stats {
        eprintln!("{}", json!({ "status": "ok", "stats": merged.stats }));
    }

    let value = typemerge_syntax::to_babel_json(&merged.tree)?;
    serde_json::to_string(&value)
        .map_err(|e| MergeError::internal(format!("failed to serialize tree: {}", e)))
}

fn read_tree(path: &Path) -> MergeResult<typemerge_syntax::SyntaxTree> {
    let text = std::fs::read_to_string(path)
        .map_err(|_| MergeError::file_not_found(path.display().to_string()))?;
    Ok(typemerge_syntax::from_babel_str(&text)?)
}
