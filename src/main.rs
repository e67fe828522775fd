mod replay;
mod script;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use canvas::config::EngineConfig;
use canvas::doc::DocStore;
use canvas::sync::{self, SyncError};
use clap::{Args, Parser, Subcommand};
use tracing::{Level, error, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Config(#[source] serde_json::Error),
    #[error(transparent)]
    Script(#[from] script::ScriptError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

#[derive(Parser, Debug)]
#[command(name = "drawer", about = "Headless host for the shape editing engine")]
struct Cli {
    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(long, env = "DRAWER_LOG", default_value = "info", global = true)]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply an event script and print the resulting document.
    Replay(ReplayArgs),
    /// Validate a document file.
    Check {
        /// Document path, or - for stdin.
        file: String,
    },
}

#[derive(Args, Debug)]
struct ReplayArgs {
    /// Event script path (JSON lines), or - for stdin.
    #[arg(long)]
    script: String,

    /// Initial document path.
    #[arg(long)]
    document: Option<String>,

    /// JSON engine config file; the flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, env = "DRAWER_TOOL")]
    tool: Option<String>,

    #[arg(long, env = "DRAWER_COLOR")]
    color: Option<String>,

    #[arg(long, env = "DRAWER_STROKE_WIDTH")]
    stroke_width: Option<f64>,

    #[arg(long, env = "DRAWER_OPACITY")]
    opacity: Option<f64>,

    /// Print each notification as a line on stderr.
    #[arg(long, default_value_t = false)]
    notifications: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { cli.log_level };
    tracing_subscriber::fmt().with_max_level(level).with_writer(io::stderr).init();

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "drawer failed");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), CliError> {
    match command {
        Command::Replay(args) => run_replay(&args),
        Command::Check { file } => run_check(&file),
    }
}

fn run_replay(args: &ReplayArgs) -> Result<(), CliError> {
    let config = engine_config(args)?;
    let initial = args.document.as_deref().map(read_input).transpose()?;
    let events = script::parse(&read_input(&args.script)?)?;
    info!(events = events.len(), tool = %config.tool, "replaying");

    let outcome = replay::run(&config, initial.as_deref(), &events)?;
    if args.notifications {
        for notification in &outcome.notifications {
            eprintln!("{notification:?}");
        }
    }
    info!(
        notifications = outcome.notifications.len(),
        rejected = outcome.rejected,
        visuals = outcome.visuals,
        "done"
    );
    println!("{}", outcome.document);
    Ok(())
}

fn run_check(file: &str) -> Result<(), CliError> {
    let decoded = sync::decode(&read_input(file)?)?;
    let records = decoded.shapes.len() + decoded.skipped;
    let mut doc = DocStore::new();
    doc.replace_all(decoded.shapes);
    let dropped = records - doc.len();
    println!("{file}: {records} records, {} shapes, {dropped} dropped", doc.len());
    Ok(())
}

fn engine_config(args: &ReplayArgs) -> Result<EngineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json(&read_path(path)?).map_err(CliError::Config)?,
        None => EngineConfig::default(),
    };
    if let Some(tool) = &args.tool {
        config.tool.clone_from(tool);
    }
    if let Some(color) = &args.color {
        config.color.clone_from(color);
    }
    if let Some(width) = args.stroke_width {
        config.stroke_width = width;
    }
    if let Some(opacity) = args.opacity {
        config.opacity = opacity;
    }
    Ok(config)
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        return io::read_to_string(io::stdin()).map_err(|source| CliError::Read { path: "stdin".to_owned(), source });
    }
    read_path(Path::new(path))
}

fn read_path(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(), source })
}
