//! lexchunk CLI
//!
//! Main entry point for the lexchunk command-line tool.
//! Turns exported regulation HTML into citation-ready chunks.

mod commands;

use clap::{Parser, Subcommand};
use commands::{IngestCommand, InspectCommand, StatsCommand};
use lexchunk_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// lexchunk - article-aware chunking for regulatory documents
#[derive(Parser, Debug)]
#[command(name = "lexchunk")]
#[command(about = "Article-aware chunking for regulatory documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "LEXCHUNK_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "LEXCHUNK_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chunk HTML sources into the output directory
    Ingest(IngestCommand),

    /// Show the recovered structure of a single file
    Inspect(InspectCommand),

    /// Summarize what has been ingested
    Stats(StatsCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Parse command-line arguments first (needed for logging config)
    let cli = Cli::parse();

    // Load base configuration from environment and config file
    let mut config = AppConfig::load()?;

    // Config files picked by flags are merged before the flag overrides
    let flag_config = match (&cli.config, &cli.workspace) {
        (Some(path), _) => Some(path.clone()),
        (None, Some(workspace))
            if config.config_file.is_none() && *workspace != config.workspace =>
        {
            Some(workspace.join(".lexchunk").join("config.yaml"))
        }
        _ => None,
    };
    if let Some(path) = flag_config {
        let already_loaded = config.config_file.as_ref() == Some(&path);
        if !already_loaded && (cli.config.is_some() || path.exists()) {
            config = config.merge_yaml(&path)?;
        }
    }

    // Apply CLI overrides
    let config = config.with_overrides(
        cli.workspace,
        cli.config,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );
    config.validate()?;

    // Initialize logging with final configuration
    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("lexchunk CLI starting");
    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Output: {:?}", config.output_path());

    // Emit command.start span
    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Inspect(_) => "inspect",
        Commands::Stats(_) => "stats",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    // Route to command handlers
    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Inspect(cmd) => cmd.execute(&config).await,
        Commands::Stats(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}
