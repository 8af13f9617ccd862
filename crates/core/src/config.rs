//! Configuration management for lexchunk.
//!
//! This module handles loading and merging configuration from multiple sources:
//! - Defaults
//! - Config files (.lexchunk/config.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! The configuration is workspace-centric, with output state stored in `.lexchunk/`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Default upper bound for a serialized chunk, in characters.
pub const DEFAULT_MAX_CHUNK_SIZE: usize = 1500;

/// Default lower bound below which chunks are discarded, in characters.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 150;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the workspace root (contains .lexchunk/)
    pub workspace: PathBuf,

    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Maximum serialized chunk size (characters)
    pub max_chunk_size: usize,

    /// Minimum serialized chunk size (characters)
    pub min_chunk_size: usize,

    /// Directory receiving chunks.jsonl, sources.jsonl and structure dumps.
    /// `None` means `<workspace>/.lexchunk/output`.
    pub output_dir: Option<PathBuf>,

    /// Number of documents processed concurrently
    pub concurrency: usize,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    chunking: Option<ChunkingSection>,
    output: Option<OutputSection>,
    ingest: Option<IngestSection>,
    workspace: Option<WorkspaceSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChunkingSection {
    #[serde(rename = "maxChunkSize")]
    max_chunk_size: Option<usize>,
    #[serde(rename = "minChunkSize")]
    min_chunk_size: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OutputSection {
    dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IngestSection {
    concurrency: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WorkspaceSection {
    path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workspace: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_file: None,
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            output_dir: None,
            concurrency: default_concurrency(),
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .max(1)
}

impl AppConfig {
    /// Load configuration from defaults, the YAML config file and environment variables.
    ///
    /// Environment variables:
    /// - `LEXCHUNK_WORKSPACE`: Override workspace path
    /// - `LEXCHUNK_CONFIG`: Path to config file
    /// - `LEXCHUNK_MAX_CHUNK_SIZE` / `LEXCHUNK_MIN_CHUNK_SIZE`: Chunk thresholds
    /// - `LEXCHUNK_OUTPUT`: Output directory
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    ///
    /// # Example
    /// ```no_run
    /// use lexchunk_core::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load config");
    /// println!("Output: {:?}", config.output_path());
    /// ```
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(workspace) = std::env::var("LEXCHUNK_WORKSPACE") {
            config.workspace = PathBuf::from(workspace);
        }

        if let Ok(config_file) = std::env::var("LEXCHUNK_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        if !config.workspace.exists() {
            return Err(AppError::Config(format!(
                "Workspace directory does not exist: {:?}",
                config.workspace
            )));
        }

        let config_path = match config.config_file {
            Some(ref cf) => cf.clone(),
            None => config.lexchunk_dir().join("config.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Some(max) = parse_env_usize("LEXCHUNK_MAX_CHUNK_SIZE")? {
            config.max_chunk_size = max;
        }

        if let Some(min) = parse_env_usize("LEXCHUNK_MIN_CHUNK_SIZE")? {
            config.min_chunk_size = min;
        }

        if let Ok(output) = std::env::var("LEXCHUNK_OUTPUT") {
            config.output_dir = Some(PathBuf::from(output));
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            config.log_level.get_or_insert(level);
        }

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    pub fn merge_yaml(&self, path: &Path) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(ws) = config_file.workspace {
            if let Some(path) = ws.path {
                result.workspace = PathBuf::from(path);
            }
        }

        if let Some(chunking) = config_file.chunking {
            if let Some(max) = chunking.max_chunk_size {
                result.max_chunk_size = max;
            }
            if let Some(min) = chunking.min_chunk_size {
                result.min_chunk_size = min;
            }
        }

        if let Some(output) = config_file.output {
            if let Some(dir) = output.dir {
                result.output_dir = Some(PathBuf::from(dir));
            }
        }

        if let Some(ingest) = config_file.ingest {
            if let Some(concurrency) = ingest.concurrency {
                result.concurrency = concurrency;
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        tracing::debug!("Merged config file {:?}", path);
        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// Command-line flags take precedence over the config file and
    /// environment variables.
    pub fn with_overrides(
        mut self,
        workspace: Option<PathBuf>,
        config_file: Option<PathBuf>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(workspace) = workspace {
            self.workspace = workspace;
        }

        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Override the chunk thresholds (used by per-command flags).
    pub fn with_chunk_sizes(mut self, max: Option<usize>, min: Option<usize>) -> Self {
        if let Some(max) = max {
            self.max_chunk_size = max;
        }
        if let Some(min) = min {
            self.min_chunk_size = min;
        }
        self
    }

    /// Get the path to the .lexchunk directory.
    pub fn lexchunk_dir(&self) -> PathBuf {
        self.workspace.join(".lexchunk")
    }

    /// Resolved output directory.
    pub fn output_path(&self) -> PathBuf {
        match self.output_dir {
            Some(ref dir) if dir.is_absolute() => dir.clone(),
            Some(ref dir) => self.workspace.join(dir),
            None => self.lexchunk_dir().join("output"),
        }
    }

    /// Validate chunking and ingest settings.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_chunk_size == 0 {
            return Err(AppError::Config(
                "max_chunk_size must be greater than zero".to_string(),
            ));
        }

        if self.min_chunk_size > self.max_chunk_size {
            return Err(AppError::Config(format!(
                "min_chunk_size ({}) exceeds max_chunk_size ({})",
                self.min_chunk_size, self.max_chunk_size
            )));
        }

        if self.concurrency == 0 {
            return Err(AppError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_env_usize(name: &str) -> AppResult<Option<usize>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| AppError::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}
