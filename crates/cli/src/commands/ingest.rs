//! Ingest command handler.
//!
//! Chunks HTML sources and writes them to the output directory.

use clap::Args;
use lexchunk_core::{config::AppConfig, AppResult};
use lexchunk_ingest::{IngestOptions, JsonlSink, ProgressEvent, ProgressReporter};
use std::path::PathBuf;
use std::sync::Arc;

/// Chunk HTML sources into the output directory
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Files or directories to ingest
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Include patterns (substring)
    #[arg(long)]
    pub include: Vec<String>,

    /// Exclude patterns (substring)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Output directory (default: <workspace>/.lexchunk/output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum chunk size in characters
    #[arg(long)]
    pub max_chunk_size: Option<usize>,

    /// Minimum chunk size in characters
    #[arg(long)]
    pub min_chunk_size: Option<usize>,

    /// Truncate previous output before ingesting
    #[arg(long)]
    pub reset: bool,

    /// Write per-document structure JSON under <output>/structure/
    #[arg(long)]
    pub dump_structure: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command for {} path(s)", self.paths.len());

        let mut config = config
            .clone()
            .with_chunk_sizes(self.max_chunk_size, self.min_chunk_size);
        if let Some(ref output) = self.output {
            config.output_dir = Some(output.clone());
        }
        config.validate()?;

        let options = IngestOptions {
            paths: self.paths.clone(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            reset: self.reset,
            dump_structure: self.dump_structure,
        };

        // Progress lines go to stderr so --json output stays clean
        let progress = if self.json {
            ProgressReporter::noop()
        } else {
            ProgressReporter::new(Arc::new(|event: ProgressEvent| {
                eprintln!("{}", event.format_simple())
            }))
        };

        let mut sink = JsonlSink::open(&config.output_path())?;
        let stats = lexchunk_ingest::ingest(options, &config, &mut sink, &progress).await?;

        if self.json {
            let output = serde_json::to_value(&stats)?;
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!(
                "Ingested {} sources ({} skipped, {} failed): {} chunks, {} dropped, {} bytes in {:.2}s",
                stats.sources_processed,
                stats.sources_skipped,
                stats.sources_failed,
                stats.chunks_written,
                stats.chunks_dropped,
                stats.bytes_processed,
                stats.duration_secs
            );
            println!("Chunks: {}", sink.path().display());
        }

        Ok(())
    }
}
