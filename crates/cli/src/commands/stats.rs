//! Stats command handler.
//!
//! Summarizes the ingest manifest.

use clap::Args;
use lexchunk_core::{config::AppConfig, AppResult};

/// Summarize what has been ingested
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let stats = lexchunk_ingest::stats(config)?;

        if self.json {
            let output = serde_json::json!({
                "output": config.output_path(),
                "sourcesCount": stats.sources_count,
                "chunksCount": stats.chunks_count,
                "bytesProcessed": stats.bytes_processed,
                "lastIngestAt": stats.last_ingest_at,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("Output: {}", config.output_path().display());
            println!("  Sources: {}", stats.sources_count);
            println!("  Chunks: {}", stats.chunks_count);
            println!("  Bytes processed: {}", stats.bytes_processed);
            if let Some(last_ingest) = stats.last_ingest_at {
                println!("  Last ingest: {}", last_ingest);
            }
        }

        Ok(())
    }
}
