//! Inspect command handler.
//!
//! Runs the pipeline over one file without writing anything.

use clap::Args;
use lexchunk_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Show the recovered structure of a single file
#[derive(Args, Debug)]
pub struct InspectCommand {
    /// HTML file to inspect
    pub file: PathBuf,

    /// Show a per-article summary table
    #[arg(long, conflicts_with = "chunks")]
    pub articles: bool,

    /// Show the chunk records as JSON
    #[arg(long)]
    pub chunks: bool,
}

impl InspectCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing inspect command for {:?}", self.file);

        let inspection = lexchunk_ingest::inspect(&self.file, config)?;

        if self.articles {
            println!(
                "{:<8} {:>6} {:>7} {:<5} TITLE",
                "ARTICLE", "BLOCKS", "CHARS", "TABLE"
            );
            for article in &inspection.articles {
                let title = match (&article.section_title, &article.article_title) {
                    (Some(section), Some(title)) => format!("{title} [{section}]"),
                    (None, Some(title)) => title.clone(),
                    (Some(section), None) => format!("[{section}]"),
                    (None, None) => String::new(),
                };
                println!(
                    "{:<8} {:>6} {:>7} {:<5} {}",
                    article.article_number,
                    article.block_count,
                    article.char_count,
                    if article.contains_table { "yes" } else { "no" },
                    title
                );
            }
            println!();
            println!(
                "{} articles, {} chunks kept, {} dropped",
                inspection.articles.len(),
                inspection.chunks.len(),
                inspection.dropped
            );
        } else if self.chunks {
            println!("{}", serde_json::to_string_pretty(&inspection.chunks)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&inspection.document)?);
        }

        Ok(())
    }
}
