//! Structure recovery and article chunking for regulatory documents.
//!
//! Turns Word-exported HTML into size-bounded, citation-ready chunks and
//! hands them to a [`ChunkSink`].

pub mod boundary;
pub mod chunk;
pub mod extract;
pub mod manifest;
pub mod normalize;
pub mod progress;
pub mod sink;
pub mod sources;
pub mod text;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use boundary::detect_article_boundary;
pub use chunk::{ChunkConfig, ChunkPipeline, ChunkRecord, DocumentChunks};
pub use progress::{ProgressEvent, ProgressReporter};
pub use sink::{ChunkSink, JsonlSink, MemorySink};
pub use types::{
    Article, Block, Chunk, IngestOptions, IngestStats, ManifestStats, SourceEntry,
    StructuredDocument,
};

use chrono::Utc;
use futures::stream::{self, StreamExt};
use lexchunk_core::{AppConfig, AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// One source after a successful pass through the pipeline.
struct ProcessedSource {
    source: String,
    byte_count: u64,
    document: StructuredDocument,
    output: DocumentChunks,
}

/// Ingest markup sources and hand their chunks to `sink`.
///
/// Documents are chunked on blocking workers, at most `config.concurrency`
/// at a time, and written in discovery order. Unreadable or empty sources
/// are counted and skipped; sink and manifest failures abort the run.
///
/// Per source, the structure dump is written first, then the records are
/// written and flushed, and only then is the manifest entry appended.
pub async fn ingest<S: ChunkSink>(
    options: IngestOptions,
    config: &AppConfig,
    sink: &mut S,
    progress: &ProgressReporter,
) -> AppResult<IngestStats> {
    let start = Instant::now();
    let output_dir = config.output_path();

    tracing::info!("Starting ingest into {:?}", output_dir);

    if options.reset {
        manifest::reset(&output_dir)?;
    }

    let discovered = sources::discover_sources(&options.paths, &options.include, &options.exclude);
    progress.discover(
        discovered.len() as u64,
        &format!("{} input path(s)", options.paths.len()),
    );

    let indexed = manifest::indexed_sources(&output_dir)?;
    let mut stats = IngestStats {
        sources_seen: discovered.len() as u32,
        ..Default::default()
    };

    let pending: Vec<PathBuf> = discovered
        .into_iter()
        .filter(|path| match sources::source_name(path) {
            Ok(name) if indexed.contains(&name) => {
                tracing::debug!("Skipping already ingested source {}", name);
                stats.sources_skipped += 1;
                false
            }
            _ => true,
        })
        .collect();

    let total = pending.len() as u64;
    let pipeline = Arc::new(ChunkPipeline::new(ChunkConfig::from(config)));
    let concurrency = config.concurrency.max(1);

    let mut results = stream::iter(pending)
        .map(|path| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                let worker_path = path.clone();
                let joined =
                    tokio::task::spawn_blocking(move || process_source(&pipeline, &worker_path))
                        .await;
                let result = joined.unwrap_or_else(|e| {
                    Err(AppError::Ingest(format!("Worker for {:?} failed: {}", path, e)))
                });
                (path, result)
            }
        })
        .buffered(concurrency);

    let mut current = 0u64;
    while let Some((path, result)) = results.next().await {
        current += 1;
        let processed = match result {
            Ok(processed) => processed,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
                stats.sources_failed += 1;
                continue;
            }
        };
        progress.extract(current, total, &processed.source);
        progress.chunk(current, total, processed.output.chunks.len());

        let ProcessedSource {
            source,
            byte_count,
            document,
            output,
        } = processed;

        if options.dump_structure {
            manifest::write_structure(&output_dir, &document)?;
        }

        // Records must be on disk before the manifest marks the source as ingested.
        let records: Vec<ChunkRecord> = output.chunks.into_iter().map(ChunkRecord::from).collect();
        sink.write_chunks(&source, &records)?;
        sink.flush()?;
        progress.write(current, total, records.len());

        manifest::append_source(
            &output_dir,
            &SourceEntry {
                source,
                document_title: document.document_title,
                chunk_count: records.len() as u32,
                byte_count,
                indexed_at: Utc::now(),
            },
        )?;

        stats.sources_processed += 1;
        stats.chunks_written += records.len() as u32;
        stats.chunks_dropped += output.dropped as u32;
        stats.bytes_processed += byte_count;
    }

    sink.flush()?;
    stats.duration_secs = start.elapsed().as_secs_f64();

    tracing::info!(
        "Ingest completed: {} processed, {} skipped, {} failed, {} chunks ({} dropped), {} bytes in {:.2}s",
        stats.sources_processed,
        stats.sources_skipped,
        stats.sources_failed,
        stats.chunks_written,
        stats.chunks_dropped,
        stats.bytes_processed,
        stats.duration_secs
    );

    Ok(stats)
}

/// Read and chunk a single source file.
fn process_source(pipeline: &ChunkPipeline, path: &Path) -> AppResult<ProcessedSource> {
    tracing::debug!("Processing file: {:?}", path);

    let source = sources::read_source(path)?;
    let (document, output) = pipeline.run(&source.source, &source.markup)?;

    Ok(ProcessedSource {
        source: source.source,
        byte_count: source.byte_count,
        document,
        output,
    })
}

/// Per-article overview produced by [`inspect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSummary {
    pub article_number: String,
    pub article_title: Option<String>,
    pub section_title: Option<String>,
    pub block_count: usize,
    /// Serialized length in characters
    pub char_count: usize,
    pub contains_table: bool,
}

/// Everything the pipeline derives from one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inspection {
    pub document: StructuredDocument,
    pub articles: Vec<ArticleSummary>,
    pub chunks: Vec<ChunkRecord>,
    pub dropped: usize,
}

/// Run the pipeline over one file without writing anything.
pub fn inspect(path: &Path, config: &AppConfig) -> AppResult<Inspection> {
    let pipeline = ChunkPipeline::new(ChunkConfig::from(config));
    let source = sources::read_source(path)?;
    let document = pipeline.structure_document(&source.source, &source.markup)?;

    let articles = chunk::group_articles(document.clone())
        .iter()
        .map(|article| ArticleSummary {
            article_number: article.article_number.clone(),
            article_title: article.article_title.clone(),
            section_title: article.section_title.clone(),
            block_count: article.blocks.len(),
            char_count: text::char_len(&chunk::serialize_article(article)),
            contains_table: article.contains_table(),
        })
        .collect();

    let output = pipeline.process(document.clone());

    Ok(Inspection {
        document,
        articles,
        chunks: output.chunks.into_iter().map(ChunkRecord::from).collect(),
        dropped: output.dropped,
    })
}

/// Summarize what has been ingested into the configured output directory.
pub fn stats(config: &AppConfig) -> AppResult<ManifestStats> {
    let output_dir = config.output_path();
    tracing::info!("Getting ingest stats for {:?}", output_dir);
    manifest::manifest_stats(&output_dir)
}
