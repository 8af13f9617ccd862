//! Document chunking pipeline orchestrator.

use super::filter::GarbageFilter;
use super::grouper::group_articles;
use super::splitter::ArticleSplitter;
use crate::extract::{extract_blocks, TitleDetector};
use crate::normalize::normalize_blocks;
use crate::types::{Chunk, StructuredDocument};
use lexchunk_core::config::{DEFAULT_MAX_CHUNK_SIZE, DEFAULT_MIN_CHUNK_SIZE};
use lexchunk_core::{AppConfig, AppError, AppResult};

/// Size thresholds for splitting and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkConfig {
    /// Maximum serialized chunk size in characters
    pub max_chunk_size: usize,

    /// Minimum chunk size kept by the garbage filter (inclusive)
    pub min_chunk_size: usize,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_MAX_CHUNK_SIZE,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
        }
    }
}

impl From<&AppConfig> for ChunkConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_chunk_size: config.max_chunk_size,
            min_chunk_size: config.min_chunk_size,
        }
    }
}

/// Chunks produced for one document.
#[derive(Debug, Clone, Default)]
pub struct DocumentChunks {
    /// Number of articles the document was grouped into
    pub article_count: usize,

    /// Chunks surviving the garbage filter
    pub chunks: Vec<Chunk>,

    /// Chunks dropped as too short
    pub dropped: usize,
}

/// Markup to chunks: extract, normalize, group, split, filter.
#[derive(Debug, Clone)]
pub struct ChunkPipeline {
    config: ChunkConfig,
    titles: TitleDetector,
}

impl ChunkPipeline {
    /// Create a new pipeline with configuration.
    pub fn new(config: ChunkConfig) -> Self {
        Self {
            config,
            titles: TitleDetector::default(),
        }
    }

    /// Replace the title detector, e.g. to ignore other institution names.
    pub fn with_title_detector(mut self, titles: TitleDetector) -> Self {
        self.titles = titles;
        self
    }

    /// Recover the structured document from raw markup.
    ///
    /// Fails with [`AppError::Extraction`] when the markup yields no blocks.
    pub fn structure_document(&self, source: &str, markup: &str) -> AppResult<StructuredDocument> {
        let raw = extract_blocks(markup);
        if raw.is_empty() {
            return Err(AppError::Extraction(format!(
                "no content blocks extracted from {source}"
            )));
        }

        let blocks = normalize_blocks(raw);
        let document_title = self.titles.detect(&blocks);
        let doc = StructuredDocument {
            source: source.to_string(),
            document_title,
            blocks,
        };

        let (headings, paragraphs, tables, lists) = doc.block_counts();
        tracing::info!(
            source = %doc.source,
            headings,
            paragraphs,
            tables,
            lists,
            "Structured document: {}",
            doc.document_title.as_deref().unwrap_or("(untitled)")
        );

        Ok(doc)
    }

    /// Group, split and filter a structured document.
    pub fn process(&self, doc: StructuredDocument) -> DocumentChunks {
        let source = doc.source.clone();
        let articles = group_articles(doc);
        let splitter = ArticleSplitter::new(self.config.max_chunk_size);
        let chunks: Vec<Chunk> = articles.iter().flat_map(|a| splitter.split(a)).collect();
        let produced = chunks.len();

        let (chunks, dropped) = GarbageFilter::new(self.config.min_chunk_size).filter(chunks);

        tracing::info!(
            source = %source,
            "Chunking complete: {} articles, {} chunks, {} after filtering",
            articles.len(),
            produced,
            chunks.len()
        );

        DocumentChunks {
            article_count: articles.len(),
            chunks,
            dropped,
        }
    }

    /// Full pass over one document's markup.
    pub fn run(&self, source: &str, markup: &str) -> AppResult<(StructuredDocument, DocumentChunks)> {
        let doc = self.structure_document(source, markup)?;
        let chunks = self.process(doc.clone());
        Ok((doc, chunks))
    }
}
