//! Article chunking pipeline.
//!
//! This module turns a normalized [`StructuredDocument`](crate::types::StructuredDocument)
//! into finished chunks:
//! - groups blocks into articles at article boundaries
//! - serializes each article with a repeatable header
//! - splits oversized articles between blocks only
//! - drops chunks below the minimum useful size

mod filter;
mod grouper;
mod metadata;
mod pipeline;
mod serializer;
mod splitter;

pub use filter::GarbageFilter;
pub use grouper::{group_articles, PREAMBLE_NUMBER, PREAMBLE_TITLE};
pub use metadata::{calculate_hash, format_source_name, ChunkRecord, DocumentType, RecordMetadata};
pub use pipeline::{ChunkConfig, ChunkPipeline, DocumentChunks};
pub use serializer::{article_header, render_list, render_table, serialize_article};
pub use splitter::{block_size, ArticleSplitter};
