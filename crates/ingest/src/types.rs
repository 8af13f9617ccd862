//! Document model and ingestion type definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One structural unit of a document.
///
/// Serialized with an internal `type` tag so structure dumps read as
/// `{"type": "heading", "level": 2, "text": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Heading {
        level: u8,
        text: String,
    },
    Paragraph {
        text: String,
    },
    Table {
        rows: Vec<Vec<String>>,
        has_header: bool,
    },
    List {
        items: Vec<String>,
        ordered: bool,
    },
}

impl Block {
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Block::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    pub fn table(rows: Vec<Vec<String>>, has_header: bool) -> Self {
        Block::Table { rows, has_header }
    }

    pub fn list(items: Vec<String>, ordered: bool) -> Self {
        Block::List { items, ordered }
    }

    /// Short name of the variant, used in logs and summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::Table { .. } => "table",
            Block::List { .. } => "list",
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Block::Table { .. })
    }
}

/// A parsed source document with its recovered block structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Source identifier (filename or URL tail)
    pub source: String,

    /// Inferred document title
    pub document_title: Option<String>,

    /// Normalized blocks in document order
    pub blocks: Vec<Block>,
}

impl StructuredDocument {
    /// Count blocks per variant: (headings, paragraphs, tables, lists).
    pub fn block_counts(&self) -> (usize, usize, usize, usize) {
        self.blocks
            .iter()
            .fold((0, 0, 0, 0), |(h, p, t, l), block| match block {
                Block::Heading { .. } => (h + 1, p, t, l),
                Block::Paragraph { .. } => (h, p + 1, t, l),
                Block::Table { .. } => (h, p, t + 1, l),
                Block::List { .. } => (h, p, t, l + 1),
            })
    }
}

/// A numbered clause of a regulation, the primary citation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Article number ("0" for the preamble, may carry a letter suffix like "1A")
    pub article_number: String,

    pub article_title: Option<String>,

    /// Body blocks
    pub blocks: Vec<Block>,

    pub source: String,

    pub document_title: Option<String>,

    /// Enclosing section heading, e.g. "I. GENERAL PROVISIONS"
    pub section_title: Option<String>,
}

impl Article {
    pub fn contains_table(&self) -> bool {
        self.blocks.iter().any(Block::is_table)
    }

    /// Copy of this article's identity carrying a different body.
    pub fn with_blocks(&self, blocks: Vec<Block>) -> Self {
        Self {
            article_number: self.article_number.clone(),
            article_title: self.article_title.clone(),
            blocks,
            source: self.source.clone(),
            document_title: self.document_title.clone(),
            section_title: self.section_title.clone(),
        }
    }
}

/// A finished, header-bearing unit of text ready for embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Serialized text including the article header
    pub text: String,
    pub article_number: String,
    pub article_title: Option<String>,
    pub source: String,
    pub document_title: Option<String>,
    pub section_title: Option<String>,

    /// Position within the article's split (0-indexed)
    pub chunk_index: usize,

    /// Number of chunks the article was split into
    pub total_chunks: usize,

    pub contains_table: bool,
}

/// Options for the ingest operation.
#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    /// Files or directories to ingest
    pub paths: Vec<PathBuf>,

    /// Include patterns (substring)
    pub include: Vec<String>,

    /// Exclude patterns (substring)
    pub exclude: Vec<String>,

    /// Truncate the manifest and chunk output before ingesting
    pub reset: bool,

    /// Write per-document structure dumps next to the chunk output
    pub dump_structure: bool,
}

/// Statistics from an ingest operation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Sources discovered on disk
    pub sources_seen: u32,

    /// Sources chunked and handed to the sink
    pub sources_processed: u32,

    /// Sources skipped because the manifest already lists them
    pub sources_skipped: u32,

    /// Sources that could not be read or yielded no blocks
    pub sources_failed: u32,

    pub chunks_written: u32,

    /// Chunks discarded by the garbage filter
    pub chunks_dropped: u32,

    pub bytes_processed: u64,

    pub duration_secs: f64,
}

/// A processed source as recorded in `sources.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub source: String,

    pub document_title: Option<String>,

    pub chunk_count: u32,

    pub byte_count: u64,

    pub indexed_at: DateTime<Utc>,
}

/// Summary of an output directory's manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestStats {
    pub sources_count: u32,

    pub chunks_count: u32,

    pub bytes_processed: u64,

    pub last_ingest_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_serialization_is_tagged() {
        let block = Block::heading(2, "PART I");
        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["type"], "heading");
        assert_eq!(json["level"], 2);
        assert_eq!(json["text"], "PART I");

        let table = Block::table(vec![vec!["Grade".into(), "Coefficient".into()]], true);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["type"], "table");
        assert_eq!(json["has_header"], true);
        assert_eq!(json["rows"][0][1], "Coefficient");
    }

    #[test]
    fn test_block_counts() {
        let doc = StructuredDocument {
            source: "rules.htm".to_string(),
            document_title: None,
            blocks: vec![
                Block::heading(1, "RULES"),
                Block::paragraph("one"),
                Block::paragraph("two"),
                Block::list(vec!["a".into()], false),
            ],
        };
        assert_eq!(doc.block_counts(), (1, 2, 0, 1));
    }

    #[test]
    fn test_with_blocks_keeps_identity() {
        let article = Article {
            article_number: "4A".to_string(),
            article_title: Some("Fees".to_string()),
            blocks: vec![Block::paragraph("x")],
            source: "fees.htm".to_string(),
            document_title: Some("Tuition Rules".to_string()),
            section_title: Some("II. FEES".to_string()),
        };
        let part = article.with_blocks(vec![Block::table(vec![], false)]);
        assert_eq!(part.article_number, "4A");
        assert_eq!(part.section_title.as_deref(), Some("II. FEES"));
        assert!(part.contains_table());
        assert!(!article.contains_table());
    }
}
