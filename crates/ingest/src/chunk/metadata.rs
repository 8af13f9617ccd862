//! Hand-off records and citation metadata for finished chunks.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::types::Chunk;

/// Kind of regulatory document, inferred from the source name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Statute,
    Regulation,
    Rules,
    Principles,
    Bylaw,
}

impl DocumentType {
    /// Infer from filename keywords; regulation when nothing matches.
    pub fn from_source(source: &str) -> Self {
        let lower = source.to_lowercase();
        if lower.contains("statute") {
            Self::Statute
        } else if lower.contains("regulation") {
            Self::Regulation
        } else if lower.contains("rules") {
            Self::Rules
        } else if lower.contains("principle") {
            Self::Principles
        } else if lower.contains("bylaw") {
            Self::Bylaw
        } else {
            Self::Regulation
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Statute => "statute",
            Self::Regulation => "regulation",
            Self::Rules => "rules",
            Self::Principles => "principles",
            Self::Bylaw => "bylaw",
        }
    }

    /// Capitalized label used in citations.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Statute => "Statute",
            Self::Regulation => "Regulation",
            Self::Rules => "Rules",
            Self::Principles => "Principles",
            Self::Bylaw => "Bylaw",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata attached to each record for the indexing collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordMetadata {
    pub source: String,
    pub article_number: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub contains_table: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_title: Option<String>,

    /// "Article {n}: {title}" or "Article {n}"
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,

    #[serde(rename = "type")]
    pub doc_type: DocumentType,

    /// SHA-256 of the chunk text
    pub content_hash: String,
}

/// A chunk as handed to a sink: stable id, text and metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// `{source}_{article_number}_{chunk_index}`
    pub id: String,
    pub text: String,
    pub metadata: RecordMetadata,
}

impl From<Chunk> for ChunkRecord {
    fn from(chunk: Chunk) -> Self {
        let id = format!(
            "{}_{}_{}",
            chunk.source, chunk.article_number, chunk.chunk_index
        );
        let title = match &chunk.article_title {
            Some(title) => format!("Article {}: {}", chunk.article_number, title),
            None => format!("Article {}", chunk.article_number),
        };
        let content_hash = calculate_hash(&chunk.text);
        let doc_type = DocumentType::from_source(&chunk.source);

        Self {
            id,
            metadata: RecordMetadata {
                source: chunk.source,
                article_number: chunk.article_number,
                chunk_index: chunk.chunk_index,
                total_chunks: chunk.total_chunks,
                contains_table: chunk.contains_table,
                article_title: chunk.article_title,
                title,
                document_title: chunk.document_title,
                section_title: chunk.section_title,
                doc_type,
                content_hash,
            },
            text: chunk.text,
        }
    }
}

impl ChunkRecord {
    /// Human-readable citation for retrieval results.
    pub fn citation(&self) -> String {
        let meta = &self.metadata;
        if meta.article_number == super::grouper::PREAMBLE_NUMBER {
            return meta
                .document_title
                .clone()
                .unwrap_or_else(|| format_source_name(&meta.source));
        }
        match &meta.article_title {
            Some(title) => format!("Article {}: {}", meta.article_number, title),
            None => format!("{} - Article {}", meta.doc_type.label(), meta.article_number),
        }
    }
}

/// Readable name from a source filename, e.g. `exam-rules_2019.htm` -> "Exam Rules".
pub fn format_source_name(source: &str) -> String {
    let stem = source
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(source)
        .replace("%20", " ");

    let words: Vec<String> = stem
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|part| !part.is_empty() && !part.chars().all(|c| c.is_ascii_digit()))
        .map(capitalize)
        .collect();

    if words.is_empty() {
        stem
    } else {
        words.join(" ")
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Calculate SHA-256 hash of text.
pub fn calculate_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(number: &str, title: Option<&str>) -> Chunk {
        Chunk {
            text: "Article 5 – Leave\nSource: Student%20Rules.htm\n\nText.".to_string(),
            article_number: number.to_string(),
            article_title: title.map(str::to_string),
            source: "Student%20Rules.htm".to_string(),
            document_title: None,
            section_title: None,
            chunk_index: 1,
            total_chunks: 2,
            contains_table: false,
        }
    }

    #[test]
    fn test_calculate_hash() {
        let hash = calculate_hash("Hello, world!");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, calculate_hash("Hello, world!"));
        assert_ne!(hash, calculate_hash("Different text"));
    }

    #[test]
    fn test_document_type_order() {
        assert_eq!(DocumentType::from_source("STATUTE-rules.htm"), DocumentType::Statute);
        assert_eq!(DocumentType::from_source("regulation_rules.htm"), DocumentType::Regulation);
        assert_eq!(DocumentType::from_source("exam-rules.htm"), DocumentType::Rules);
        assert_eq!(DocumentType::from_source("Principles.htm"), DocumentType::Principles);
        assert_eq!(DocumentType::from_source("club-bylaw.htm"), DocumentType::Bylaw);
        assert_eq!(DocumentType::from_source("handbook.htm"), DocumentType::Regulation);
    }

    #[test]
    fn test_record_from_chunk() {
        let record = ChunkRecord::from(chunk("5", Some("Leave")));
        assert_eq!(record.id, "Student%20Rules.htm_5_1");
        assert_eq!(record.metadata.title, "Article 5: Leave");
        assert_eq!(record.metadata.doc_type, DocumentType::Rules);
        assert_eq!(record.metadata.content_hash, calculate_hash(&record.text));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["metadata"]["type"], "rules");
        assert!(json["metadata"].get("section_title").is_none());
    }

    #[test]
    fn test_citations() {
        assert_eq!(ChunkRecord::from(chunk("5", Some("Leave"))).citation(), "Article 5: Leave");
        assert_eq!(ChunkRecord::from(chunk("5", None)).citation(), "Rules - Article 5");
        assert_eq!(
            ChunkRecord::from(chunk("0", Some("Preamble"))).citation(),
            "Student Rules"
        );
    }

    #[test]
    fn test_format_source_name() {
        assert_eq!(format_source_name("exam-rules_2019.htm"), "Exam Rules");
        assert_eq!(format_source_name("2019.htm"), "2019");
    }
}
