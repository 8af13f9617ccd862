//! Minimum-size chunk filter.

use crate::text::char_len;
use crate::types::Chunk;

/// Drops chunks too short to be useful for retrieval.
#[derive(Debug, Clone)]
pub struct GarbageFilter {
    min_chunk_size: usize,
}

impl GarbageFilter {
    pub fn new(min_chunk_size: usize) -> Self {
        Self { min_chunk_size }
    }

    /// Whether a chunk meets the minimum length (inclusive).
    pub fn keeps(&self, chunk: &Chunk) -> bool {
        char_len(&chunk.text) >= self.min_chunk_size
    }

    /// Keep usable chunks; returns them with the number dropped.
    pub fn filter(&self, chunks: Vec<Chunk>) -> (Vec<Chunk>, usize) {
        let before = chunks.len();
        let kept: Vec<Chunk> = chunks
            .into_iter()
            .filter(|chunk| {
                let keep = self.keeps(chunk);
                if !keep {
                    tracing::debug!(
                        "Dropped {} char chunk {}/{} of article {} in {}",
                        char_len(&chunk.text),
                        chunk.chunk_index + 1,
                        chunk.total_chunks,
                        chunk.article_number,
                        chunk.source
                    );
                }
                keep
            })
            .collect();

        let dropped = before - kept.len();
        if dropped > 0 {
            tracing::info!(
                "Dropped {} chunks under {} chars",
                dropped,
                self.min_chunk_size
            );
        }
        (kept, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_of_len(len: usize) -> Chunk {
        Chunk {
            text: "x".repeat(len),
            article_number: "1".to_string(),
            article_title: None,
            source: "rules.htm".to_string(),
            document_title: None,
            section_title: None,
            chunk_index: 0,
            total_chunks: 1,
            contains_table: false,
        }
    }

    #[test]
    fn test_boundary_is_inclusive() {
        let filter = GarbageFilter::new(150);
        let (kept, dropped) = filter.filter(vec![chunk_of_len(149), chunk_of_len(150)]);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 1);
        assert_eq!(char_len(&kept[0].text), 150);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let mut chunk = chunk_of_len(0);
        chunk.text = "ş".repeat(150);
        assert!(GarbageFilter::new(150).keeps(&chunk));
        assert!(chunk.text.len() > 150);
    }
}
