//! Size-bounded article splitting.
//!
//! Articles are split only between blocks. A block is never cut, so a single
//! table or paragraph larger than the maximum travels alone in an oversized
//! chunk.

use super::serializer::{article_header, render_list, render_table, serialize_article};
use crate::text::char_len;
use crate::types::{Article, Block, Chunk};

/// Separator allowance for paragraphs, tables and lists.
const BLOCK_SEPARATOR_CHARS: usize = 2;
/// `## ` prefix plus separator for sub-headings.
const HEADING_OVERHEAD_CHARS: usize = 5;

/// Splits serialized articles into chunks no larger than `max_chunk_size`
/// wherever block boundaries allow.
#[derive(Debug, Clone)]
pub struct ArticleSplitter {
    max_chunk_size: usize,
}

impl ArticleSplitter {
    pub fn new(max_chunk_size: usize) -> Self {
        Self { max_chunk_size }
    }

    /// Split one article, repeating its header in every chunk.
    pub fn split(&self, article: &Article) -> Vec<Chunk> {
        let full_text = serialize_article(article);
        if char_len(&full_text) <= self.max_chunk_size {
            return vec![make_chunk(article, full_text, 0, 1, article.contains_table())];
        }

        let groups = self.group_blocks(article);
        let total = groups.len();
        tracing::debug!(
            "Article {} of {} split into {} chunks",
            article.article_number,
            article.source,
            total
        );

        groups
            .into_iter()
            .enumerate()
            .map(|(idx, group)| {
                let part = article.with_blocks(group);
                let text = serialize_article(&part);
                make_chunk(article, text, idx, total, part.contains_table())
            })
            .collect()
    }

    /// Greedy block grouping against the header-inclusive size budget.
    fn group_blocks(&self, article: &Article) -> Vec<Vec<Block>> {
        let header_size = char_len(&article_header(article));
        let mut groups = Vec::new();
        let mut current: Vec<Block> = Vec::new();
        let mut current_size = 0;

        for block in &article.blocks {
            let size = block_size(block);
            if header_size + current_size + size > self.max_chunk_size && !current.is_empty() {
                groups.push(std::mem::take(&mut current));
                current_size = 0;
            }
            current.push(block.clone());
            current_size += size;
        }

        if !current.is_empty() {
            groups.push(current);
        }
        if groups.is_empty() {
            // Header alone over budget; keep the article as a single empty-bodied group.
            groups.push(Vec::new());
        }
        groups
    }
}

/// Serialized size estimate of one body block.
pub fn block_size(block: &Block) -> usize {
    match block {
        Block::Paragraph { text } => char_len(text) + BLOCK_SEPARATOR_CHARS,
        Block::Table { rows, has_header } => {
            char_len(&render_table(rows, *has_header)) + BLOCK_SEPARATOR_CHARS
        }
        Block::List { items, ordered } => {
            char_len(&render_list(items, *ordered)) + BLOCK_SEPARATOR_CHARS
        }
        Block::Heading { text, .. } => char_len(text) + HEADING_OVERHEAD_CHARS,
    }
}

fn make_chunk(
    article: &Article,
    text: String,
    chunk_index: usize,
    total_chunks: usize,
    contains_table: bool,
) -> Chunk {
    Chunk {
        text,
        article_number: article.article_number.clone(),
        article_title: article.article_title.clone(),
        source: article.source.clone(),
        document_title: article.document_title.clone(),
        section_title: article.section_title.clone(),
        chunk_index,
        total_chunks,
        contains_table,
    }
}
