//! Block normalization.
//!
//! Recovers structure that the markup misrepresents: bold paragraphs that are
//! really headings, and layout tables that are really articles and clauses.
//! Headings, lists and already-correct blocks pass through unchanged, so a
//! second pass over normalized output is a no-op, with one exception: the
//! body of a table article row is emitted as a paragraph without heading
//! promotion, so a short all-caps body becomes a heading on a second pass.

mod heading;
mod table;

pub use heading::{pseudo_heading_level, HeadingRule, HEADING_RULES};
pub use table::{is_pure_data_table, normalize_table};

use crate::types::Block;

/// Normalize a whole block sequence, preserving order.
pub fn normalize_blocks(blocks: Vec<Block>) -> Vec<Block> {
    let input_len = blocks.len();
    let normalized: Vec<Block> = blocks.into_iter().flat_map(normalize_block).collect();

    tracing::trace!(
        "Normalized {} blocks into {} blocks",
        input_len,
        normalized.len()
    );
    normalized
}

/// Normalize one block into the zero or more blocks it stands for.
pub fn normalize_block(block: Block) -> Vec<Block> {
    match block {
        Block::Paragraph { text } => match pseudo_heading_level(&text) {
            Some(level) => vec![Block::heading(level, text)],
            None => vec![Block::paragraph(text)],
        },
        Block::Table { rows, has_header } => normalize_table(rows, has_header),
        heading @ Block::Heading { .. } => vec![heading],
        list @ Block::List { .. } => vec![list],
    }
}
