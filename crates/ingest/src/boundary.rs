//! Article boundary detection.
//!
//! The single rule deciding whether a block opens a new article. The
//! normalizer emits table-derived articles as headings in exactly the shape
//! this rule recognizes, and the grouper splits on it.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::Block;

static ARTICLE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Article\s+(\d+[A-Za-z]?)").unwrap());

/// Return the article number if `block` is a heading naming an article.
///
/// Non-heading blocks never open an article, even if their text mentions one.
pub fn detect_article_boundary(block: &Block) -> Option<String> {
    match block {
        Block::Heading { text, .. } => article_number(text),
        Block::Paragraph { .. } | Block::Table { .. } | Block::List { .. } => None,
    }
}

/// Article number named anywhere in `text`.
pub fn article_number(text: &str) -> Option<String> {
    ARTICLE_MARKER_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_with_dash_title() {
        let block = Block::heading(3, "Article 7 – Fees");
        assert_eq!(detect_article_boundary(&block), Some("7".to_string()));
    }

    #[test]
    fn test_heading_with_letter_suffix() {
        let block = Block::heading(3, "Article 7B: Late Fees");
        assert_eq!(detect_article_boundary(&block), Some("7B".to_string()));
    }

    #[test]
    fn test_case_insensitive() {
        let block = Block::heading(2, "ARTICLE 12 DEFINITIONS");
        assert_eq!(detect_article_boundary(&block), Some("12".to_string()));
    }

    #[test]
    fn test_paragraph_is_never_a_boundary() {
        let block = Block::paragraph("Article 3 applies to all students.");
        assert_eq!(detect_article_boundary(&block), None);
    }

    #[test]
    fn test_heading_without_number() {
        let block = Block::heading(2, "Articles of Association");
        assert_eq!(detect_article_boundary(&block), None);
    }
}
