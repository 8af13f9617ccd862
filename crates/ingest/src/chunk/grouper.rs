//! Article grouping over a normalized block stream.

use regex::Regex;
use std::sync::LazyLock;

use crate::boundary::detect_article_boundary;
use crate::types::{Article, Block, StructuredDocument};

static SECTION_HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([IVX]+\.?\s+.+)$").unwrap());
static ARTICLE_TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Article\s+\d+[A-Za-z]?\s*[:\-–]?\s*(.+)").unwrap());

/// Article number of the synthetic article holding pre-article blocks.
pub const PREAMBLE_NUMBER: &str = "0";
pub const PREAMBLE_TITLE: &str = "Preamble";

const MIN_TITLE_CHARS: usize = 3;

/// Partition a document into articles at each article boundary.
///
/// Level-1 Roman-numeral headings only update the section context and are
/// not kept as content. Blocks before the first boundary become a leading
/// "Preamble" article numbered "0".
pub fn group_articles(doc: StructuredDocument) -> Vec<Article> {
    let StructuredDocument {
        source,
        document_title,
        blocks,
    } = doc;

    let mut articles: Vec<Article> = Vec::new();
    let mut current: Option<Article> = None;
    let mut section: Option<String> = None;
    let mut preamble: Vec<Block> = Vec::new();

    for block in blocks {
        if let Block::Heading { level: 1, text } = &block {
            if SECTION_HEADING_RE.is_match(text) {
                section = Some(text.clone());
                continue;
            }
        }

        if let Some(number) = detect_article_boundary(&block) {
            articles.extend(current.take());
            current = Some(Article {
                article_number: number,
                article_title: heading_title(&block),
                blocks: Vec::new(),
                source: source.clone(),
                document_title: document_title.clone(),
                section_title: section.clone(),
            });
            continue;
        }

        match current.as_mut() {
            Some(article) => article.blocks.push(block),
            None => preamble.push(block),
        }
    }
    articles.extend(current);

    if !preamble.is_empty() {
        articles.insert(
            0,
            Article {
                article_number: PREAMBLE_NUMBER.to_string(),
                article_title: Some(PREAMBLE_TITLE.to_string()),
                blocks: preamble,
                source,
                document_title,
                section_title: None,
            },
        );
    }

    articles
}

/// Title following the article number in a boundary heading.
fn heading_title(block: &Block) -> Option<String> {
    let Block::Heading { text, .. } = block else {
        return None;
    };

    ARTICLE_TITLE_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| title.chars().count() >= MIN_TITLE_CHARS)
}
