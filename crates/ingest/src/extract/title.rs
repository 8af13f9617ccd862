//! Document title inference over normalized blocks.

use regex::Regex;
use std::sync::LazyLock;

use crate::text::{char_len, uppercase_ratio};
use crate::types::Block;

/// Bilingual notices that sit at the top of translated regulations.
static DISCLAIMER_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"in the event of.*absence.*mutual agreement",
        r"turkish version.*regulations.*valid",
        r"english version.*these regulations",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

static SECTION_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[IVX]+\.\s+").unwrap());

const TITLE_KEYWORDS: &[&str] = &[
    "regulation", "rules", "principles", "by-law", "bylaw", "code", "statute",
];

const TITLE_PHRASES: &[&str] = &["regulation for", "regulations for", "rules for"];

const MAX_TITLE_CHARS: usize = 100;

/// Picks the most plausible document title from a block sequence.
#[derive(Debug, Clone)]
pub struct TitleDetector {
    /// Institution names that head every page and never title a document
    ignored_names: Vec<String>,
}

impl Default for TitleDetector {
    fn default() -> Self {
        Self::new([
            "EASTERN MEDITERRANEAN UNIVERSITY",
            "EASTERN MEDITERRANEAN UNIVERISTY",
        ])
    }
}

impl TitleDetector {
    pub fn new<I, S>(ignored_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ignored_names: ignored_names
                .into_iter()
                .map(|name| name.into().trim().to_uppercase())
                .collect(),
        }
    }

    /// Infer a title, or `None` when nothing qualifies.
    ///
    /// Candidates are tried in priority order: an explicit "Regulations for
    /// ..." paragraph, a keyword-bearing top-level heading, any top-level
    /// heading, and finally an all-caps keyword paragraph.
    pub fn detect(&self, blocks: &[Block]) -> Option<String> {
        self.phrase_paragraph(blocks)
            .or_else(|| self.top_heading(blocks, true))
            .or_else(|| self.top_heading(blocks, false))
            .or_else(|| self.caps_paragraph(blocks))
    }

    fn phrase_paragraph(&self, blocks: &[Block]) -> Option<String> {
        paragraphs(blocks)
            .filter(|text| !is_disclaimer(text) && char_len(text) < MAX_TITLE_CHARS)
            .find(|text| {
                let lower = text.to_lowercase();
                TITLE_PHRASES.iter().any(|phrase| lower.contains(phrase))
            })
            .map(str::to_string)
    }

    fn top_heading(&self, blocks: &[Block], require_keyword: bool) -> Option<String> {
        blocks
            .iter()
            .filter_map(|block| match block {
                Block::Heading { level, text } if *level <= 2 => Some(text.as_str()),
                _ => None,
            })
            .filter(|text| !is_disclaimer(text) && !SECTION_HEADER_RE.is_match(text.trim()))
            .filter(|text| !self.is_ignored_name(text))
            .find(|text| !require_keyword || has_title_keyword(text))
            .map(str::to_string)
    }

    fn caps_paragraph(&self, blocks: &[Block]) -> Option<String> {
        paragraphs(blocks)
            .filter(|text| !is_disclaimer(text) && char_len(text) < MAX_TITLE_CHARS)
            .find(|text| {
                uppercase_ratio(text).is_some_and(|ratio| ratio > 0.7) && has_title_keyword(text)
            })
            .map(str::to_string)
    }

    fn is_ignored_name(&self, text: &str) -> bool {
        let upper = text.trim().to_uppercase();
        self.ignored_names.iter().any(|name| *name == upper)
    }
}

fn paragraphs(blocks: &[Block]) -> impl Iterator<Item = &str> {
    blocks.iter().filter_map(|block| match block {
        Block::Paragraph { text } => Some(text.trim()),
        _ => None,
    })
}

fn is_disclaimer(text: &str) -> bool {
    let lower = text.to_lowercase();
    DISCLAIMER_RES.iter().any(|re| re.is_match(&lower))
}

fn has_title_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    TITLE_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_paragraph_wins() {
        let blocks = vec![
            Block::heading(1, "STUDENT DISCIPLINARY RULES"),
            Block::paragraph("Regulations for Summer Semester"),
        ];
        assert_eq!(
            TitleDetector::default().detect(&blocks),
            Some("Regulations for Summer Semester".to_string())
        );
    }

    #[test]
    fn test_disclaimer_skipped() {
        let blocks = vec![
            Block::paragraph(
                "In the event of any absence of mutual agreement, the rules for Turkish apply",
            ),
            Block::heading(2, "EXAMINATION RULES"),
        ];
        assert_eq!(
            TitleDetector::default().detect(&blocks),
            Some("EXAMINATION RULES".to_string())
        );
    }

    #[test]
    fn test_section_headers_and_institution_skipped() {
        let blocks = vec![
            Block::heading(1, "EASTERN MEDITERRANEAN UNIVERSITY"),
            Block::heading(1, "I. GENERAL PROVISIONS"),
            Block::heading(2, "By-Law on Minor Programs"),
        ];
        assert_eq!(
            TitleDetector::default().detect(&blocks),
            Some("By-Law on Minor Programs".to_string())
        );
    }

    #[test]
    fn test_any_top_heading_fallback() {
        let blocks = vec![
            Block::heading(3, "Article 1 – Scope"),
            Block::heading(2, "Student Housing"),
        ];
        assert_eq!(
            TitleDetector::default().detect(&blocks),
            Some("Student Housing".to_string())
        );
    }

    #[test]
    fn test_caps_paragraph_fallback() {
        let blocks = vec![
            Block::heading(3, "Article 1"),
            Block::paragraph("THE STATUTE of the university"),
        ];
        assert_eq!(TitleDetector::default().detect(&blocks), None);

        let blocks = vec![Block::paragraph("UNIVERSITY STATUTE 2004 (amended)")];
        assert_eq!(
            TitleDetector::default().detect(&blocks),
            Some("UNIVERSITY STATUTE 2004 (amended)".to_string())
        );
    }

    #[test]
    fn test_custom_ignored_names() {
        let blocks = vec![Block::heading(1, "Northern Institute")];
        let detector = TitleDetector::new(["northern institute"]);
        assert_eq!(detector.detect(&blocks), None);
    }
}
