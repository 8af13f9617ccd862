//! Pseudo-heading detection.
//!
//! Word exports render most headings as bold paragraphs. Each rule below is a
//! pure predicate paired with the heading level it assigns; rules are tried
//! in order and the first match wins.

use regex::Regex;
use std::sync::LazyLock;

use crate::text::{alpha_count, char_len, uppercase_ratio};

static CHAPTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^CHAPTER\s+[IVX\d]+").unwrap());
static PART_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^PART\s+[IVX\d]+").unwrap());
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^SECTION\s+[IVX\d]+").unwrap());
static ROMAN_SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[IVX]+\.\s+.+$").unwrap());

/// Texts longer than this are never headings.
const MAX_HEADING_CHARS: usize = 150;

const DOCUMENT_TITLE_KEYWORDS: &[&str] = &[
    "REGULATION",
    "RULES",
    "PRINCIPLES",
    "BY-LAW",
    "BYLAW",
    "STATUTE",
    "CODE",
    "PROVISIONS",
    "HOUSING",
    "DISCIPLINARY",
    "DORMITOR",
    "EXAMINATION",
    "REGISTRATION",
    "SCHOLARSHIP",
];

const SECTION_KEYWORDS: &[&str] = &["provisions", "concluding", "miscellaneous", "temporary"];

/// A named predicate that promotes matching text to a heading of `level`.
pub struct HeadingRule {
    pub name: &'static str,
    pub level: u8,
    pub matches: fn(&str) -> bool,
}

/// Heading rules in priority order.
pub static HEADING_RULES: &[HeadingRule] = &[
    HeadingRule {
        name: "document-title",
        level: 1,
        matches: is_document_title,
    },
    HeadingRule {
        name: "chapter",
        level: 2,
        matches: is_chapter,
    },
    HeadingRule {
        name: "part",
        level: 2,
        matches: is_part,
    },
    HeadingRule {
        name: "section",
        level: 2,
        matches: is_section,
    },
    HeadingRule {
        name: "roman-section",
        level: 2,
        matches: is_roman_section,
    },
    HeadingRule {
        name: "caps-line",
        level: 2,
        matches: is_caps_line,
    },
    HeadingRule {
        name: "section-keyword",
        level: 2,
        matches: has_section_keyword,
    },
];

/// Heading level for `text` if it reads as a heading, `None` otherwise.
pub fn pseudo_heading_level(text: &str) -> Option<u8> {
    let text = text.trim();
    if text.is_empty() || char_len(text) > MAX_HEADING_CHARS {
        return None;
    }

    HEADING_RULES
        .iter()
        .find(|rule| (rule.matches)(text))
        .map(|rule| {
            tracing::trace!(rule = rule.name, "Promoted pseudo-heading: {}", text);
            rule.level
        })
}

/// Short, mostly-uppercase line naming a kind of regulatory document.
fn is_document_title(text: &str) -> bool {
    char_len(text) < 100
        && uppercase_ratio(text).is_some_and(|ratio| ratio > 0.8)
        && {
            let upper = text.to_uppercase();
            DOCUMENT_TITLE_KEYWORDS.iter().any(|kw| upper.contains(kw))
        }
}

fn is_chapter(text: &str) -> bool {
    CHAPTER_RE.is_match(text)
}

fn is_part(text: &str) -> bool {
    PART_RE.is_match(text)
}

fn is_section(text: &str) -> bool {
    SECTION_RE.is_match(text)
}

fn is_roman_section(text: &str) -> bool {
    ROMAN_SECTION_RE.is_match(text)
}

/// Short standalone line in (nearly) all caps.
fn is_caps_line(text: &str) -> bool {
    char_len(text) < 60
        && alpha_count(text) > 3
        && uppercase_ratio(text).is_some_and(|ratio| ratio > 0.9)
}

/// Short mixed-case section title such as "Final Provisions".
fn has_section_keyword(text: &str) -> bool {
    char_len(text) < 50 && {
        let lower = text.to_lowercase();
        SECTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
    }
}
