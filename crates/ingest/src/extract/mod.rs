//! Block extraction from raw markup.
//!
//! Walks the parsed HTML body in document order and emits one typed
//! [`Block`] per heading, table, list and text container. Word-exported
//! pages nest everything inside layout tables and `div`s, so two rules keep
//! content from being emitted twice:
//! - anything inside a `table`, `ul` or `ol` belongs to that block only;
//! - a `p`/`div` holding a heading, table or list yields nothing itself;
//! - otherwise a `p`/`div` yields its own text, leaving nested `p`/`div`
//!   elements to be emitted on their own.

mod title;

pub use title::TitleDetector;

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

use crate::text::{char_len, normalize_whitespace};
use crate::types::Block;

static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body").unwrap());

/// Elements that never carry document content.
const EXCLUDED_TAGS: &[&str] = &[
    "script", "style", "meta", "link", "o:p", "head", "noscript", "template",
];

/// Elements whose whole subtree is captured as a single block.
const BLOCK_CONTAINERS: &[&str] = &["table", "ul", "ol"];

/// Elements that make an enclosing `p`/`div` redundant.
const NESTED_BLOCK_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6", "table", "ul", "ol"];

/// Text containers emitted separately from the container enclosing them.
const PARAGRAPH_TAGS: &[&str] = &["p", "div"];

/// Elements whose boundaries separate words when flattened to text.
const WORD_BREAK_TAGS: &[&str] = &["br", "p", "div", "li", "td", "th", "tr"];

/// Minimum paragraph length kept by the extractor.
const MIN_PARAGRAPH_CHARS: usize = 3;

/// Extract the ordered block sequence from raw markup.
///
/// Pure function of its input. Malformed markup is handled by the HTML5
/// parser's error recovery; the result may simply be empty.
pub fn extract_blocks(markup: &str) -> Vec<Block> {
    let document = Html::parse_document(markup);
    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());

    let mut blocks = Vec::new();

    for element in root.descendants().filter_map(ElementRef::wrap) {
        if is_excluded(element) || has_ancestor(element, BLOCK_CONTAINERS) {
            continue;
        }

        let block = match element.value().name() {
            name @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
                let text = collect_text(element);
                (!text.is_empty()).then(|| Block::heading(heading_level(name), text))
            }
            "table" => extract_table(element),
            name @ ("ul" | "ol") => extract_list(element, name == "ol"),
            "p" | "div" => extract_paragraph(element),
            _ => None,
        };

        if let Some(block) = block {
            blocks.push(block);
        }
    }

    tracing::trace!("Extracted {} raw blocks", blocks.len());
    blocks
}

/// Heading level from an `h1`..`h6` tag name, 2 when undetermined.
fn heading_level(tag: &str) -> u8 {
    tag.strip_prefix('h')
        .and_then(|digit| digit.parse::<u8>().ok())
        .filter(|level| (1..=6).contains(level))
        .unwrap_or(2)
}

fn extract_table(table: ElementRef<'_>) -> Option<Block> {
    let mut rows = Vec::new();
    let mut has_header = false;

    let table_rows = table
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "tr")
        // Rows of nested tables stay inside their enclosing cell's text.
        .filter(|tr| nearest_table(*tr) == Some(table));

    for tr in table_rows {
        let header_cells = child_elements(tr, "th");
        let is_header_row = !header_cells.is_empty();
        let cells: Vec<String> = if is_header_row {
            header_cells.into_iter().map(collect_text).collect()
        } else {
            child_elements(tr, "td").into_iter().map(collect_text).collect()
        };

        if cells.iter().all(|cell| cell.is_empty()) {
            continue;
        }

        has_header |= is_header_row;
        rows.push(cells);
    }

    (!rows.is_empty()).then(|| Block::table(rows, has_header))
}

fn extract_list(list: ElementRef<'_>, ordered: bool) -> Option<Block> {
    let items: Vec<String> = child_elements(list, "li")
        .into_iter()
        .map(collect_text)
        .filter(|item| !item.is_empty())
        .collect();

    (!items.is_empty()).then(|| Block::list(items, ordered))
}

fn extract_paragraph(element: ElementRef<'_>) -> Option<Block> {
    let has_nested_block = element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .any(|el| NESTED_BLOCK_TAGS.contains(&el.value().name()));
    if has_nested_block {
        return None;
    }

    let mut raw = String::new();
    push_text(element, &mut raw, PARAGRAPH_TAGS);
    let text = normalize_whitespace(&raw);
    (char_len(&text) >= MIN_PARAGRAPH_CHARS).then(|| Block::paragraph(text))
}

fn child_elements<'a>(parent: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag)
        .collect()
}

fn nearest_table(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn has_ancestor(element: ElementRef<'_>, tags: &[&str]) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| tags.contains(&el.value().name()))
}

fn is_excluded(element: ElementRef<'_>) -> bool {
    EXCLUDED_TAGS.contains(&element.value().name()) || has_ancestor(element, EXCLUDED_TAGS)
}

/// Whitespace-normalized text of an element, skipping non-content subtrees.
fn collect_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    push_text(element, &mut raw, &[]);
    normalize_whitespace(&raw)
}

/// Append the text below `element`, leaving out subtrees rooted at `skip` tags.
fn push_text(element: ElementRef<'_>, out: &mut String, skip: &[&str]) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if EXCLUDED_TAGS.contains(&name) {
                    continue;
                }
                let breaks = WORD_BREAK_TAGS.contains(&name);
                if breaks {
                    out.push(' ');
                }
                if skip.contains(&name) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    push_text(child_el, out, skip);
                }
                if breaks {
                    out.push(' ');
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_keep_level() {
        let blocks = extract_blocks("<html><body><h1>RULES</h1><h4>Scope</h4></body></html>");
        assert_eq!(
            blocks,
            vec![Block::heading(1, "RULES"), Block::heading(4, "Scope")]
        );
    }

    #[test]
    fn test_heading_level_default() {
        assert_eq!(heading_level("h3"), 3);
        assert_eq!(heading_level("h9"), 2);
        assert_eq!(heading_level("header"), 2);
    }

    #[test]
    fn test_non_content_elements_skipped() {
        let html = r#"<html><head><title>ignored</title><style>p { color: red }</style></head>
            <body><script>var x = 1;</script><p>Visible   text<o:p></o:p></p></body></html>"#;
        let blocks = extract_blocks(html);
        assert_eq!(blocks, vec![Block::paragraph("Visible text")]);
    }

    #[test]
    fn test_table_rows_and_header() {
        let html = r#"<table>
            <tr><th>Grade</th><th>Coefficient</th></tr>
            <tr><td>A</td><td>4.00</td></tr>
            <tr><td> </td><td>&nbsp;</td></tr>
            <tr><td>B</td><td>3.00</td></tr>
        </table>"#;
        let blocks = extract_blocks(html);
        assert_eq!(
            blocks,
            vec![Block::table(
                vec![
                    vec!["Grade".into(), "Coefficient".into()],
                    vec!["A".into(), "4.00".into()],
                    vec!["B".into(), "3.00".into()],
                ],
                true
            )]
        );
    }

    #[test]
    fn test_table_without_header_cells() {
        let html = "<table><tr><td></td><td>1.</td><td>Scope of\n these rules.</td></tr></table>";
        let blocks = extract_blocks(html);
        assert_eq!(
            blocks,
            vec![Block::table(
                vec![vec!["".into(), "1.".into(), "Scope of these rules.".into()]],
                false
            )]
        );
    }

    #[test]
    fn test_paragraphs_inside_table_not_duplicated() {
        let html = "<div><table><tr><td><p>Cell paragraph text</p></td></tr></table></div>";
        let blocks = extract_blocks(html);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_table());
    }

    #[test]
    fn test_lists() {
        let html = "<ol><li>First</li><li>  </li><li>Second</li></ol><ul><li>Bullet</li></ul>";
        let blocks = extract_blocks(html);
        assert_eq!(
            blocks,
            vec![
                Block::list(vec!["First".into(), "Second".into()], true),
                Block::list(vec!["Bullet".into()], false),
            ]
        );
    }

    #[test]
    fn test_container_with_nested_blocks_is_skipped() {
        let html = "<div><p>Inner paragraph</p></div><div>Loose div text</div>";
        let blocks = extract_blocks(html);
        assert_eq!(
            blocks,
            vec![
                Block::paragraph("Inner paragraph"),
                Block::paragraph("Loose div text"),
            ]
        );
    }

    #[test]
    fn test_mixed_content_div_keeps_loose_text() {
        let html = "<div>The Senate approved these rules on 1 May 2004.<p>Inner paragraph text</p></div>";
        let blocks = extract_blocks(html);
        assert_eq!(
            blocks,
            vec![
                Block::paragraph("The Senate approved these rules on 1 May 2004."),
                Block::paragraph("Inner paragraph text"),
            ]
        );
    }

    #[test]
    fn test_nested_divs_emit_each_text_once() {
        let html = "<div>Outer <span>inline</span> text<div>Middle text<p>Deepest text</p></div></div>";
        let blocks = extract_blocks(html);
        assert_eq!(
            blocks,
            vec![
                Block::paragraph("Outer inline text"),
                Block::paragraph("Middle text"),
                Block::paragraph("Deepest text"),
            ]
        );
    }

    #[test]
    fn test_div_with_nested_heading_is_skipped() {
        let html = "<div>Loose caption text<h2>Scope</h2></div>";
        let blocks = extract_blocks(html);
        assert_eq!(blocks, vec![Block::heading(2, "Scope")]);
    }

    #[test]
    fn test_short_paragraphs_dropped() {
        let blocks = extract_blocks("<p>ab</p><p>abc</p>");
        assert_eq!(blocks, vec![Block::paragraph("abc")]);
    }

    #[test]
    fn test_line_breaks_separate_words() {
        let blocks = extract_blocks("<p>Eastern<br>Mediterranean</p>");
        assert_eq!(blocks, vec![Block::paragraph("Eastern Mediterranean")]);
    }

    #[test]
    fn test_empty_markup() {
        assert!(extract_blocks("").is_empty());
        assert!(extract_blocks("<html><body>   </body></html>").is_empty());
    }
}
