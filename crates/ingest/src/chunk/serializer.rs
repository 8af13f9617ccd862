//! Article serialization to citation-ready text.

use crate::types::{Article, Block};

/// Render an article: header, blank line, then each body block.
///
/// Output carries no trailing whitespace.
pub fn serialize_article(article: &Article) -> String {
    let mut lines = header_lines(article);

    for block in &article.blocks {
        let rendered = match block {
            Block::Paragraph { text } => text.clone(),
            Block::Heading { text, .. } => format!("## {text}"),
            Block::Table { rows, has_header } => render_table(rows, *has_header),
            Block::List { items, ordered } => render_list(items, *ordered),
        };
        if rendered.is_empty() {
            continue;
        }
        lines.push(rendered);
        lines.push(String::new());
    }

    lines.join("\n").trim_end().to_string()
}

/// Header portion only, repeated at the top of every split chunk.
pub fn article_header(article: &Article) -> String {
    header_lines(article).join("\n")
}

fn header_lines(article: &Article) -> Vec<String> {
    let mut lines = vec![match &article.article_title {
        Some(title) => format!("Article {} – {}", article.article_number, title),
        None => format!("Article {}", article.article_number),
    }];

    if let Some(section) = &article.section_title {
        lines.push(format!("Section: {section}"));
    }
    lines.push(format!("Source: {}", article.source));
    lines.push(String::new());
    lines
}

/// Plain-text grid with left-aligned, width-padded columns.
///
/// Row lines carry no trailing padding: the last column is padded like the
/// others and then trimmed, so a row whose final cell is shorter than its
/// column ends at that cell's last character. The rendered grid therefore
/// appears verbatim in [`serialize_article`] output wherever the table sits.
pub fn render_table(rows: &[Vec<String>], has_header: bool) -> String {
    let mut widths: Vec<usize> = Vec::new();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(idx) {
                Some(width) => *width = (*width).max(len),
                None => widths.push(len),
            }
        }
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    for (row_idx, row) in rows.iter().enumerate() {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        lines.push(cells.join(" | ").trim_end().to_string());

        if row_idx == 0 && has_header {
            let separator: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
            lines.push(separator.join("-+-"));
        }
    }

    lines.join("\n")
}

/// One line per item, numbered from 1 or bulleted.
pub fn render_list(items: &[String], ordered: bool) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            if ordered {
                format!("{}. {}", idx + 1, item)
            } else {
                format!("• {item}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: Option<&str>, section: Option<&str>, blocks: Vec<Block>) -> Article {
        Article {
            article_number: "4".to_string(),
            article_title: title.map(str::to_string),
            blocks,
            source: "exam-rules.htm".to_string(),
            document_title: None,
            section_title: section.map(str::to_string),
        }
    }

    #[test]
    fn test_serialize_full_article() {
        let article = article(
            Some("Attendance"),
            Some("II. STUDIES"),
            vec![
                Block::paragraph("Attendance is compulsory."),
                Block::heading(4, "Exceptions"),
                Block::list(vec!["Illness".into(), "Bereavement".into()], true),
            ],
        );
        assert_eq!(
            serialize_article(&article),
            "Article 4 – Attendance\nSection: II. STUDIES\nSource: exam-rules.htm\n\n\
             Attendance is compulsory.\n\n## Exceptions\n\n1. Illness\n2. Bereavement"
        );
    }

    #[test]
    fn test_header_only() {
        let article = article(None, None, vec![Block::paragraph("Body text.")]);
        assert_eq!(article_header(&article), "Article 4\nSource: exam-rules.htm\n");
        assert_eq!(
            serialize_article(&article),
            "Article 4\nSource: exam-rules.htm\n\nBody text."
        );
    }

    #[test]
    fn test_render_table_with_header() {
        let rows = vec![
            vec!["Grade".to_string(), "Coefficient".to_string()],
            vec!["A".to_string(), "4.00".to_string()],
        ];
        assert_eq!(
            render_table(&rows, true),
            "Grade | Coefficient\n------+------------\nA     | 4.00"
        );
    }

    #[test]
    fn test_render_table_ragged_rows() {
        let rows = vec![
            vec!["Öğr".to_string()],
            vec!["A".to_string(), "x".to_string()],
        ];
        assert_eq!(render_table(&rows, false), "Öğr\nA   | x");
    }

    #[test]
    fn test_render_unordered_list() {
        let items = vec!["one".to_string(), "two".to_string()];
        assert_eq!(render_list(&items, false), "• one\n• two");
    }
}
