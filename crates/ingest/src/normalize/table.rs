//! Table reclassification.
//!
//! Word exports lay articles out as table rows (`| | 1. | Scope ... |`). A
//! table is either kept whole as tabular data or decomposed row by row into
//! article headings, sub-clause paragraphs and residual text.

use regex::Regex;
use std::sync::LazyLock;

use super::heading::pseudo_heading_level;
use crate::text::{char_len, normalize_whitespace};
use crate::types::Block;

static ARTICLE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+[A-Za-z]?)\.?$").unwrap());
static SUB_CLAUSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\((\d+|[A-Za-z])\)$").unwrap());
static GRADE_CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[A-FUWSINGa-f][+÷\-]?$|^\d+\.\d{2}$|^(SATISFACTORY|FAIL|PASS|INCOMPLETE|WITHDRAWAL)$",
    )
    .unwrap()
});
/// Amendment references that sit in the title column of article rows.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(VYK|SEN|R\.G\.|EK\s+\d|A\.E\.|^\d{2}\.\d{2}\.\d{4})").unwrap()
});
/// Cells holding only a gazette reference date.
static REFERENCE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(VYK|SEN|R\.G\.)?\s*\d{2}[\./]\d{2}[\./]\d{2,4}").unwrap()
});

const DATA_KEYWORDS: &[&str] = &["grade", "coefficient", "credit", "hours", "ects"];

/// Cells shorter than this carry no content.
const MIN_CELL_CHARS: usize = 3;
/// Residual row text must be longer than this to survive.
const MIN_RESIDUAL_CHARS: usize = 10;
/// Pure data tables need at least this many grade rows when no header keyword is present.
const MIN_PURE_GRADE_ROWS: usize = 3;
/// Collected grade rows are re-emitted only when at least this many survive.
const MIN_EMITTED_GRADE_ROWS: usize = 2;

/// How a single table row reads once classified.
#[derive(Debug, Clone, PartialEq)]
enum RowKind {
    Empty,
    Grade,
    Article {
        number: String,
        title: Option<String>,
        body: String,
    },
    SubClause {
        marker: String,
        body: String,
    },
    Residual(String),
}

/// Rewrite a table into the blocks it actually represents.
pub fn normalize_table(rows: Vec<Vec<String>>, has_header: bool) -> Vec<Block> {
    if is_pure_data_table(&rows) {
        return vec![Block::table(rows, has_header)];
    }

    let mut blocks = Vec::new();
    let mut grade_rows = Vec::new();

    for row in rows {
        match classify_row(&row) {
            RowKind::Empty => {}
            RowKind::Grade => grade_rows.push(row),
            RowKind::Article {
                number,
                title,
                body,
            } => {
                let heading = match title {
                    Some(title) => format!("Article {number} – {title}"),
                    None => format!("Article {number}"),
                };
                blocks.push(Block::heading(3, heading));
                if !body.is_empty() {
                    blocks.push(Block::paragraph(body));
                }
            }
            RowKind::SubClause { marker, body } => {
                blocks.push(Block::paragraph(format!("{marker} {body}")));
            }
            RowKind::Residual(text) => {
                if char_len(&text) > MIN_RESIDUAL_CHARS {
                    blocks.push(match pseudo_heading_level(&text) {
                        Some(level) => Block::heading(level, text),
                        None => Block::paragraph(text),
                    });
                }
            }
        }
    }

    if grade_rows.len() >= MIN_EMITTED_GRADE_ROWS {
        blocks.push(Block::table(grade_rows, true));
    } else if !grade_rows.is_empty() {
        tracing::debug!("Dropped {} isolated grade row(s)", grade_rows.len());
    }

    blocks
}

/// A table with no article rows that is clearly tabular data.
pub fn is_pure_data_table(rows: &[Vec<String>]) -> bool {
    if rows.len() < 2 || rows.iter().any(|row| article_row(row).is_some()) {
        return false;
    }

    let grade_rows = rows.iter().filter(|row| is_grade_row(row)).count();
    if grade_rows >= MIN_PURE_GRADE_ROWS {
        return true;
    }

    let first_row = rows[0].join(" ").to_lowercase();
    DATA_KEYWORDS.iter().any(|kw| first_row.contains(kw))
}

fn classify_row(row: &[String]) -> RowKind {
    if row.iter().all(|cell| char_len(cell) < MIN_CELL_CHARS) {
        return RowKind::Empty;
    }
    if is_grade_row(row) {
        return RowKind::Grade;
    }
    if let Some(kind) = article_row(row) {
        return kind;
    }
    if let Some(kind) = sub_clause_row(row) {
        return kind;
    }
    RowKind::Residual(residual_text(row))
}

fn is_grade_row(row: &[String]) -> bool {
    row.len() >= 2
        && row
            .iter()
            .filter(|cell| GRADE_CELL_RE.is_match(cell.trim()))
            .count()
            >= 2
}

/// Index of the only cell matching `re`; `None` for zero or several matches.
fn single_match(row: &[String], re: &Regex) -> Option<usize> {
    let mut matches = row
        .iter()
        .enumerate()
        .filter(|(_, cell)| re.is_match(cell.trim()))
        .map(|(idx, _)| idx);

    match (matches.next(), matches.next()) {
        (Some(idx), None) => Some(idx),
        _ => None,
    }
}

fn article_row(row: &[String]) -> Option<RowKind> {
    if row.len() < 2 {
        return None;
    }
    let idx = single_match(row, &ARTICLE_NUMBER_RE)?;
    let number = ARTICLE_NUMBER_RE
        .captures(row[idx].trim())
        .map(|caps| caps[1].to_string())?;

    let title = idx
        .checked_sub(1)
        .and_then(|prev| clean_title(&row[prev]));

    Some(RowKind::Article {
        number,
        title,
        body: join_body(&row[idx + 1..]),
    })
}

fn sub_clause_row(row: &[String]) -> Option<RowKind> {
    let idx = single_match(row, &SUB_CLAUSE_RE)?;
    let body = join_body(&row[idx + 1..]);
    if body.is_empty() {
        return None;
    }

    Some(RowKind::SubClause {
        marker: row[idx].trim().to_string(),
        body,
    })
}

/// Article title from the cell left of the number, minus amendment references.
fn clean_title(cell: &str) -> Option<String> {
    let cell = cell.trim();
    if char_len(cell) < MIN_CELL_CHARS {
        return None;
    }

    let stripped = normalize_whitespace(&REFERENCE_RE.replace_all(cell, ""));
    if char_len(&stripped) < MIN_CELL_CHARS {
        return None;
    }

    let title = stripped.trim_matches(|c: char| matches!(c, '.' | ',' | ';' | ':' | ' '));
    (!title.is_empty()).then(|| title.to_string())
}

fn join_body(cells: &[String]) -> String {
    cells
        .iter()
        .map(|cell| cell.trim())
        .filter(|cell| !cell.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn residual_text(row: &[String]) -> String {
    row.iter()
        .map(|cell| cell.trim())
        .filter(|cell| char_len(cell) >= MIN_CELL_CHARS && !REFERENCE_DATE_RE.is_match(cell))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    #[test]
    fn test_article_row_without_title() {
        let blocks = normalize_table(vec![row(&["", "1.", "Scope of these rules."])], false);
        assert_eq!(
            blocks,
            vec![
                Block::heading(3, "Article 1"),
                Block::paragraph("Scope of these rules."),
            ]
        );
    }

    #[test]
    fn test_article_row_with_title_and_references() {
        let blocks = normalize_table(
            vec![row(&["Definitions VYK", "2", "In these rules", "the terms mean"])],
            false,
        );
        assert_eq!(
            blocks,
            vec![
                Block::heading(3, "Article 2 – Definitions"),
                Block::paragraph("In these rules the terms mean"),
            ]
        );
    }

    #[test]
    fn test_reference_inside_title_leaves_single_spaces() {
        let blocks = normalize_table(vec![row(&["Fees SEN Amendment", "4.", "Fees are due."])], false);
        assert_eq!(blocks[0], Block::heading(3, "Article 4 – Fees Amendment"));
        assert_eq!(
            clean_title("Exams  VYK 12.03.2004 R.G. rules").as_deref(),
            Some("Exams 12.03.2004 rules")
        );
    }

    #[test]
    fn test_article_row_with_letter_suffix() {
        let blocks = normalize_table(vec![row(&["Late fees:", "7B.", "Payable within a week."])], false);
        assert_eq!(blocks[0], Block::heading(3, "Article 7B – Late fees"));
    }

    #[test]
    fn test_two_number_cells_is_not_an_article_row() {
        let kind = classify_row(&row(&["12", "14", "pages of annexes follow"]));
        assert_eq!(kind, RowKind::Residual("pages of annexes follow".to_string()));
    }

    #[test]
    fn test_sub_clause_row() {
        let blocks = normalize_table(vec![row(&["", "(a)", "Applies to all students."])], false);
        assert_eq!(blocks, vec![Block::paragraph("(a) Applies to all students.")]);

        // Marker alone carries no content.
        assert_eq!(
            classify_row(&row(&["Reference text", "(1)"])),
            RowKind::Residual("Reference text (1)".to_string())
        );
    }

    #[test]
    fn test_article_and_sub_clause_with_two_grade_rows() {
        let blocks = normalize_table(
            vec![
                row(&["", "1.", "Scope of these rules."]),
                row(&["", "(1)", "Applies to all students."]),
                row(&["A+", "B-", "3.50", "2.50"]),
                row(&["C", "D", "1.50", "1.00"]),
            ],
            false,
        );
        assert_eq!(
            blocks,
            vec![
                Block::heading(3, "Article 1"),
                Block::paragraph("Scope of these rules."),
                Block::paragraph("(1) Applies to all students."),
                Block::table(
                    vec![row(&["A+", "B-", "3.50", "2.50"]), row(&["C", "D", "1.50", "1.00"])],
                    true
                ),
            ]
        );
    }

    #[test]
    fn test_single_grade_row_dropped() {
        let blocks = normalize_table(
            vec![
                row(&["", "1.", "Scope of these rules."]),
                row(&["", "(1)", "Applies to all students."]),
                row(&["A+", "B-", "3.50", "2.50"]),
            ],
            false,
        );
        assert_eq!(blocks.len(), 3);
        assert!(!blocks.iter().any(Block::is_table));
    }

    #[test]
    fn test_pure_data_table_by_keyword() {
        let rows = vec![
            row(&["Letter Grade", "Coefficient"]),
            row(&["A", "4.00"]),
        ];
        assert!(is_pure_data_table(&rows));
        assert_eq!(
            normalize_table(rows.clone(), true),
            vec![Block::table(rows, true)]
        );
    }

    #[test]
    fn test_pure_data_table_by_grade_rows() {
        let rows = vec![
            row(&["A", "4.00", "Excellent"]),
            row(&["B", "3.00", "Good"]),
            row(&["C", "2.00", "Satisfactory"]),
        ];
        assert!(is_pure_data_table(&rows));
    }

    #[test]
    fn test_article_row_defeats_pure_data_keyword() {
        let rows = vec![
            row(&["Credit hours", "3.", "Each course carries credit."]),
            row(&["A", "4.00", "Excellent"]),
        ];
        assert!(!is_pure_data_table(&rows));
    }

    #[test]
    fn test_residual_rows() {
        let blocks = normalize_table(
            vec![
                row(&["R.G. 12.03.2004", "GENERAL PROVISIONS"]),
                row(&["ab", "Rector approves the schedule."]),
                row(&["short", "x"]),
            ],
            false,
        );
        assert_eq!(
            blocks,
            vec![
                Block::heading(1, "GENERAL PROVISIONS"),
                Block::paragraph("Rector approves the schedule."),
            ]
        );
    }

    #[test]
    fn test_empty_rows_dropped() {
        assert_eq!(classify_row(&row(&["", "-", "ab"])), RowKind::Empty);
        assert!(normalize_table(vec![row(&["", "  "])], false).is_empty());
    }
}
