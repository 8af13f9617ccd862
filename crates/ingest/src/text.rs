//! Small text utilities shared by the extractor, normalizer and splitter.
//!
//! All lengths in this crate are measured in Unicode scalar values, not bytes,
//! so thresholds behave the same for ASCII and Turkish/diacritic-heavy text.

/// Collapse every whitespace run to a single space and trim both ends.
pub fn normalize_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length in characters.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Number of alphabetic characters.
pub fn alpha_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphabetic()).count()
}

/// Share of alphabetic characters that are uppercase.
///
/// Returns `None` when the text has no alphabetic characters at all.
pub fn uppercase_ratio(text: &str) -> Option<f64> {
    let (alpha, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(alpha, upper), c| {
            (alpha + 1, upper + usize::from(c.is_uppercase()))
        });

    if alpha == 0 {
        None
    } else {
        Some(upper as f64 / alpha as f64)
    }
}
