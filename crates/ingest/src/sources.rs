//! Source discovery and raw markup loading.

use lexchunk_core::{AppError, AppResult};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const MARKUP_EXTENSIONS: &[&str] = &["htm", "html"];

/// Raw markup for one source document.
#[derive(Debug, Clone)]
pub struct SourceText {
    /// Source identifier (file name)
    pub source: String,

    pub path: PathBuf,

    pub markup: String,

    /// Size of the file on disk
    pub byte_count: u64,

    /// Whether invalid UTF-8 was replaced during decoding
    pub lossy: bool,
}

/// Find markup files under `paths`, filtered by substring patterns.
///
/// Directories are walked without following symlinks. The result is sorted
/// and free of duplicates.
pub fn discover_sources(paths: &[PathBuf], include: &[String], exclude: &[String]) -> Vec<PathBuf> {
    let mut found = Vec::new();

    for path in paths {
        if path.is_file() {
            if is_markup_file(path) && should_include(path, include, exclude) {
                found.push(path.clone());
            }
        } else if path.is_dir() {
            found.extend(
                WalkDir::new(path)
                    .follow_links(false)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .map(|entry| entry.into_path())
                    .filter(|p| p.is_file() && is_markup_file(p))
                    .filter(|p| should_include(p, include, exclude)),
            );
        } else {
            tracing::warn!("Source path does not exist: {:?}", path);
        }
    }

    found.sort();
    found.dedup();
    tracing::debug!("Discovered {} markup sources", found.len());
    found
}

/// Read a source file, decoding lossily when it is not valid UTF-8.
pub fn read_source(path: &Path) -> AppResult<SourceText> {
    let bytes = std::fs::read(path)?;
    let (markup, lossy) = decode_markup(&bytes);
    let source = source_name(path)?;

    if lossy {
        tracing::warn!("{} is not valid UTF-8; invalid bytes were replaced", source);
    }

    Ok(SourceText {
        source,
        path: path.to_path_buf(),
        markup: markup.into_owned(),
        byte_count: bytes.len() as u64,
        lossy,
    })
}

/// Decode markup bytes, reporting whether replacement characters were needed.
pub fn decode_markup(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), false),
        Err(_) => (String::from_utf8_lossy(bytes), true),
    }
}

/// Source identifier for a path: its file name.
pub fn source_name(path: &Path) -> AppResult<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| AppError::Ingest(format!("Source path has no file name: {:?}", path)))
}

fn is_markup_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| MARKUP_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Check if a file should be included based on patterns.
fn should_include(path: &Path, include: &[String], exclude: &[String]) -> bool {
    let path_str = path.to_string_lossy();

    if exclude.iter().any(|pattern| path_str.contains(pattern.as_str())) {
        return false;
    }

    include.is_empty() || include.iter().any(|pattern| path_str.contains(pattern.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, "<p>text</p>").unwrap();
        path
    }

    #[test]
    fn test_discover_markup_only_sorted() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "b-rules.htm");
        touch(temp.path(), "a-statute.HTML");
        touch(temp.path(), "notes.txt");
        touch(temp.path(), "nested/c-bylaw.html");

        let found = discover_sources(&[temp.path().to_path_buf()], &[], &[]);
        let names: Vec<String> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a-statute.HTML", "b-rules.htm", "c-bylaw.html"]);
    }

    #[test]
    fn test_discover_include_exclude() {
        let temp = TempDir::new().unwrap();
        let rules = touch(temp.path(), "exam-rules.htm");
        touch(temp.path(), "exam-rules-draft.htm");
        touch(temp.path(), "statute.htm");

        let found = discover_sources(
            &[temp.path().to_path_buf(), rules.clone()],
            &["rules".to_string()],
            &["draft".to_string()],
        );
        assert_eq!(found, vec![rules]);
    }

    #[test]
    fn test_missing_path_is_skipped() {
        let found = discover_sources(&[PathBuf::from("/definitely/not/here")], &[], &[]);
        assert!(found.is_empty());
    }

    #[test]
    fn test_decode_markup() {
        let (text, lossy) = decode_markup("Öğrenci".as_bytes());
        assert_eq!(text, "Öğrenci");
        assert!(!lossy);

        let (text, lossy) = decode_markup(&[b'a', 0xff, b'b']);
        assert_eq!(text, "a\u{fffd}b");
        assert!(lossy);
    }

    #[test]
    fn test_read_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Housing%20Rules.htm");
        fs::write(&path, [b'<', b'p', b'>', 0xfe, b'<', b'/', b'p', b'>']).unwrap();

        let source = read_source(&path).unwrap();
        assert_eq!(source.source, "Housing%20Rules.htm");
        assert_eq!(source.byte_count, 8);
        assert!(source.lossy);
    }
}
