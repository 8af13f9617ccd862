//! Output directory layout: chunk file, source manifest and structure dumps.

use crate::types::{ManifestStats, SourceEntry, StructuredDocument};
use lexchunk_core::{AppError, AppResult};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Get the chunk records JSONL path.
pub fn get_chunks_path(output_dir: &Path) -> PathBuf {
    output_dir.join("chunks.jsonl")
}

/// Get the sources JSONL path.
pub fn get_sources_path(output_dir: &Path) -> PathBuf {
    output_dir.join("sources.jsonl")
}

/// Get the directory holding per-document structure dumps.
pub fn get_structure_dir(output_dir: &Path) -> PathBuf {
    output_dir.join("structure")
}

/// Structure dump file name for a source, e.g. `Exam%20Rules.htm` -> `Exam_Rules.json`.
pub fn structure_file_name(source: &str) -> String {
    let lower = source.to_ascii_lowercase();
    let stem = if lower.ends_with(".html") {
        &source[..source.len() - 5]
    } else if lower.ends_with(".htm") {
        &source[..source.len() - 4]
    } else {
        source
    };
    format!("{}.json", stem.replace("%20", "_"))
}

/// Load the manifest; a missing file means nothing was ingested yet.
///
/// Unparseable lines are skipped with a warning.
pub fn load_sources(output_dir: &Path) -> AppResult<Vec<SourceEntry>> {
    let path = get_sources_path(output_dir);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path)?;
    let entries = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match serde_json::from_str::<SourceEntry>(line) {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping malformed manifest line in {:?}: {}", path, e);
                None
            }
        })
        .collect();

    Ok(entries)
}

/// Source identifiers already recorded in the manifest.
pub fn indexed_sources(output_dir: &Path) -> AppResult<HashSet<String>> {
    Ok(load_sources(output_dir)?
        .into_iter()
        .map(|entry| entry.source)
        .collect())
}

/// Append one processed source to the manifest.
pub fn append_source(output_dir: &Path, entry: &SourceEntry) -> AppResult<()> {
    fs::create_dir_all(output_dir)?;
    let line = serde_json::to_string(entry)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(get_sources_path(output_dir))?;
    writeln!(file, "{}", line)?;
    Ok(())
}

/// Truncate the manifest and the chunk file.
pub fn reset(output_dir: &Path) -> AppResult<()> {
    fs::create_dir_all(output_dir)?;
    for path in [get_sources_path(output_dir), get_chunks_path(output_dir)] {
        fs::write(&path, "")?;
    }
    tracing::info!("Reset ingest output in {:?}", output_dir);
    Ok(())
}

/// Summarize the manifest.
pub fn manifest_stats(output_dir: &Path) -> AppResult<ManifestStats> {
    let entries = load_sources(output_dir)?;

    Ok(ManifestStats {
        sources_count: entries.len() as u32,
        chunks_count: entries.iter().map(|e| e.chunk_count).sum(),
        bytes_processed: entries.iter().map(|e| e.byte_count).sum(),
        last_ingest_at: entries.iter().map(|e| e.indexed_at).max(),
    })
}

/// Write a structured document as pretty JSON under `structure/`.
pub fn write_structure(output_dir: &Path, doc: &StructuredDocument) -> AppResult<PathBuf> {
    let dir = get_structure_dir(output_dir);
    fs::create_dir_all(&dir)?;

    let path = dir.join(structure_file_name(&doc.source));
    let json = serde_json::to_string_pretty(doc)?;
    fs::write(&path, json).map_err(|e| {
        AppError::Ingest(format!("Failed to write structure dump {:?}: {}", path, e))
    })?;

    tracing::debug!("Wrote structure dump {:?}", path);
    Ok(path)
}
