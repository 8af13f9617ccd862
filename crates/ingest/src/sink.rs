//! Chunk sink abstraction.
//!
//! Decouples the pipeline from whatever indexes the finished chunks.

use crate::chunk::ChunkRecord;
use crate::manifest::get_chunks_path;
use lexchunk_core::{AppError, AppResult};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Trait for chunk sinks.
///
/// Implementations receive every surviving chunk of one source at a time.
pub trait ChunkSink: Send {
    /// Accept the records produced for `source`.
    fn write_chunks(&mut self, source: &str, records: &[ChunkRecord]) -> AppResult<()>;

    /// Commit any pending changes (for sinks that buffer writes).
    fn flush(&mut self) -> AppResult<()> {
        Ok(())
    }
}

/// Appends one JSON record per line to `chunks.jsonl`.
pub struct JsonlSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl JsonlSink {
    /// Open (or create) the chunk file inside `output_dir` for appending.
    pub fn open(output_dir: &Path) -> AppResult<Self> {
        fs::create_dir_all(output_dir)?;
        let path = get_chunks_path(output_dir);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AppError::Ingest(format!("Failed to open {:?}: {}", path, e)))?;

        tracing::debug!("Writing chunks to {:?}", path);
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChunkSink for JsonlSink {
    fn write_chunks(&mut self, source: &str, records: &[ChunkRecord]) -> AppResult<()> {
        for record in records {
            serde_json::to_writer(&mut self.writer, record)?;
            self.writer.write_all(b"\n")?;
        }
        tracing::debug!("Wrote {} records for {}", records.len(), source);
        Ok(())
    }

    fn flush(&mut self) -> AppResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Collects records in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<ChunkRecord>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChunkSink for MemorySink {
    fn write_chunks(&mut self, _source: &str, records: &[ChunkRecord]) -> AppResult<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Chunk;
    use tempfile::TempDir;

    fn record(index: usize) -> ChunkRecord {
        ChunkRecord::from(Chunk {
            text: format!("Article 1\nSource: rules.htm\n\nPart {index}"),
            article_number: "1".to_string(),
            article_title: None,
            source: "rules.htm".to_string(),
            document_title: None,
            section_title: None,
            chunk_index: index,
            total_chunks: 2,
            contains_table: false,
        })
    }

    #[test]
    fn test_jsonl_sink_appends_lines() {
        let temp = TempDir::new().unwrap();

        let mut sink = JsonlSink::open(temp.path()).unwrap();
        sink.write_chunks("rules.htm", &[record(0), record(1)]).unwrap();
        sink.flush().unwrap();
        drop(sink);

        let mut sink = JsonlSink::open(temp.path()).unwrap();
        sink.write_chunks("rules.htm", &[record(0)]).unwrap();
        sink.flush().unwrap();

        let content = fs::read_to_string(sink.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);

        let parsed: ChunkRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.id, "rules.htm_1_1");
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write_chunks("rules.htm", &[record(0)]).unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.records.len(), 1);
    }
}
