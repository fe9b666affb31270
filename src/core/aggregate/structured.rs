//! Streaming JSON array aggregate

use super::{open_destination, AggregationReport, RecordSink};
use crate::core::routing::OutputKind;
use crate::domain::{FlatRecord, RecordError, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes records as elements of one JSON array while they arrive
///
/// Each element is serialized on its own as it is accepted, so an interrupted
/// run leaves a prefix that only lacks the closing bracket.
pub struct StructuredStreamWriter {
    path: PathBuf,
    flush_interval: usize,
    writer: Option<BufWriter<File>>,
    records: usize,
}

impl StructuredStreamWriter {
    pub fn new(path: impl Into<PathBuf>, flush_interval: usize) -> Self {
        Self {
            path: path.into(),
            flush_interval: flush_interval.max(1),
            writer: None,
            records: 0,
        }
    }
}

impl RecordSink for StructuredStreamWriter {
    fn accept(&mut self, record: &FlatRecord) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(b",\n")?;
        } else {
            let mut writer = BufWriter::new(open_destination(&self.path)?);
            writer.write_all(b"[\n")?;
            self.writer = Some(writer);
        }
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };

        serde_json::to_writer(&mut *writer, record)?;
        self.records += 1;

        if self.records % self.flush_interval == 0 {
            writer.flush()?;
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<AggregationReport> {
        let mut report = AggregationReport::new(OutputKind::AggJson, self.path.clone());

        match self.writer {
            Some(mut writer) => {
                writer.write_all(b"\n]\n")?;
                writer.flush()?;
                report.records = self.records;
                report.written = true;
                tracing::info!(
                    path = %self.path.display(),
                    records = self.records,
                    "Combined JSON written"
                );
            }
            None => {
                let warning = RecordError::AggregationEmpty(self.path);
                tracing::warn!(kind = %warning.kind(), "{warning}");
            }
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    #[test]
    fn test_stream_is_a_valid_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("combined.json");
        let mut sink = Box::new(StructuredStreamWriter::new(&path, 1000));

        let first: FlatRecord = [("a".to_string(), json!(1))].into_iter().collect();
        let second: FlatRecord = [("c".to_string(), json!("x"))].into_iter().collect();
        sink.accept(&first).unwrap();
        sink.accept(&second).unwrap();
        let report = sink.finish().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "[\n{\"a\":1},\n{\"c\":\"x\"}\n]\n");
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(report.records, 2);
    }

    #[test]
    fn test_interrupted_prefix_is_completable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("combined.json");
        let mut sink = StructuredStreamWriter::new(&path, 1);

        let record: FlatRecord = [("a".to_string(), json!(1))].into_iter().collect();
        sink.accept(&record).unwrap();
        drop(sink);

        let mut text = std::fs::read_to_string(&path).unwrap();
        text.push(']');
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["a"], 1);
    }

    #[test]
    fn test_empty_stream_writes_no_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("combined.json");
        let report = Box::new(StructuredStreamWriter::new(&path, 10)).finish().unwrap();

        assert!(!report.written);
        assert!(!path.exists());
    }
}
