//! Buffered union-of-fields aggregate
//!
//! Unlike the streaming writers, this one keeps every record until the end of
//! the batch and writes the union of all field names, in first-seen order. For
//! the same input it therefore produces more columns than
//! [`TabularStreamWriter`](super::TabularStreamWriter), which keeps only the
//! first record's fields. Missing CSV cells are empty; missing JSON keys are
//! written as `null`.

use super::{open_destination, AggregationReport, RecordSink};
use crate::core::routing::OutputKind;
use crate::domain::{FlatRecord, RecordError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Collects all records, writes once on finish
pub struct MaterializedWriter {
    kind: OutputKind,
    path: PathBuf,
    records: Vec<FlatRecord>,
}

impl MaterializedWriter {
    /// `kind` must be an aggregate type
    pub fn new(kind: OutputKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            records: Vec::new(),
        }
    }

    fn union_fields(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for record in &self.records {
            for key in record.keys() {
                if seen.insert(key.as_str()) {
                    fields.push(key.clone());
                }
            }
        }
        fields
    }

    fn write_csv(&self, fields: &[String]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(open_destination(&self.path)?);
        writer.write_record(fields)?;
        for record in &self.records {
            writer.write_record(fields.iter().map(|f| record.cell(f)))?;
        }
        writer.flush()?;
        Ok(())
    }

    fn write_json(&self, fields: &[String]) -> Result<()> {
        let rows: Vec<Map<String, Value>> = self
            .records
            .iter()
            .map(|record| {
                fields
                    .iter()
                    .map(|f| (f.clone(), record.get(f).cloned().unwrap_or(Value::Null)))
                    .collect()
            })
            .collect();

        let mut writer = BufWriter::new(open_destination(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &rows)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl RecordSink for MaterializedWriter {
    fn accept(&mut self, record: &FlatRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<AggregationReport> {
        let mut report = AggregationReport::new(self.kind, self.path.clone());

        if self.records.is_empty() {
            let warning = RecordError::AggregationEmpty(self.path.clone());
            tracing::warn!(kind = %warning.kind(), "{warning}");
            return Ok(report);
        }

        let fields = self.union_fields();
        match self.kind {
            OutputKind::AggJson => self.write_json(&fields)?,
            _ => self.write_csv(&fields)?,
        }

        report.records = self.records.len();
        report.written = true;
        tracing::info!(
            path = %self.path.display(),
            records = self.records.len(),
            columns = fields.len(),
            "Materialized aggregate written"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn records() -> [FlatRecord; 2] {
        [
            [("a".to_string(), json!(1)), ("b".to_string(), json!(2))]
                .into_iter()
                .collect(),
            [("a".to_string(), json!(3)), ("c".to_string(), json!(9))]
                .into_iter()
                .collect(),
        ]
    }

    #[test]
    fn test_csv_uses_union_of_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("all.csv");
        let mut sink = Box::new(MaterializedWriter::new(OutputKind::AggCsv, &path));
        for record in records() {
            sink.accept(&record).unwrap();
        }
        sink.finish().unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "a,b,c\n1,2,\n3,,9\n"
        );
    }

    #[test]
    fn test_json_fills_missing_with_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("all.json");
        let mut sink = Box::new(MaterializedWriter::new(OutputKind::AggJson, &path));
        for record in records() {
            sink.accept(&record).unwrap();
        }
        sink.finish().unwrap();

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed[0]["c"], Value::Null);
        assert_eq!(parsed[1]["b"], Value::Null);
        assert_eq!(parsed[1]["c"], 9);
    }
}
