//! Streaming CSV aggregate

use super::{open_destination, AggregationReport, RecordSink};
use crate::core::routing::OutputKind;
use crate::domain::{FlatRecord, RecordError, Result};
use std::collections::HashSet;
use std::fs::File;
use std::path::PathBuf;

/// Writes records as CSV rows while they arrive
///
/// The first record fixes the header. Later records are projected onto it:
/// missing fields are written empty, fields outside the header are dropped.
/// The file is created on the first record, so an empty stream leaves no file.
pub struct TabularStreamWriter {
    path: PathBuf,
    flush_interval: usize,
    writer: Option<csv::Writer<File>>,
    schema: Vec<String>,
    columns: HashSet<String>,
    rows: usize,
    dropped_fields: usize,
}

impl TabularStreamWriter {
    pub fn new(path: impl Into<PathBuf>, flush_interval: usize) -> Self {
        Self {
            path: path.into(),
            flush_interval: flush_interval.max(1),
            writer: None,
            schema: Vec::new(),
            columns: HashSet::new(),
            rows: 0,
            dropped_fields: 0,
        }
    }

    /// Column order once the first record has been seen
    pub fn schema(&self) -> &[String] {
        &self.schema
    }

    fn open(&mut self, first: &FlatRecord) -> Result<()> {
        let file = open_destination(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(file);

        self.schema = first.keys().cloned().collect();
        self.columns = self.schema.iter().cloned().collect();
        writer.write_record(&self.schema)?;
        self.writer = Some(writer);

        tracing::debug!(
            path = %self.path.display(),
            columns = self.schema.len(),
            "Aggregate header fixed by first record"
        );
        Ok(())
    }
}

impl RecordSink for TabularStreamWriter {
    fn accept(&mut self, record: &FlatRecord) -> Result<()> {
        if self.writer.is_none() {
            self.open(record)?;
        }

        let extra = record.keys().filter(|k| !self.columns.contains(*k)).count();
        if extra > 0 {
            if self.dropped_fields == 0 {
                tracing::warn!(
                    path = %self.path.display(),
                    "Record has fields outside the aggregate header; they are dropped"
                );
            }
            self.dropped_fields += extra;
        }

        let row: Vec<String> = self.schema.iter().map(|k| record.cell(k)).collect();
        let Some(writer) = self.writer.as_mut() else {
            return Ok(());
        };
        writer.write_record(&row)?;
        self.rows += 1;

        if self.rows % self.flush_interval == 0 {
            writer.flush()?;
        }
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<AggregationReport> {
        let mut report = AggregationReport::new(OutputKind::AggCsv, self.path.clone());
        report.dropped_fields = self.dropped_fields;

        match self.writer {
            Some(mut writer) => {
                writer.flush()?;
                report.records = self.rows;
                report.written = true;
                tracing::info!(
                    path = %self.path.display(),
                    rows = self.rows,
                    "Combined CSV written"
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
