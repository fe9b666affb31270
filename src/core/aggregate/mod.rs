//! Batch-level aggregate outputs
//!
//! Successful records are pushed into [`RecordSink`]s one at a time, in the
//! order workers finish. Two policies exist:
//!
//! - **Streaming** ([`TabularStreamWriter`], [`StructuredStreamWriter`]):
//!   constant memory. The CSV header comes from the first record and later
//!   records are projected onto it.
//! - **Materialized** ([`MaterializedWriter`]): buffers the batch and writes
//!   the union of all fields. Selected through
//!   [`Capabilities::materialized_aggregation`].
//!
//! The two produce different column sets for heterogeneous input. Row order
//! follows completion order in both and is not stable between runs.

pub mod materialized;
pub mod structured;
pub mod tabular;

pub use materialized::MaterializedWriter;
pub use structured::StructuredStreamWriter;
pub use tabular::TabularStreamWriter;

use crate::core::capabilities::Capabilities;
use crate::core::routing::{OutputKind, OutputPlan};
use crate::domain::{FlatRecord, Result};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Consumer of the successful-record stream
pub trait RecordSink: Send {
    fn accept(&mut self, record: &FlatRecord) -> Result<()>;

    /// Completes the output; called once after the last record
    fn finish(self: Box<Self>) -> Result<AggregationReport>;
}

/// Outcome of one aggregate output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub kind: OutputKind,
    pub path: PathBuf,
    pub records: usize,
    /// Field occurrences left out because they were not in the header
    pub dropped_fields: usize,
    /// Whether a file was produced
    pub written: bool,
}

impl AggregationReport {
    pub fn new(kind: OutputKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            records: 0,
            dropped_fields: 0,
            written: false,
        }
    }
}

/// Counts records for an aggregate that a dry run would have written
pub struct DryRunSink {
    kind: OutputKind,
    path: PathBuf,
    records: usize,
}

impl DryRunSink {
    pub fn new(kind: OutputKind, path: PathBuf) -> Self {
        Self {
            kind,
            path,
            records: 0,
        }
    }
}

impl RecordSink for DryRunSink {
    fn accept(&mut self, _record: &FlatRecord) -> Result<()> {
        self.records += 1;
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<AggregationReport> {
        tracing::info!(
            kind = %self.kind,
            dest = %self.path.display(),
            records = self.records,
            "Dry run: would write aggregate"
        );
        let mut report = AggregationReport::new(self.kind, self.path);
        report.records = self.records;
        Ok(report)
    }
}

/// Options for [`build_sinks`]
#[derive(Debug, Clone, Copy)]
pub struct AggregateSettings {
    pub flush_interval: usize,
    pub dry_run: bool,
    pub no_overwrite: bool,
}

/// Creates one sink per routed aggregate destination
///
/// Existing destinations are skipped with a warning when `no_overwrite` is
/// set. Nothing is opened until the first record arrives.
pub fn build_sinks(
    plan: &OutputPlan,
    capabilities: &Capabilities,
    settings: AggregateSettings,
) -> Vec<Box<dyn RecordSink>> {
    let mut sinks: Vec<Box<dyn RecordSink>> = Vec::new();

    for kind in plan.kinds().filter(OutputKind::is_aggregate) {
        for path in plan.aggregate_paths(kind) {
            if settings.dry_run {
                sinks.push(Box::new(DryRunSink::new(kind, path)));
                continue;
            }
            if settings.no_overwrite && path.exists() {
                tracing::warn!(kind = %kind, dest = %path.display(), "Aggregate exists, not overwriting");
                continue;
            }

            let sink: Box<dyn RecordSink> = match (capabilities.materialized_aggregation, kind) {
                (true, _) => Box::new(MaterializedWriter::new(kind, path)),
                (false, OutputKind::AggJson) => {
                    Box::new(StructuredStreamWriter::new(path, settings.flush_interval))
                }
                (false, _) => Box::new(TabularStreamWriter::new(path, settings.flush_interval)),
            };
            sinks.push(sink);
        }
    }

    sinks
}

/// Streams `records` into a CSV at `dest` with the first-record header
pub fn write_tabular<I>(records: I, dest: &Path, flush_interval: usize) -> Result<AggregationReport>
where
    I: IntoIterator<Item = FlatRecord>,
{
    drain(Box::new(TabularStreamWriter::new(dest, flush_interval)), records)
}

/// Streams `records` into a JSON array at `dest`
pub fn write_structured<I>(records: I, dest: &Path, flush_interval: usize) -> Result<AggregationReport>
where
    I: IntoIterator<Item = FlatRecord>,
{
    drain(Box::new(StructuredStreamWriter::new(dest, flush_interval)), records)
}

fn drain<I>(mut sink: Box<dyn RecordSink>, records: I) -> Result<AggregationReport>
where
    I: IntoIterator<Item = FlatRecord>,
{
    for record in records {
        sink.accept(&record)?;
    }
    sink.finish()
}

/// Creates the destination file and any missing parent directories
pub(crate) fn open_destination(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}
