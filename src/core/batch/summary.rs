//! Batch summary and reporting

use crate::anonymization::SaltOrigin;
use crate::core::aggregate::AggregationReport;
use crate::core::batch::result::ClassifiedFailure;
use crate::domain::FailureKind;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

/// Summary of one batch run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Identifier logged with every batch line
    pub run_id: Uuid,

    pub started_at: DateTime<Utc>,

    /// Files handed to the worker pool
    pub total_files: usize,

    /// Files that produced a record
    pub successful: usize,

    /// Files that ended in a classified failure
    pub failed: usize,

    /// Failure counts per classification
    pub failures_by_kind: BTreeMap<FailureKind, usize>,

    /// Every classified failure, in completion order
    pub failures: Vec<ClassifiedFailure>,

    /// Per-file output targets written
    pub outputs_written: usize,

    /// Per-file output targets that failed
    pub output_failures: usize,

    /// Aggregate outputs that failed while streaming or finishing
    pub aggregate_failures: usize,

    /// Aggregate outputs produced or skipped
    pub aggregates: Vec<AggregationReport>,

    /// Entries in the merged pseudonym mapping
    pub mapping_entries: usize,

    /// Where the mapping file was written, if it was
    pub mapping_path: Option<PathBuf>,

    /// Origin of the run salt, when pseudonyms were derived
    pub salt_origin: Option<SaltOrigin>,

    pub dry_run: bool,

    pub duration: Duration,
}

impl BatchSummary {
    /// Create a new empty summary for a run
    pub fn new(run_id: Uuid, dry_run: bool) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            total_files: 0,
            successful: 0,
            failed: 0,
            failures_by_kind: BTreeMap::new(),
            failures: Vec::new(),
            outputs_written: 0,
            output_failures: 0,
            aggregate_failures: 0,
            aggregates: Vec::new(),
            mapping_entries: 0,
            mapping_path: None,
            salt_origin: None,
            dry_run,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Count a classified failure
    pub fn add_failure(&mut self, failure: ClassifiedFailure) {
        self.failed += 1;
        *self.failures_by_kind.entry(failure.kind).or_insert(0) += 1;
        self.failures.push(failure);
    }

    /// True when no file and no output target failed
    pub fn is_successful(&self) -> bool {
        self.failed == 0 && self.output_failures == 0 && self.aggregate_failures == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            return 100.0;
        }
        (self.successful as f64 / self.total_files as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            total_files = self.total_files,
            successful = self.successful,
            failed = self.failed,
            outputs_written = self.outputs_written,
            output_failures = self.output_failures,
            mapping_entries = self.mapping_entries,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            dry_run = self.dry_run,
            "Batch summary"
        );

        for (kind, count) in &self.failures_by_kind {
            tracing::warn!(kind = %kind, count = count, "Files failed");
        }
        for report in self.aggregates.iter().filter(|r| r.dropped_fields > 0) {
            tracing::warn!(
                path = %report.path.display(),
                dropped_fields = report.dropped_fields,
                "Aggregate header left out fields of later records"
            );
        }
    }
}
