//! Result collector
//!
//! The single owner of run-wide state. It takes results as they arrive,
//! merges mapping fragments, forwards records to the aggregate sinks and keeps
//! the counters for the summary.

use crate::anonymization::{PseudonymMapping, RunSalt};
use crate::core::aggregate::{AggregationReport, RecordSink};
use crate::core::batch::result::BatchResult;
use crate::core::batch::summary::BatchSummary;

/// Progress line interval for a batch of `total` files
pub fn progress_interval(total: usize) -> usize {
    (total / 20).clamp(1, 50)
}

/// Consumes per-file results for one run
pub struct ResultCollector {
    sinks: Vec<Box<dyn RecordSink>>,
    mapping: PseudonymMapping,
    salt: Option<RunSalt>,
    summary: BatchSummary,
    processed: usize,
    progress_every: usize,
}

impl ResultCollector {
    /// `summary` carries the run id and total; counters start at zero
    pub fn new(sinks: Vec<Box<dyn RecordSink>>, summary: BatchSummary) -> Self {
        let progress_every = progress_interval(summary.total_files);
        Self {
            sinks,
            mapping: PseudonymMapping::new(),
            salt: None,
            summary,
            processed: 0,
            progress_every,
        }
    }

    /// First salt reported by any worker
    pub fn salt(&self) -> Option<&RunSalt> {
        self.salt.as_ref()
    }

    /// Takes one result
    pub fn accept(&mut self, result: BatchResult) {
        self.processed += 1;

        match result {
            BatchResult::Success(processed) => {
                self.summary.successful += 1;
                self.summary.outputs_written += processed.outputs_written;
                self.summary.output_failures += processed.output_failures;

                self.mapping.merge(&processed.fragment);
                if self.salt.is_none() {
                    self.salt = processed.salt;
                }

                let record = &processed.record;
                let summary = &mut self.summary;
                self.sinks.retain_mut(|sink| match sink.accept(record) {
                    Ok(()) => true,
                    Err(e) => {
                        tracing::error!(
                            source = %processed.path.display(),
                            error = %e,
                            "Aggregate output failed, no further records will be written to it"
                        );
                        summary.aggregate_failures += 1;
                        false
                    }
                });
            }
            BatchResult::Failure(failure) => {
                tracing::warn!(
                    path = %failure.path.display(),
                    kind = %failure.kind,
                    error = %failure.message,
                    "File skipped"
                );
                self.summary.add_failure(failure);
            }
        }

        if self.processed % self.progress_every == 0 || self.processed == self.summary.total_files {
            crate::log_batch_progress!(self.processed, self.summary.total_files, self.summary.failed);
        }
    }

    /// Closes the sinks and returns the run state
    pub fn finish(mut self) -> (BatchSummary, PseudonymMapping, Option<RunSalt>) {
        let mut reports: Vec<AggregationReport> = Vec::new();
        for sink in self.sinks {
            match sink.finish() {
                Ok(report) => reports.push(report),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to finish aggregate output");
                    self.summary.aggregate_failures += 1;
                }
            }
        }

        self.summary.aggregates = reports;
        self.summary.mapping_entries = self.mapping.len();
        self.summary.salt_origin = self.salt.as_ref().map(RunSalt::origin);
        (self.summary, self.mapping, self.salt)
    }
}
