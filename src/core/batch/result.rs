//! Per-file batch outcomes

use crate::anonymization::{PseudonymMapping, RunSalt};
use crate::domain::{FailureKind, FlatRecord, RecordError};
use std::path::{Path, PathBuf};

/// A file that made it through the pipeline
#[derive(Debug)]
pub struct ProcessedRecord {
    /// Source file
    pub path: PathBuf,
    /// Sanitized and possibly anonymized record
    pub record: FlatRecord,
    /// Pseudonyms created for this file only
    pub fragment: PseudonymMapping,
    /// Run salt in use, when pseudonymizing
    pub salt: Option<RunSalt>,
    /// Per-file outputs written
    pub outputs_written: usize,
    /// Per-file outputs that failed
    pub output_failures: usize,
}

/// A file that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

impl ClassifiedFailure {
    pub fn from_error(path: impl Into<PathBuf>, error: &RecordError) -> Self {
        Self {
            path: path.into(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Outcome of processing one candidate file
#[derive(Debug)]
pub enum BatchResult {
    Success(Box<ProcessedRecord>),
    Failure(ClassifiedFailure),
}

impl BatchResult {
    pub fn failure(path: impl Into<PathBuf>, error: &RecordError) -> Self {
        BatchResult::Failure(ClassifiedFailure::from_error(path, error))
    }

    pub fn path(&self) -> &Path {
        match self {
            BatchResult::Success(record) => &record.path,
            BatchResult::Failure(failure) => &failure.path,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchResult::Success(_))
    }
}
