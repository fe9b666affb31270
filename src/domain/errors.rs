//! Domain error types
//!
//! This module defines the error hierarchy for Scrubline. Per-file problems are
//! expressed as [`RecordError`] and never escape the per-file pipeline; they are
//! captured as classified failures instead. [`ScrublineError`] covers setup-time
//! and run-level failures that abort a command.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main Scrubline error type
///
/// This is the primary error type used for fallible setup and run-level
/// operations. Per-file errors are wrapped via [`RecordError`].
#[derive(Debug, Error)]
pub enum ScrublineError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Setup-time failures (invalid input root, unwritable output directory)
    #[error("Setup error: {0}")]
    Setup(String),

    /// A record-level error surfaced outside the pipeline boundary
    #[error("Record error: {0}")]
    Record(#[from] RecordError),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Per-record error taxonomy
///
/// Every variant maps onto one [`FailureKind`]. These errors are caught and
/// logged at the point of occurrence.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Unreadable or corrupt input
    #[error("Failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },

    /// Decoded structure has an unexpected shape
    #[error("Unexpected record shape in {path}: {reason}")]
    Sanitize { path: PathBuf, reason: String },

    /// A single output target could not be written
    #[error("Failed to write {target} output to {path}: {reason}")]
    OutputWrite {
        target: String,
        path: PathBuf,
        reason: String,
    },

    /// The hardened pseudonym backend is not available in this build
    #[error("Hardened pseudonym backend unavailable: {0}")]
    PseudonymBackendUnavailable(String),

    /// Nothing to aggregate when the aggregate was finalized
    #[error("No successful records to aggregate into {0}")]
    AggregationEmpty(PathBuf),

    /// The worker processing a file terminated abnormally
    #[error("Worker failed while processing {path}: {reason}")]
    Worker { path: PathBuf, reason: String },
}

impl RecordError {
    /// Classification tag for this error
    pub fn kind(&self) -> FailureKind {
        match self {
            RecordError::Decode { .. } => FailureKind::Decode,
            RecordError::Sanitize { .. } => FailureKind::Sanitize,
            RecordError::OutputWrite { .. } => FailureKind::OutputWrite,
            RecordError::PseudonymBackendUnavailable(_) => FailureKind::PseudonymBackendUnavailable,
            RecordError::AggregationEmpty(_) => FailureKind::AggregationEmpty,
            RecordError::Worker { .. } => FailureKind::Worker,
        }
    }

    /// Creates a decode error for `path`
    pub fn decode(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        RecordError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates a sanitize error for `path`
    pub fn sanitize(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        RecordError::Sanitize {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Creates an output write error for one target
    pub fn output_write(
        target: impl fmt::Display,
        path: impl Into<PathBuf>,
        reason: impl fmt::Display,
    ) -> Self {
        RecordError::OutputWrite {
            target: target.to_string(),
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Failure classification carried by a classified failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    /// Unreadable or corrupt input
    Decode,
    /// Unexpected record shape
    Sanitize,
    /// Output target write failure
    OutputWrite,
    /// Hardened backend missing, fell back
    PseudonymBackendUnavailable,
    /// No records at aggregation time
    AggregationEmpty,
    /// Worker terminated abnormally
    Worker,
}

impl FailureKind {
    /// Stable label used in logs and summaries
    pub fn label(&self) -> &'static str {
        match self {
            FailureKind::Decode => "DecodeError",
            FailureKind::Sanitize => "SanitizeError",
            FailureKind::OutputWrite => "OutputWriteError",
            FailureKind::PseudonymBackendUnavailable => "PseudonymBackendUnavailable",
            FailureKind::AggregationEmpty => "AggregationEmptyError",
            FailureKind::Worker => "WorkerError",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScrublineError {
    fn from(err: std::io::Error) -> Self {
        ScrublineError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScrublineError {
    fn from(err: serde_json::Error) -> Self {
        ScrublineError::Serialization(err.to_string())
    }
}

// Conversion from csv::Error
impl From<csv::Error> for ScrublineError {
    fn from(err: csv::Error) -> Self {
        ScrublineError::Serialization(format!("CSV error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScrublineError {
    fn from(err: toml::de::Error) -> Self {
        ScrublineError::Configuration(format!("TOML parse error: {err}"))
    }
}
