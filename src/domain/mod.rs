//! Domain models and types for Scrubline.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Record types** ([`FlatRecord`], [`CandidateFile`])
//! - **Error types** ([`ScrublineError`], [`RecordError`], [`FailureKind`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! Setup-time and run-level operations return [`Result<T, ScrublineError>`].
//! Per-file problems are [`RecordError`]s, which the per-file pipeline turns
//! into classified failures instead of propagating:
//!
//! ```rust
//! use scrubline::domain::{FailureKind, RecordError};
//!
//! let err = RecordError::decode("/data/broken.json", "unexpected end of input");
//! assert_eq!(err.kind(), FailureKind::Decode);
//! ```

pub mod errors;
pub mod record;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{FailureKind, RecordError, ScrublineError};
pub use record::{CandidateFile, FlatRecord};
pub use result::Result;
