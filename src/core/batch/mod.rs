//! Batch execution
//!
//! - [`dispatch`] - bounded worker pool over the per-file pipeline
//! - [`collector`] - single owner of the merged mapping and aggregate sinks
//! - [`coordinator`] - setup, run and mapping persistence
//! - [`result`] / [`summary`] - per-file outcomes and the run summary

pub mod collector;
pub mod coordinator;
pub mod dispatch;
pub mod result;
pub mod summary;

pub use collector::ResultCollector;
pub use coordinator::{BatchCoordinator, InputSource};
pub use dispatch::{clamp_concurrency, dispatch, run_batch};
pub use result::{BatchResult, ClassifiedFailure, ProcessedRecord};
pub use summary::BatchSummary;
