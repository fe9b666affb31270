//! Bounded worker pool
//!
//! Each file runs through [`RecordPipeline::process`] on tokio's blocking
//! pool; at most `concurrency` files are in flight at once. Results are
//! yielded as workers finish, so their order differs between runs.

use crate::config::MAX_CONCURRENCY;
use crate::core::batch::result::BatchResult;
use crate::core::pipeline::RecordPipeline;
use crate::domain::{CandidateFile, RecordError};
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;

/// Clamps a requested worker count to `1..=MAX_CONCURRENCY`
pub fn clamp_concurrency(requested: usize) -> usize {
    requested.clamp(1, MAX_CONCURRENCY)
}

/// Stream of per-file results in completion order
///
/// Every file yields exactly one result. A worker that panics is reported as
/// a [`RecordError::Worker`] failure for its file.
pub fn dispatch(
    pipeline: Arc<RecordPipeline>,
    files: Vec<CandidateFile>,
    concurrency: usize,
) -> impl Stream<Item = BatchResult> {
    let concurrency = clamp_concurrency(concurrency);

    stream::iter(files)
        .map(move |file| {
            let pipeline = Arc::clone(&pipeline);
            async move {
                let path = file.path().to_path_buf();
                match tokio::task::spawn_blocking(move || pipeline.process(&file)).await {
                    Ok(result) => result,
                    Err(e) => {
                        let error = RecordError::Worker {
                            path: path.clone(),
                            reason: e.to_string(),
                        };
                        BatchResult::failure(path, &error)
                    }
                }
            }
        })
        .buffer_unordered(concurrency)
}

/// Runs every file and gathers all results
pub async fn run_batch(
    pipeline: Arc<RecordPipeline>,
    files: Vec<CandidateFile>,
    concurrency: usize,
) -> Vec<BatchResult> {
    dispatch(pipeline, files, concurrency).collect().await
}
