//! Core batch processing for Scrubline.
//!
//! # Modules
//!
//! - [`scan`] - Input file discovery
//! - [`routing`] - Output specifier parsing
//! - [`pipeline`] - Per-file decode, sanitize, anonymize and write
//! - [`batch`] - Worker pool, result collection and run coordination
//! - [`aggregate`] - Streaming and materialized aggregate writers
//! - [`capabilities`] - Optional-backend descriptor
//!
//! # Batch Workflow
//!
//! 1. **Discover**: scan batch roots or collect explicit paths
//! 2. **Route**: turn output specifiers into an [`routing::OutputPlan`]
//! 3. **Dispatch**: run each file through the pipeline on a bounded pool
//! 4. **Collect**: merge mapping fragments, stream records into aggregates
//! 5. **Persist**: write the pseudonym mapping
//! 6. **Report**: log the batch summary
//!
//! # Example
//!
//! ```rust,no_run
//! use scrubline::config::load_config;
//! use scrubline::core::batch::{BatchCoordinator, InputSource};
//! use scrubline::core::capabilities::Capabilities;
//! use scrubline::core::pipeline::JsonRecordDecoder;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("scrubline.toml")?;
//! let coordinator = BatchCoordinator::new(config, Capabilities::detect(), Arc::new(JsonRecordDecoder));
//!
//! let summary = coordinator
//!     .execute(&InputSource::BatchRoots(vec![PathBuf::from("./records")]))
//!     .await?;
//!
//! println!("Successful: {}", summary.successful);
//! println!("Failed: {}", summary.failed);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod batch;
pub mod capabilities;
pub mod pipeline;
pub mod routing;
pub mod scan;
