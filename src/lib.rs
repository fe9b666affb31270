// Scrubline - Batch Record De-identification Tool
// Copyright (c) 2025 Scrubline Contributors
// Licensed under the MIT License

//! # Scrubline - Batch Record De-identification
//!
//! Scrubline processes large collections of structured records, one record
//! per file, optionally de-identifies selected fields, and writes per-file and
//! aggregated outputs without holding the collection in memory.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Discovering** record files under batch roots, depth-bounded
//! - **Processing** each file on a bounded worker pool with per-file failure isolation
//! - **De-identifying** fields with run-consistent keyed pseudonyms or removal
//! - **Aggregating** results into streaming CSV or JSON-array files
//!
//! ## Architecture
//!
//! Scrubline follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Scanning, routing, per-file pipeline, worker pool, aggregation
//! - [`anonymization`] - Key resolution, pseudonym backends, salt and mapping
//! - [`domain`] - Record types and the error taxonomy
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrubline::config::ScrublineConfig;
//! use scrubline::core::batch::{BatchCoordinator, InputSource};
//! use scrubline::core::capabilities::Capabilities;
//! use scrubline::core::pipeline::JsonRecordDecoder;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = ScrublineConfig::default();
//!     config.output.targets = vec!["json".into(), "agg-csv".into()];
//!     config.anonymization.enabled = true;
//!
//!     let coordinator = BatchCoordinator::new(config, Capabilities::detect(), Arc::new(JsonRecordDecoder));
//!     let summary = coordinator
//!         .execute(&InputSource::BatchRoots(vec![PathBuf::from("./records")]))
//!         .await?;
//!
//!     println!("Processed {} of {} files", summary.successful, summary.total_files);
//!     Ok(())
//! }
//! ```
//!
//! ## Pseudonymization
//!
//! Every field of every file in a run is keyed by one salt, so equal values
//! map to equal tokens across the whole batch:
//!
//! ```rust
//! use scrubline::anonymization::{AnonymizationEngine, AnonymizationMode, AnonymizationRequest};
//! use scrubline::anonymization::backend::KeyedHashBackend;
//! use scrubline::config::secret_string;
//! use std::sync::Arc;
//!
//! let engine = AnonymizationEngine::new(
//!     AnonymizationRequest {
//!         tags: vec!["patient_id".into()],
//!         mode: AnonymizationMode::Pseudonymize,
//!         salt: Some(secret_string("site-salt".into())),
//!     },
//!     Arc::new(KeyedHashBackend),
//! );
//! assert_eq!(engine.pseudonymize("P-1").unwrap(), engine.pseudonymize("P-1").unwrap());
//! ```
//!
//! ## Error Handling
//!
//! Setup and run-level operations return [`domain::ScrublineError`]. Problems
//! with a single file are [`domain::RecordError`]s, which never leave the
//! per-file pipeline; they become classified failures in the batch summary.
//!
//! ## Logging
//!
//! Scrubline uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(total_files = 120, "Starting batch");
//! warn!(path = "/data/a.json", "File skipped");
//! ```

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
