//! Configuration management for Scrubline.
//!
//! Scrubline reads an optional TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SCRUBLINE_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use scrubline::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("scrubline.toml")?;
//! println!("Workers: {}", config.processing.concurrency);
//! println!("Output: {}", config.output.directory.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level, dry run
//! - [`InputConfig`] - record extension, depth bound, progress threshold
//! - [`ProcessingConfig`] - worker pool size
//! - [`OutputConfig`] - output directory, targets, aggregation
//! - [`AnonymizationConfig`](crate::anonymization::AnonymizationConfig) - tags, mode, salt, mapping file
//! - [`LoggingConfig`] - optional rolling JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [input]
//! extension = "json"
//! max_depth = 3
//!
//! [processing]
//! concurrency = 8
//!
//! [output]
//! directory = "./scrubline_reports"
//! targets = ["json", "agg-csv"]
//!
//! [anonymization]
//! enabled = true
//! salt = "${SITE_SALT}"
//! mapping_path = "./scrubline_reports/mapping.json"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, InputConfig, LoggingConfig, OutputConfig, ProcessingConfig,
    ScrublineConfig, MAX_CONCURRENCY,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
