//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels (`--log-level`, `-q`, `-v`, `RUST_LOG`)
//! - Console output on stderr
//! - Local JSON file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use scrubline::logging::init_logging;
//! use scrubline::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, resolve_log_level, LoggingGuard};

/// Log the start of a batch
///
/// # Example
///
/// ```no_run
/// use scrubline::log_batch_start;
///
/// log_batch_start!("1f0c...", 250, 4);
/// ```
#[macro_export]
macro_rules! log_batch_start {
    ($run_id:expr, $total:expr, $concurrency:expr) => {
        tracing::info!(
            run_id = %$run_id,
            total_files = $total,
            concurrency = $concurrency,
            "Starting batch"
        );
    };
}

/// Log the completion of a batch
///
/// # Example
///
/// ```no_run
/// use scrubline::log_batch_complete;
/// use std::time::Duration;
///
/// log_batch_complete!(95, 5, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_batch_complete {
    ($successful:expr, $failed:expr, $duration:expr) => {
        tracing::info!(
            successful = $successful,
            failed = $failed,
            duration_ms = $duration.as_millis() as u64,
            "Batch completed"
        );
    };
}

/// Log aggregate progress of a batch
///
/// # Example
///
/// ```no_run
/// use scrubline::log_batch_progress;
///
/// log_batch_progress!(100, 1000, 3);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($processed:expr, $total:expr, $failed:expr) => {
        tracing::info!(
            processed = $processed,
            total = $total,
            failed = $failed,
            progress_pct = ($processed as f64 / ($total as f64).max(1.0) * 100.0),
            "Batch progress"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use scrubline::log_error_with_context;
/// use scrubline::domain::ScrublineError;
///
/// let error = ScrublineError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    #[test]
    fn test_macros_expand() {
        // No subscriber is installed, so these only have to expand and type-check
        log_batch_start!("run", 10usize, 4usize);
        log_batch_progress!(5usize, 10usize, 1usize);
        log_batch_complete!(9usize, 1usize, Duration::from_millis(20));
        log_error_with_context!("boom", "while testing");
    }
}
