//! Subscriber setup for console and JSON file logging
//!
//! Console output goes to stderr so stdout stays free for command output. An
//! optional JSON file layer writes to a rolling log file.
//!
//! # Example
//!
//! ```no_run
//! use scrubline::logging::init_logging;
//! use scrubline::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//! ```

use crate::config::LoggingConfig;
use crate::domain::{Result, ScrublineError};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// File name prefix of the rolling log
pub const LOG_FILE_PREFIX: &str = "scrubline.log";

/// Flushes the file writer when dropped
#[must_use = "dropping the guard stops file logging"]
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Installs the global subscriber
///
/// `RUST_LOG` takes precedence over `level`; otherwise only this crate's
/// events at `level` and above are shown. Keep the returned guard alive until
/// exit or buffered file output is lost.
pub fn init_logging(level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(level)?;
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("scrubline={level}")))
    };

    let console: BoxedLayer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter())
        .boxed();
    let mut layers = vec![console];

    let file_guard = match json_file_layer(config, filter())? {
        Some((layer, guard)) => {
            layers.push(layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| ScrublineError::Configuration(format!("Failed to install logger: {e}")))?;

    tracing::debug!(
        file_logging = config.local_enabled,
        directory = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard { _file_guard: file_guard })
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Rolling JSON file output, one object per event
fn json_file_layer(
    config: &LoggingConfig,
    filter: EnvFilter,
) -> Result<Option<(BoxedLayer, WorkerGuard)>> {
    if !config.local_enabled {
        return Ok(None);
    }

    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        ScrublineError::Configuration(format!(
            "Cannot create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let appender = RollingFileAppender::new(
        parse_rotation(&config.local_rotation),
        &config.local_path,
        LOG_FILE_PREFIX,
    );
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok(Some((layer, guard)))
}

/// Picks the effective log level from command-line flags and configuration
///
/// An explicit level wins, then `-q`, then the verbosity count, then the
/// configured level.
pub fn resolve_log_level(
    explicit: Option<&str>,
    quiet: bool,
    verbose: u8,
    configured: &str,
) -> String {
    if let Some(level) = explicit {
        return level.to_string();
    }
    if quiet {
        return "warn".to_string();
    }
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        other => Err(ScrublineError::Configuration(format!(
            "Unknown log level '{other}', expected trace, debug, info, warn or error"
        ))),
    }
}
