//! Configuration schema types
//!
//! Every section is defaulted so an empty file is a valid configuration.

use crate::anonymization::config::AnonymizationConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upper bound for the worker pool size
pub const MAX_CONCURRENCY: usize = 64;

/// Main Scrubline configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrublineConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Input discovery settings
    #[serde(default)]
    pub input: InputConfig,

    /// Worker pool settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Output targets and aggregation
    #[serde(default)]
    pub output: OutputConfig,

    /// De-identification settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScrublineConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.processing.validate()?;
        self.output.validate()?;
        self.anonymization.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (log writes instead of performing them)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Input discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Record file extension, matched case-insensitively, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Maximum directory depth below the batch root (unlimited when unset)
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Batch size from which per-file detail logs give way to progress counts
    #[serde(default = "default_min_progress_report")]
    pub min_progress_report: usize,
}

impl InputConfig {
    fn validate(&self) -> Result<(), String> {
        let ext = self.extension.trim_start_matches('.');
        if ext.is_empty() {
            return Err("input.extension cannot be empty".to_string());
        }
        if ext.contains(['/', '\\']) {
            return Err(format!(
                "input.extension must be a bare extension, got '{}'",
                self.extension
            ));
        }
        Ok(())
    }

    /// Extension without a leading dot
    pub fn normalized_extension(&self) -> &str {
        self.extension.trim_start_matches('.')
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            max_depth: None,
            min_progress_report: default_min_progress_report(),
        }
    }
}

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Number of files processed in parallel
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl ProcessingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.concurrency == 0 || self.concurrency > MAX_CONCURRENCY {
            return Err(format!(
                "processing.concurrency must be between 1 and {MAX_CONCURRENCY}, got {}",
                self.concurrency
            ));
        }
        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Base directory for default output paths
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// Output specifiers (`json`, `csv=reports/x.csv`, `summary.html`, ...)
    #[serde(default)]
    pub targets: Vec<String>,

    /// Skip targets that already exist
    #[serde(default)]
    pub no_overwrite: bool,

    /// Rows between flushes of the streaming aggregate writers
    #[serde(default = "default_flush_interval")]
    pub flush_interval: usize,

    /// Buffer aggregates and write the union of all fields
    #[serde(default)]
    pub materialize_aggregates: bool,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.as_os_str().is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }
        if self.flush_interval == 0 {
            return Err("output.flush_interval must be > 0".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            targets: Vec::new(),
            no_overwrite: false,
            flush_interval: default_flush_interval(),
            materialize_aggregates: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }

    /// Console-only logging
    pub fn console_only() -> Self {
        Self {
            local_enabled: false,
            ..Self::default()
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_extension() -> String {
    "json".to_string()
}

fn default_min_progress_report() -> usize {
    50
}

fn default_concurrency() -> usize {
    4
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("./scrubline_reports")
}

fn default_flush_interval() -> usize {
    1000
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_valid() {
        let config: ScrublineConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.input.extension, "json");
        assert_eq!(config.processing.concurrency, 4);
        assert_eq!(config.output.flush_interval, 1000);
        assert_eq!(config.output.directory, PathBuf::from("./scrubline_reports"));
        assert!(!config.anonymization.enabled);
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_processing_concurrency_bounds() {
        let mut config = ProcessingConfig::default();
        config.concurrency = 0;
        assert!(config.validate().is_err());

        config.concurrency = MAX_CONCURRENCY;
        assert!(config.validate().is_ok());

        config.concurrency = MAX_CONCURRENCY + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_input_extension_normalization() {
        let config = InputConfig {
            extension: ".DCM".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.normalized_extension(), "DCM");

        let bad = InputConfig {
            extension: "a/b".to_string(),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_output_config_validation() {
        let mut config = OutputConfig::default();
        assert!(config.validate().is_ok());

        config.flush_interval = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());

        let bad = LoggingConfig {
            local_rotation: "weekly".to_string(),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_full_document() {
        let toml_content = r#"
[application]
log_level = "debug"
dry_run = true

[input]
extension = "dcm"
max_depth = 2

[processing]
concurrency = 8

[output]
directory = "/tmp/out"
targets = ["json", "agg-csv=combined.csv"]
materialize_aggregates = true

[anonymization]
enabled = true
mode = "pseudonymize"
"#;
        let config: ScrublineConfig = toml::from_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.application.log_level, "debug");
        assert!(config.application.dry_run);
        assert_eq!(config.input.max_depth, Some(2));
        assert_eq!(config.processing.concurrency, 8);
        assert_eq!(config.output.targets.len(), 2);
        assert!(config.output.materialize_aggregates);
        assert!(config.anonymization.enabled);
    }
}
