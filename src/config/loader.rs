//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::ScrublineConfig;
use crate::domain::errors::ScrublineError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into ScrublineConfig
/// 4. Applies environment variable overrides (SCRUBLINE_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use scrubline::config::loader::load_config;
///
/// let config = load_config("scrubline.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ScrublineConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ScrublineError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ScrublineError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let config: ScrublineConfig = toml::from_str(&contents)
        .map_err(|e| ScrublineError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(config)
}

/// Loads the configuration file if one is given, otherwise starts from defaults
///
/// Environment overrides and validation apply in both cases.
pub fn load_config_or_default(path: Option<&Path>) -> Result<ScrublineConfig> {
    match path {
        Some(path) => load_config(path),
        None => finish(ScrublineConfig::default()),
    }
}

fn finish(mut config: ScrublineConfig) -> Result<ScrublineConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        ScrublineError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ScrublineError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        // Placeholders in comments are left alone
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ScrublineError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn parse_env<T: std::str::FromStr>(name: &str, val: &str) -> Result<T> {
    val.parse()
        .map_err(|_| ScrublineError::Configuration(format!("Invalid {name} value: '{val}'")))
}

/// Applies environment variable overrides using SCRUBLINE_* prefix
///
/// Environment variables follow the pattern: SCRUBLINE_<SECTION>_<KEY>
/// For example: SCRUBLINE_PROCESSING_CONCURRENCY, SCRUBLINE_OUTPUT_DIRECTORY
fn apply_env_overrides(config: &mut ScrublineConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("SCRUBLINE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("SCRUBLINE_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("SCRUBLINE_APPLICATION_DRY_RUN", &val)?;
    }

    // Input overrides
    if let Ok(val) = std::env::var("SCRUBLINE_INPUT_EXTENSION") {
        config.input.extension = val;
    }
    if let Ok(val) = std::env::var("SCRUBLINE_INPUT_MAX_DEPTH") {
        config.input.max_depth = Some(parse_env("SCRUBLINE_INPUT_MAX_DEPTH", &val)?);
    }
    if let Ok(val) = std::env::var("SCRUBLINE_INPUT_MIN_PROGRESS_REPORT") {
        config.input.min_progress_report = parse_env("SCRUBLINE_INPUT_MIN_PROGRESS_REPORT", &val)?;
    }

    // Processing overrides
    if let Ok(val) = std::env::var("SCRUBLINE_PROCESSING_CONCURRENCY") {
        config.processing.concurrency = parse_env("SCRUBLINE_PROCESSING_CONCURRENCY", &val)?;
    }

    // Output overrides
    if let Ok(val) = std::env::var("SCRUBLINE_OUTPUT_DIRECTORY") {
        config.output.directory = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("SCRUBLINE_OUTPUT_TARGETS") {
        config.output.targets = val
            .split([',', ';'])
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Ok(val) = std::env::var("SCRUBLINE_OUTPUT_NO_OVERWRITE") {
        config.output.no_overwrite = parse_env("SCRUBLINE_OUTPUT_NO_OVERWRITE", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBLINE_OUTPUT_FLUSH_INTERVAL") {
        config.output.flush_interval = parse_env("SCRUBLINE_OUTPUT_FLUSH_INTERVAL", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBLINE_OUTPUT_MATERIALIZE_AGGREGATES") {
        config.output.materialize_aggregates =
            parse_env("SCRUBLINE_OUTPUT_MATERIALIZE_AGGREGATES", &val)?;
    }

    // Anonymization overrides
    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| ScrublineError::Configuration(format!("{e:#}")))?;

    // Logging overrides
    if let Ok(val) = std::env::var("SCRUBLINE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("SCRUBLINE_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("SCRUBLINE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("SCRUBLINE_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
