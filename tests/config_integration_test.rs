//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold ENV_MUTEX so they do not
//! interfere with each other.

use scrubline::anonymization::AnonymizationMode;
use scrubline::config::{load_config, load_config_or_default};
use secrecy::ExposeSecret;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    for name in [
        "SCRUBLINE_APPLICATION_LOG_LEVEL",
        "SCRUBLINE_APPLICATION_DRY_RUN",
        "SCRUBLINE_PROCESSING_CONCURRENCY",
        "SCRUBLINE_OUTPUT_TARGETS",
        "SCRUBLINE_ANONYMIZATION_ENABLED",
        "SCRUBLINE_ANONYMIZATION_TAGS",
        "SCRUBLINE_ANONYMIZATION_SALT",
        "TEST_SCRUBLINE_SALT",
    ] {
        std::env::remove_var(name);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config(
        r#"
[application]
log_level = "debug"
dry_run = true

[input]
extension = "rec"
max_depth = 2
min_progress_report = 10

[processing]
concurrency = 16

[output]
directory = "/tmp/scrubline-out"
targets = ["json", "agg-csv=all/combined.csv"]
no_overwrite = true
flush_interval = 250
materialize_aggregates = true

[anonymization]
enabled = true
mode = "remove"
tags = ["patient_name", "patient_id"]
mapping_path = "/tmp/scrubline-out/mapping.json"
kdf_iterations = 5000

[logging]
local_enabled = true
local_path = "/tmp/scrubline-logs"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "debug");
    assert!(config.application.dry_run);
    assert_eq!(config.input.extension, "rec");
    assert_eq!(config.input.max_depth, Some(2));
    assert_eq!(config.input.min_progress_report, 10);
    assert_eq!(config.processing.concurrency, 16);
    assert_eq!(config.output.directory, PathBuf::from("/tmp/scrubline-out"));
    assert_eq!(config.output.targets.len(), 2);
    assert!(config.output.no_overwrite);
    assert_eq!(config.output.flush_interval, 250);
    assert!(config.output.materialize_aggregates);
    assert!(config.anonymization.enabled);
    assert_eq!(config.anonymization.mode, AnonymizationMode::Remove);
    assert_eq!(config.anonymization.tags, vec!["patient_name", "patient_id"]);
    assert_eq!(config.anonymization.kdf_iterations, 5000);
    assert!(config.logging.local_enabled);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_minimal_config_uses_defaults() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[processing]\nconcurrency = 2\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.processing.concurrency, 2);
    assert_eq!(config.application.log_level, "info");
    assert_eq!(config.input.extension, "json");
    assert_eq!(config.input.max_depth, None);
    assert!(config.output.targets.is_empty());
    assert!(!config.anonymization.enabled);
}

#[test]
fn test_salt_substituted_from_environment() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_SCRUBLINE_SALT", "from-env");

    let file = write_config(
        r#"
[anonymization]
enabled = true
salt = "${TEST_SCRUBLINE_SALT}"
"#,
    );
    let config = load_config(file.path()).unwrap();

    let salt = config.anonymization.salt.as_ref().unwrap();
    assert_eq!(salt.expose_secret(), "from-env");
    cleanup_env_vars();
}

#[test]
fn test_missing_substitution_variable_fails() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[anonymization]\nsalt = \"${TEST_SCRUBLINE_SALT}\"\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("TEST_SCRUBLINE_SALT"));
}

#[test]
fn test_env_overrides_apply_over_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("SCRUBLINE_PROCESSING_CONCURRENCY", "12");
    std::env::set_var("SCRUBLINE_OUTPUT_TARGETS", "csv;agg-json");
    std::env::set_var("SCRUBLINE_ANONYMIZATION_ENABLED", "true");
    std::env::set_var("SCRUBLINE_ANONYMIZATION_TAGS", "patient_id, accession_number");

    let file = write_config("[processing]\nconcurrency = 2\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.processing.concurrency, 12);
    assert_eq!(config.output.targets, vec!["csv", "agg-json"]);
    assert!(config.anonymization.enabled);
    assert_eq!(config.anonymization.tags, vec!["patient_id", "accession_number"]);
    cleanup_env_vars();
}

#[test]
fn test_env_overrides_apply_without_file() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("SCRUBLINE_APPLICATION_DRY_RUN", "true");

    let config = load_config_or_default(None).unwrap();

    assert!(config.application.dry_run);
    cleanup_env_vars();
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("SCRUBLINE_PROCESSING_CONCURRENCY", "many");

    let result = load_config_or_default(None);

    assert!(result.is_err());
    cleanup_env_vars();
}

#[test]
fn test_validation_rejects_out_of_range_concurrency() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[processing]\nconcurrency = 65\n");
    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("processing.concurrency"));
}

#[test]
fn test_validation_rejects_bad_log_level() {
    let _guard = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_config("[application]\nlog_level = \"loud\"\n");

    assert!(load_config(file.path()).is_err());
}

#[test]
fn test_missing_file_is_configuration_error() {
    let result = load_config("/nonexistent/scrubline.toml");
    assert!(matches!(
        result,
        Err(scrubline::domain::ScrublineError::Configuration(_))
    ));
}
