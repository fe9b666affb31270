//! Process command implementation
//!
//! This module implements the `process` command, which runs a batch over
//! record files and writes the routed outputs.

use crate::anonymization::config::split_tags;
use crate::anonymization::AnonymizationMode;
use crate::config::{load_config_or_default, secret_string, ScrublineConfig, MAX_CONCURRENCY};
use crate::core::batch::{clamp_concurrency, BatchCoordinator, BatchSummary, InputSource};
use crate::core::capabilities::Capabilities;
use crate::core::pipeline::JsonRecordDecoder;
use crate::domain::ScrublineError;
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Failures listed after the summary
const MAX_LISTED_FAILURES: usize = 10;

/// Arguments for the process command
#[derive(Args, Debug, Default)]
pub struct ProcessArgs {
    /// Input files or directories; `-` reads paths from stdin
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Treat every path as a batch root directory
    #[arg(long)]
    pub batch: bool,

    /// Output specifier: a type (json, csv, agg-csv, ...), type=path, or a file name
    #[arg(short, long = "output", value_name = "SPEC")]
    pub outputs: Vec<String>,

    /// Directory for outputs without an explicit path
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Do not replace existing output files
    #[arg(long)]
    pub no_overwrite: bool,

    /// Log what would be written without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Enable anonymization of the configured tags
    #[arg(long)]
    pub anonymize: bool,

    /// Comma-separated field names to anonymize
    #[arg(long, value_name = "TAGS")]
    pub anonymize_tags: Option<String>,

    /// Anonymization mode (pseudonymize or remove)
    #[arg(long, value_name = "MODE")]
    pub anonymize_mode: Option<String>,

    /// Where to write the pseudonym mapping
    #[arg(long, value_name = "FILE")]
    pub anonymize_map: Option<PathBuf>,

    /// Salt for reproducible pseudonyms across runs
    #[arg(long, value_name = "SALT", env = "SCRUBLINE_ANONYMIZATION_SALT", hide_env_values = true)]
    pub anonymize_salt: Option<String>,

    /// Worker count (clamped to 1..=64)
    #[arg(short = 't', long)]
    pub threads: Option<usize>,

    /// Maximum directory depth below a batch root, inclusive
    ///
    /// Files directly inside the root are depth 0, so `--max-depth 1` also
    /// reads one level of subdirectories. Tools that count the root as depth 1
    /// need this value lowered by one.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Batch size above which per-file log lines are replaced by progress lines
    #[arg(long)]
    pub min_progress_report: Option<usize>,

    /// Record file extension
    #[arg(long)]
    pub extension: Option<String>,

    /// Buffer aggregates and write the union of all fields
    #[arg(long)]
    pub materialize: bool,
}

impl ProcessArgs {
    /// Execute the process command
    pub async fn execute(&self, config_path: Option<&Path>, verbose: u8) -> anyhow::Result<i32> {
        tracing::info!("Starting process command");

        let mut config = match load_config_or_default(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        if let Err(e) = self.apply_overrides(&mut config) {
            tracing::error!(error = %e, "Invalid command-line option");
            eprintln!("{e}");
            return Ok(2);
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        if config.application.dry_run {
            tracing::info!("Dry run mode enabled - no files will be written");
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        let capabilities =
            Capabilities::detect().with_materialized_aggregation(config.output.materialize_aggregates);
        let coordinator = BatchCoordinator::new(config, capabilities, Arc::new(JsonRecordDecoder))
            .with_detail_logging(verbose > 0);

        let source = if self.batch {
            InputSource::BatchRoots(self.paths.clone())
        } else {
            InputSource::Paths(self.paths.clone())
        };

        let summary = match coordinator.execute(&source).await {
            Ok(summary) => summary,
            Err(ScrublineError::Configuration(e)) => {
                tracing::error!(error = %e, "Configuration error");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
            Err(e) => {
                tracing::error!(error = %e, "Batch setup failed");
                eprintln!("Batch setup failed: {e}");
                return Ok(5);
            }
        };

        print_summary(&summary);
        Ok(0)
    }

    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut ScrublineConfig) -> Result<(), String> {
        if self.dry_run {
            config.application.dry_run = true;
        }
        if !self.outputs.is_empty() {
            config.output.targets = self.outputs.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if self.no_overwrite {
            config.output.no_overwrite = true;
        }
        if self.materialize {
            config.output.materialize_aggregates = true;
        }
        if let Some(threads) = self.threads {
            let clamped = clamp_concurrency(threads);
            if clamped != threads {
                tracing::warn!(
                    requested = threads,
                    used = clamped,
                    max = MAX_CONCURRENCY,
                    "Thread count clamped"
                );
            }
            config.processing.concurrency = clamped;
        }
        if let Some(depth) = self.max_depth {
            config.input.max_depth = Some(depth);
        }
        if let Some(threshold) = self.min_progress_report {
            config.input.min_progress_report = threshold;
        }
        if let Some(extension) = &self.extension {
            config.input.extension = extension.clone();
        }

        let anonymization = &mut config.anonymization;
        if self.anonymize {
            anonymization.enabled = true;
        }
        if let Some(tags) = &self.anonymize_tags {
            anonymization.tags = split_tags(tags);
        }
        if let Some(mode) = &self.anonymize_mode {
            anonymization.mode = mode.parse::<AnonymizationMode>()?;
        }
        if let Some(path) = &self.anonymize_map {
            anonymization.mapping_path = Some(path.clone());
        }
        if let Some(salt) = &self.anonymize_salt {
            anonymization.salt = Some(secret_string(salt.clone()));
        }

        Ok(())
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("📊 Batch Summary:");
    println!("  Run ID: {}", summary.run_id);
    println!("  Total Files: {}", summary.total_files);
    println!("  Successful: {}", summary.successful);
    println!("  Failed: {}", summary.failed);
    for (kind, count) in &summary.failures_by_kind {
        println!("    {kind}: {count}");
    }
    println!("  Outputs Written: {}", summary.outputs_written);
    if summary.output_failures > 0 {
        println!("  Output Failures: {}", summary.output_failures);
    }
    for report in &summary.aggregates {
        let state = if report.written { "written" } else { "not written" };
        println!(
            "  Aggregate {}: {} ({} records, {state})",
            report.kind,
            report.path.display(),
            report.records
        );
    }
    if summary.mapping_entries > 0 {
        println!("  Pseudonyms: {}", summary.mapping_entries);
    }
    if let Some(path) = &summary.mapping_path {
        println!("  Mapping File: {}", path.display());
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    if !summary.failures.is_empty() {
        println!("⚠️  Failed files:");
        for failure in summary.failures.iter().take(MAX_LISTED_FAILURES) {
            println!("  - {} ({}): {}", failure.path.display(), failure.kind, failure.message);
        }
        if summary.failures.len() > MAX_LISTED_FAILURES {
            println!("  ... and {} more", summary.failures.len() - MAX_LISTED_FAILURES);
        }
        println!();
    }

    if summary.is_successful() {
        println!("✅ Batch completed successfully!");
    } else {
        println!("⚠️  Batch completed with failures");
    }
}
