//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Scrubline configuration file.

use crate::config::{load_config_or_default, ScrublineConfig};
use crate::core::routing::route;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let shown = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string());
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration: {shown}");
        println!();

        // Loading already validates; the error names the offending field
        let config = match load_config_or_default(config_path) {
            Ok(c) => {
                println!("✅ Configuration loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(2); // Configuration error exit code
            }
        };

        print_config_summary(&config);
        Ok(0)
    }
}

fn print_config_summary(config: &ScrublineConfig) {
    println!();
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Record Extension: .{}", config.input.normalized_extension());
    println!(
        "  Max Depth: {}",
        config
            .input
            .max_depth
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unlimited".to_string())
    );
    println!("  Concurrency: {}", config.processing.concurrency);
    println!("  Output Directory: {}", config.output.directory.display());

    let plan = route(&config.output.targets, &config.output.directory);
    let kinds: Vec<&str> = plan.kinds().map(|k| k.as_str()).collect();
    println!("  Outputs: {kinds:?}");
    for warning in plan.warnings() {
        println!("  ⚠️  {warning}");
    }

    let anonymization = &config.anonymization;
    println!("  Anonymization: {}", if anonymization.enabled { "enabled" } else { "disabled" });
    if anonymization.enabled {
        println!("    Mode: {}", anonymization.mode);
        println!("    Tags: {}", anonymization.tags.len());
        println!(
            "    Salt: {}",
            if anonymization.salt.is_some() { "operator supplied" } else { "generated per run" }
        );
        if let Some(path) = &anonymization.mapping_path {
            println!("    Mapping File: {}", path.display());
        }
    }
    println!();
}
