//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "scrubline.toml")]
    pub output: PathBuf,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let output = self.output.display();
        tracing::info!(output = %output, "Initializing configuration file");

        println!("📝 Initializing Scrubline configuration");
        println!();

        if self.output.exists() && !self.force {
            println!("❌ Configuration file already exists: {output}");
            println!("   Use --force to overwrite");
            return Ok(2); // Configuration error exit code
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {output}");
                println!();
                println!("Next steps:");
                println!("  1. Edit {output} with your settings");
                println!("  2. Put the anonymization salt in .env as SCRUBLINE_ANONYMIZATION_SALT");
                println!("  3. Validate configuration: scrubline -c {output} validate-config");
                println!("  4. Run a batch: scrubline -c {output} process --batch ./records");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5) // Fatal error exit code
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Scrubline Configuration File

[application]
log_level = "info"
dry_run = false

[input]
extension = "json"

[processing]
concurrency = 4

[output]
directory = "./scrubline_reports"
targets = ["json", "agg-csv"]

[anonymization]
enabled = false
mode = "pseudonymize"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Scrubline Configuration File
# Every section is optional; omitted keys take the defaults shown here.
# Values of the form ${VAR} are read from the environment (or .env).
# Any key can also be overridden with SCRUBLINE_<SECTION>_<KEY>.

[application]
# trace | debug | info | warn | error
log_level = "info"
# Log every write instead of performing it
dry_run = false

[input]
# Record file extension, matched case-insensitively
extension = "json"
# Depth below a batch root; 0 = files directly in the root. Omit for unlimited.
# max_depth = 2
# Batches larger than this log progress counts instead of one line per file
min_progress_report = 50

[processing]
# Parallel workers, 1..=64
concurrency = 4

[output]
directory = "./scrubline_reports"
# Output specifiers:
#   type            json csv html fhir image thumbnail report agg-csv agg-json
#   type=path       explicit destination, e.g. "agg-csv=reports/all.csv"
#   file name       type implied by extension, e.g. "summary.html"
targets = ["json", "agg-csv", "agg-json"]
# Leave existing files alone
no_overwrite = false
# Aggregate rows between flushes
flush_interval = 1000
# Buffer aggregates and use the union of all fields instead of the first record's
materialize_aggregates = false

[anonymization]
enabled = true
# pseudonymize | remove
mode = "pseudonymize"
tags = [
    "patient_name",
    "patient_id",
    "patient_birth_date",
    "accession_number",
    "institution_name",
]
# Stable pseudonyms across runs need a fixed salt; without one a salt is
# generated per run and stored in the mapping file.
# The salt can also come from SCRUBLINE_ANONYMIZATION_SALT (or .env).
# salt = "change-me"
mapping_path = "./scrubline_reports/pseudonym_mapping.json"
# PBKDF2 backend when the build provides it
prefer_hardened = true
kdf_iterations = 100000
token_bytes = 12

[logging]
# JSON log file with rotation (daily | hourly | never)
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }
}
