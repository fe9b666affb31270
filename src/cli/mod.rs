//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Scrubline using clap.

pub mod commands;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Scrubline - batch metadata extraction and de-identification
#[derive(Parser, Debug)]
#[command(name = "scrubline")]
#[command(version, about, long_about = None)]
#[command(author = "Scrubline Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long, env = "SCRUBLINE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "SCRUBLINE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// More output; -v keeps per-file lines for large batches, -vv enables debug
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process record files into per-file and aggregate outputs
    Process(commands::process::ProcessArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),

    /// Show which optional backends this build provides
    CheckDeps(commands::check_deps::CheckDepsArgs),

    /// Write the CSV column template for downstream datasets
    ExportSchema(commands::export_schema::ExportSchemaArgs),
}
