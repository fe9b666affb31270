// Scrubline - Batch Record De-identification Tool
// Copyright (c) 2025 Scrubline Contributors
// Licensed under the MIT License

use clap::Parser;
use scrubline::cli::{Cli, Commands};
use scrubline::config::{load_config_or_default, LoggingConfig};
use scrubline::logging::{init_logging, resolve_log_level};
use std::process;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Level and file logging come from the config when it loads; commands
    // report configuration errors themselves
    let (configured_level, logging_config) = match load_config_or_default(cli.config.as_deref()) {
        Ok(config) => (config.application.log_level, config.logging),
        Err(_) => ("info".to_string(), LoggingConfig::console_only()),
    };
    let log_level = resolve_log_level(
        cli.log_level.as_deref(),
        cli.quiet,
        cli.verbose,
        &configured_level,
    );

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        "Scrubline - Batch Record De-identification Tool"
    );

    // Execute command and get exit code
    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    // The guard must flush before process::exit skips destructors
    drop(logging_guard);
    process::exit(exit_code);
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Process(args) => args.execute(config_path, cli.verbose).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
        Commands::CheckDeps(args) => args.execute().await,
        Commands::ExportSchema(args) => args.execute().await,
    }
}
