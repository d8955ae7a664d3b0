// donor-export - anonymized export of donated diabetes device data
// Copyright (c) 2025 Donor Export Contributors
// Licensed under the BSD 2-Clause License

use clap::Parser;
use donor_export::cli::{Cli, Commands};
use donor_export::config::{load_config, LoggingConfig};
use donor_export::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    // This is optional - if .env doesn't exist, it's silently ignored
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let (log_level, logging_config) = logging_settings(&cli);
    let _guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "donor-export - anonymized donor data export"
    );

    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e:#}");
            5
        }
    };

    drop(_guard);
    process::exit(exit_code);
}

/// Picks the log level and file logging settings for this invocation
///
/// The export command honours the `[logging]` section of its configuration.
/// Other commands, and an export whose configuration does not load, log to
/// the console only; the command itself reports the configuration problem.
fn logging_settings(cli: &Cli) -> (String, LoggingConfig) {
    let console_only = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };

    let loaded = match cli.command {
        Commands::Export(_) => load_config(&cli.config).ok(),
        _ => None,
    };

    match loaded {
        Some(config) => (
            cli.log_level
                .clone()
                .unwrap_or(config.application.log_level),
            config.logging,
        ),
        None => (
            cli.log_level.clone().unwrap_or_else(|| "info".to_string()),
            console_only,
        ),
    }
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Export(args) => args.execute(&cli.config),
        Commands::ValidateConfig(args) => args.execute(&cli.config),
        Commands::Init(args) => args.execute(),
    }
}
