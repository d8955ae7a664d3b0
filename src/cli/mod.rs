//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for donor-export using clap.
//! Per-run export parameters live in the configuration file; the CLI only
//! picks the file, the log level and the command.

pub mod commands;

use clap::{Parser, Subcommand};

/// donor-export - anonymized export of donated diabetes device data
#[derive(Parser, Debug)]
#[command(name = "donor-export")]
#[command(version, about, long_about = None)]
#[command(author = "Donor Export Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "donor-export.toml", env = "DONOR_EXPORT_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DONOR_EXPORT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize and export every qualified donor in the control table
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_export() {
        let cli = Cli::parse_from(["donor-export", "export"]);
        assert_eq!(cli.config, "donor-export.toml");
        assert!(matches!(cli.command, Commands::Export(_)));
    }

    #[test]
    fn test_cli_parse_export_dry_run() {
        let cli = Cli::parse_from(["donor-export", "export", "--dry-run"]);
        match cli.command {
            Commands::Export(args) => assert!(args.dry_run),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["donor-export", "--config", "custom.toml", "export"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["donor-export", "--log-level", "debug", "export"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["donor-export", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["donor-export", "init", "--force"]);
        match cli.command {
            Commands::Init(args) => {
                assert!(args.force);
                assert_eq!(args.output, "donor-export.toml");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
