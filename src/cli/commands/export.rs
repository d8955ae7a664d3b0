//! Export command implementation
//!
//! This module implements the `export` command, which runs every qualified
//! donor of the control table through the anonymization pipeline.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use crate::config::load_config;
use crate::core::export::{ExportCoordinator, ExportSummary};
use crate::domain::DonorExportError;
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Dry run mode - run the pipeline without writing any output or audit entry
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    /// Execute the export command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if config.application.dry_run {
            println!("🔍 DRY RUN MODE - No files will be written");
            println!();
        }

        let coordinator = match ExportCoordinator::new(config) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        println!("🚀 Starting export...");
        println!();

        let summary = match coordinator.execute_export() {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(&e, "Export failed");
                eprintln!("Export failed: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        print_summary(&summary);
        println!("✅ Export completed successfully!");
        Ok(EXIT_SUCCESS)
    }
}

fn exit_code_for(error: &DonorExportError) -> i32 {
    match error {
        DonorExportError::Configuration(_) | DonorExportError::Validation(_) => EXIT_CONFIG_ERROR,
        _ => EXIT_FATAL,
    }
}

fn print_summary(summary: &ExportSummary) {
    println!("📊 Export Summary:");
    println!("  Qualified donors: {}", summary.donors_qualified);
    println!("  Processed: {}", summary.donors_processed);
    println!("  Skipped (no data file): {}", summary.donors_skipped());
    println!("  Rows exported: {}", summary.total_rows_exported);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    if !summary.skipped.is_empty() {
        println!("⚠️  Skipped donors:");
        for name in &summary.skipped {
            println!("  - {name}");
        }
        println!();
    }

    for report in &summary.reports {
        if report.files_written.is_empty() {
            continue;
        }
        println!("  {}:", report.output_name);
        for path in &report.files_written {
            println!("    {}", path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_export_args_defaults() {
        let args = ExportArgs::default();
        assert!(!args.dry_run);
    }

    #[test]
    fn test_exit_code_for_errors() {
        assert_eq!(
            exit_code_for(&DonorExportError::Configuration("bad".into())),
            EXIT_CONFIG_ERROR
        );
        assert_eq!(
            exit_code_for(&DonorExportError::Validation("bad".into())),
            EXIT_CONFIG_ERROR
        );
        assert_eq!(
            exit_code_for(&DonorExportError::Input("missing".into())),
            EXIT_FATAL
        );
    }

    #[test]
    fn test_missing_config_is_configuration_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let code = ExportArgs { dry_run: true }
            .execute(path.to_str().unwrap())
            .unwrap();

        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
