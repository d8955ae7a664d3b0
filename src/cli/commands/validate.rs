//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the donor-export configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::{load_config, DonorExportConfig};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already substitutes variables and validates, so any load
    /// failure is reported as a configuration error.
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                print_summary(&config);
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG_ERROR)
            }
        }
    }
}

fn print_summary(config: &DonorExportConfig) {
    println!("Configuration Summary:");
    println!("  Log Level: {}", config.application.log_level);
    println!("  Dry Run: {}", config.application.dry_run);
    println!("  Control Table: {}", config.input.control_table.display());
    println!("  Donor CSV Folder: {}", config.input.donor_csv_dir.display());
    println!("  Field List: {}", config.input.field_list.display());
    println!("  Output Folder: {}", config.export.output_dir.display());
    println!("  Format: {}", config.export.format);
    println!("  Date Filter: {:?}", config.export.date_filter);
    println!("  Dates Removed: {}", config.export.remove_dates.len());
    println!("  Hash Length: {}", config.anonymization.hash_length);
    println!(
        "  Audit Log: {}",
        if config.anonymization.audit.enabled {
            config.anonymization.audit.log_path.display().to_string()
        } else {
            "disabled".to_string()
        }
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        let _ = format!("{args:?}");
    }

    #[test]
    fn test_validate_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("donor-export.toml");
        fs::write(
            &path,
            r#"
[input]
control_table = "control.csv"
donor_csv_dir = "donors"
field_list = "fields.csv"

[anonymization]
salt = "validate-test-salt"
"#,
        )
        .unwrap();

        let code = ValidateArgs {}.execute(path.to_str().unwrap()).unwrap();
        assert_eq!(code, EXIT_SUCCESS);
    }

    #[test]
    fn test_validate_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("donor-export.toml");
        fs::write(&path, "[input\ncontrol_table = ").unwrap();

        let code = ValidateArgs {}.execute(path.to_str().unwrap()).unwrap();
        assert_eq!(code, EXIT_CONFIG_ERROR);
    }
}
