//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "donor-export.toml")]
    pub output: String,

    /// Include every option with explanatory comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing donor-export configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!(
                    "  1. Edit {} with your input and output paths",
                    self.output
                );
                println!("  2. Set BIGDATA_SALT in the environment or a .env file");
                println!("  3. Validate configuration: donor-export validate-config");
                println!("  4. Run export: donor-export export --dry-run");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# donor-export configuration

[application]
log_level = "info"
dry_run = false

[input]
control_table = "data/PHI-qualified-metadata.csv"
donor_csv_dir = "data/donor-csvs"
field_list = "data/dataFieldExportList.csv"

[export]
output_dir = "data/export"
format = "all"
date_filter = "except_uploads_and_settings"
remove_dates = []

[anonymization]
salt = "${BIGDATA_SALT}"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# donor-export configuration
#
# Every per-run export parameter lives in this file. Values of the form
# ${NAME} are replaced with environment variables when the file is loaded,
# and DONOR_EXPORT_<SECTION>_<KEY> variables override individual keys.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Run the whole pipeline without writing outputs or audit entries
dry_run = false

# ============================================================================
# Inputs
# ============================================================================
[input]
# Control table with userID, hashID, D.topTier and the tier date columns
control_table = "data/PHI-qualified-metadata.csv"

# Folder holding one PHI-{userID}.csv per donor
donor_csv_dir = "data/donor-csvs"

# Field list with dataFieldList, include and hashNeeded columns
field_list = "data/dataFieldExportList.csv"

# ============================================================================
# Export
# ============================================================================
[export]
# Folder receiving {tier}_{hashID}.json, .xlsx and -csvs/
output_dir = "data/export"

# Output formats: json | xlsx | csv | all
format = "all"

# Date window mode:
# - all_rows: every row is judged on `time`
# - except_uploads_and_settings: uploads, device events and pump settings are
#   always kept; other rows are judged on local_time_field
date_filter = "except_uploads_and_settings"

# Column holding the estimated local time
local_time_field = "est.localTime"

# Whole days to drop (YYYY-MM-DD)
remove_dates = []

# ============================================================================
# Cleaning rules
# ============================================================================
[transform]
# Rows with an estimated time gap above this many minutes are dropped
max_gap_minutes = 30.0

# Valid CGM range in mmol/L (38 and 402 mg/dL)
cgm_min_mmol = 2.109284236597303
cgm_max_mmol = 22.314006924003046

# Lift approved keys out of JSON-encoded cells before projecting fields
flatten_embedded_json = false

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Salt mixed into every hash (keep it out of this file)
salt = "${BIGDATA_SALT}"

# Number of hex characters kept from each SHA-256 digest
hash_length = 8

# Vendor prefixes stripped from annotation codes
manufacturers = ["animas/", "bayer/", "carelink/", "insulet/", "medtronic/", "tandem/"]

[anonymization.audit]
enabled = true
log_path = "./audit/anonymization.log"
json_format = true

# ============================================================================
# Logging
# ============================================================================
[logging]
# Enable local JSON file logging
local_enabled = false

# Folder receiving donor-export.log
local_path = "./logs"

# Rotation: daily | hourly | never
local_rotation = "daily"
"#
        .to_string()
    }
}
