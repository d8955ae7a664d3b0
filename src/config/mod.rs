//! Configuration management for donor-export.
//!
//! # Overview
//!
//! donor-export is driven entirely by a TOML file. It supports:
//! - Environment variable substitution (`${VAR_NAME}`), which is how the
//!   hashing salt reaches the process
//! - Default values for optional settings
//! - `DONOR_EXPORT_<SECTION>_<KEY>` overrides
//! - Validation on load
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level, dry-run
//! - [`InputConfig`] - Control table, donor CSV folder, field list
//! - [`ExportConfig`] - Output folder, formats, date window mode, dates to remove
//! - [`TransformConfig`] - Cleaning rule parameters
//! - [`AnonymizationConfig`](crate::anonymization::AnonymizationConfig) - Salt, hash length, audit log
//! - [`LoggingConfig`] - Rotating JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [input]
//! control_table = "data/PHI-2018-02-28-qualified-metadata.csv"
//! donor_csv_dir = "data/donor-csvs"
//! field_list = "data/dataFieldExportList.csv"
//!
//! [export]
//! output_dir = "data/export"
//! format = "all"
//!
//! [anonymization]
//! salt = "${BIGDATA_SALT}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DateFilterMode, DonorExportConfig, ExportConfig, ExportFormat, InputConfig,
    LoggingConfig, TransformConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
