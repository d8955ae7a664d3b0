//! Configuration schema types
//!
//! This module defines the configuration structure for donor-export.

use crate::anonymization::config::AnonymizationConfig;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Which output files to produce for each donor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// `{name}.json` only
    Json,
    /// `{name}.xlsx` only
    Xlsx,
    /// `{name}-csvs/` only
    Csv,
    /// All of the above
    #[default]
    All,
}

impl ExportFormat {
    pub fn wants_json(self) -> bool {
        matches!(self, Self::Json | Self::All)
    }

    pub fn wants_xlsx(self) -> bool {
        matches!(self, Self::Xlsx | Self::All)
    }

    pub fn wants_csv(self) -> bool {
        matches!(self, Self::Csv | Self::All)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Json => "json",
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
            Self::All => "all",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            "all" => Ok(Self::All),
            other => Err(format!(
                "Invalid export format '{other}'. Must be one of: json, xlsx, csv, all"
            )),
        }
    }
}

/// How the qualified date window is applied to a donor's rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DateFilterMode {
    /// Every row must fall inside the window, judged on `time`
    AllRows,
    /// Uploads, device events and pump settings are always kept; other rows
    /// are judged on the estimated local time
    #[default]
    ExceptUploadsAndSettings,
}

impl FromStr for DateFilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all_rows" => Ok(Self::AllRows),
            "except_uploads_and_settings" => Ok(Self::ExceptUploadsAndSettings),
            other => Err(format!(
                "Invalid date filter '{other}'. Must be one of: all_rows, except_uploads_and_settings"
            )),
        }
    }
}

/// Main donor-export configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DonorExportConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Static input files
    pub input: InputConfig,

    /// Output settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Cleaning rule parameters
    #[serde(default)]
    pub transform: TransformConfig,

    /// Salted hashing settings
    pub anonymization: AnonymizationConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DonorExportConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.input.validate()?;
        self.export.validate()?;
        self.transform.validate()?;
        self.anonymization
            .validate()
            .map_err(|e| format!("{e:#}"))?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (run the pipeline, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Static input files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Control table listing donors, tiers and qualified date ranges
    pub control_table: PathBuf,

    /// Folder holding one `PHI-{userID}.csv` per donor
    pub donor_csv_dir: PathBuf,

    /// Data field export list (`dataFieldList`, `include`, `hashNeeded`)
    pub field_list: PathBuf,
}

impl InputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.control_table.as_os_str().is_empty() {
            return Err("input.control_table cannot be empty".to_string());
        }
        if self.donor_csv_dir.as_os_str().is_empty() {
            return Err("input.donor_csv_dir cannot be empty".to_string());
        }
        if self.field_list.as_os_str().is_empty() {
            return Err("input.field_list cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Folder receiving the per-donor files
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Output formats
    #[serde(default)]
    pub format: ExportFormat,

    /// Date window mode
    #[serde(default)]
    pub date_filter: DateFilterMode,

    /// Column holding the estimated local time
    #[serde(default = "default_local_time_field")]
    pub local_time_field: String,

    /// Calendar days to drop entirely (`YYYY-MM-DD`)
    #[serde(default)]
    pub remove_dates: Vec<NaiveDate>,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.output_dir.as_os_str().is_empty() {
            return Err("export.output_dir cannot be empty".to_string());
        }
        if self.date_filter == DateFilterMode::ExceptUploadsAndSettings
            && self.local_time_field.trim().is_empty()
        {
            return Err(
                "export.local_time_field cannot be empty when date_filter = 'except_uploads_and_settings'"
                    .to_string(),
            );
        }
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            format: ExportFormat::default(),
            date_filter: DateFilterMode::default(),
            local_time_field: default_local_time_field(),
            remove_dates: Vec::new(),
        }
    }
}

/// Cleaning rule parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Rows whose local-time estimate was imputed across a gap longer than
    /// this many minutes are dropped
    #[serde(default = "default_max_gap_minutes")]
    pub max_gap_minutes: f64,

    /// Lowest plausible CGM reading, mmol/L (38 mg/dL)
    #[serde(default = "default_cgm_min_mmol")]
    pub cgm_min_mmol: f64,

    /// Highest plausible CGM reading, mmol/L (402 mg/dL)
    #[serde(default = "default_cgm_max_mmol")]
    pub cgm_max_mmol: f64,

    /// Expand JSON objects embedded in cells into `column.key` columns
    #[serde(default)]
    pub flatten_embedded_json: bool,
}

impl TransformConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_gap_minutes.is_nan() || self.max_gap_minutes < 0.0 {
            return Err(format!(
                "transform.max_gap_minutes must be >= 0, got {}",
                self.max_gap_minutes
            ));
        }
        if self.cgm_min_mmol.is_nan() || self.cgm_min_mmol >= self.cgm_max_mmol {
            return Err(format!(
                "transform.cgm_min_mmol ({}) must be below cgm_max_mmol ({})",
                self.cgm_min_mmol, self.cgm_max_mmol
            ));
        }
        Ok(())
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            max_gap_minutes: default_max_gap_minutes(),
            cgm_min_mmol: default_cgm_min_mmol(),
            cgm_max_mmol: default_cgm_max_mmol(),
            flatten_embedded_json: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./export")
}

fn default_local_time_field() -> String {
    "est.localTime".to_string()
}

fn default_max_gap_minutes() -> f64 {
    30.0
}

fn default_cgm_min_mmol() -> f64 {
    2.109284236597303
}

fn default_cgm_max_mmol() -> f64 {
    22.314006924003046
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig {
            log_level: "info".to_string(),
            dry_run: false,
        };

        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("XLSX".parse::<ExportFormat>().unwrap(), ExportFormat::Xlsx);
        assert_eq!(" all ".parse::<ExportFormat>().unwrap(), ExportFormat::All);
        assert!("parquet".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_format_selection() {
        assert!(ExportFormat::All.wants_json());
        assert!(ExportFormat::All.wants_xlsx());
        assert!(ExportFormat::All.wants_csv());
        assert!(ExportFormat::Json.wants_json());
        assert!(!ExportFormat::Json.wants_csv());
        assert!(!ExportFormat::Csv.wants_xlsx());
    }

    #[test]
    fn test_transform_defaults_match_mg_dl_bounds() {
        let config = TransformConfig::default();
        assert!((config.cgm_min_mmol * 18.01559 - 38.0).abs() < 0.01);
        assert!((config.cgm_max_mmol * 18.01559 - 402.0).abs() < 0.01);
        assert_eq!(config.max_gap_minutes, 30.0);
        assert!(!config.flatten_embedded_json);
    }

    #[test]
    fn test_transform_config_validation() {
        let mut config = TransformConfig::default();
        assert!(config.validate().is_ok());

        config.cgm_min_mmol = 30.0;
        assert!(config.validate().is_err());

        config = TransformConfig::default();
        config.max_gap_minutes = -1.0;
        assert!(config.validate().is_err());

        config.max_gap_minutes = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_requires_local_time_field() {
        let mut config = ExportConfig::default();
        assert!(config.validate().is_ok());

        config.local_time_field = String::new();
        assert!(config.validate().is_err());

        config.date_filter = DateFilterMode::AllRows;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_logging_config_validation() {
        let mut config = LoggingConfig::default();
        assert!(config.validate().is_ok());

        config.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_date_filter_mode_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: DateFilterMode,
        }
        let w: Wrapper = toml::from_str("mode = \"all_rows\"").unwrap();
        assert_eq!(w.mode, DateFilterMode::AllRows);
        let w: Wrapper = toml::from_str("mode = \"except_uploads_and_settings\"").unwrap();
        assert_eq!(w.mode, DateFilterMode::ExceptUploadsAndSettings);
    }

    #[test]
    fn test_date_filter_mode_from_str() {
        assert_eq!("ALL_ROWS".parse::<DateFilterMode>(), Ok(DateFilterMode::AllRows));
        assert_eq!(
            " except_uploads_and_settings".parse::<DateFilterMode>(),
            Ok(DateFilterMode::ExceptUploadsAndSettings)
        );
        assert!("window".parse::<DateFilterMode>().is_err());
    }
}
