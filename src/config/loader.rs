//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DonorExportConfig;
use crate::domain::errors::DonorExportError;
use crate::domain::result::Result;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Prefix of environment variables that override configuration keys
pub const ENV_PREFIX: &str = "DONOR_EXPORT_";

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads and parses the TOML file
/// 2. Replaces ${VAR} references inside string values with environment variables
/// 3. Deserializes the result into DonorExportConfig
/// 4. Applies environment variable overrides (DONOR_EXPORT_* prefix)
/// 5. Validates the configuration
///
/// Substitution runs on parsed values, so a variable's text is taken as is:
/// quotes and backslashes in a salt are never read as TOML syntax.
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - A referenced environment variable is not set
/// - TOML parsing fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use donor_export::config::loader::load_config;
///
/// let config = load_config("donor-export.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DonorExportConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DonorExportError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DonorExportError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let mut document: toml::Value = toml::from_str(&contents)
        .map_err(|e| DonorExportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    resolve_env_vars(&mut document)?;

    let mut config: DonorExportConfig = document
        .try_into()
        .map_err(|e| DonorExportError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        DonorExportError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is a valid regex")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Every string value of the document is rewritten, including strings nested
/// in arrays and tables. Keys are left alone.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn resolve_env_vars(document: &mut toml::Value) -> Result<()> {
    let mut missing_vars = Vec::new();
    substitute_env_vars(document, &mut missing_vars);

    if !missing_vars.is_empty() {
        return Err(DonorExportError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(())
}

fn substitute_env_vars(value: &mut toml::Value, missing_vars: &mut Vec<String>) {
    match value {
        toml::Value::String(text) => {
            if env_var_pattern().is_match(text) {
                *text = substitute_in_text(text, missing_vars);
            }
        }
        toml::Value::Array(items) => {
            for item in items {
                substitute_env_vars(item, missing_vars);
            }
        }
        toml::Value::Table(table) => {
            for (_, item) in table.iter_mut() {
                substitute_env_vars(item, missing_vars);
            }
        }
        _ => {}
    }
}

fn substitute_in_text(text: &str, missing_vars: &mut Vec<String>) -> String {
    env_var_pattern()
        .replace_all(text, |caps: &Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}

fn env(key: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{key}")).ok()
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| {
        DonorExportError::Configuration(format!("Invalid value for {ENV_PREFIX}{key}: '{raw}'"))
    })
}

/// Comma-separated `YYYY-MM-DD` list; an empty value clears the list
fn parse_date_list(key: &str, raw: &str) -> Result<Vec<NaiveDate>> {
    raw.split(',')
        .map(str::trim)
        .filter(|day| !day.is_empty())
        .map(|day| parse_env(key, day))
        .collect()
}

/// Applies environment variable overrides using the DONOR_EXPORT_* prefix
///
/// Environment variables follow the pattern: DONOR_EXPORT_<SECTION>_<KEY>
/// For example: DONOR_EXPORT_EXPORT_FORMAT, DONOR_EXPORT_INPUT_FIELD_LIST
fn apply_env_overrides(config: &mut DonorExportConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env("APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = env("APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("APPLICATION_DRY_RUN", &val)?;
    }

    // Input overrides
    if let Some(val) = env("INPUT_CONTROL_TABLE") {
        config.input.control_table = PathBuf::from(val);
    }
    if let Some(val) = env("INPUT_DONOR_CSV_DIR") {
        config.input.donor_csv_dir = PathBuf::from(val);
    }
    if let Some(val) = env("INPUT_FIELD_LIST") {
        config.input.field_list = PathBuf::from(val);
    }

    // Export overrides
    if let Some(val) = env("EXPORT_OUTPUT_DIR") {
        config.export.output_dir = PathBuf::from(val);
    }
    if let Some(val) = env("EXPORT_FORMAT") {
        config.export.format = val.parse().map_err(DonorExportError::Configuration)?;
    }
    if let Some(val) = env("EXPORT_DATE_FILTER") {
        config.export.date_filter = val.parse().map_err(DonorExportError::Configuration)?;
    }
    if let Some(val) = env("EXPORT_LOCAL_TIME_FIELD") {
        config.export.local_time_field = val;
    }
    if let Some(val) = env("EXPORT_REMOVE_DATES") {
        config.export.remove_dates = parse_date_list("EXPORT_REMOVE_DATES", &val)?;
    }

    // Transform overrides
    if let Some(val) = env("TRANSFORM_MAX_GAP_MINUTES") {
        config.transform.max_gap_minutes = parse_env("TRANSFORM_MAX_GAP_MINUTES", &val)?;
    }
    if let Some(val) = env("TRANSFORM_CGM_MIN_MMOL") {
        config.transform.cgm_min_mmol = parse_env("TRANSFORM_CGM_MIN_MMOL", &val)?;
    }
    if let Some(val) = env("TRANSFORM_CGM_MAX_MMOL") {
        config.transform.cgm_max_mmol = parse_env("TRANSFORM_CGM_MAX_MMOL", &val)?;
    }
    if let Some(val) = env("TRANSFORM_FLATTEN_EMBEDDED_JSON") {
        config.transform.flatten_embedded_json =
            parse_env("TRANSFORM_FLATTEN_EMBEDDED_JSON", &val)?;
    }

    // Anonymization overrides
    config
        .anonymization
        .apply_env_overrides()
        .map_err(|e| DonorExportError::Configuration(format!("{e:#}")))?;

    // Logging overrides
    if let Some(val) = env("LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = env("LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env("LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val.trim().to_lowercase();
    }

    Ok(())
}
