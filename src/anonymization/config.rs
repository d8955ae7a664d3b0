//! Anonymization configuration

use crate::config::SecretString;
use anyhow::{Context, Result};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Longest prefix a SHA-256 hex digest can provide
pub const MAX_HASH_LENGTH: usize = 64;

/// Vendor prefixes stripped from annotation codes (`tandem/bolus/...`)
pub const DEFAULT_MANUFACTURERS: [&str; 6] = [
    "animas/",
    "bayer/",
    "carelink/",
    "insulet/",
    "medtronic/",
    "tandem/",
];

/// Salted hashing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Salt appended to every hashed value, usually `"${BIGDATA_SALT}"`
    pub salt: SecretString,

    /// Number of hex characters kept from each digest
    #[serde(default = "default_hash_length")]
    pub hash_length: usize,

    /// Prefixes removed from annotation codes
    #[serde(default = "default_manufacturers")]
    pub manufacturers: Vec<String>,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AnonymizationConfig {
    /// Configuration with the given salt and default settings
    pub fn new(salt: SecretString) -> Self {
        Self {
            salt,
            hash_length: default_hash_length(),
            manufacturers: default_manufacturers(),
            audit: AuditConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.salt.expose_secret().is_empty() {
            anyhow::bail!("anonymization.salt cannot be empty");
        }

        if self.hash_length == 0 || self.hash_length > MAX_HASH_LENGTH {
            anyhow::bail!(
                "anonymization.hash_length must be between 1 and {}, got {}",
                MAX_HASH_LENGTH,
                self.hash_length
            );
        }

        if self.manufacturers.iter().any(|m| m.is_empty()) {
            anyhow::bail!("anonymization.manufacturers cannot contain empty entries");
        }

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DONOR_EXPORT_ANONYMIZATION_HASH_LENGTH") {
            self.hash_length = val
                .parse()
                .context("Invalid DONOR_EXPORT_ANONYMIZATION_HASH_LENGTH value")?;
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// One JSON object per line instead of plain text
    #[serde(default = "default_json_format")]
    pub json_format: bool,
}

fn default_hash_length() -> usize {
    8
}

fn default_manufacturers() -> Vec<String> {
    DEFAULT_MANUFACTURERS.iter().map(|m| m.to_string()).collect()
}

fn default_audit_enabled() -> bool {
    true
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/anonymization.log")
}

fn default_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            log_path: default_audit_log_path(),
            json_format: default_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("anonymization.audit.log_path cannot be empty when audit is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DONOR_EXPORT_ANONYMIZATION_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid DONOR_EXPORT_ANONYMIZATION_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("DONOR_EXPORT_ANONYMIZATION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        Ok(())
    }
}
