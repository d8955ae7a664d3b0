//! Main anonymization engine
//!
//! This module provides the [`AnonymizationEngine`] that applies every
//! de-identification rule to one donor's records and logs the result in the
//! audit log.
//!
//! # Architecture
//!
//! The engine coordinates four components:
//! - **Field hashing**: salted hash of each column flagged `hashNeeded`
//! - **Schedule names**: salted hash of user-typed schedule names
//! - **Annotation codes**: manufacturer prefixes removed
//! - **Audit Logger**: one entry per donor with a hashed user ID
//!
//! # Examples
//!
//! ```
//! use donor_export::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use donor_export::config::secret_string;
//! use polars::prelude::*;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut config = AnonymizationConfig::new(secret_string("pepper".to_string()));
//! config.audit.enabled = false;
//! let engine = AnonymizationEngine::new(config)?;
//!
//! let mut df = df!("deviceId" => ["tandem-123"])?;
//! let outcome = engine.anonymize(&mut df, "0d4524bc11", &["deviceId".to_string()])?;
//! assert_eq!(outcome.total_hashed_cells(), 1);
//! # Ok(())
//! # }
//! ```

use crate::anonymization::{
    annotations::ManufacturerStripper,
    audit::AuditLogger,
    config::AnonymizationConfig,
    hashing::{hash_with_salt, SaltedHasher},
    schedules::hash_schedule_names,
};
use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use secrecy::ExposeSecret;
use std::time::Instant;

/// What the engine changed in one donor's records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnonymizationOutcome {
    /// Cells hashed per field, in field-list order
    pub hashed_cells: Vec<(String, usize)>,
    /// Distinct schedule names replaced by their hash
    pub schedule_names_hashed: usize,
    /// Annotation code cells that lost a manufacturer prefix
    pub annotation_codes_rewritten: usize,
    pub processing_time_ms: u64,
}

impl AnonymizationOutcome {
    pub fn total_hashed_cells(&self) -> usize {
        self.hashed_cells.iter().map(|(_, n)| n).sum()
    }
}

/// Main anonymization engine
///
/// Holds the salt for the lifetime of a run. The salt never leaves the engine
/// except as input to the hash function.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    stripper: ManufacturerStripper,
    audit_logger: Option<AuditLogger>,
}

impl AnonymizationEngine {
    /// Create a new anonymization engine
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - The manufacturer pattern cannot be compiled
    /// - Audit logger initialization fails
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config
            .validate()
            .context("Invalid anonymization configuration")?;

        let stripper = ManufacturerStripper::new(&config.manufacturers)?;

        let audit_logger = if config.audit.enabled {
            Some(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
            )?)
        } else {
            None
        };

        Ok(Self {
            config,
            stripper,
            audit_logger,
        })
    }

    /// Anonymize one donor's records in place
    ///
    /// Applies, in order: salted hashing of `hash_fields`, schedule-name
    /// hashing, and manufacturer removal from annotation codes.
    pub fn anonymize(
        &self,
        df: &mut DataFrame,
        user_id: &str,
        hash_fields: &[String],
    ) -> Result<AnonymizationOutcome> {
        let start = Instant::now();
        let salt = self.config.salt.expose_secret();
        let hasher = SaltedHasher::new(salt.as_ref(), user_id, self.config.hash_length);

        let hashed_cells =
            hash_with_salt(df, hash_fields, &hasher).context("Failed to hash identifying fields")?;
        let schedule_names_hashed =
            hash_schedule_names(df, &hasher).context("Failed to hash schedule names")?;
        let annotation_codes_rewritten = self
            .stripper
            .remove_manufacturers_from_annotations_code(df)?;

        let outcome = AnonymizationOutcome {
            hashed_cells,
            schedule_names_hashed,
            annotation_codes_rewritten,
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        tracing::debug!(
            hashed_cells = outcome.total_hashed_cells(),
            schedule_names = outcome.schedule_names_hashed,
            annotation_codes = outcome.annotation_codes_rewritten,
            "Anonymized donor records"
        );

        Ok(outcome)
    }

    /// Append an audit entry for an exported donor
    pub fn record_audit(
        &self,
        output_name: &str,
        user_id: &str,
        rows_exported: usize,
        outcome: &AnonymizationOutcome,
    ) -> Result<()> {
        if let Some(ref logger) = self.audit_logger {
            logger.log_anonymization(output_name, user_id, rows_exported, outcome)?;
        }
        Ok(())
    }

    /// Check if audit logging is enabled
    pub fn is_audited(&self) -> bool {
        self.audit_logger.is_some()
    }
}
