//! Audit logger for anonymization operations

use crate::anonymization::engine::AnonymizationOutcome;
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry, one per exported donor
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    output_name: String,
    /// SHA-256 of the user ID (never log the plaintext ID)
    user_id_hash: String,
    rows_exported: usize,
    hashed_cells: BTreeMap<String, usize>,
    schedule_names_hashed: usize,
    annotation_codes_rewritten: usize,
    processing_time_ms: u64,
}

/// Audit logger for anonymization operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
}

impl AuditLogger {
    /// Create a new audit logger, creating the log's directory
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create audit log directory: {}", parent.display())
            })?;
        }

        Ok(Self {
            log_path,
            json_format,
        })
    }

    /// Log the anonymization of one donor
    pub fn log_anonymization(
        &self,
        output_name: &str,
        user_id: &str,
        rows_exported: usize,
        outcome: &AnonymizationOutcome,
    ) -> Result<()> {
        let entry = AuditLogEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            output_name: output_name.to_string(),
            user_id_hash: self.hash_user_id(user_id),
            rows_exported,
            hashed_cells: outcome.hashed_cells.iter().cloned().collect(),
            schedule_names_hashed: outcome.schedule_names_hashed,
            annotation_codes_rewritten: outcome.annotation_codes_rewritten,
            processing_time_ms: outcome.processing_time_ms,
        };

        self.write_entry(&entry)
    }

    /// Hash a user ID using unsalted SHA-256
    fn hash_user_id(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Output: {} | Rows: {} | Hashed cells: {} | Schedule names: {} | Time: {}ms",
                entry.timestamp,
                entry.output_name,
                entry.rows_exported,
                entry.hashed_cells.values().sum::<usize>(),
                entry.schedule_names_hashed,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
