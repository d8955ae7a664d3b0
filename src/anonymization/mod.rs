//! Anonymization module for donor-export
//!
//! This module de-identifies a donor's device records before export.
//!
//! # Architecture
//!
//! The anonymization pipeline consists of:
//! - **Hashing**: `sha256(value + salt + user_id)` truncated to 8 hex chars
//! - **Schedules**: the same hash applied to user-named pump schedules
//! - **Annotations**: manufacturer prefixes removed from annotation codes
//! - **Audit**: structured log with a hashed user ID
//!
//! # Usage
//!
//! ```rust,ignore
//! use donor_export::anonymization::{AnonymizationEngine, AnonymizationConfig};
//!
//! let engine = AnonymizationEngine::new(config.anonymization.clone())?;
//! let outcome = engine.anonymize(&mut df, job.user_id.as_str(), &fields.hash)?;
//! ```

pub mod annotations;
pub mod audit;
pub mod config;
pub mod engine;
pub mod hashing;
pub mod schedules;

// Re-export main types
pub use config::{AnonymizationConfig, AuditConfig};
pub use engine::{AnonymizationEngine, AnonymizationOutcome};
pub use hashing::{hash_value, SaltedHasher};
