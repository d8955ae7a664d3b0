//! Audit logging module
//!
//! Records one line per anonymized donor with hashed identifiers.

pub mod logger;

pub use logger::AuditLogger;
