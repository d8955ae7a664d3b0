//! Domain error types
//!
//! This module defines the error hierarchy for donor-export.
//! All errors are domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main donor-export error type
///
/// This is the primary error type used throughout the library.
/// Third-party errors (polars, xlsx, serde) are converted into it at the boundary.
#[derive(Debug, Error)]
pub enum DonorExportError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Errors in the static inputs (control table, field list, donor CSV)
    #[error("Input error: {0}")]
    Input(String),

    /// Errors raised while transforming a donor table
    #[error("Transform error: {0}")]
    Transform(String),

    /// Errors raised while hashing identifying fields
    #[error("Anonymization error: {0}")]
    Anonymization(String),

    /// Errors raised while writing output files
    #[error("Export error: {0}")]
    Export(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Dataframe reading, writing and reshaping errors
    #[error("Dataframe error: {0}")]
    Frame(String),

    /// Spreadsheet writing errors
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for DonorExportError {
    fn from(err: std::io::Error) -> Self {
        DonorExportError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for DonorExportError {
    fn from(err: serde_json::Error) -> Self {
        DonorExportError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for DonorExportError {
    fn from(err: toml::de::Error) -> Self {
        DonorExportError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<polars::prelude::PolarsError> for DonorExportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        DonorExportError::Frame(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for DonorExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        DonorExportError::Spreadsheet(err.to_string())
    }
}
