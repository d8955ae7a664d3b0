//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Human-readable console output on stderr
//! - Configurable log levels, overridable through `RUST_LOG`
//! - JSON file logging with rotation
//!
//! User IDs are never logged; donors are identified by their output name.
//!
//! # Example
//!
//! ```no_run
//! use donor_export::logging::init_logging;
//! use donor_export::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(output_name = "D1_9f8e7d6c", "Processing donor");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use donor_export::log_error_with_context;
/// use donor_export::domain::DonorExportError;
///
/// let error = DonorExportError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
