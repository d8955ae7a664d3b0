//! Result type alias for donor-export
//!
//! This module provides a convenient Result type alias that uses
//! [`DonorExportError`] as the error type.

use super::errors::DonorExportError;

/// Result type alias for donor-export operations
///
/// # Examples
///
/// ```
/// use donor_export::domain::result::Result;
/// use donor_export::domain::errors::DonorExportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(DonorExportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DonorExportError>;
