//! Domain models and types for donor-export.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`UserId`], [`HashId`], [`QualificationTier`])
//! - **The donor job** ([`DonorJob`]) read from the control table
//! - **Text dataframe helpers** ([`frame`]) every pipeline step works through
//! - **Python-style literal parsing** ([`literal`]) for embedded cell values
//! - **Error types** ([`DonorExportError`]) and the [`Result`] alias
//!
//! # Type Safety
//!
//! Identifiers are newtypes so a user ID can't be passed where the anonymous
//! hash ID is expected:
//!
//! ```rust
//! use donor_export::domain::{HashId, UserId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let user_id = UserId::new("0d4524bc11")?;
//! let hash_id = HashId::new("9f8e7d6c")?;
//!
//! // This won't compile:
//! // let wrong: HashId = user_id;
//! # Ok(())
//! # }
//! ```

pub mod donor;
pub mod errors;
pub mod frame;
pub mod ids;
pub mod literal;
pub mod result;

// Re-export commonly used types for convenience
pub use donor::DonorJob;
pub use errors::DonorExportError;
pub use ids::{HashId, QualificationTier, UserId};
pub use result::Result;
pub use frame::ROW_INDEX_COLUMN;
