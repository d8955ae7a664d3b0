//! Core business logic for donor-export.
//!
//! # Modules
//!
//! - [`export`] - Pipeline, per-type bundling, coordination and reporting
//! - [`transform`] - Row filters, cleaning rules and JSON flattening
//!
//! # Export Workflow
//!
//! 1. **Load inputs**: Field list and control table
//! 2. **Filter**: Local-time quality, qualified window, excluded days
//! 3. **Clean**: Approved fields only, negative durations, CGM range, Tandem fix
//! 4. **Anonymize**: Salted hashes, schedule names, manufacturer names
//! 5. **Bundle**: One dataframe per record type, wizard merged into bolus
//! 6. **Write**: JSON, XLSX and CSV
//! 7. **Report**: Export summary and audit log
//!
//! # Example
//!
//! ```rust,no_run
//! use donor_export::config::load_config;
//! use donor_export::core::export::ExportCoordinator;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("donor-export.toml")?;
//!
//! let coordinator = ExportCoordinator::new(config)?;
//! let summary = coordinator.execute_export()?;
//!
//! println!("Processed: {}", summary.donors_processed);
//! println!("Skipped: {}", summary.donors_skipped());
//! # Ok(())
//! # }
//! ```

pub mod export;
pub mod transform;
