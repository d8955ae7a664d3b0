// donor-export - anonymized export of donated diabetes device data
// Copyright (c) 2025 Donor Export Contributors
// Licensed under the BSD 2-Clause License

//! # donor-export
//!
//! donor-export is a batch tool that turns the raw device data of each
//! qualified donor into de-identified, schema-restricted files for research.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Filtering** rows by local-time quality, qualified date window and
//!   excluded days
//! - **Cleaning** records: approved fields only, negative durations, CGM
//!   readings outside the sensor range, the Tandem calibration unit bug
//! - **Anonymizing** identifying fields with salted SHA-256 hashes, including
//!   pump schedule names and manufacturer prefixes in annotation codes
//! - **Exporting** one polars dataframe per record type as JSON, XLSX and CSV
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform rules, export pipeline)
//! - [`anonymization`] - Salted hashing, schedule names, annotation codes, audit log
//! - [`adapters`] - CSV inputs and JSON/XLSX/CSV outputs
//! - [`domain`] - Core domain types: errors, identifiers, dataframe helpers, donor jobs
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use donor_export::config::load_config;
//! use donor_export::core::export::ExportCoordinator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("donor-export.toml")?;
//!
//!     let coordinator = ExportCoordinator::new(config)?;
//!     let summary = coordinator.execute_export()?;
//!
//!     println!("Exported {} rows", summary.total_rows_exported);
//!     Ok(())
//! }
//! ```
//!
//! ## Hashing
//!
//! Every identifying value is replaced by the first characters of
//! `sha256(value + salt + userID)`:
//!
//! ```rust
//! use donor_export::anonymization::hash_value;
//!
//! let hashed = hash_value("device-123", "salt", "user-1", 8);
//! assert_eq!(hashed.len(), 8);
//! assert_eq!(hashed, hash_value("device-123", "salt", "user-1", 8));
//! ```
//!
//! ## Error Handling
//!
//! The library uses [`domain::DonorExportError`] for all errors; the CLI maps
//! them to exit codes.
//!
//! ```rust,no_run
//! use donor_export::domain::DonorExportError;
//!
//! fn example() -> Result<(), DonorExportError> {
//!     let config = donor_export::config::load_config("donor-export.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! donor-export uses structured logging with the `tracing` crate. Donors are
//! identified by their output name, never by user ID:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(output_name = "D1_9f8e7d6c", "Processing donor");
//! warn!(output_name = "D2_0a1b2c3d", "Donor data file not found, skipping");
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
