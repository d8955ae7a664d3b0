//! Export orchestration
//!
//! This module provides the core export logic for donor-export, including:
//! - The per-donor cleaning and anonymization pipeline
//! - Splitting a donor's records into per-type outputs
//! - Export coordination across the control table
//! - Summary and reporting

pub mod bundle;
pub mod coordinator;
pub mod pipeline;
pub mod summary;

pub use bundle::ExportBundle;
pub use coordinator::ExportCoordinator;
pub use pipeline::DonorPipeline;
pub use summary::{DonorReport, ExportSummary};
