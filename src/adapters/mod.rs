//! File-system integrations for donor-export.
//!
//! This module provides adapters for everything the pipeline reads or writes:
//!
//! - [`tabular`] - CSV to polars `DataFrame` and back
//! - [`control`] - The control table of qualified donors
//! - [`field_list`] - The approved / hashed field list
//! - [`output`] - CSV, JSON and XLSX export writers
//!
//! # Design Pattern
//!
//! Adapters own file formats: polars CSV reading and writing, and
//! `rust_xlsxwriter` workbooks.
//! Output formats share the [`OutputWriter`](output::OutputWriter) trait so the
//! coordinator can drive them uniformly.
//!
//! ```rust,no_run
//! use donor_export::adapters::{control::read_control_table, field_list::FieldList};
//! use std::path::Path;
//!
//! # fn example() -> donor_export::domain::Result<()> {
//! let fields = FieldList::load(Path::new("data/dataFieldExportList.csv"))?;
//! let donors = read_control_table(Path::new("data/qualified-metadata.csv"))?;
//! println!("{} fields, {} donors", fields.required.len(), donors.len());
//! # Ok(())
//! # }
//! ```

pub mod control;
pub mod field_list;
pub mod output;
pub mod tabular;
