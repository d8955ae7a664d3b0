//! Output writer abstraction
//!
//! This module defines the trait that every export format implements.

use crate::core::export::bundle::ExportBundle;
use crate::domain::Result;
use std::path::{Path, PathBuf};

/// Writes a donor's bundle in one file format
pub trait OutputWriter {
    /// Short format name used in logs and summaries
    fn format_name(&self) -> &'static str;

    /// Where this format is written for `output_name` under `output_dir`
    fn target_path(&self, output_dir: &Path, output_name: &str) -> PathBuf;

    /// Writes the bundle to `target`, replacing any previous file
    fn write(&self, bundle: &ExportBundle, target: &Path) -> Result<()>;
}
