//! One CSV file per record type

use super::traits::OutputWriter;
use crate::adapters::tabular::write_table;
use crate::core::export::bundle::ExportBundle;
use crate::domain::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `{type}.csv` files into a folder
///
/// The folder is the hidden `.{name}-csvs`; the coordinator renames it to
/// `{name}-csvs` once every other format has been produced.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFolderWriter;

impl CsvFolderWriter {
    /// Final, visible folder name
    pub fn published_path(output_dir: &Path, output_name: &str) -> PathBuf {
        output_dir.join(format!("{output_name}-csvs"))
    }
}

impl OutputWriter for CsvFolderWriter {
    fn format_name(&self) -> &'static str {
        "csv"
    }

    fn target_path(&self, output_dir: &Path, output_name: &str) -> PathBuf {
        output_dir.join(format!(".{output_name}-csvs"))
    }

    fn write(&self, bundle: &ExportBundle, target: &Path) -> Result<()> {
        if target.exists() {
            fs::remove_dir_all(target)?;
        }
        fs::create_dir_all(target)?;

        for (record_type, group) in bundle.groups() {
            write_table(group, &target.join(format!("{record_type}.csv")))?;
        }
        Ok(())
    }
}
