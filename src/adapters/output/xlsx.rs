//! Spreadsheet with one worksheet per record type

use super::json::to_number;
use super::traits::OutputWriter;
use crate::core::export::bundle::ExportBundle;
use crate::domain::frame::text_column;
use crate::domain::{DonorExportError, Result};
use polars::prelude::DataFrame;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::{Path, PathBuf};

/// Writes `{name}.xlsx`
///
/// Sheets are named after the record type and laid out like the CSV files:
/// a header row, then every column of the group, `jsonRowIndex` first.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxWriter;

fn cell_pos(row: usize, col: usize) -> Result<(u32, u16)> {
    let row = u32::try_from(row)
        .map_err(|_| DonorExportError::Spreadsheet(format!("row {row} out of range")))?;
    let col = u16::try_from(col)
        .map_err(|_| DonorExportError::Spreadsheet(format!("column {col} out of range")))?;
    Ok((row, col))
}

fn write_sheet(worksheet: &mut Worksheet, group: &DataFrame) -> Result<()> {
    for (col, column) in group.get_columns().iter().enumerate() {
        let (r, c) = cell_pos(0, col)?;
        worksheet.write_string(r, c, column.name().as_str())?;

        let Some(cells) = text_column(group, column.name()) else {
            continue;
        };
        for (row, cell) in cells.into_iter().enumerate() {
            let Some(text) = cell else {
                continue;
            };
            let (r, c) = cell_pos(row + 1, col)?;
            match to_number(text).and_then(|n| n.as_f64()) {
                Some(value) => worksheet.write_number(r, c, value)?,
                None => worksheet.write_string(r, c, text)?,
            };
        }
    }
    Ok(())
}

impl OutputWriter for XlsxWriter {
    fn format_name(&self) -> &'static str {
        "xlsx"
    }

    fn target_path(&self, output_dir: &Path, output_name: &str) -> PathBuf {
        output_dir.join(format!("{output_name}.xlsx"))
    }

    fn write(&self, bundle: &ExportBundle, target: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        for (record_type, group) in bundle.groups() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(record_type)?;
            write_sheet(worksheet, group)?;
        }
        workbook.save(target)?;
        Ok(())
    }
}
