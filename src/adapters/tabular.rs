//! CSV reading and writing of donor dataframes
//!
//! Every column is read as text. Empty fields become nulls on read and are
//! written back as empty fields.

use crate::domain::frame::add_row_index;
use crate::domain::{DonorExportError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub use crate::domain::ROW_INDEX_COLUMN;

/// Reads a headed CSV file into a text dataframe
///
/// [`ROW_INDEX_COLUMN`] is prepended, numbering rows from zero in file order.
/// A UTF-8 byte order mark on the first header is dropped.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row has more fields
/// than the header.
pub fn read_table(path: &Path) -> Result<DataFrame> {
    let csv_error =
        |e: PolarsError| DonorExportError::Input(format!("read csv {}: {}", path.display(), e));

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(csv_error)?
        .finish()
        .map_err(csv_error)?;

    if let Some(first) = df.get_column_names().first().map(|n| n.to_string()) {
        let trimmed = first.trim_start_matches('\u{feff}');
        if trimmed != first {
            df.rename(&first, trimmed.into()).map_err(csv_error)?;
        }
    }

    let df = add_row_index(&df).map_err(csv_error)?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width() - 1,
        "Loaded CSV"
    );

    Ok(df)
}

/// Writes a dataframe as CSV, header first
pub fn write_table(df: &DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    let mut df = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{column_names, frame, text_at};
    use tempfile::tempdir;

    #[test]
    fn test_read_table_empty_fields_are_null() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("donor.csv");
        std::fs::write(&path, "\u{feff}type,value\ncbg,5.5\nbasal,\n").unwrap();

        let df = read_table(&path).unwrap();

        assert_eq!(column_names(&df), vec![ROW_INDEX_COLUMN, "type", "value"]);
        assert_eq!(df.height(), 2);
        assert_eq!(text_at(&df, 0, "value"), Some("5.5"));
        assert_eq!(text_at(&df, 1, "value"), None);
        assert_eq!(text_at(&df, 1, ROW_INDEX_COLUMN), Some("1"));
    }

    #[test]
    fn test_read_table_keeps_text_verbatim() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("donor.csv");
        std::fs::write(&path, "value,time\n5.50,2017-01-01T00:00:00\n007,\n").unwrap();

        let df = read_table(&path).unwrap();

        assert_eq!(text_at(&df, 0, "value"), Some("5.50"));
        assert_eq!(text_at(&df, 1, "value"), Some("007"));
        assert_eq!(text_at(&df, 0, "time"), Some("2017-01-01T00:00:00"));
    }

    #[test]
    fn test_read_table_ragged_row_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2,3\n").unwrap();

        assert!(read_table(&path).is_err());
    }

    #[test]
    fn test_read_table_missing_file() {
        let err = read_table(Path::new("/nonexistent/donor.csv")).unwrap_err();
        assert!(matches!(err, DonorExportError::Input(_)));
    }

    #[test]
    fn test_write_table_empty_cells() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cbg.csv");
        let df = frame(
            &[ROW_INDEX_COLUMN, "time", "value"],
            &[&["7", "2017-01-01T00:00:00", ""]],
        );

        write_table(&df, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "jsonRowIndex,time,value\n7,2017-01-01T00:00:00,\n");
    }
}
