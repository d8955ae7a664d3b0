//! Approved data field list

use super::tabular::read_table;
use crate::domain::frame::{has_column, text_at};
use crate::domain::{DonorExportError, Result};
use polars::prelude::DataFrame;
use std::path::Path;

const FIELD: &str = "dataFieldList";
const INCLUDE: &str = "include";
const HASH_NEEDED: &str = "hashNeeded";

/// Fields approved for export and fields that must be hashed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldList {
    /// Columns kept in the export, in file order
    pub required: Vec<String>,
    /// Columns replaced by their salted hash, in file order
    pub hash: Vec<String>,
}

impl FieldList {
    /// Loads the field list CSV
    pub fn load(path: &Path) -> Result<Self> {
        let fields = Self::from_table(&read_table(path)?)?;
        tracing::info!(
            path = %path.display(),
            required = fields.required.len(),
            hashed = fields.hash.len(),
            "Loaded data field list"
        );
        Ok(fields)
    }

    /// Extracts the field sets from a parsed field list
    pub fn from_table(table: &DataFrame) -> Result<Self> {
        for column in [FIELD, INCLUDE, HASH_NEEDED] {
            if !has_column(table, column) {
                return Err(DonorExportError::Input(format!(
                    "field list is missing column '{column}'"
                )));
            }
        }

        let mut fields = FieldList::default();
        for row in 0..table.height() {
            let Some(name) = text_at(table, row, FIELD) else {
                continue;
            };
            if is_truthy(text_at(table, row, INCLUDE)) {
                fields.required.push(name.to_string());
            }
            if is_truthy(text_at(table, row, HASH_NEEDED)) {
                fields.hash.push(name.to_string());
            }
        }
        Ok(fields)
    }
}

/// Boolean flag as written by spreadsheet tools; empty is false
fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(str::trim),
        Some("true" | "True" | "TRUE" | "1" | "yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::frame;
    use tempfile::tempdir;
    use test_case::test_case;

    #[test_case(Some("True"), true)]
    #[test_case(Some("TRUE"), true)]
    #[test_case(Some("1"), true)]
    #[test_case(Some("yes"), true)]
    #[test_case(Some("False"), false)]
    #[test_case(Some("0"), false)]
    #[test_case(None, false)]
    fn test_is_truthy(value: Option<&str>, expected: bool) {
        assert_eq!(is_truthy(value), expected);
    }

    #[test]
    fn test_load_field_list() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fields.csv");
        std::fs::write(
            &path,
            "dataFieldList,include,hashNeeded\n\
             time,True,False\n\
             deviceId,True,True\n\
             payload.secret,False,\n\
             uploadId,True,True\n",
        )
        .unwrap();

        let fields = FieldList::load(&path).unwrap();

        assert_eq!(fields.required, vec!["time", "deviceId", "uploadId"]);
        assert_eq!(fields.hash, vec!["deviceId", "uploadId"]);
    }

    #[test]
    fn test_missing_column() {
        let table = frame(&["dataFieldList", "include"], &[]);
        assert!(FieldList::from_table(&table).is_err());
    }
}
