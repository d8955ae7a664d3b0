//! Single JSON array of all records

use super::traits::OutputWriter;
use crate::core::export::bundle::ExportBundle;
use crate::domain::frame::{parse_number, text_column};
use crate::domain::{Result, ROW_INDEX_COLUMN};
use polars::prelude::{DataFrame, StringChunked};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::{Number, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Writes `{name}.json`, records ordered by time
///
/// Each record is an object over the union of all columns except
/// `jsonRowIndex`; empty cells are `null`. A column whose values all parse as finite numbers is written as
/// numbers, anything else as strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

/// Converts numeric text to a JSON number, keeping integers exact
///
/// Text with a leading zero (`"0123abcd"`-style hashes that happen to be all
/// digits) is not a number.
pub(super) fn to_number(text: &str) -> Option<Number> {
    let text = text.trim();
    let digits = text.strip_prefix('-').unwrap_or(text).as_bytes();
    if digits.len() > 1 && digits[0] == b'0' && digits[1].is_ascii_digit() {
        return None;
    }
    if let Ok(i) = text.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = text.parse::<u64>() {
        return Some(Number::from(u));
    }
    parse_number(text).and_then(Number::from_f64)
}

/// A column as written to JSON
struct JsonColumn<'a> {
    name: &'a str,
    cells: &'a StringChunked,
    numeric: bool,
}

impl JsonColumn<'_> {
    fn value(&self, row: usize) -> Value {
        match self.cells.get(row) {
            None => Value::Null,
            Some(text) if self.numeric => to_number(text)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(text.to_string())),
            Some(text) => Value::String(text.to_string()),
        }
    }
}

struct RecordView<'a> {
    columns: &'a [JsonColumn<'a>],
    row: usize,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for column in self.columns {
            map.serialize_entry(column.name, &column.value(self.row))?;
        }
        map.end()
    }
}

struct Records<'a> {
    columns: &'a [JsonColumn<'a>],
    height: usize,
}

impl Serialize for Records<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.height))?;
        for row in 0..self.height {
            seq.serialize_element(&RecordView {
                columns: self.columns,
                row,
            })?;
        }
        seq.end()
    }
}

fn json_columns(df: &DataFrame) -> Vec<JsonColumn<'_>> {
    df.get_columns()
        .iter()
        .filter(|c| c.name().as_str() != ROW_INDEX_COLUMN)
        .filter_map(|c| {
            let name = c.name().as_str();
            let cells = text_column(df, name)?;
            let numeric = cells.into_iter().flatten().all(|v| to_number(v).is_some());
            Some(JsonColumn {
                name,
                cells,
                numeric,
            })
        })
        .collect()
}

impl OutputWriter for JsonWriter {
    fn format_name(&self) -> &'static str {
        "json"
    }

    fn target_path(&self, output_dir: &Path, output_name: &str) -> PathBuf {
        output_dir.join(format!("{output_name}.json"))
    }

    fn write(&self, bundle: &ExportBundle, target: &Path) -> Result<()> {
        let combined = bundle.combined()?;
        let columns = json_columns(&combined);

        let mut writer = BufWriter::new(File::create(target)?);
        serde_json::to_writer(
            &mut writer,
            &Records {
                columns: &columns,
                height: combined.height(),
            },
        )?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{add_row_index, frame};
    use tempfile::tempdir;

    #[test]
    fn test_to_number() {
        assert_eq!(to_number("120"), Some(Number::from(120)));
        assert_eq!(to_number("5.5").and_then(|n| n.as_f64()), Some(5.5));
        assert_eq!(to_number("0.25").and_then(|n| n.as_f64()), Some(0.25));
        assert_eq!(to_number("01234567"), None);
        assert_eq!(to_number("inf"), None);
        assert_eq!(to_number("abc"), None);
    }

    #[test]
    fn test_write_json_records() {
        let dir = tempdir().unwrap();
        let df = add_row_index(&frame(
            &["type", "time", "value", "units"],
            &[
                &["cbg", "2017-01-02T00:00:00", "5.5", "mmol/L"],
                &["basal", "2017-01-01T00:00:00", "0.8", ""],
            ],
        ))
        .unwrap();
        let bundle = ExportBundle::from_table(&df).unwrap();
        let writer = JsonWriter;
        let target = writer.target_path(dir.path(), "D1_abc");

        writer.write(&bundle, &target).unwrap();

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        let records = parsed.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["type"], "basal");
        assert_eq!(records[0]["value"], 0.8);
        assert_eq!(records[0]["units"], Value::Null);
        assert_eq!(records[1]["units"], "mmol/L");
        assert!(records[0].get("jsonRowIndex").is_none());
    }

    #[test]
    fn test_mixed_column_stays_text() {
        let dir = tempdir().unwrap();
        let df = frame(
            &["type", "time", "deviceTime"],
            &[&["cbg", "t1", "12"], &["cbg", "t2", "n/a"]],
        );
        let bundle = ExportBundle::from_table(&df).unwrap();
        let target = dir.path().join("out.json");

        JsonWriter.write(&bundle, &target).unwrap();

        let parsed: Value = serde_json::from_str(&std::fs::read_to_string(&target).unwrap()).unwrap();
        assert_eq!(parsed[0]["deviceTime"], "12");
    }
}
