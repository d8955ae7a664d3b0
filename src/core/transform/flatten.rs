//! Flattening of embedded objects
//!
//! Some exports keep nested objects (`payload`, `suppressed`, ...) as JSON or
//! Python literal text in a single cell. This module lifts the approved keys
//! of those objects into their own `{column}.{key}` columns.

use crate::domain::frame::{column_names, set_text_column, text_values};
use crate::domain::literal::parse_literal;
use crate::domain::Result;
use polars::prelude::DataFrame;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

/// Columns whose objects are keyed by user-named schedules and stay intact
pub const HELD_OUT_COLUMNS: [&str; 7] = [
    "basalSchedules",
    "bgTarget",
    "bgTargets",
    "carbRatio",
    "carbRatios",
    "insulinSensitivity",
    "insulinSensitivities",
];

const ANNOTATIONS: &str = "annotations";

/// Renders a nested value as cell text
fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Replaces `annotations` lists by their first element
///
/// Returns the number of cells changed.
fn take_first_annotation(df: &mut DataFrame) -> Result<usize> {
    let mut cells = text_values(df, ANNOTATIONS);
    let mut changed = 0;
    for (row, cell) in cells.iter_mut().enumerate() {
        let Some(text) = cell.as_deref() else {
            continue;
        };
        match parse_literal(text) {
            Some(Value::Array(items)) => {
                *cell = items.first().and_then(cell_text);
                changed += 1;
            }
            Some(_) => {}
            None => tracing::warn!(row, "Unparseable annotations left as text"),
        }
    }
    if changed > 0 {
        set_text_column(df, ANNOTATIONS, cells)?;
    }
    Ok(changed)
}

/// Lifts required keys out of embedded object cells
///
/// In every column except [`HELD_OUT_COLUMNS`], a cell whose text starts with
/// `{` is emptied; each key `k` of the parsed object whose name `column.k` is
/// in `required_fields` is written to that column. Only columns present before
/// the call are scanned.
///
/// Returns the number of object cells expanded.
pub fn flatten_embedded_json(df: &mut DataFrame, required_fields: &[String]) -> Result<usize> {
    take_first_annotation(df)?;

    let required: HashSet<&str> = required_fields.iter().map(String::as_str).collect();
    let columns: Vec<String> = column_names(df)
        .into_iter()
        .filter(|c| !HELD_OUT_COLUMNS.contains(&c.as_str()))
        .collect();

    let mut expanded = 0;
    for column in columns {
        let mut cells = text_values(df, &column);
        let mut lifted: BTreeMap<String, Vec<Option<String>>> = BTreeMap::new();
        let mut touched = false;

        for (row, cell) in cells.iter_mut().enumerate() {
            let Some(text) = cell.as_deref().filter(|t| t.starts_with('{')) else {
                continue;
            };
            let object = match parse_literal(text) {
                Some(Value::Object(map)) => Some(map),
                _ => None,
            };
            *cell = None;
            touched = true;
            expanded += 1;

            let Some(object) = object else {
                tracing::warn!(column = %column, row, "Unparseable embedded object dropped");
                continue;
            };
            for (key, value) in &object {
                let name = format!("{column}.{key}");
                if required.contains(name.as_str()) {
                    let target = match lifted.get_mut(&name) {
                        Some(target) => target,
                        None => lifted.entry(name.clone()).or_insert(text_values(df, &name)),
                    };
                    target[row] = cell_text(value);
                }
            }
        }

        if touched {
            set_text_column(df, &column, cells)?;
        }
        for (name, values) in lifted {
            set_text_column(df, &name, values)?;
        }
    }
    Ok(expanded)
}
