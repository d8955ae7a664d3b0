//! Text dataframes
//!
//! A donor's records arrive pre-flattened: one row per device event, one column
//! per field path (`payload.calibration_reading`, `est.localTime`, ...). They
//! are held in a polars [`DataFrame`] whose columns are all `String`, so a
//! cell no rule touches is written back exactly as it was read. A null is an
//! empty field. Numeric rules cast on demand and text that does not parse
//! behaves like a missing value.

use polars::prelude::{
    BooleanChunked, DataFrame, DataType, NamedFrom, NewChunkedArray, PlSmallStr, PolarsResult,
    Series, SortMultipleOptions, StringChunked,
};

/// Source row position, added on read and exported by the CSV and XLSX writers
pub const ROW_INDEX_COLUMN: &str = "jsonRowIndex";

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// Column names in frame order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}

/// Cells of a text column; `None` when the column is absent
pub fn text_column<'a>(df: &'a DataFrame, name: &str) -> Option<&'a StringChunked> {
    df.column(name).ok()?.str().ok()
}

/// Text of one cell by row position and column name
pub fn text_at<'a>(df: &'a DataFrame, row: usize, name: &str) -> Option<&'a str> {
    text_column(df, name)?.get(row)
}

/// Owned copy of a column's cells; an absent column reads as all empty
pub fn text_values(df: &DataFrame, name: &str) -> Vec<Option<String>> {
    match text_column(df, name) {
        Some(cells) => cells
            .into_iter()
            .map(|cell| cell.map(str::to_string))
            .collect(),
        None => vec![None; df.height()],
    }
}

/// Parses a cell as a number, rejecting NaN
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Numeric view of a column
///
/// Cells that do not parse, and `NaN`, are `None`. An absent column is `None`.
pub fn numeric_values(df: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    let cast = df.column(name).ok()?.cast(&DataType::Float64).ok()?;
    let values = cast
        .f64()
        .ok()?
        .into_iter()
        .map(|v| v.filter(|x| !x.is_nan()))
        .collect();
    Some(values)
}

/// Smallest numeric value of a column
pub fn min_number(df: &DataFrame, name: &str) -> Option<f64> {
    numeric_values(df, name)?
        .into_iter()
        .flatten()
        .reduce(f64::min)
}

/// Number of non-empty cells in a column, 0 when absent
pub fn non_null_count(df: &DataFrame, name: &str) -> usize {
    df.column(name)
        .map(|c| c.len() - c.null_count())
        .unwrap_or(0)
}

/// Keeps the rows flagged in `keep`, returning how many were removed
pub fn keep_rows(df: &mut DataFrame, keep: &[bool]) -> PolarsResult<usize> {
    let before = df.height();
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    *df = df.filter(&mask)?;
    Ok(before - df.height())
}

/// Replaces a text column, or appends it when absent
pub fn set_text_column(
    df: &mut DataFrame,
    name: &str,
    values: Vec<Option<String>>,
) -> PolarsResult<()> {
    let series = Series::new(name.into(), values);
    df.with_column(series)?;
    Ok(())
}

/// Rewrites every non-empty cell of a text column
///
/// Returns how many cells changed.
pub fn map_text_column<F>(df: &mut DataFrame, name: &str, mut f: F) -> PolarsResult<usize>
where
    F: FnMut(&str) -> String,
{
    let Some(cells) = text_column(df, name) else {
        return Ok(0);
    };
    let mut changed = 0;
    let values: Vec<Option<String>> = cells
        .into_iter()
        .map(|cell| {
            cell.map(|value| {
                let next = f(value);
                if next != value {
                    changed += 1;
                }
                next
            })
        })
        .collect();

    if changed > 0 {
        set_text_column(df, name, values)?;
    }
    Ok(changed)
}

/// Prepends [`ROW_INDEX_COLUMN`], numbering rows from zero
pub fn add_row_index(df: &DataFrame) -> PolarsResult<DataFrame> {
    let mut indexed = df.with_row_index(ROW_INDEX_COLUMN.into(), None)?;
    let as_text = indexed
        .column(ROW_INDEX_COLUMN)?
        .cast(&DataType::String)?;
    indexed.with_column(as_text)?;
    Ok(indexed)
}

/// Projects onto the named columns, in the given order
///
/// Names that are not columns are skipped. [`ROW_INDEX_COLUMN`] stays in front.
pub fn select_existing(df: &DataFrame, names: &[String]) -> PolarsResult<DataFrame> {
    let mut picks: Vec<&str> = Vec::with_capacity(names.len() + 1);
    if has_column(df, ROW_INDEX_COLUMN) {
        picks.push(ROW_INDEX_COLUMN);
    }
    for name in names {
        if has_column(df, name) && !picks.contains(&name.as_str()) {
            picks.push(name);
        }
    }
    df.select(picks)
}

/// Stable sort by a column's text, empty cells last
///
/// A frame without the column is returned unchanged.
pub fn sort_by_text(df: &DataFrame, name: &str) -> PolarsResult<DataFrame> {
    if !has_column(df, name) {
        return Ok(df.clone());
    }
    df.sort(
        [name],
        SortMultipleOptions::default()
            .with_maintain_order(true)
            .with_nulls_last(true),
    )
}

/// Removes columns in which every cell is empty
pub fn drop_empty_columns(df: &DataFrame) -> PolarsResult<DataFrame> {
    let keep: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|c| c.null_count() < c.len())
        .map(|c| c.name().clone())
        .collect();
    df.select(keep)
}

/// Builds a text frame from string rows; `""` is an empty cell
#[cfg(test)]
pub(crate) fn frame(columns: &[&str], rows: &[&[&str]]) -> DataFrame {
    let columns = columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let values: Vec<Option<&str>> = rows
                .iter()
                .map(|row| Some(row[i]).filter(|s| !s.is_empty()))
                .collect();
            Series::new((*name).into(), values).into()
        })
        .collect();
    DataFrame::new(columns).unwrap()
}
