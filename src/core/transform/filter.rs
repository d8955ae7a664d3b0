//! Row and column filters
//!
//! Timestamps are ISO-8601 text, so range checks compare strings: a bare date
//! such as `2017-01-01` sorts before every time on that day.

use crate::domain::frame::{keep_rows, numeric_values, select_existing, text_column};
use crate::domain::{DonorExportError, Result};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::collections::HashSet;

/// Record types kept regardless of the qualified date window
pub const DATE_EXEMPT_TYPES: [&str; 3] = ["upload", "deviceEvent", "pumpSettings"];

const GAP_SIZE: &str = "est.gapSize";
const ESTIMATE_TYPE: &str = "est.type";
const UNCERTAIN: &str = "UNCERTAIN";

fn in_window(value: Option<&str>, start: &str, end: &str) -> bool {
    value.is_some_and(|v| v >= start && v <= end)
}

/// Window mask over a text column; all false when the column is absent
fn window_mask(df: &DataFrame, column: &str, start: &str, end: &str) -> Vec<bool> {
    match text_column(df, column) {
        Some(cells) => cells
            .into_iter()
            .map(|cell| in_window(cell, start, end))
            .collect(),
        None => vec![false; df.height()],
    }
}

/// Drops rows whose local time was imputed across a long gap or is uncertain
///
/// A row goes when `est.gapSize > max_gap_minutes` or `est.type` is
/// `UNCERTAIN`. Missing columns never remove anything.
pub fn filter_local_time_quality(df: &mut DataFrame, max_gap_minutes: f64) -> Result<usize> {
    let gaps = numeric_values(df, GAP_SIZE);
    let estimates = text_column(df, ESTIMATE_TYPE);
    let keep: Vec<bool> = (0..df.height())
        .map(|row| {
            let long_gap = gaps
                .as_ref()
                .and_then(|g| g[row])
                .is_some_and(|g| g > max_gap_minutes);
            let uncertain = estimates.and_then(|e| e.get(row)) == Some(UNCERTAIN);
            !(long_gap || uncertain)
        })
        .collect();
    Ok(keep_rows(df, &keep)?)
}

/// Keeps rows whose `time` lies in `[start, end]`
///
/// Rows without a time are dropped.
pub fn filter_by_dates(df: &mut DataFrame, start: &str, end: &str) -> Result<usize> {
    let keep = window_mask(df, "time", start, end);
    Ok(keep_rows(df, &keep)?)
}

/// Keeps uploads, device events and pump settings, and date-filters the rest
///
/// Non-exempt rows are judged on `column` (normally `est.localTime`). The
/// exempt rows come first in the result, each group in its original order.
///
/// # Errors
///
/// Returns an error when `column` is not in the frame.
pub fn filter_by_dates_except_uploads_and_settings(
    df: &mut DataFrame,
    column: &str,
    start: &str,
    end: &str,
) -> Result<usize> {
    if text_column(df, column).is_none() {
        return Err(DonorExportError::Transform(format!(
            "date filter column '{column}' not found"
        )));
    }
    let exempt: Vec<bool> = match text_column(df, "type") {
        Some(types) => types
            .into_iter()
            .map(|t| t.is_some_and(|t| DATE_EXEMPT_TYPES.contains(&t)))
            .collect(),
        None => vec![false; df.height()],
    };
    let in_range = window_mask(df, column, start, end);
    let rest: Vec<bool> = exempt
        .iter()
        .zip(&in_range)
        .map(|(exempt, in_range)| !exempt && *in_range)
        .collect();

    let before = df.height();
    let mut kept = df.clone();
    keep_rows(&mut kept, &exempt)?;
    let mut others = df.clone();
    keep_rows(&mut others, &rest)?;
    kept.vstack_mut(&others)?;
    *df = kept;
    Ok(before - df.height())
}

/// Drops rows whose `time` falls on one of `dates`
///
/// Rows without a parseable time are kept.
pub fn remove_by_dates(df: &mut DataFrame, dates: &[NaiveDate]) -> Result<usize> {
    if dates.is_empty() {
        return Ok(0);
    }
    let dates: HashSet<NaiveDate> = dates.iter().copied().collect();
    let Some(times) = text_column(df, "time") else {
        return Ok(0);
    };
    let keep: Vec<bool> = times
        .into_iter()
        .map(|time| {
            let day = time
                .and_then(|t| t.get(..10))
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok());
            !day.is_some_and(|d| dates.contains(&d))
        })
        .collect();
    Ok(keep_rows(df, &keep)?)
}

/// Projects the frame onto the approved fields, in field-list order
pub fn filter_by_required_fields(df: &DataFrame, fields: &[String]) -> Result<DataFrame> {
    Ok(select_existing(df, fields)?)
}
