//! Data cleaning rules

use crate::domain::frame::{
    keep_rows, min_number, numeric_values, set_text_column, text_column, text_values,
};
use crate::domain::Result;
use polars::prelude::DataFrame;

/// mg/dL per mmol/L of glucose
pub const MG_DL_PER_MMOL_L: f64 = 18.01559;

/// Calibration readings are in mg/dL when the smallest one exceeds this
const MG_DL_READING_FLOOR: f64 = 30.0;

const CALIBRATION_READING: &str = "payload.calibration_reading";

/// Plausible CGM range in mmol/L
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CgmBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for CgmBounds {
    /// 38 to 402 mg/dL
    fn default() -> Self {
        Self {
            min: 2.109284236597303,
            max: 22.314006924003046,
        }
    }
}

/// Drops rows with a negative `duration`
///
/// Returns the number of rows removed, 0 when there is no `duration` column.
pub fn remove_negative_durations(df: &mut DataFrame) -> Result<usize> {
    let Some(durations) = numeric_values(df, "duration") else {
        return Ok(0);
    };
    let keep: Vec<bool> = durations
        .iter()
        .map(|d| !d.is_some_and(|d| d < 0.0))
        .collect();
    Ok(keep_rows(df, &keep)?)
}

/// Drops `cbg` rows whose value is outside `bounds`
///
/// Rows of other types, and `cbg` rows without a numeric value, are kept.
pub fn remove_invalid_cgm_values(df: &mut DataFrame, bounds: CgmBounds) -> Result<usize> {
    let (Some(types), Some(values)) = (text_column(df, "type"), numeric_values(df, "value"))
    else {
        return Ok(0);
    };
    let keep: Vec<bool> = types
        .into_iter()
        .zip(&values)
        .map(|(kind, value)| {
            let out_of_range = kind == Some("cbg")
                && value.is_some_and(|v| v < bounds.min || v > bounds.max);
            !out_of_range
        })
        .collect();
    Ok(keep_rows(df, &keep)?)
}

/// Repairs Tandem t:slim calibration events that lack a glucose value
///
/// The pump reports its calibration in `payload.calibration_reading` only.
/// When at least one Tandem device event (`deviceId` containing `tan`) carries
/// a reading, every row with a reading gets a new `value`: the reading for
/// Tandem device events, converted from mg/dL when the column's smallest
/// reading is above 30, and empty for all other rows. The `value` column is
/// created if needed.
///
/// Returns the number of Tandem device events carrying a reading.
pub fn tslim_calibration_fix(df: &mut DataFrame) -> Result<usize> {
    let Some(readings) = numeric_values(df, CALIBRATION_READING) else {
        return Ok(0);
    };
    let devices = text_values(df, "deviceId");
    let types = text_values(df, "type");
    let is_tandem_event = |row: usize| {
        devices[row].as_deref().is_some_and(|d| d.contains("tan"))
            && types[row].as_deref() == Some("deviceEvent")
    };

    let tandem_rows = (0..df.height())
        .filter(|&row| readings[row].is_some() && is_tandem_event(row))
        .count();
    if tandem_rows == 0 {
        return Ok(0);
    }

    let in_mg_dl = min_number(df, CALIBRATION_READING).is_some_and(|m| m > MG_DL_READING_FLOOR);
    let mut values = text_values(df, "value");
    for (row, reading) in readings.iter().enumerate() {
        let Some(reading) = reading else {
            continue;
        };
        values[row] = is_tandem_event(row).then(|| {
            if in_mg_dl {
                (reading / MG_DL_PER_MMOL_L).to_string()
            } else {
                reading.to_string()
            }
        });
    }
    set_text_column(df, "value", values)?;

    tracing::debug!(
        rows = tandem_rows,
        converted_from_mg_dl = in_mg_dl,
        "Applied Tandem calibration fix"
    );

    Ok(tandem_rows)
}
