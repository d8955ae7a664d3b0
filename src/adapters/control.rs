//! Control table of qualified donors

use super::tabular::read_table;
use crate::domain::frame::{has_column, text_at};
use crate::domain::{
    DonorExportError, DonorJob, HashId, QualificationTier, Result, UserId, ROW_INDEX_COLUMN,
};
use chrono::NaiveDate;
use polars::prelude::DataFrame;
use std::path::Path;

const D_INDEX: &str = "dIndex";
const USER_ID: &str = "userID";
const HASH_ID: &str = "hashID";
const TOP_TIER: &str = "D.topTier";

/// Reads the control table and returns one job per qualified donor
///
/// A donor qualifies when `D.topTier` is set and is not `D0`. Jobs keep the
/// table's row order.
pub fn read_control_table(path: &Path) -> Result<Vec<DonorJob>> {
    let table = read_table(path)?;
    let jobs = qualified_jobs(&table)?;

    tracing::info!(
        path = %path.display(),
        donors = table.height(),
        qualified = jobs.len(),
        "Loaded control table"
    );

    Ok(jobs)
}

/// Builds jobs from the qualified rows of a control table
pub fn qualified_jobs(table: &DataFrame) -> Result<Vec<DonorJob>> {
    for column in [USER_ID, HASH_ID, TOP_TIER] {
        if !has_column(table, column) {
            return Err(DonorExportError::Input(format!(
                "control table is missing column '{column}'"
            )));
        }
    }

    let mut jobs = Vec::new();
    for row in 0..table.height() {
        let Some(tier) = text_at(table, row, TOP_TIER) else {
            continue;
        };
        let tier = QualificationTier::new(tier).map_err(DonorExportError::Input)?;
        if !tier.is_qualified() {
            continue;
        }

        let d_index = text_at(table, row, D_INDEX)
            .or_else(|| text_at(table, row, ROW_INDEX_COLUMN))
            .map(str::to_string)
            .unwrap_or_else(|| row.to_string());
        let required = |column: &str| {
            text_at(table, row, column).ok_or_else(|| {
                DonorExportError::Input(format!(
                    "control table row {d_index} has no value for '{column}'"
                ))
            })
        };

        let user_id = UserId::new(required(USER_ID)?).map_err(DonorExportError::Input)?;
        let hash_id = HashId::new(required(HASH_ID)?).map_err(DonorExportError::Input)?;
        let start_date = parse_date(required(&tier.begin_date_column())?)?;
        let end_date = parse_date(required(&tier.end_date_column())?)?;

        jobs.push(DonorJob {
            d_index,
            user_id,
            hash_id,
            tier,
            start_date,
            end_date,
        });
    }

    Ok(jobs)
}

/// Parses `YYYY-MM-DD`, ignoring any time-of-day suffix
fn parse_date(text: &str) -> Result<NaiveDate> {
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| DonorExportError::Input(format!("invalid date '{text}': {e}")))
}
