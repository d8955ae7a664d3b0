//! Per-donor cleaning and anonymization pipeline

use super::bundle::TIME_COLUMN;
use super::summary::DonorReport;
use crate::adapters::field_list::FieldList;
use crate::anonymization::AnonymizationEngine;
use crate::config::{DateFilterMode, DonorExportConfig};
use crate::core::transform::{
    filter_by_dates, filter_by_dates_except_uploads_and_settings, filter_by_required_fields,
    filter_local_time_quality, flatten_embedded_json, remove_by_dates, remove_invalid_cgm_values,
    remove_negative_durations, tslim_calibration_fix, CgmBounds,
};
use crate::domain::frame::{non_null_count, sort_by_text};
use crate::domain::{DonorExportError, DonorJob, Result};
use polars::prelude::DataFrame;

const GAP_SIZE: &str = "est.gapSize";

/// Runs every transformation step for one donor
///
/// Steps, in order:
/// 1. Drop rows with an unreliable local time estimate
/// 2. Keep the qualified date window
/// 3. Drop excluded days
/// 4. Flatten embedded objects (when enabled)
/// 5. Keep approved fields
/// 6. Drop negative durations and implausible CGM values
/// 7. Fix Tandem calibration events
/// 8. Hash identifying fields and schedule names, strip manufacturers
/// 9. Sort by time
pub struct DonorPipeline<'a> {
    config: &'a DonorExportConfig,
    fields: &'a FieldList,
    engine: &'a AnonymizationEngine,
}

impl<'a> DonorPipeline<'a> {
    pub fn new(
        config: &'a DonorExportConfig,
        fields: &'a FieldList,
        engine: &'a AnonymizationEngine,
    ) -> Self {
        Self {
            config,
            fields,
            engine,
        }
    }

    /// Cleans and anonymizes one donor's records
    ///
    /// `rows_exported` and `files_written` are left for the caller to fill in.
    pub fn run(&self, job: &DonorJob, mut df: DataFrame) -> Result<(DataFrame, DonorReport)> {
        let transform = &self.config.transform;
        let export = &self.config.export;
        let mut report = DonorReport::new(job.output_name());
        report.rows_loaded = df.height();

        report.low_confidence_local_time_removed =
            filter_local_time_quality(&mut df, transform.max_gap_minutes)?;

        let (start, end) = (job.start_bound(), job.end_bound());
        report.outside_date_window_removed = match export.date_filter {
            DateFilterMode::AllRows => filter_by_dates(&mut df, &start, &end)?,
            DateFilterMode::ExceptUploadsAndSettings => filter_by_dates_except_uploads_and_settings(
                &mut df,
                &export.local_time_field,
                &start,
                &end,
            )?,
        };
        report.removed_dates_removed = remove_by_dates(&mut df, &export.remove_dates)?;

        if transform.flatten_embedded_json {
            report.embedded_json_expanded = flatten_embedded_json(&mut df, &self.fields.required)?;
        }

        let mut df = filter_by_required_fields(&df, &self.fields.required)?;

        report.negative_durations_removed = remove_negative_durations(&mut df)?;
        report.invalid_cgm_removed = remove_invalid_cgm_values(
            &mut df,
            CgmBounds {
                min: transform.cgm_min_mmol,
                max: transform.cgm_max_mmol,
            },
        )?;
        report.tandem_calibration_fixed = tslim_calibration_fix(&mut df)?;

        report.anonymization = self
            .engine
            .anonymize(&mut df, job.user_id.as_str(), &self.fields.hash)
            .map_err(|e| DonorExportError::Anonymization(format!("{e:#}")))?;

        let df = sort_by_text(&df, TIME_COLUMN)?;
        report.gap_data = non_null_count(&df, GAP_SIZE);

        tracing::debug!(
            output_name = %report.output_name,
            rows = df.height(),
            columns = df.width(),
            "Donor records cleaned"
        );

        Ok((df, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::hashing::hash_value;
    use crate::anonymization::AnonymizationConfig;
    use crate::config::{secret_string, InputConfig};
    use crate::domain::frame::{add_row_index, column_names, frame, text_at, text_values};
    use crate::domain::{HashId, QualificationTier, UserId, ROW_INDEX_COLUMN};
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn config() -> DonorExportConfig {
        let mut anonymization = AnonymizationConfig::new(secret_string("salt".to_string()));
        anonymization.audit.enabled = false;
        DonorExportConfig {
            application: Default::default(),
            input: InputConfig {
                control_table: PathBuf::from("control.csv"),
                donor_csv_dir: PathBuf::from("donors"),
                field_list: PathBuf::from("fields.csv"),
            },
            export: Default::default(),
            transform: Default::default(),
            anonymization,
            logging: Default::default(),
        }
    }

    fn job() -> DonorJob {
        DonorJob {
            d_index: "0".to_string(),
            user_id: UserId::new("user-1").unwrap(),
            hash_id: HashId::new("abcd1234").unwrap(),
            tier: QualificationTier::new("D1").unwrap(),
            start_date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2017, 1, 31).unwrap(),
        }
    }

    fn donor_frame() -> DataFrame {
        add_row_index(&frame(
            &["type", "time", "est.localTime", "est.gapSize", "value", "deviceId", "secret"],
            &[
                &["cbg", "2017-01-03T10:00:00", "2017-01-03T02:00:00", "", "5.5", "dexcom-1", "x"],
                &["cbg", "2017-01-02T10:00:00", "2017-01-02T02:00:00", "", "1.0", "dexcom-1", "x"],
                &["cbg", "2017-01-04T10:00:00", "2017-01-04T02:00:00", "90", "6.0", "dexcom-1", "x"],
                &["cbg", "2017-03-01T10:00:00", "2017-03-01T02:00:00", "20", "6.0", "dexcom-1", "x"],
                &["upload", "2016-06-01T00:00:00", "", "", "", "dexcom-1", "x"],
                &["basal", "2017-01-05T00:00:00", "2017-01-05T00:00:00", "10", "", "tandem-1", "x"],
            ],
        ))
        .unwrap()
    }

    fn pipeline_fields(required: &[&str], hash: &[&str]) -> FieldList {
        FieldList {
            required: required.iter().map(|s| s.to_string()).collect(),
            hash: hash.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_run_applies_steps_in_order() {
        let config = config();
        let engine = AnonymizationEngine::new(config.anonymization.clone()).unwrap();
        let fields = pipeline_fields(&["time", "type", "value", "deviceId"], &["deviceId"]);
        let pipeline = DonorPipeline::new(&config, &fields, &engine);

        let (df, report) = pipeline.run(&job(), donor_frame()).unwrap();

        assert_eq!(report.output_name, "D1_abcd1234");
        assert_eq!(report.rows_loaded, 6);
        assert_eq!(report.low_confidence_local_time_removed, 1);
        assert_eq!(report.gap_data, 0);
        assert_eq!(report.outside_date_window_removed, 1);
        assert_eq!(report.invalid_cgm_removed, 1);
        assert_eq!(report.anonymization.total_hashed_cells(), 3);

        assert_eq!(
            column_names(&df),
            vec![ROW_INDEX_COLUMN, "time", "type", "value", "deviceId"]
        );
        let types: Vec<_> = text_values(&df, "type").into_iter().flatten().collect();
        assert_eq!(types, vec!["upload", "cbg", "basal"]);
        let hashed = hash_value("dexcom-1", "salt", "user-1", 8);
        assert_eq!(text_at(&df, 0, "deviceId"), Some(hashed.as_str()));
    }

    #[test]
    fn test_gap_data_counts_exported_rows_only() {
        let config = config();
        let engine = AnonymizationEngine::new(config.anonymization.clone()).unwrap();
        let fields = pipeline_fields(&["time", "type", "est.gapSize"], &[]);
        let pipeline = DonorPipeline::new(&config, &fields, &engine);

        let (df, report) = pipeline.run(&job(), donor_frame()).unwrap();

        // the March gap row is outside the window, the 90 minute gap is dropped
        assert_eq!(report.gap_data, 1);
        assert_eq!(text_values(&df, "est.gapSize").into_iter().flatten().count(), 1);
    }

    #[test]
    fn test_run_with_all_rows_date_filter() {
        let mut config = config();
        config.export.date_filter = DateFilterMode::AllRows;
        let engine = AnonymizationEngine::new(config.anonymization.clone()).unwrap();
        let fields = pipeline_fields(&["time", "type"], &[]);
        let pipeline = DonorPipeline::new(&config, &fields, &engine);

        let (df, _) = pipeline.run(&job(), donor_frame()).unwrap();

        assert!(text_values(&df, "type")
            .iter()
            .flatten()
            .all(|t| t != "upload"));
    }
}
