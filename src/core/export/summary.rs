//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting export results.

use crate::anonymization::AnonymizationOutcome;
use std::path::PathBuf;
use std::time::Duration;

/// What happened to one donor's data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonorReport {
    /// `{tier}_{hashID}`
    pub output_name: String,

    /// Rows in the donor CSV
    pub rows_loaded: usize,

    /// Rows dropped for an unreliable local time estimate
    pub low_confidence_local_time_removed: usize,

    /// Exported rows whose local time was imputed across a gap (`est.gapSize` set)
    pub gap_data: usize,

    /// Rows dropped by the qualified date window
    pub outside_date_window_removed: usize,

    /// Rows dropped because their day is excluded
    pub removed_dates_removed: usize,

    /// JSON object cells lifted into columns
    pub embedded_json_expanded: usize,

    pub negative_durations_removed: usize,

    pub invalid_cgm_removed: usize,

    /// Tandem calibration events given a glucose value
    pub tandem_calibration_fixed: usize,

    /// Hashing and manufacturer-stripping counts
    pub anonymization: AnonymizationOutcome,

    /// Rows written to the outputs, after bundling
    pub rows_exported: usize,

    /// Files and folders produced
    pub files_written: Vec<PathBuf>,
}

impl DonorReport {
    /// Create an empty report for a donor
    pub fn new(output_name: impl Into<String>) -> Self {
        Self {
            output_name: output_name.into(),
            ..Self::default()
        }
    }

    /// Log the report
    pub fn log(&self) {
        tracing::info!(
            output_name = %self.output_name,
            rows_loaded = self.rows_loaded,
            rows_exported = self.rows_exported,
            gap_data = self.gap_data,
            low_confidence_local_time = self.low_confidence_local_time_removed,
            outside_date_window = self.outside_date_window_removed,
            removed_dates = self.removed_dates_removed,
            negative_durations = self.negative_durations_removed,
            invalid_cgm = self.invalid_cgm_removed,
            tandem_calibration_fixed = self.tandem_calibration_fixed,
            hashed_cells = self.anonymization.total_hashed_cells(),
            files = self.files_written.len(),
            "Donor exported"
        );
    }
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Donors in the control table that qualify
    pub donors_qualified: usize,

    /// Donors whose data went through the pipeline
    pub donors_processed: usize,

    /// Output names of qualified donors without a data file
    pub skipped: Vec<String>,

    /// Rows exported across all donors
    pub total_rows_exported: usize,

    /// Nothing was written
    pub dry_run: bool,

    /// Duration of the export
    pub duration: Duration,

    /// Per-donor reports, in control table order
    pub reports: Vec<DonorReport>,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new() -> Self {
        Self {
            donors_qualified: 0,
            donors_processed: 0,
            skipped: Vec::new(),
            total_rows_exported: 0,
            dry_run: false,
            duration: Duration::from_secs(0),
            reports: Vec::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a processed donor
    pub fn add_report(&mut self, report: DonorReport) {
        self.donors_processed += 1;
        self.total_rows_exported += report.rows_exported;
        self.reports.push(report);
    }

    /// Record a donor without data
    pub fn add_skipped(&mut self, output_name: impl Into<String>) {
        self.skipped.push(output_name.into());
    }

    pub fn donors_skipped(&self) -> usize {
        self.skipped.len()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            donors_qualified = self.donors_qualified,
            donors_processed = self.donors_processed,
            donors_skipped = self.donors_skipped(),
            total_rows_exported = self.total_rows_exported,
            dry_run = self.dry_run,
            duration_secs = self.duration.as_secs(),
            "Export completed"
        );

        if !self.skipped.is_empty() {
            tracing::warn!(
                skipped = ?self.skipped,
                "Some qualified donors had no data file"
            );
        }
    }
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self::new()
    }
}
