//! Export coordinator - main orchestrator for the export process
//!
//! This module coordinates the entire export workflow: loading the static
//! inputs, running every qualified donor through the pipeline and writing the
//! requested formats.

use crate::adapters::control::read_control_table;
use crate::adapters::field_list::FieldList;
use crate::adapters::output::{CsvFolderWriter, JsonWriter, OutputWriter, XlsxWriter};
use crate::adapters::tabular::read_table;
use crate::anonymization::AnonymizationEngine;
use crate::config::DonorExportConfig;
use crate::core::export::bundle::ExportBundle;
use crate::core::export::pipeline::DonorPipeline;
use crate::core::export::summary::{DonorReport, ExportSummary};
use crate::domain::{DonorExportError, DonorJob, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Export coordinator
pub struct ExportCoordinator {
    config: DonorExportConfig,
    engine: AnonymizationEngine,
    dry_run: bool,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    ///
    /// Builds the anonymization engine, which validates the salt and opens the
    /// audit log directory.
    pub fn new(config: DonorExportConfig) -> Result<Self> {
        let engine = AnonymizationEngine::new(config.anonymization.clone())
            .map_err(|e| DonorExportError::Anonymization(format!("{e:#}")))?;
        let dry_run = config.application.dry_run;

        Ok(Self {
            config,
            engine,
            dry_run,
        })
    }

    /// Force dry-run mode on or off
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Execute the export
    ///
    /// This is the main entry point for the export process. It:
    /// 1. Loads the field list and the control table
    /// 2. For each qualified donor:
    ///    - Skips donors without a data file
    ///    - Runs the cleaning and anonymization pipeline
    ///    - Writes the requested formats (unless dry-run)
    ///    - Appends an audit entry
    /// 3. Generates summary report
    ///
    /// The first failing donor aborts the run.
    pub fn execute_export(&self) -> Result<ExportSummary> {
        let start_time = Instant::now();
        let mut summary = ExportSummary::new();
        summary.dry_run = self.dry_run;

        tracing::info!(
            dry_run = self.dry_run,
            format = %self.config.export.format,
            "Starting export process"
        );

        let fields = FieldList::load(&self.config.input.field_list)?;
        let jobs = read_control_table(&self.config.input.control_table)?;
        summary.donors_qualified = jobs.len();

        if !self.dry_run {
            fs::create_dir_all(&self.config.export.output_dir).map_err(|e| {
                DonorExportError::Export(format!(
                    "Failed to create output directory {}: {}",
                    self.config.export.output_dir.display(),
                    e
                ))
            })?;
        }

        let pipeline = DonorPipeline::new(&self.config, &fields, &self.engine);

        for job in &jobs {
            let output_name = job.output_name();
            let source = self.config.input.donor_csv_dir.join(job.source_file_name());
            if !source.exists() {
                tracing::warn!(
                    output_name = %output_name,
                    d_index = %job.d_index,
                    "Donor data file not found, skipping"
                );
                summary.add_skipped(output_name);
                continue;
            }

            tracing::info!(output_name = %output_name, "Processing donor");
            let report = self.process_donor(&pipeline, job, &source)?;
            report.log();
            summary.add_report(report);
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    fn process_donor(
        &self,
        pipeline: &DonorPipeline<'_>,
        job: &DonorJob,
        source: &Path,
    ) -> Result<DonorReport> {
        let records = read_table(source)?;
        let (records, mut report) = pipeline.run(job, records)?;
        let bundle = ExportBundle::from_table(&records)?;
        report.rows_exported = bundle.row_count();

        if self.dry_run {
            tracing::info!(
                output_name = %report.output_name,
                record_types = bundle.len(),
                "Dry run - no files written"
            );
            return Ok(report);
        }

        report.files_written = self.write_outputs(&bundle, &report.output_name)?;
        self.engine
            .record_audit(
                &report.output_name,
                job.user_id.as_str(),
                report.rows_exported,
                &report.anonymization,
            )
            .map_err(|e| DonorExportError::Anonymization(format!("{e:#}")))?;

        Ok(report)
    }

    /// Writes every requested format and returns what was produced
    ///
    /// The CSV folder is always built under its hidden name first; it is
    /// published when CSV output is requested and removed otherwise.
    fn write_outputs(&self, bundle: &ExportBundle, output_name: &str) -> Result<Vec<PathBuf>> {
        let output_dir = &self.config.export.output_dir;
        let format = self.config.export.format;

        let csv = CsvFolderWriter;
        let hidden = csv.target_path(output_dir, output_name);
        csv.write(bundle, &hidden)?;

        let mut writers: Vec<Box<dyn OutputWriter>> = Vec::new();
        if format.wants_json() {
            writers.push(Box::new(JsonWriter));
        }
        if format.wants_xlsx() {
            writers.push(Box::new(XlsxWriter));
        }

        let mut written = Vec::new();
        for writer in &writers {
            let target = writer.target_path(output_dir, output_name);
            writer.write(bundle, &target)?;
            tracing::debug!(
                format = writer.format_name(),
                path = %target.display(),
                "Wrote export file"
            );
            written.push(target);
        }

        if format.wants_csv() {
            let published = CsvFolderWriter::published_path(output_dir, output_name);
            if published.exists() {
                fs::remove_dir_all(&published)?;
            }
            fs::rename(&hidden, &published)?;
            written.push(published);
        } else {
            fs::remove_dir_all(&hidden)?;
        }

        Ok(written)
    }
}
