//! Integration tests for dry-run mode
//!
//! These tests verify that dry-run runs every donor through the pipeline
//! while writing no export file and no audit entry.

mod common;

use common::Fixture;
use donor_export::cli::commands::export::ExportArgs;
use donor_export::core::export::summary::ExportSummary;
use donor_export::core::export::ExportCoordinator;

#[test]
fn test_coordinator_dry_run_writes_nothing() {
    let fixture = Fixture::new("all");
    let coordinator = ExportCoordinator::new(fixture.config())
        .unwrap()
        .with_dry_run(true);

    let summary = coordinator.execute_export().unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.donors_processed, 1);
    assert_eq!(summary.total_rows_exported, 4);
    assert!(summary.reports[0].files_written.is_empty());
    assert!(!fixture.output_dir().exists());
    assert!(!fixture.audit_log().exists());
}

#[test]
fn test_dry_run_from_config_file() {
    let fixture = Fixture::new("all");
    let mut config = fixture.config();
    config.application.dry_run = true;

    let summary = ExportCoordinator::new(config)
        .unwrap()
        .execute_export()
        .unwrap();

    assert!(summary.dry_run);
    assert!(!fixture.output_dir().exists());
}

#[test]
fn test_dry_run_flag_overrides_config() {
    let fixture = Fixture::new("all");
    let mut config = fixture.config();
    config.application.dry_run = true;

    let summary = ExportCoordinator::new(config)
        .unwrap()
        .with_dry_run(false)
        .execute_export()
        .unwrap();

    assert!(!summary.dry_run);
    assert!(fixture.output_dir().join("D1_aaaa1111.json").is_file());
}

#[test]
fn test_export_command_with_dry_run_flag() {
    let fixture = Fixture::new("all");
    let args = ExportArgs { dry_run: true };

    let code = args
        .execute(fixture.config_path().to_str().unwrap())
        .unwrap();

    assert_eq!(code, 0);
    assert!(!fixture.output_dir().exists());
}

#[test]
fn test_export_summary_dry_run_default() {
    let summary = ExportSummary::new();
    assert!(!summary.dry_run);
    assert_eq!(summary.donors_skipped(), 0);
}
