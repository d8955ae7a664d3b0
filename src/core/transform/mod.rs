//! Data transformation logic
//!
//! Single-pass functions over a donor dataframe:
//!
//! - [`filter`] - Local-time quality, date windows, removed days, approved fields
//! - [`clean`] - Negative durations, implausible CGM values, Tandem calibration fix
//! - [`flatten`] - Embedded JSON or Python literal objects lifted into columns
//!
//! Each function returns how many rows or cells it touched so the pipeline can
//! report it.

pub mod clean;
pub mod filter;
pub mod flatten;

pub use clean::{
    remove_invalid_cgm_values, remove_negative_durations, tslim_calibration_fix, CgmBounds,
};
pub use filter::{
    filter_by_dates, filter_by_dates_except_uploads_and_settings, filter_by_required_fields,
    filter_local_time_quality, remove_by_dates,
};
pub use flatten::flatten_embedded_json;
