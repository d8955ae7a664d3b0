//! Export file formats
//!
//! - [`csv`] - hidden `.{name}-csvs/` folder, one file per record type
//! - [`json`] - `{name}.json`, every record in one array
//! - [`xlsx`] - `{name}.xlsx`, one worksheet per record type

pub mod csv;
pub mod json;
pub mod traits;
pub mod xlsx;

pub use self::csv::CsvFolderWriter;
pub use self::json::JsonWriter;
pub use self::traits::OutputWriter;
pub use self::xlsx::XlsxWriter;
