//! Upload ingestion for the CHD risk toolkit.
//!
//! Turns an uploaded file into a raw polars `DataFrame` with one nullable
//! string column per header. Parsing is the only structural check made here;
//! every value-level decision belongs to reconciliation.

pub mod csv;
pub mod error;
pub mod json;
pub mod table;
pub mod upload;

pub use crate::csv::{CsvOptions, read_csv_bytes, read_csv_bytes_with_options};
pub use error::{IngestError, Result};
pub use json::read_json_records;
pub use table::RawTable;
pub use upload::{UploadFormat, read_upload, read_upload_bytes};
