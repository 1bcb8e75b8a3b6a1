//! Spreadsheet ingestion into the price and condition tables.
//!
//! Files are read into [`sheet::SheetData`] first (CSV or XLSX), then each
//! importer walks the rows sequentially. Row failures are collected into the
//! summary; only file-level problems surface as [`ImportError`].

pub mod condition_import;
pub mod price_import;
pub mod price_sheet;
pub mod sheet;

use crate::error::CoreError;

/// File-level import failure. Row-level failures never use this type.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Unsupported file type '{0}', expected .csv or .xlsx")]
    UnsupportedFormat(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("XLSX error: {0}")]
    Xlsx(String),

    #[error("Workbook has none of the expected sheets: {0}")]
    MissingSheet(String),

    #[error("Required column '{0}' not found")]
    MissingColumn(&'static str),

    #[error("File contains no data rows")]
    Empty,
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::Xlsx(err.to_string())
    }
}

impl From<ImportError> for CoreError {
    fn from(err: ImportError) -> Self {
        CoreError::Validation(err.to_string())
    }
}
