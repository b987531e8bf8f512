pub mod export_csv;
pub mod export_xlsx;

pub use export_csv::{read_listings_csv, write_listings_csv};
pub use export_xlsx::write_listings_xlsx;

use crate::domain::ResultSet;
use mime::Mime;
use std::path::Path;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("XLSX error: {0}")]
    Xlsx(String),
    #[error("Unexpected header row: {0}")]
    Schema(String),
    #[error("Line {line}: {reason}")]
    Row { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn write(self, results: &ResultSet, path: &Path) -> Result<(), ExportError> {
        match self {
            ExportFormat::Csv => write_listings_csv(results, path),
            ExportFormat::Xlsx => write_listings_xlsx(results, path),
        }
    }
}

/// MIME type sent along with an exported file, picked by extension.
pub fn mime_for_path(path: &Path) -> Mime {
    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => mime::TEXT_CSV,
        Some("xlsx") => XLSX_MIME.parse().unwrap_or(mime::APPLICATION_OCTET_STREAM),
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}
