//! Error types for report rendering.

use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

/// Errors that can occur while rendering a report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Building or saving the spreadsheet failed.
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] XlsxError),

    /// Writing the report failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The report could not be serialized.
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

impl RenderError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
