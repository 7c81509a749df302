//! Error types for ledger persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving a ledger.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the ledger file failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The ledger file is not a valid ledger.
    #[error("Invalid ledger file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The ledger could not be serialized.
    #[error("Failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The temporary file could not replace the ledger.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
