//! Error types for merging, aggregation and scanning.

use std::path::PathBuf;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the merge engine and aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TallyError {
    /// A scanned size was negative.
    #[error("Invalid size {size} for '{identifier}'")]
    InvalidSize { identifier: CompactString, size: i64 },

    /// The scan reported the same identifier more than once.
    #[error("Duplicate identifier in scan: '{identifier}'")]
    DuplicateIdentifier { identifier: CompactString },

    /// Nothing to aggregate: the ledger is empty or every record has size 0.
    #[error("Ledger is empty; nothing to aggregate")]
    EmptyLedger,

    /// A completion percentage outside [0, 100].
    #[error("Invalid completion {completed}% for '{identifier}' (expected 0-100)")]
    InvalidCompletion {
        identifier: CompactString,
        completed: u32,
    },

    /// An annotation targeted an identifier the ledger does not track.
    #[error("Unknown identifier: '{identifier}'")]
    UnknownIdentifier { identifier: CompactString },
}

/// Errors that can occur while scanning the inventory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Root path is not a directory.
    #[error("Root path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Two scanned files map to the same identifier.
    #[error("Duplicate identifier '{identifier}': {} and {}", first.display(), second.display())]
    DuplicateIdentifier {
        identifier: CompactString,
        first: PathBuf,
        second: PathBuf,
    },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// Error walking a directory.
    ReadError,
    /// Error reading file contents while counting lines.
    CountError,
}

/// Non-fatal warning encountered during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a file whose lines could not be counted.
    pub fn count_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let path = path.into();
        let kind = if error.kind() == std::io::ErrorKind::PermissionDenied {
            WarningKind::PermissionDenied
        } else {
            WarningKind::CountError
        };
        Self {
            message: format!("Cannot count lines in {}: {error}", path.display()),
            path,
            kind,
        }
    }
}
