//! JSON ledger store with atomic replace.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use tallyfile_core::Ledger;

use crate::error::StoreError;

/// Default ledger file name, relative to the working directory.
pub const DEFAULT_LEDGER_FILE: &str = "percent_file.json";

/// Loads and saves a ledger at a fixed path.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    /// Create a store for the given ledger file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the ledger file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger. A missing file yields an empty ledger.
    pub fn load(&self) -> Result<Ledger, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "no ledger yet, starting empty");
                return Ok(Ledger::new());
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let ledger: Ledger = serde_json::from_slice(&bytes).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;

        tracing::debug!(path = %self.path.display(), records = ledger.len(), "loaded ledger");
        Ok(ledger)
    }

    /// Save the ledger, replacing the file atomically.
    ///
    /// The new contents are written to a temporary file next to the ledger
    /// and renamed over it, so a failed save leaves the previous ledger
    /// intact. Existing file permissions are kept.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let bytes = to_bytes(ledger)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
        tmp.write_all(&bytes)
            .and_then(|()| tmp.flush())
            .map_err(|e| StoreError::io(tmp.path(), e))?;

        if let Ok(metadata) = fs::metadata(&self.path) {
            tmp.as_file()
                .set_permissions(metadata.permissions())
                .map_err(|e| StoreError::io(tmp.path(), e))?;
        }

        tmp.persist(&self.path).map_err(|e| StoreError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;

        tracing::info!(path = %self.path.display(), records = ledger.len(), "saved ledger");
        Ok(())
    }
}

/// Serialize a ledger exactly as [`LedgerStore::save`] writes it.
pub(crate) fn to_bytes(ledger: &Ledger) -> Result<Vec<u8>, StoreError> {
    let mut bytes = serde_json::to_vec_pretty(ledger)?;
    bytes.push(b'\n');
    Ok(bytes)
}
