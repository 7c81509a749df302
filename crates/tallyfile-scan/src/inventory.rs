//! Scan results.

use std::path::PathBuf;
use std::time::Duration;

use compact_str::CompactString;

use tallyfile_core::{ScanEntry, ScanWarning};

/// A tracked file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryFile {
    /// Identifier derived from the path.
    pub identifier: CompactString,
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Line count.
    pub lines: u64,
}

/// Result of an inventory scan, ordered by identifier with no duplicates.
#[derive(Debug, Clone)]
pub struct Inventory {
    /// Canonical root that was scanned.
    pub root: PathBuf,
    /// Tracked files in ascending identifier order.
    pub files: Vec<InventoryFile>,
    /// Duration of the scan.
    pub scan_duration: Duration,
    /// Warnings encountered during the scan.
    pub warnings: Vec<ScanWarning>,
}

impl Inventory {
    /// Scan entries ready to be merged into a ledger.
    pub fn entries(&self) -> Vec<ScanEntry> {
        self.files
            .iter()
            .map(|file| {
                let size = i64::try_from(file.lines).unwrap_or(i64::MAX);
                ScanEntry::new(file.identifier.clone(), size)
            })
            .collect()
    }

    /// Identifiers of every tracked file, ascending.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.identifier.as_str())
    }

    /// Sum of all line counts.
    pub fn total_lines(&self) -> u64 {
        self.files.iter().map(|f| f.lines).sum()
    }

    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
