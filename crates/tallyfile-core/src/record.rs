//! Progress records and scan entries.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Progress of a single tracked file.
///
/// `size` is refreshed from every scan. `completed` and `modified` are
/// entered by hand and only change through [`Ledger::annotate`].
///
/// Fields are declared alphabetically so the persisted JSON keeps sorted keys.
/// The identifier is the ledger key and is not written inside the record.
///
/// [`Ledger::annotate`]: crate::Ledger::annotate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// Unique identifier (file name or relative path, extension stripped).
    #[serde(skip)]
    pub identifier: CompactString,
    /// Completion percentage, 0-100.
    pub completed: u8,
    /// Whether the file has been touched since tracking began.
    pub modified: bool,
    /// Size metric, usually the line count.
    pub size: u64,
}

impl ProgressRecord {
    /// Create a fresh record with no recorded progress.
    pub fn new(identifier: impl Into<CompactString>, size: u64) -> Self {
        Self {
            identifier: identifier.into(),
            completed: 0,
            modified: false,
            size,
        }
    }

    /// Completion as a fraction in [0, 1].
    pub fn completion(&self) -> f64 {
        f64::from(self.completed) / 100.0
    }

    /// Size weighted by completion.
    pub fn completed_size(&self) -> f64 {
        self.size as f64 * self.completion()
    }

    /// Check if the file is fully complete.
    pub fn is_complete(&self) -> bool {
        self.completed >= 100
    }
}

/// One `(identifier, size)` pair produced by an inventory scan.
///
/// The size is signed so that input from any scanner can be validated by
/// [`merge`](crate::merge) instead of being silently wrapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEntry {
    /// Identifier with the extension stripped.
    pub identifier: CompactString,
    /// Size metric reported by the scanner.
    pub size: i64,
}

impl ScanEntry {
    /// Create a new scan entry.
    pub fn new(identifier: impl Into<CompactString>, size: i64) -> Self {
        Self {
            identifier: identifier.into(),
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_has_no_progress() {
        let record = ProgressRecord::new("World", 250);
        assert_eq!(record.identifier.as_str(), "World");
        assert_eq!(record.size, 250);
        assert_eq!(record.completed, 0);
        assert!(!record.modified);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_completion_fraction() {
        let mut record = ProgressRecord::new("Room", 200);
        record.completed = 25;
        assert_eq!(record.completion(), 0.25);
        assert_eq!(record.completed_size(), 50.0);

        record.completed = 100;
        assert!(record.is_complete());
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = ProgressRecord::new("Room", 42);
        record.completed = 10;
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"completed":10,"modified":false,"size":42}"#);
    }
}
