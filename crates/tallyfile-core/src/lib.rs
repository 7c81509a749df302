//! Core types and the merge engine for tallyfile.
//!
//! This crate holds the pure part of the progress pipeline: the ledger data
//! model, the merge of a fresh scan into a prior ledger, weighted aggregation
//! and the assembly of report rows. Nothing here touches the filesystem.
//!
//! # Example
//!
//! ```rust
//! use tallyfile_core::{Ledger, ScanEntry, aggregate, merge};
//!
//! let scan = vec![ScanEntry::new("Parser", 120), ScanEntry::new("Lexer", 80)];
//! let (ledger, summary) = merge(&scan, Ledger::new()).unwrap();
//! assert_eq!(summary.added.len(), 2);
//!
//! let totals = aggregate(&ledger).unwrap();
//! assert_eq!(totals.total_size, 200);
//! assert_eq!(totals.overall_percent(), 0.0);
//! ```

mod aggregate;
mod config;
mod error;
mod ledger;
mod record;
mod report;

pub use aggregate::{Aggregate, aggregate};
pub use config::{IdentifierStyle, ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, ScanWarning, TallyError, WarningKind};
pub use ledger::{Ledger, MergeSummary, merge, prune};
pub use record::{ProgressRecord, ScanEntry};
pub use report::{ProgressReport, RowView};
