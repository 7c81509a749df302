//! Inventory scanning for tallyfile.
//!
//! Walks a directory tree with jwalk, keeps files with a tracked extension,
//! counts their lines in parallel and turns each into a
//! [`ScanEntry`](tallyfile_core::ScanEntry) keyed by its identifier.
//!
//! # Example
//!
//! ```rust,no_run
//! use tallyfile_scan::{InventoryScanner, ScanConfig};
//!
//! let config = ScanConfig::new("src");
//! let inventory = InventoryScanner::new().scan(&config).unwrap();
//!
//! println!("{} files, {} lines", inventory.files.len(), inventory.total_lines());
//! ```

mod inventory;
mod lines;
mod scanner;

pub use inventory::{Inventory, InventoryFile};
pub use lines::{count_lines, count_lines_in};
pub use scanner::InventoryScanner;

// Re-export core types for convenience
pub use tallyfile_core::{IdentifierStyle, ScanConfig, ScanEntry, ScanError, ScanWarning, WarningKind};
