//! Ledger persistence for tallyfile.
//!
//! The ledger is stored as pretty-printed JSON keyed by identifier, with
//! sorted keys and a trailing newline, so saving an unchanged ledger yields
//! byte-identical output. Saves go through a temporary file in the target
//! directory and an atomic rename.

mod error;
mod store;

pub use error::StoreError;
pub use store::{DEFAULT_LEDGER_FILE, LedgerStore};

pub use tallyfile_core::Ledger;
