//! Size-weighted aggregation over a ledger.

use serde::{Deserialize, Serialize};

use crate::error::TallyError;
use crate::ledger::Ledger;

/// Derived totals for a ledger. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    /// Sum of all record sizes.
    pub total_size: u64,
    /// Sum of each size weighted by its completion.
    pub completed_size: f64,
    /// `completed_size / total_size`, in [0, 1].
    pub overall_fraction: f64,
    /// Number of records aggregated.
    pub record_count: usize,
}

impl Aggregate {
    /// Overall completion as a percentage in [0, 100].
    pub fn overall_percent(&self) -> f64 {
        self.overall_fraction * 100.0
    }

    /// Mean size per record.
    pub fn mean_size(&self) -> f64 {
        self.total_size as f64 / self.record_count as f64
    }
}

/// Compute weighted completion over every record in the ledger.
///
/// Fails with [`TallyError::EmptyLedger`] when the total size is zero instead
/// of producing a NaN.
pub fn aggregate(ledger: &Ledger) -> Result<Aggregate, TallyError> {
    let total_size = ledger.total_size();
    if total_size == 0 {
        return Err(TallyError::EmptyLedger);
    }

    let completed_size: f64 = ledger.iter().map(|r| r.completed_size()).sum();

    Ok(Aggregate {
        total_size,
        completed_size,
        overall_fraction: completed_size / total_size as f64,
        record_count: ledger.len(),
    })
}
