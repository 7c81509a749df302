//! Rows handed to report renderers.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::aggregate::{Aggregate, aggregate};
use crate::error::TallyError;
use crate::ledger::Ledger;

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowView {
    /// Record identifier.
    pub identifier: CompactString,
    /// Completion in [0, 1].
    pub completed_fraction: f64,
    /// Share of the total size, as a percentage in [0, 100].
    pub size_fraction_of_total: f64,
    /// Raw size metric.
    pub size: u64,
    /// Modified flag.
    pub modified: bool,
}

/// Everything a renderer needs: ordered rows plus the overall figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Rows in ascending identifier order.
    pub rows: Vec<RowView>,
    /// Overall completion in [0, 1].
    pub overall_fraction: f64,
    /// Totals the rows were computed from.
    pub aggregate: Aggregate,
}

impl ProgressReport {
    /// Assemble the report for a ledger and its precomputed aggregate.
    pub fn assemble(ledger: &Ledger, aggregate: Aggregate) -> Self {
        let total = aggregate.total_size as f64;
        let rows = ledger
            .iter()
            .map(|record| RowView {
                identifier: record.identifier.clone(),
                completed_fraction: record.completion(),
                size_fraction_of_total: record.size as f64 / total * 100.0,
                size: record.size,
                modified: record.modified,
            })
            .collect();

        Self {
            rows,
            overall_fraction: aggregate.overall_fraction,
            aggregate,
        }
    }

    /// Aggregate the ledger and assemble its report in one step.
    pub fn from_ledger(ledger: &Ledger) -> Result<Self, TallyError> {
        let totals = aggregate(ledger)?;
        Ok(Self::assemble(ledger, totals))
    }

    /// Overall completion as a percentage.
    pub fn overall_percent(&self) -> f64 {
        self.aggregate.overall_percent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProgressRecord;

    #[test]
    fn test_rows_sorted_and_scaled() {
        let mut zeta = ProgressRecord::new("Zeta", 300);
        zeta.modified = true;
        let mut alpha = ProgressRecord::new("Alpha", 100);
        alpha.completed = 50;
        let ledger = Ledger::from_records([zeta, alpha]).unwrap();

        let report = ProgressReport::from_ledger(&ledger).unwrap();
        let ids: Vec<&str> = report.rows.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, ["Alpha", "Zeta"]);

        assert_eq!(report.rows[0].completed_fraction, 0.5);
        assert_eq!(report.rows[0].size_fraction_of_total, 25.0);
        assert_eq!(report.rows[1].size_fraction_of_total, 75.0);
        assert!(report.rows[1].modified);
        assert_eq!(report.overall_fraction, 0.125);
        assert_eq!(report.overall_percent(), 12.5);
    }

    #[test]
    fn test_empty_ledger_has_no_report() {
        assert!(matches!(
            ProgressReport::from_ledger(&Ledger::new()),
            Err(TallyError::EmptyLedger)
        ));
    }
}
