//! The progress ledger and the merge engine.
//!
//! The ledger is a plain value: [`merge`] and [`prune`] take one by value and
//! return the updated ledger, so every transition can be tested without the
//! filesystem. Persistence lives in `tallyfile-store`.

use std::collections::{BTreeMap, HashSet};

use compact_str::CompactString;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::TallyError;
use crate::record::{ProgressRecord, ScanEntry};

/// Mapping from identifier to progress record, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "BTreeMap<CompactString, ProgressRecord>")]
pub struct Ledger {
    records: BTreeMap<CompactString, ProgressRecord>,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from records, rejecting duplicates and out-of-range
    /// completion values.
    pub fn from_records(
        records: impl IntoIterator<Item = ProgressRecord>,
    ) -> Result<Self, TallyError> {
        let mut ledger = Self::new();
        for record in records {
            validate_completion(&record.identifier, u32::from(record.completed))?;
            if ledger.records.contains_key(&record.identifier) {
                return Err(TallyError::DuplicateIdentifier {
                    identifier: record.identifier,
                });
            }
            ledger.records.insert(record.identifier.clone(), record);
        }
        Ok(ledger)
    }

    /// Number of tracked identifiers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the ledger tracks nothing.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by identifier.
    pub fn get(&self, identifier: &str) -> Option<&ProgressRecord> {
        self.records.get(identifier)
    }

    /// Check if an identifier is tracked.
    pub fn contains(&self, identifier: &str) -> bool {
        self.records.contains_key(identifier)
    }

    /// Iterate over records in ascending identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &ProgressRecord> {
        self.records.values()
    }

    /// Iterate over identifiers in ascending order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(CompactString::as_str)
    }

    /// Sum of all record sizes.
    pub fn total_size(&self) -> u64 {
        self.records.values().map(|r| r.size).sum()
    }

    /// Edit the hand-entered fields of one record.
    ///
    /// `None` leaves a field unchanged. `size` can only change through
    /// [`merge`].
    pub fn annotate(
        &mut self,
        identifier: &str,
        completed: Option<u8>,
        modified: Option<bool>,
    ) -> Result<&ProgressRecord, TallyError> {
        if let Some(completed) = completed {
            validate_completion(identifier, u32::from(completed))?;
        }
        let record = self
            .records
            .get_mut(identifier)
            .ok_or_else(|| TallyError::UnknownIdentifier {
                identifier: identifier.into(),
            })?;
        if let Some(completed) = completed {
            record.completed = completed;
        }
        if let Some(modified) = modified {
            record.modified = modified;
        }
        Ok(record)
    }
}

impl TryFrom<BTreeMap<CompactString, ProgressRecord>> for Ledger {
    type Error = TallyError;

    fn try_from(records: BTreeMap<CompactString, ProgressRecord>) -> Result<Self, Self::Error> {
        Self::from_records(records.into_iter().map(|(identifier, mut record)| {
            record.identifier = identifier;
            record
        }))
    }
}

impl Serialize for Ledger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.records.serialize(serializer)
    }
}

fn validate_completion(identifier: &str, completed: u32) -> Result<(), TallyError> {
    if completed > 100 {
        return Err(TallyError::InvalidCompletion {
            identifier: identifier.into(),
            completed,
        });
    }
    Ok(())
}

/// What a merge changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    /// Identifiers that were not tracked before, ascending.
    pub added: Vec<CompactString>,
    /// Number of already-tracked identifiers seen in the scan.
    pub updated: usize,
    /// How many of the updated records changed size.
    pub resized: usize,
    /// Tracked identifiers absent from the scan, ascending. They are kept.
    pub missing: Vec<CompactString>,
}

/// Reconcile a fresh scan into the prior ledger.
///
/// Known identifiers get their size refreshed and keep `completed` and
/// `modified`. Unknown identifiers are added with no progress. Identifiers
/// missing from the scan are retained untouched; see [`prune`] for removal.
///
/// The whole scan is validated before anything changes, and the result does
/// not depend on the order of `scan`.
pub fn merge(scan: &[ScanEntry], prior: Ledger) -> Result<(Ledger, MergeSummary), TallyError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(scan.len());
    for entry in scan {
        if entry.size < 0 {
            return Err(TallyError::InvalidSize {
                identifier: entry.identifier.clone(),
                size: entry.size,
            });
        }
        if !seen.insert(entry.identifier.as_str()) {
            return Err(TallyError::DuplicateIdentifier {
                identifier: entry.identifier.clone(),
            });
        }
    }

    let mut ledger = prior;
    let mut summary = MergeSummary::default();

    for entry in scan {
        // Non-negative was checked above.
        let size = entry.size.unsigned_abs();
        match ledger.records.get_mut(&entry.identifier) {
            Some(record) => {
                summary.updated += 1;
                if record.size != size {
                    summary.resized += 1;
                    record.size = size;
                }
            }
            None => {
                let record = ProgressRecord::new(entry.identifier.clone(), size);
                ledger.records.insert(entry.identifier.clone(), record);
                summary.added.push(entry.identifier.clone());
            }
        }
    }

    summary.added.sort();
    summary.missing = ledger
        .identifiers()
        .filter(|id| !seen.contains(id))
        .map(CompactString::from)
        .collect();

    tracing::debug!(
        added = summary.added.len(),
        updated = summary.updated,
        resized = summary.resized,
        missing = summary.missing.len(),
        "merged scan into ledger"
    );

    Ok((ledger, summary))
}

/// Drop every record whose identifier is not in `valid`.
///
/// This is the explicit, opt-in counterpart to the retention policy of
/// [`merge`]. Returns the pruned ledger and the removed identifiers in
/// ascending order.
pub fn prune<'a>(
    ledger: Ledger,
    valid: impl IntoIterator<Item = &'a str>,
) -> (Ledger, Vec<CompactString>) {
    let valid: HashSet<&str> = valid.into_iter().collect();
    let mut removed = Vec::new();
    let records = ledger
        .records
        .into_iter()
        .filter(|(identifier, _)| {
            let keep = valid.contains(identifier.as_str());
            if !keep {
                removed.push(identifier.clone());
            }
            keep
        })
        .collect();

    (Ledger { records }, removed)
}
