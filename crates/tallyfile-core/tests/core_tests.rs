use tallyfile_core::{
    Ledger, ProgressRecord, ProgressReport, ScanEntry, TallyError, aggregate, merge, prune,
};

fn annotated(identifier: &str, size: u64, completed: u8, modified: bool) -> ProgressRecord {
    let mut record = ProgressRecord::new(identifier, size);
    record.completed = completed;
    record.modified = modified;
    record
}

fn names<T: AsRef<str>>(ids: &[T]) -> Vec<&str> {
    ids.iter().map(|id| id.as_ref()).collect()
}

#[test]
fn test_manual_fields_survive_resize() {
    for completed in [0u8, 1, 33, 99, 100] {
        for modified in [false, true] {
            let prior =
                Ledger::from_records([annotated("Engine", 40, completed, modified)]).unwrap();
            let (ledger, _) = merge(&[ScanEntry::new("Engine", 75)], prior).unwrap();

            let record = ledger.get("Engine").unwrap();
            assert_eq!(record.completed, completed);
            assert_eq!(record.modified, modified);
            assert_eq!(record.size, 75);
        }
    }
}

#[test]
fn test_full_run_across_two_scans() {
    // First run: nothing tracked yet.
    let first_scan = vec![
        ScanEntry::new("Button", 120),
        ScanEntry::new("Room", 200),
        ScanEntry::new("World", 80),
    ];
    let (mut ledger, summary) = merge(&first_scan, Ledger::new()).unwrap();
    assert_eq!(summary.added.len(), 3);
    assert!(summary.missing.is_empty());

    // Someone records progress by hand between runs.
    ledger.annotate("Room", Some(50), Some(true)).unwrap();
    ledger.annotate("Button", Some(100), None).unwrap();

    // Second run: Room grew, World vanished, Sprite is new.
    let second_scan = vec![
        ScanEntry::new("Sprite", 100),
        ScanEntry::new("Room", 280),
        ScanEntry::new("Button", 120),
    ];
    let (ledger, summary) = merge(&second_scan, ledger).unwrap();
    assert_eq!(names(&summary.added), ["Sprite"]);
    assert_eq!(summary.updated, 2);
    assert_eq!(summary.resized, 1);
    assert_eq!(names(&summary.missing), ["World"]);

    assert_eq!(ledger.len(), 4);
    assert_eq!(ledger.get("World").unwrap().size, 80);
    assert_eq!(ledger.get("Room").unwrap().completed, 50);

    // 120 * 1.0 + 280 * 0.5 = 260 of 580.
    let totals = aggregate(&ledger).unwrap();
    assert_eq!(totals.total_size, 580);
    assert_eq!(totals.completed_size, 260.0);
    assert!((totals.overall_percent() - 44.827_586).abs() < 1e-4);

    let report = ProgressReport::assemble(&ledger, totals);
    let ids: Vec<&str> = report.rows.iter().map(|r| r.identifier.as_str()).collect();
    assert_eq!(ids, ["Button", "Room", "Sprite", "World"]);
    let share: f64 = report.rows.iter().map(|r| r.size_fraction_of_total).sum();
    assert!((share - 100.0).abs() < 1e-9);
}

#[test]
fn test_weighted_aggregate_example() {
    let ledger =
        Ledger::from_records([annotated("A", 100, 50, false), annotated("B", 300, 0, false)])
            .unwrap();
    let totals = aggregate(&ledger).unwrap();
    assert_eq!(totals.total_size, 400);
    assert_eq!(totals.completed_size, 50.0);
    assert_eq!(totals.overall_percent(), 12.5);
}

#[test]
fn test_failed_merge_leaves_prior_untouched() {
    let prior = Ledger::from_records([annotated("Room", 10, 20, true)]).unwrap();
    let snapshot = prior.clone();

    let scan = vec![ScanEntry::new("New", 5), ScanEntry::new("Room", -3)];
    let err = merge(&scan, prior.clone()).unwrap_err();
    assert!(matches!(err, TallyError::InvalidSize { size: -3, .. }));
    assert_eq!(prior, snapshot);
}

#[test]
fn test_prune_then_aggregate() {
    let ledger = Ledger::from_records([
        annotated("Keep", 10, 100, false),
        annotated("Stale", 90, 0, false),
    ])
    .unwrap();

    let (ledger, removed) = prune(ledger, ["Keep"]);
    assert_eq!(names(&removed), ["Stale"]);
    assert_eq!(aggregate(&ledger).unwrap().overall_percent(), 100.0);

    let (ledger, removed) = prune(ledger, std::iter::empty());
    assert_eq!(names(&removed), ["Keep"]);
    assert_eq!(aggregate(&ledger), Err(TallyError::EmptyLedger));
}
