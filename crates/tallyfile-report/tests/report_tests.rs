use tallyfile_core::{Ledger, ProgressRecord, ProgressReport};
use tallyfile_report::{COMPLETION_SCALE, JsonRenderer, Renderer, TextRenderer, XlsxRenderer};
use tempfile::TempDir;

fn sample_report() -> ProgressReport {
    let records = [("Button", 120, 100), ("Room", 280, 50), ("Sprite", 100, 0)]
        .into_iter()
        .map(|(id, size, completed)| {
            let mut record = ProgressRecord::new(id, size);
            record.completed = completed;
            record
        });
    let ledger = Ledger::from_records(records).unwrap();
    ProgressReport::from_ledger(&ledger).unwrap()
}

#[test]
fn test_every_renderer_writes_its_file() {
    let temp = TempDir::new().unwrap();
    let report = sample_report();

    let renderers: Vec<(&str, Box<dyn Renderer>)> = vec![
        ("report.xlsx", Box::new(XlsxRenderer::new())),
        ("report.txt", Box::new(TextRenderer::new())),
        ("report.json", Box::new(JsonRenderer::new())),
    ];

    for (name, renderer) in renderers {
        let path = temp.path().join(name);
        renderer.render(&report, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0, "{name} is empty");
    }
}

#[test]
fn test_json_file_round_trips() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("report.json");
    let report = sample_report();

    JsonRenderer::new().render(&report, &path).unwrap();
    let parsed: ProgressReport =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(parsed, report);
}

#[test]
fn test_scale_follows_completion() {
    let report = sample_report();
    let colors: Vec<_> = report
        .rows
        .iter()
        .map(|row| COMPLETION_SCALE.color_at(row.completed_fraction))
        .collect();

    assert_eq!(colors[0], COMPLETION_SCALE.max);
    assert_eq!(colors[1], COMPLETION_SCALE.mid);
    assert_eq!(colors[2], COMPLETION_SCALE.min);
}

#[test]
fn test_render_into_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing/report.txt");
    assert!(TextRenderer::new().render(&sample_report(), &path).is_err());
}
