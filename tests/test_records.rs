use std::time::Duration;

use cat_hero::records::Records;

#[test]
fn missing_file_gives_fresh_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert_eq!(Records::load(&dir.path().join("records.ron")), Records::default());
}

#[test]
fn corrupt_file_gives_fresh_records() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("records.ron");
    std::fs::write(&path, "{{ garbage").expect("write");
    assert_eq!(Records::load(&path), Records::default());
}

#[test]
fn records_save_and_load() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("records.ron");
    let records = Records {
        best_total_kills: 42,
        victories: 2,
        fastest_victory_ms: Some(95_000),
    };
    records.save(&path).expect("save");
    assert_eq!(Records::load(&path), records);
}

#[test]
fn game_over_only_improves_best_kills() {
    let mut records = Records::default();
    assert!(records.record_run(12, None));
    assert_eq!(records.best_total_kills, 12);
    assert!(!records.record_run(5, None));
    assert_eq!(records.best_total_kills, 12);
    assert_eq!(records.victories, 0);
}

#[test]
fn victory_tracks_fastest_time() {
    let mut records = Records::default();
    assert!(records.record_run(158, Some(Duration::from_secs(300))));
    assert!(records.record_run(158, Some(Duration::from_secs(400))));
    assert_eq!(records.victories, 2);
    assert_eq!(records.fastest_victory_ms, Some(300_000));

    records.record_run(158, Some(Duration::from_secs(200)));
    assert_eq!(records.fastest_victory_ms, Some(200_000));
}
