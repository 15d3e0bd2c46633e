use pixel_quest::error::GameError;
use pixel_quest::store::*;

#[test]
fn missing_file_reads_as_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileScoreStore::new(dir.path().join("best"));
    assert_eq!(store.load_best().unwrap(), 0);
}

#[test]
fn saved_score_is_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileScoreStore::new(dir.path().join("best"));
    store.save_best(1230).unwrap();
    assert_eq!(store.load_best().unwrap(), 1230);

    store.save_best(40).unwrap();
    assert_eq!(FileScoreStore::new(store.path().clone()).load_best().unwrap(), 40);
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best");
    std::fs::write(&path, "  512\n").unwrap();
    assert_eq!(FileScoreStore::new(path).load_best().unwrap(), 512);
}

#[test]
fn garbage_is_invalid_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("best");
    std::fs::write(&path, "lots\n").unwrap();
    match FileScoreStore::new(path).load_best() {
        Err(GameError::InvalidScore(text)) => assert_eq!(text, "lots"),
        other => panic!("expected InvalidScore, got {other:?}"),
    }
}

#[test]
fn unwritable_location_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = FileScoreStore::new(dir.path().join("missing").join("best"));
    assert!(matches!(store.save_best(1), Err(GameError::Io(_))));
}
