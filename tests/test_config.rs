use std::path::PathBuf;

use pixel_quest::config::*;
use pixel_quest::error::GameError;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = GameConfig::load(&dir.path().join("nope.toml")).unwrap();
    assert_eq!(config, GameConfig::default());
    assert_eq!(config.fps, 60);
    assert_eq!(config.log_filter, "info");
    assert_eq!(config.log_file, PathBuf::from("pixel_quest.log"));
    assert!(config.score_file.is_none());
    assert!(config.seed.is_none());
}

#[test]
fn partial_file_keeps_other_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    std::fs::write(&path, "fps = 30\nseed = 7\nscore_file = \"/tmp/best\"\n").unwrap();

    let config = GameConfig::load(&path).unwrap();
    assert_eq!(config.fps, 30);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.score_file, Some(PathBuf::from("/tmp/best")));
    assert_eq!(config.log_filter, "info");
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(CONFIG_FILE);
    std::fs::write(&path, "fps = \"fast\"").unwrap();
    assert!(matches!(GameConfig::load(&path), Err(GameError::ConfigParse(_))));
}

#[test]
fn zero_fps_is_clamped() {
    let config = GameConfig::parse("fps = 0").unwrap();
    assert_eq!(config.fps, 1);
    assert_eq!(config.frame_duration(), std::time::Duration::from_secs(1));
}

#[test]
fn frame_duration_follows_fps() {
    let config = GameConfig::parse("fps = 50").unwrap();
    assert_eq!(config.frame_duration(), std::time::Duration::from_millis(20));
}

#[test]
fn log_filter_directive_passes_through() {
    let config = GameConfig::parse("log_filter = \"pixel_quest=debug\"").unwrap();
    assert_eq!(config.log_filter, "pixel_quest=debug");
}
