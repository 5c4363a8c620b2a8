use std::fs;

use bevy::prelude::*;
use serde_json::Value;

use super::*;
use crate::common::state::LevelId;

fn settings_in(dir: &tempfile::TempDir) -> SaveSettings {
    SaveSettings::new(dir.path(), "slot")
}

#[test]
fn unset_levels_read_default_score() {
    let save = SaveFile::in_memory();
    for level in LevelId::ALL {
        assert_eq!(save.get_high_score_for_level(level), DEFAULT_HIGH_SCORE);
    }
}

#[test]
fn high_scores_only_go_up() {
    let mut save = SaveFile::in_memory();

    assert!(save.set_high_score_for_level(LevelId::Mineshaft, 9.8).unwrap());
    assert!(!save.set_high_score_for_level(LevelId::Mineshaft, 5.0).unwrap());
    assert!(!save.set_high_score_for_level(LevelId::Mineshaft, 9.8).unwrap());
    assert_eq!(save.get_high_score_for_level(LevelId::Mineshaft), 9.8);

    assert!(save.set_high_score_for_level(LevelId::Mineshaft, 12.3).unwrap());
    assert_eq!(save.get_high_score_for_level(LevelId::Mineshaft), 12.3);
    assert_eq!(save.get_high_score_for_level(LevelId::Roll), 0.0);
}

#[test]
fn unset_levels_read_locked() {
    let save = SaveFile::in_memory();
    assert!(LevelId::ALL.iter().all(|&level| save.level_is_locked(level)));
}

#[test]
fn stored_lock_reads_back() {
    let mut save = SaveFile::in_memory();
    save.set_level_is_locked(LevelId::Airborne, false).unwrap();
    assert!(!save.level_is_locked(LevelId::Airborne));
    assert!(save.level_is_locked(LevelId::Roll));

    save.set_level_is_locked(LevelId::Airborne, true).unwrap();
    assert!(save.level_is_locked(LevelId::Airborne));
}

#[test]
fn writes_reach_disk_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);

    let mut save = SaveFile::open(&settings).unwrap();
    save.set_high_score_for_level(LevelId::Artillery, 4.25).unwrap();
    save.set_level_is_locked(LevelId::Roll, true).unwrap();

    let raw = fs::read_to_string(settings.path().unwrap()).unwrap();
    let json: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["ArtilleryHighScore"], Value::from(4.25));
    assert_eq!(json["RollIsLocked"], Value::Bool(true));

    let reopened = SaveFile::open(&settings).unwrap();
    assert_eq!(reopened.get_high_score_for_level(LevelId::Artillery), 4.25);
    assert!(reopened.level_is_locked(LevelId::Roll));
}

#[test]
fn missing_file_opens_empty() {
    let dir = tempfile::tempdir().unwrap();
    let save = SaveFile::open(&SaveSettings::new(dir.path().join("nested"), "fresh")).unwrap();
    assert!(save.is_persistent());
    assert_eq!(save.get_high_score_for_level(LevelId::Incendiary), 0.0);
}

#[test]
fn new_saves_are_seeded_on_first_write() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);

    let mut save = SaveFile::open(&settings).unwrap();
    save.set_high_score_for_level(LevelId::Roll, 2.0).unwrap();

    let json: Value = serde_json::from_str(&fs::read_to_string(settings.path().unwrap()).unwrap()).unwrap();
    assert_eq!(json["FallingFastLevelIsLocked"], Value::Bool(false));
}

#[test]
fn unknown_keys_survive_a_rewrite() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);
    fs::write(settings.path().unwrap(), r#"{"FallingFastLevelIsLocked": false}"#).unwrap();

    let mut save = SaveFile::open(&settings).unwrap();
    save.set_high_score_for_level(LevelId::Roll, 1.5).unwrap();

    let json: Value = serde_json::from_str(&fs::read_to_string(settings.path().unwrap()).unwrap()).unwrap();
    assert_eq!(json["FallingFastLevelIsLocked"], Value::Bool(false));
    assert_eq!(json["RollHighScore"], Value::from(1.5));
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);

    fs::write(settings.path().unwrap(), "{ not json").unwrap();
    assert!(matches!(SaveFile::open(&settings), Err(SaveError::Json { .. })));

    fs::write(settings.path().unwrap(), "[1, 2, 3]").unwrap();
    assert!(matches!(SaveFile::open(&settings), Err(SaveError::NotAnObject(_))));
}

#[test]
fn close_detaches_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);

    let mut save = SaveFile::open(&settings).unwrap();
    save.set_high_score_for_level(LevelId::Mineshaft, 3.0).unwrap();
    save.close().unwrap();
    assert!(!save.is_persistent());

    save.set_high_score_for_level(LevelId::Mineshaft, 30.0).unwrap();
    assert_eq!(save.get_high_score_for_level(LevelId::Mineshaft), 30.0);

    let reopened = SaveFile::open(&settings).unwrap();
    assert_eq!(reopened.get_high_score_for_level(LevelId::Mineshaft), 3.0);
}

#[test]
fn plugin_degrades_to_memory_on_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings_in(&dir);
    fs::write(settings.path().unwrap(), "garbage").unwrap();

    let mut app = App::new();
    app.insert_resource(settings);
    super::plugin(&mut app);

    let save = app.world().resource::<SaveFile>();
    assert!(!save.is_persistent());
}

#[test]
fn slot_names_are_validated() {
    assert!(is_valid_slot("saveFile"));
    assert!(is_valid_slot("slot-2_b"));
    assert!(!is_valid_slot(""));
    assert!(!is_valid_slot("../escape"));
}
