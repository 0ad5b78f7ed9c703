use space_defender::save::{SaveData, SaveStore};

use std::path::PathBuf;

/// Unique temp path per test so parallel runs don't collide.
fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("space_defender_test_{}_{}", std::process::id(), name))
}

struct TempFile(PathBuf);

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

// ── Record format ─────────────────────────────────────────────────────────────

#[test]
fn record_round_trips() {
    let data = SaveData {
        high_score: 4200,
        max_level_unlocked: 3,
        music_volume: 0.25,
        sfx_volume: 0.75,
        player_name: "Ace".to_string(),
        total_enemies_killed: 137,
        total_play_time: 3600,
    };
    let parsed = SaveData::from_record(&data.to_record());
    assert_eq!(parsed, data);
}

#[test]
fn defaults_are_sensible() {
    let data = SaveData::default();
    assert_eq!(data.high_score, 0);
    assert_eq!(data.max_level_unlocked, 1);
    assert_eq!(data.player_name, "Player");
}

#[test]
fn unknown_keys_are_ignored() {
    let record = "HighScore=500\nFutureSetting=whatever\nMaxLevelUnlocked=2\n";
    let data = SaveData::from_record(record);
    assert_eq!(data.high_score, 500);
    assert_eq!(data.max_level_unlocked, 2);
}

#[test]
fn corrupt_values_keep_defaults() {
    let record = "HighScore=not_a_number\nMaxLevelUnlocked=2\ngarbage line\n";
    let data = SaveData::from_record(record);
    assert_eq!(data.high_score, 0); // unparsable → default
    assert_eq!(data.max_level_unlocked, 2); // later valid lines still apply
}

#[test]
fn empty_record_yields_defaults() {
    assert_eq!(SaveData::from_record(""), SaveData::default());
}

// ── Store ─────────────────────────────────────────────────────────────────────

#[test]
fn store_round_trips_through_disk() {
    let path = temp_path("roundtrip");
    let _guard = TempFile(path.clone());
    let store = SaveStore::at(&path);

    let mut data = SaveData::default();
    data.high_score = 999;
    data.player_name = "Disk".to_string();
    store.save(&data).unwrap();

    assert_eq!(store.load(), data);
}

#[test]
fn missing_file_loads_defaults() {
    let store = SaveStore::at(temp_path("nonexistent"));
    assert_eq!(store.load(), SaveData::default());
}

#[test]
fn high_score_only_moves_up() {
    let path = temp_path("highscore");
    let _guard = TempFile(path.clone());
    let store = SaveStore::at(&path);
    let mut data = SaveData::default();

    store.update_high_score(&mut data, 300);
    assert_eq!(data.high_score, 300);
    assert_eq!(store.load().high_score, 300); // persisted

    store.update_high_score(&mut data, 150);
    assert_eq!(data.high_score, 300); // lower score ignored
}

#[test]
fn level_unlock_is_monotonic() {
    let path = temp_path("unlock");
    let _guard = TempFile(path.clone());
    let store = SaveStore::at(&path);
    let mut data = SaveData::default();

    store.unlock_level(&mut data, 3);
    assert_eq!(data.max_level_unlocked, 3);
    assert_eq!(store.load().max_level_unlocked, 3);

    store.unlock_level(&mut data, 2);
    assert_eq!(data.max_level_unlocked, 3); // never locks back down
}
