/// Persistent progress: high score, unlocked levels, settings, stats.
///
/// Stored as a flat key=value record under the user's home directory.
/// Reads never fail the game: a missing or corrupt file silently yields
/// the defaults (with a log line so the condition is diagnosable).

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("failed to write save file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SaveData {
    pub high_score: i32,
    pub max_level_unlocked: u32,
    pub music_volume: f32,
    pub sfx_volume: f32,
    pub player_name: String,
    pub total_enemies_killed: u32,
    pub total_play_time: u64,
}

impl Default for SaveData {
    fn default() -> Self {
        SaveData {
            high_score: 0,
            max_level_unlocked: 1,
            music_volume: 0.5,
            sfx_volume: 1.0,
            player_name: "Player".to_string(),
            total_enemies_killed: 0,
            total_play_time: 0,
        }
    }
}

impl SaveData {
    /// Serialize to the flat key=value record.
    pub fn to_record(&self) -> String {
        format!(
            "HighScore={}\n\
             MaxLevelUnlocked={}\n\
             MusicVolume={}\n\
             SfxVolume={}\n\
             PlayerName={}\n\
             TotalEnemiesKilled={}\n\
             TotalPlayTime={}\n",
            self.high_score,
            self.max_level_unlocked,
            self.music_volume,
            self.sfx_volume,
            self.player_name,
            self.total_enemies_killed,
            self.total_play_time,
        )
    }

    /// Parse a record. Unknown keys and unparsable values are skipped, the
    /// field keeping its default — a corrupt file degrades, never fails.
    pub fn from_record(record: &str) -> SaveData {
        let mut data = SaveData::default();
        for line in record.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "HighScore" => {
                    if let Ok(v) = value.parse() {
                        data.high_score = v;
                    }
                }
                "MaxLevelUnlocked" => {
                    if let Ok(v) = value.parse() {
                        data.max_level_unlocked = v;
                    }
                }
                "MusicVolume" => {
                    if let Ok(v) = value.parse() {
                        data.music_volume = v;
                    }
                }
                "SfxVolume" => {
                    if let Ok(v) = value.parse() {
                        data.sfx_volume = v;
                    }
                }
                "PlayerName" => data.player_name = value.to_string(),
                "TotalEnemiesKilled" => {
                    if let Ok(v) = value.parse() {
                        data.total_enemies_killed = v;
                    }
                }
                "TotalPlayTime" => {
                    if let Ok(v) = value.parse() {
                        data.total_play_time = v;
                    }
                }
                _ => {}
            }
        }
        data
    }
}

pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        SaveStore { path: path.into() }
    }

    pub fn default_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".space_defender_save")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, falling back to defaults on any failure.
    pub fn load(&self) -> SaveData {
        match std::fs::read_to_string(&self.path) {
            Ok(record) => SaveData::from_record(&record),
            Err(err) => {
                log::warn!("save file unreadable ({err}), using defaults");
                SaveData::default()
            }
        }
    }

    pub fn save(&self, data: &SaveData) -> Result<(), SaveError> {
        std::fs::write(&self.path, data.to_record())?;
        Ok(())
    }

    /// Record a new high score if `score` beats the stored one.
    pub fn update_high_score(&self, data: &mut SaveData, score: i32) {
        if score > data.high_score {
            data.high_score = score;
            self.persist(data);
        }
    }

    /// Unlock `level` if it is beyond the current maximum.
    pub fn unlock_level(&self, data: &mut SaveData, level: u32) {
        if level > data.max_level_unlocked {
            data.max_level_unlocked = level;
            self.persist(data);
        }
    }

    fn persist(&self, data: &SaveData) {
        if let Err(err) = self.save(data) {
            log::warn!("could not persist save data: {err}");
        }
    }
}
