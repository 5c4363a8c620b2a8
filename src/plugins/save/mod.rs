//! Save store: high scores and level locks in a JSON object on disk.
//!
//! The file is read once when the store opens and rewritten in full on every
//! set. Keys are `<Level>HighScore` (number) and `<Level>IsLocked` (bool).
//!
//! ```text
//! Startup:  SaveSettings (env) -> SaveFile::open -> insert resource
//!           (open failure -> warn, in-memory store)
//! Levels:   game over -> set_high_score_for_level
//! Menus:    select level -> get_high_score_for_level
//! AppExit:  close
//! ```

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::common::state::LevelId;

pub const SAVE_DIR_ENV_VAR: &str = "TINY_DWARF_SAVE_DIR";
pub const SAVE_SLOT_ENV_VAR: &str = "TINY_DWARF_SAVE_SLOT";

pub const DEFAULT_SAVE_DIR: &str = "saves";
pub const DEFAULT_SAVE_SLOT: &str = "saveFile";
pub const DEFAULT_HIGH_SCORE: f64 = 0.0;
pub const LEVELS_ARE_LOCKED_BY_DEFAULT: bool = true;

/// Entries every new save starts with.
const FRESH_SAVE: [(&str, bool); 1] = [("FallingFastLevelIsLocked", false)];

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save file i/o failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save file {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("save file {0} does not hold a JSON object")]
    NotAnObject(PathBuf),
}

/// Where the save file lives. `dir: None` keeps everything in memory.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct SaveSettings {
    pub dir: Option<PathBuf>,
    pub slot: String,
}

impl SaveSettings {
    pub fn new(dir: impl Into<PathBuf>, slot: impl Into<String>) -> Self {
        Self { dir: Some(dir.into()), slot: slot.into() }
    }

    pub fn in_memory() -> Self {
        Self { dir: None, slot: DEFAULT_SAVE_SLOT.to_string() }
    }

    pub fn from_env() -> Self {
        let dir = env::var(SAVE_DIR_ENV_VAR)
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or_else(|| DEFAULT_SAVE_DIR.to_string());

        let slot = match env::var(SAVE_SLOT_ENV_VAR) {
            Ok(raw) if is_valid_slot(raw.trim()) => raw.trim().to_string(),
            Ok(raw) => {
                warn!(
                    "{SAVE_SLOT_ENV_VAR}={raw:?} is not a usable slot name. Falling back to {DEFAULT_SAVE_SLOT:?}."
                );
                DEFAULT_SAVE_SLOT.to_string()
            }
            Err(_) => DEFAULT_SAVE_SLOT.to_string(),
        };

        Self::new(dir, slot)
    }

    pub fn path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(format!("{}.json", self.slot)))
    }
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SAVE_DIR, DEFAULT_SAVE_SLOT)
    }
}

fn is_valid_slot(slot: &str) -> bool {
    !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
struct SaveData(Map<String, Value>);

impl SaveData {
    fn fresh() -> Self {
        Self(FRESH_SAVE.iter().map(|&(key, value)| (key.to_string(), Value::Bool(value))).collect())
    }
}

#[derive(Resource, Debug)]
pub struct SaveFile {
    path: Option<PathBuf>,
    data: SaveData,
}

fn high_score_key(level: LevelId) -> String {
    format!("{level}HighScore")
}

fn is_locked_key(level: LevelId) -> String {
    format!("{level}IsLocked")
}

impl SaveFile {
    pub fn in_memory() -> Self {
        Self { path: None, data: SaveData::fresh() }
    }

    /// Load the slot described by `settings`. A missing file is an empty save.
    pub fn open(settings: &SaveSettings) -> Result<Self, SaveError> {
        let Some(path) = settings.path() else {
            return Ok(Self::in_memory());
        };
        let data = read_data(&path)?;
        Ok(Self { path: Some(path), data })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_persistent(&self) -> bool {
        self.path.is_some()
    }

    pub fn get_high_score_for_level(&self, level: LevelId) -> f64 {
        self.data
            .0
            .get(&high_score_key(level))
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_HIGH_SCORE)
    }

    /// Store `score` if it beats the current best. Returns whether it did.
    ///
    /// The in-memory value is updated before the write, so a failed flush
    /// still leaves the new best visible for the rest of the session.
    pub fn set_high_score_for_level(&mut self, level: LevelId, score: f64) -> Result<bool, SaveError> {
        if !score.is_finite() || score <= self.get_high_score_for_level(level) {
            return Ok(false);
        }
        self.set_value(high_score_key(level), Value::from(score))?;
        Ok(true)
    }

    /// Unset entries read as locked.
    pub fn level_is_locked(&self, level: LevelId) -> bool {
        self.data
            .0
            .get(&is_locked_key(level))
            .and_then(Value::as_bool)
            .unwrap_or(LEVELS_ARE_LOCKED_BY_DEFAULT)
    }

    pub fn set_level_is_locked(&mut self, level: LevelId, locked: bool) -> Result<(), SaveError> {
        self.set_value(is_locked_key(level), Value::Bool(locked))
    }

    /// Write the whole object back to disk.
    pub fn flush(&self) -> Result<(), SaveError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| SaveError::Io { path: parent.to_path_buf(), source })?;
        }
        let raw = serde_json::to_string_pretty(&self.data)
            .map_err(|source| SaveError::Json { path: path.clone(), source })?;
        fs::write(path, raw).map_err(|source| SaveError::Io { path: path.clone(), source })
    }

    /// Flush and detach from the file. Later sets only touch memory.
    pub fn close(&mut self) -> Result<(), SaveError> {
        let flushed = self.flush();
        self.path = None;
        flushed
    }

    fn set_value(&mut self, key: String, value: Value) -> Result<(), SaveError> {
        self.data.0.insert(key, value);
        self.flush()
    }
}

fn read_data(path: &Path) -> Result<SaveData, SaveError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SaveData::fresh()),
        Err(source) => return Err(SaveError::Io { path: path.to_path_buf(), source }),
    };
    if raw.trim().is_empty() {
        return Ok(SaveData::fresh());
    }
    let value: Value =
        serde_json::from_str(&raw).map_err(|source| SaveError::Json { path: path.to_path_buf(), source })?;
    match value {
        Value::Object(map) => Ok(SaveData(map)),
        _ => Err(SaveError::NotAnObject(path.to_path_buf())),
    }
}

pub fn plugin(app: &mut App) {
    let settings = app
        .world()
        .get_resource::<SaveSettings>()
        .cloned()
        .unwrap_or_else(SaveSettings::from_env);

    let save = match SaveFile::open(&settings) {
        Ok(save) => {
            match save.path() {
                Some(path) => info!("save file: {}", path.display()),
                None => info!("save file: in memory"),
            }
            save
        }
        Err(e) => {
            warn!("{e}. Progress will not be saved this session.");
            SaveFile::in_memory()
        }
    };

    app.insert_resource(settings)
        .insert_resource(save)
        .add_systems(Last, close_on_exit);
}

fn close_on_exit(mut exits: MessageReader<AppExit>, mut save: ResMut<SaveFile>) {
    if exits.read().next().is_none() {
        return;
    }
    if let Err(e) = save.close() {
        warn!("{e}");
    }
}

#[cfg(test)]
mod tests;
