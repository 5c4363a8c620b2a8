//! Global state machine.

use std::fmt;

use bevy::prelude::*;

/// Identifier of a playable level.
///
/// The display name doubles as the save-file key prefix
/// (`MineshaftHighScore`, `MineshaftIsLocked`, ...).
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum LevelId {
    Mineshaft,
    Artillery,
    Incendiary,
    Roll,
    Airborne,
}

impl LevelId {
    /// Order used by the select-level menu.
    pub const ALL: [LevelId; 5] = [
        LevelId::Mineshaft,
        LevelId::Artillery,
        LevelId::Incendiary,
        LevelId::Roll,
        LevelId::Airborne,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LevelId::Mineshaft => "Mineshaft",
            LevelId::Artillery => "Artillery",
            LevelId::Incendiary => "Incendiary",
            LevelId::Roll => "Roll",
            LevelId::Airborne => "Airborne",
        }
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Boot,
    MainMenu,
    SelectLevelMenu,
    ControlsMenu,
    Level(LevelId),
    /// One-frame stop between two runs of the same level so that
    /// `OnExit`/`OnEnter` fire and the level starts fresh.
    Reloading(LevelId),
}

impl GameState {
    pub fn level(self) -> Option<LevelId> {
        match self {
            GameState::Level(id) => Some(id),
            _ => None,
        }
    }
}

/// Run condition: any level is active.
pub fn in_any_level(state: Option<Res<State<GameState>>>) -> bool {
    state.is_some_and(|s| s.get().level().is_some())
}
