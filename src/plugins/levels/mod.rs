//! The five playable levels.
//!
//! Each level module registers its [`LevelConfig`](crate::plugins::level::LevelConfig)
//! and adds two kinds of systems, both scoped to its own `GameState::Level`:
//!
//! ```text
//! OnEnter(Level(id)) -> initial layout, first spawn round, timers inserted
//! Update / Spawn set -> timers tick on virtual time, spawn rounds, level-only rules
//! ```
//!
//! Timers are resources that live until the next entry overwrites them. They
//! only tick inside [`LevelSystems::Spawn`](crate::plugins::level::LevelSystems),
//! which is skipped while the level is paused or over.

use bevy::prelude::*;

use crate::common::bounds::{HitBox, PlayField};
use crate::plugins::level::{LevelCatalog, LevelConfig};

pub mod airborne;
pub mod artillery;
pub mod incendiary;
pub mod mineshaft;
pub mod roll;

pub fn plugin(app: &mut App) {
    airborne::plugin(app);
    artillery::plugin(app);
    incendiary::plugin(app);
    mineshaft::plugin(app);
    roll::plugin(app);
}

/// Add `config` to the catalog, creating the catalog if the runner has not yet.
fn register(app: &mut App, config: LevelConfig) {
    app.init_resource::<LevelCatalog>();
    app.world_mut().resource_mut::<LevelCatalog>().register(config);
}

/// Repeating timer in seconds.
fn every(secs: f32) -> Timer {
    Timer::from_seconds(secs, TimerMode::Repeating)
}

/// Right edge (screen x) of the rightmost hit box, if any.
fn rightmost_edge<'a>(
    field: &PlayField,
    boxes: impl IntoIterator<Item = (&'a Transform, &'a HitBox)>,
) -> Option<f32> {
    boxes
        .into_iter()
        .map(|(tf, hit_box)| hit_box.screen_rect(tf.translation.truncate(), field).right)
        .reduce(f32::max)
}

/// Screen-space top-left corner of a sprite of `size` centred on `translation`.
fn top_left_of(field: &PlayField, translation: Vec3, size: Vec2) -> Vec2 {
    field.to_screen(translation.truncate()) - size * 0.5
}
