//! Incendiary: spiked platforms rain down the shaft. Hover to wait them out.

use bevy::prelude::*;

use super::{every, register};
use crate::common::bounds::{OutOfBounds, PlayField};
use crate::common::state::{GameState, LevelId};
use crate::common::tunables::Tunables;
use crate::plugins::level::pieces::{Piece, Placement, anchored, spawn_piece};
use crate::plugins::level::{LevelConfig, LevelSystems};
use crate::plugins::player::controller::Abilities;

const LEVEL: LevelId = LevelId::Incendiary;
const STATE: GameState = GameState::Level(LEVEL);

pub const BACKGROUND_SPEED: f32 = 35.0;
pub const FOREGROUND_SPEED: f32 = 70.0;
pub const SPAWN_INTERVAL: f32 = 3.5;

#[derive(Resource, Debug)]
struct DropTimer(Timer);

pub fn config() -> LevelConfig {
    LevelConfig {
        abilities: Abilities { max_consecutive_hovers: 2, ..default() },
        out_of_bounds: OutOfBounds { bottom: true, ..default() },
        backdrop_velocity: Vec2::new(0.0, BACKGROUND_SPEED),
        backdrop_color: Color::srgb(0.30, 0.16, 0.12),
        ..LevelConfig::basic(LEVEL)
    }
}

pub fn plugin(app: &mut App) {
    register(app, config());
    app.add_systems(OnEnter(STATE), setup).add_systems(
        Update,
        drop_platforms.in_set(LevelSystems::Spawn).run_if(in_state(STATE)),
    );
}

/// A thick platform hanging from the top edge with a spike strip standing on it.
pub fn spawn_spiked_platform(commands: &mut Commands, field: &PlayField) {
    let top_centre = Vec2::new(field.width * 0.5, 0.0);
    let falling = Vec2::new(0.0, FOREGROUND_SPEED);

    for (piece, anchor) in [
        (Piece::ThickPlatform200, Vec2::new(0.5, 0.0)),
        (Piece::SpikeStrip, Vec2::new(0.5, 1.0)),
    ] {
        let top_left = anchored(top_centre, piece.size(), anchor);
        spawn_piece(commands, field, LEVEL, piece, Placement::at(top_left).moving(falling));
    }
}

pub(super) fn setup(mut commands: Commands, tunables: Res<Tunables>) {
    spawn_spiked_platform(&mut commands, &tunables.field());
    commands.insert_resource(DropTimer(every(SPAWN_INTERVAL)));
}

fn drop_platforms(mut commands: Commands, time: Res<Time>, tunables: Res<Tunables>, mut timer: ResMut<DropTimer>) {
    timer.0.tick(time.delta());
    let field = tunables.field();
    for _ in 0..timer.0.times_finished_this_tick() {
        spawn_spiked_platform(&mut commands, &field);
    }
}
