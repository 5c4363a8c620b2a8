//! Roll: platforms with spikes on top slide in from the right. Roll under them.

use bevy::prelude::*;

use super::{every, register};
use crate::common::bounds::{OutOfBounds, PlayField};
use crate::common::state::{GameState, LevelId};
use crate::common::tunables::Tunables;
use crate::plugins::level::pieces::{Piece, Placement, anchored, spawn_piece};
use crate::plugins::level::{LevelConfig, LevelSystems};
use crate::plugins::player::controller::Abilities;

const LEVEL: LevelId = LevelId::Roll;
const STATE: GameState = GameState::Level(LEVEL);

pub const BACKGROUND_SPEED: f32 = -35.0;
pub const FOREGROUND_SPEED: f32 = -70.0;
pub const SPAWN_INTERVAL: f32 = 3.5;
/// Platform height as a fraction of the field height.
pub const PLATFORM_LEVEL: f32 = 0.75;

#[derive(Resource, Debug)]
struct TrioTimer(Timer);

pub fn config() -> LevelConfig {
    LevelConfig {
        abilities: Abilities { enable_rolling: true, ..default() },
        out_of_bounds: OutOfBounds { left: true, ..default() },
        backdrop_velocity: Vec2::new(BACKGROUND_SPEED, 0.0),
        backdrop_color: Color::srgb(0.30, 0.16, 0.12),
        ..LevelConfig::basic(LEVEL)
    }
}

pub fn plugin(app: &mut App) {
    register(app, config());
    app.add_systems(OnEnter(STATE), setup).add_systems(
        Update,
        spawn_trios.in_set(LevelSystems::Spawn).run_if(in_state(STATE)),
    );
}

/// Top-left corners of the platform, its spike strip and the ground under it,
/// all just past the right edge.
pub fn trio_layout(field: &PlayField) -> [(Piece, Vec2); 3] {
    let platform = Piece::HorizontalThickPlatform200;
    let top = field.height * PLATFORM_LEVEL;
    let platform_at = Vec2::new(field.width, top);
    let strip_at = anchored(
        Vec2::new(field.width + platform.size().x * 0.5, top),
        Piece::HorizontalSpikeStrip.size(),
        Vec2::new(0.5, 1.0),
    );
    let ground_at = Vec2::new(field.width, top + platform.size().y);
    [
        (platform, platform_at),
        (Piece::HorizontalSpikeStrip, strip_at),
        (Piece::GroundChunk, ground_at),
    ]
}

pub fn spawn_trio(commands: &mut Commands, field: &PlayField) {
    for (piece, top_left) in trio_layout(field) {
        spawn_piece(
            commands,
            field,
            LEVEL,
            piece,
            Placement::at(top_left).moving(Vec2::new(FOREGROUND_SPEED, 0.0)),
        );
    }
}

pub(super) fn setup(mut commands: Commands, tunables: Res<Tunables>) {
    spawn_trio(&mut commands, &tunables.field());
    commands.insert_resource(TrioTimer(every(SPAWN_INTERVAL)));
}

fn spawn_trios(mut commands: Commands, time: Res<Time>, tunables: Res<Tunables>, mut timer: ResMut<TrioTimer>) {
    timer.0.tick(time.delta());
    let field = tunables.field();
    for _ in 0..timer.0.times_finished_this_tick() {
        spawn_trio(&mut commands, &field);
    }
}
