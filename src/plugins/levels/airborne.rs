//! Airborne: fly through gaps in an endless row of grass walls.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::{every, register, rightmost_edge};
use crate::common::bounds::{HitBox, OutOfBounds, PlayField};
use crate::common::random::LevelRng;
use crate::common::state::{GameState, LevelId};
use crate::common::tunables::Tunables;
use crate::plugins::level::pieces::{Enemy, Piece, Placement, anchored, hit_box_collider, spawn_piece};
use crate::plugins::level::{LevelConfig, LevelSystems};
use crate::plugins::player::controller::Abilities;

const LEVEL: LevelId = LevelId::Airborne;
const STATE: GameState = GameState::Level(LEVEL);

pub const HINT: &str = "Special Ability: Repeatedly tap Space to fly!";
pub const BACKGROUND_SPEED: f32 = -80.0;
pub const FOREGROUND_SPEED: f32 = -120.0;
pub const WALL_SPACING: f32 = 180.0;
pub const WALL_GAP: f32 = 100.0;
pub const MIN_WALL_HEIGHT: f32 = 50.0;

#[derive(Resource, Debug)]
struct WallTimer(Timer);

pub fn config() -> LevelConfig {
    LevelConfig {
        abilities: Abilities { max_consecutive_jumps: -1, ..default() },
        hint: HINT,
        out_of_bounds: OutOfBounds { left: true, top: true, bottom: true, right: false },
        backdrop_velocity: Vec2::new(BACKGROUND_SPEED, 0.0),
        backdrop_color: Color::srgb(0.53, 0.75, 0.92),
        ..LevelConfig::basic(LEVEL)
    }
}

pub fn plugin(app: &mut App) {
    register(app, config());
    app.add_systems(OnEnter(STATE), setup).add_systems(
        Update,
        spawn_walls.in_set(LevelSystems::Spawn).run_if(in_state(STATE)),
    );
}

/// Top-left y of the upper and lower wall around a gap starting at `gap_top`.
pub fn wall_pair_tops(gap_top: f32) -> [f32; 2] {
    [gap_top - Piece::GrassWallLarge.size().y, gap_top + WALL_GAP]
}

/// Screen x of the next wall pair: one spacing past the field or the last hazard.
pub fn next_wall_x(field: &PlayField, rightmost_enemy: Option<f32>) -> f32 {
    rightmost_enemy.map_or(field.width, |right| right.max(field.width)) + WALL_SPACING
}

/// Spawn both halves of a wall with a random gap at `x`. Returns the new right edge.
pub fn spawn_wall_pair(
    commands: &mut Commands,
    field: &PlayField,
    status_bar_height: f32,
    rng: &mut LevelRng,
    x: f32,
) -> f32 {
    let lowest = status_bar_height + MIN_WALL_HEIGHT;
    let highest = field.height - WALL_GAP - MIN_WALL_HEIGHT;
    let gap_top = rng.int_inclusive(lowest as i32, highest as i32) as f32;

    let mut right = x;
    for top in wall_pair_tops(gap_top) {
        let top_left = Vec2::new(x, top);
        spawn_piece(
            commands,
            field,
            LEVEL,
            Piece::GrassWallLarge,
            Placement::at(top_left).moving(Vec2::new(FOREGROUND_SPEED, 0.0)),
        );
        right = right.max(Piece::GrassWallLarge.screen_rect_at(top_left).right);
    }
    debug!("airborne wall at x={x}, gap at y={gap_top}");
    right
}

/// Hit box and matching collider covering 85% of a border strip's height.
fn border_hit_box(size: Vec2, top_left: Vec2) -> (HitBox, Collider) {
    let hit_box = HitBox::scaled(size, Vec2::new(1.0, 0.85), top_left);
    (hit_box, hit_box_collider(&hit_box))
}

/// The spiked strips along the top (just under the status bar) and the bottom.
fn spawn_borders(commands: &mut Commands, field: &PlayField, status_bar_height: f32) {
    let size = Piece::GrassBorder.size();

    let top = spawn_piece(
        commands,
        field,
        LEVEL,
        Piece::GrassBorder,
        Placement::at(Vec2::new(0.0, status_bar_height - size.y * 0.5)),
    );
    commands
        .entity(top)
        .insert(border_hit_box(size, Vec2::ZERO));

    let bottom = spawn_piece(
        commands,
        field,
        LEVEL,
        Piece::GrassBorder,
        Placement::at(Vec2::new(0.0, field.height - size.y * 0.5)),
    );
    commands
        .entity(bottom)
        .insert(border_hit_box(size, Vec2::new(0.0, 0.15)));
}

pub(super) fn setup(mut commands: Commands, tunables: Res<Tunables>, mut rng: ResMut<LevelRng>) {
    let field = tunables.field();

    spawn_borders(&mut commands, &field, tunables.status_bar_height);

    let platform = Piece::GrassPlatformLarge;
    let start = anchored(
        Vec2::new(field.width, field.height * 0.8),
        platform.size(),
        Vec2::new(1.0, 0.0),
    );
    spawn_piece(
        &mut commands,
        &field,
        LEVEL,
        platform,
        Placement::at(start).moving(Vec2::new(FOREGROUND_SPEED, 0.0)),
    );

    // The borders end at the field edge, so the first pair starts one spacing out.
    let x = next_wall_x(&field, Some(field.width));
    spawn_wall_pair(&mut commands, &field, tunables.status_bar_height, &mut rng, x);

    commands.insert_resource(WallTimer(every(WALL_SPACING / FOREGROUND_SPEED.abs())));
}

fn spawn_walls(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut timer: ResMut<WallTimer>,
    mut rng: ResMut<LevelRng>,
    q_enemies: Query<(&Transform, &HitBox), With<Enemy>>,
) {
    timer.0.tick(time.delta());
    let due = timer.0.times_finished_this_tick();
    if due == 0 {
        return;
    }

    let field = tunables.field();
    let mut rightmost = rightmost_edge(&field, &q_enemies);
    for _ in 0..due {
        let x = next_wall_x(&field, rightmost);
        let right = spawn_wall_pair(&mut commands, &field, tunables.status_bar_height, &mut rng, x);
        rightmost = Some(right);
    }
}
