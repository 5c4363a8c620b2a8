//! Mineshaft: climb falling platforms above a lava pool, dodging minecarts and bats.
//!
//! ```text
//! every 180/70 s: a row of platforms at the top edge, falling at 70 px/s
//!                 (two side ledges during the grace period, then a random pattern);
//!                 each platform may carry a parked minecart
//! every frame:    a parked cart starts rolling toward the player once the player
//!                 is higher than the cart's bottom edge
//! every 0.5 s:    maybe a bat crosses the shaft from a random side
//! ```
//!
//! Nothing hostile spawns during the first 2.5 s of a run.

use std::f64::consts::PI;

use avian2d::prelude::*;
use bevy::prelude::*;

use super::{every, register};
use crate::common::bounds::{HitBox, OutOfBounds, PlayField};
use crate::common::random::LevelRng;
use crate::common::state::{GameState, LevelId};
use crate::common::tunables::Tunables;
use crate::plugins::level::pieces::{Piece, Placement, anchored, spawn_piece};
use crate::plugins::level::{LevelConfig, LevelSession, LevelSystems};
use crate::plugins::player::Player;

const LEVEL: LevelId = LevelId::Mineshaft;
const STATE: GameState = GameState::Level(LEVEL);

pub const BACKGROUND_SPEED: f32 = 35.0;
pub const FOREGROUND_SPEED: f32 = 70.0;
/// Milliseconds before minecarts and bats may appear.
pub const HOSTILE_SPAWN_DELAY_MS: f64 = 2500.0;
/// Vertical distance between platform rows.
pub const PLATFORM_SPACING: f32 = 180.0;
pub const MINECART_SPEED: f32 = 150.0;
pub const MINECART_BOUNCE: f32 = 0.5;
pub const BAT_SPEED: f32 = 200.0;
pub const BAT_SPAWN_INTERVAL: f32 = 0.5;
pub const BAT_LOWEST: f32 = 0.1;
pub const BAT_HIGHEST: f32 = 0.9;

/// Platform kind and its centre x as a fraction of the field width.
pub type PlatformRow = &'static [(Piece, f32)];

pub const GRACE_ROW: PlatformRow = &[(Piece::ThinPlatform200, 0.2), (Piece::ThinPlatform200, 0.8)];

pub const PLATFORM_ROWS: [PlatformRow; 15] = [
    &[(Piece::ThickPlatform200, 0.2), (Piece::ThickPlatform200, 0.6)],
    &[(Piece::ThickPlatform200, 0.2), (Piece::ThickPlatform200, 0.7)],
    &[(Piece::ThickPlatform200, 0.2), (Piece::ThickPlatform200, 0.8)],
    &[(Piece::ThickPlatform200, 0.3), (Piece::ThickPlatform200, 0.6)],
    &[(Piece::ThickPlatform200, 0.3), (Piece::ThickPlatform200, 0.7)],
    &[(Piece::ThickPlatform200, 0.3), (Piece::ThickPlatform200, 0.8)],
    &[(Piece::ThickPlatform200, 0.4), (Piece::ThickPlatform200, 0.7)],
    &[(Piece::ThickPlatform200, 0.4), (Piece::ThickPlatform200, 0.8)],
    &[(Piece::ThinPlatform200, 0.125), (Piece::ThickPlatform200, 0.4), (Piece::ThinPlatform200, 0.875)],
    &[(Piece::ThinPlatform200, 0.125), (Piece::ThickPlatform200, 0.5), (Piece::ThinPlatform200, 0.875)],
    &[(Piece::ThinPlatform200, 0.125), (Piece::ThickPlatform200, 0.6), (Piece::ThinPlatform200, 0.875)],
    &[(Piece::ThinPlatform200, 0.125), (Piece::ThickPlatform400, 0.5), (Piece::ThinPlatform200, 0.875)],
    &[(Piece::ThinPlatform400, 0.4)],
    &[(Piece::ThinPlatform400, 0.5)],
    &[(Piece::ThinPlatform400, 0.6)],
];

pub fn minecart_probability(ms: f64) -> f64 {
    if ms < HOSTILE_SPAWN_DELAY_MS {
        return 0.0;
    }
    (ms / 40000.0).atan() * 1.5 / PI + 0.15
}

pub fn bat_probability(ms: f64) -> f64 {
    if ms < HOSTILE_SPAWN_DELAY_MS {
        return 0.0;
    }
    (ms / 50000.0).atan() * 6.0 / (4.0 * PI) + ((ms / 2000.0).sin() / 4.0).abs()
}

/// A cart parked on a platform until the player climbs past it.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Minecart {
    pub moving: bool,
}

#[derive(Resource, Debug)]
struct MineshaftTimers {
    platforms: Timer,
    bats: Timer,
}

pub fn config() -> LevelConfig {
    LevelConfig {
        out_of_bounds: OutOfBounds { left: true, right: true, bottom: true, top: false },
        backdrop_velocity: Vec2::new(0.0, BACKGROUND_SPEED),
        backdrop_color: Color::srgb(0.26, 0.20, 0.17),
        player_start: Vec2::new(400.0, PLATFORM_SPACING * 1.5),
        ..LevelConfig::basic(LEVEL)
    }
}

pub fn plugin(app: &mut App) {
    register(app, config());
    app.add_systems(OnEnter(STATE), setup).add_systems(
        Update,
        (spawn_rows, spawn_bats, start_minecarts)
            .in_set(LevelSystems::Spawn)
            .run_if(in_state(STATE)),
    );
}

fn falling() -> Vec2 {
    Vec2::new(0.0, FOREGROUND_SPEED)
}

/// Spawn a falling platform centred on `center_x` with its top edge at `top`.
fn spawn_platform(commands: &mut Commands, field: &PlayField, piece: Piece, center_x: f32, top: f32) {
    let top_left = anchored(Vec2::new(center_x, top), piece.size(), Vec2::new(0.5, 0.0));
    spawn_piece(commands, field, LEVEL, piece, Placement::at(top_left).moving(falling()));
}

/// Which row to spawn `ms` milliseconds into the run.
pub fn pick_row(rng: &mut LevelRng, ms: f64) -> PlatformRow {
    if ms < HOSTILE_SPAWN_DELAY_MS {
        GRACE_ROW
    } else {
        PLATFORM_ROWS[rng.index(PLATFORM_ROWS.len())]
    }
}

/// Spawn a row of platforms at the top edge, each with a chance of a parked minecart.
pub fn spawn_row(commands: &mut Commands, field: &PlayField, rng: &mut LevelRng, ms: f64) {
    let cart_chance = minecart_probability(ms);

    for &(piece, x_fraction) in pick_row(rng, ms) {
        let center_x = x_fraction * field.width;
        spawn_platform(commands, field, piece, center_x, 0.0);

        if rng.chance(cart_chance) {
            let cart = Piece::Minecart;
            let top_left = anchored(Vec2::new(center_x, 0.0), cart.size(), Vec2::new(0.5, 1.0));
            let entity = spawn_piece(commands, field, LEVEL, cart, Placement::at(top_left));
            commands.entity(entity).insert(Minecart::default());
        }
    }
}

/// Start x (centre) and screen velocity of a bat flying in direction `dir` (+1 right).
pub fn bat_flight(field: &PlayField, dir: f32, height_fraction: f32) -> (Vec2, Vec2) {
    let center = Vec2::new(field.width * 0.5 * (1.0 - dir), field.height * height_fraction);
    (center, Vec2::new(BAT_SPEED * dir, 0.0))
}

pub(super) fn setup(mut commands: Commands, tunables: Res<Tunables>, mut rng: ResMut<LevelRng>) {
    let field = tunables.field();

    spawn_platform(&mut commands, &field, Piece::ThickPlatform800, field.width * 0.5, PLATFORM_SPACING * 2.0);
    for x_fraction in [0.2, 0.8] {
        spawn_platform(&mut commands, &field, Piece::ThinPlatform200, field.width * x_fraction, PLATFORM_SPACING);
    }

    let lava = Piece::LavaPool;
    let lava_at = anchored(Vec2::new(0.0, field.height), lava.size(), Vec2::new(0.0, 1.0));
    spawn_piece(&mut commands, &field, LEVEL, lava, Placement::at(lava_at));

    // The clock has not started yet.
    spawn_row(&mut commands, &field, &mut rng, 0.0);

    commands.insert_resource(MineshaftTimers {
        platforms: every(PLATFORM_SPACING / FOREGROUND_SPEED),
        bats: every(BAT_SPAWN_INTERVAL),
    });
}

fn spawn_rows(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    session: Res<LevelSession>,
    mut timers: ResMut<MineshaftTimers>,
    mut rng: ResMut<LevelRng>,
) {
    timers.platforms.tick(time.delta());
    let field = tunables.field();
    for _ in 0..timers.platforms.times_finished_this_tick() {
        spawn_row(&mut commands, &field, &mut rng, session.elapsed_ms());
    }
}

fn spawn_bats(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    session: Res<LevelSession>,
    mut timers: ResMut<MineshaftTimers>,
    mut rng: ResMut<LevelRng>,
) {
    timers.bats.tick(time.delta());
    let field = tunables.field();
    let chance = bat_probability(session.elapsed_ms());

    for _ in 0..timers.bats.times_finished_this_tick() {
        if !rng.chance(chance) {
            continue;
        }
        let dir = rng.sign();
        let height = rng.range_f32(BAT_LOWEST, BAT_HIGHEST);
        let (center, velocity) = bat_flight(&field, dir, height);
        let bat = Piece::Bat;
        let top_left = anchored(center, bat.size(), Vec2::splat(0.5));

        let entity = spawn_piece(&mut commands, &field, LEVEL, bat, Placement::at(top_left).moving(velocity));
        let mut sprite = Sprite::from_color(bat.color(), bat.size());
        sprite.flip_x = dir > 0.0;
        commands.entity(entity).insert(sprite);
    }
}

/// Whether a parked cart should start: the player's top is above the cart's bottom.
pub fn should_start(player_top: f32, cart_bottom: f32) -> bool {
    player_top < cart_bottom
}

pub(super) fn start_minecarts(
    mut commands: Commands,
    tunables: Res<Tunables>,
    q_player: Query<(&Transform, &HitBox), With<Player>>,
    mut q_carts: Query<(Entity, &Transform, &HitBox, &mut Minecart, &mut LinearVelocity), Without<Player>>,
) {
    let Ok((player_tf, player_box)) = q_player.single() else {
        return;
    };
    let field = tunables.field();
    let player = player_box.screen_rect(player_tf.translation.truncate(), &field);

    for (entity, tf, hit_box, mut cart, mut velocity) in &mut q_carts {
        if cart.moving {
            continue;
        }
        let rect = hit_box.screen_rect(tf.translation.truncate(), &field);
        if !should_start(player.top, rect.bottom) {
            continue;
        }
        let dir = if player.center_x() < rect.center_x() { -1.0 } else { 1.0 };
        cart.moving = true;
        velocity.x = dir * MINECART_SPEED;
        commands.entity(entity).insert(Restitution::new(MINECART_BOUNCE));
        debug!("minecart rolling {}", if dir < 0.0 { "left" } else { "right" });
    }
}
