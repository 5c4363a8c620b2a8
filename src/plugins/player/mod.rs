//! Player plugin.
//!
//! Pipeline:
//! - OnEnter(Level): spawn the dwarf with the level's abilities
//! - Update: sample keys into `PlayerInput` (hover hold time accumulates here)
//! - FixedUpdate: grounded check -> `PlayerController::update` -> avian velocity/gravity,
//!   then one-way platform filtering for the next physics step
//! - Update: pose -> sprite flip and tint
//!
//! `FixedUpdate` does not run while `Time<Virtual>` is paused, so a paused
//! level freezes the player with everything else.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::bounds::{HitBox, PlayField, ScreenRect};
use crate::common::layers::{Layer, z};
use crate::common::state::{GameState, LevelId, in_any_level};
use crate::common::tunables::Tunables;
use crate::plugins::level::pieces::{Friend, OneWay};
use crate::plugins::level::{LevelCatalog, LevelSystems};

pub mod controller;

use controller::{Abilities, Body, ControlInput, PlayerController, Pose};

pub const PLAYER_SIZE: Vec2 = Vec2::new(18.0, 26.0);

const DWARF_COLOR: Color = Color::srgb(0.85, 0.55, 0.25);
const ROLLING_COLOR: Color = Color::srgb(0.65, 0.40, 0.18);

/// How far above a platform the feet may float and still count as standing on it.
const GROUND_TOLERANCE: f32 = 2.0;

pub const LEFT_KEY: KeyCode = KeyCode::KeyA;
pub const RIGHT_KEY: KeyCode = KeyCode::KeyD;
pub const ROLL_KEY: KeyCode = KeyCode::ShiftLeft;
pub const ROLL_KEY_ALT: KeyCode = KeyCode::ShiftRight;
pub const JUMP_KEY: KeyCode = KeyCode::Space;
pub const FALL_FAST_KEY: KeyCode = KeyCode::KeyS;
pub const HOVER_KEY: KeyCode = KeyCode::KeyW;

#[derive(Component, Debug, Default)]
pub struct Player;

/// Latest key snapshot, consumed by the fixed-step controller.
#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub control: ControlInput,
    /// Set on a jump press, cleared by the next fixed step. A tap shorter
    /// than one fixed step still reaches the controller.
    pub jump_latched: bool,
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PlayerInput>()
        .add_systems(Update, gather_input.in_set(LevelSystems::Input))
        .add_systems(Update, show_pose.in_set(LevelSystems::Present))
        .add_systems(
            FixedUpdate,
            (apply_controller, filter_one_way_platforms)
                .chain()
                .run_if(in_any_level),
        );

    for id in LevelId::ALL {
        app.add_systems(OnEnter(GameState::Level(id)), spawn);
    }
}

/// Physics layers for the player. Ledges are dropped while moving up so thin
/// platforms can be jumped through.
pub fn player_layers(passing_ledges: bool) -> CollisionLayers {
    if passing_ledges {
        CollisionLayers::new(Layer::Player, [Layer::World, Layer::Friend])
    } else {
        CollisionLayers::new(Layer::Player, [Layer::World, Layer::Friend, Layer::Ledge])
    }
}

pub fn spawn_player(commands: &mut Commands, field: &PlayField, level: LevelId, abilities: Abilities, start: Vec2) -> Entity {
    commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerController::new(abilities),
            Sprite::from_color(DWARF_COLOR, PLAYER_SIZE),
            Transform::from_translation(field.to_world(start).extend(z::PLAYER)),
            HitBox::full(PLAYER_SIZE),
            RigidBody::Dynamic,
            Collider::rectangle(PLAYER_SIZE.x, PLAYER_SIZE.y),
            player_layers(false),
            LockedAxes::ROTATION_LOCKED,
            Friction::ZERO,
            Restitution::ZERO,
            GravityScale(1.0),
            LinearVelocity::ZERO,
            DespawnOnExit(GameState::Level(level)),
        ))
        .id()
}

fn spawn(
    mut commands: Commands,
    state: Res<State<GameState>>,
    catalog: Res<LevelCatalog>,
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
) {
    let Some(id) = state.get().level() else {
        return;
    };
    let config = catalog.config_or_basic(id);
    *input = PlayerInput::default();
    spawn_player(&mut commands, &tunables.field(), id, config.abilities, config.player_start);
}

fn gather_input(time: Res<Time>, keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    let hover_held_for = if keys.pressed(HOVER_KEY) {
        // A fresh press starts from zero even if the previous hold was long.
        let before = if keys.just_pressed(HOVER_KEY) { None } else { input.control.hover_held_for };
        Some(before.unwrap_or(0.0) + time.delta_secs())
    } else {
        None
    };

    if keys.just_pressed(JUMP_KEY) {
        input.jump_latched = true;
    }

    input.control = ControlInput {
        left: keys.pressed(LEFT_KEY),
        right: keys.pressed(RIGHT_KEY),
        roll: keys.any_pressed([ROLL_KEY, ROLL_KEY_ALT]),
        jump: keys.pressed(JUMP_KEY) || input.jump_latched,
        fall_fast: keys.pressed(FALL_FAST_KEY),
        hover_held_for,
    };
}

/// Feet resting on a friend's top edge, or on the bottom of the field.
pub fn is_grounded<'a>(
    player: &ScreenRect,
    field: &PlayField,
    friends: impl IntoIterator<Item = &'a ScreenRect>,
) -> bool {
    if player.bottom >= field.height - GROUND_TOLERANCE {
        return true;
    }
    friends.into_iter().any(|friend| {
        player.overlaps_horizontally(friend)
            && player.bottom >= friend.top - GROUND_TOLERANCE
            && player.bottom <= friend.top + GROUND_TOLERANCE
    })
}

fn apply_controller(
    tunables: Res<Tunables>,
    mut input: ResMut<PlayerInput>,
    mut q_player: Query<
        (&mut PlayerController, &mut LinearVelocity, &mut GravityScale, &Transform, &HitBox),
        With<Player>,
    >,
    q_friends: Query<(&Transform, &HitBox), (With<Friend>, Without<Player>)>,
) {
    let Ok((mut controller, mut velocity, mut gravity, tf, hit_box)) = q_player.single_mut() else {
        return;
    };
    let field = tunables.field();
    let player_rect = hit_box.screen_rect(tf.translation.truncate(), &field);
    let friend_rects: Vec<ScreenRect> = q_friends
        .iter()
        .map(|(tf, hit_box)| hit_box.screen_rect(tf.translation.truncate(), &field))
        .collect();
    // Passing up through a ledge is not landing on it.
    let grounded = velocity.y <= 0.0 && is_grounded(&player_rect, &field, &friend_rects);

    let mut body = Body { velocity: velocity.0, gravity_scale: gravity.0 };
    controller.update(&input.control, grounded, &mut body);
    velocity.0 = body.velocity;
    gravity.0 = body.gravity_scale;
    input.jump_latched = false;
}

fn filter_one_way_platforms(
    mut q_player: Query<(&LinearVelocity, &mut CollisionLayers), With<Player>>,
    q_ledges: Query<(), With<OneWay>>,
) {
    let Ok((velocity, mut layers)) = q_player.single_mut() else {
        return;
    };
    if q_ledges.is_empty() {
        return;
    }
    let wanted = player_layers(velocity.y > 0.0);
    if *layers != wanted {
        *layers = wanted;
    }
}

fn show_pose(mut q_player: Query<(&PlayerController, &mut Sprite), With<Player>>) {
    let Ok((controller, mut sprite)) = q_player.single_mut() else {
        return;
    };
    let (flip, color) = match controller.pose() {
        Pose::Idle => (sprite.flip_x, DWARF_COLOR),
        Pose::WalkLeft => (true, DWARF_COLOR),
        Pose::WalkRight => (false, DWARF_COLOR),
        Pose::RollLeft => (true, ROLLING_COLOR),
        Pose::RollRight => (false, ROLLING_COLOR),
    };
    sprite.flip_x = flip;
    sprite.color = color;
}

#[cfg(test)]
mod tests;
