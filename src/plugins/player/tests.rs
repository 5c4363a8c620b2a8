use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use super::controller::*;
use super::*;
use crate::common::bounds::{HitBox, PlayField, ScreenRect};
use crate::common::state::{GameState, LevelId};
use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::level::pieces::{Friend, Piece, hit_box_collider};
use crate::plugins::level::{LevelCatalog, LevelConfig};

const FIELD: PlayField = PlayField { width: 800.0, height: 600.0 };

fn controller(abilities: Abilities) -> (PlayerController, Body) {
    (PlayerController::new(abilities), Body::default())
}

fn jump() -> ControlInput {
    ControlInput { jump: true, ..default() }
}

fn idle() -> ControlInput {
    ControlInput::default()
}

#[test]
fn spawned_in_the_air_the_first_jump_is_spent() {
    let (mut c, mut body) = controller(Abilities::default());
    assert_eq!(c.consecutive_jumps(), 1);

    c.update(&jump(), false, &mut body);
    assert_eq!(body.velocity.y, 0.0);
}

#[test]
fn holding_jump_gives_a_single_jump() {
    let (mut c, mut body) = controller(Abilities::default());
    c.update(&idle(), true, &mut body);
    assert_eq!(c.consecutive_jumps(), 0);

    c.update(&jump(), true, &mut body);
    assert_eq!(body.velocity.y, JUMPING_SPEED);
    assert_eq!(c.consecutive_jumps(), 1);

    body.velocity.y = 10.0;
    for _ in 0..5 {
        c.update(&jump(), false, &mut body);
    }
    assert_eq!(body.velocity.y, 10.0);
    assert_eq!(c.consecutive_jumps(), 1);
}

#[test]
fn double_jump_allows_exactly_two() {
    let (mut c, mut body) = controller(Abilities { max_consecutive_jumps: 2, ..default() });
    c.update(&idle(), true, &mut body);

    let mut jumps = 0;
    for _ in 0..4 {
        body.velocity.y = 0.0;
        c.update(&jump(), false, &mut body);
        if body.velocity.y == JUMPING_SPEED {
            jumps += 1;
        }
        c.update(&idle(), false, &mut body);
    }
    assert_eq!(jumps, 2);
    assert!(c.consecutive_jumps() >= 1);
}

#[test]
fn unlimited_jumps_never_run_out() {
    let (mut c, mut body) = controller(Abilities { max_consecutive_jumps: -1, ..default() });
    for _ in 0..20 {
        body.velocity.y = 0.0;
        c.update(&jump(), false, &mut body);
        assert_eq!(body.velocity.y, JUMPING_SPEED);
        c.update(&idle(), false, &mut body);
    }
}

#[test]
fn walking_off_a_ledge_counts_as_a_jump() {
    let (mut c, mut body) = controller(Abilities { max_consecutive_jumps: 2, ..default() });
    c.update(&idle(), true, &mut body);
    assert_eq!(c.consecutive_jumps(), 0);

    c.update(&idle(), false, &mut body);
    assert_eq!(c.consecutive_jumps(), 1);

    c.update(&jump(), false, &mut body);
    assert_eq!(c.consecutive_jumps(), 2);
}

#[test]
fn short_hover_hold_does_nothing() {
    let (mut c, mut body) = controller(Abilities { max_consecutive_hovers: 2, ..default() });
    body.velocity.y = -50.0;
    let held = ControlInput { hover_held_for: Some(0.5), ..default() };
    c.update(&held, false, &mut body);

    assert!(!c.is_hovering());
    assert_eq!(c.consecutive_hovers(), 0);
    assert_eq!(body.velocity.y, -50.0);
    assert_eq!(body.gravity_scale, 1.0);
}

#[test]
fn long_hover_hold_freezes_then_release_drops() {
    let (mut c, mut body) = controller(Abilities { max_consecutive_hovers: 2, ..default() });
    body.velocity.y = -50.0;
    let held = ControlInput { hover_held_for: Some(DEFAULT_MAX_HOVER_DURATION), ..default() };
    c.update(&held, false, &mut body);

    assert!(c.is_hovering());
    assert_eq!(c.consecutive_hovers(), 1);
    assert_eq!(body.velocity.y, 0.0);
    assert_eq!(body.gravity_scale, 0.0);

    c.update(&idle(), false, &mut body);
    assert!(!c.is_hovering());
    assert_eq!(body.gravity_scale, 1.0);
}

#[test]
fn hovering_needs_budget() {
    let (mut c, mut body) = controller(Abilities::default());
    let held = ControlInput { hover_held_for: Some(5.0), ..default() };
    c.update(&held, false, &mut body);
    assert!(!c.is_hovering());
}

#[test]
fn rolling_only_when_enabled() {
    let input = ControlInput { right: true, roll: true, ..default() };

    let (mut c, mut body) = controller(Abilities::default());
    c.update(&input, true, &mut body);
    assert_eq!(body.velocity.x, WALKING_SPEED);
    assert_eq!(c.pose(), Pose::WalkRight);

    let (mut c, mut body) = controller(Abilities { enable_rolling: true, ..default() });
    c.update(&input, true, &mut body);
    assert_eq!(body.velocity.x, ROLLING_SPEED);
    assert!(c.is_rolling());
    assert_eq!(c.pose(), Pose::RollRight);

    c.update(&idle(), true, &mut body);
    assert_eq!(body.velocity.x, 0.0);
    assert_eq!(c.horizontal(), HorizontalState::Idle);
    assert_eq!(c.pose(), Pose::Idle);
}

#[test]
fn left_wins_over_right() {
    let (mut c, mut body) = controller(Abilities::default());
    c.update(&ControlInput { left: true, right: true, ..default() }, true, &mut body);
    assert_eq!(body.velocity.x, -WALKING_SPEED);
    assert_eq!(c.pose(), Pose::WalkLeft);
}

#[test]
fn falling_fast_raises_gravity_until_released() {
    let (mut c, mut body) = controller(Abilities::default());
    c.update(&ControlInput { fall_fast: true, ..default() }, false, &mut body);
    assert!(c.is_falling_fast());
    assert_eq!(body.gravity_scale, FALLING_FAST_GRAVITY_SCALE);

    c.update(&idle(), false, &mut body);
    assert_eq!(c.vertical(), VerticalState::Idle);
    assert_eq!(body.gravity_scale, 1.0);

    let (mut c, mut body) = controller(Abilities { enable_falling_fast: false, ..default() });
    c.update(&ControlInput { fall_fast: true, ..default() }, false, &mut body);
    assert!(!c.is_falling_fast());
    assert_eq!(body.gravity_scale, 1.0);
}

#[test]
fn grounded_on_floor_or_platform_top() {
    let platform = ScreenRect::from_top_left(Vec2::new(100.0, 400.0), Vec2::new(200.0, 40.0));

    let standing = ScreenRect::from_top_left(Vec2::new(150.0, 374.0), PLAYER_SIZE);
    assert!(is_grounded(&standing, &FIELD, [&platform]));

    let above = ScreenRect::from_top_left(Vec2::new(150.0, 360.0), PLAYER_SIZE);
    assert!(!is_grounded(&above, &FIELD, [&platform]));

    let beside = ScreenRect::from_top_left(Vec2::new(320.0, 374.0), PLAYER_SIZE);
    assert!(!is_grounded(&beside, &FIELD, [&platform]));

    let floor = ScreenRect::from_top_left(Vec2::new(500.0, 600.0 - PLAYER_SIZE.y), PLAYER_SIZE);
    assert!(is_grounded(&floor, &FIELD, std::iter::empty::<&ScreenRect>()));
}

#[test]
fn spawn_uses_the_level_config() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(State::new(GameState::Level(LevelId::Airborne)));
    world.init_resource::<PlayerInput>();
    let mut catalog = LevelCatalog::default();
    catalog.register(LevelConfig {
        abilities: Abilities { max_consecutive_jumps: -1, ..default() },
        player_start: Vec2::new(200.0, 100.0),
        ..LevelConfig::basic(LevelId::Airborne)
    });
    world.insert_resource(catalog);

    run_system_once(&mut world, super::spawn);

    let mut q = world.query_filtered::<(&Transform, &PlayerController, &RigidBody), With<Player>>();
    let (tf, controller, body) = q.single(&world).unwrap();
    assert_eq!(tf.translation.truncate(), Vec2::new(-200.0, 200.0));
    assert_eq!(controller.abilities.max_consecutive_jumps, -1);
    assert_eq!(*body, RigidBody::Dynamic);
}

#[test]
fn hover_hold_time_accumulates_and_resets() {
    let mut world = World::new();
    let mut time = Time::<()>::default();
    time.advance_by(Duration::from_millis(250));
    world.insert_resource(time);
    world.init_resource::<PlayerInput>();
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(HOVER_KEY);
    world.insert_resource(keys);

    run_system_once(&mut world, super::gather_input);
    world.resource_mut::<ButtonInput<KeyCode>>().clear();
    run_system_once(&mut world, super::gather_input);
    let held = world.resource::<PlayerInput>().control.hover_held_for.unwrap();
    assert!((held - 0.5).abs() < 1e-4);

    world.resource_mut::<ButtonInput<KeyCode>>().release(HOVER_KEY);
    run_system_once(&mut world, super::gather_input);
    assert_eq!(world.resource::<PlayerInput>().control.hover_held_for, None);
}

#[test]
fn ledges_pass_through_while_rising() {
    let mut world = World::new();
    let player = world.spawn((Player, LinearVelocity(Vec2::new(0.0, 120.0)), player_layers(false))).id();
    world.spawn(crate::plugins::level::pieces::OneWay);

    run_system_once(&mut world, super::filter_one_way_platforms);
    assert_eq!(*world.get::<CollisionLayers>(player).unwrap(), player_layers(true));

    world.get_mut::<LinearVelocity>(player).unwrap().0.y = -30.0;
    run_system_once(&mut world, super::filter_one_way_platforms);
    assert_eq!(*world.get::<CollisionLayers>(player).unwrap(), player_layers(false));
}

/// Screen rect of the physics collider `spawn_piece` gives `piece` at `top_left`.
fn collider_rect(piece: Piece, top_left: Vec2) -> ScreenRect {
    let center = FIELD.center_of(top_left, piece.size());
    let aabb = hit_box_collider(&piece.hit_box()).aabb(center, Rotation::IDENTITY);
    let corner = FIELD.to_screen(Vec2::new(aabb.min.x, aabb.max.y));
    let far = FIELD.to_screen(Vec2::new(aabb.max.x, aabb.min.y));
    ScreenRect::from_top_left(corner, far - corner)
}

fn assert_rect_near(a: &ScreenRect, b: &ScreenRect) {
    for (x, y) in [(a.left, b.left), (a.right, b.right), (a.top, b.top), (a.bottom, b.bottom)] {
        assert!((x - y).abs() < 1e-3, "{a:?} vs {b:?}");
    }
}

#[test]
fn inset_pieces_collide_where_their_hit_box_is() {
    let top_left = Vec2::new(300.0, 250.0);
    for piece in [Piece::Cannon100x70, Piece::Minecart, Piece::ThickPlatform200] {
        assert_rect_near(&collider_rect(piece, top_left), &piece.screen_rect_at(top_left));
    }
}

#[test]
fn resting_on_a_cannon_counts_as_grounded() {
    let top_left = Vec2::new(300.0, 250.0);
    let cannon = Piece::Cannon100x70.screen_rect_at(top_left);
    let surface = collider_rect(Piece::Cannon100x70, top_left);

    let feet_on_top = ScreenRect::from_top_left(
        Vec2::new(surface.center_x() - PLAYER_SIZE.x * 0.5, surface.top - PLAYER_SIZE.y),
        PLAYER_SIZE,
    );
    assert!(is_grounded(&feet_on_top, &FIELD, [&cannon]));
}

fn controller_world(vertical_speed: f32) -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.init_resource::<PlayerInput>();

    let platform = Piece::ThickPlatform200;
    let platform_top_left = Vec2::new(300.0, 400.0);
    world.spawn((
        Friend,
        Transform::from_translation(FIELD.center_of(platform_top_left, platform.size()).extend(1.0)),
        platform.hit_box(),
    ));

    let player_top_left = Vec2::new(350.0, 400.0 - PLAYER_SIZE.y);
    let player = world
        .spawn((
            Player,
            PlayerController::new(Abilities { max_consecutive_jumps: 2, ..default() }),
            LinearVelocity(Vec2::new(0.0, vertical_speed)),
            GravityScale(1.0),
            Transform::from_translation(FIELD.center_of(player_top_left, PLAYER_SIZE).extend(5.0)),
            HitBox::full(PLAYER_SIZE),
        ))
        .id();
    (world, player)
}

#[test]
fn landing_resets_the_jump_counter() {
    let (mut world, player) = controller_world(0.0);
    run_system_once(&mut world, super::apply_controller);
    assert_eq!(world.get::<PlayerController>(player).unwrap().consecutive_jumps(), 0);
}

#[test]
fn rising_past_a_ledge_top_is_not_landing() {
    let (mut world, player) = controller_world(150.0);
    run_system_once(&mut world, super::apply_controller);
    assert_eq!(world.get::<PlayerController>(player).unwrap().consecutive_jumps(), 1);
}

#[test]
fn a_short_jump_tap_reaches_the_next_fixed_step() {
    let (mut world, player) = controller_world(0.0);
    world.insert_resource(Time::<()>::default());
    world.init_resource::<ButtonInput<KeyCode>>();

    // Pressed and released between two fixed steps.
    world.resource_mut::<ButtonInput<KeyCode>>().press(JUMP_KEY);
    run_system_once(&mut world, super::gather_input);
    {
        let mut keys = world.resource_mut::<ButtonInput<KeyCode>>();
        keys.release(JUMP_KEY);
        keys.clear();
    }
    run_system_once(&mut world, super::gather_input);
    assert!(world.resource::<PlayerInput>().control.jump);

    run_system_once(&mut world, super::apply_controller);
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().y, JUMPING_SPEED);
    assert!(!world.resource::<PlayerInput>().jump_latched);

    run_system_once(&mut world, super::gather_input);
    assert!(!world.resource::<PlayerInput>().control.jump);
}
