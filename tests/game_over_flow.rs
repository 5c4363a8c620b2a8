mod common;

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use tiny_dwarf::common::bounds::HitBox;
use tiny_dwarf::common::state::{GameState, LevelId};
use tiny_dwarf::plugins::hud::PLAY_AGAIN_KEY;
use tiny_dwarf::plugins::level::pieces::Enemy;
use tiny_dwarf::plugins::level::{LevelSession, Overlay};
use tiny_dwarf::plugins::player::{PLAYER_SIZE, Player};

fn player_translation(app: &mut App) -> Vec3 {
    let mut q = app.world_mut().query_filtered::<&Transform, With<Player>>();
    q.single(app.world()).unwrap().translation
}

/// An enemy right on top of the player, scoped to the level like real pieces.
fn spawn_enemy_on_player(app: &mut App) -> Vec3 {
    let at = player_translation(app);
    app.world_mut().spawn((
        Enemy,
        Transform::from_translation(at),
        HitBox::full(PLAYER_SIZE),
        DespawnOnExit(GameState::Level(LevelId::Roll)),
    ));
    at
}

fn start_roll(app: &mut App) {
    app.update();
    common::go_to(app, GameState::Level(LevelId::Roll));
    app.update();
}

#[test]
fn touching_an_enemy_ends_the_run_and_freezes_time() {
    let mut app = common::app_headless();
    start_roll(&mut app);

    spawn_enemy_on_player(&mut app);
    app.update();

    let session = app.world().resource::<LevelSession>();
    assert_eq!(session.overlay, Overlay::GameOver);
    assert!(session.game_over_message.starts_with("Your Time: "));
    assert!(app.world().resource::<Time<Virtual>>().is_paused());
}

#[test]
fn play_again_restarts_the_same_level() {
    let mut app = common::app_headless();
    start_roll(&mut app);

    let at = spawn_enemy_on_player(&mut app);
    app.update();
    assert_eq!(app.world().resource::<LevelSession>().overlay, Overlay::GameOver);

    common::press(&mut app, PLAY_AGAIN_KEY);
    app.update();
    common::release_all(&mut app);
    for _ in 0..3 {
        app.update();
    }

    assert_eq!(common::state(&app), GameState::Level(LevelId::Roll));
    assert_eq!(app.world().resource::<LevelSession>().overlay, Overlay::None);
    assert!(!app.world().resource::<Time<Virtual>>().is_paused());
    let enemies_at_player = app
        .world_mut()
        .query_filtered::<&Transform, With<Enemy>>()
        .iter(app.world())
        .filter(|tf| tf.translation == at)
        .count();
    assert_eq!(enemies_at_player, 0);
}
