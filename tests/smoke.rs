mod common;

use bevy::prelude::*;
use tiny_dwarf::common::state::{GameState, LevelId};
use tiny_dwarf::plugins::level::LevelSession;
use tiny_dwarf::plugins::menus::MenuAction;
use tiny_dwarf::plugins::player::Player;

#[test]
fn boots_into_the_main_menu() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }

    assert_eq!(common::state(&app), GameState::MainMenu);
    let has_play_button = app
        .world_mut()
        .query::<&MenuAction>()
        .iter(app.world())
        .any(|action| *action == MenuAction::PlayGame);
    assert!(has_play_button);
}

#[test]
fn every_level_starts_with_one_player_and_a_fresh_clock() {
    let mut app = common::app_headless();
    app.update();

    for level in LevelId::ALL {
        common::go_to(&mut app, GameState::Level(level));
        for _ in 0..3 {
            app.update();
        }

        assert_eq!(common::state(&app), GameState::Level(level));
        let players = app.world_mut().query::<&Player>().iter(app.world()).count();
        assert_eq!(players, 1, "{level}");
        let session = app.world().resource::<LevelSession>();
        assert_eq!(session.level, level);
    }
}

#[test]
fn menu_entities_go_away_when_a_level_starts() {
    let mut app = common::app_headless();
    for _ in 0..3 {
        app.update();
    }

    common::go_to(&mut app, GameState::Level(LevelId::Roll));
    app.update();

    let menu_buttons = app.world_mut().query::<&MenuAction>().iter(app.world()).count();
    assert_eq!(menu_buttons, 0);
}
