//! Menu screens: boot, main menu, level select and controls.
//!
//! Every screen is a single UI tree spawned on entering its state and removed
//! by `DespawnOnExit`. Buttons carry a [`MenuAction`]; one system turns presses
//! into state changes.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::{GameState, LevelId};
use crate::plugins::save::{DEFAULT_HIGH_SCORE, SaveFile};
use crate::plugins::ui::{self, MENU_BACKGROUND};

pub const GAME_TITLE: &str = "Tiny Dwarf";
pub const GAME_AUTHOR: &str = "by A-Send Studio";
pub const LEVEL_BUTTONS_PER_ROW: usize = 4;

pub const BASIC_CONTROLS: &str =
    "a = Hold to Move Left\nd = Hold to Move Right\nspace = Tap to Jump\nspace = Repeated Tap to Fly";
pub const ADVANCED_CONTROLS: &str =
    "s = Hold to Fall Faster\nw = Hold to Hover\nshift = Hold to Roll\nesc = Pause/Unpause";

const LEVEL_BUTTON_SIZE: Vec2 = Vec2::new(150.0, 68.0);

/// What a menu button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    PlayGame,
    Controls,
    Back,
    StartLevel(LevelId),
}

impl MenuAction {
    pub fn target(self) -> GameState {
        match self {
            MenuAction::PlayGame => GameState::SelectLevelMenu,
            MenuAction::Controls => GameState::ControlsMenu,
            MenuAction::Back => GameState::MainMenu,
            MenuAction::StartLevel(level) => GameState::Level(level),
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(Update, leave_boot.run_if(in_state(GameState::Boot)))
        .add_systems(OnEnter(GameState::MainMenu), spawn_main_menu)
        .add_systems(OnEnter(GameState::SelectLevelMenu), spawn_select_level)
        .add_systems(OnEnter(GameState::ControlsMenu), spawn_controls)
        .add_systems(Update, menu_buttons);
}

/// `"<Name>\nBest: 12.3 s"`, or `--` when nothing has been stored yet.
pub fn level_button_label(level: LevelId, best: f64) -> String {
    if best == DEFAULT_HIGH_SCORE {
        format!("{level}\nBest: --")
    } else {
        format!("{level}\nBest: {best:.1} s")
    }
}

fn leave_boot(mut next: ResMut<NextState<GameState>>) {
    next.set(GameState::MainMenu);
}

fn menu_root(state: GameState) -> impl Bundle {
    (
        Name::new(format!("{state:?}")),
        ui::screen_root(),
        BackgroundColor(MENU_BACKGROUND),
        DespawnOnExit(state),
    )
}

fn spawn_main_menu(mut commands: Commands) {
    commands.spawn((
        menu_root(GameState::MainMenu),
        children![
            ui::header(GAME_TITLE, 48.0),
            ui::header(GAME_AUTHOR, 36.0),
            ui::button("Play Game", MenuAction::PlayGame),
            ui::button("Controls", MenuAction::Controls),
        ],
    ));
}

fn spawn_select_level(mut commands: Commands, save: Res<SaveFile>) {
    commands
        .spawn(menu_root(GameState::SelectLevelMenu))
        .with_children(|root| {
            root.spawn(ui::header("Select Level", 48.0));

            for row_levels in LevelId::ALL.chunks(LEVEL_BUTTONS_PER_ROW) {
                root.spawn(Node {
                    flex_direction: FlexDirection::Row,
                    justify_content: JustifyContent::Center,
                    ..default()
                })
                .with_children(|row| {
                    for &level in row_levels {
                        let label = level_button_label(level, save.get_high_score_for_level(level));
                        row.spawn((
                            ui::button_node(LEVEL_BUTTON_SIZE),
                            MenuAction::StartLevel(level),
                            children![ui::button_label(label, 18.0)],
                        ));
                    }
                });
            }

            root.spawn(ui::button("Back", MenuAction::Back));
        });
}

fn controls_column(text: &'static str) -> impl Bundle {
    (
        Text::new(text),
        TextFont { font_size: 24.0, ..default() },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(Justify::Left),
        Node { margin: UiRect::horizontal(Val::Px(40.0)), ..default() },
    )
}

fn spawn_controls(mut commands: Commands) {
    commands.spawn((
        menu_root(GameState::ControlsMenu),
        children![
            ui::header("Controls", 48.0),
            (
                Node { flex_direction: FlexDirection::Row, ..default() },
                children![controls_column(BASIC_CONTROLS), controls_column(ADVANCED_CONTROLS)],
            ),
            ui::button("Back", MenuAction::Back),
        ],
    ));
}

fn menu_buttons(
    q_buttons: Query<(&Interaction, &MenuAction), Changed<Interaction>>,
    mut next: ResMut<NextState<GameState>>,
) {
    for (interaction, action) in &q_buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        debug!("menu: {action:?}");
        next.set(action.target());
    }
}
