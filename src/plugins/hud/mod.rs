//! Heads-up display: status bar, pause overlay and game-over overlay.
//!
//! The HUD never changes game state itself. Buttons and hotkeys write
//! [`LevelCommand`]s and the level runner acts on them; the overlays are then
//! shown or hidden from `LevelSession::overlay` every frame.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::{GameState, LevelId};
use crate::common::tunables::Tunables;
use crate::plugins::level::{LevelCatalog, LevelCommand, LevelSession, LevelSystems, Overlay, time_label};
use crate::plugins::ui::{self, TRANSLUCENT_BACKGROUND};

pub const PAUSE_KEY: KeyCode = KeyCode::Escape;
pub const PLAY_AGAIN_KEY: KeyCode = KeyCode::KeyR;

const STATUS_BAR_COLOR: Color = Color::srgb(0.85, 0.85, 0.80);
const STATUS_FONT_SIZE: f32 = 16.0;

pub const PAUSE_LABEL: &str = "Pause";
pub const UNPAUSE_LABEL: &str = "Play";

#[derive(Component, Debug)]
pub struct TimeText;

#[derive(Component, Debug)]
pub struct HintText;

#[derive(Component, Debug)]
pub struct PauseButtonLabel;

#[derive(Component, Debug)]
pub struct PauseScreen;

#[derive(Component, Debug)]
pub struct GameOverScreen;

#[derive(Component, Debug)]
pub struct GameOverText;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudButton(pub LevelCommand);

pub fn plugin(app: &mut App) {
    for id in LevelId::ALL {
        app.add_systems(OnEnter(GameState::Level(id)), spawn_hud);
    }
    app.add_systems(Update, (hud_buttons, hud_hotkeys).in_set(LevelSystems::Input))
        .add_systems(Update, sync_overlays.in_set(LevelSystems::Present));
}

fn spawn_hud(
    mut commands: Commands,
    state: Res<State<GameState>>,
    catalog: Res<LevelCatalog>,
    tunables: Res<Tunables>,
) {
    let Some(level) = state.get().level() else {
        return;
    };
    let hint = catalog.config_or_basic(level).hint;
    let scope = GameState::Level(level);

    commands.spawn((
        Name::new("StatusBar"),
        Node {
            width: Val::Percent(100.0),
            height: Val::Px(tunables.status_bar_height),
            position_type: PositionType::Absolute,
            top: Val::Px(0.0),
            padding: UiRect::horizontal(Val::Px(10.0)),
            justify_content: JustifyContent::SpaceBetween,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(STATUS_BAR_COLOR),
        DespawnOnExit(scope),
        children![
            (
                TimeText,
                Text::new(time_label(0.0)),
                TextFont { font_size: STATUS_FONT_SIZE, ..default() },
                TextColor(Color::BLACK),
            ),
            (
                HintText,
                Text::new(hint),
                TextFont { font_size: STATUS_FONT_SIZE, ..default() },
                TextColor(Color::BLACK),
            ),
            (
                ui::button_node(Vec2::new(64.0, 28.0)),
                HudButton(LevelCommand::PauseUnpause),
                children![(PauseButtonLabel, ui::button_label(PAUSE_LABEL, 14.0))],
            ),
        ],
    ));

    commands.spawn((
        Name::new("PauseScreen"),
        PauseScreen,
        ui::screen_root(),
        BackgroundColor(TRANSLUCENT_BACKGROUND),
        Visibility::Hidden,
        DespawnOnExit(scope),
        children![
            ui::header("Game Paused", 48.0),
            ui::header(hint, 24.0),
            ui::button("Unpause\n(Press ESC Key)", HudButton(LevelCommand::PauseUnpause)),
            ui::button("Quit Game", HudButton(LevelCommand::Quit)),
        ],
    ));

    commands.spawn((
        Name::new("GameOverScreen"),
        GameOverScreen,
        ui::screen_root(),
        BackgroundColor(TRANSLUCENT_BACKGROUND),
        Visibility::Hidden,
        DespawnOnExit(scope),
        children![
            ui::header("Game Over", 48.0),
            (GameOverText, ui::header("", 24.0)),
            ui::button("Play Again\n(Press R Key)", HudButton(LevelCommand::PlayAgain)),
            ui::button("Quit Game", HudButton(LevelCommand::Quit)),
        ],
    ));
}

fn hud_buttons(
    q_buttons: Query<(&Interaction, &HudButton), Changed<Interaction>>,
    mut commands: MessageWriter<LevelCommand>,
) {
    for (interaction, button) in &q_buttons {
        if *interaction == Interaction::Pressed {
            commands.write(button.0);
        }
    }
}

fn hud_hotkeys(
    keys: Res<ButtonInput<KeyCode>>,
    session: Res<LevelSession>,
    mut commands: MessageWriter<LevelCommand>,
) {
    if keys.just_pressed(PAUSE_KEY) {
        commands.write(LevelCommand::PauseUnpause);
    }
    if keys.just_pressed(PLAY_AGAIN_KEY) && session.overlay == Overlay::GameOver {
        commands.write(LevelCommand::PlayAgain);
    }
}

fn sync_overlays(
    session: Res<LevelSession>,
    mut q_pause: Query<&mut Visibility, (With<PauseScreen>, Without<GameOverScreen>)>,
    mut q_over: Query<&mut Visibility, (With<GameOverScreen>, Without<PauseScreen>)>,
    mut q_message: Query<&mut Text, (With<GameOverText>, Without<PauseButtonLabel>)>,
    mut q_label: Query<&mut Text, (With<PauseButtonLabel>, Without<GameOverText>)>,
) {
    let shown = |yes: bool| if yes { Visibility::Inherited } else { Visibility::Hidden };

    for mut vis in &mut q_pause {
        vis.set_if_neq(shown(session.overlay == Overlay::Paused));
    }
    for mut vis in &mut q_over {
        vis.set_if_neq(shown(session.overlay == Overlay::GameOver));
    }
    for mut text in &mut q_message {
        if text.0 != session.game_over_message {
            text.0.clone_from(&session.game_over_message);
        }
    }
    let label = if session.overlay == Overlay::Paused { UNPAUSE_LABEL } else { PAUSE_LABEL };
    for mut text in &mut q_label {
        if text.0 != label {
            text.0 = label.to_string();
        }
    }
}
