//! Shared level runner.
//!
//! Every level registers a [`LevelConfig`] in the [`LevelCatalog`] and adds
//! its own spawn systems to [`LevelSystems::Spawn`]. Everything else a level
//! does is the same for all five and lives here.
//!
//! ```text
//! OnEnter(Level(id)):  unpause virtual time, fresh LevelSession + ActiveLevel
//!                      (player, bounds, backdrop and HUD spawn from their plugins)
//!
//! Update, in any level:
//!   Input    -> keys / buttons, LevelCommand messages written
//!   Commands -> pause/unpause, play again, quit
//!   Spawn    -> per-level timers                       (only while running)
//!   Rules    -> clock -> hazards -> purge -> time text (only while running)
//!   Present  -> overlay visibility, labels
//!
//! OnExit(Level(id)):   everything tagged DespawnOnExit goes; virtual time resumes
//! Play again:          Level(id) -> Reloading(id) -> Level(id)
//! ```
//!
//! Pausing freezes `Time<Virtual>`. That stops `FixedUpdate` (player
//! controller and the physics step) and zeroes timer deltas, while `Update`
//! keeps running so the HUD still reacts.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::time::Stopwatch;

use crate::common::bounds::{HitBox, OutOfBounds};
use crate::common::state::{GameState, LevelId, in_any_level};
use crate::common::tunables::Tunables;
use crate::plugins::hud::TimeText;
use crate::plugins::player::Player;
use crate::plugins::player::controller::Abilities;
use crate::plugins::save::SaveFile;

pub mod pieces;

use pieces::{Enemy, Friend};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub id: LevelId,
    pub abilities: Abilities,
    /// Centre text of the status bar.
    pub hint: &'static str,
    pub out_of_bounds: OutOfBounds,
    /// Screen px/s.
    pub backdrop_velocity: Vec2,
    pub backdrop_color: Color,
    /// Screen position of the player's centre.
    pub player_start: Vec2,
}

impl LevelConfig {
    /// Default abilities, no hint, everything off-screen is removed.
    pub fn basic(id: LevelId) -> Self {
        Self {
            id,
            abilities: Abilities::default(),
            hint: "",
            out_of_bounds: OutOfBounds { left: true, right: true, top: true, bottom: true },
            backdrop_velocity: Vec2::ZERO,
            backdrop_color: Color::srgb(0.12, 0.12, 0.14),
            player_start: Vec2::new(400.0, 300.0),
        }
    }
}

#[derive(Resource, Debug, Default)]
pub struct LevelCatalog(HashMap<LevelId, LevelConfig>);

impl LevelCatalog {
    pub fn register(&mut self, config: LevelConfig) {
        self.0.insert(config.id, config);
    }

    pub fn get(&self, id: LevelId) -> Option<&LevelConfig> {
        self.0.get(&id)
    }

    /// Config for `id`, falling back to [`LevelConfig::basic`] for a level nobody registered.
    pub fn config_or_basic(&self, id: LevelId) -> LevelConfig {
        self.get(id).copied().unwrap_or_else(|| {
            warn!("no config registered for level {id}, using defaults");
            LevelConfig::basic(id)
        })
    }
}

/// Config of the level being played. Present only inside a level.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ActiveLevel(pub LevelConfig);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    Paused,
    GameOver,
}

#[derive(Resource, Debug, Clone)]
pub struct LevelSession {
    pub level: LevelId,
    /// Survival time. Paused together with the level.
    pub clock: Stopwatch,
    pub overlay: Overlay,
    pub game_over_message: String,
}

impl LevelSession {
    pub fn new(level: LevelId) -> Self {
        Self {
            level,
            clock: Stopwatch::new(),
            overlay: Overlay::None,
            game_over_message: String::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.overlay == Overlay::None
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock.elapsed_secs_f64()
    }

    /// Elapsed time in milliseconds, the unit every spawn curve is written in.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_secs() * 1000.0
    }
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelCommand {
    PauseUnpause,
    PlayAgain,
    Quit,
}

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LevelSystems {
    Input,
    Commands,
    Spawn,
    Rules,
    Present,
}

/// Run condition: a level is active and neither paused nor over.
pub fn level_running(session: Option<Res<LevelSession>>) -> bool {
    session.is_some_and(|s| s.is_running())
}

pub fn time_label(secs: f64) -> String {
    format!("Time: {secs:.1} s")
}

pub fn game_over_message(current: f64, best: f64, new_best: bool) -> String {
    let mut message = format!("Your Time: {current:.1} s\nBest Time: {best:.1} s");
    if new_best {
        message.push_str("\nNew Best Time!");
    }
    message
}

/// Toggle the pause overlay. Does nothing once the run is over.
pub fn pause_unpause_game(session: &mut LevelSession, time: &mut Time<Virtual>) {
    match session.overlay {
        Overlay::GameOver => {}
        Overlay::None => {
            session.overlay = Overlay::Paused;
            session.clock.pause();
            time.pause();
        }
        Overlay::Paused => {
            session.overlay = Overlay::None;
            session.clock.unpause();
            time.unpause();
        }
    }
}

/// End the run: show the game-over overlay, keep the best time, compose the message.
/// Returns whether this run set a new best.
pub fn finish_run(session: &mut LevelSession, save: &mut SaveFile) -> bool {
    session.overlay = Overlay::GameOver;
    session.clock.pause();

    let current = session.elapsed_secs();
    let mut best = save.get_high_score_for_level(session.level);
    let new_best = current > best;

    if new_best {
        if let Err(e) = save.set_high_score_for_level(session.level, current) {
            warn!("could not save best time for {}: {e}", session.level);
        }
        best = current;
    }

    session.game_over_message = game_over_message(current, best, new_best);
    new_best
}

pub fn plugin(app: &mut App) {
    app.init_resource::<LevelCatalog>()
        .add_message::<LevelCommand>()
        .configure_sets(
            Update,
            (
                LevelSystems::Input,
                LevelSystems::Commands,
                LevelSystems::Spawn.run_if(level_running),
                LevelSystems::Rules.run_if(level_running),
                LevelSystems::Present,
            )
                .chain()
                .run_if(in_any_level),
        )
        .add_systems(Update, apply_level_commands.in_set(LevelSystems::Commands))
        .add_systems(
            Update,
            (tick_clock, detect_hazards, purge_out_of_bounds, refresh_time_text)
                .chain()
                .in_set(LevelSystems::Rules),
        );

    for id in LevelId::ALL {
        app.add_systems(OnEnter(GameState::Level(id)), enter_level)
            .add_systems(OnExit(GameState::Level(id)), exit_level)
            .add_systems(OnEnter(GameState::Reloading(id)), finish_reload);
    }
}

fn enter_level(
    mut commands: Commands,
    state: Res<State<GameState>>,
    catalog: Res<LevelCatalog>,
    mut time: ResMut<Time<Virtual>>,
) {
    let Some(id) = state.get().level() else {
        return;
    };
    let config = catalog.config_or_basic(id);

    time.unpause();
    commands.insert_resource(LevelSession::new(id));
    commands.insert_resource(ActiveLevel(config));
    info!("level {id} started");
}

fn exit_level(mut commands: Commands, mut time: ResMut<Time<Virtual>>) {
    time.unpause();
    commands.remove_resource::<LevelSession>();
    commands.remove_resource::<ActiveLevel>();
}

fn finish_reload(state: Res<State<GameState>>, mut next: ResMut<NextState<GameState>>) {
    if let GameState::Reloading(id) = *state.get() {
        next.set(GameState::Level(id));
    }
}

fn apply_level_commands(
    mut reader: MessageReader<LevelCommand>,
    mut session: ResMut<LevelSession>,
    mut time: ResMut<Time<Virtual>>,
    mut next: ResMut<NextState<GameState>>,
) {
    for command in reader.read() {
        match command {
            LevelCommand::PauseUnpause => pause_unpause_game(&mut session, &mut time),
            LevelCommand::PlayAgain => {
                info!("restarting level {}", session.level);
                next.set(GameState::Reloading(session.level));
            }
            LevelCommand::Quit => {
                info!("leaving level {}", session.level);
                next.set(GameState::MainMenu);
            }
        }
    }
}

fn tick_clock(time: Res<Time>, mut session: ResMut<LevelSession>) {
    session.clock.tick(time.delta());
}

fn detect_hazards(
    tunables: Res<Tunables>,
    mut session: ResMut<LevelSession>,
    mut save: ResMut<SaveFile>,
    mut time: ResMut<Time<Virtual>>,
    q_player: Query<(&Transform, &HitBox), With<Player>>,
    q_enemies: Query<(&Transform, &HitBox), With<Enemy>>,
) {
    let Ok((player_tf, player_box)) = q_player.single() else {
        return;
    };
    let field = tunables.field();
    let player_rect = player_box.screen_rect(player_tf.translation.truncate(), &field);

    let hit = q_enemies
        .iter()
        .any(|(tf, hit_box)| hit_box.screen_rect(tf.translation.truncate(), &field).overlaps(&player_rect));
    if !hit {
        return;
    }

    time.pause();
    let new_best = finish_run(&mut session, &mut save);
    info!(
        "game over in {} after {:.1} s{}",
        session.level,
        session.elapsed_secs(),
        if new_best { " (new best)" } else { "" }
    );
}

fn purge_out_of_bounds(
    mut commands: Commands,
    tunables: Res<Tunables>,
    active: Res<ActiveLevel>,
    q_pieces: Query<(Entity, &Transform, &HitBox), Or<(With<Friend>, With<Enemy>)>>,
) {
    let field = tunables.field();
    let policy = active.0.out_of_bounds;

    for (entity, tf, hit_box) in &q_pieces {
        if policy.is_out(&hit_box.screen_rect(tf.translation.truncate(), &field), &field) {
            commands.entity(entity).despawn();
        }
    }
}

fn refresh_time_text(session: Res<LevelSession>, mut q_text: Query<&mut Text, With<TimeText>>) {
    for mut text in &mut q_text {
        text.0 = time_label(session.elapsed_secs());
    }
}
