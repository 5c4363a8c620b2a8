//! Artillery: run across a scrolling castle wall while its cannons fire back.
//!
//! The level is built from 800 px wide chunks laid end to end. A chunk is a
//! list of pieces with screen positions relative to the chunk's left edge.
//!
//! ```text
//! every W/130 s: next chunk at (rightmost friend edge - 1), never the same layout twice in a row
//! every 0.75 s:  Arm  -> each cannon armed with p(t)
//!                Fire -> every armed cannon drops a ball at (x, y + 15), then disarms
//! ```

use std::f64::consts::PI;

use bevy::prelude::*;

use super::{every, register, rightmost_edge, top_left_of};
use crate::common::bounds::{HitBox, OutOfBounds, PlayField};
use crate::common::random::LevelRng;
use crate::common::state::{GameState, LevelId};
use crate::common::tunables::Tunables;
use crate::plugins::level::pieces::{Friend, Piece, Placement, Role, spawn_piece};
use crate::plugins::level::{LevelConfig, LevelSession, LevelSystems};
use crate::plugins::player::controller::Abilities;

const LEVEL: LevelId = LevelId::Artillery;
const STATE: GameState = GameState::Level(LEVEL);

pub const HINT: &str = "Special Ability: Tap Space again to double jump!";
pub const BACKGROUND_SPEED: f32 = -90.0;
pub const FOREGROUND_SPEED: f32 = -130.0;
pub const CANNON_BALL_SPEED: f32 = -300.0;
pub const CANNON_FIRE_INTERVAL: f32 = 0.75;
/// Cannon balls leave the barrel this far below the cannon's top edge.
pub const CANNON_BALL_DROP: f32 = 15.0;

const ARMED_CANNON_COLOR: Color = Color::srgb(0.62, 0.16, 0.10);

/// Probability that a cannon arms itself `ms` milliseconds into the run.
/// Starts at 0.4 and approaches 0.7.
pub fn cannon_fire_probability(ms: f64) -> f64 {
    (ms / 30000.0).atan() * 2.0 / PI * 0.3 + 0.4
}

pub type ChunkLayout = &'static [(Piece, &'static [(f32, f32)])];

/// Chunks picked at random once the run is under way.
pub const CHUNK_LAYOUTS: &[ChunkLayout] = &[
    &[
        (Piece::Castle100x600Both, &[(0.0, 425.0), (400.0, 150.0)]),
        (Piece::Castle100x600Mid, &[(100.0, 550.0), (200.0, 550.0), (300.0, 300.0), (500.0, 300.0), (600.0, 500.0), (700.0, 550.0)]),
        (Piece::Spikes100x30, &[(100.0, 520.0), (200.0, 520.0), (300.0, 270.0), (500.0, 270.0), (600.0, 470.0), (700.0, 520.0)]),
        (Piece::Cannon100x70, &[(400.0, 80.0)]),
    ],
    &[
        (Piece::Castle100x600Both, &[(0.0, 500.0), (100.0, 450.0), (200.0, 400.0), (300.0, 350.0), (400.0, 300.0), (500.0, 350.0), (600.0, 400.0), (700.0, 450.0)]),
        (Piece::Cannon100x70, &[(100.0, 380.0), (200.0, 330.0), (300.0, 280.0), (400.0, 230.0), (500.0, 280.0), (600.0, 330.0), (700.0, 380.0)]),
    ],
    &[
        (Piece::Castle50x600Both, &[(225.0, -250.0), (675.0, -250.0)]),
        (Piece::Castle70x40Both, &[(400.0, 350.0)]),
        (Piece::Castle100x600Both, &[(0.0, 350.0)]),
        (Piece::Castle100x600Mid, &[(100.0, 500.0), (200.0, 550.0), (300.0, 500.0), (400.0, 500.0), (500.0, 300.0), (600.0, 550.0), (700.0, 550.0)]),
        (Piece::Spikes100x30, &[(100.0, 470.0), (200.0, 520.0), (300.0, 470.0), (400.0, 470.0), (500.0, 270.0), (600.0, 520.0), (700.0, 520.0)]),
    ],
    &[
        (Piece::Castle50x600Both, &[(675.0, -250.0)]),
        (Piece::Castle100x600Both, &[(0.0, 375.0), (100.0, 400.0), (300.0, 300.0), (500.0, 200.0)]),
        (Piece::Castle100x600Mid, &[(200.0, 550.0), (400.0, 550.0), (600.0, 550.0), (700.0, 550.0)]),
        (Piece::Spikes100x30, &[(200.0, 520.0), (400.0, 520.0), (600.0, 520.0), (700.0, 520.0)]),
        (Piece::Cannon100x70, &[(100.0, 330.0), (300.0, 230.0), (500.0, 130.0), (300.0, 160.0)]),
    ],
    &[
        (Piece::Castle50x600Both, &[(225.0, -250.0), (675.0, -250.0)]),
        (Piece::Castle70x40Both, &[(15.0, 350.0), (415.0, 350.0)]),
        (Piece::Castle100x600Mid, &[(0.0, 525.0), (100.0, 550.0), (200.0, 525.0), (300.0, 500.0), (400.0, 525.0), (500.0, 500.0), (600.0, 525.0), (700.0, 550.0)]),
        (Piece::Spikes100x30, &[(0.0, 495.0), (100.0, 520.0), (200.0, 495.0), (300.0, 470.0), (400.0, 495.0), (500.0, 470.0), (600.0, 495.0), (700.0, 520.0)]),
    ],
    &[
        (Piece::Castle50x600Both, &[(575.0, -250.0)]),
        (Piece::Castle70x40Both, &[(15.0, 475.0), (115.0, 180.0)]),
        (Piece::Castle100x600Both, &[(400.0, 500.0)]),
        (Piece::Castle100x600Mid, &[(0.0, 550.0), (100.0, 550.0), (200.0, 550.0), (300.0, 550.0), (500.0, 550.0), (600.0, 550.0), (700.0, 550.0)]),
        (Piece::Spikes100x30, &[(0.0, 520.0), (100.0, 520.0), (200.0, 520.0), (300.0, 520.0), (500.0, 520.0), (600.0, 520.0), (700.0, 520.0)]),
        (Piece::Cannon100x70, &[(400.0, 430.0), (400.0, 360.0), (400.0, 290.0), (400.0, 220.0), (400.0, 150.0)]),
    ],
    &[
        (Piece::Castle50x600Both, &[(125.0, -200.0), (375.0, -190.0)]),
        (Piece::Castle70x40Both, &[(15.0, 350.0), (240.0, 375.0), (425.0, 350.0)]),
        (Piece::Castle100x600Both, &[(700.0, 335.0)]),
        (Piece::Castle100x600Mid, &[(0.0, 550.0), (100.0, 550.0), (200.0, 550.0), (300.0, 550.0), (400.0, 550.0), (500.0, 550.0), (600.0, 350.0)]),
        (Piece::Spikes100x30, &[(0.0, 520.0), (100.0, 520.0), (200.0, 520.0), (300.0, 520.0), (400.0, 520.0), (500.0, 520.0), (600.0, 320.0)]),
        (Piece::Cannon100x70, &[(700.0, 265.0)]),
    ],
    &[
        (Piece::Castle100x600Both, &[(0.0, 420.0)]),
        (Piece::Castle100x600Mid, &[(100.0, 500.0), (200.0, 400.0), (300.0, 300.0), (400.0, 200.0), (500.0, 300.0), (600.0, 400.0), (700.0, 500.0)]),
        (Piece::Spikes100x30, &[(100.0, 470.0), (200.0, 370.0), (300.0, 270.0), (400.0, 170.0), (500.0, 270.0), (600.0, 370.0), (700.0, 470.0)]),
    ],
    &[
        (Piece::Castle50x600Both, &[(430.0, -250.0)]),
        (Piece::Castle70x40Both, &[(480.0, 210.0), (530.0, 310.0), (530.0, 110.0)]),
        (Piece::Castle100x600Both, &[(0.0, 390.0), (600.0, 90.0), (700.0, 250.0)]),
        (Piece::Castle100x600Mid, &[(100.0, 300.0), (200.0, 300.0), (300.0, 500.0), (400.0, 500.0), (500.0, 500.0)]),
        (Piece::Spikes100x30, &[(100.0, 270.0), (200.0, 270.0), (300.0, 470.0), (400.0, 470.0), (500.0, 470.0)]),
        (Piece::Cannon100x70, &[(700.0, 180.0)]),
    ],
    &[
        (Piece::Castle100x600Both, &[(0.0, 440.0), (350.0, -250.0), (700.0, 530.0)]),
        (Piece::Castle100x600Mid, &[(100.0, 350.0), (200.0, 450.0), (300.0, 550.0), (400.0, 550.0), (500.0, 450.0), (600.0, 350.0)]),
        (Piece::Spikes100x30, &[(100.0, 320.0), (200.0, 420.0), (300.0, 520.0), (400.0, 520.0), (500.0, 420.0), (600.0, 320.0)]),
        (Piece::Cannon100x70, &[(700.0, 460.0)]),
    ],
];

/// The first chunk of every run.
pub const INITIAL_CHUNK_LAYOUTS: &[ChunkLayout] = &[
    &[
        (Piece::Castle100x600Left, &[(0.0, 400.0)]),
        (Piece::Castle100x600Mid, &[(100.0, 400.0), (200.0, 400.0), (300.0, 400.0), (400.0, 400.0), (500.0, 400.0), (600.0, 400.0), (700.0, 400.0)]),
    ],
    &[
        (Piece::Castle100x600Mid, &[(0.0, 400.0), (100.0, 400.0), (200.0, 400.0), (300.0, 400.0), (400.0, 400.0), (500.0, 400.0), (600.0, 400.0)]),
        (Piece::Castle100x600Right, &[(700.0, 400.0)]),
    ],
];

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cannon {
    pub armed: bool,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CannonStage {
    #[default]
    Arm,
    Fire,
}

impl CannonStage {
    fn next(self) -> Self {
        match self {
            CannonStage::Arm => CannonStage::Fire,
            CannonStage::Fire => CannonStage::Arm,
        }
    }
}

/// Picks random chunk layouts, never the same one twice in a row.
#[derive(Debug, Default, Clone)]
pub struct ChunkPicker {
    last: Option<usize>,
}

impl ChunkPicker {
    pub fn pick(&mut self, rng: &mut LevelRng, count: usize) -> usize {
        if count <= 1 {
            self.last = Some(0);
            return 0;
        }
        let excluded = self.last.filter(|&last| last < count);
        let weights: Vec<f64> = (0..count)
            .map(|i| if Some(i) == excluded { 0.0 } else { 1.0 })
            .collect();
        let index = rng.weighted_index(&weights).unwrap_or(0);
        self.last = Some(index);
        index
    }
}

#[derive(Resource, Debug)]
pub(super) struct ArtilleryTimers {
    pub(super) chunk: Timer,
    pub(super) cannons: Timer,
    pub(super) stage: CannonStage,
    pub(super) picker: ChunkPicker,
}

pub fn config() -> LevelConfig {
    LevelConfig {
        abilities: Abilities { max_consecutive_jumps: 2, ..default() },
        hint: HINT,
        out_of_bounds: OutOfBounds { left: true, top: true, bottom: true, right: false },
        backdrop_velocity: Vec2::new(BACKGROUND_SPEED, 0.0),
        backdrop_color: Color::srgb(0.42, 0.40, 0.46),
        ..LevelConfig::basic(LEVEL)
    }
}

pub fn plugin(app: &mut App) {
    register(app, config());
    app.add_systems(OnEnter(STATE), setup).add_systems(
        Update,
        (spawn_chunks, fire_cannons, show_armed_cannons)
            .chain()
            .in_set(LevelSystems::Spawn)
            .run_if(in_state(STATE)),
    );
}

/// Where the next chunk starts: overlapping the rightmost friend by one pixel.
pub fn chunk_offset(rightmost_friend: Option<f32>) -> f32 {
    rightmost_friend.map_or(0.0, |right| (right - 1.0).max(0.0))
}

/// Spawn every piece of `layout` shifted right by `x_offset`. Returns the right
/// edge of the rightmost friend in it.
pub fn spawn_chunk(commands: &mut Commands, field: &PlayField, layout: ChunkLayout, x_offset: f32) -> f32 {
    let mut right = x_offset;
    for &(piece, spots) in layout {
        for &(x, y) in spots {
            let top_left = Vec2::new(x + x_offset, y);
            let entity = spawn_piece(
                commands,
                field,
                LEVEL,
                piece,
                Placement::at(top_left).moving(Vec2::new(FOREGROUND_SPEED, 0.0)),
            );
            if piece == Piece::Cannon100x70 {
                commands.entity(entity).insert(Cannon::default());
            }
            if piece.role() == Role::Friend {
                right = right.max(piece.screen_rect_at(top_left).right);
            }
        }
    }
    right
}

/// Top-left corner of the ball fired by a cannon whose top-left is `cannon`.
pub fn cannon_ball_spot(cannon: Vec2) -> Vec2 {
    cannon + Vec2::new(0.0, CANNON_BALL_DROP)
}

pub(super) fn setup(mut commands: Commands, tunables: Res<Tunables>, mut rng: ResMut<LevelRng>) {
    let field = tunables.field();

    spawn_piece(
        &mut commands,
        &field,
        LEVEL,
        Piece::SpikesWall,
        Placement::at(Vec2::new(0.0, tunables.status_bar_height)),
    );

    let mut picker = ChunkPicker::default();
    let right = spawn_chunk(&mut commands, &field, INITIAL_CHUNK_LAYOUTS[1], 0.0);
    let next = picker.pick(&mut rng, CHUNK_LAYOUTS.len());
    spawn_chunk(&mut commands, &field, CHUNK_LAYOUTS[next], chunk_offset(Some(right)));

    commands.insert_resource(ArtilleryTimers {
        chunk: every(field.width / FOREGROUND_SPEED.abs()),
        cannons: every(CANNON_FIRE_INTERVAL),
        stage: CannonStage::Arm,
        picker,
    });
}

fn spawn_chunks(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut timers: ResMut<ArtilleryTimers>,
    mut rng: ResMut<LevelRng>,
    q_friends: Query<(&Transform, &HitBox), With<Friend>>,
) {
    timers.chunk.tick(time.delta());
    let due = timers.chunk.times_finished_this_tick();
    if due == 0 {
        return;
    }

    let field = tunables.field();
    let mut rightmost = rightmost_edge(&field, &q_friends);
    for _ in 0..due {
        let index = timers.picker.pick(&mut rng, CHUNK_LAYOUTS.len());
        let right = spawn_chunk(&mut commands, &field, CHUNK_LAYOUTS[index], chunk_offset(rightmost));
        debug!("artillery chunk {index} spawned");
        rightmost = Some(right);
    }
}

pub(super) fn fire_cannons(
    mut commands: Commands,
    time: Res<Time>,
    tunables: Res<Tunables>,
    session: Res<LevelSession>,
    mut timers: ResMut<ArtilleryTimers>,
    mut rng: ResMut<LevelRng>,
    mut q_cannons: Query<(&Transform, &mut Cannon)>,
) {
    timers.cannons.tick(time.delta());
    let field = tunables.field();

    for _ in 0..timers.cannons.times_finished_this_tick() {
        match timers.stage {
            CannonStage::Arm => {
                let p = cannon_fire_probability(session.elapsed_ms());
                for (_, mut cannon) in &mut q_cannons {
                    if rng.unit() <= p {
                        cannon.armed = true;
                    }
                }
            }
            CannonStage::Fire => {
                for (tf, mut cannon) in &mut q_cannons {
                    if !cannon.armed {
                        continue;
                    }
                    let cannon_top_left = top_left_of(&field, tf.translation, Piece::Cannon100x70.size());
                    spawn_piece(
                        &mut commands,
                        &field,
                        LEVEL,
                        Piece::CannonBall,
                        Placement::at(cannon_ball_spot(cannon_top_left))
                            .moving(Vec2::new(CANNON_BALL_SPEED, 0.0)),
                    );
                    cannon.armed = false;
                }
            }
        }
        timers.stage = timers.stage.next();
    }
}

pub(super) fn show_armed_cannons(mut q_cannons: Query<(&Cannon, &mut Sprite), Changed<Cannon>>) {
    for (cannon, mut sprite) in &mut q_cannons {
        sprite.color = if cannon.armed { ARMED_CANNON_COLOR } else { Piece::Cannon100x70.color() };
    }
}
