//! World plugin: field bounds, the solid status bar and the scrolling backdrop.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::bounds::PlayField;
use crate::common::layers::{Layer, z};
use crate::common::state::{GameState, LevelId};
use crate::common::tunables::Tunables;
use crate::plugins::level::{ActiveLevel, LevelCatalog, LevelSystems};

const WALL_THICKNESS: f32 = 30.0;
const BACKDROP_STRIPES: usize = 8;

/// A band of the level background. Wraps around the field as it scrolls.
#[derive(Component, Debug, Clone, Copy)]
pub struct Backdrop {
    /// Length of the whole strip of bands along the scroll axis.
    pub span: f32,
}

pub fn plugin(app: &mut App) {
    for id in LevelId::ALL {
        app.add_systems(OnEnter(GameState::Level(id)), (spawn_bounds, spawn_backdrop));
    }
    app.add_systems(Update, scroll_backdrop.in_set(LevelSystems::Spawn));
}

/// Walls left, right and below the field plus the status bar body along the top.
/// Only the player collides with them.
fn spawn_bounds(mut commands: Commands, state: Res<State<GameState>>, tunables: Res<Tunables>) {
    let Some(level) = state.get().level() else {
        return;
    };
    let field = tunables.field();
    let layers = CollisionLayers::new(Layer::World, [Layer::Player]);
    let (w, h, t) = (field.width, field.height, WALL_THICKNESS);

    let mut spawn_wall = |name: &'static str, top_left: Vec2, size: Vec2| {
        commands.spawn((
            Name::new(name),
            Transform::from_translation(field.center_of(top_left, size).extend(z::BACKDROP)),
            RigidBody::Static,
            Collider::rectangle(size.x, size.y),
            layers,
            DespawnOnExit(GameState::Level(level)),
        ));
    };

    spawn_wall("WallLeft", Vec2::new(-t, -h), Vec2::new(t, h * 3.0));
    spawn_wall("WallRight", Vec2::new(w, -h), Vec2::new(t, h * 3.0));
    spawn_wall("WallBottom", Vec2::new(-t, h), Vec2::new(w + t * 2.0, t));
    spawn_wall("StatusBar", Vec2::ZERO, Vec2::new(w, tunables.status_bar_height));
}

/// Stripe layout for a backdrop moving at `velocity`: bands run across the
/// scroll direction. Returns `(top_left, size)` per band plus the wrap span.
pub fn backdrop_bands(field: &PlayField, velocity: Vec2) -> (Vec<(Vec2, Vec2)>, f32) {
    let vertical = velocity.y.abs() > velocity.x.abs();
    let (span, band) = if vertical {
        (field.height, field.height / BACKDROP_STRIPES as f32)
    } else {
        (field.width, field.width / BACKDROP_STRIPES as f32)
    };

    let bands = (0..BACKDROP_STRIPES)
        .map(|i| {
            let offset = i as f32 * band;
            if vertical {
                (Vec2::new(0.0, offset), Vec2::new(field.width, band))
            } else {
                (Vec2::new(offset, 0.0), Vec2::new(band, field.height))
            }
        })
        .collect();
    (bands, span)
}

fn spawn_backdrop(
    mut commands: Commands,
    state: Res<State<GameState>>,
    catalog: Res<LevelCatalog>,
    tunables: Res<Tunables>,
) {
    let Some(level) = state.get().level() else {
        return;
    };
    let config = catalog.config_or_basic(level);
    let field = tunables.field();
    let (bands, span) = backdrop_bands(&field, config.backdrop_velocity);
    let shade = config.backdrop_color.darker(0.03);

    for (i, (top_left, size)) in bands.into_iter().enumerate() {
        let color = if i % 2 == 0 { config.backdrop_color } else { shade };
        commands.spawn((
            Name::new("Backdrop"),
            Backdrop { span },
            Sprite::from_color(color, size),
            Transform::from_translation(field.center_of(top_left, size).extend(z::BACKDROP)),
            DespawnOnExit(GameState::Level(level)),
        ));
    }
}

/// Move a coordinate by `delta` and wrap it into `[-span / 2, span / 2)`.
#[inline]
pub fn wrap_scroll(pos: f32, delta: f32, span: f32) -> f32 {
    (pos + delta + span * 0.5).rem_euclid(span) - span * 0.5
}

fn scroll_backdrop(
    time: Res<Time>,
    tunables: Res<Tunables>,
    active: Res<ActiveLevel>,
    mut q_bands: Query<(&Backdrop, &mut Transform)>,
) {
    let field = tunables.field();
    let v = field.velocity_to_world(active.0.backdrop_velocity) * time.delta_secs();
    if v == Vec2::ZERO {
        return;
    }
    for (band, mut tf) in &mut q_bands {
        if v.x != 0.0 {
            tf.translation.x = wrap_scroll(tf.translation.x, v.x, band.span);
        }
        if v.y != 0.0 {
            tf.translation.y = wrap_scroll(tf.translation.y, v.y, band.span);
        }
    }
}
