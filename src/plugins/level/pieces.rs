//! Level pieces: every platform, wall, hazard and projectile a level spawns.
//!
//! Each piece is a solid-colour quad sized like its artwork. What a piece is
//! (friend or enemy), how it collides, and which part of it counts as its hit
//! box are all properties of its [`Piece`] kind, so level code only decides
//! *where* and *how fast*.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::bounds::{HitBox, PlayField, ScreenRect};
use crate::common::layers::{Layer, z};
use crate::common::state::{GameState, LevelId};

/// Solid: the player may stand on it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Friend;

/// Hazard: touching its hit box ends the run.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Enemy;

/// Thin platform the player may jump up through.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct OneWay;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Friend,
    Enemy,
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Piece {
    // Airborne
    GrassPlatformLarge,
    GrassWallLarge,
    GrassBorder,
    // Artillery
    Castle100x600Both,
    Castle100x600Left,
    Castle100x600Mid,
    Castle100x600Right,
    Castle50x600Both,
    Castle70x40Both,
    Spikes100x30,
    Cannon100x70,
    CannonBall,
    SpikesWall,
    // Mineshaft and Incendiary
    ThinPlatform200,
    ThinPlatform400,
    ThickPlatform200,
    ThickPlatform400,
    ThickPlatform800,
    Minecart,
    Bat,
    LavaPool,
    SpikeStrip,
    // Roll
    HorizontalThickPlatform200,
    HorizontalSpikeStrip,
    GroundChunk,
}

impl Piece {
    pub fn name(self) -> &'static str {
        match self {
            Piece::GrassPlatformLarge => "grass-platform-large",
            Piece::GrassWallLarge => "grass-wall-large",
            Piece::GrassBorder => "grass-border",
            Piece::Castle100x600Both => "castle-100x600-both",
            Piece::Castle100x600Left => "castle-100x600-left",
            Piece::Castle100x600Mid => "castle-100x600-mid",
            Piece::Castle100x600Right => "castle-100x600-right",
            Piece::Castle50x600Both => "castle-50x600-both",
            Piece::Castle70x40Both => "castle-70x40-both",
            Piece::Spikes100x30 => "spikes-100x30",
            Piece::Cannon100x70 => "cannon-100x70",
            Piece::CannonBall => "cannon-ball",
            Piece::SpikesWall => "spikes-wall",
            Piece::ThinPlatform200 => "thin-platform-200",
            Piece::ThinPlatform400 => "thin-platform-400",
            Piece::ThickPlatform200 => "thick-platform-200",
            Piece::ThickPlatform400 => "thick-platform-400",
            Piece::ThickPlatform800 => "thick-platform-800",
            Piece::Minecart => "minecart",
            Piece::Bat => "bat",
            Piece::LavaPool => "lava-pool",
            Piece::SpikeStrip => "spike-strip",
            Piece::HorizontalThickPlatform200 => "horizontal-thick-platform-200",
            Piece::HorizontalSpikeStrip => "horizontal-spike-strip",
            Piece::GroundChunk => "ground-chunk",
        }
    }

    /// Drawn size in screen pixels.
    pub fn size(self) -> Vec2 {
        let (w, h) = match self {
            Piece::GrassPlatformLarge => (300.0, 40.0),
            Piece::GrassWallLarge => (80.0, 500.0),
            Piece::GrassBorder => (800.0, 40.0),
            Piece::Castle100x600Both
            | Piece::Castle100x600Left
            | Piece::Castle100x600Mid
            | Piece::Castle100x600Right => (100.0, 600.0),
            Piece::Castle50x600Both => (50.0, 600.0),
            Piece::Castle70x40Both => (70.0, 40.0),
            Piece::Spikes100x30 => (100.0, 30.0),
            Piece::Cannon100x70 => (100.0, 70.0),
            Piece::CannonBall => (30.0, 30.0),
            Piece::SpikesWall => (40.0, 560.0),
            Piece::ThinPlatform200 => (200.0, 20.0),
            Piece::ThinPlatform400 => (400.0, 20.0),
            Piece::ThickPlatform200 => (200.0, 40.0),
            Piece::ThickPlatform400 => (400.0, 40.0),
            Piece::ThickPlatform800 => (800.0, 40.0),
            Piece::Minecart => (60.0, 45.0),
            Piece::Bat => (50.0, 30.0),
            Piece::LavaPool => (800.0, 40.0),
            Piece::SpikeStrip => (100.0, 20.0),
            Piece::HorizontalThickPlatform200 => (200.0, 40.0),
            Piece::HorizontalSpikeStrip => (100.0, 20.0),
            Piece::GroundChunk => (200.0, 110.0),
        };
        Vec2::new(w, h)
    }

    pub fn color(self) -> Color {
        match self {
            Piece::GrassPlatformLarge => Color::srgb(0.36, 0.62, 0.25),
            Piece::GrassWallLarge => Color::srgb(0.30, 0.52, 0.22),
            Piece::GrassBorder => Color::srgb(0.20, 0.40, 0.16),
            Piece::Castle100x600Both | Piece::Castle50x600Both | Piece::Castle70x40Both => {
                Color::srgb(0.52, 0.50, 0.47)
            }
            Piece::Castle100x600Left | Piece::Castle100x600Right => Color::srgb(0.47, 0.45, 0.42),
            Piece::Castle100x600Mid => Color::srgb(0.56, 0.54, 0.50),
            Piece::Spikes100x30 | Piece::SpikesWall | Piece::SpikeStrip | Piece::HorizontalSpikeStrip => {
                Color::srgb(0.78, 0.80, 0.84)
            }
            Piece::Cannon100x70 => Color::srgb(0.18, 0.18, 0.20),
            Piece::CannonBall => Color::srgb(0.08, 0.08, 0.09),
            Piece::ThinPlatform200 | Piece::ThinPlatform400 => Color::srgb(0.55, 0.38, 0.22),
            Piece::ThickPlatform200 | Piece::ThickPlatform400 | Piece::ThickPlatform800 => {
                Color::srgb(0.45, 0.30, 0.17)
            }
            Piece::HorizontalThickPlatform200 => Color::srgb(0.45, 0.30, 0.17),
            Piece::GroundChunk => Color::srgb(0.33, 0.24, 0.16),
            Piece::Minecart => Color::srgb(0.40, 0.42, 0.46),
            Piece::Bat => Color::srgb(0.25, 0.12, 0.30),
            Piece::LavaPool => Color::srgb(0.95, 0.35, 0.05),
        }
    }

    pub fn role(self) -> Role {
        match self {
            Piece::GrassWallLarge
            | Piece::GrassBorder
            | Piece::Spikes100x30
            | Piece::CannonBall
            | Piece::SpikesWall
            | Piece::Minecart
            | Piece::Bat
            | Piece::LavaPool
            | Piece::SpikeStrip
            | Piece::HorizontalSpikeStrip => Role::Enemy,
            _ => Role::Friend,
        }
    }

    pub fn is_one_way(self) -> bool {
        matches!(self, Piece::ThinPlatform200 | Piece::ThinPlatform400)
    }

    /// The part of the sprite that counts for overlap and bounds checks.
    pub fn hit_box(self) -> HitBox {
        let size = self.size();
        match self {
            Piece::GrassWallLarge => HitBox::scaled(size, Vec2::new(0.7, 0.95), Vec2::new(0.15, 0.025)),
            Piece::Spikes100x30 | Piece::Cannon100x70 => {
                HitBox::scaled(size, Vec2::splat(0.8), Vec2::new(0.1, 0.2))
            }
            Piece::CannonBall => HitBox::scaled(size, Vec2::splat(0.7), Vec2::splat(0.15)),
            Piece::SpikesWall => HitBox::scaled(size, Vec2::new(0.8, 1.0), Vec2::ZERO),
            Piece::Minecart => HitBox::scaled(size, Vec2::splat(0.8), Vec2::ZERO),
            Piece::Bat => HitBox::scaled(size, Vec2::new(0.9, 0.8), Vec2::ZERO),
            _ => HitBox::full(size),
        }
    }

    /// Screen rect of the hit box of this piece drawn with its top-left corner at `top_left`.
    pub fn screen_rect_at(self, top_left: Vec2) -> ScreenRect {
        let hit_box = self.hit_box();
        let center = top_left + self.size() * 0.5 + Vec2::new(hit_box.offset.x, -hit_box.offset.y);
        ScreenRect::from_top_left(center - hit_box.size * 0.5, hit_box.size)
    }
}

/// Top-left corner of a sprite of `size` placed at `pos` with a Phaser-style
/// anchor (`(0, 0)` top-left, `(0.5, 0.5)` centre, `(1, 1)` bottom-right).
#[inline]
pub fn anchored(pos: Vec2, size: Vec2, anchor: Vec2) -> Vec2 {
    pos - size * anchor
}

/// Where a piece goes and how it moves, in screen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub top_left: Vec2,
    pub velocity: Vec2,
}

impl Placement {
    pub fn at(top_left: Vec2) -> Self {
        Self { top_left, velocity: Vec2::ZERO }
    }

    pub fn moving(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }
}

fn piece_layers(piece: Piece) -> CollisionLayers {
    match (piece, piece.role()) {
        (Piece::Minecart, _) => CollisionLayers::new(
            [Layer::Enemy, Layer::Cart],
            [Layer::Friend, Layer::Ledge, Layer::Cart],
        ),
        (p, Role::Friend) if p.is_one_way() => {
            CollisionLayers::new(Layer::Ledge, [Layer::Player, Layer::Cart])
        }
        (_, Role::Friend) => CollisionLayers::new(Layer::Friend, [Layer::Player, Layer::Cart]),
        (_, Role::Enemy) => CollisionLayers::new(Layer::Enemy, LayerMask::NONE),
    }
}

/// Physics shape covering exactly the hit box. Players stand on, and carts
/// land on, the same rectangle the overlap and ground checks use.
pub fn hit_box_collider(hit_box: &HitBox) -> Collider {
    let shape = Collider::rectangle(hit_box.size.x, hit_box.size.y);
    if hit_box.offset == Vec2::ZERO {
        shape
    } else {
        Collider::compound(vec![(Position(hit_box.offset), Rotation::IDENTITY, shape)])
    }
}

/// Spawn `piece` for `level`. Scrolling pieces are kinematic, minecarts are
/// dynamic so they can fall onto platforms, the rest are static.
pub fn spawn_piece(
    commands: &mut Commands,
    field: &PlayField,
    level: LevelId,
    piece: Piece,
    placement: Placement,
) -> Entity {
    let size = piece.size();
    let hit_box = piece.hit_box();
    let center = field.center_of(placement.top_left, size);
    let z = match piece.role() {
        Role::Friend => z::PIECE,
        Role::Enemy => z::HAZARD,
    };

    let body = match piece {
        Piece::Minecart => RigidBody::Dynamic,
        _ if placement.velocity == Vec2::ZERO => RigidBody::Static,
        _ => RigidBody::Kinematic,
    };

    let mut entity = commands.spawn((
        Name::new(piece.name()),
        piece,
        Sprite::from_color(piece.color(), size),
        Transform::from_translation(center.extend(z)),
        hit_box,
        body,
        hit_box_collider(&hit_box),
        piece_layers(piece),
        LinearVelocity(field.velocity_to_world(placement.velocity)),
        DespawnOnExit(GameState::Level(level)),
    ));

    match piece.role() {
        Role::Friend => {
            entity.insert(Friend);
        }
        Role::Enemy if piece == Piece::Minecart => {
            entity.insert((Enemy, LockedAxes::ROTATION_LOCKED, Friction::ZERO));
        }
        Role::Enemy => {
            entity.insert((Enemy, Sensor));
        }
    }
    if piece.is_one_way() {
        entity.insert(OneWay);
    }

    entity.id()
}
