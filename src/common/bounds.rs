//! Screen-space geometry.
//!
//! Level content is laid out the way it is drawn: origin at the top-left of
//! the play field, `y` growing downward. Bevy's world has its origin at the
//! centre and `y` growing upward. [`PlayField`] converts between the two, and
//! every gameplay rule that talks about "the left edge" or "below the screen"
//! is evaluated on a [`ScreenRect`].

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl PlayField {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn to_world(&self, screen: Vec2) -> Vec2 {
        Vec2::new(screen.x - self.width * 0.5, self.height * 0.5 - screen.y)
    }

    #[inline]
    pub fn to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x + self.width * 0.5, self.height * 0.5 - world.y)
    }

    /// Screen velocities (y down) to world velocities (y up).
    #[inline]
    pub fn velocity_to_world(&self, v: Vec2) -> Vec2 {
        Vec2::new(v.x, -v.y)
    }

    /// World-space centre of a sprite whose top-left corner sits at `top_left`.
    #[inline]
    pub fn center_of(&self, top_left: Vec2, size: Vec2) -> Vec2 {
        self.to_world(top_left + size * 0.5)
    }
}

/// Axis-aligned rectangle in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl ScreenRect {
    pub fn from_top_left(top_left: Vec2, size: Vec2) -> Self {
        Self {
            left: top_left.x,
            top: top_left.y,
            right: top_left.x + size.x,
            bottom: top_left.y + size.y,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    #[inline]
    pub fn overlaps(&self, other: &ScreenRect) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }

    #[inline]
    pub fn overlaps_horizontally(&self, other: &ScreenRect) -> bool {
        self.left < other.right && self.right > other.left
    }
}

/// Collision box of a sprite, distinct from its drawn size.
///
/// `offset` is the box centre relative to the entity translation (world axes).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub size: Vec2,
    pub offset: Vec2,
}

impl HitBox {
    pub fn full(size: Vec2) -> Self {
        Self { size, offset: Vec2::ZERO }
    }

    /// Box of `size` whose top-left corner is `top_left` pixels from the
    /// sprite's top-left corner.
    pub fn inset(visual: Vec2, size: Vec2, top_left: Vec2) -> Self {
        let center = top_left + size * 0.5 - visual * 0.5;
        Self { size, offset: Vec2::new(center.x, -center.y) }
    }

    /// [`HitBox::inset`] with every value given as a fraction of the sprite size.
    pub fn scaled(visual: Vec2, size: Vec2, top_left: Vec2) -> Self {
        Self::inset(visual, visual * size, visual * top_left)
    }

    pub fn screen_rect(&self, translation: Vec2, field: &PlayField) -> ScreenRect {
        let center = field.to_screen(translation + self.offset);
        ScreenRect::from_top_left(center - self.size * 0.5, self.size)
    }
}

/// Which trailing edges remove an entity once its hit box has fully crossed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutOfBounds {
    /// `right < 0`
    pub left: bool,
    /// `x > width`
    pub right: bool,
    /// `bottom < 0`
    pub top: bool,
    /// `y > height`
    pub bottom: bool,
}

impl OutOfBounds {
    pub fn is_out(&self, rect: &ScreenRect, field: &PlayField) -> bool {
        (self.left && rect.right < 0.0)
            || (self.right && rect.left > field.width)
            || (self.top && rect.bottom < 0.0)
            || (self.bottom && rect.top > field.height)
    }
}

#[cfg(test)]
mod tests;
