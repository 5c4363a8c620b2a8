//! Player movement and ability state machine.
//!
//! This is engine-free on purpose: the Bevy side samples keys into a
//! [`ControlInput`], works out whether the player is grounded, hands the
//! current velocity and gravity scale over as a [`Body`], and writes the
//! result back into the avian components.
//!
//! ```text
//! horizontal: Idle <-> Walking <-> Rolling      (left/right/roll keys)
//! vertical:   Idle <-> FallingFast <-> Hovering (jump is an impulse, not a state)
//! ```

use bevy::prelude::*;

pub const WALKING_SPEED: f32 = 200.0;
pub const ROLLING_SPEED: f32 = 350.0;
pub const JUMPING_SPEED: f32 = 400.0;
pub const FALLING_ACCELERATION: f32 = 425.0;
pub const FALLING_FAST_ACCELERATION: f32 = 2500.0;

/// Gravity scale applied while falling fast, relative to the world gravity.
pub const FALLING_FAST_GRAVITY_SCALE: f32 = FALLING_FAST_ACCELERATION / FALLING_ACCELERATION;

/// Peak jump height in pixels. Informational, derived from the constants above.
pub const JUMPING_HEIGHT: f32 = JUMPING_SPEED * JUMPING_SPEED / (2.0 * FALLING_ACCELERATION);

pub const DEFAULT_ENABLE_ROLLING: bool = false;
pub const DEFAULT_ENABLE_FALLING_FAST: bool = true;
pub const DEFAULT_MAX_CONSECUTIVE_JUMPS: i32 = 1;
pub const DEFAULT_MAX_CONSECUTIVE_HOVERS: i32 = 0;
pub const DEFAULT_MAX_HOVER_DURATION: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HorizontalState {
    #[default]
    Idle,
    Walking,
    Rolling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalState {
    #[default]
    Idle,
    FallingFast,
    Hovering,
}

/// Which animation the sprite should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pose {
    #[default]
    Idle,
    WalkLeft,
    WalkRight,
    RollLeft,
    RollRight,
}

/// Key state for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    pub left: bool,
    pub right: bool,
    pub roll: bool,
    pub jump: bool,
    pub fall_fast: bool,
    /// Seconds the hover key has been held without interruption, `None` when up.
    pub hover_held_for: Option<f32>,
}

impl ControlInput {
    #[inline]
    pub fn hover_down(&self) -> bool {
        self.hover_held_for.is_some()
    }
}

/// The slice of the rigid body the controller is allowed to touch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// World velocity (y up).
    pub velocity: Vec2,
    pub gravity_scale: f32,
}

impl Default for Body {
    fn default() -> Self {
        Self { velocity: Vec2::ZERO, gravity_scale: 1.0 }
    }
}

/// Per-level ability configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Abilities {
    pub enable_rolling: bool,
    pub enable_falling_fast: bool,
    /// Negative means unlimited.
    pub max_consecutive_jumps: i32,
    /// Negative means unlimited.
    pub max_consecutive_hovers: i32,
    /// Seconds the hover key must be held before hovering starts.
    pub max_hover_duration: f32,
}

impl Default for Abilities {
    fn default() -> Self {
        Self {
            enable_rolling: DEFAULT_ENABLE_ROLLING,
            enable_falling_fast: DEFAULT_ENABLE_FALLING_FAST,
            max_consecutive_jumps: DEFAULT_MAX_CONSECUTIVE_JUMPS,
            max_consecutive_hovers: DEFAULT_MAX_CONSECUTIVE_HOVERS,
            max_hover_duration: DEFAULT_MAX_HOVER_DURATION,
        }
    }
}

#[derive(Component, Debug, Clone)]
pub struct PlayerController {
    pub abilities: Abilities,
    horizontal: HorizontalState,
    vertical: VerticalState,
    pose: Pose,
    consecutive_jumps: i32,
    consecutive_hovers: i32,
    jump_key_released_since_last_jump: bool,
    hover_key_released_since_last_hover: bool,
}

#[inline]
fn has_budget(used: i32, max: i32) -> bool {
    max < 0 || used < max
}

impl PlayerController {
    pub fn new(abilities: Abilities) -> Self {
        Self {
            abilities,
            horizontal: HorizontalState::Idle,
            vertical: VerticalState::Idle,
            pose: Pose::Idle,
            // Spawned in mid-air until the first grounded frame says otherwise.
            consecutive_jumps: 1,
            consecutive_hovers: 0,
            jump_key_released_since_last_jump: true,
            hover_key_released_since_last_hover: true,
        }
    }

    pub fn horizontal(&self) -> HorizontalState {
        self.horizontal
    }

    pub fn vertical(&self) -> VerticalState {
        self.vertical
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn consecutive_jumps(&self) -> i32 {
        self.consecutive_jumps
    }

    pub fn consecutive_hovers(&self) -> i32 {
        self.consecutive_hovers
    }

    pub fn is_walking(&self) -> bool {
        self.horizontal == HorizontalState::Walking
    }

    pub fn is_rolling(&self) -> bool {
        self.horizontal == HorizontalState::Rolling
    }

    pub fn is_hovering(&self) -> bool {
        self.vertical == VerticalState::Hovering
    }

    pub fn is_falling_fast(&self) -> bool {
        self.vertical == VerticalState::FallingFast
    }

    fn hover_hold_satisfied(&self, input: &ControlInput) -> bool {
        input
            .hover_held_for
            .is_some_and(|held| held >= self.abilities.max_hover_duration)
    }

    /// Advance one frame.
    pub fn update(&mut self, input: &ControlInput, grounded: bool, body: &mut Body) {
        self.update_horizontal(input, body);
        self.update_vertical(input, body);

        if !input.jump {
            self.jump_key_released_since_last_jump = true;
            if grounded {
                self.consecutive_jumps = 0;
            }
        }

        if !input.hover_down() {
            self.hover_key_released_since_last_hover = true;
            if grounded {
                self.consecutive_hovers = 0;
            }
        }

        // Walking off a ledge spends the first jump.
        if !grounded && self.consecutive_jumps < 1 {
            self.consecutive_jumps = 1;
        }
    }

    fn update_horizontal(&mut self, input: &ControlInput, body: &mut Body) {
        let rolling = self.abilities.enable_rolling && input.roll;

        if input.left {
            if rolling {
                self.roll(-1.0, body);
            } else {
                self.walk(-1.0, body);
            }
        } else if input.right {
            if rolling {
                self.roll(1.0, body);
            } else {
                self.walk(1.0, body);
            }
        } else if self.is_walking() {
            self.stop_walking(body);
        } else if self.is_rolling() {
            self.stop_rolling(body);
        } else {
            body.velocity.x = 0.0;
        }
    }

    fn update_vertical(&mut self, input: &ControlInput, body: &mut Body) {
        let a = self.abilities;

        if self.jump_key_released_since_last_jump
            && has_budget(self.consecutive_jumps, a.max_consecutive_jumps)
            && input.jump
        {
            self.jump_key_released_since_last_jump = false;
            self.consecutive_jumps += 1;
            self.jump(body);
        } else if self.hover_key_released_since_last_hover
            && has_budget(self.consecutive_hovers, a.max_consecutive_hovers)
            && self.hover_hold_satisfied(input)
        {
            self.hover_key_released_since_last_hover = false;
            self.consecutive_hovers += 1;
            self.hover(body);
        } else if a.enable_falling_fast && input.fall_fast {
            self.fall_fast(body);
        } else if self.is_hovering() && !self.hover_hold_satisfied(input) {
            self.stop_hovering(body);
        } else if self.is_falling_fast() {
            self.stop_falling_fast(body);
        }
    }

    fn walk(&mut self, dir: f32, body: &mut Body) {
        body.velocity.x = dir * WALKING_SPEED;
        self.horizontal = HorizontalState::Walking;
        self.pose = if dir < 0.0 { Pose::WalkLeft } else { Pose::WalkRight };
    }

    fn roll(&mut self, dir: f32, body: &mut Body) {
        body.velocity.x = dir * ROLLING_SPEED;
        self.horizontal = HorizontalState::Rolling;
        self.pose = if dir < 0.0 { Pose::RollLeft } else { Pose::RollRight };
    }

    fn stop_walking(&mut self, body: &mut Body) {
        if self.is_walking() {
            body.velocity.x = 0.0;
            self.horizontal = HorizontalState::Idle;
            self.pose = Pose::Idle;
        }
    }

    fn stop_rolling(&mut self, body: &mut Body) {
        if self.is_rolling() {
            body.velocity.x = 0.0;
            self.horizontal = HorizontalState::Idle;
            self.pose = Pose::Idle;
        }
    }

    fn jump(&mut self, body: &mut Body) {
        self.stop_falling_fast(body);
        self.stop_hovering(body);
        body.velocity.y = JUMPING_SPEED;
    }

    fn fall_fast(&mut self, body: &mut Body) {
        self.stop_hovering(body);
        body.gravity_scale = FALLING_FAST_GRAVITY_SCALE;
        self.vertical = VerticalState::FallingFast;
    }

    fn stop_falling_fast(&mut self, body: &mut Body) {
        if self.is_falling_fast() {
            body.gravity_scale = 1.0;
            self.vertical = VerticalState::Idle;
        }
    }

    fn hover(&mut self, body: &mut Body) {
        self.stop_falling_fast(body);
        body.velocity.y = 0.0;
        body.gravity_scale = 0.0;
        self.vertical = VerticalState::Hovering;
    }

    fn stop_hovering(&mut self, body: &mut Body) {
        if self.is_hovering() {
            body.gravity_scale = 1.0;
            self.vertical = VerticalState::Idle;
        }
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new(Abilities::default())
    }
}
