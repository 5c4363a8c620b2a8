//! Collision layers and draw order.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug)]
pub enum Layer {
    #[default]
    Default,
    /// Field bounds and the status bar.
    World,
    Player,
    /// Solid level pieces the player can stand on.
    Friend,
    /// Thin platforms the player can jump up through.
    Ledge,
    /// Hazards. Overlap is tested on hit boxes, not by the solver.
    Enemy,
    /// Minecarts: hazards that still rest on platforms and bump each other.
    Cart,
}

/// Z values for sprites. The HUD is UI and always draws above these.
pub mod z {
    pub const BACKDROP: f32 = 0.0;
    pub const PIECE: f32 = 1.0;
    pub const HAZARD: f32 = 2.0;
    pub const PLAYER: f32 = 5.0;
}
