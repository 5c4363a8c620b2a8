//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod hud;
pub mod level;
pub mod levels;
pub mod menus;
pub mod physics;
pub mod player;
pub mod save;
pub mod ui;
pub mod world;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    save::plugin(app);
    ui::plugin(app);
    level::plugin(app);
    levels::plugin(app);
    world::plugin(app);
    player::plugin(app);
    hud::plugin(app);
    menus::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}
