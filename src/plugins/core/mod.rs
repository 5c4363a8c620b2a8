//! Core plugin: shared resources and global settings.

use bevy::prelude::*;

use crate::common::random::LevelRng;
use crate::common::tunables::Tunables;

pub const BACKGROUND: Color = Color::srgb(0.16, 0.20, 0.30);

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>();
    app.init_resource::<LevelRng>();
    app.insert_resource(ClearColor(BACKGROUND));
}
