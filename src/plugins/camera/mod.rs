//! Camera plugin.
//!
//! The play field never scrolls: pieces move past a fixed camera centred on
//! the world origin, which is the centre of the 800x600 field.

use bevy::prelude::*;

#[derive(Component, Debug)]
pub struct MainCamera;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera);
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        Transform::from_xyz(0.0, 0.0, 999.0),
    ));
}
