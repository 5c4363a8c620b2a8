//! Physics: avian2d in pixel units with the dwarf's downward gravity.
//!
//! Pieces are kinematic and move at constant velocity; only the player and
//! rolling minecarts are dynamic.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::player::controller::FALLING_ACCELERATION;

pub fn plugin(app: &mut App) {
    let ppm = app.world().resource::<Tunables>().pixels_per_meter;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm));
    app.insert_resource(Gravity(Vec2::NEG_Y * FALLING_ACCELERATION));
}
