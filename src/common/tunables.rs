//! Tunable gameplay constants.

use bevy::prelude::*;

use crate::common::bounds::PlayField;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub field_width: f32,
    pub field_height: f32,
    pub status_bar_height: f32,
}

impl Tunables {
    pub fn field(&self) -> PlayField {
        PlayField::new(self.field_width, self.field_height)
    }
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            field_width: 800.0,
            field_height: 600.0,
            status_bar_height: 40.0,
        }
    }
}
