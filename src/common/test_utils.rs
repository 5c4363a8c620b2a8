//! Test helpers.
//!
//! `World::run_system_once` executes a single system without a schedule, but
//! `Commands` it issues stay queued until the next sync point. The helpers
//! here flush after each run so spawns and despawns are visible to the
//! assertions that follow.

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::common::random::LevelRng;
use crate::common::state::LevelId;
use crate::common::tunables::Tunables;
use crate::plugins::level::LevelSession;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A world with the resources every level system reads: tunables, a seeded
/// rng and a fresh session for `level`.
pub fn level_world(level: LevelId) -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(LevelRng::seeded(7));
    world.insert_resource(LevelSession::new(level));
    world
}
