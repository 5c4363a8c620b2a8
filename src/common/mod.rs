//! Common, shared types.

pub mod bounds;
pub mod layers;
pub mod random;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
