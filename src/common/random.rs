//! Level randomness.

use std::env;

use bevy::prelude::*;
use rand::distr::weighted::WeightedIndex;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const SEED_ENV_VAR: &str = "TINY_DWARF_SEED";

#[derive(Resource, Debug, Clone)]
pub struct LevelRng(pub SmallRng);

impl LevelRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }

    /// Seed from `TINY_DWARF_SEED` if it parses, otherwise from the OS.
    pub fn from_env() -> Self {
        match env::var(SEED_ENV_VAR) {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(seed) => {
                    info!("level rng seeded from {SEED_ENV_VAR}={seed}");
                    Self::seeded(seed)
                }
                Err(_) => {
                    warn!("{SEED_ENV_VAR}={raw:?} is not a u64, using an OS seed");
                    Self(SmallRng::from_os_rng())
                }
            },
            Err(_) => Self(SmallRng::from_os_rng()),
        }
    }

    /// `true` with probability `p`, compared the way the level curves expect:
    /// a uniform draw in `[0, 1)` strictly below `p`.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.0.random::<f64>() < p
    }

    #[inline]
    pub fn unit(&mut self) -> f64 {
        self.0.random::<f64>()
    }

    #[inline]
    pub fn index(&mut self, len: usize) -> usize {
        self.0.random_range(0..len)
    }

    #[inline]
    pub fn range_f32(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        self.0.random_range(lo..hi)
    }

    /// Uniform integer in `[lo, hi]`.
    #[inline]
    pub fn int_inclusive(&mut self, lo: i32, hi: i32) -> i32 {
        if hi <= lo {
            return lo;
        }
        self.0.random_range(lo..=hi)
    }

    #[inline]
    pub fn sign(&mut self) -> f32 {
        if self.0.random_bool(0.5) { 1.0 } else { -1.0 }
    }

    /// Pick an index with the given probabilities.
    ///
    /// Index drawn in proportion to `weights`. `None` when there is nothing
    /// to draw from: no weights, all zero, or any negative or non-finite.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        WeightedIndex::new(weights).ok().map(|dist| self.0.sample(dist))
    }
}

impl Default for LevelRng {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests;
