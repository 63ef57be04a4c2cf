//! Randomness seam for the simulation
//!
//! Every draw the sim makes goes through `RandomSource`, so tests can script
//! exact outcomes (the miss/hit draw in particular).

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

/// Source of uniform draws in [0, 1)
pub trait RandomSource {
    fn unit(&mut self) -> f32;

    /// Uniform draw in [-half_range, +half_range)
    fn spread(&mut self, half_range: f32) -> f32 {
        self.unit() * 2.0 * half_range - half_range
    }
}

/// Production source backed by PCG-32
pub struct GameRng {
    rng: Pcg32,
    seed: u64,
}

impl GameRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this run was created with (logged for reproduction)
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl RandomSource for GameRng {
    fn unit(&mut self) -> f32 {
        self.rng.random::<f32>()
    }
}

/// Replays a fixed sequence of unit draws, then falls back to 0.5
pub struct ScriptedRandom {
    values: VecDeque<f32>,
}

impl ScriptedRandom {
    pub fn new(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            values: values.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn unit(&mut self) -> f32 {
        self.values.pop_front().unwrap_or(0.5)
    }
}
