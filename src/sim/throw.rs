//! Throw resolution: the miss/hit draw, landing spread, and the distance check
//!
//! Draw order matters for scripted-RNG tests: chance first, then the x and y
//! offsets.

use glam::Vec2;

use super::rng::RandomSource;
use crate::consts::*;

/// Outcome of the launch-time random draws
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowPlan {
    /// Landing point: throw-time target + per-axis offset, NOT clamped to
    /// screen bounds
    pub destination: Vec2,
    /// True for the narrow-spread hit-attempt draw
    pub hit_attempt: bool,
}

/// Roll the miss/hit draw and the landing offset for a throw at `target`
pub fn plan_throw<R: RandomSource + ?Sized>(rng: &mut R, target: Vec2) -> ThrowPlan {
    let chance = rng.unit();
    let hit_attempt = chance >= HIT_ATTEMPT_THRESHOLD;
    let half_range = if hit_attempt { AIM_SPREAD } else { MISS_SPREAD };
    let offset = Vec2::new(rng.spread(half_range), rng.spread(half_range));
    ThrowPlan {
        destination: target + offset,
        hit_attempt,
    }
}

/// Whether a completed throw scores: hit-attempt draw AND the landing within
/// HIT_RADIUS of the throw-time target snapshot
pub fn landing_scores(destination: Vec2, aimed_at: Vec2, hit_attempt: bool) -> bool {
    hit_attempt && destination.distance(aimed_at) < HIT_RADIUS
}
