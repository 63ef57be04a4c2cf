//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - All randomness through the `RandomSource` seam
//! - No rendering or platform dependencies

pub mod rng;
pub mod state;
pub mod throw;
pub mod tick;

pub use rng::{GameRng, RandomSource, ScriptedRandom};
pub use state::{GameEvent, GameState, ThrowState};
pub use throw::{ThrowPlan, landing_scores, plan_throw};
pub use tick::{TickInput, tick};
