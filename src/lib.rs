//! Chancla - a sandal-toss arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (wander timer, throw resolution, game state)
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Web Audio sound synthesis
//! - `settings`: Player preferences

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical screen space (portrait, phone-shaped)
    pub const LOGICAL_WIDTH: f32 = 390.0;
    pub const LOGICAL_HEIGHT: f32 = 844.0;

    /// Sprite anchor sizes (anchors are top-left, like CSS left/top)
    pub const TARGET_SIZE: f32 = 50.0;
    pub const SANDAL_SIZE: f32 = 50.0;

    /// Wanderable region: x in [0, width - TARGET_SIZE],
    /// y in [0, height - BOTTOM_MARGIN]
    pub const BOTTOM_MARGIN: f32 = 200.0;

    /// Wander timer period (seconds)
    pub const WANDER_INTERVAL: f32 = 1.0;
    /// Per-axis wander step half-range
    pub const WANDER_RANGE: f32 = 25.0;

    /// Throw animation duration (seconds)
    pub const THROW_DURATION: f32 = 0.5;
    /// Draws at or above this are hit attempts (20% of throws)
    pub const HIT_ATTEMPT_THRESHOLD: f32 = 0.8;
    /// Per-axis landing spread for a hit attempt
    pub const AIM_SPREAD: f32 = 50.0;
    /// Per-axis landing spread for a deliberate miss
    pub const MISS_SPREAD: f32 = 100.0;
    /// Landings closer than this to the throw-time target score
    pub const HIT_RADIUS: f32 = 50.0;

    /// Sandal rest position offset from the bottom edge
    pub const REST_OFFSET_Y: f32 = 100.0;
}

/// Clamp a target anchor to the wanderable region
#[inline]
pub fn clamp_to_bounds(pos: Vec2) -> Vec2 {
    Vec2::new(
        pos.x.clamp(0.0, consts::LOGICAL_WIDTH - consts::TARGET_SIZE),
        pos.y.clamp(0.0, consts::LOGICAL_HEIGHT - consts::BOTTOM_MARGIN),
    )
}

/// The sandal's rest anchor (bottom center)
#[inline]
pub fn sandal_rest() -> Vec2 {
    Vec2::new(
        consts::LOGICAL_WIDTH / 2.0,
        consts::LOGICAL_HEIGHT - consts::REST_OFFSET_Y,
    )
}

/// The target's starting anchor (upper third, centered)
#[inline]
pub fn target_start() -> Vec2 {
    Vec2::new(consts::LOGICAL_WIDTH / 2.0, consts::LOGICAL_HEIGHT / 3.0)
}
