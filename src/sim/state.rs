//! Game state and core simulation types

use glam::Vec2;

use crate::consts::*;
use crate::{sandal_rest, target_start};

/// Throw lifecycle: at most one sandal in the air
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrowState {
    /// Sandal at rest, ready to throw
    Idle,
    /// Sandal mid-flight
    InFlight {
        /// Launch point (the rest position)
        from: Vec2,
        /// Computed landing point (throw-time target + random offset)
        to: Vec2,
        /// Target position frozen at throw time; scoring compares against
        /// this snapshot, not the live position
        aimed_at: Vec2,
        /// Whether the 20% hit-attempt draw came up
        hit_attempt: bool,
        /// Seconds since launch
        elapsed: f32,
    },
}

/// Presentation-facing events, drained by the frontend each frame.
/// These carry no gameplay authority.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ThrowStarted,
    SandalHit { distance: f32 },
    SandalMissed { distance: f32 },
    TargetTapped,
}

/// Complete state for the single game screen
#[derive(Debug, Clone)]
pub struct GameState {
    /// Wandering target anchor, always within the wanderable region
    pub target_pos: Vec2,
    /// Sandal anchor; equals the rest position unless a throw is in flight
    pub projectile_pos: Vec2,
    /// Monotonically non-decreasing
    pub score: u64,
    pub throw: ThrowState,
    pub sound_enabled: bool,
    pub paused: bool,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds accumulated toward the next wander step
    pub wander_accum: f32,
    /// Events queued since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            target_pos: target_start(),
            projectile_pos: sandal_rest(),
            score: 0,
            throw: ThrowState::Idle,
            sound_enabled: true,
            paused: false,
            time_ticks: 0,
            wander_accum: 0.0,
            events: Vec::new(),
        }
    }

    pub fn throw_in_flight(&self) -> bool {
        matches!(self.throw, ThrowState::InFlight { .. })
    }

    /// Normalized flight progress in [0, 1], 0.0 when idle
    pub fn throw_progress(&self) -> f32 {
        match self.throw {
            ThrowState::Idle => 0.0,
            ThrowState::InFlight { elapsed, .. } => (elapsed / THROW_DURATION).min(1.0),
        }
    }

    /// Hit-test a logical-space point against the target sprite
    pub fn point_on_target(&self, point: Vec2) -> bool {
        point.x >= self.target_pos.x
            && point.x <= self.target_pos.x + TARGET_SIZE
            && point.y >= self.target_pos.y
            && point.y <= self.target_pos.y + TARGET_SIZE
    }

    /// Drain queued events for the frontend
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = GameState::new();
        assert_eq!(state.score, 0);
        assert_eq!(state.throw, ThrowState::Idle);
        assert!(state.sound_enabled);
        assert!(!state.paused);
        assert_eq!(state.target_pos, target_start());
        assert_eq!(state.projectile_pos, sandal_rest());
    }

    #[test]
    fn test_point_on_target() {
        let mut state = GameState::new();
        state.target_pos = Vec2::new(100.0, 100.0);

        assert!(state.point_on_target(Vec2::new(100.0, 100.0)));
        assert!(state.point_on_target(Vec2::new(125.0, 149.0)));
        assert!(!state.point_on_target(Vec2::new(99.0, 100.0)));
        assert!(!state.point_on_target(Vec2::new(151.0, 100.0)));
    }

    #[test]
    fn test_take_events_drains() {
        let mut state = GameState::new();
        state.events.push(GameEvent::TargetTapped);
        assert_eq!(state.take_events().len(), 1);
        assert!(state.take_events().is_empty());
    }
}
