//! Fixed timestep simulation tick
//!
//! All mutation of `GameState` happens here, on the caller's event loop.
//! The wander timer and the throw tween are both modeled as time
//! accumulation inside the tick rather than real timers.

use super::rng::RandomSource;
use super::state::{GameEvent, GameState, ThrowState};
use super::throw::{landing_scores, plan_throw};
use crate::consts::*;
use crate::{clamp_to_bounds, sandal_rest};

/// Input commands for a single tick. One-shot flags; the caller clears them
/// after the tick is processed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Throw trigger (button, tap, Space)
    pub throw: bool,
    /// Direct tap on the target
    pub tap_target: bool,
    /// Flip the sound switch
    pub toggle_sound: bool,
    /// Flip the pause switch
    pub toggle_pause: bool,
}

/// Advance the game by one timestep
pub fn tick<R: RandomSource>(state: &mut GameState, input: &TickInput, rng: &mut R, dt: f32) {
    state.time_ticks += 1;

    if input.toggle_sound {
        state.sound_enabled = !state.sound_enabled;
    }
    if input.toggle_pause {
        state.paused = !state.paused;
        // The movement timer is cancelled on pause and recreated on resume,
        // so the interval phase restarts either way
        state.wander_accum = 0.0;
    }

    // Tapping the son directly always counts, paused or not
    if input.tap_target {
        state.score += 1;
        state.events.push(GameEvent::TargetTapped);
    }

    // Wander timer only runs while unpaused
    if !state.paused {
        state.wander_accum += dt;
        while state.wander_accum >= WANDER_INTERVAL {
            state.wander_accum -= WANDER_INTERVAL;
            wander_step(state, rng);
        }
    }

    // Throw trigger: ignored mid-flight and while paused
    if input.throw && !state.throw_in_flight() && !state.paused {
        let plan = plan_throw(rng, state.target_pos);
        state.throw = ThrowState::InFlight {
            from: sandal_rest(),
            to: plan.destination,
            aimed_at: state.target_pos,
            hit_attempt: plan.hit_attempt,
            elapsed: 0.0,
        };
        state.events.push(GameEvent::ThrowStarted);
    }

    // The tween is not tied to the movement timer: it advances while paused
    // and always runs to completion
    if let ThrowState::InFlight {
        from,
        to,
        aimed_at,
        hit_attempt,
        elapsed,
    } = state.throw
    {
        let elapsed = elapsed + dt;
        let t = (elapsed / THROW_DURATION).min(1.0);
        state.projectile_pos = from.lerp(to, t);

        if elapsed >= THROW_DURATION {
            let distance = to.distance(aimed_at);
            if landing_scores(to, aimed_at, hit_attempt) {
                state.score += 1;
                state.events.push(GameEvent::SandalHit { distance });
            } else {
                state.events.push(GameEvent::SandalMissed { distance });
            }
            state.projectile_pos = sandal_rest();
            state.throw = ThrowState::Idle;
        } else {
            state.throw = ThrowState::InFlight {
                from,
                to,
                aimed_at,
                hit_attempt,
                elapsed,
            };
        }
    }
}

/// One wander step: perturb each axis independently, clamp to bounds
fn wander_step<R: RandomSource>(state: &mut GameState, rng: &mut R) {
    let step = glam::Vec2::new(rng.spread(WANDER_RANGE), rng.spread(WANDER_RANGE));
    state.target_pos = clamp_to_bounds(state.target_pos + step);
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::sim::rng::{GameRng, ScriptedRandom};

    fn in_bounds(pos: Vec2) -> bool {
        pos.x >= 0.0
            && pos.x <= LOGICAL_WIDTH - TARGET_SIZE
            && pos.y >= 0.0
            && pos.y <= LOGICAL_HEIGHT - BOTTOM_MARGIN
    }

    /// Run enough ticks for an in-flight throw to land
    fn run_flight(state: &mut GameState, rng: &mut impl RandomSource) {
        let input = TickInput::default();
        for _ in 0..60 {
            tick(state, &input, rng, SIM_DT);
        }
    }

    #[test]
    fn test_wander_stays_in_bounds() {
        let mut state = GameState::new();
        let mut rng = GameRng::new(424242);
        let input = TickInput::default();

        // One wander step per tick
        for _ in 0..5000 {
            tick(&mut state, &input, &mut rng, WANDER_INTERVAL);
            assert!(in_bounds(state.target_pos), "escaped: {}", state.target_pos);
        }
    }

    #[test]
    fn test_wander_paused_is_frozen() {
        let mut state = GameState::new();
        state.paused = true;
        let start = state.target_pos;
        let mut rng = GameRng::new(1);
        let input = TickInput::default();

        for _ in 0..100 {
            tick(&mut state, &input, &mut rng, WANDER_INTERVAL);
        }
        assert_eq!(state.target_pos, start);
    }

    #[test]
    fn test_unpause_resets_interval_phase() {
        let mut state = GameState::new();
        let start = state.target_pos;
        let mut rng = GameRng::new(2);

        // Accumulate 0.9s toward the next step, then pause/unpause
        tick(&mut state, &TickInput::default(), &mut rng, 0.9);
        let toggle = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, &mut rng, SIM_DT);
        tick(&mut state, &toggle, &mut rng, SIM_DT);

        // Only 0.5s since resume: the old 0.9s must not carry over
        tick(&mut state, &TickInput::default(), &mut rng, 0.5);
        assert_eq!(state.target_pos, start);
    }

    #[test]
    fn test_throw_while_in_flight_is_noop() {
        let mut state = GameState::new();
        let mut rng = GameRng::new(3);
        let throw = TickInput {
            throw: true,
            ..Default::default()
        };

        tick(&mut state, &throw, &mut rng, SIM_DT);
        let ThrowState::InFlight {
            to: first_to,
            hit_attempt: first_attempt,
            ..
        } = state.throw
        else {
            panic!("throw did not start")
        };

        // Re-trigger mid-flight: the flight plan must be unchanged apart
        // from elapsed time
        tick(&mut state, &throw, &mut rng, SIM_DT);
        let ThrowState::InFlight {
            to, hit_attempt, ..
        } = state.throw
        else {
            panic!("flight ended early")
        };
        assert_eq!(to, first_to);
        assert_eq!(hit_attempt, first_attempt);
    }

    #[test]
    fn test_throw_while_paused_is_noop() {
        let mut state = GameState::new();
        state.paused = true;
        let mut rng = GameRng::new(4);
        let throw = TickInput {
            throw: true,
            ..Default::default()
        };

        tick(&mut state, &throw, &mut rng, SIM_DT);
        assert_eq!(state.throw, ThrowState::Idle);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_forced_hit_increments_score() {
        // chance 0.9 (hit attempt), offsets (10, 0) -> distance 10
        let mut state = GameState::new();
        state.target_pos = Vec2::new(100.0, 100.0);
        let mut rng = ScriptedRandom::new([0.9, 0.6, 0.5]);

        let throw = TickInput {
            throw: true,
            ..Default::default()
        };
        tick(&mut state, &throw, &mut rng, SIM_DT);
        assert!(state.throw_in_flight());
        assert_eq!(state.score, 0, "no score until the animation completes");

        run_flight(&mut state, &mut rng);
        assert_eq!(state.score, 1);
        assert_eq!(state.throw, ThrowState::Idle);
        assert_eq!(state.projectile_pos, sandal_rest());
    }

    #[test]
    fn test_forced_miss_branch_never_scores() {
        // chance 0.5 forces the miss branch; offsets (0, 0) would land dead
        // center, but the draw already decided the outcome
        let mut state = GameState::new();
        state.target_pos = Vec2::new(100.0, 100.0);
        let mut rng = ScriptedRandom::new([0.5, 0.5, 0.5]);

        let throw = TickInput {
            throw: true,
            ..Default::default()
        };
        tick(&mut state, &throw, &mut rng, SIM_DT);
        run_flight(&mut state, &mut rng);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_hit_attempt_outside_radius_does_not_score() {
        // chance 0.95, offsets (49, 49) -> distance ~69 > 50
        let mut state = GameState::new();
        state.target_pos = Vec2::new(100.0, 100.0);
        let mut rng = ScriptedRandom::new([0.95, 0.99, 0.99]);

        let throw = TickInput {
            throw: true,
            ..Default::default()
        };
        tick(&mut state, &throw, &mut rng, SIM_DT);
        run_flight(&mut state, &mut rng);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_hit_checks_frozen_snapshot_not_live_position() {
        // Land 10 away from the throw-time target, then let the target
        // wander far away during the flight. The frozen snapshot scores.
        let mut state = GameState::new();
        state.target_pos = Vec2::new(100.0, 100.0);
        let mut rng = ScriptedRandom::new([0.9, 0.6, 0.5]);

        let throw = TickInput {
            throw: true,
            ..Default::default()
        };
        tick(&mut state, &throw, &mut rng, SIM_DT);
        state.target_pos = Vec2::new(300.0, 600.0);

        run_flight(&mut state, &mut rng);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_tapping_target_five_times() {
        let mut state = GameState::new();
        let mut rng = GameRng::new(5);
        let tap = TickInput {
            tap_target: true,
            ..Default::default()
        };

        for _ in 0..5 {
            tick(&mut state, &tap, &mut rng, SIM_DT);
        }
        assert_eq!(state.score, 5);
    }

    #[test]
    fn test_tap_counts_while_paused() {
        let mut state = GameState::new();
        state.paused = true;
        let mut rng = GameRng::new(6);
        let tap = TickInput {
            tap_target: true,
            ..Default::default()
        };

        tick(&mut state, &tap, &mut rng, SIM_DT);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_flight_advances_while_paused() {
        let mut state = GameState::new();
        let mut rng = GameRng::new(7);

        let throw = TickInput {
            throw: true,
            ..Default::default()
        };
        tick(&mut state, &throw, &mut rng, SIM_DT);
        assert!(state.throw_in_flight());

        let pause = TickInput {
            toggle_pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, &mut rng, SIM_DT);
        assert!(state.paused);

        // The tween keeps running under pause and lands
        run_flight(&mut state, &mut rng);
        assert_eq!(state.throw, ThrowState::Idle);
        assert_eq!(state.projectile_pos, sandal_rest());
    }

    #[test]
    fn test_throw_events_emitted() {
        let mut state = GameState::new();
        state.target_pos = Vec2::new(100.0, 100.0);
        let mut rng = ScriptedRandom::new([0.9, 0.6, 0.5]);

        let throw = TickInput {
            throw: true,
            ..Default::default()
        };
        tick(&mut state, &throw, &mut rng, SIM_DT);
        assert!(state.events.contains(&GameEvent::ThrowStarted));

        run_flight(&mut state, &mut rng);
        assert!(
            state
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::SandalHit { .. }))
        );
    }

    #[test]
    fn test_sound_toggle_flips_flag() {
        let mut state = GameState::new();
        let mut rng = GameRng::new(8);
        let toggle = TickInput {
            toggle_sound: true,
            ..Default::default()
        };

        assert!(state.sound_enabled);
        tick(&mut state, &toggle, &mut rng, SIM_DT);
        assert!(!state.sound_enabled);
        tick(&mut state, &toggle, &mut rng, SIM_DT);
        assert!(state.sound_enabled);
    }

    proptest! {
        /// Score never decreases and the target never escapes the
        /// wanderable region, over arbitrary input/draw sequences
        #[test]
        fn prop_score_monotonic_and_target_bounded(
            seed in any::<u64>(),
            steps in prop::collection::vec(0u8..16, 1..300),
        ) {
            let mut state = GameState::new();
            let mut rng = GameRng::new(seed);
            let mut last_score = 0;

            for bits in steps {
                let input = TickInput {
                    throw: bits & 1 != 0,
                    tap_target: bits & 2 != 0,
                    toggle_sound: bits & 4 != 0,
                    toggle_pause: bits & 8 != 0,
                };
                tick(&mut state, &input, &mut rng, WANDER_INTERVAL);
                prop_assert!(state.score >= last_score);
                last_score = state.score;
                prop_assert!(in_bounds(state.target_pos));
            }
        }

        /// At most one throw is ever in flight, and every flight returns
        /// the sandal to rest
        #[test]
        fn prop_single_flight_returns_to_rest(
            seed in any::<u64>(),
            throws in prop::collection::vec(any::<bool>(), 1..100),
        ) {
            let mut state = GameState::new();
            let mut rng = GameRng::new(seed);

            for do_throw in throws {
                let input = TickInput { throw: do_throw, ..Default::default() };
                tick(&mut state, &input, &mut rng, SIM_DT);
            }

            // Drain any remaining flight
            for _ in 0..60 {
                tick(&mut state, &TickInput::default(), &mut rng, SIM_DT);
            }
            prop_assert_eq!(state.throw, ThrowState::Idle);
            prop_assert_eq!(state.projectile_pos, sandal_rest());
        }
    }
}
