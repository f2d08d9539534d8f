//! The cat's patrol/pursue brain, kept free of engine concerns.
//!
//! `CatAgent` is a plain state machine: the `cat_think` system feeds it
//! positions and the fixed-step clock once per simulation tick and applies
//! whatever direction it hands back. Wait timers are absolute deadlines in
//! simulated seconds checked at the top of each step, so everything here is
//! deterministic under test — no coroutines, no wall clock.

use bevy::prelude::*;
use rand::Rng;
use std::fmt;

use crate::shared::CatState;

/// Tuning for one cat, converted from the scene's `CatDef` at spawn.
///
/// `stop_radius <= detection_radius` is expected but not enforced; if
/// violated, the Pursuing band is empty and anything inside `stop_radius`
/// is simply Caught.
#[derive(Debug, Clone)]
pub struct CatConfig {
    pub waypoints: Vec<Vec2>,
    pub detection_radius: f32,
    pub stop_radius: f32,
    pub wait_time: f32,
}

/// Fatal setup problems. Reported once at spawn, never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    EmptyPatrolRoute,
    MissingTarget,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPatrolRoute => write!(f, "cat has an empty patrol route"),
            ConfigError::MissingTarget => write!(f, "no target found for cat to track"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// A state-transition edge. Produced only when the state actually changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub from: CatState,
    pub to: CatState,
}

/// What one step decided: where to walk (zero or unit vector) and which
/// transition edges occurred, in order.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub direction: Vec2,
    pub changes: Vec<StateChange>,
}

#[derive(Debug)]
pub struct CatAgent {
    config: CatConfig,
    state: CatState,
    current_waypoint: usize,
    /// Absolute deadlines (simulated seconds) of pending wait timers.
    /// Superseded timers are never cancelled; each one re-checks the state
    /// when it fires and is a no-op unless the cat is still Waiting.
    pending_waits: Vec<f32>,
}

impl CatAgent {
    /// Create an agent at rest. One wait of `wait_time` is scheduled
    /// immediately so the cat starts patrolling on its own.
    pub fn new(config: CatConfig, now: f32) -> Result<Self, ConfigError> {
        if config.waypoints.is_empty() {
            return Err(ConfigError::EmptyPatrolRoute);
        }
        let first_wait = now + config.wait_time;
        Ok(Self {
            config,
            state: CatState::Waiting,
            current_waypoint: 0,
            pending_waits: vec![first_wait],
        })
    }

    pub fn state(&self) -> CatState {
        self.state
    }

    pub fn current_waypoint(&self) -> usize {
        self.current_waypoint
    }

    /// Number of wait timers that have not fired yet.
    pub fn pending_waits(&self) -> usize {
        self.pending_waits.len()
    }

    /// Advance the machine by one fixed simulation step.
    ///
    /// `position` is the cat, `target` the tracked entity, `now` the fixed
    /// clock in seconds. Returns the desired movement direction for the
    /// movement executor plus any transition edges for the notification
    /// sink.
    pub fn step(
        &mut self,
        position: Vec2,
        target: Vec2,
        now: f32,
        rng: &mut impl Rng,
    ) -> StepOutput {
        let mut changes = Vec::new();

        self.fire_due_waits(now, &mut changes);
        self.evaluate_target(position, target, now, &mut changes);

        let direction = match self.state {
            CatState::Patrolling => {
                let spot = self.config.waypoints[self.current_waypoint];
                let dist = position.distance(spot);
                if dist <= self.config.stop_radius {
                    // Arrived. Idle for a randomized stretch before the
                    // next leg; the timer advances the waypoint on fire.
                    let wait = rng
                        .gen_range(self.config.wait_time / 2.0..=self.config.wait_time * 2.0);
                    self.pending_waits.push(now + wait);
                    self.set_state(CatState::Waiting, &mut changes);
                    Vec2::ZERO
                } else {
                    (spot - position).normalize_or_zero()
                }
            }
            CatState::Pursuing => (target - position).normalize_or_zero(),
            CatState::Waiting | CatState::Caught => Vec2::ZERO,
        };

        StepOutput { direction, changes }
    }

    /// Fire every wait deadline that has elapsed. The state guard, not
    /// timer identity, gates the effect: only the first fire while Waiting
    /// advances the patrol; the rest are no-ops.
    fn fire_due_waits(&mut self, now: f32, changes: &mut Vec<StateChange>) {
        let mut i = 0;
        while i < self.pending_waits.len() {
            if self.pending_waits[i] <= now {
                self.pending_waits.swap_remove(i);
                if self.state == CatState::Waiting {
                    self.current_waypoint =
                        (self.current_waypoint + 1) % self.config.waypoints.len();
                    self.set_state(CatState::Patrolling, changes);
                }
            } else {
                i += 1;
            }
        }
    }

    /// Proximity rules, first match wins: inside stop radius → Caught;
    /// inside detection radius → Pursuing; otherwise a cat that was
    /// chasing (or had caught) loses interest and idles for `wait_time`
    /// before resuming patrol.
    fn evaluate_target(
        &mut self,
        position: Vec2,
        target: Vec2,
        now: f32,
        changes: &mut Vec<StateChange>,
    ) {
        let dist = target.distance(position);
        if dist <= self.config.stop_radius {
            self.set_state(CatState::Caught, changes);
        } else if dist <= self.config.detection_radius {
            self.set_state(CatState::Pursuing, changes);
        } else if matches!(self.state, CatState::Pursuing | CatState::Caught) {
            self.pending_waits.push(now + self.config.wait_time);
            self.set_state(CatState::Waiting, changes);
        }
    }

    fn set_state(&mut self, to: CatState, changes: &mut Vec<StateChange>) {
        if self.state != to {
            changes.push(StateChange {
                from: self.state,
                to,
            });
            self.state = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WAIT: f32 = 2.0;

    fn config(waypoints: &[(f32, f32)]) -> CatConfig {
        CatConfig {
            waypoints: waypoints.iter().map(|&(x, y)| Vec2::new(x, y)).collect(),
            detection_radius: 5.0,
            stop_radius: 1.0,
            wait_time: WAIT,
        }
    }

    fn agent(waypoints: &[(f32, f32)]) -> CatAgent {
        CatAgent::new(config(waypoints), 0.0).expect("valid test config")
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    const FAR: Vec2 = Vec2::new(1000.0, 1000.0);

    /// Steps far enough past every pending deadline that they all fire.
    fn fire_waits(cat: &mut CatAgent, now: &mut f32, rng: &mut StdRng, position: Vec2) {
        *now += WAIT * 2.0 + 0.1;
        cat.step(position, FAR, *now, rng);
    }

    /// Drives a fresh agent out of its initial wait into Patrolling.
    fn patrolling_agent(waypoints: &[(f32, f32)]) -> (CatAgent, f32) {
        let mut cat = agent(waypoints);
        let mut now = 0.0;
        fire_waits(&mut cat, &mut now, &mut rng(), Vec2::new(500.0, 500.0));
        assert_eq!(cat.state(), CatState::Patrolling);
        (cat, now)
    }

    #[test]
    fn empty_patrol_route_is_a_config_error() {
        let err = CatAgent::new(config(&[]), 0.0).unwrap_err();
        assert_eq!(err, ConfigError::EmptyPatrolRoute);
        assert_eq!(err.to_string(), "cat has an empty patrol route");
    }

    #[test]
    fn new_agent_waits_with_one_timer_scheduled() {
        let cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(cat.state(), CatState::Waiting);
        assert_eq!(cat.current_waypoint(), 0);
        assert_eq!(cat.pending_waits(), 1);
    }

    #[test]
    fn initial_wait_fires_into_patrol_of_next_waypoint() {
        let mut cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        let out = cat.step(Vec2::new(500.0, 500.0), FAR, WAIT + 0.1, &mut rng());
        assert_eq!(cat.state(), CatState::Patrolling);
        assert_eq!(cat.current_waypoint(), 1);
        assert_eq!(
            out.changes,
            vec![StateChange {
                from: CatState::Waiting,
                to: CatState::Patrolling,
            }]
        );
    }

    #[test]
    fn target_inside_stop_radius_is_caught_from_any_state() {
        let close = Vec2::new(0.5, 0.0);
        let origin = Vec2::ZERO;

        // From fresh Waiting.
        let mut cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        cat.step(origin, close, 0.0, &mut rng());
        assert_eq!(cat.state(), CatState::Caught);

        // From Patrolling.
        let (mut cat, now) = patrolling_agent(&[(0.0, 0.0), (10.0, 0.0)]);
        cat.step(Vec2::new(500.0, 500.0), Vec2::new(500.5, 500.0), now + 0.1, &mut rng());
        assert_eq!(cat.state(), CatState::Caught);

        // From Pursuing.
        let mut cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        cat.step(origin, Vec2::new(3.0, 0.0), 0.0, &mut rng());
        assert_eq!(cat.state(), CatState::Pursuing);
        cat.step(origin, close, 0.1, &mut rng());
        assert_eq!(cat.state(), CatState::Caught);
    }

    #[test]
    fn target_in_detection_band_is_pursued() {
        let mut cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        // Strictly between stop_radius (1) and detection_radius (5).
        let out = cat.step(Vec2::ZERO, Vec2::new(2.0, 0.0), 0.0, &mut rng());
        assert_eq!(cat.state(), CatState::Pursuing);
        assert_eq!(out.direction, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn caught_notification_fires_exactly_once() {
        let mut cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        let mut r = rng();
        let close = Vec2::new(0.5, 0.0);

        let first = cat.step(Vec2::ZERO, close, 0.0, &mut r);
        assert_eq!(first.changes.len(), 1);
        assert_eq!(first.changes[0].to, CatState::Caught);

        // Steady state: no further edges, still Caught, no movement.
        for i in 1..20 {
            let out = cat.step(Vec2::ZERO, close, i as f32 * 0.1, &mut r);
            assert_eq!(cat.state(), CatState::Caught);
            assert!(out.changes.is_empty());
            assert_eq!(out.direction, Vec2::ZERO);
        }
    }

    #[test]
    fn losing_the_target_decays_to_waiting_then_patrol() {
        let mut cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        let mut r = rng();

        cat.step(Vec2::ZERO, Vec2::new(3.0, 0.0), 0.0, &mut r);
        assert_eq!(cat.state(), CatState::Pursuing);

        // Target escapes: wait_time timer scheduled, state drops to Waiting.
        let out = cat.step(Vec2::ZERO, FAR, 0.5, &mut r);
        assert_eq!(cat.state(), CatState::Waiting);
        assert_eq!(out.direction, Vec2::ZERO);
        assert!(out
            .changes
            .contains(&StateChange { from: CatState::Pursuing, to: CatState::Waiting }));

        // After wait_time the cat resumes patrol at the next waypoint.
        cat.step(Vec2::ZERO, FAR, 0.5 + WAIT + 0.1, &mut r);
        assert_eq!(cat.state(), CatState::Patrolling);
    }

    #[test]
    fn patrol_direction_normalizes_toward_current_waypoint() {
        // Waypoint 1 = (10, 0); agent stands at the origin far from the
        // target, so the step yields a pure patrol direction.
        let (mut cat, now) = patrolling_agent(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(cat.current_waypoint(), 1);
        let out = cat.step(Vec2::ZERO, FAR, now + 0.1, &mut rng());
        assert_eq!(cat.state(), CatState::Patrolling);
        assert_eq!(out.direction, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn arriving_at_waypoint_stops_and_schedules_a_wait() {
        let (mut cat, now) = patrolling_agent(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(cat.pending_waits(), 0);

        // 0.5 from the waypoint, inside stop_radius = 1.
        let out = cat.step(Vec2::new(9.5, 0.0), FAR, now + 0.1, &mut rng());
        assert_eq!(out.direction, Vec2::ZERO);
        assert_eq!(cat.state(), CatState::Waiting);
        assert_eq!(cat.pending_waits(), 1);
    }

    #[test]
    fn arrival_wait_is_sampled_within_half_to_double() {
        // The sampled idle must land in [wait/2, wait*2]: firing before
        // wait/2 must be impossible, firing by wait*2 guaranteed.
        for seed in 0..32 {
            let (mut cat, now) = patrolling_agent(&[(0.0, 0.0), (10.0, 0.0)]);
            let mut r = StdRng::seed_from_u64(seed);
            cat.step(Vec2::new(10.0, 0.0), FAR, now + 0.1, &mut r);
            assert_eq!(cat.state(), CatState::Waiting);

            cat.step(Vec2::new(10.0, 0.0), FAR, now + 0.1 + WAIT / 2.0 - 0.01, &mut r);
            assert_eq!(cat.state(), CatState::Waiting, "fired before wait/2 (seed {seed})");

            cat.step(Vec2::new(10.0, 0.0), FAR, now + 0.1 + WAIT * 2.0, &mut r);
            assert_eq!(cat.state(), CatState::Patrolling, "still idle past wait*2 (seed {seed})");
        }
    }

    #[test]
    fn waypoints_cycle_by_one_per_arrival() {
        let route = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)];
        let (mut cat, mut now) = patrolling_agent(&route);
        let mut r = rng();
        let start = cat.current_waypoint();

        for n in 1..=7 {
            // Stand on the current waypoint: arrival, then let the wait fire.
            let spot = Vec2::from(route[cat.current_waypoint()]);
            cat.step(spot, FAR, now + 0.1, &mut r);
            assert_eq!(cat.state(), CatState::Waiting);
            now += WAIT * 2.0 + 0.2;
            cat.step(spot, FAR, now, &mut r);
            assert_eq!(cat.state(), CatState::Patrolling);
            assert_eq!(cat.current_waypoint(), (start + n) % route.len());
        }
    }

    #[test]
    fn superseded_wait_timers_advance_at_most_once() {
        // Two detection-loss timers end up pending at once; when both have
        // fired the patrol has advanced exactly one waypoint.
        let (mut cat, now) = patrolling_agent(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        let mut r = rng();
        let pos = Vec2::new(500.0, 500.0);
        let near = Vec2::new(503.0, 500.0);

        cat.step(pos, near, now + 0.1, &mut r); // Pursuing
        cat.step(pos, FAR, now + 0.2, &mut r); // Waiting, timer A
        cat.step(pos, near, now + 0.3, &mut r); // Pursuing again, A still pending
        cat.step(pos, FAR, now + 0.4, &mut r); // Waiting, timer B

        assert_eq!(cat.pending_waits(), 2);
        let before = cat.current_waypoint();

        // Both deadlines elapse before the next step; only one advances.
        cat.step(pos, FAR, now + 0.4 + WAIT + 0.1, &mut r);
        assert_eq!(cat.state(), CatState::Patrolling);
        assert_eq!(cat.current_waypoint(), (before + 1) % 3);
        assert_eq!(cat.pending_waits(), 0);
    }

    #[test]
    fn wait_timer_is_a_noop_once_detection_intervenes() {
        let mut cat = agent(&[(0.0, 0.0), (10.0, 0.0)]);
        let mut r = rng();

        // Target shows up before the initial wait fires.
        cat.step(Vec2::ZERO, Vec2::new(3.0, 0.0), 0.1, &mut r);
        assert_eq!(cat.state(), CatState::Pursuing);
        let spot_before = cat.current_waypoint();

        // Initial deadline elapses mid-pursuit: no advance, no state change.
        let out = cat.step(Vec2::ZERO, Vec2::new(3.0, 0.0), WAIT + 0.1, &mut r);
        assert_eq!(cat.state(), CatState::Pursuing);
        assert_eq!(cat.current_waypoint(), spot_before);
        assert!(out.changes.is_empty());
        assert_eq!(cat.pending_waits(), 0);
    }

    #[test]
    fn caught_band_swallows_pursuit_when_radii_are_inverted() {
        // stop_radius > detection_radius is an unvalidated precondition:
        // the Pursuing band is empty and the stop check still wins.
        let cfg = CatConfig {
            waypoints: vec![Vec2::ZERO, Vec2::new(10.0, 0.0)],
            detection_radius: 2.0,
            stop_radius: 5.0,
            wait_time: WAIT,
        };
        let mut cat = CatAgent::new(cfg, 0.0).expect("non-empty route");
        cat.step(Vec2::ZERO, Vec2::new(3.0, 0.0), 0.0, &mut rng());
        assert_eq!(cat.state(), CatState::Caught);
    }
}
