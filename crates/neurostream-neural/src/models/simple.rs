// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Simple Action Potential
//!
//! Four fixed potentials, three phases, three durations. Nothing decays
//! continuously: the state is only re-evaluated when somebody asks.
//!
//! ```text
//! Deactivated:
//!     t ≥ last_change + decay        → potential = REST, last_change = t
//!     add p, current + p > THRESHOLD → Activated, potential = PEAK, fired
//!
//! Activated (potential = PEAK):
//!     t ≥ last_change + active       → Inactivated, potential = REFRACTORY,
//!                                      last_change = last_change + active
//!
//! Inactivated (potential = REFRACTORY):
//!     t ≥ last_change + inactive     → Deactivated, potential = REST,
//!                                      last_change = last_change + inactive
//! ```
//!
//! Phase transitions snap `last_change` to the boundary rather than to
//! the query instant, so a late query cannot stretch the next phase.

use std::sync::Arc;
use std::time::{Duration, Instant};

use super::traits::ActionPotential;
use crate::clock::{Clock, SystemClock};
use crate::types::{
    ActivationState, NeuralError, Potential, PotentialState, Result, PEAK_POTENTIAL,
    REFRACTORY_POTENTIAL, REST_POTENTIAL, THRESHOLD_POTENTIAL,
};

/// Phase lengths for [`SimpleActionPotential`].
///
/// All three are independent; none may be zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionPotentialDurations {
    decay: Duration,
    active: Duration,
    inactive: Duration,
}

impl ActionPotentialDurations {
    pub const DEFAULT_DECAY: Duration = Duration::from_millis(3);
    pub const DEFAULT_ACTIVE: Duration = Duration::from_millis(3);
    pub const DEFAULT_INACTIVE: Duration = Duration::from_millis(3);

    pub fn new(decay: Duration, active: Duration, inactive: Duration) -> Result<Self> {
        for (name, value) in [
            ("decay_duration", decay),
            ("active_duration", active),
            ("inactive_duration", inactive),
        ] {
            if value.is_zero() {
                return Err(NeuralError::InvalidDuration { name, value });
            }
        }
        Ok(Self {
            decay,
            active,
            inactive,
        })
    }

    pub fn decay(&self) -> Duration {
        self.decay
    }

    pub fn active(&self) -> Duration {
        self.active
    }

    pub fn inactive(&self) -> Duration {
        self.inactive
    }
}

impl Default for ActionPotentialDurations {
    fn default() -> Self {
        Self {
            decay: Self::DEFAULT_DECAY,
            active: Self::DEFAULT_ACTIVE,
            inactive: Self::DEFAULT_INACTIVE,
        }
    }
}

/// Lazy, duration-driven membrane state machine.
pub struct SimpleActionPotential {
    state: PotentialState,
    durations: ActionPotentialDurations,
    clock: Arc<dyn Clock>,
}

impl SimpleActionPotential {
    /// Resting membrane on the system clock with default durations.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock), ActionPotentialDurations::default())
    }

    /// Resting membrane whose `last_change` is the clock's current instant.
    pub fn with_clock(clock: Arc<dyn Clock>, durations: ActionPotentialDurations) -> Self {
        let state = PotentialState::resting(clock.now());
        Self::from_state(state, durations, clock)
    }

    pub fn from_state(
        state: PotentialState,
        durations: ActionPotentialDurations,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state,
            durations,
            clock,
        }
    }

    pub fn state(&self) -> &PotentialState {
        &self.state
    }

    pub fn durations(&self) -> &ActionPotentialDurations {
        &self.durations
    }

    /// Advance through every phase boundary that has passed by `at`.
    fn settle(&mut self, at: Instant) {
        loop {
            let state = &mut self.state;
            match state.state {
                ActivationState::Deactivated => {
                    if at >= state.last_change + self.durations.decay {
                        state.last_potential = REST_POTENTIAL;
                        state.last_change = at;
                    }
                    return;
                }
                ActivationState::Activated => {
                    let boundary = state.last_change + self.durations.active;
                    if at < boundary {
                        return;
                    }
                    state.state = ActivationState::Inactivated;
                    state.last_potential = REFRACTORY_POTENTIAL;
                    state.last_change = boundary;
                }
                ActivationState::Inactivated => {
                    let boundary = state.last_change + self.durations.inactive;
                    if at < boundary {
                        return;
                    }
                    state.state = ActivationState::Deactivated;
                    state.last_potential = REST_POTENTIAL;
                    state.last_change = boundary;
                }
            }
        }
    }
}

impl Default for SimpleActionPotential {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionPotential for SimpleActionPotential {
    fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    fn potential_at(&mut self, at: Instant) -> Potential {
        self.settle(at);
        self.state.last_potential
    }

    fn add_potential_at(&mut self, potential: Potential, at: Instant) -> (Potential, bool) {
        let current = self.potential_at(at);
        if self.state.state != ActivationState::Deactivated {
            return (current, false);
        }

        let sum = current + potential;
        if sum > THRESHOLD_POTENTIAL {
            self.state.state = ActivationState::Activated;
            self.state.last_potential = PEAK_POTENTIAL;
            self.state.last_change = at;
            return (PEAK_POTENTIAL, true);
        }

        if sum != current {
            self.state.last_potential = sum;
            self.state.last_change = at;
        }
        (sum, false)
    }
}

impl std::fmt::Debug for SimpleActionPotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleActionPotential")
            .field("state", &self.state)
            .field("durations", &self.durations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const US: Duration = Duration::from_micros(1);

    fn machine(state: PotentialState) -> SimpleActionPotential {
        SimpleActionPotential::from_state(
            state,
            ActionPotentialDurations::default(),
            Arc::new(SystemClock),
        )
    }

    struct Instants {
        now: Instant,
        before_decay: Instant,
        after_decay: Instant,
        before_inactive: Instant,
        after_inactive: Instant,
        before_rest: Instant,
        after_rest: Instant,
    }

    fn instants() -> Instants {
        let now = Instant::now();
        let d = ActionPotentialDurations::default();
        Instants {
            now,
            before_decay: now + d.decay() - US,
            after_decay: now + d.decay() + US,
            before_inactive: now + d.active() - US,
            after_inactive: now + d.active() + US,
            before_rest: now + d.inactive() - US,
            after_rest: now + d.inactive() + US,
        }
    }

    #[test]
    fn test_potential_at_transitions() {
        let t = instants();
        let d = ActionPotentialDurations::default();
        let cases = [
            // Small potential survives until the decay boundary
            (
                PotentialState::new(1.0, t.now, ActivationState::Deactivated),
                t.before_decay,
                PotentialState::new(1.0, t.now, ActivationState::Deactivated),
            ),
            // ...and is back at rest afterwards, last_change at the query
            (
                PotentialState::new(1.0, t.now, ActivationState::Deactivated),
                t.after_decay,
                PotentialState::new(REST_POTENTIAL, t.after_decay, ActivationState::Deactivated),
            ),
            (
                PotentialState::new(PEAK_POTENTIAL, t.now, ActivationState::Activated),
                t.before_inactive,
                PotentialState::new(PEAK_POTENTIAL, t.now, ActivationState::Activated),
            ),
            // Snapped to the boundary, not the query
            (
                PotentialState::new(PEAK_POTENTIAL, t.now, ActivationState::Activated),
                t.after_inactive,
                PotentialState::new(
                    REFRACTORY_POTENTIAL,
                    t.now + d.active(),
                    ActivationState::Inactivated,
                ),
            ),
            (
                PotentialState::new(REFRACTORY_POTENTIAL, t.now, ActivationState::Inactivated),
                t.before_rest,
                PotentialState::new(REFRACTORY_POTENTIAL, t.now, ActivationState::Inactivated),
            ),
            (
                PotentialState::new(REFRACTORY_POTENTIAL, t.now, ActivationState::Inactivated),
                t.after_rest,
                PotentialState::new(
                    REST_POTENTIAL,
                    t.now + d.inactive(),
                    ActivationState::Deactivated,
                ),
            ),
        ];

        for (i, (initial, at, expected)) in cases.into_iter().enumerate() {
            let mut ap = machine(initial);
            let potential = ap.potential_at(at);
            assert_eq!(*ap.state(), expected, "case {}", i);
            assert_eq!(potential, expected.last_potential(), "case {}", i);
        }
    }

    #[test]
    fn test_add_potential_at() {
        let t = instants();
        let d = ActionPotentialDurations::default();
        let cases = [
            // Nothing added, nothing changes
            (
                PotentialState::new(0.0, t.now, ActivationState::Deactivated),
                t.before_decay,
                0.0,
                (0.0, false),
                PotentialState::new(0.0, t.now, ActivationState::Deactivated),
            ),
            // Accumulates before decay
            (
                PotentialState::new(1.0, t.now, ActivationState::Deactivated),
                t.before_decay,
                1.0,
                (2.0, false),
                PotentialState::new(2.0, t.before_decay, ActivationState::Deactivated),
            ),
            // Decays to rest first, then accumulates
            (
                PotentialState::new(1.0, t.now, ActivationState::Deactivated),
                t.after_decay,
                1.0,
                (1.0, false),
                PotentialState::new(1.0, t.after_decay, ActivationState::Deactivated),
            ),
            // Crossing the threshold fires
            (
                PotentialState::new(1.0, t.now, ActivationState::Deactivated),
                t.before_decay,
                THRESHOLD_POTENTIAL,
                (PEAK_POTENTIAL, true),
                PotentialState::new(PEAK_POTENTIAL, t.before_decay, ActivationState::Activated),
            ),
            // Activated ignores input
            (
                PotentialState::new(PEAK_POTENTIAL, t.now, ActivationState::Activated),
                t.before_inactive,
                1.0,
                (PEAK_POTENTIAL, false),
                PotentialState::new(PEAK_POTENTIAL, t.now, ActivationState::Activated),
            ),
            // Inactivated after the active phase, still ignoring input
            (
                PotentialState::new(PEAK_POTENTIAL, t.now, ActivationState::Activated),
                t.after_inactive,
                1.0,
                (REFRACTORY_POTENTIAL, false),
                PotentialState::new(
                    REFRACTORY_POTENTIAL,
                    t.now + d.active(),
                    ActivationState::Inactivated,
                ),
            ),
            // Accumulates again after the refractory period
            (
                PotentialState::new(REFRACTORY_POTENTIAL, t.now, ActivationState::Inactivated),
                t.after_rest,
                1.0,
                (1.0, false),
                PotentialState::new(1.0, t.after_rest, ActivationState::Deactivated),
            ),
        ];

        for (i, (initial, at, input, expected, final_state)) in cases.into_iter().enumerate() {
            let mut ap = machine(initial);
            let result = ap.add_potential_at(input, at);
            assert_eq!(result, expected, "case {}", i);
            assert_eq!(*ap.state(), final_state, "case {}", i);
        }
    }

    #[test]
    fn test_exact_threshold_does_not_fire() {
        let now = Instant::now();
        let mut ap = machine(PotentialState::resting(now));
        assert_eq!(ap.add_potential_at(THRESHOLD_POTENTIAL, now + US), (15.0, false));
        assert_eq!(ap.state().state(), ActivationState::Deactivated);
    }

    #[test]
    fn test_sub_threshold_accumulation_never_fires() {
        let now = Instant::now();
        let mut ap = machine(PotentialState::resting(now));
        for i in 1..=5u32 {
            let (potential, fired) = ap.add_potential_at(2.0, now + US * i);
            assert!(!fired);
            assert_eq!(potential, 2.0 * i as f32);
        }
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let now = Instant::now();
        let d = ActionPotentialDurations::default();

        let mut ap = machine(PotentialState::new(5.0, now, ActivationState::Deactivated));
        assert_eq!(ap.potential_at(now + d.decay()), REST_POTENTIAL);

        let mut ap = machine(PotentialState::new(PEAK_POTENTIAL, now, ActivationState::Activated));
        assert_eq!(ap.potential_at(now + d.active()), REFRACTORY_POTENTIAL);
        assert_eq!(ap.state().last_change(), now + d.active());
    }

    #[test]
    fn test_late_query_catches_up_across_boundaries() {
        let now = Instant::now();
        let durations = ActionPotentialDurations::new(
            Duration::from_millis(10),
            Duration::from_millis(2),
            Duration::from_millis(4),
        )
        .unwrap();
        let mut ap = SimpleActionPotential::from_state(
            PotentialState::new(PEAK_POTENTIAL, now, ActivationState::Activated),
            durations,
            Arc::new(SystemClock),
        );

        let potential = ap.potential_at(now + Duration::from_millis(7));

        assert_eq!(potential, REST_POTENTIAL);
        assert_eq!(ap.state().state(), ActivationState::Deactivated);
        // Active (2ms) + inactive (4ms), independent of the 7ms query
        assert_eq!(ap.state().last_change(), now + Duration::from_millis(6));
    }

    #[test]
    fn test_inactive_duration_is_independent_of_active_duration() {
        let now = Instant::now();
        let durations = ActionPotentialDurations::new(
            Duration::from_millis(3),
            Duration::from_millis(1),
            Duration::from_millis(5),
        )
        .unwrap();
        let mut ap = SimpleActionPotential::from_state(
            PotentialState::new(REFRACTORY_POTENTIAL, now, ActivationState::Inactivated),
            durations,
            Arc::new(SystemClock),
        );

        // Past the active length but short of the inactive length
        assert_eq!(ap.potential_at(now + Duration::from_millis(2)), REFRACTORY_POTENTIAL);
        assert_eq!(ap.potential_at(now + Duration::from_millis(5)), REST_POTENTIAL);
    }

    #[test]
    fn test_fire_after_catch_up_restarts_active_phase_at_call_time() {
        let now = Instant::now();
        let d = ActionPotentialDurations::default();
        let mut ap = machine(PotentialState::new(PEAK_POTENTIAL, now, ActivationState::Activated));
        let at = now + d.active() + d.inactive() + US;

        assert_eq!(ap.add_potential_at(20.0, at), (PEAK_POTENTIAL, true));
        assert_eq!(ap.state().last_change(), at);
    }

    #[test]
    fn test_uses_injected_clock() {
        let start = Instant::now();
        let clock = ManualClock::new(start);
        let mut ap = SimpleActionPotential::with_clock(
            Arc::new(clock.clone()),
            ActionPotentialDurations::default(),
        );

        clock.advance(US);
        assert_eq!(ap.add_potential(4.0), (4.0, false));
        assert_eq!(ap.state().last_change(), start + US);

        clock.advance(Duration::from_millis(3));
        assert_eq!(ap.potential(), REST_POTENTIAL);
    }

    #[test]
    fn test_zero_durations_are_rejected() {
        let ms = Duration::from_millis(1);
        let err = ActionPotentialDurations::new(ms, Duration::ZERO, ms).unwrap_err();
        assert_eq!(
            err,
            NeuralError::InvalidDuration {
                name: "active_duration",
                value: Duration::ZERO
            }
        );
        assert!(ActionPotentialDurations::new(Duration::ZERO, ms, ms).is_err());
        assert!(ActionPotentialDurations::new(ms, ms, Duration::ZERO).is_err());
    }
}
