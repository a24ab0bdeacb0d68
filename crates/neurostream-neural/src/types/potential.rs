// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Membrane potential values and phases

use core::fmt;
use std::time::Instant;

/// Membrane voltage deviation from rest, in mV.
pub type Potential = f32;

// Global for every neuron; per-neuron thresholds are deliberately absent.
pub const REST_POTENTIAL: Potential = 0.0;
pub const THRESHOLD_POTENTIAL: Potential = 15.0;
pub const PEAK_POTENTIAL: Potential = 100.0;
pub const REFRACTORY_POTENTIAL: Potential = -15.0;

/// Phase of the membrane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActivationState {
    /// Integrating input; the conventional starting phase.
    #[default]
    Deactivated,
    /// Fired; held at `PEAK_POTENTIAL`.
    Activated,
    /// Refractory; held at `REFRACTORY_POTENTIAL`.
    Inactivated,
}

impl fmt::Display for ActivationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivationState::Deactivated => "Deactivated",
            ActivationState::Activated => "Activated",
            ActivationState::Inactivated => "Inactivated",
        };
        f.write_str(name)
    }
}

/// Everything needed to compute the potential at a later instant: the
/// phase, the last stored potential and the instant it last changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotentialState {
    pub(crate) last_potential: Potential,
    pub(crate) last_change: Instant,
    pub(crate) state: ActivationState,
}

impl PotentialState {
    pub fn new(last_potential: Potential, last_change: Instant, state: ActivationState) -> Self {
        Self {
            last_potential,
            last_change,
            state,
        }
    }

    /// Deactivated at rest since `at`.
    pub fn resting(at: Instant) -> Self {
        Self::new(REST_POTENTIAL, at, ActivationState::Deactivated)
    }

    pub fn last_potential(&self) -> Potential {
        self.last_potential
    }

    pub fn last_change(&self) -> Instant {
        self.last_change
    }

    pub fn state(&self) -> ActivationState {
        self.state
    }

    /// Renders the state with the time since its last change, measured
    /// against `now` rather than the wall clock.
    pub fn describe_at(&self, now: Instant) -> String {
        format!(
            "{} ({:.1} since {:?} ago)",
            self.state,
            self.last_potential,
            now.saturating_duration_since(self.last_change)
        )
    }
}

impl fmt::Display for PotentialState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.1})", self.state, self.last_potential)
    }
}
