// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The action potential capability

use std::time::Instant;

use crate::clock::Clock;
use crate::types::Potential;

/// A membrane that can be queried and charged at a logical instant.
///
/// Instants passed to the `*_at` methods must never go backwards for a
/// given instance; state is only ever projected forward.
pub trait ActionPotential: Send {
    /// Clock used by [`potential`](Self::potential) and
    /// [`add_potential`](Self::add_potential).
    fn clock(&self) -> &dyn Clock;

    /// Apply every transition whose boundary has passed by `at` and return
    /// the resulting potential.
    fn potential_at(&mut self, at: Instant) -> Potential;

    /// Apply transitions as of `at`, then integrate `potential` if the
    /// membrane is deactivated. Returns the resulting potential and whether
    /// this call crossed the threshold.
    fn add_potential_at(&mut self, potential: Potential, at: Instant) -> (Potential, bool);

    fn potential(&mut self) -> Potential {
        let now = self.clock().now();
        self.potential_at(now)
    }

    fn add_potential(&mut self, potential: Potential) -> (Potential, bool) {
        let now = self.clock().now();
        self.add_potential_at(potential, now)
    }
}

impl<A: ActionPotential + ?Sized> ActionPotential for Box<A> {
    fn clock(&self) -> &dyn Clock {
        (**self).clock()
    }

    fn potential_at(&mut self, at: Instant) -> Potential {
        (**self).potential_at(at)
    }

    fn add_potential_at(&mut self, potential: Potential, at: Instant) -> (Potential, bool) {
        (**self).add_potential_at(potential, at)
    }

    fn potential(&mut self) -> Potential {
        (**self).potential()
    }

    fn add_potential(&mut self, potential: Potential) -> (Potential, bool) {
        (**self).add_potential(potential)
    }
}
