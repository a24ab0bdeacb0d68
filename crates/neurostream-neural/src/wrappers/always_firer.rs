// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Test double that reports a fire on every addition

use std::time::Instant;

use crate::clock::Clock;
use crate::models::ActionPotential;
use crate::types::Potential;

/// Delegates to the wrapped membrane, then reports `fired = true`
/// regardless of what it decided.
#[derive(Debug)]
pub struct AlwaysFirer<A> {
    inner: A,
}

impl<A: ActionPotential> AlwaysFirer<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: ActionPotential> ActionPotential for AlwaysFirer<A> {
    fn clock(&self) -> &dyn Clock {
        self.inner.clock()
    }

    fn potential_at(&mut self, at: Instant) -> Potential {
        self.inner.potential_at(at)
    }

    fn add_potential_at(&mut self, potential: Potential, at: Instant) -> (Potential, bool) {
        let (potential, _) = self.inner.add_potential_at(potential, at);
        (potential, true)
    }
}
