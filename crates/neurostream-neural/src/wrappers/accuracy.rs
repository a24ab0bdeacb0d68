// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Timing skew between logical and wall-clock delivery

use std::time::Instant;

use crate::clock::Clock;
use crate::models::ActionPotential;
use crate::types::Potential;

/// Tracks the mean difference between the clock's "now" and the logical
/// instant of every `add_potential_at` call.
///
/// A positive skew means deliveries arrive late. Skew is signed because a
/// scheduler running with a wake lead may deliver slightly early.
#[derive(Debug)]
pub struct AccuracyAccumulator<A> {
    inner: A,
    total_skew_ns: i128,
    count: u64,
}

impl<A: ActionPotential> AccuracyAccumulator<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            total_skew_ns: 0,
            count: 0,
        }
    }

    /// Number of additions observed.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean skew in nanoseconds, or `None` before the first sample.
    pub fn average_skew_ns(&self) -> Option<i64> {
        if self.count == 0 {
            None
        } else {
            Some((self.total_skew_ns / self.count as i128) as i64)
        }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

fn signed_delta_ns(now: Instant, at: Instant) -> i128 {
    if now >= at {
        now.duration_since(at).as_nanos() as i128
    } else {
        -(at.duration_since(now).as_nanos() as i128)
    }
}

impl<A: ActionPotential> ActionPotential for AccuracyAccumulator<A> {
    fn clock(&self) -> &dyn Clock {
        self.inner.clock()
    }

    fn potential_at(&mut self, at: Instant) -> Potential {
        self.inner.potential_at(at)
    }

    fn add_potential_at(&mut self, potential: Potential, at: Instant) -> (Potential, bool) {
        let now = self.inner.clock().now();
        let result = self.inner.add_potential_at(potential, at);
        self.total_skew_ns += signed_delta_ns(now, at);
        self.count += 1;
        result
    }
}
