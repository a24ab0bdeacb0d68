// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Recording of every addition for later inspection

use std::time::Instant;

use crate::clock::Clock;
use crate::models::ActionPotential;
use crate::types::Potential;

/// One observed `add_potential_at` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddPotentialEvent {
    pub potential: Potential,
    /// Logical instant passed by the caller
    pub time: Instant,
    /// Clock instant when the call was observed
    pub real_time: Instant,
}

/// Records each addition before delegating it.
#[derive(Debug)]
pub struct EventRecorder<A> {
    inner: A,
    events: Vec<AddPotentialEvent>,
}

impl<A: ActionPotential> EventRecorder<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            events: Vec::with_capacity(10),
        }
    }

    pub fn events(&self) -> &[AddPotentialEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<AddPotentialEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    pub fn into_inner(self) -> A {
        self.inner
    }
}

impl<A: ActionPotential> ActionPotential for EventRecorder<A> {
    fn clock(&self) -> &dyn Clock {
        self.inner.clock()
    }

    fn potential_at(&mut self, at: Instant) -> Potential {
        self.inner.potential_at(at)
    }

    fn add_potential_at(&mut self, potential: Potential, at: Instant) -> (Potential, bool) {
        self.events.push(AddPotentialEvent {
            potential,
            time: at,
            real_time: self.inner.clock().now(),
        });
        self.inner.add_potential_at(potential, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::{ActionPotentialDurations, SimpleActionPotential};
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_records_each_addition() {
        let start = Instant::now();
        let clock = ManualClock::new(start);
        let mut recorder = EventRecorder::new(SimpleActionPotential::with_clock(
            Arc::new(clock.clone()),
            ActionPotentialDurations::default(),
        ));

        let at = start + Duration::from_micros(5);
        clock.set(start + Duration::from_micros(7));
        assert_eq!(recorder.add_potential_at(3.0, at), (3.0, false));
        clock.advance(Duration::from_micros(1));
        assert_eq!(recorder.add_potential(4.0), (7.0, false));

        let events = recorder.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            AddPotentialEvent {
                potential: 3.0,
                time: at,
                real_time: start + Duration::from_micros(7),
            }
        );
        // add_potential resolves "now" through the same clock
        assert_eq!(events[1].time, start + Duration::from_micros(8));
        assert_eq!(events[1].real_time, start + Duration::from_micros(8));
    }

    #[test]
    fn test_queries_are_not_recorded() {
        let mut recorder = EventRecorder::new(SimpleActionPotential::new());
        recorder.potential();
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_take_events_empties_the_log() {
        let mut recorder = EventRecorder::new(SimpleActionPotential::new());
        recorder.add_potential(1.0);
        assert_eq!(recorder.take_events().len(), 1);
        assert!(recorder.events().is_empty());
    }
}
