// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pending terminal deliveries in due-time order

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Instant;

use crate::event::TerminalEvent;

struct Pending {
    event: TerminalEvent,
    /// Insertion counter; breaks ties so equal due times stay FIFO.
    seq: u64,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.event.due == other.event.due && self.seq == other.seq
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap: earliest due, then earliest inserted
        other
            .event
            .due
            .cmp(&self.event.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Min-heap of terminal events keyed by `(due, insertion order)`.
///
/// Owned by the stream's consumer; never shared between threads.
#[derive(Default)]
pub struct TerminalQueue {
    heap: BinaryHeap<Pending>,
    next_seq: u64,
}

impl TerminalQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert after every queued event with the same or an earlier due time.
    pub fn push(&mut self, event: TerminalEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Pending { event, seq });
    }

    /// Due time of the head.
    pub fn next_due(&self) -> Option<Instant> {
        self.heap.peek().map(|p| p.event.due)
    }

    /// Remove the head if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<TerminalEvent> {
        if self.next_due()? <= now {
            self.heap.pop().map(|p| p.event)
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
