// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Output wiring of a neuron

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::terminal::Terminal;

/// A fixed propagation delay and an ordered list of terminals.
///
/// Terminals can be added after construction, which is how cycles
/// (including a neuron wired to itself) are built.
pub struct Axon {
    delay: Duration,
    terminals: RwLock<Vec<Arc<dyn Terminal>>>,
}

impl Axon {
    pub fn new(delay: Duration) -> Self {
        Self::with_terminals(delay, Vec::new())
    }

    pub fn with_terminals(delay: Duration, terminals: Vec<Arc<dyn Terminal>>) -> Self {
        Self {
            delay,
            terminals: RwLock::new(terminals),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Append a terminal; delivery order follows connection order.
    pub fn connect(&self, terminal: Arc<dyn Terminal>) {
        self.terminals.write().push(terminal);
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals.read().len()
    }

    /// Snapshot of the current terminals, so delivery never holds the lock.
    pub fn terminals(&self) -> Vec<Arc<dyn Terminal>> {
        self.terminals.read().clone()
    }
}

impl Default for Axon {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl fmt::Debug for Axon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Axon")
            .field("delay", &self.delay)
            .field("terminals", &self.terminal_count())
            .finish()
    }
}
