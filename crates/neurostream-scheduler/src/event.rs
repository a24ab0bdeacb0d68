// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Activation and terminal events

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::neuron::Neuron;

/// A neuron fired at a logical instant.
#[derive(Clone)]
pub struct ActivationEvent {
    pub time: Instant,
    pub neuron: Arc<Neuron>,
}

impl ActivationEvent {
    pub fn new(time: Instant, neuron: Arc<Neuron>) -> Self {
        Self { time, neuron }
    }

    /// When this activation reaches the neuron's axon terminals.
    pub fn terminal_event(self) -> TerminalEvent {
        let due = self.time + self.neuron.axon().delay();
        TerminalEvent {
            due,
            neuron: self.neuron,
        }
    }
}

/// A scheduled delivery to one neuron's axon terminals.
#[derive(Clone)]
pub struct TerminalEvent {
    pub due: Instant,
    pub neuron: Arc<Neuron>,
}

impl fmt::Debug for ActivationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationEvent")
            .field("time", &self.time)
            .field("neuron", &self.neuron.id())
            .finish()
    }
}

impl fmt::Debug for TerminalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalEvent")
            .field("due", &self.due)
            .field("neuron", &self.neuron.id())
            .finish()
    }
}
