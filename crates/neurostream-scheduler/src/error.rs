// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for the activation stream

use neurostream_neural::{NeuralError, NeuronId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    /// A neuron fired on the consumer thread while the bounded intake was
    /// full. Blocking here would deadlock the scheduler, so the activation
    /// is dropped instead.
    #[error("Scheduler backpressure: activation of {neuron} dropped, intake is full")]
    SchedulerBackpressure { neuron: NeuronId },

    #[error("Activation stream is closed")]
    StreamClosed,

    #[error("Invalid intake capacity: {0} (use an unbounded intake instead of zero)")]
    InvalidCapacity(usize),

    #[error(transparent)]
    Neural(#[from] NeuralError),
}

pub type Result<T> = core::result::Result<T, StreamError>;
