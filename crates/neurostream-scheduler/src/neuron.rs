// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! A simulated cell: membrane + axon + stream handle

use std::fmt;
use std::sync::{Arc, Weak};
use std::time::Instant;

use neurostream_neural::{ActionPotential, NeuronId, Potential};
use parking_lot::Mutex;
use tracing::debug;

use crate::axon::Axon;
use crate::error::Result;
use crate::event::ActivationEvent;
use crate::stream::StreamHandle;
use crate::terminal::Terminal;

/// One neuron. Always handled through `Arc`; activation events refer to
/// it by pointer, never by copy.
pub struct Neuron {
    id: NeuronId,
    axon: Axon,
    stream: StreamHandle,
    action_potential: Mutex<Box<dyn ActionPotential>>,
    this: Weak<Neuron>,
}

impl Neuron {
    pub fn new<A>(id: NeuronId, axon: Axon, stream: StreamHandle, action_potential: A) -> Arc<Self>
    where
        A: ActionPotential + 'static,
    {
        Arc::new_cyclic(|this| Self {
            id,
            axon,
            stream,
            action_potential: Mutex::new(Box::new(action_potential)),
            this: this.clone(),
        })
    }

    pub fn id(&self) -> NeuronId {
        self.id
    }

    pub fn axon(&self) -> &Axon {
        &self.axon
    }

    pub fn stream(&self) -> &StreamHandle {
        &self.stream
    }

    pub fn potential_at(&self, at: Instant) -> Potential {
        self.action_potential.lock().potential_at(at)
    }

    pub fn potential(&self) -> Potential {
        self.action_potential.lock().potential()
    }

    /// Charge the membrane at `at`. If that fires it, an activation event
    /// stamped with `at` is sent to the stream.
    ///
    /// The membrane has already fired when a send error is returned; only
    /// the downstream delivery is lost.
    pub fn add_potential_at(&self, potential: Potential, at: Instant) -> Result<(Potential, bool)> {
        let (potential, fired) = self.action_potential.lock().add_potential_at(potential, at);
        if fired {
            debug!("[NEURON] {} fired", self.id);
            if let Some(this) = self.this.upgrade() {
                self.stream.send(ActivationEvent::new(at, this))?;
            }
        }
        Ok((potential, fired))
    }

    pub fn add_potential(&self, potential: Potential) -> Result<(Potential, bool)> {
        let now = self.action_potential.lock().clock().now();
        self.add_potential_at(potential, now)
    }

    /// Run `f` against the membrane while holding its lock.
    pub fn with_action_potential<R>(&self, f: impl FnOnce(&mut dyn ActionPotential) -> R) -> R {
        let mut guard = self.action_potential.lock();
        f(guard.as_mut())
    }
}

impl Terminal for Neuron {
    fn add_potential_at(&self, potential: Potential, at: Instant) -> Result<(Potential, bool)> {
        Neuron::add_potential_at(self, potential, at)
    }
}

impl fmt::Debug for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Neuron")
            .field("id", &self.id)
            .field("axon", &self.axon)
            .finish()
    }
}
