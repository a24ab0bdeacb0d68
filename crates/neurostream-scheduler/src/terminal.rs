// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Things an axon can deliver to

use std::time::Instant;

use neurostream_neural::{ActionPotential, Potential};
use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;

/// Receiver of potential at the end of an axon.
///
/// Called from the scheduler's consumer thread with the logical due time.
pub trait Terminal: Send + Sync {
    fn add_potential_at(&self, potential: Potential, at: Instant) -> Result<(Potential, bool)>;
}

/// A bare `ActionPotential` shared behind a lock, usable as a terminal of
/// any number of axons. Fires are reported but go nowhere.
#[derive(Debug, Default)]
pub struct SharedActionPotential<A> {
    inner: Mutex<A>,
}

impl<A: ActionPotential> SharedActionPotential<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, A> {
        self.inner.lock()
    }

    pub fn into_inner(self) -> A {
        self.inner.into_inner()
    }
}

impl<A: ActionPotential> Terminal for SharedActionPotential<A> {
    fn add_potential_at(&self, potential: Potential, at: Instant) -> Result<(Potential, bool)> {
        Ok(self.inner.lock().add_potential_at(potential, at))
    }
}
