// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neurostream Neural Computation
//!
//! The per-neuron half of the simulator:
//! - **Types**: potential, activation state, neuron identity, errors
//! - **Clock**: injectable source of "now" for the non-`_at` operations
//! - **Models**: the `ActionPotential` capability and the lazy,
//!   duration-driven `SimpleActionPotential` state machine
//! - **Wrappers**: composable decorators (timing skew, event recording,
//!   forced firing) that nest around any `ActionPotential`
//!
//! Nothing in this crate schedules or logs; delivery order is the
//! scheduler's job.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clock;
pub mod models;
pub mod types;
pub mod wrappers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use models::{ActionPotential, ActionPotentialDurations, SimpleActionPotential};
pub use types::{
    ActivationState, NeuralError, NeuronId, Potential, PotentialState, Result, PEAK_POTENTIAL,
    REFRACTORY_POTENTIAL, REST_POTENTIAL, THRESHOLD_POTENTIAL,
};
pub use wrappers::{AccuracyAccumulator, AddPotentialEvent, AlwaysFirer, EventRecorder};
