// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Value types shared by the state machine and the scheduler.

pub mod error;
pub mod ids;
pub mod potential;

pub use error::{NeuralError, Result};
pub use ids::NeuronId;
pub use potential::{
    ActivationState, Potential, PotentialState, PEAK_POTENTIAL, REFRACTORY_POTENTIAL,
    REST_POTENTIAL, THRESHOLD_POTENTIAL,
};
