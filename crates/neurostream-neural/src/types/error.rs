// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neural state machine construction

use std::time::Duration;

/// Errors raised while building a state machine.
///
/// Runtime operations on an already-built machine are total; additions
/// during the Activated or Inactivated phase are ignored, not rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NeuralError {
    #[error("Invalid duration for {name}: {value:?} (must be greater than zero)")]
    InvalidDuration { name: &'static str, value: Duration },
}

pub type Result<T> = core::result::Result<T, NeuralError>;
