// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neurostream - event-driven spiking neurons over wall-clock time
//!
//! Neurons hold a lazily evaluated membrane potential. When one fires, the
//! activation travels down its axon and reaches every terminal after the
//! axon's delay, in logical time order across the whole network.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use neurostream::prelude::*;
//!
//! let config = NeurostreamConfig::default();
//! let mut runtime = Runtime::from_config(&config)?;
//!
//! let target = runtime.neuron(NeuronId(2), Duration::ZERO);
//! let source = runtime.neuron(NeuronId(1), Duration::from_millis(1));
//! source.axon().connect(target.clone());
//!
//! source.add_potential(20.0)?;           // fires
//! let stats = runtime.run_until_empty(); // delivers 5.0 to the target 1ms later
//! assert_eq!(stats.terminal_events_delivered, 1);
//! assert_eq!(stats.terminal_signals_sent, 1);
//! # Ok::<(), neurostream::RuntimeError>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: neurostream-config, -observability         │
//! │  (TOML + overrides, logging setup)                      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Membrane: neurostream-neural                           │
//! │  (Potential state machine, Clock, wrappers; no I/O)     │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Delivery: neurostream-scheduler                        │
//! │  (Neuron, Axon, ActivationStream)                       │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use neurostream_config as config;
pub use neurostream_neural as neural;
pub use neurostream_scheduler as scheduler;

#[cfg(feature = "observability")]
pub use neurostream_observability as observability;

pub mod runtime;

pub use runtime::{
    durations_from_config, stream_settings_from_config, Runtime, RuntimeError, RuntimeResult,
};

#[cfg(feature = "observability")]
pub use runtime::init_logging_from_config;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config, validate_config, NeurostreamConfig};
    pub use crate::neural::{
        AccuracyAccumulator, ActionPotential, ActionPotentialDurations, ActivationState,
        AlwaysFirer, Clock, EventRecorder, ManualClock, NeuronId, Potential, SimpleActionPotential,
        SystemClock, PEAK_POTENTIAL, REFRACTORY_POTENTIAL, REST_POTENTIAL, THRESHOLD_POTENTIAL,
    };
    pub use crate::runtime::{Runtime, RuntimeError};
    pub use crate::scheduler::{
        ActivationEvent, ActivationStream, Axon, Neuron, RunMode, SharedActionPotential,
        StreamHandle, StreamSettings, StreamStats, Terminal,
    };
}
