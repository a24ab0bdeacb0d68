// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! # Neurostream Scheduler
//!
//! Delivers the effects of firing neurons in logical time order.
//!
//! ## Data Flow
//! ```text
//! Neuron::add_potential_at ──fired──▶ ActivationEvent(t, neuron)
//!        ▲                                   │ StreamHandle (many producers)
//!        │                                   ▼
//!   Terminal::add_potential_at      ActivationStream (single consumer)
//!        ▲                                   │ due = t + axon.delay
//!        │                                   ▼
//!        └──────── at due ─────────── TerminalQueue (ascending due, FIFO ties)
//! ```
//!
//! ## Architecture
//! - The intake is the only thread-safe boundary (crossbeam channel)
//! - The ordered queue and timer belong to whoever runs the stream
//! - Deliveries carry the logical due time, never the wall-clock time

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod axon;
pub mod error;
pub mod event;
pub mod neuron;
pub mod queue;
pub mod stats;
pub mod stream;
pub mod terminal;

pub use axon::Axon;
pub use error::{Result, StreamError};
pub use event::{ActivationEvent, TerminalEvent};
pub use neuron::Neuron;
pub use queue::TerminalQueue;
pub use stats::StreamStats;
pub use stream::{
    ActivationStream, RunMode, StreamHandle, StreamSettings, DEFAULT_SIGNAL_POTENTIAL,
};
pub use terminal::{SharedActionPotential, Terminal};
