// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Action Potential Wrappers
//!
//! Each wrapper owns another `ActionPotential`, forwards every call to it
//! and adds its own bookkeeping around `add_potential_at`. Wrappers are
//! themselves `ActionPotential`s, so they nest:
//!
//! ```rust
//! use neurostream_neural::{
//!     AccuracyAccumulator, AlwaysFirer, EventRecorder, SimpleActionPotential,
//! };
//!
//! let ap = AccuracyAccumulator::new(EventRecorder::new(AlwaysFirer::new(
//!     SimpleActionPotential::new(),
//! )));
//! assert_eq!(ap.count(), 0);
//! ```

pub mod accuracy;
pub mod always_firer;
pub mod recorder;

pub use accuracy::AccuracyAccumulator;
pub use always_firer::AlwaysFirer;
pub use recorder::{AddPotentialEvent, EventRecorder};
