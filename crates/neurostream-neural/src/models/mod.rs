// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Action Potential Models
//!
//! `ActionPotential` is the capability every membrane model and every
//! wrapper implements. The scheduler only ever talks to this trait.
//!
//! ## Adding a New Model
//!
//! 1. Create `src/models/your_model.rs`
//! 2. Implement `ActionPotential`
//! 3. Add tests
//! 4. Export in `mod.rs`

pub mod simple;
pub mod traits;

pub use simple::{ActionPotentialDurations, SimpleActionPotential};
pub use traits::ActionPotential;
