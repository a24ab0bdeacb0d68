// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # neurostream-observability
//!
//! Logging setup shared by every neurostream binary and test harness, with
//! per-crate debug flag support.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known neurostream crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "neurostream",
    "neurostream-neural",
    "neurostream-scheduler",
    "neurostream-config",
    "neurostream-observability",
];
