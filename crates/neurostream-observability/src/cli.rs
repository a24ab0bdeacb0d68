// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! CLI argument parsing for per-crate debug flags
//!
//! Supports flags like `--debug-neurostream-scheduler` to raise one crate to
//! debug level while the rest stay at the base level.

use std::collections::HashMap;
use std::env;

use tracing::Level;

use crate::KNOWN_CRATES;

/// Environment variable listing crates to debug (comma-separated, or `all`)
pub const DEBUG_ENV: &str = "NEUROSTREAM_DEBUG";

/// Parse debug flags from command-line arguments
///
/// # Example
/// ```rust
/// use neurostream_observability::CrateDebugFlags;
///
/// let flags = CrateDebugFlags::from_args(std::env::args());
/// if flags.is_enabled("neurostream-scheduler") {
///     // Scheduler events at debug level
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrateDebugFlags {
    pub enabled_crates: HashMap<String, bool>,
    /// Level for everything not enabled above; `INFO` when unset
    pub base_level: Option<Level>,
}

impl CrateDebugFlags {
    /// Parse debug flags from command-line arguments
    ///
    /// Looks for arguments matching `--debug-{crate-name}` pattern.
    /// Also supports `--debug-all` to enable all crates.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut flags = CrateDebugFlags::default();

        for arg in args {
            if arg == "--debug-all" {
                flags.enable_all();
            } else if let Some(crate_name) = arg.strip_prefix("--debug-") {
                flags.enable(crate_name);
            }
        }

        flags
    }

    pub fn with_base_level(mut self, level: Level) -> Self {
        self.base_level = Some(level);
        self
    }

    pub fn enable(&mut self, crate_name: &str) {
        self.enabled_crates.insert(crate_name.to_string(), true);
    }

    pub fn enable_all(&mut self) {
        for crate_name in KNOWN_CRATES {
            self.enable(crate_name);
        }
    }

    /// Check if debug is enabled for a specific crate
    pub fn is_enabled(&self, crate_name: &str) -> bool {
        self.enabled_crates.contains_key(crate_name)
    }

    /// Check if debug is enabled for any crate
    pub fn any_enabled(&self) -> bool {
        !self.enabled_crates.is_empty()
    }

    /// `DEBUG` if enabled for the crate, the base level otherwise.
    pub fn log_level(&self, crate_name: &str) -> Level {
        if self.is_enabled(crate_name) {
            Level::DEBUG
        } else {
            self.base_level()
        }
    }

    pub fn base_level(&self) -> Level {
        self.base_level.unwrap_or(Level::INFO)
    }

    /// Create a tracing filter from debug flags
    ///
    /// Crate names become tracing targets (`-` replaced by `_`), e.g.
    /// `"neurostream_scheduler=debug,info"`, or just the base level if none
    /// are enabled.
    pub fn to_filter_string(&self) -> String {
        let base = self.base_level().to_string().to_lowercase();
        let mut targets: Vec<String> = self
            .enabled_crates
            .keys()
            .map(|crate_name| format!("{}=debug", crate_name.replace('-', "_")))
            .collect();
        targets.sort();
        targets.push(base);
        targets.join(",")
    }
}

/// Parse debug flags from command-line arguments and `NEUROSTREAM_DEBUG`
///
/// Environment variable format: comma-separated crate names, e.g.
/// "neurostream-scheduler,neurostream-neural", or `all`.
pub fn parse_debug_flags() -> CrateDebugFlags {
    let mut flags = CrateDebugFlags::from_args(env::args());
    if let Ok(value) = env::var(DEBUG_ENV) {
        apply_debug_env(&mut flags, &value);
    }
    flags
}

fn apply_debug_env(flags: &mut CrateDebugFlags, value: &str) {
    if value.trim() == "all" {
        flags.enable_all();
        return;
    }
    for crate_name in value.split(',') {
        let crate_name = crate_name.trim();
        if !crate_name.is_empty() {
            flags.enable(crate_name);
        }
    }
}

/// Generate help text for debug flags
pub fn debug_flags_help() -> String {
    format!(
        r#"Debug Flags:
  --debug-all                    Enable debug logging for all crates
  --debug-{{crate-name}}          Enable debug logging for specific crate

Available crates:
  {}

Environment Variable:
  {env}={{crate-name}}[,{{crate-name}}]  Enable debug for crates (comma-separated)
  {env}=all                               Enable debug for all crates

Examples:
  --debug-neurostream-scheduler
  {env}=neurostream-scheduler,neurostream-neural
"#,
        KNOWN_CRATES.join(", "),
        env = DEBUG_ENV
    )
}
