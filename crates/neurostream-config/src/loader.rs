// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones winning:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, NeurostreamConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "neurostream.toml";

/// Environment variable naming an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "NEUROSTREAM_CONFIG_PATH";

/// Find the configuration file
///
/// Search order:
/// 1. `NEUROSTREAM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./neurostream.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_ENV,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        search_paths.extend(
            cwd.ancestors()
                .skip(1)
                .take(5)
                .map(|dir| dir.join(CONFIG_FILE_NAME)),
        );
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_ENV
    )))
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the config file is not found or contains invalid TOML.
/// Values are not validated here; see [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<NeurostreamConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: NeurostreamConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Overwrite `target` if `value` parses; unparsable overrides are ignored.
fn set_parsed<T: FromStr>(target: &mut T, value: &str) {
    if let Ok(parsed) = value.trim().parse::<T>() {
        *target = parsed;
    }
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `NEUROSTREAM_DECAY_DURATION_US` -> `action_potential.decay_duration_us`
/// - `NEUROSTREAM_ACTIVE_DURATION_US` -> `action_potential.active_duration_us`
/// - `NEUROSTREAM_INACTIVE_DURATION_US` -> `action_potential.inactive_duration_us`
/// - `NEUROSTREAM_INTAKE_CAPACITY` -> `stream.intake_capacity`
/// - `NEUROSTREAM_SIGNAL_POTENTIAL` -> `stream.signal_potential`
/// - `NEUROSTREAM_WAKE_LEAD_US` -> `stream.wake_lead_us`
/// - `NEUROSTREAM_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut NeurostreamConfig) {
    let overrides: HashMap<String, String> = OVERRIDE_KEYS
        .iter()
        .filter_map(|key| {
            let var = format!("NEUROSTREAM_{}", key.to_uppercase());
            env::var(var).ok().map(|value| (key.to_string(), value))
        })
        .collect();
    apply_overrides(config, &overrides);
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - Same keys as the environment variables, lower-case without
///   the prefix (e.g., `{"signal_potential": "7.5", "log_level": "debug"}`)
pub fn apply_cli_overrides(config: &mut NeurostreamConfig, cli_args: &HashMap<String, String>) {
    apply_overrides(config, cli_args);
}

const OVERRIDE_KEYS: [&str; 7] = [
    "decay_duration_us",
    "active_duration_us",
    "inactive_duration_us",
    "intake_capacity",
    "signal_potential",
    "wake_lead_us",
    "log_level",
];

fn apply_overrides(config: &mut NeurostreamConfig, values: &HashMap<String, String>) {
    for (key, value) in values {
        match key.as_str() {
            "decay_duration_us" => {
                set_parsed(&mut config.action_potential.decay_duration_us, value)
            }
            "active_duration_us" => {
                set_parsed(&mut config.action_potential.active_duration_us, value)
            }
            "inactive_duration_us" => {
                set_parsed(&mut config.action_potential.inactive_duration_us, value)
            }
            "intake_capacity" => set_parsed(&mut config.stream.intake_capacity, value),
            "signal_potential" => set_parsed(&mut config.stream.signal_potential, value),
            "wake_lead_us" => set_parsed(&mut config.stream.wake_lead_us, value),
            "log_level" => config.logging.level = value.clone(),
            _ => {}
        }
    }
}
