// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Every violation is collected before reporting, so one pass shows all of them.

use crate::{ConfigError, ConfigResult, NeurostreamConfig};

/// Log levels accepted by `logging.level`
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    ZeroDuration { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroDuration { field } => {
                write!(f, "{} must be greater than zero", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// Checks for:
/// - Non-zero membrane phase durations
/// - A finite signal potential
/// - A known log level
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation
pub fn validate_config(config: &NeurostreamConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    validate_durations(config, &mut errors);
    validate_stream(config, &mut errors);
    validate_logging(config, &mut errors);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

fn validate_durations(config: &NeurostreamConfig, errors: &mut Vec<ConfigValidationError>) {
    let ap = &config.action_potential;
    for (field, value) in [
        ("action_potential.decay_duration_us", ap.decay_duration_us),
        ("action_potential.active_duration_us", ap.active_duration_us),
        ("action_potential.inactive_duration_us", ap.inactive_duration_us),
    ] {
        if value == 0 {
            errors.push(ConfigValidationError::ZeroDuration {
                field: field.to_string(),
            });
        }
    }
}

fn validate_stream(config: &NeurostreamConfig, errors: &mut Vec<ConfigValidationError>) {
    if !config.stream.signal_potential.is_finite() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "stream.signal_potential".to_string(),
            reason: format!("must be finite, got {}", config.stream.signal_potential),
        });
    }
}

fn validate_logging(config: &NeurostreamConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
}
