// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to one section of `neurostream.toml`. Every section and
//! field is optional in the file; missing values take the defaults below.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeurostreamConfig {
    pub action_potential: ActionPotentialConfig,
    pub stream: StreamConfig,
    pub logging: LoggingConfig,
}

/// Membrane phase durations, in microseconds
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ActionPotentialConfig {
    /// Deactivated potential snaps back to rest after this long untouched
    pub decay_duration_us: u64,
    pub active_duration_us: u64,
    pub inactive_duration_us: u64,
}

impl ActionPotentialConfig {
    pub fn decay_duration(&self) -> Duration {
        Duration::from_micros(self.decay_duration_us)
    }

    pub fn active_duration(&self) -> Duration {
        Duration::from_micros(self.active_duration_us)
    }

    pub fn inactive_duration(&self) -> Duration {
        Duration::from_micros(self.inactive_duration_us)
    }
}

impl Default for ActionPotentialConfig {
    fn default() -> Self {
        Self {
            decay_duration_us: 3_000,
            active_duration_us: 3_000,
            inactive_duration_us: 3_000,
        }
    }
}

/// Activation stream settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct StreamConfig {
    /// 0 = unbounded
    pub intake_capacity: usize,
    pub signal_potential: f32,
    pub wake_lead_us: u64,
}

impl StreamConfig {
    pub fn capacity(&self) -> Option<usize> {
        (self.intake_capacity > 0).then_some(self.intake_capacity)
    }

    pub fn wake_lead(&self) -> Duration {
        Duration::from_micros(self.wake_lead_us)
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            intake_capacity: 0,
            signal_potential: 5.0,
            wake_lead_us: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Empty = console only
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    pub fn log_dir(&self) -> Option<&std::path::Path> {
        (!self.log_dir.as_os_str().is_empty()).then_some(self.log_dir.as_path())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: PathBuf::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config: NeurostreamConfig = toml::from_str("").unwrap();
        assert_eq!(config, NeurostreamConfig::default());
        assert_eq!(config.action_potential.decay_duration(), Duration::from_millis(3));
        assert_eq!(config.stream.capacity(), None);
        assert_eq!(config.logging.log_dir(), None);
    }

    #[test]
    fn test_partial_sections() {
        let config: NeurostreamConfig = toml::from_str(
            r#"
            [action_potential]
            active_duration_us = 1500

            [stream]
            intake_capacity = 256
            wake_lead_us = 130

            [logging]
            log_dir = "/tmp/neurostream"
            "#,
        )
        .unwrap();

        assert_eq!(config.action_potential.active_duration(), Duration::from_micros(1500));
        assert_eq!(config.action_potential.inactive_duration_us, 3_000);
        assert_eq!(config.stream.capacity(), Some(256));
        assert_eq!(config.stream.wake_lead(), Duration::from_micros(130));
        assert_eq!(config.stream.signal_potential, 5.0);
        assert_eq!(config.logging.level, "info");
        assert_eq!(
            config.logging.log_dir(),
            Some(std::path::Path::new("/tmp/neurostream"))
        );
    }

    #[test]
    fn test_serialize_json() {
        let json = serde_json::to_value(NeurostreamConfig::default()).unwrap();
        assert_eq!(json["stream"]["signal_potential"], 5.0);
        assert_eq!(json["action_potential"]["decay_duration_us"], 3000);
    }
}
