// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Runtime assembly from configuration
//!
//! Turns a validated [`NeurostreamConfig`] into membrane durations, stream
//! settings and a ready-to-run activation stream, and hands out neurons
//! wired to that stream.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use neurostream_config::{
    load_config, validate_config, ActionPotentialConfig, ConfigError, NeurostreamConfig,
    StreamConfig,
};
use neurostream_neural::{
    ActionPotentialDurations, Clock, NeuralError, NeuronId, SimpleActionPotential, SystemClock,
};
use neurostream_scheduler::{
    ActivationStream, Axon, Neuron, RunMode, StreamError, StreamHandle, StreamSettings,
    StreamStats,
};
use tracing::info;

/// Errors raised while assembling or driving a runtime
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Neural(#[from] NeuralError),

    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Membrane durations from the `[action_potential]` section
pub fn durations_from_config(
    config: &ActionPotentialConfig,
) -> RuntimeResult<ActionPotentialDurations> {
    Ok(ActionPotentialDurations::new(
        config.decay_duration(),
        config.active_duration(),
        config.inactive_duration(),
    )?)
}

/// Stream settings from the `[stream]` section
pub fn stream_settings_from_config(config: &StreamConfig) -> StreamSettings {
    StreamSettings {
        capacity: config.capacity(),
        signal_potential: config.signal_potential,
        wake_lead: config.wake_lead(),
    }
}

/// Logging as configured by the `[logging]` section, raised per crate by
/// `debug_flags`
#[cfg(feature = "observability")]
pub fn init_logging_from_config(
    config: &NeurostreamConfig,
    debug_flags: neurostream_observability::CrateDebugFlags,
) -> RuntimeResult<neurostream_observability::LoggingGuard> {
    let level: tracing::Level = config.logging.level.parse().map_err(|_| {
        RuntimeError::Config(ConfigError::InvalidValue(format!(
            "logging.level '{}'",
            config.logging.level
        )))
    })?;
    let flags = debug_flags.with_base_level(level);
    neurostream_observability::init_logging(
        &flags,
        config.logging.log_dir().map(Path::to_path_buf),
        None,
        None,
    )
    .map_err(|e| RuntimeError::Logging(format!("{:#}", e)))
}

/// One activation stream plus the membrane parameters its neurons share.
pub struct Runtime {
    config: NeurostreamConfig,
    durations: ActionPotentialDurations,
    clock: Arc<dyn Clock>,
    stream: ActivationStream,
}

impl Runtime {
    /// Validate `config` and build a runtime on the system clock.
    pub fn from_config(config: &NeurostreamConfig) -> RuntimeResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`Runtime::from_config`], with `clock` shared by the stream and
    /// every membrane it hands out.
    pub fn with_clock(config: &NeurostreamConfig, clock: Arc<dyn Clock>) -> RuntimeResult<Self> {
        validate_config(config)?;
        let durations = durations_from_config(&config.action_potential)?;
        let settings = stream_settings_from_config(&config.stream);
        let stream = ActivationStream::with_clock(settings, clock.clone())?;

        info!(
            "[RUNTIME] Stream ready: capacity {:?}, signal {}, wake lead {:?}, durations {:?}",
            stream.settings().capacity,
            stream.settings().signal_potential,
            stream.settings().wake_lead,
            durations
        );

        Ok(Self {
            config: config.clone(),
            durations,
            clock,
            stream,
        })
    }

    /// Load, override and validate configuration, then build the runtime.
    pub fn load(
        config_path: Option<&Path>,
        cli_args: Option<&HashMap<String, String>>,
    ) -> RuntimeResult<Self> {
        let config = load_config(config_path, cli_args)?;
        Self::from_config(&config)
    }

    pub fn config(&self) -> &NeurostreamConfig {
        &self.config
    }

    pub fn durations(&self) -> &ActionPotentialDurations {
        &self.durations
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// A resting membrane with the configured durations and clock
    pub fn action_potential(&self) -> SimpleActionPotential {
        SimpleActionPotential::with_clock(self.clock.clone(), self.durations)
    }

    /// A neuron with a fresh membrane, an unconnected axon of `delay`, and
    /// this runtime's stream
    pub fn neuron(&self, id: NeuronId, delay: Duration) -> Arc<Neuron> {
        Neuron::new(id, Axon::new(delay), self.stream.handle(), self.action_potential())
    }

    pub fn handle(&self) -> StreamHandle {
        self.stream.handle()
    }

    pub fn stream(&self) -> &ActivationStream {
        &self.stream
    }

    pub fn stream_mut(&mut self) -> &mut ActivationStream {
        &mut self.stream
    }

    pub fn run(&mut self, mode: RunMode) -> StreamStats {
        self.stream.run(mode)
    }

    pub fn run_until_empty(&mut self) -> StreamStats {
        self.stream.run_until_empty()
    }

    pub fn run_until_closed(&mut self) -> StreamStats {
        self.stream.run_until_closed()
    }

    /// Close the intake; a later `run_until_closed` drains and returns.
    pub fn close(&self) {
        self.stream.handle().close();
    }
}
