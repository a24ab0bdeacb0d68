// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Activation stream statistics

use std::time::Duration;

use ahash::AHashMap;
use neurostream_neural::NeuronId;
use serde::Serialize;

/// Counters kept by the consumer while a stream runs.
///
/// Lateness is wall-clock delivery time minus logical due time. It is an
/// accuracy measurement, not a correctness signal: terminals always see
/// the logical time.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StreamStats {
    pub activations_received: u64,
    pub terminal_events_delivered: u64,
    pub terminal_signals_sent: u64,
    /// Cascaded activations lost to a full intake
    pub activations_dropped: u64,
    pub delivery_failures: u64,
    pub peak_queue_depth: usize,
    pub total_lateness_ns: u64,
    /// Delivered terminal events per firing neuron
    pub deliveries_by_neuron: AHashMap<NeuronId, u64>,
}

impl StreamStats {
    pub(crate) fn record_delivery(
        &mut self,
        neuron: NeuronId,
        terminals: usize,
        lateness: Duration,
    ) {
        self.terminal_events_delivered += 1;
        self.terminal_signals_sent += terminals as u64;
        self.total_lateness_ns = self
            .total_lateness_ns
            .saturating_add(lateness.as_nanos().min(u64::MAX as u128) as u64);
        *self.deliveries_by_neuron.entry(neuron).or_insert(0) += 1;
    }

    /// Get average lateness per delivered terminal event
    pub fn avg_lateness(&self) -> Duration {
        if self.terminal_events_delivered == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_lateness_ns / self.terminal_events_delivered)
        }
    }

    /// Get average terminals reached per delivered event
    pub fn avg_signals_per_event(&self) -> f64 {
        if self.terminal_events_delivered == 0 {
            0.0
        } else {
            self.terminal_signals_sent as f64 / self.terminal_events_delivered as f64
        }
    }
}
