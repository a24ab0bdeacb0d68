// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Activation stream: concurrent intake, ordered queue, run loop.

Producers hold cloned `StreamHandle`s and send activation events from any
thread. Whoever runs the stream is its only consumer; it owns the ordered
queue and the wake timer, so neither needs a lock.

Closing rejects further sends from producers, but not from the consumer
thread: activations cascading out of deliveries keep flowing until the
queue drains.

Run loop:
1. Pull everything already buffered in the intake into the queue
2. Deliver every queued event that is due, pulling new intake after each
   delivery so cascades are ordered with everything else
3. Stop if the termination condition holds
4. Block until the intake receives or the head's timer expires
*/

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};
use neurostream_neural::{Clock, Potential, SystemClock};
use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, trace, warn};

use crate::error::{Result, StreamError};
use crate::event::{ActivationEvent, TerminalEvent};
use crate::queue::TerminalQueue;
use crate::stats::StreamStats;

/// Potential delivered to every terminal of an axon.
pub const DEFAULT_SIGNAL_POTENTIAL: Potential = 5.0;

enum StreamMessage {
    Activation(ActivationEvent),
    Close,
}

/// Tuning for an [`ActivationStream`].
#[derive(Debug, Clone, PartialEq)]
pub struct StreamSettings {
    /// Intake capacity; `None` for unbounded.
    pub capacity: Option<usize>,
    /// Applied identically to each terminal, never divided among them.
    pub signal_potential: Potential,
    /// Deliver events up to this long before their due time to absorb
    /// timer latency. Terminals still see the logical due time.
    pub wake_lead: Duration,
}

impl StreamSettings {
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            capacity: None,
            signal_potential: DEFAULT_SIGNAL_POTENTIAL,
            wake_lead: Duration::ZERO,
        }
    }
}

/// Termination condition of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Until the intake is closed and the queue has drained.
    UntilClosed,
    /// Until the queue is empty, leaving the intake open.
    UntilEmpty,
}

struct StreamShared {
    closed: AtomicBool,
    // Producers hold it shared from the closed check to the enqueue; close
    // takes it exclusively
    gate: RwLock<()>,
    consumer: Mutex<Option<ThreadId>>,
}

impl StreamShared {
    fn is_consumer_thread(&self) -> bool {
        *self.consumer.lock() == Some(thread::current().id())
    }
}

/// Producer side of an activation stream. Cheap to clone.
#[derive(Clone)]
pub struct StreamHandle {
    sender: Sender<StreamMessage>,
    shared: Arc<StreamShared>,
}

impl StreamHandle {
    /// Queue an activation event.
    ///
    /// Blocks while a bounded intake is full, except on the thread that is
    /// running the stream: there the event is dropped with
    /// `SchedulerBackpressure`, since waiting on itself would never end.
    /// The running thread may still send after the stream is closed.
    pub fn send(&self, event: ActivationEvent) -> Result<()> {
        if self.shared.is_consumer_thread() {
            return self.send_cascade(event);
        }

        let _gate = self.shared.gate.read();
        if self.is_closed() {
            return Err(StreamError::StreamClosed);
        }
        self.sender
            .send(StreamMessage::Activation(event))
            .map_err(|_| StreamError::StreamClosed)
    }

    fn send_cascade(&self, event: ActivationEvent) -> Result<()> {
        let neuron = event.neuron.id();
        match self.sender.try_send(StreamMessage::Activation(event)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(
                    "[ACTIVATION-STREAM] Intake full, dropping cascaded activation of {}",
                    neuron
                );
                Err(StreamError::SchedulerBackpressure { neuron })
            }
            Err(TrySendError::Disconnected(_)) => Err(StreamError::StreamClosed),
        }
    }

    /// Declare that no more events will be sent. Events already sent are
    /// still delivered.
    ///
    /// Waits for sends already past their closed check, so every send that
    /// returned `Ok` is in the intake before the stream counts as closed.
    /// Close from outside the running thread when the intake is bounded: a
    /// producer blocked on a full intake holds the gate until the consumer
    /// makes room.
    pub fn close(&self) {
        {
            let _gate = self.shared.gate.write();
            if self.shared.closed.swap(true, Ordering::AcqRel) {
                return;
            }
        }
        // Only a wake-up; a full intake is drained first and the consumer
        // checks the flag once it is empty
        let _ = self.sender.try_send(StreamMessage::Close);
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Events waiting in the intake.
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.sender.capacity()
    }
}

impl fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamHandle")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Marks the running thread as the consumer for the duration of a run.
struct ConsumerGuard<'a> {
    shared: &'a StreamShared,
}

impl<'a> ConsumerGuard<'a> {
    fn register(shared: &'a StreamShared) -> Self {
        *shared.consumer.lock() = Some(thread::current().id());
        Self { shared }
    }
}

impl Drop for ConsumerGuard<'_> {
    fn drop(&mut self) {
        *self.shared.consumer.lock() = None;
    }
}

/// Consumer side: the ordered queue and the run loop.
pub struct ActivationStream {
    receiver: Receiver<StreamMessage>,
    handle: StreamHandle,
    settings: StreamSettings,
    clock: Arc<dyn Clock>,
    queue: TerminalQueue,
    intake_open: bool,
    stats: StreamStats,
}

impl ActivationStream {
    pub fn new(settings: StreamSettings) -> Result<Self> {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    /// Stream whose notion of "now" comes from `clock`. Timers still sleep
    /// in real time, so a manual clock must be moved past pending due
    /// times for them to be delivered.
    pub fn with_clock(settings: StreamSettings, clock: Arc<dyn Clock>) -> Result<Self> {
        let (sender, receiver) = match settings.capacity {
            Some(0) => return Err(StreamError::InvalidCapacity(0)),
            Some(capacity) => channel::bounded(capacity),
            None => channel::unbounded(),
        };
        let shared = Arc::new(StreamShared {
            closed: AtomicBool::new(false),
            gate: RwLock::new(()),
            consumer: Mutex::new(None),
        });

        Ok(Self {
            receiver,
            handle: StreamHandle { sender, shared },
            settings,
            clock,
            queue: TerminalQueue::new(),
            intake_open: true,
            stats: StreamStats::default(),
        })
    }

    /// A new producer handle.
    pub fn handle(&self) -> StreamHandle {
        self.handle.clone()
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Terminal events waiting for their due time.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Process events until the intake is closed and every queued
    /// delivery has been made.
    pub fn run_until_closed(&mut self) -> StreamStats {
        self.run(RunMode::UntilClosed)
    }

    /// Process events until nothing is queued. Does not require, or cause,
    /// the intake to close.
    pub fn run_until_empty(&mut self) -> StreamStats {
        self.run(RunMode::UntilEmpty)
    }

    pub fn run(&mut self, mode: RunMode) -> StreamStats {
        let shared = Arc::clone(&self.handle.shared);
        let _consumer = ConsumerGuard::register(&shared);
        info!("[ACTIVATION-STREAM] Starting ({:?})", mode);

        let idle = channel::never::<StreamMessage>();
        self.pull_intake();

        loop {
            self.deliver_due();

            if self.queue.is_empty() && (mode == RunMode::UntilEmpty || !self.intake_open) {
                break;
            }

            let timer = match self.time_until_next() {
                Some(wait) => channel::after(wait),
                None => channel::never(),
            };
            let intake = if self.intake_open {
                self.receiver.clone()
            } else {
                idle.clone()
            };

            crossbeam::select! {
                recv(intake) -> message => {
                    match message {
                        Ok(message) => self.accept(message),
                        Err(_) => self.intake_open = false,
                    }
                    self.pull_intake();
                }
                recv(timer) -> _ => {}
            }
        }

        info!(
            "[ACTIVATION-STREAM] Stopped ({:?}): {} activations, {} deliveries, avg lateness {:?}",
            mode,
            self.stats.activations_received,
            self.stats.terminal_events_delivered,
            self.stats.avg_lateness()
        );
        self.stats.clone()
    }

    /// Move every buffered intake message into the queue without blocking.
    /// Keeps draining past a close marker: cascades sent by this thread and
    /// activations racing the marker are still accepted.
    fn pull_intake(&mut self) {
        loop {
            match self.receiver.try_recv() {
                Ok(message) => self.accept(message),
                Err(TryRecvError::Empty) => {
                    if self.handle.is_closed() {
                        self.intake_open = false;
                    }
                    return;
                }
                Err(TryRecvError::Disconnected) => {
                    self.intake_open = false;
                    return;
                }
            }
        }
    }

    fn accept(&mut self, message: StreamMessage) {
        match message {
            StreamMessage::Activation(event) => {
                let terminal_event = event.terminal_event();
                debug!(
                    "[ACTIVATION-STREAM] Queued {} (delay {:?})",
                    terminal_event.neuron.id(),
                    terminal_event.neuron.axon().delay()
                );
                self.queue.push(terminal_event);
                self.stats.activations_received += 1;
                self.stats.peak_queue_depth = self.stats.peak_queue_depth.max(self.queue.len());
            }
            StreamMessage::Close => {
                debug!("[ACTIVATION-STREAM] Intake closed");
                self.intake_open = false;
            }
        }
    }

    fn deliver_due(&mut self) {
        loop {
            let horizon = self.clock.now() + self.settings.wake_lead;
            match self.queue.pop_due(horizon) {
                Some(event) => {
                    self.deliver(event);
                    self.pull_intake();
                }
                None => return,
            }
        }
    }

    fn deliver(&mut self, event: TerminalEvent) {
        let terminals = event.neuron.axon().terminals();
        let lateness = self.clock.now().saturating_duration_since(event.due);
        let neuron = event.neuron.id();
        self.stats.record_delivery(neuron, terminals.len(), lateness);

        for terminal in terminals {
            trace!("[ACTIVATION-STREAM] {} -> terminal at {:?}", neuron, event.due);
            match terminal.add_potential_at(self.settings.signal_potential, event.due) {
                Ok(_) => {}
                Err(StreamError::SchedulerBackpressure { neuron: dropped }) => {
                    self.stats.activations_dropped += 1;
                    self.stats.delivery_failures += 1;
                    warn!(
                        "[ACTIVATION-STREAM] Delivery from {} fired {} but the intake was full",
                        neuron, dropped
                    );
                }
                Err(e) => {
                    self.stats.delivery_failures += 1;
                    warn!("[ACTIVATION-STREAM] Delivery from {} failed: {}", neuron, e);
                }
            }
        }
    }

    fn time_until_next(&self) -> Option<Duration> {
        let due = self.queue.next_due()?;
        let wake = wake_instant(due, self.settings.wake_lead);
        Some(wake.saturating_duration_since(self.clock.now()))
    }

    #[cfg(test)]
    pub(crate) fn pending_activations(&self) -> Vec<ActivationEvent> {
        self.receiver
            .try_iter()
            .filter_map(|message| match message {
                StreamMessage::Activation(event) => Some(event),
                StreamMessage::Close => None,
            })
            .collect()
    }
}

impl fmt::Debug for ActivationStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActivationStream")
            .field("settings", &self.settings)
            .field("queued", &self.queue.len())
            .field("intake_open", &self.intake_open)
            .finish()
    }
}

/// Instant the timer for `due` should fire, given a lead.
fn wake_instant(due: Instant, lead: Duration) -> Instant {
    due.checked_sub(lead).unwrap_or(due)
}
