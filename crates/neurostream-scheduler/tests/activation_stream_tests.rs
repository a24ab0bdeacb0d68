// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end delivery through neurons, axons and the activation stream

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use neurostream_neural::{
    ActionPotentialDurations, AlwaysFirer, Clock, EventRecorder, ManualClock, NeuronId,
    Potential, SimpleActionPotential,
};
use neurostream_scheduler::{
    ActivationEvent, ActivationStream, Axon, Neuron, Result, SharedActionPotential,
    StreamSettings, Terminal,
};
use parking_lot::Mutex;

type Recorder = SharedActionPotential<EventRecorder<SimpleActionPotential>>;

fn recorder() -> Arc<Recorder> {
    Arc::new(SharedActionPotential::new(EventRecorder::new(
        SimpleActionPotential::new(),
    )))
}

fn as_terminal<T: Terminal + 'static>(t: &Arc<T>) -> Arc<dyn Terminal> {
    t.clone()
}

/// Stream on a manual clock parked far in the future: every queued event is
/// due immediately, while logical times stay exact.
fn fast_forward_stream(settings: StreamSettings) -> (Instant, ActivationStream) {
    let clock = ManualClock::default();
    let t0 = clock.now();
    clock.advance(Duration::from_secs(3600));
    let stream = ActivationStream::with_clock(settings, Arc::new(clock)).unwrap();
    (t0, stream)
}

#[test]
fn test_arbitrary_submission_order_delivered_ascending_in_real_time() {
    let mut stream = ActivationStream::new(StreamSettings::default()).unwrap();
    let target = recorder();
    let t0 = Instant::now();

    for ms in [4u64, 2, 5, 1, 3] {
        let axon = Axon::with_terminals(Duration::from_millis(ms), vec![as_terminal(&target)]);
        let neuron = Neuron::new(
            NeuronId(ms as u32),
            axon,
            stream.handle(),
            SimpleActionPotential::new(),
        );
        stream.handle().send(ActivationEvent::new(t0, neuron)).unwrap();
    }

    let stats = stream.run_until_empty();

    let events = target.lock().take_events();
    assert_eq!(events.len(), 5);
    for (i, event) in events.iter().enumerate() {
        assert_eq!(event.time, t0 + Duration::from_millis(i as u64 + 1));
        assert_eq!(event.potential, 5.0);
        assert!(event.real_time >= event.time, "delivered before due");
    }
    assert_eq!(stats.terminal_events_delivered, 5);
    assert_eq!(stats.delivery_failures, 0);
}

#[test]
fn test_chain_of_always_firing_neurons_accumulates_delay() {
    const HOPS: u64 = 8;
    let hop = Duration::from_micros(250);
    let (t0, mut stream) = fast_forward_stream(StreamSettings::default());
    let target = recorder();

    let mut next: Arc<dyn Terminal> = as_terminal(&target);
    let mut head = None;
    for id in (0..HOPS as u32).rev() {
        let neuron = Neuron::new(
            NeuronId(id),
            Axon::with_terminals(hop, vec![next]),
            stream.handle(),
            AlwaysFirer::new(SimpleActionPotential::new()),
        );
        next = as_terminal(&neuron);
        head = Some(neuron);
    }
    let head = head.unwrap();

    // The head fires at t0; each later neuron fires when its input lands
    stream.handle().send(ActivationEvent::new(t0, head)).unwrap();
    let stats = stream.run_until_empty();

    let events = target.lock().take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time, t0 + hop * HOPS as u32);
    assert_eq!(stats.activations_received, HOPS);
    assert_eq!(stats.terminal_events_delivered, HOPS);
}

/// Forwards to a neuron a limited number of times, then swallows.
struct LimitedRelay {
    target: Arc<Neuron>,
    remaining: AtomicUsize,
    seen: Mutex<Vec<Instant>>,
}

impl Terminal for LimitedRelay {
    fn add_potential_at(&self, potential: Potential, at: Instant) -> Result<(Potential, bool)> {
        self.seen.lock().push(at);
        let forward = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if forward {
            self.target.add_potential_at(potential, at)
        } else {
            Ok((potential, false))
        }
    }
}

#[test]
fn test_self_loop_refires_after_refractory() {
    let settings = StreamSettings {
        signal_potential: 20.0,
        ..StreamSettings::default()
    };
    let (t0, mut stream) = fast_forward_stream(settings);
    let delay = Duration::from_millis(7);
    let neuron = Neuron::new(
        NeuronId(1),
        Axon::new(delay),
        stream.handle(),
        SimpleActionPotential::new(),
    );
    let relay = Arc::new(LimitedRelay {
        target: neuron.clone(),
        remaining: AtomicUsize::new(3),
        seen: Mutex::new(Vec::new()),
    });
    neuron.axon().connect(as_terminal(&relay));

    stream.handle().send(ActivationEvent::new(t0, neuron.clone())).unwrap();
    let stats = stream.run_until_empty();

    let seen = relay.seen.lock().clone();
    let expected: Vec<Instant> = (1..=4).map(|k| t0 + delay * k).collect();
    assert_eq!(seen, expected);
    assert_eq!(stats.activations_received, 4);
    assert_eq!(stats.deliveries_by_neuron[&NeuronId(1)], 4);
}

#[test]
fn test_self_loop_inside_active_window_is_ignored() {
    let settings = StreamSettings {
        signal_potential: 20.0,
        ..StreamSettings::default()
    };
    let (t0, mut stream) = fast_forward_stream(settings);
    let neuron = Neuron::new(
        NeuronId(1),
        Axon::new(Duration::from_millis(1)),
        stream.handle(),
        SimpleActionPotential::new(),
    );
    neuron.axon().connect(neuron.clone());

    // Membrane fires at t0, its own signal lands 1ms later while still active
    let (_, fired) = neuron.add_potential_at(20.0, t0).unwrap();
    assert!(fired);
    let stats = stream.run_until_empty();

    assert_eq!(stats.activations_received, 1);
    assert_eq!(stats.terminal_events_delivered, 1);
}

#[test]
fn test_converging_inputs_cross_threshold_exactly_once() {
    let (t0, mut stream) = fast_forward_stream(StreamSettings::default());
    let target = recorder();
    let durations = ActionPotentialDurations::default();
    let integrator = Neuron::new(
        NeuronId(100),
        Axon::with_terminals(Duration::from_millis(1), vec![as_terminal(&target)]),
        stream.handle(),
        SimpleActionPotential::with_clock(Arc::new(ManualClock::new(t0)), durations),
    );

    // Four 5.0 inputs 500us apart sum past threshold; the fifth lands while active
    let spacing = Duration::from_micros(500);
    for k in 1..=5u32 {
        let source = Neuron::new(
            NeuronId(k),
            Axon::with_terminals(spacing * k, vec![as_terminal(&integrator)]),
            stream.handle(),
            SimpleActionPotential::new(),
        );
        stream.handle().send(ActivationEvent::new(t0, source)).unwrap();
    }

    let stats = stream.run_until_empty();

    let events = target.lock().take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time, t0 + spacing * 4 + Duration::from_millis(1));
    assert_eq!(stats.deliveries_by_neuron[&NeuronId(100)], 1);
    assert_eq!(stats.activations_received, 6);
}

#[test]
fn test_many_producers_until_closed() {
    const PRODUCERS: u32 = 4;
    const PER_PRODUCER: u32 = 50;

    let mut stream = ActivationStream::new(StreamSettings::bounded(16)).unwrap();
    let target = recorder();
    let sources: Vec<Arc<Neuron>> = (0..PRODUCERS)
        .map(|id| {
            Neuron::new(
                NeuronId(id),
                Axon::with_terminals(
                    Duration::from_micros(100 * (id as u64 + 1)),
                    vec![as_terminal(&target)],
                ),
                stream.handle(),
                SimpleActionPotential::new(),
            )
        })
        .collect();

    let producers: Vec<_> = sources
        .into_iter()
        .map(|neuron| {
            let handle = stream.handle();
            thread::spawn(move || {
                for _ in 0..PER_PRODUCER {
                    handle
                        .send(ActivationEvent::new(Instant::now(), neuron.clone()))
                        .unwrap();
                }
            })
        })
        .collect();

    let handle = stream.handle();
    let closer = thread::spawn(move || {
        for producer in producers {
            producer.join().unwrap();
        }
        handle.close();
    });

    let stats = stream.run_until_closed();
    closer.join().unwrap();

    assert_eq!(stats.activations_received, (PRODUCERS * PER_PRODUCER) as u64);
    assert_eq!(target.lock().events().len(), (PRODUCERS * PER_PRODUCER) as usize);
    for id in 0..PRODUCERS {
        assert_eq!(stats.deliveries_by_neuron[&NeuronId(id)], PER_PRODUCER as u64);
    }
}

#[test]
fn test_close_racing_producers_keeps_every_accepted_activation() {
    const PRODUCERS: u32 = 4;

    let mut stream = ActivationStream::new(StreamSettings::bounded(8)).unwrap();
    let producers: Vec<_> = (0..PRODUCERS)
        .map(|id| {
            let neuron = Neuron::new(
                NeuronId(id),
                Axon::default(),
                stream.handle(),
                SimpleActionPotential::new(),
            );
            let handle = stream.handle();
            thread::spawn(move || {
                let mut accepted = 0u64;
                while handle
                    .send(ActivationEvent::new(Instant::now(), neuron.clone()))
                    .is_ok()
                {
                    accepted += 1;
                }
                accepted
            })
        })
        .collect();

    let handle = stream.handle();
    let closer = thread::spawn(move || {
        thread::sleep(Duration::from_millis(5));
        handle.close();
    });

    let stats = stream.run_until_closed();
    closer.join().unwrap();
    let accepted: u64 = producers.into_iter().map(|p| p.join().unwrap()).sum();

    assert!(accepted > 0);
    assert_eq!(stats.activations_received, accepted);
    assert_eq!(stats.terminal_events_delivered, accepted);
    assert_eq!(stream.queued(), 0);
}

#[test]
fn test_relay_chain_drains_after_close() {
    let (t0, mut stream) = fast_forward_stream(StreamSettings::default());
    let target = recorder();
    let hop = Duration::from_millis(1);
    let last = Neuron::new(
        NeuronId(3),
        Axon::with_terminals(hop, vec![as_terminal(&target)]),
        stream.handle(),
        AlwaysFirer::new(SimpleActionPotential::new()),
    );
    let middle = Neuron::new(
        NeuronId(2),
        Axon::with_terminals(hop, vec![as_terminal(&last)]),
        stream.handle(),
        AlwaysFirer::new(SimpleActionPotential::new()),
    );
    let first = Neuron::new(
        NeuronId(1),
        Axon::with_terminals(hop, vec![as_terminal(&middle)]),
        stream.handle(),
        SimpleActionPotential::new(),
    );
    stream.handle().send(ActivationEvent::new(t0, first)).unwrap();
    stream.handle().close();

    let stats = stream.run_until_closed();

    assert_eq!(stats.activations_received, 3);
    assert_eq!(stats.delivery_failures, 0);
    let events = target.lock().take_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].time, t0 + hop * 3);
}
