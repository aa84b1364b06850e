//! Spawning, stopping and joining a set of consumer threads.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use banker_core::ConsumerId;
use banker_engine::{Banker, BankerConfig, BankerError};
use crossbeam_channel::Receiver;
use indexmap::IndexMap;

use crate::config::{SimConfig, SimError};
use crate::consumer::Consumer;
use crate::event::{EventSink, SimEvent};
use crate::generator::{ClaimGenerator, SeededGenerator};
use crate::report::{ConsumerTally, SimReport};

type ConsumerHandle = JoinHandle<Result<ConsumerTally, BankerError>>;

/// A running simulation: one banker, one thread per consumer.
///
/// Dropping a `Simulation` without calling [`join`](Self::join) stops
/// and joins every consumer.
pub struct Simulation {
    banker: Arc<Banker>,
    stop: Arc<AtomicBool>,
    events: Receiver<SimEvent>,
    dropped_events: Arc<AtomicU64>,
    handles: Vec<(ConsumerId, ConsumerHandle)>,
    started: Instant,
}

impl Simulation {
    /// Spawn with a [`SeededGenerator`] per consumer.
    pub fn spawn(config: SimConfig) -> Result<Self, SimError> {
        let seed = config.seed;
        let hold = config.hold.clone();
        Self::spawn_with(config, |id| SeededGenerator::new(seed, id, hold.clone()))
    }

    /// Spawn with generators built by `make` (called once per consumer, in
    /// consumer order, on the calling thread).
    ///
    /// Maximum claims are drawn and `ClaimDeclared` events emitted for
    /// every consumer before any thread starts.
    pub fn spawn_with<G, F>(config: SimConfig, mut make: F) -> Result<Self, SimError>
    where
        G: ClaimGenerator + 'static,
        F: FnMut(ConsumerId) -> G,
    {
        config.validate()?;

        let mut generators: Vec<G> = (0..config.consumers).map(|c| make(ConsumerId(c))).collect();
        let maximum: Vec<_> = generators
            .iter_mut()
            .map(|g| g.maximum_claim(&config.available))
            .collect();

        let banker = Arc::new(Banker::new(BankerConfig {
            available: config.available.clone(),
            maximum: maximum.clone(),
        })?);

        let (sink, events) = EventSink::bounded(config.event_buffer);
        for (c, claim) in maximum.iter().enumerate() {
            sink.emit(SimEvent::ClaimDeclared {
                consumer: ConsumerId(c as u32),
                maximum: claim.clone(),
            });
        }

        let mut sim = Self {
            banker,
            stop: Arc::new(AtomicBool::new(false)),
            events,
            dropped_events: sink.dropped(),
            handles: Vec::with_capacity(generators.len()),
            started: Instant::now(),
        };

        for ((c, generator), claim) in generators.into_iter().enumerate().zip(maximum) {
            let id = ConsumerId(c as u32);
            let consumer = Consumer {
                id,
                banker: Arc::clone(&sim.banker),
                generator,
                maximum: claim,
                events: sink.clone(),
                stop: Arc::clone(&sim.stop),
                rounds: config.rounds,
                retry: config.retry,
            };
            let handle = thread::Builder::new()
                .name(format!("banker-consumer-{c}"))
                .spawn(move || consumer.run())
                .map_err(|e| SimError::Spawn {
                    reason: e.to_string(),
                })?;
            sim.handles.push((id, handle));
        }

        tracing::info!(
            consumers = config.consumers,
            seed = config.seed,
            rounds = ?config.rounds,
            "simulation started"
        );
        Ok(sim)
    }

    /// The shared banker.
    pub fn banker(&self) -> &Arc<Banker> {
        &self.banker
    }

    /// Event stream. Disconnects once every consumer has exited.
    ///
    /// Holds at most `SimConfig::event_buffer` events. Consumers never
    /// block on it: whatever does not fit is dropped and counted.
    pub fn events(&self) -> &Receiver<SimEvent> {
        &self.events
    }

    /// Events dropped so far because the buffer was full.
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Ask every consumer to finish its current step and exit.
    ///
    /// Blocked requests return at once, holders cut their hold short, and
    /// every consumer releases what it holds before exiting.
    pub fn stop(&self) {
        self.stop.store(true, Ordering::Release);
        self.banker.close();
        for (_, handle) in &self.handles {
            handle.thread().unpark();
        }
    }

    /// Whether every consumer thread has exited.
    pub fn is_finished(&self) -> bool {
        self.handles.iter().all(|(_, h)| h.is_finished())
    }

    /// Wait for every consumer and collect the report.
    ///
    /// With `rounds: None` this blocks until [`stop`](Self::stop) is
    /// called from another thread.
    ///
    /// # Errors
    ///
    /// The first consumer error or panic, in consumer order. All threads
    /// are joined before returning either way.
    pub fn join(mut self) -> Result<SimReport, SimError> {
        let mut consumers = IndexMap::with_capacity(self.handles.len());
        let mut first_error = None;

        for (id, handle) in self.handles.drain(..) {
            match handle.join() {
                Ok(Ok(tally)) => {
                    consumers.insert(id, tally);
                }
                Ok(Err(source)) => {
                    tracing::error!(consumer = %id, "consumer failed: {source}");
                    first_error.get_or_insert(SimError::Consumer {
                        consumer: id,
                        source,
                    });
                }
                Err(_) => {
                    tracing::error!(consumer = %id, "consumer panicked");
                    first_error.get_or_insert(SimError::Panicked { consumer: id });
                }
            }
        }
        if let Some(e) = first_error {
            return Err(e);
        }

        let (final_state, metrics) = self.banker.snapshot_with_metrics()?;
        let report = SimReport {
            consumers,
            metrics,
            final_state,
            elapsed: self.started.elapsed(),
            dropped_events: self.dropped_events(),
        };
        tracing::info!(
            requests = report.metrics.requests,
            granted = report.metrics.granted,
            denied = report.metrics.denied(),
            dropped_events = report.dropped_events,
            "simulation finished"
        );
        Ok(report)
    }
}

impl Drop for Simulation {
    fn drop(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        self.stop();
        for (_, handle) in self.handles.drain(..) {
            let _ = handle.join();
        }
    }
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("consumers", &self.handles.len())
            .field("stopped", &self.stop.load(Ordering::Relaxed))
            .finish()
    }
}
