//! Simulation configuration and error types.

use std::ops::RangeInclusive;
use std::time::Duration;

use banker_core::{ConsumerId, ResourceVector};
use banker_engine::{BankerError, ConfigError};

/// What a consumer does after a denied request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Sleep this long, then ask again with a fresh request.
    Backoff(Duration),
    /// Block in the banker for up to this long, re-evaluating the same
    /// request after every release.
    WaitForRelease(Duration),
}

/// Configuration for a [`Simulation`](crate::Simulation).
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Initial free units per resource class.
    pub available: ResourceVector,
    /// Number of consumer threads. Default: 3.
    pub consumers: u32,
    /// Base seed; consumer `c` draws from `seed ^ c`. Default: 0.
    pub seed: u64,
    /// Request attempts per consumer, or `None` to run until stopped.
    pub rounds: Option<u64>,
    /// Range of hold times for a granted allocation. Default: 1s.
    pub hold: RangeInclusive<Duration>,
    /// Behaviour after a denial. Default: `Backoff(1s)`.
    pub retry: RetryPolicy,
    /// Capacity of the event channel. Events sent while it is full are
    /// dropped and counted in [`SimReport::dropped_events`]. Default: 1024.
    ///
    /// [`SimReport::dropped_events`]: crate::SimReport::dropped_events
    pub event_buffer: usize,
}

impl SimConfig {
    /// Defaults for everything except the supply.
    pub fn new(available: ResourceVector) -> Self {
        Self {
            available,
            consumers: 3,
            seed: 0,
            rounds: None,
            hold: Duration::from_secs(1)..=Duration::from_secs(1),
            retry: RetryPolicy::Backoff(Duration::from_secs(1)),
            event_buffer: 1024,
        }
    }

    /// Check the parameters the banker does not check itself.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.consumers == 0 {
            return Err(SimError::Config(ConfigError::NoConsumers));
        }
        if self.hold.start() > self.hold.end() {
            return Err(SimError::EmptyHoldRange {
                start: *self.hold.start(),
                end: *self.hold.end(),
            });
        }
        if self.event_buffer == 0 {
            return Err(SimError::EmptyEventBuffer);
        }
        Ok(())
    }
}

/// Errors from starting or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The banker rejected the generated configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// `hold` has its start after its end.
    #[error("hold range is empty: {start:?}..={end:?}")]
    EmptyHoldRange {
        /// Range start.
        start: Duration,
        /// Range end.
        end: Duration,
    },
    /// `event_buffer` is zero.
    #[error("event buffer must hold at least one event")]
    EmptyEventBuffer,
    /// A consumer thread could not be spawned.
    #[error("failed to spawn consumer thread: {reason}")]
    Spawn {
        /// OS error text.
        reason: String,
    },
    /// A consumer's call into the banker failed.
    #[error("consumer {consumer}: {source}")]
    Consumer {
        /// Which consumer.
        consumer: ConsumerId,
        /// The banker error.
        #[source]
        source: BankerError,
    },
    /// A consumer thread panicked.
    #[error("consumer {consumer} panicked")]
    Panicked {
        /// Which consumer.
        consumer: ConsumerId,
    },
    /// The banker's lock was poisoned while collecting the report.
    #[error(transparent)]
    Banker(#[from] BankerError),
}
