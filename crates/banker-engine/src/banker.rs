//! The [`Banker`]: one allocation state, one lock, one change notification.
//!
//! All mutable data lives in [`Inner`] behind a single `Mutex`. The
//! request path (`request.rs`) and release path (`release.rs`) each hold
//! the guard for their entire operation. The `Condvar` is signalled
//! after every non-zero release and on [`close`](Banker::close); blocking
//! requests wait on it.
//!
//! No fairness is provided. Contending callers acquire the mutex in
//! whatever order the OS grants it, and woken waiters re-contend freely.

use std::sync::{Condvar, Mutex, MutexGuard};

use banker_core::{AllocationState, ConsumerId, ResourceVector};

use crate::config::{BankerConfig, ConfigError};
use crate::error::BankerError;
use crate::metrics::BankerMetrics;

/// Everything guarded by the banker's lock.
#[derive(Debug)]
pub(crate) struct Inner {
    pub state: AllocationState,
    pub metrics: BankerMetrics,
    /// Set by [`Banker::close`]; waiters return `WaitOutcome::Closed`.
    pub closed: bool,
    /// Bumped on every non-zero release. Waiters sleep until it moves.
    pub capacity_epoch: u64,
}

/// Deadlock-avoiding resource allocator.
///
/// Share between consumer threads with `Arc<Banker>`. Every method takes
/// `&self`; all mutation is serialized through one internal mutex.
#[derive(Debug)]
pub struct Banker {
    inner: Mutex<Inner>,
    pub(crate) capacity: Condvar,
    consumers: usize,
    classes: usize,
}

// Compile-time assertion: Banker must be shareable across consumer threads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Banker>();
};

impl Banker {
    /// Validate `config` and build a banker with nothing allocated.
    pub fn new(config: BankerConfig) -> Result<Self, ConfigError> {
        let state = config.build_state()?;
        tracing::info!(
            consumers = state.num_consumers(),
            available = %state.available(),
            "banker created"
        );
        for c in state.consumers() {
            if let Ok(max) = state.maximum(c) {
                tracing::debug!(consumer = %c, maximum = %max, "maximum claim");
            }
        }
        Ok(Self::from_state(state))
    }

    /// Wrap an existing, already-validated state.
    ///
    /// An unsafe starting state is accepted (with a warning): every
    /// request will be denied as unsafe until releases restore safety.
    pub fn from_state(state: AllocationState) -> Self {
        if !state.is_safe() {
            tracing::warn!("banker starting from an unsafe state");
        }
        Self {
            consumers: state.num_consumers(),
            classes: state.num_classes(),
            inner: Mutex::new(Inner {
                state,
                metrics: BankerMetrics::default(),
                closed: false,
                capacity_epoch: 0,
            }),
            capacity: Condvar::new(),
        }
    }

    /// Number of consumers. Fixed for the banker's lifetime.
    pub fn num_consumers(&self) -> usize {
        self.consumers
    }

    /// Number of resource classes. Fixed for the banker's lifetime.
    pub fn num_classes(&self) -> usize {
        self.classes
    }

    /// A copy of the current committed state.
    pub fn snapshot(&self) -> Result<AllocationState, BankerError> {
        Ok(self.lock()?.state.clone())
    }

    /// What `consumer` currently holds.
    pub fn allocation(&self, consumer: ConsumerId) -> Result<ResourceVector, BankerError> {
        Ok(self.lock()?.state.allocation(consumer)?.clone())
    }

    /// A copy of the counters.
    pub fn metrics(&self) -> Result<BankerMetrics, BankerError> {
        Ok(self.lock()?.metrics.clone())
    }

    /// Snapshot and counters taken under the same lock acquisition.
    pub fn snapshot_with_metrics(&self) -> Result<(AllocationState, BankerMetrics), BankerError> {
        let inner = self.lock()?;
        Ok((inner.state.clone(), inner.metrics.clone()))
    }

    /// Number of non-zero releases so far.
    pub fn capacity_epoch(&self) -> Result<u64, BankerError> {
        Ok(self.lock()?.capacity_epoch)
    }

    /// Wake every blocked request and make future waits return
    /// `WaitOutcome::Closed` immediately.
    ///
    /// Non-blocking requests and releases keep working so that drivers
    /// can drain what they hold.
    pub fn close(&self) {
        match self.inner.lock() {
            Ok(mut inner) => inner.closed = true,
            Err(poisoned) => poisoned.into_inner().closed = true,
        }
        self.capacity.notify_all();
        tracing::debug!("banker closed");
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().map(|inner| inner.closed).unwrap_or(true)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Inner>, BankerError> {
        self.inner.lock().map_err(|_| BankerError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rv(v: &[u32]) -> ResourceVector {
        ResourceVector::from_slice(v)
    }

    #[test]
    fn new_builds_zero_allocation_state() {
        let banker = Banker::new(BankerConfig {
            available: rv(&[3, 2]),
            maximum: vec![rv(&[1, 1]), rv(&[3, 0])],
        })
        .unwrap();
        assert_eq!(banker.num_consumers(), 2);
        assert_eq!(banker.num_classes(), 2);

        let snap = banker.snapshot().unwrap();
        assert_eq!(snap.available(), &rv(&[3, 2]));
        assert!(snap.allocation(ConsumerId(1)).unwrap().is_zero());
        assert_eq!(banker.metrics().unwrap(), BankerMetrics::default());
        assert_eq!(banker.capacity_epoch().unwrap(), 0);
    }

    #[test]
    fn new_propagates_config_errors() {
        let err = Banker::new(BankerConfig {
            available: rv(&[1]),
            maximum: vec![],
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::NoConsumers);
    }

    #[test]
    fn close_is_sticky() {
        let banker = Banker::new(BankerConfig {
            available: rv(&[1]),
            maximum: vec![rv(&[1])],
        })
        .unwrap();
        assert!(!banker.is_closed());
        banker.close();
        assert!(banker.is_closed());
        banker.close();
        assert!(banker.is_closed());
    }

    #[test]
    fn allocation_tracks_grants_and_rejects_unknown_consumers() {
        let banker = Banker::new(BankerConfig {
            available: rv(&[3, 2]),
            maximum: vec![rv(&[2, 2]), rv(&[1, 0])],
        })
        .unwrap();
        assert!(banker
            .request_resources(ConsumerId(0), &rv(&[1, 2]))
            .unwrap()
            .is_granted());
        assert_eq!(banker.allocation(ConsumerId(0)).unwrap(), rv(&[1, 2]));
        assert!(banker.allocation(ConsumerId(1)).unwrap().is_zero());
        assert!(matches!(
            banker.allocation(ConsumerId(2)),
            Err(BankerError::UnknownConsumer { .. })
        ));
    }
}
