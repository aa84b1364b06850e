//! Events emitted by simulated consumers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use banker_core::{ConsumerId, ResourceVector};
use banker_engine::DenyReason;
use crossbeam_channel::{Receiver, Sender, TrySendError};

/// One observable step of a consumer's lifecycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// The consumer declared its maximum claim at startup.
    ClaimDeclared {
        /// Consumer.
        consumer: ConsumerId,
        /// Declared maximum claim.
        maximum: ResourceVector,
    },
    /// The consumer asked for units.
    Requested {
        /// Consumer.
        consumer: ConsumerId,
        /// Requested units.
        request: ResourceVector,
    },
    /// The request was granted.
    Granted {
        /// Consumer.
        consumer: ConsumerId,
        /// Granted units.
        request: ResourceVector,
        /// Everything the consumer holds once the grant is committed.
        allocation: ResourceVector,
    },
    /// The request was denied (or timed out waiting).
    Denied {
        /// Consumer.
        consumer: ConsumerId,
        /// Denied units.
        request: ResourceVector,
        /// Why the last evaluation failed.
        reason: DenyReason,
    },
    /// The consumer returned units to the pool.
    Released {
        /// Consumer.
        consumer: ConsumerId,
        /// Released units.
        released: ResourceVector,
    },
}

impl SimEvent {
    /// The consumer this event belongs to.
    pub fn consumer(&self) -> ConsumerId {
        match self {
            Self::ClaimDeclared { consumer, .. }
            | Self::Requested { consumer, .. }
            | Self::Granted { consumer, .. }
            | Self::Denied { consumer, .. }
            | Self::Released { consumer, .. } => *consumer,
        }
    }
}

impl fmt::Display for SimEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClaimDeclared { consumer, maximum } => {
                write!(f, "consumer {consumer} declares maximum {maximum}")
            }
            Self::Requested { consumer, request } => {
                write!(f, "consumer {consumer} requests {request}")
            }
            Self::Granted {
                consumer,
                request,
                allocation,
            } => write!(f, "consumer {consumer} granted {request}, now holds {allocation}"),
            Self::Denied {
                consumer,
                request,
                reason,
            } => write!(f, "consumer {consumer} denied {request}: {reason}"),
            Self::Released { consumer, released } => {
                write!(f, "consumer {consumer} releases {released}")
            }
        }
    }
}

/// Sending half of the bounded event channel.
///
/// Never blocks: an event that does not fit is dropped and counted.
#[derive(Clone)]
pub(crate) struct EventSink {
    tx: Sender<SimEvent>,
    dropped: Arc<AtomicU64>,
}

impl EventSink {
    pub fn bounded(capacity: usize) -> (Self, Receiver<SimEvent>) {
        let (tx, rx) = crossbeam_channel::bounded(capacity);
        let sink = Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        };
        (sink, rx)
    }

    /// Shared drop counter; outlives every sink clone.
    pub fn dropped(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }

    pub fn emit(&self, event: SimEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                if self.dropped.fetch_add(1, Ordering::Relaxed) == 0 {
                    tracing::warn!(%event, "event buffer full, dropping events");
                }
            }
            // Nobody is listening any more.
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_consumer() {
        let e = SimEvent::Denied {
            consumer: ConsumerId(4),
            request: ResourceVector::from_slice(&[3, 3, 0]),
            reason: DenyReason::InsufficientAvailable,
        };
        assert_eq!(e.consumer(), ConsumerId(4));
        assert!(e.to_string().starts_with("consumer 4 denied [3, 3, 0]: "));

        let e = SimEvent::Granted {
            consumer: ConsumerId(1),
            request: ResourceVector::from_slice(&[1, 0]),
            allocation: ResourceVector::from_slice(&[2, 1]),
        };
        assert_eq!(e.to_string(), "consumer 1 granted [1, 0], now holds [2, 1]");
    }

    #[test]
    fn full_sink_drops_and_counts() {
        let (sink, rx) = EventSink::bounded(2);
        let dropped = sink.dropped();
        for c in 0..5 {
            sink.emit(SimEvent::Released {
                consumer: ConsumerId(c),
                released: ResourceVector::from_slice(&[1]),
            });
        }
        assert_eq!(rx.len(), 2);
        assert_eq!(dropped.load(Ordering::Relaxed), 3);

        let kept: Vec<ConsumerId> = rx.try_iter().map(|e| e.consumer()).collect();
        assert_eq!(kept, vec![ConsumerId(0), ConsumerId(1)]);

        drop(rx);
        sink.emit(SimEvent::Released {
            consumer: ConsumerId(9),
            released: ResourceVector::from_slice(&[1]),
        });
        assert_eq!(dropped.load(Ordering::Relaxed), 3);
    }
}
