//! Errors returned by the coordinators.
//!
//! Denials are not errors: they are ordinary [`RequestOutcome`](crate::RequestOutcome)s.
//! A [`BankerError`] means the call itself was malformed (wrong consumer,
//! wrong vector length, releasing more than held) or the lock is unusable.
//! In every case the allocation state is left exactly as it was.

use banker_core::{ConsumerId, StateError, Units};

/// A request or release call that could not be evaluated.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BankerError {
    /// The consumer ID does not exist.
    #[error("unknown consumer {consumer} (banker has {consumers} consumers)")]
    UnknownConsumer {
        /// The offending ID.
        consumer: ConsumerId,
        /// Number of registered consumers.
        consumers: usize,
    },

    /// A request or release vector has the wrong number of classes.
    #[error("{what} has {actual} resource classes, expected {expected}")]
    DimensionMismatch {
        /// `"request"` or `"release"`.
        what: String,
        /// Number of resource classes.
        expected: usize,
        /// Length of the supplied vector.
        actual: usize,
    },

    /// A release asked to return more than the consumer holds.
    #[error("consumer {consumer} cannot release {requested} of class {class}: holds {held}")]
    ReleaseExceedsAllocation {
        /// Releasing consumer.
        consumer: ConsumerId,
        /// First class over the holding.
        class: usize,
        /// Units the release asked to return.
        requested: Units,
        /// Units actually held.
        held: Units,
    },

    /// The state lock was poisoned by a panicking thread.
    #[error("allocation state lock poisoned")]
    Poisoned,

    /// The allocation state rejected a mutation the coordinator had
    /// already validated.
    #[error("allocation state rejected mutation: {0}")]
    Inconsistent(StateError),
}

impl From<StateError> for BankerError {
    fn from(e: StateError) -> Self {
        match e {
            StateError::UnknownConsumer {
                consumer,
                consumers,
            } => Self::UnknownConsumer {
                consumer,
                consumers,
            },
            StateError::DimensionMismatch {
                what,
                expected,
                actual,
            } => Self::DimensionMismatch {
                what,
                expected,
                actual,
            },
            other => Self::Inconsistent(other),
        }
    }
}
