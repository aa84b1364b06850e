//! Request outcomes.
//!
//! The three denial causes are reported separately. Callers that only
//! care whether they got the resources can use
//! [`RequestOutcome::is_granted`].

use std::fmt;

/// Why a request was denied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// The request exceeds the consumer's remaining need (its declared
    /// maximum claim minus what it holds). Retrying the same vector can
    /// never succeed.
    ExceedsNeed,
    /// Not enough free units right now. May succeed after a release.
    InsufficientAvailable,
    /// Granting would leave the system in an unsafe state. The tentative
    /// grant was rolled back. May succeed after a release.
    UnsafeState,
}

impl DenyReason {
    /// Whether waiting for a release could change the verdict.
    pub fn is_retryable(self) -> bool {
        !matches!(self, Self::ExceedsNeed)
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExceedsNeed => write!(f, "request exceeds remaining need"),
            Self::InsufficientAvailable => write!(f, "insufficient available units"),
            Self::UnsafeState => write!(f, "grant would leave an unsafe state"),
        }
    }
}

/// Result of a non-blocking request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
    /// The request was committed.
    Granted,
    /// The request was refused; the state is unchanged.
    Denied(DenyReason),
}

impl RequestOutcome {
    /// Whether the request was committed.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// The denial reason, if denied.
    pub fn deny_reason(self) -> Option<DenyReason> {
        match self {
            Self::Granted => None,
            Self::Denied(r) => Some(r),
        }
    }
}

/// Result of [`Banker::request_resources_timeout`](crate::Banker::request_resources_timeout).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaitOutcome {
    /// The request was committed.
    Granted,
    /// Refused for a reason waiting cannot fix
    /// ([`DenyReason::ExceedsNeed`]).
    Denied(DenyReason),
    /// The deadline passed; carries the most recent denial reason.
    TimedOut(DenyReason),
    /// The banker was closed while waiting.
    Closed,
}

impl WaitOutcome {
    /// Whether the request was committed.
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}
