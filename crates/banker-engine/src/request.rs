//! Request coordinator.
//!
//! Evaluation order, all under the banker's lock:
//!
//! 1. `request > need` in any class → `Denied(ExceedsNeed)`
//! 2. `request > available` in any class → `Denied(InsufficientAvailable)`
//! 3. tentatively `take` the units
//! 4. run the safety scan; unsafe → `give_back` the same units and
//!    `Denied(UnsafeState)`, safe → `Granted`
//!
//! Steps 3 and 4 never release the lock in between, so the tentative
//! state is invisible to every other caller. On every denial the state
//! is restored to exactly what it was before the call.

use std::time::{Duration, Instant};

use banker_core::{ConsumerId, ResourceVector};

use crate::banker::{Banker, Inner};
use crate::error::BankerError;
use crate::outcome::{DenyReason, RequestOutcome, WaitOutcome};

impl Inner {
    /// One pass of the four-step decision. Caller holds the lock.
    fn evaluate(
        &mut self,
        consumer: ConsumerId,
        request: &ResourceVector,
    ) -> Result<RequestOutcome, BankerError> {
        let state = &mut self.state;
        state.check_len(request, "request")?;
        let need = state.need(consumer)?;
        self.metrics.requests += 1;

        if request.first_exceeding(need).is_some() {
            self.metrics.denied_exceeds_need += 1;
            return Ok(RequestOutcome::Denied(DenyReason::ExceedsNeed));
        }
        if request.first_exceeding(state.available()).is_some() {
            self.metrics.denied_insufficient += 1;
            return Ok(RequestOutcome::Denied(DenyReason::InsufficientAvailable));
        }

        state.take(consumer, request)?;
        self.metrics.safety_checks += 1;
        match state.safe_sequence() {
            Some(order) => {
                tracing::trace!(consumer = %consumer, ?order, "safe sequence after grant");
                self.metrics.granted += 1;
                Ok(RequestOutcome::Granted)
            }
            None => {
                state.give_back(consumer, request)?;
                self.metrics.denied_unsafe += 1;
                Ok(RequestOutcome::Denied(DenyReason::UnsafeState))
            }
        }
    }
}

impl Banker {
    /// Request `request` units for `consumer` without blocking.
    ///
    /// Returns `Granted` only if the request fits within the consumer's
    /// need and the free pool, and the resulting state is safe. Any
    /// denial leaves the state untouched; the caller decides whether and
    /// when to retry.
    ///
    /// A zero request is granted exactly when the current state is safe.
    ///
    /// # Errors
    ///
    /// [`BankerError::UnknownConsumer`] or [`BankerError::DimensionMismatch`]
    /// for malformed calls, [`BankerError::Poisoned`] if the lock is
    /// unusable.
    pub fn request_resources(
        &self,
        consumer: ConsumerId,
        request: &ResourceVector,
    ) -> Result<RequestOutcome, BankerError> {
        let mut inner = self.lock()?;
        let outcome = inner.evaluate(consumer, request)?;
        drop(inner);

        match outcome {
            RequestOutcome::Granted => {
                tracing::debug!(consumer = %consumer, request = %request, "request granted");
            }
            RequestOutcome::Denied(reason) => {
                tracing::debug!(consumer = %consumer, request = %request, %reason, "request denied");
            }
        }
        Ok(outcome)
    }

    /// Request `request` units for `consumer`, waiting up to `timeout` for
    /// releases to make it grantable.
    ///
    /// Re-evaluates after every non-zero release. Returns immediately on
    /// `Granted`, on [`DenyReason::ExceedsNeed`] (waiting cannot help), or
    /// if the banker is closed. A zero `timeout` evaluates exactly once.
    pub fn request_resources_timeout(
        &self,
        consumer: ConsumerId,
        request: &ResourceVector,
        timeout: Duration,
    ) -> Result<WaitOutcome, BankerError> {
        // `None` when the deadline is beyond what `Instant` can represent.
        let deadline = Instant::now().checked_add(timeout);
        let mut inner = self.lock()?;

        loop {
            if inner.closed {
                return Ok(WaitOutcome::Closed);
            }

            let reason = match inner.evaluate(consumer, request)? {
                RequestOutcome::Granted => {
                    tracing::debug!(consumer = %consumer, request = %request, "request granted");
                    return Ok(WaitOutcome::Granted);
                }
                RequestOutcome::Denied(reason) if !reason.is_retryable() => {
                    return Ok(WaitOutcome::Denied(reason));
                }
                RequestOutcome::Denied(reason) => reason,
            };

            let remaining = match deadline {
                Some(deadline) => deadline.checked_duration_since(Instant::now()),
                None => Some(timeout),
            };
            let Some(remaining) = remaining.filter(|d| !d.is_zero()) else {
                inner.metrics.wait_timeouts += 1;
                tracing::debug!(consumer = %consumer, request = %request, %reason, "request timed out");
                return Ok(WaitOutcome::TimedOut(reason));
            };

            let epoch = inner.capacity_epoch;
            let (guard, _) = self
                .capacity
                .wait_timeout_while(inner, remaining, |i| {
                    i.capacity_epoch == epoch && !i.closed
                })
                .map_err(|_| BankerError::Poisoned)?;
            inner = guard;
        }
    }
}
