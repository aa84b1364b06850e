//! Release coordinator.
//!
//! A release is validated in full before anything is touched: if any
//! class asks to return more than the consumer holds, the call fails and
//! the state is unchanged. A successful non-zero release bumps the
//! capacity epoch and wakes every blocked request.

use banker_core::{ConsumerId, ResourceVector};

use crate::banker::{Banker, Inner};
use crate::error::BankerError;

impl Inner {
    /// Validate and apply a release. Caller holds the lock.
    ///
    /// Returns whether capacity changed (and waiters should be woken).
    fn release(
        &mut self,
        consumer: ConsumerId,
        release: &ResourceVector,
    ) -> Result<bool, BankerError> {
        self.state.check_len(release, "release")?;
        let held = self.state.allocation(consumer)?;

        if let Some(class) = release.first_exceeding(held) {
            self.metrics.rejected_releases += 1;
            return Err(BankerError::ReleaseExceedsAllocation {
                consumer,
                class,
                requested: release[class],
                held: held[class],
            });
        }

        self.metrics.releases += 1;
        if release.is_zero() {
            return Ok(false);
        }
        self.state.give_back(consumer, release)?;
        self.capacity_epoch += 1;
        Ok(true)
    }
}

impl Banker {
    /// Return `release` units held by `consumer` to the free pool.
    ///
    /// # Errors
    ///
    /// [`BankerError::ReleaseExceedsAllocation`] if any class exceeds what
    /// the consumer holds; the state is left untouched. Also
    /// [`BankerError::UnknownConsumer`] / [`BankerError::DimensionMismatch`]
    /// for malformed calls.
    pub fn release_resources(
        &self,
        consumer: ConsumerId,
        release: &ResourceVector,
    ) -> Result<(), BankerError> {
        let mut inner = self.lock()?;
        let result = inner.release(consumer, release);
        drop(inner);
        self.finish_release(consumer, release, result)
    }

    /// Release everything `consumer` holds, returning what was released.
    pub fn release_all(&self, consumer: ConsumerId) -> Result<ResourceVector, BankerError> {
        let mut inner = self.lock()?;
        let held = inner.state.allocation(consumer)?.clone();
        let result = inner.release(consumer, &held);
        drop(inner);
        self.finish_release(consumer, &held, result)?;
        Ok(held)
    }

    fn finish_release(
        &self,
        consumer: ConsumerId,
        release: &ResourceVector,
        result: Result<bool, BankerError>,
    ) -> Result<(), BankerError> {
        match result {
            Ok(changed) => {
                if changed {
                    self.capacity.notify_all();
                }
                tracing::debug!(consumer = %consumer, release = %release, "resources released");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(consumer = %consumer, release = %release, "release rejected: {e}");
                Err(e)
            }
        }
    }
}
