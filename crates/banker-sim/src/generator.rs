//! Claim and request generation for simulated consumers.

use std::ops::RangeInclusive;
use std::time::Duration;

use banker_core::{ConsumerId, ResourceVector};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of a consumer's maximum claim, its requests, and hold times.
///
/// One generator is owned by each consumer thread, so implementations need
/// `Send` but not `Sync`.
pub trait ClaimGenerator: Send {
    /// The maximum claim to declare at startup. Every entry must be at
    /// most the matching entry of `available`.
    fn maximum_claim(&mut self, available: &ResourceVector) -> ResourceVector;

    /// The next request, given the consumer's current need. Every entry
    /// must be at most the matching entry of `need`.
    fn request(&mut self, need: &ResourceVector) -> ResourceVector;

    /// How long to hold a granted allocation before releasing it.
    fn hold_time(&mut self) -> Duration;
}

/// Uniform random generator over a seeded ChaCha8 stream.
///
/// The stream for consumer `c` is seeded with `seed ^ c`, so a run is
/// reproducible from `seed` alone regardless of thread scheduling.
#[derive(Clone, Debug)]
pub struct SeededGenerator {
    rng: ChaCha8Rng,
    hold: RangeInclusive<Duration>,
}

impl SeededGenerator {
    /// Generator for `consumer` in a run seeded with `seed`.
    ///
    /// `hold` must be non-empty (`start <= end`).
    pub fn new(seed: u64, consumer: ConsumerId, hold: RangeInclusive<Duration>) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed ^ u64::from(consumer.0)),
            hold,
        }
    }

    fn uniform_below(&mut self, bound: &ResourceVector) -> ResourceVector {
        bound
            .iter()
            .map(|b| self.rng.random_range(0..=b))
            .collect()
    }
}

impl ClaimGenerator for SeededGenerator {
    fn maximum_claim(&mut self, available: &ResourceVector) -> ResourceVector {
        self.uniform_below(available)
    }

    fn request(&mut self, need: &ResourceVector) -> ResourceVector {
        self.uniform_below(need)
    }

    fn hold_time(&mut self) -> Duration {
        if self.hold.start() >= self.hold.end() {
            return *self.hold.start();
        }
        self.rng.random_range(self.hold.clone())
    }
}
