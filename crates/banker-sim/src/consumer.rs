//! Per-consumer thread loop.
//!
//! Each consumer cycles `Idle → Requesting → Holding → Releasing → Idle`.
//! A denied request goes back to `Idle`, after the backoff delay when
//! retrying without blocking. A consumer holds nothing while `Idle` or
//! `Requesting`, so its need at request time is always its full maximum
//! claim.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use banker_core::{ConsumerId, ResourceVector};
use banker_engine::{Banker, BankerError, DenyReason, WaitOutcome};

use crate::config::RetryPolicy;
use crate::event::{EventSink, SimEvent};
use crate::generator::ClaimGenerator;
use crate::report::ConsumerTally;

/// Where a consumer is in its request/hold/release cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsumerPhase {
    /// Between cycles; checks the stop flag and round limit.
    Idle,
    /// Drawing and submitting a request.
    Requesting,
    /// Holding a granted allocation.
    Holding,
    /// Returning everything held.
    Releasing,
}

pub(crate) struct Consumer<G> {
    pub id: ConsumerId,
    pub banker: Arc<Banker>,
    pub generator: G,
    pub maximum: ResourceVector,
    pub events: EventSink,
    pub stop: Arc<AtomicBool>,
    pub rounds: Option<u64>,
    pub retry: RetryPolicy,
}

impl<G: ClaimGenerator> Consumer<G> {
    /// Run until stopped or out of rounds. Always ends holding nothing.
    pub fn run(mut self) -> Result<ConsumerTally, BankerError> {
        let mut tally = ConsumerTally::default();
        let mut phase = ConsumerPhase::Idle;

        loop {
            let next = match phase {
                ConsumerPhase::Idle => {
                    if self.finished(&tally) {
                        break;
                    }
                    ConsumerPhase::Requesting
                }
                ConsumerPhase::Requesting => self.request(&mut tally)?,
                ConsumerPhase::Holding => {
                    let hold = self.generator.hold_time();
                    self.pause(hold);
                    ConsumerPhase::Releasing
                }
                ConsumerPhase::Releasing => {
                    self.release(&mut tally)?;
                    ConsumerPhase::Idle
                }
            };
            tracing::trace!(consumer = %self.id, from = ?phase, to = ?next, "phase change");
            phase = next;
        }

        tracing::debug!(consumer = %self.id, requests = tally.requests, "consumer finished");
        Ok(tally)
    }

    fn finished(&self, tally: &ConsumerTally) -> bool {
        self.stop.load(Ordering::Acquire) || self.rounds.is_some_and(|r| tally.requests >= r)
    }

    fn request(&mut self, tally: &mut ConsumerTally) -> Result<ConsumerPhase, BankerError> {
        let request = self.generator.request(&self.maximum);
        tally.requests += 1;
        self.emit(SimEvent::Requested {
            consumer: self.id,
            request: request.clone(),
        });

        let denied: Option<DenyReason> = match self.retry {
            RetryPolicy::Backoff(_) => self
                .banker
                .request_resources(self.id, &request)?
                .deny_reason(),
            RetryPolicy::WaitForRelease(timeout) => {
                match self
                    .banker
                    .request_resources_timeout(self.id, &request, timeout)?
                {
                    WaitOutcome::Granted => None,
                    WaitOutcome::Denied(reason) => Some(reason),
                    WaitOutcome::TimedOut(reason) => {
                        tally.timed_out += 1;
                        Some(reason)
                    }
                    // Shutdown: the request never reached a verdict.
                    WaitOutcome::Closed => {
                        tally.cancelled += 1;
                        return Ok(ConsumerPhase::Idle);
                    }
                }
            }
        };

        match denied {
            None => {
                tally.granted += 1;
                let allocation = self.banker.allocation(self.id)?;
                self.emit(SimEvent::Granted {
                    consumer: self.id,
                    request,
                    allocation,
                });
                Ok(ConsumerPhase::Holding)
            }
            Some(reason) => {
                tally.denied += 1;
                self.emit(SimEvent::Denied {
                    consumer: self.id,
                    request,
                    reason,
                });
                if let RetryPolicy::Backoff(delay) = self.retry {
                    if !self.finished(tally) {
                        self.pause(delay);
                    }
                }
                Ok(ConsumerPhase::Idle)
            }
        }
    }

    /// Sleep for `duration`, or until stopped. `Simulation::stop` unparks
    /// the thread.
    fn pause(&self, duration: Duration) {
        let deadline = Instant::now().checked_add(duration);
        while !self.stop.load(Ordering::Acquire) {
            match deadline.map(|d| d.saturating_duration_since(Instant::now())) {
                Some(left) if left.is_zero() => break,
                Some(left) => thread::park_timeout(left),
                None => thread::park(),
            }
        }
    }

    fn release(&mut self, tally: &mut ConsumerTally) -> Result<(), BankerError> {
        let released = self.banker.release_all(self.id)?;
        tally.releases += 1;
        self.emit(SimEvent::Released {
            consumer: self.id,
            released,
        });
        Ok(())
    }

    fn emit(&self, event: SimEvent) {
        self.events.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SeededGenerator;
    use banker_engine::BankerConfig;

    fn consumer(
        banker: &Arc<Banker>,
        rounds: u64,
        retry: RetryPolicy,
    ) -> (Consumer<SeededGenerator>, crossbeam_channel::Receiver<SimEvent>) {
        let (tx, rx) = EventSink::bounded(64);
        let maximum = banker
            .snapshot()
            .unwrap()
            .maximum(ConsumerId(0))
            .unwrap()
            .clone();
        let c = Consumer {
            id: ConsumerId(0),
            banker: Arc::clone(banker),
            generator: SeededGenerator::new(5, ConsumerId(0), Duration::ZERO..=Duration::ZERO),
            maximum,
            events: tx,
            stop: Arc::new(AtomicBool::new(false)),
            rounds: Some(rounds),
            retry,
        };
        (c, rx)
    }

    fn lone_banker() -> Arc<Banker> {
        Arc::new(
            Banker::new(BankerConfig {
                available: ResourceVector::from_slice(&[3, 2]),
                maximum: vec![ResourceVector::from_slice(&[3, 2])],
            })
            .unwrap(),
        )
    }

    #[test]
    fn lone_consumer_is_always_granted() {
        let banker = lone_banker();
        let (c, rx) = consumer(&banker, 10, RetryPolicy::Backoff(Duration::ZERO));
        let tally = c.run().unwrap();
        assert_eq!(tally.requests, 10);
        assert_eq!(tally.granted, 10);
        assert_eq!(tally.releases, 10);

        let s = banker.snapshot().unwrap();
        assert_eq!(s.available(), s.total());

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 30);
        assert!(matches!(events[0], SimEvent::Requested { .. }));
        assert!(matches!(events[2], SimEvent::Released { .. }));
        for round in events.chunks(3) {
            match (&round[1], &round[2]) {
                (
                    SimEvent::Granted {
                        request,
                        allocation,
                        ..
                    },
                    SimEvent::Released { released, .. },
                ) => {
                    assert_eq!(allocation, request);
                    assert_eq!(released, allocation);
                }
                other => panic!("unexpected round {other:?}"),
            }
        }
    }

    #[test]
    fn stop_flag_ends_before_first_round() {
        let banker = lone_banker();
        let (c, rx) = consumer(&banker, 10, RetryPolicy::WaitForRelease(Duration::ZERO));
        c.stop.store(true, Ordering::Release);
        let tally = c.run().unwrap();
        assert_eq!(tally, ConsumerTally::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn closed_banker_ends_blocking_consumer() {
        let banker = lone_banker();
        banker.close();
        let (c, _rx) = consumer(&banker, 3, RetryPolicy::WaitForRelease(Duration::from_secs(30)));
        let tally = c.run().unwrap();
        assert_eq!(tally.requests, 3);
        assert_eq!(tally.granted, 0);
        assert_eq!(tally.denied, 0);
        assert_eq!(tally.cancelled, 3);
        assert_eq!(tally.granted + tally.denied + tally.cancelled, tally.requests);
    }

    /// Always asks for the same units.
    struct Fixed(ResourceVector);

    impl ClaimGenerator for Fixed {
        fn maximum_claim(&mut self, _: &ResourceVector) -> ResourceVector {
            self.0.clone()
        }

        fn request(&mut self, _: &ResourceVector) -> ResourceVector {
            self.0.clone()
        }

        fn hold_time(&mut self) -> Duration {
            Duration::ZERO
        }
    }

    /// Consumer 0 facing a banker whose whole supply consumer 1 holds.
    fn starved(rounds: u64, backoff: Duration) -> Consumer<Fixed> {
        let full = ResourceVector::from_slice(&[3, 2]);
        let banker = Arc::new(
            Banker::new(BankerConfig {
                available: full.clone(),
                maximum: vec![full.clone(), full.clone()],
            })
            .unwrap(),
        );
        assert!(banker
            .request_resources(ConsumerId(1), &full)
            .unwrap()
            .is_granted());
        let (events, _) = EventSink::bounded(64);
        Consumer {
            id: ConsumerId(0),
            banker,
            generator: Fixed(full.clone()),
            maximum: full,
            events,
            stop: Arc::new(AtomicBool::new(false)),
            rounds: Some(rounds),
            retry: RetryPolicy::Backoff(backoff),
        }
    }

    #[test]
    fn denied_consumer_waits_out_its_backoff() {
        let c = starved(3, Duration::from_millis(40));
        let start = Instant::now();
        let tally = c.run().unwrap();
        assert_eq!(tally.requests, 3);
        assert_eq!(tally.denied, 3);
        // No pause after the final round.
        assert!(start.elapsed() >= Duration::from_millis(80));
    }

    #[test]
    fn stop_cuts_a_backoff_short() {
        let c = starved(2, Duration::from_secs(60));
        let stop = Arc::clone(&c.stop);
        let banker = Arc::clone(&c.banker);
        let start = Instant::now();
        let handle = thread::spawn(move || c.run());
        while banker.metrics().unwrap().requests == 0 {
            thread::sleep(Duration::from_millis(1));
        }
        stop.store(true, Ordering::Release);
        handle.thread().unpark();
        let tally = handle.join().unwrap().unwrap();
        assert!(start.elapsed() < Duration::from_secs(30));
        assert_eq!(tally.requests, 1);
        assert_eq!(tally.denied, 1);
    }
}
