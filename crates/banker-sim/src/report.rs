//! End-of-run summary.

use std::fmt;
use std::time::Duration;

use banker_core::{AllocationState, ConsumerId};
use banker_engine::BankerMetrics;
use indexmap::IndexMap;

/// What one consumer did over a run.
///
/// Every request ends in exactly one of `granted`, `denied` or
/// `cancelled`, so those three always sum to `requests`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsumerTally {
    /// Requests submitted.
    pub requests: u64,
    /// Requests granted.
    pub granted: u64,
    /// Requests denied, including timed-out waits.
    pub denied: u64,
    /// Blocking requests that hit their deadline.
    pub timed_out: u64,
    /// Blocking requests cut short because the banker was closed.
    pub cancelled: u64,
    /// Releases performed.
    pub releases: u64,
}

/// Report returned by [`Simulation::join`](crate::Simulation::join).
#[derive(Clone, Debug)]
pub struct SimReport {
    /// Per-consumer tallies in consumer order.
    pub consumers: IndexMap<ConsumerId, ConsumerTally>,
    /// Banker counters at the end of the run.
    pub metrics: BankerMetrics,
    /// Committed state at the end of the run.
    pub final_state: AllocationState,
    /// Wall time from spawn to join.
    pub elapsed: Duration,
    /// Events discarded because the event buffer was full.
    pub dropped_events: u64,
}

impl SimReport {
    /// Sum of all consumer tallies.
    pub fn totals(&self) -> ConsumerTally {
        self.consumers
            .values()
            .fold(ConsumerTally::default(), |mut acc, t| {
                acc.requests += t.requests;
                acc.granted += t.granted;
                acc.denied += t.denied;
                acc.timed_out += t.timed_out;
                acc.cancelled += t.cancelled;
                acc.releases += t.releases;
                acc
            })
    }
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} consumers, {:.2?} elapsed",
            self.consumers.len(),
            self.elapsed
        )?;
        for (id, t) in &self.consumers {
            writeln!(
                f,
                "  consumer {id}: {} requests, {} granted, {} denied ({} timed out), {} cancelled",
                t.requests, t.granted, t.denied, t.timed_out, t.cancelled
            )?;
        }
        let m = &self.metrics;
        writeln!(
            f,
            "  banker: {} evaluations, {} granted, denied {} need / {} available / {} unsafe",
            m.requests, m.granted, m.denied_exceeds_need, m.denied_insufficient, m.denied_unsafe
        )?;
        if self.dropped_events > 0 {
            writeln!(f, "  {} events dropped", self.dropped_events)?;
        }
        write!(
            f,
            "  final available {} of {}",
            self.final_state.available(),
            self.final_state.total()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::ResourceVector;

    #[test]
    fn totals_sum_in_order() {
        let mut consumers = IndexMap::new();
        consumers.insert(
            ConsumerId(1),
            ConsumerTally {
                requests: 3,
                granted: 2,
                denied: 1,
                timed_out: 1,
                cancelled: 0,
                releases: 2,
            },
        );
        consumers.insert(
            ConsumerId(0),
            ConsumerTally {
                requests: 2,
                granted: 1,
                denied: 0,
                timed_out: 0,
                cancelled: 1,
                releases: 1,
            },
        );
        let state = AllocationState::new(
            ResourceVector::from_slice(&[2]),
            vec![ResourceVector::from_slice(&[1]), ResourceVector::from_slice(&[2])],
        )
        .unwrap();
        let report = SimReport {
            consumers,
            metrics: BankerMetrics::default(),
            final_state: state,
            elapsed: Duration::from_millis(5),
            dropped_events: 0,
        };

        let t = report.totals();
        assert_eq!(t.requests, 5);
        assert_eq!(t.granted, 3);
        assert_eq!(t.cancelled, 1);
        assert_eq!(t.granted + t.denied + t.cancelled, t.requests);
        assert_eq!(t.releases, 3);

        let text = report.to_string();
        let first = text.find("consumer 1:").unwrap();
        let second = text.find("consumer 0:").unwrap();
        assert!(first < second);
        assert!(text.ends_with("final available [2] of [2]"));
        assert!(!text.contains("dropped"));
    }
}
