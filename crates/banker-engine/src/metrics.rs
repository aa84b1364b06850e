//! Cumulative coordinator counters.
//!
//! [`BankerMetrics`] is updated inside the critical section, so a copy
//! taken with [`Banker::metrics`](crate::Banker::metrics) is always
//! internally consistent with the state it was taken alongside.

/// Counters for every decision the coordinators have made.
///
/// A blocking request that waits and re-evaluates counts once per
/// evaluation in `requests` and in the matching outcome counter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BankerMetrics {
    /// Request evaluations.
    pub requests: u64,
    /// Requests committed.
    pub granted: u64,
    /// Denials because the request exceeded the consumer's need.
    pub denied_exceeds_need: u64,
    /// Denials because too few units were free.
    pub denied_insufficient: u64,
    /// Denials because the grant would have been unsafe (rolled back).
    pub denied_unsafe: u64,
    /// Successful releases, including zero releases.
    pub releases: u64,
    /// Releases rejected for exceeding the consumer's allocation.
    pub rejected_releases: u64,
    /// Blocking requests that hit their deadline.
    pub wait_timeouts: u64,
    /// Safety checks run on tentative grants.
    pub safety_checks: u64,
}

impl BankerMetrics {
    /// Total denials across all reasons.
    pub fn denied(&self) -> u64 {
        self.denied_exceeds_need + self.denied_insufficient + self.denied_unsafe
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = BankerMetrics::default();
        assert_eq!(m.requests, 0);
        assert_eq!(m.granted, 0);
        assert_eq!(m.denied(), 0);
        assert_eq!(m.releases, 0);
        assert_eq!(m.rejected_releases, 0);
        assert_eq!(m.wait_timeouts, 0);
        assert_eq!(m.safety_checks, 0);
    }

    #[test]
    fn denied_sums_reasons() {
        let m = BankerMetrics {
            denied_exceeds_need: 1,
            denied_insufficient: 4,
            denied_unsafe: 2,
            ..Default::default()
        };
        assert_eq!(m.denied(), 7);
    }
}
