//! The Banker's safety check.
//!
//! A state is *safe* when some ordering of consumers exists in which each
//! one can be handed its entire remaining need from what is free, run to
//! completion, and return everything it holds. The check simulates that:
//!
//! ```text
//! work   = available
//! repeat:
//!     i = lowest unfinished consumer with need[i] <= work
//!     if none: unsafe
//!     work += allocation[i]; finish i
//! until every consumer is finished: safe
//! ```
//!
//! Finishing a consumer only ever grows `work`, so a consumer that fits
//! stays fitting. Greedy selection therefore finds a complete order
//! whenever any complete order exists; which order it reports is an
//! artifact of the ascending scan.
//!
//! Cost is O(consumers² × classes) in the worst case.

use crate::id::ConsumerId;
use crate::vector::ResourceVector;

/// Whether the state described by the three inputs is safe.
///
/// Pure: reads its arguments and nothing else. Inputs with inconsistent
/// dimensions are reported unsafe rather than panicking.
pub fn is_safe(
    available: &ResourceVector,
    allocation: &[ResourceVector],
    need: &[ResourceVector],
) -> bool {
    safe_sequence(available, allocation, need).is_some()
}

/// The completion order found by the safety scan, or `None` if the state
/// is unsafe.
///
/// The returned order lists every consumer exactly once. It is one
/// witness of safety, not the only one.
pub fn safe_sequence(
    available: &ResourceVector,
    allocation: &[ResourceVector],
    need: &[ResourceVector],
) -> Option<Vec<ConsumerId>> {
    let classes = available.len();
    if allocation.len() != need.len()
        || allocation.iter().chain(need).any(|v| v.len() != classes)
    {
        return None;
    }

    // Widened so the pure function cannot overflow on unvalidated input.
    let mut work: Vec<u64> = available.iter().map(u64::from).collect();
    let mut finished = vec![false; need.len()];
    let mut order = Vec::with_capacity(need.len());

    while order.len() < need.len() {
        let next = (0..need.len()).find(|&i| {
            !finished[i] && need[i].iter().zip(&work).all(|(n, &w)| u64::from(n) <= w)
        })?;

        for (w, held) in work.iter_mut().zip(allocation[next].iter()) {
            *w += u64::from(held);
        }
        finished[next] = true;
        order.push(ConsumerId(next as u32));
    }

    Some(order)
}
