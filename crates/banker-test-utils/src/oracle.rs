//! Independent safety oracle and state assertions.
//!
//! [`brute_force_is_safe`] shares no code with the production scan. It
//! explores every completion ordering depth-first and answers whether at
//! least one of them lets every consumer finish. Exponential in the
//! number of consumers; keep fixtures small (≤ 7 consumers).

use banker_core::{AllocationState, ResourceVector};

/// Whether any ordering of consumers can each receive its full need and
/// complete.
pub fn brute_force_is_safe(
    available: &ResourceVector,
    allocation: &[ResourceVector],
    need: &[ResourceVector],
) -> bool {
    let work: Vec<u64> = available.iter().map(u64::from).collect();
    let mut done = vec![false; need.len()];
    search(&work, allocation, need, &mut done, need.len())
}

fn search(
    work: &[u64],
    allocation: &[ResourceVector],
    need: &[ResourceVector],
    done: &mut [bool],
    remaining: usize,
) -> bool {
    if remaining == 0 {
        return true;
    }
    for i in 0..need.len() {
        if done[i] {
            continue;
        }
        let fits = need[i]
            .as_slice()
            .iter()
            .zip(work)
            .all(|(&n, &w)| u64::from(n) <= w);
        if !fits {
            continue;
        }
        let next: Vec<u64> = work
            .iter()
            .zip(allocation[i].as_slice())
            .map(|(&w, &a)| w + u64::from(a))
            .collect();
        done[i] = true;
        let found = search(&next, allocation, need, done, remaining - 1);
        done[i] = false;
        if found {
            return true;
        }
    }
    false
}

/// Panic with a descriptive message if `state` violates any invariant.
pub fn assert_consistent(state: &AllocationState) {
    if let Err(e) = state.check_invariants() {
        panic!("allocation state inconsistent: {e}\n{state:#?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn oracle(state: &AllocationState) -> bool {
        brute_force_is_safe(
            state.available(),
            state.allocation_matrix(),
            state.need_matrix(),
        )
    }

    #[test]
    fn oracle_agrees_on_fixtures() {
        assert!(oracle(&classic_state()));
        assert!(!oracle(&classic_three_consumer_state()));
        assert!(!oracle(&circular_wait_state()));
        assert!(oracle(&single_class_state(3, &[3, 3, 3])));
    }

    #[test]
    fn fixtures_are_consistent() {
        assert_consistent(&classic_state());
        assert_consistent(&classic_three_consumer_state());
        assert_consistent(&circular_wait_state());
        assert_eq!(classic_state().total(), &rv(&[10, 5, 7]));
        assert_eq!(classic_three_consumer_state().total(), &rv(&[8, 4, 4]));
    }
}
