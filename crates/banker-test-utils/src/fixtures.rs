//! Reusable allocation-state fixtures.
//!
//! - [`classic_state`]: the five-consumer textbook example, total `[10, 5, 7]`. Safe.
//! - [`classic_three_consumer_state`]: its first three rows only. Unsafe.
//! - [`circular_wait_state`]: two consumers each waiting on the other. Unsafe.
//! - [`single_class_state`]: one class, configurable claims, nothing held.

use banker_core::{AllocationState, ResourceVector};

/// Shorthand for building a [`ResourceVector`] from a slice.
pub fn rv(units: &[u32]) -> ResourceVector {
    ResourceVector::from_slice(units)
}

fn rows(rows: &[[u32; 3]]) -> Vec<ResourceVector> {
    rows.iter().map(|r| rv(r)).collect()
}

/// The textbook Banker's example.
///
/// | consumer | maximum   | allocation | need      |
/// |----------|-----------|------------|-----------|
/// | 0        | [7, 5, 3] | [0, 1, 0]  | [7, 4, 3] |
/// | 1        | [3, 2, 2] | [2, 0, 0]  | [1, 2, 2] |
/// | 2        | [9, 0, 2] | [3, 0, 2]  | [6, 0, 0] |
/// | 3        | [2, 2, 2] | [2, 1, 1]  | [0, 1, 1] |
/// | 4        | [4, 3, 3] | [0, 0, 2]  | [4, 3, 1] |
///
/// Available `[3, 3, 2]`, total `[10, 5, 7]`. The scan completes
/// consumers in the order 1, 3, 0, 2, 4.
pub fn classic_state() -> AllocationState {
    AllocationState::with_allocation(
        rv(&[3, 3, 2]),
        rows(&[[7, 5, 3], [3, 2, 2], [9, 0, 2], [2, 2, 2], [4, 3, 3]]),
        rows(&[[0, 1, 0], [2, 0, 0], [3, 0, 2], [2, 1, 1], [0, 0, 2]]),
    )
    .expect("classic fixture is well-formed")
}

/// The first three consumers of [`classic_state`] with the same available
/// vector.
///
/// Total is `[8, 4, 4]`. After consumer 1 finishes, work is `[5, 3, 2]`,
/// which covers neither consumer 0's need `[7, 4, 3]` nor consumer 2's
/// `[6, 0, 0]`, so the state is unsafe.
pub fn classic_three_consumer_state() -> AllocationState {
    AllocationState::with_allocation(
        rv(&[3, 3, 2]),
        rows(&[[7, 5, 3], [3, 2, 2], [9, 0, 2]]),
        rows(&[[0, 1, 0], [2, 0, 0], [3, 0, 2]]),
    )
    .expect("three-consumer fixture is well-formed")
}

/// Two consumers, two classes, nothing free: each holds one unit the other
/// still needs.
pub fn circular_wait_state() -> AllocationState {
    AllocationState::with_allocation(
        rv(&[0, 0]),
        vec![rv(&[1, 1]), rv(&[1, 1])],
        vec![rv(&[1, 0]), rv(&[0, 1])],
    )
    .expect("circular-wait fixture is well-formed")
}

/// One resource class with `supply` units and the given claims, nothing
/// allocated.
pub fn single_class_state(supply: u32, claims: &[u32]) -> AllocationState {
    AllocationState::new(rv(&[supply]), claims.iter().map(|&c| rv(&[c])).collect())
        .expect("single-class claims must not exceed supply")
}
