//! The textbook Banker's example, driven through the coordinator.
//!
//! Five consumers, three classes, total `[10, 5, 7]`, available `[3, 3, 2]`.
//! The follow-up requests reproduce the classic walkthrough: consumer 1's
//! `[1, 0, 2]` is granted, consumer 4's `[3, 3, 0]` does not fit, and
//! consumer 0's `[0, 2, 0]` fits but would leave the system unsafe.

use banker_core::ConsumerId;
use banker_engine::{Banker, DenyReason, RequestOutcome};
use banker_test_utils::{assert_consistent, classic_state, classic_three_consumer_state, rv};

#[test]
fn initial_state_is_safe() {
    let state = classic_state();
    assert!(state.is_safe());
    let order: Vec<u32> = state.safe_sequence().unwrap().iter().map(|c| c.0).collect();
    assert_eq!(order, vec![1, 3, 0, 2, 4]);
}

#[test]
fn textbook_walkthrough() {
    let banker = Banker::from_state(classic_state());

    // Consumer 1 asks for [1, 0, 2]: fits, and 1, 3, 0, 2, 4 still completes.
    let outcome = banker
        .request_resources(ConsumerId(1), &rv(&[1, 0, 2]))
        .unwrap();
    assert_eq!(outcome, RequestOutcome::Granted);
    let after_grant = banker.snapshot().unwrap();
    assert_eq!(after_grant.available(), &rv(&[2, 3, 0]));
    assert_eq!(after_grant.allocation(ConsumerId(1)).unwrap(), &rv(&[3, 0, 2]));
    assert_eq!(after_grant.need(ConsumerId(1)).unwrap(), &rv(&[0, 2, 0]));
    assert!(after_grant.is_safe());
    assert_consistent(&after_grant);

    // Consumer 4 asks for [3, 3, 0]: within its need, but only [2, 3, 0] is free.
    let outcome = banker
        .request_resources(ConsumerId(4), &rv(&[3, 3, 0]))
        .unwrap();
    assert_eq!(
        outcome,
        RequestOutcome::Denied(DenyReason::InsufficientAvailable)
    );
    assert_eq!(banker.snapshot().unwrap(), after_grant);

    // Consumer 0 asks for [0, 2, 0]: fits, but leaves available [2, 1, 0]
    // from which no consumer can finish.
    let outcome = banker
        .request_resources(ConsumerId(0), &rv(&[0, 2, 0]))
        .unwrap();
    assert_eq!(outcome, RequestOutcome::Denied(DenyReason::UnsafeState));
    assert_eq!(banker.snapshot().unwrap(), after_grant);

    let m = banker.metrics().unwrap();
    assert_eq!(m.requests, 3);
    assert_eq!(m.granted, 1);
    assert_eq!(m.denied_insufficient, 1);
    assert_eq!(m.denied_unsafe, 1);
    assert_eq!(m.safety_checks, 2);
}

#[test]
fn request_above_need_in_classic_state() {
    let banker = Banker::from_state(classic_state());
    let before = banker.snapshot().unwrap();
    // Consumer 2's need is [6, 0, 0]; any units of class 1 exceed it.
    let outcome = banker
        .request_resources(ConsumerId(2), &rv(&[0, 1, 0]))
        .unwrap();
    assert_eq!(outcome, RequestOutcome::Denied(DenyReason::ExceedsNeed));
    assert_eq!(banker.snapshot().unwrap(), before);
}

#[test]
fn three_consumer_variant_is_unsafe_and_rolls_back() {
    let state = classic_three_consumer_state();
    assert!(!state.is_safe());
    let before = state.clone();

    let banker = Banker::from_state(state);
    let outcome = banker
        .request_resources(ConsumerId(1), &rv(&[1, 0, 2]))
        .unwrap();
    assert_eq!(outcome, RequestOutcome::Denied(DenyReason::UnsafeState));
    assert_eq!(banker.snapshot().unwrap(), before);
}

#[test]
fn releases_restore_full_supply() {
    let banker = Banker::from_state(classic_state());
    for c in 0..5 {
        banker.release_all(ConsumerId(c)).unwrap();
    }
    let s = banker.snapshot().unwrap();
    assert_eq!(s.available(), &rv(&[10, 5, 7]));
    assert_eq!(s.available(), s.total());
    assert_consistent(&s);
}
