//! Test utilities for Banker development.
//!
//! Provides standard allocation-state fixtures (the textbook example and
//! some deliberately unsafe states) and an independent brute-force safety
//! oracle for cross-checking the scan in `banker_core::safety`.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod oracle;

pub use fixtures::{
    circular_wait_state, classic_state, classic_three_consumer_state, rv, single_class_state,
};
pub use oracle::{assert_consistent, brute_force_is_safe};
