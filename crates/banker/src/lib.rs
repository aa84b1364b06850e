//! Banker: deadlock-avoidance resource allocation with the Banker's Algorithm.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the Banker sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use banker::prelude::*;
//!
//! let banker = Banker::new(BankerConfig {
//!     available: ResourceVector::from_slice(&[10, 5, 7]),
//!     maximum: vec![
//!         ResourceVector::from_slice(&[7, 5, 3]),
//!         ResourceVector::from_slice(&[3, 2, 2]),
//!     ],
//! })
//! .unwrap();
//!
//! let outcome = banker
//!     .request_resources(ConsumerId(1), &ResourceVector::from_slice(&[1, 0, 2]))
//!     .unwrap();
//! assert!(outcome.is_granted());
//!
//! // Asking for more than the declared claim allows is refused outright.
//! let outcome = banker
//!     .request_resources(ConsumerId(1), &ResourceVector::from_slice(&[3, 0, 0]))
//!     .unwrap();
//! assert_eq!(outcome, RequestOutcome::Denied(DenyReason::ExceedsNeed));
//!
//! banker
//!     .release_resources(ConsumerId(1), &ResourceVector::from_slice(&[1, 0, 2]))
//!     .unwrap();
//! let state = banker.snapshot().unwrap();
//! assert_eq!(state.available(), state.total());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `banker-core` | Resource vectors, allocation state, safety check |
//! | [`engine`] | `banker-engine` | The request/release coordinator |
//! | [`sim`] | `banker-sim` | Seeded multi-threaded consumer driver |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Resource vectors, the allocation state and the safety check
/// (`banker-core`).
pub use banker_core as types;

/// The [`engine::Banker`] coordinator, its configuration and outcomes
/// (`banker-engine`).
pub use banker_engine as engine;

/// Consumer-thread driver (`banker-sim`).
///
/// Spawn a [`sim::Simulation`] from a [`sim::SimConfig`] and collect a
/// [`sim::SimReport`].
pub use banker_sim as sim;

/// Common imports.
///
/// ```rust
/// use banker::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use banker_core::{AllocationState, ConsumerId, ResourceVector, StateError, Units};

    // Coordinator
    pub use banker_engine::{
        Banker, BankerConfig, BankerError, BankerMetrics, ConfigError, DenyReason,
        RequestOutcome, WaitOutcome,
    };

    // Driver
    pub use banker_sim::{RetryPolicy, SimConfig, SimEvent, SimReport, Simulation};
}
