//! Multi-threaded consumer driver for the [`Banker`](banker_engine::Banker).
//!
//! Each simulated consumer runs on its own named thread. At startup it
//! declares a random maximum claim (each class uniform in
//! `0..=available`), then repeatedly asks for a random slice of its need,
//! holds a grant for a random time, and releases everything it holds.
//!
//! ```text
//!  Simulation::spawn            consumer threads (N)                  Banker
//!        |                             |                                |
//!        |--ClaimDeclared x N--> events|                                |
//!        |--spawn "banker-consumer-i"->|                                |
//!        |                             |--request_resources[_timeout]-->|
//!        |                     events<-|  Requested / Granted / Denied  |
//!        |                             |  backoff or hold (park_timeout)|
//!        |                             |--release_all------------------>|
//!        |                     events<-|  Released                      |
//!        |--stop(): flag, close(), unpark                               |
//!        |--join() -> SimReport                                         |
//! ```
//!
//! Events go through a bounded channel that consumers never block on;
//! events that do not fit are dropped and counted in the report.
//!
//! All randomness comes from a [`ClaimGenerator`]. The default
//! [`SeededGenerator`] makes a run's claims and requests reproducible
//! from a single seed.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod consumer;
pub mod event;
pub mod generator;
pub mod report;
pub mod simulation;

pub use config::{RetryPolicy, SimConfig, SimError};
pub use consumer::ConsumerPhase;
pub use event::SimEvent;
pub use generator::{ClaimGenerator, SeededGenerator};
pub use report::{ConsumerTally, SimReport};
pub use simulation::Simulation;
