//! Exclusive request/release coordinators for the Banker's Algorithm.
//!
//! [`Banker`] owns one [`AllocationState`](banker_core::AllocationState)
//! behind a single mutex. Every request and every release runs entirely
//! inside that critical section, so the safety check always sees a
//! globally consistent state and no caller ever observes a tentative
//! grant that is still waiting on its safety verdict.
//!
//! ```text
//! consumer threads                       Banker
//!     |                                    |
//!     |--request_resources(id, req)------->| lock
//!     |                                    | req <= need?      else Denied(ExceedsNeed)
//!     |                                    | req <= available? else Denied(InsufficientAvailable)
//!     |                                    | take(id, req)
//!     |                                    | safe?             else give_back + Denied(UnsafeState)
//!     |<--Granted--------------------------| unlock
//!     |                                    |
//!     |--release_resources(id, rel)------->| lock, give_back, epoch += 1, unlock
//!     |                                    | notify_all ---> wakes request_resources_timeout waiters
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod banker;
pub mod config;
pub mod error;
pub mod metrics;
pub mod outcome;
mod release;
mod request;

pub use banker::Banker;
pub use config::{BankerConfig, ConfigError};
pub use error::BankerError;
pub use metrics::BankerMetrics;
pub use outcome::{DenyReason, RequestOutcome, WaitOutcome};
