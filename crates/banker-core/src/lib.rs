//! Core types for the Banker resource allocation manager.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data model shared by every other crate in the workspace:
//! consumer IDs, resource vectors, the [`AllocationState`] matrices and
//! their invariants, and the Banker's safety check.
//!
//! Nothing here is synchronized. The state is plain data; the exclusive
//! request/release protocol lives in `banker-engine`.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod safety;
pub mod state;
pub mod vector;

pub use error::StateError;
pub use id::ConsumerId;
pub use safety::{is_safe, safe_sequence};
pub use state::AllocationState;
pub use vector::{ResourceVector, Units};
