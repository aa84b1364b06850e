//! Error types for allocation state construction and validation.

use crate::id::ConsumerId;
use crate::vector::Units;

/// Errors building, querying or validating an [`AllocationState`](crate::AllocationState).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// The available vector has zero resource classes.
    #[error("at least one resource class is required")]
    NoResourceClasses,

    /// A vector's length differs from the number of resource classes.
    #[error("{what} has {actual} resource classes, expected {expected}")]
    DimensionMismatch {
        /// Which vector was malformed (e.g. `"maximum[2]"`).
        what: String,
        /// Number of classes the state was built with.
        expected: usize,
        /// Length of the offending vector.
        actual: usize,
    },

    /// The per-consumer matrices do not have the same number of rows.
    #[error("{what} has {actual} consumers, expected {expected}")]
    ConsumerCountMismatch {
        /// Which matrix was malformed.
        what: &'static str,
        /// Number of consumers in the maximum matrix.
        expected: usize,
        /// Rows in the offending matrix.
        actual: usize,
    },

    /// A consumer ID does not name a row of the state.
    #[error("unknown consumer {consumer} (state has {consumers} consumers)")]
    UnknownConsumer {
        /// The offending ID.
        consumer: ConsumerId,
        /// Number of consumers in the state.
        consumers: usize,
    },

    /// A maximum claim exceeds the total supply of a class.
    #[error("consumer {consumer} claims {claim} of class {class}, but only {supply} exist")]
    ClaimExceedsSupply {
        /// Consumer making the claim.
        consumer: ConsumerId,
        /// Resource class index.
        class: usize,
        /// Claimed units.
        claim: Units,
        /// Total supply of the class.
        supply: Units,
    },

    /// An initial allocation exceeds the consumer's maximum claim.
    #[error("consumer {consumer} holds {held} of class {class}, above its claim of {claim}")]
    AllocationExceedsClaim {
        /// Consumer holding the allocation.
        consumer: ConsumerId,
        /// Resource class index.
        class: usize,
        /// Units held.
        held: Units,
        /// Maximum claim for the class.
        claim: Units,
    },

    /// Total supply of a class does not fit in [`Units`].
    #[error("total supply of class {class} overflows")]
    SupplyOverflow {
        /// Resource class index.
        class: usize,
    },

    /// A consistency check over the matrices failed.
    #[error("invariant violated: {reason}")]
    InvariantViolated {
        /// Description of the first violation found.
        reason: String,
    },
}
