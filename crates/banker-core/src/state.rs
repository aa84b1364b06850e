//! The allocation state: available vector plus the per-consumer maximum,
//! allocation and need matrices.
//!
//! [`AllocationState`] is plain data. It enforces its own invariants on
//! every constructor and mutation, but it does not synchronize anything:
//! the engine owns one behind a mutex and is the only code that mutates
//! it once consumers are running.
//!
//! Invariants, for every consumer `i` and class `j`:
//!
//! ```text
//! need[i][j]  = maximum[i][j] - allocation[i][j]      (never negative)
//! total[j]    = available[j] + Σ_i allocation[i][j]   (fixed at construction)
//! ```

use crate::error::StateError;
use crate::id::ConsumerId;
use crate::safety;
use crate::vector::ResourceVector;

/// Available, maximum, allocation and need for a fixed set of consumers
/// and resource classes.
///
/// Dimensions are validated once at construction. Every per-consumer
/// vector has exactly [`num_classes`](Self::num_classes) entries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationState {
    available: ResourceVector,
    total: ResourceVector,
    maximum: Vec<ResourceVector>,
    allocation: Vec<ResourceVector>,
    need: Vec<ResourceVector>,
}

impl AllocationState {
    /// Build the startup state: nothing allocated, `need = maximum`.
    ///
    /// # Errors
    ///
    /// - [`StateError::NoResourceClasses`] if `available` is empty.
    /// - [`StateError::DimensionMismatch`] if a claim has the wrong length.
    /// - [`StateError::ClaimExceedsSupply`] if a claim exceeds `available`
    ///   (such a consumer could never complete).
    pub fn new(
        available: ResourceVector,
        maximum: Vec<ResourceVector>,
    ) -> Result<Self, StateError> {
        check_classes(&available, &maximum, "maximum")?;
        for (i, claim) in maximum.iter().enumerate() {
            if let Some(class) = claim.first_exceeding(&available) {
                return Err(StateError::ClaimExceedsSupply {
                    consumer: ConsumerId(i as u32),
                    class,
                    claim: claim[class],
                    supply: available[class],
                });
            }
        }

        let allocation = vec![ResourceVector::zeros(available.len()); maximum.len()];
        Ok(Self {
            total: available.clone(),
            need: maximum.clone(),
            available,
            maximum,
            allocation,
        })
    }

    /// Build a state with resources already held.
    ///
    /// Total supply is derived as `available + Σ allocation`. Claims above
    /// that total are accepted; they leave the state unsafe rather than
    /// malformed.
    ///
    /// # Errors
    ///
    /// - [`StateError::NoResourceClasses`] if `available` is empty.
    /// - [`StateError::DimensionMismatch`] / [`StateError::ConsumerCountMismatch`]
    ///   on inconsistent shapes.
    /// - [`StateError::AllocationExceedsClaim`] if a consumer holds more
    ///   than it claims.
    /// - [`StateError::SupplyOverflow`] if a class total does not fit in
    ///   [`Units`](crate::Units).
    pub fn with_allocation(
        available: ResourceVector,
        maximum: Vec<ResourceVector>,
        allocation: Vec<ResourceVector>,
    ) -> Result<Self, StateError> {
        check_classes(&available, &maximum, "maximum")?;
        check_classes(&available, &allocation, "allocation")?;
        if allocation.len() != maximum.len() {
            return Err(StateError::ConsumerCountMismatch {
                what: "allocation",
                expected: maximum.len(),
                actual: allocation.len(),
            });
        }

        let mut need = Vec::with_capacity(maximum.len());
        for (i, (claim, held)) in maximum.iter().zip(&allocation).enumerate() {
            if let Some(class) = held.first_exceeding(claim) {
                return Err(StateError::AllocationExceedsClaim {
                    consumer: ConsumerId(i as u32),
                    class,
                    held: held[class],
                    claim: claim[class],
                });
            }
            // Cannot underflow: held <= claim was checked above.
            need.push(claim.checked_sub(held).unwrap_or_default());
        }

        let mut total = available.clone();
        for held in &allocation {
            total = total.checked_add(held).ok_or_else(|| StateError::SupplyOverflow {
                class: first_overflowing_class(&total, held),
            })?;
        }

        Ok(Self {
            available,
            total,
            maximum,
            allocation,
            need,
        })
    }

    /// Number of consumers (rows of each matrix).
    pub fn num_consumers(&self) -> usize {
        self.maximum.len()
    }

    /// Number of resource classes (length of every vector).
    pub fn num_classes(&self) -> usize {
        self.available.len()
    }

    /// All consumer IDs in ascending order.
    pub fn consumers(&self) -> impl Iterator<Item = ConsumerId> {
        (0..self.num_consumers() as u32).map(ConsumerId)
    }

    /// Currently unallocated units per class.
    pub fn available(&self) -> &ResourceVector {
        &self.available
    }

    /// Fixed total supply per class.
    pub fn total(&self) -> &ResourceVector {
        &self.total
    }

    /// Maximum claim of `consumer`.
    pub fn maximum(&self, consumer: ConsumerId) -> Result<&ResourceVector, StateError> {
        self.row(consumer).map(|i| &self.maximum[i])
    }

    /// Units currently held by `consumer`.
    pub fn allocation(&self, consumer: ConsumerId) -> Result<&ResourceVector, StateError> {
        self.row(consumer).map(|i| &self.allocation[i])
    }

    /// Units `consumer` may still request.
    pub fn need(&self, consumer: ConsumerId) -> Result<&ResourceVector, StateError> {
        self.row(consumer).map(|i| &self.need[i])
    }

    /// The full allocation matrix, one row per consumer.
    pub fn allocation_matrix(&self) -> &[ResourceVector] {
        &self.allocation
    }

    /// The full need matrix, one row per consumer.
    pub fn need_matrix(&self) -> &[ResourceVector] {
        &self.need
    }

    /// Whether the current state is safe.
    pub fn is_safe(&self) -> bool {
        safety::is_safe(&self.available, &self.allocation, &self.need)
    }

    /// A completion order witnessing safety, or `None` if unsafe.
    pub fn safe_sequence(&self) -> Option<Vec<ConsumerId>> {
        safety::safe_sequence(&self.available, &self.allocation, &self.need)
    }

    /// Resolve `consumer` to a row index.
    pub fn row(&self, consumer: ConsumerId) -> Result<usize, StateError> {
        let i = consumer.index();
        if i < self.num_consumers() {
            Ok(i)
        } else {
            Err(StateError::UnknownConsumer {
                consumer,
                consumers: self.num_consumers(),
            })
        }
    }

    /// Check that `v` has one entry per resource class.
    pub fn check_len(&self, v: &ResourceVector, what: &str) -> Result<(), StateError> {
        if v.len() == self.num_classes() {
            Ok(())
        } else {
            Err(StateError::DimensionMismatch {
                what: what.to_string(),
                expected: self.num_classes(),
                actual: v.len(),
            })
        }
    }

    /// Move `units` from the free pool to `consumer`:
    /// `available -= units`, `allocation += units`, `need -= units`.
    ///
    /// All-or-nothing: if `units` exceeds `need` or `available` in any
    /// class the state is left untouched and an error is returned. No
    /// safety check is performed here.
    pub fn take(&mut self, consumer: ConsumerId, units: &ResourceVector) -> Result<(), StateError> {
        let i = self.row(consumer)?;
        self.check_len(units, "request")?;

        let (Some(available), Some(allocation), Some(need)) = (
            self.available.checked_sub(units),
            self.allocation[i].checked_add(units),
            self.need[i].checked_sub(units),
        ) else {
            return Err(StateError::InvariantViolated {
                reason: format!(
                    "cannot move {units} to consumer {consumer}: need {}, available {}",
                    self.need[i], self.available
                ),
            });
        };

        self.available = available;
        self.allocation[i] = allocation;
        self.need[i] = need;
        Ok(())
    }

    /// Return `units` from `consumer` to the free pool:
    /// `available += units`, `allocation -= units`, `need += units`.
    ///
    /// Exact inverse of [`take`](Self::take). All-or-nothing: if `units`
    /// exceeds what the consumer holds in any class, nothing changes.
    pub fn give_back(
        &mut self,
        consumer: ConsumerId,
        units: &ResourceVector,
    ) -> Result<(), StateError> {
        let i = self.row(consumer)?;
        self.check_len(units, "release")?;

        let (Some(available), Some(allocation), Some(need)) = (
            self.available.checked_add(units),
            self.allocation[i].checked_sub(units),
            self.need[i].checked_add(units),
        ) else {
            return Err(StateError::InvariantViolated {
                reason: format!(
                    "consumer {consumer} cannot return {units}: holds {}",
                    self.allocation[i]
                ),
            });
        };

        self.available = available;
        self.allocation[i] = allocation;
        self.need[i] = need;
        Ok(())
    }

    /// Re-verify every invariant, reporting the first violation.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        let classes = self.num_classes();
        for (i, ((claim, held), need)) in self
            .maximum
            .iter()
            .zip(&self.allocation)
            .zip(&self.need)
            .enumerate()
        {
            if claim.len() != classes || held.len() != classes || need.len() != classes {
                return Err(StateError::InvariantViolated {
                    reason: format!("consumer {i} has vectors of the wrong length"),
                });
            }
            if claim.checked_sub(held).as_ref() != Some(need) {
                return Err(StateError::InvariantViolated {
                    reason: format!(
                        "consumer {i}: need {need} != maximum {claim} - allocation {held}"
                    ),
                });
            }
        }

        for class in 0..classes {
            let held: u64 = self.allocation.iter().map(|a| u64::from(a[class])).sum();
            let accounted = u64::from(self.available[class]) + held;
            if accounted != u64::from(self.total[class]) {
                return Err(StateError::InvariantViolated {
                    reason: format!(
                        "class {class}: available {} + allocated {held} != total {}",
                        self.available[class], self.total[class]
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Validate that `available` is non-empty and every row matches its length.
fn check_classes(
    available: &ResourceVector,
    rows: &[ResourceVector],
    matrix: &str,
) -> Result<(), StateError> {
    if available.is_empty() {
        return Err(StateError::NoResourceClasses);
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != available.len() {
            return Err(StateError::DimensionMismatch {
                what: format!("{matrix}[{i}]"),
                expected: available.len(),
                actual: row.len(),
            });
        }
    }
    Ok(())
}

fn first_overflowing_class(a: &ResourceVector, b: &ResourceVector) -> usize {
    a.iter()
        .zip(b.iter())
        .position(|(x, y)| x.checked_add(y).is_none())
        .unwrap_or(0)
}
