//! Per-class resource count vectors.

use smallvec::SmallVec;
use std::fmt;
use std::ops::Index;

/// Unit count for one resource class.
pub type Units = u32;

/// An ordered, fixed-length vector of unit counts, one entry per
/// resource class.
///
/// Uses `SmallVec<[u32; 8]>` so states with up to 8 resource classes
/// never touch the heap for a vector. Wider configurations spill
/// transparently. Entries are unsigned, so "non-negative" is enforced
/// by the type; arithmetic goes through the `checked_*` helpers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourceVector(SmallVec<[Units; 8]>);

impl ResourceVector {
    /// A vector of `len` zeros.
    pub fn zeros(len: usize) -> Self {
        Self(SmallVec::from_elem(0, len))
    }

    /// Build a vector from a slice of unit counts.
    pub fn from_slice(units: &[Units]) -> Self {
        Self(SmallVec::from_slice(units))
    }

    /// Number of resource classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the vector has no resource classes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every entry is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&u| u == 0)
    }

    /// Entry for class `class`, or `None` if out of range.
    pub fn get(&self, class: usize) -> Option<Units> {
        self.0.get(class).copied()
    }

    /// Borrow the entries as a slice.
    pub fn as_slice(&self) -> &[Units] {
        &self.0
    }

    /// Iterate over the entries in class order.
    pub fn iter(&self) -> impl Iterator<Item = Units> + '_ {
        self.0.iter().copied()
    }

    /// Elementwise `self[j] <= other[j]` for every class.
    ///
    /// Vectors of different lengths are never comparable and return `false`.
    pub fn le(&self, other: &Self) -> bool {
        self.len() == other.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a <= b)
    }

    /// First class where `self[j] > other[j]`, if any.
    ///
    /// Only the overlapping prefix is compared.
    pub fn first_exceeding(&self, other: &Self) -> Option<usize> {
        self.0
            .iter()
            .zip(other.0.iter())
            .position(|(a, b)| a > b)
    }

    /// Elementwise sum, or `None` on length mismatch or overflow.
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        if self.len() != other.len() {
            return None;
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.checked_add(*b))
            .collect::<Option<SmallVec<_>>>()
            .map(Self)
    }

    /// Elementwise difference, or `None` on length mismatch or underflow.
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        if self.len() != other.len() {
            return None;
        }
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(a, b)| a.checked_sub(*b))
            .collect::<Option<SmallVec<_>>>()
            .map(Self)
    }
}

impl Index<usize> for ResourceVector {
    type Output = Units;

    fn index(&self, class: usize) -> &Units {
        &self.0[class]
    }
}

impl From<Vec<Units>> for ResourceVector {
    fn from(v: Vec<Units>) -> Self {
        Self(SmallVec::from_vec(v))
    }
}

impl<const N: usize> From<[Units; N]> for ResourceVector {
    fn from(v: [Units; N]) -> Self {
        Self::from_slice(&v)
    }
}

impl FromIterator<Units> for ResourceVector {
    fn from_iter<I: IntoIterator<Item = Units>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, u) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{u}")?;
        }
        write!(f, "]")
    }
}
