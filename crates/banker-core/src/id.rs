//! Strongly-typed consumer identifier.

use std::fmt;

/// Identifies a consumer (a process or thread competing for resources).
///
/// Consumers are registered when the allocation state is built and
/// assigned sequential IDs. `ConsumerId(n)` is the n-th row of the
/// maximum, allocation and need matrices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(pub u32);

impl ConsumerId {
    /// Row index of this consumer in the per-consumer matrices.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ConsumerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_raw_value() {
        assert_eq!(ConsumerId(7).index(), 7);
        assert_eq!(ConsumerId::from(3), ConsumerId(3));
        assert_eq!(ConsumerId(12).to_string(), "12");
    }
}
