//! Banker configuration and startup validation.
//!
//! [`BankerConfig`] is the builder-input for [`Banker::new`](crate::Banker::new).
//! [`validate()`](BankerConfig::validate) checks every structural
//! constraint up front; once a banker exists its dimensions are never
//! re-derived.

use banker_core::{AllocationState, ResourceVector, StateError};

/// Errors detected while validating a [`BankerConfig`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No consumers were configured.
    #[error("at least one consumer is required")]
    NoConsumers,
    /// The available vector or a claim is malformed.
    #[error("invalid allocation state: {0}")]
    State(#[from] StateError),
}

/// Startup configuration: free units per class and one maximum claim per
/// consumer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BankerConfig {
    /// Units of each class available at startup (the total supply).
    pub available: ResourceVector,
    /// Maximum claim per consumer; row `i` belongs to `ConsumerId(i)`.
    pub maximum: Vec<ResourceVector>,
}

impl BankerConfig {
    /// Check the configuration without building anything.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoConsumers`] if `maximum` is empty.
    /// - [`ConfigError::State`] if `available` is empty, a claim has the
    ///   wrong length, or a claim exceeds the supply of its class.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.build_state().map(drop)
    }

    pub(crate) fn build_state(&self) -> Result<AllocationState, ConfigError> {
        if self.maximum.is_empty() {
            return Err(ConfigError::NoConsumers);
        }
        Ok(AllocationState::new(
            self.available.clone(),
            self.maximum.clone(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banker_core::ConsumerId;

    fn rv(v: &[u32]) -> ResourceVector {
        ResourceVector::from_slice(v)
    }

    #[test]
    fn valid_config_passes() {
        let config = BankerConfig {
            available: rv(&[10, 5, 7]),
            maximum: vec![rv(&[7, 5, 3]), rv(&[3, 2, 2])],
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn empty_consumers_rejected() {
        let config = BankerConfig {
            available: rv(&[1]),
            maximum: vec![],
        };
        assert_eq!(config.validate(), Err(ConfigError::NoConsumers));
    }

    #[test]
    fn empty_classes_rejected() {
        let config = BankerConfig {
            available: rv(&[]),
            maximum: vec![rv(&[])],
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::State(StateError::NoResourceClasses))
        );
    }

    #[test]
    fn oversized_claim_rejected() {
        let config = BankerConfig {
            available: rv(&[2, 2]),
            maximum: vec![rv(&[2, 3])],
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::State(StateError::ClaimExceedsSupply {
                consumer: ConsumerId(0),
                class: 1,
                claim: 3,
                supply: 2,
            }))
        );
    }
}
