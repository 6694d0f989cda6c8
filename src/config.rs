//! Construction-time settings for a [`Dictionary`](crate::Dictionary).

use crate::error::ConfigError;
use crate::hashing::Seed;

pub const DEFAULT_BUCKETS: usize = 8;
pub const DEFAULT_ENTRIES: usize = 8;

/// Initial sizing and seed for a dictionary.
///
/// ```
/// use dense_dict::{DictConfig, Seed};
///
/// let cfg = DictConfig::default()
///     .with_initial_buckets(64)
///     .with_seed(Seed::new(1, 2));
/// assert!(cfg.validate().is_ok());
/// assert!(DictConfig::default().with_initial_buckets(12).validate().is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DictConfig {
    /// Bucket table size; a non-zero power of two.
    pub initial_buckets: usize,
    /// Entry vector capacity; non-zero.
    pub initial_entries: usize,
    pub seed: Seed,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            initial_buckets: DEFAULT_BUCKETS,
            initial_entries: DEFAULT_ENTRIES,
            seed: Seed::ZERO,
        }
    }
}

impl DictConfig {
    pub fn with_initial_buckets(mut self, n: usize) -> Self {
        self.initial_buckets = n;
        self
    }

    pub fn with_initial_entries(mut self, n: usize) -> Self {
        self.initial_entries = n;
        self
    }

    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_buckets == 0 {
            return Err(ConfigError::ZeroBucketCapacity);
        }
        if !self.initial_buckets.is_power_of_two() {
            return Err(ConfigError::BucketCapacityNotPowerOfTwo(self.initial_buckets));
        }
        if self.initial_entries == 0 {
            return Err(ConfigError::ZeroEntryCapacity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_fresh_dictionary_sizing() {
        let cfg = DictConfig::default();
        assert_eq!(cfg.initial_buckets, 8);
        assert_eq!(cfg.initial_entries, 8);
        assert_eq!(cfg.seed, Seed::ZERO);
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_bad_sizes() {
        let base = DictConfig::default();
        assert_eq!(
            base.with_initial_buckets(0).validate(),
            Err(ConfigError::ZeroBucketCapacity)
        );
        assert_eq!(
            base.with_initial_buckets(24).validate(),
            Err(ConfigError::BucketCapacityNotPowerOfTwo(24))
        );
        assert_eq!(
            base.with_initial_entries(0).validate(),
            Err(ConfigError::ZeroEntryCapacity)
        );
        assert_eq!(base.with_initial_buckets(1).validate(), Ok(()));
    }
}
