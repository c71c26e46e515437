//! Bloom filter configuration and validation
//!
//! # Example
//!
//! ```
//! use salted_bloom::domain::BloomConfigBuilder;
//!
//! let config = BloomConfigBuilder::new()
//!     .expected_elements(100)
//!     .target_fpr(0.01)
//!     .salt("tenant-a")
//!     .build()
//!     .expect("valid config");
//!
//! assert_eq!(config.capacity, 959);
//! assert_eq!(config.hash_rounds, 7);
//! ```

use serde::{Deserialize, Serialize};

use super::hash_functions::HashAlgorithm;
use super::parameters::calculate_optimal_parameters;
use crate::error::{FilterError, FilterResult};

/// Parameters fixed at filter construction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BloomConfig {
    /// Number of addressable bit slots (m)
    pub capacity: usize,
    /// Hash rounds per element (k)
    pub hash_rounds: usize,
    /// Mixed into every round to decorrelate filters
    #[serde(default)]
    pub salt: String,
    /// Digest primitive
    #[serde(default)]
    pub algorithm: HashAlgorithm,
}

impl Default for BloomConfig {
    fn default() -> Self {
        Self {
            capacity: 1024,
            hash_rounds: 3,
            salt: String::new(),
            algorithm: HashAlgorithm::default(),
        }
    }
}

impl BloomConfig {
    /// Create a new configuration with validation
    pub fn new(capacity: usize, hash_rounds: usize, salt: impl Into<String>) -> FilterResult<Self> {
        let config = Self {
            capacity,
            hash_rounds,
            salt: salt.into(),
            algorithm: HashAlgorithm::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FilterResult<()> {
        if self.capacity == 0 {
            return Err(FilterError::invalid("capacity must be positive"));
        }
        if self.hash_rounds == 0 {
            return Err(FilterError::invalid("hash_rounds must be positive"));
        }
        Ok(())
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> FilterResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| FilterError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> FilterResult<String> {
        serde_json::to_string(self).map_err(|e| FilterError::Serialization(e.to_string()))
    }
}

/// Builder for [`BloomConfig`]
///
/// Capacity and rounds can be given directly or derived from
/// `expected_elements` and `target_fpr`. Explicit values take precedence.
#[derive(Default)]
pub struct BloomConfigBuilder {
    capacity: Option<usize>,
    hash_rounds: Option<usize>,
    salt: Option<String>,
    algorithm: Option<HashAlgorithm>,
    expected_elements: Option<usize>,
    target_fpr: Option<f64>,
}

impl BloomConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn hash_rounds(mut self, rounds: usize) -> Self {
        self.hash_rounds = Some(rounds);
        self
    }

    pub fn salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = Some(salt.into());
        self
    }

    pub fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Expected number of distinct elements, used for derived sizing
    pub fn expected_elements(mut self, n: usize) -> Self {
        self.expected_elements = Some(n);
        self
    }

    /// Target false positive rate, must lie in (0, 1)
    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Build the config, validating all parameters
    pub fn build(self) -> FilterResult<BloomConfig> {
        let defaults = BloomConfig::default();

        let derived = match (self.expected_elements, self.target_fpr) {
            (Some(n), Some(fpr)) => Some(calculate_optimal_parameters(n, fpr)?),
            (Some(_), None) | (None, Some(_)) => {
                return Err(FilterError::invalid(
                    "expected_elements and target_fpr must be set together",
                ));
            }
            (None, None) => None,
        };

        let config = BloomConfig {
            capacity: self
                .capacity
                .or(derived.as_ref().map(|p| p.capacity))
                .unwrap_or(defaults.capacity),
            hash_rounds: self
                .hash_rounds
                .or(derived.as_ref().map(|p| p.hash_rounds))
                .unwrap_or(defaults.hash_rounds),
            salt: self.salt.unwrap_or(defaults.salt),
            algorithm: self.algorithm.unwrap_or(defaults.algorithm),
        };

        config.validate()?;
        Ok(config)
    }
}
