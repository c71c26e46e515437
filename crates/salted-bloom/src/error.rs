//! Error types for the Bloom filter crate

use thiserror::Error;

use crate::domain::HashAlgorithm;

/// Errors that can occur when building, combining or querying filters
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error(
        "Incompatible filters: capacity {left_capacity} vs {right_capacity}, \
         hash rounds {left_rounds} vs {right_rounds}, \
         algorithm {left_algorithm:?} vs {right_algorithm:?}"
    )]
    IncompatibleFilters {
        left_capacity: usize,
        right_capacity: usize,
        left_rounds: usize,
        right_rounds: usize,
        left_algorithm: HashAlgorithm,
        right_algorithm: HashAlgorithm,
    },

    #[error("Cardinality estimate unavailable: all {capacity} bits are set")]
    SaturatedEstimate { capacity: usize },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl FilterError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout the crate
pub type FilterResult<T> = Result<T, FilterError>;
