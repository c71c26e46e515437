//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Core Bloom filter implementation
//! - Hash round derivation
//! - Sizing and false-positive math
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No locking

pub mod bloom_filter;
pub mod config;
pub mod hash_functions;
pub mod parameters;

pub use bloom_filter::{BloomFilter, CardinalityEstimate};
pub use config::{BloomConfig, BloomConfigBuilder};
pub use hash_functions::HashAlgorithm;
pub use parameters::{calculate_fpr, calculate_optimal_parameters, OptimalParameters};
