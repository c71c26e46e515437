//! # Salted Bloom
//!
//! Probabilistic set membership with cardinality estimation and set algebra
//! across independently built filters.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `BloomFilter`: word-packed bit vector with salted hash rounds
//!   - `HashAlgorithm`: SHA-256 (default), SHA3-256 or MurmurHash3
//!   - `BloomConfig` / `BloomConfigBuilder`: validated construction parameters
//!
//! - **Shared Layer** (`shared`): `SharedBloomFilter`, a lock-guarded handle
//!   for filters mutated from several threads
//!
//! - **Metrics** (`metrics`): counters and the `MetricsRecorder` hook
//!
//! ## Invariants
//!
//! - No false negatives: after `add(e)`, `contains(e)` is true
//! - `add` is deterministic for a fixed `(salt, element, hash_rounds)`
//! - `union`/`intersect` require equal capacity, hash rounds and algorithm,
//!   and return a new filter, leaving both operands untouched
//!
//! ## Usage Example
//!
//! ```
//! use salted_bloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(20, 2, "")?;
//! filter.add("Iced Coffee");
//!
//! assert!(filter.contains("Iced Coffee"));
//! assert!(!filter.contains("Americano"));
//!
//! let estimate = filter.estimate_cardinality();
//! assert!(!estimate.is_saturated());
//! # Ok::<(), salted_bloom::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod metrics;
pub mod shared;

// Re-exports for convenience
pub use domain::{
    BloomConfig, BloomConfigBuilder, BloomFilter, CardinalityEstimate, HashAlgorithm,
};
pub use error::{FilterError, FilterResult};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use shared::SharedBloomFilter;
