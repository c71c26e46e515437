//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - `capacity > 0` and `hash_rounds > 0`; the bit vector never resizes
//! - No false negatives: once added, `contains()` returns true
//! - `add` only ever sets bits; `union`/`intersect` never touch their operands

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::config::BloomConfig;
use super::hash_functions::{hash_indices, HashAlgorithm};
use super::parameters::false_positive_probability;
use crate::error::{FilterError, FilterResult};

/// Bloom filter for probabilistic membership testing
///
/// Answers "possibly present" or "definitely absent". False positives are
/// possible, false negatives are not.
///
/// Not safe for concurrent mutation without external locking; see
/// [`crate::SharedBloomFilter`] for a synchronized handle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FilterSnapshot")]
pub struct BloomFilter {
    /// Number of bit slots (m)
    capacity: usize,
    /// Hash rounds per element (k)
    hash_rounds: usize,
    /// Prefix mixed into every round
    salt: Vec<u8>,
    algorithm: HashAlgorithm,
    /// Word-packed bit storage, exactly `capacity` bits long
    #[serde(serialize_with = "bitvec_serde::serialize")]
    bits: BitVec<u64, Lsb0>,
}

/// Wire form of [`BloomFilter`], validated before becoming a filter
#[derive(Deserialize)]
struct FilterSnapshot {
    capacity: usize,
    hash_rounds: usize,
    salt: Vec<u8>,
    #[serde(default)]
    algorithm: HashAlgorithm,
    bits: Vec<u64>,
}

mod bitvec_serde {
    use bitvec::prelude::*;
    use serde::{Serialize, Serializer};

    pub fn serialize<S>(bits: &BitVec<u64, Lsb0>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        bits.as_raw_slice().serialize(serializer)
    }
}

impl TryFrom<FilterSnapshot> for BloomFilter {
    type Error = FilterError;

    fn try_from(snapshot: FilterSnapshot) -> Result<Self, Self::Error> {
        let mut filter = Self::with_algorithm(
            snapshot.capacity,
            snapshot.hash_rounds,
            snapshot.salt,
            snapshot.algorithm,
        )?;

        let words = filter.bits.as_raw_slice().len();
        if snapshot.bits.len() != words {
            return Err(FilterError::invalid(format!(
                "expected {} storage words for {} bits, got {}",
                words,
                snapshot.capacity,
                snapshot.bits.len()
            )));
        }

        let mut bits = BitVec::<u64, Lsb0>::from_vec(snapshot.bits);
        bits.truncate(snapshot.capacity);
        // Zero the padding so word-wise combination never sees stray bits
        bits.set_uninitialized(false);
        filter.bits = bits;
        Ok(filter)
    }
}

/// Result of [`BloomFilter::estimate_cardinality`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CardinalityEstimate {
    /// Swamidass–Baldi estimate of distinct elements added
    Approximate(f64),
    /// Every bit is set, so `ln(1 - s/m)` is undefined
    Saturated,
}

impl CardinalityEstimate {
    /// The numeric estimate, `f64::INFINITY` when saturated
    pub fn value(&self) -> f64 {
        match self {
            CardinalityEstimate::Approximate(n) => *n,
            CardinalityEstimate::Saturated => f64::INFINITY,
        }
    }

    pub fn is_saturated(&self) -> bool {
        matches!(self, CardinalityEstimate::Saturated)
    }

    /// Convert a saturated estimate into [`FilterError::SaturatedEstimate`]
    pub fn into_result(self, capacity: usize) -> FilterResult<f64> {
        match self {
            CardinalityEstimate::Approximate(n) => Ok(n),
            CardinalityEstimate::Saturated => Err(FilterError::SaturatedEstimate { capacity }),
        }
    }
}

impl BloomFilter {
    /// Create an empty filter using the default hash algorithm
    ///
    /// # Errors
    /// `InvalidConfiguration` if `capacity` or `hash_rounds` is zero.
    pub fn new(capacity: usize, hash_rounds: usize, salt: impl AsRef<[u8]>) -> FilterResult<Self> {
        Self::with_algorithm(capacity, hash_rounds, salt, HashAlgorithm::default())
    }

    /// Create an empty filter with an explicit hash algorithm
    pub fn with_algorithm(
        capacity: usize,
        hash_rounds: usize,
        salt: impl AsRef<[u8]>,
        algorithm: HashAlgorithm,
    ) -> FilterResult<Self> {
        if capacity == 0 {
            return Err(FilterError::invalid("capacity must be positive"));
        }
        if hash_rounds == 0 {
            return Err(FilterError::invalid("hash_rounds must be positive"));
        }

        debug!(capacity, hash_rounds, ?algorithm, "Created bloom filter");
        Ok(Self {
            capacity,
            hash_rounds,
            salt: salt.as_ref().to_vec(),
            algorithm,
            bits: bitvec![u64, Lsb0; 0; capacity],
        })
    }

    /// Create an empty filter from a validated configuration
    pub fn with_config(config: &BloomConfig) -> FilterResult<Self> {
        config.validate()?;
        Self::with_algorithm(
            config.capacity,
            config.hash_rounds,
            config.salt.as_bytes(),
            config.algorithm,
        )
    }

    /// Index touched by one hash round
    fn round_index(&self, element: &[u8], round: usize) -> usize {
        self.algorithm
            .round_index(&self.salt, element, round, self.capacity)
    }

    /// Indices `add` would set for `element`, one per round
    pub fn indices(&self, element: impl AsRef<[u8]>) -> Vec<usize> {
        hash_indices(
            self.algorithm,
            &self.salt,
            element.as_ref(),
            self.hash_rounds,
            self.capacity,
        )
    }

    /// Add an element to the filter
    ///
    /// Sets up to `hash_rounds` bits. After this, `contains(element)` is
    /// guaranteed to return true.
    pub fn add(&mut self, element: impl AsRef<[u8]>) {
        let element = element.as_ref();
        for round in 0..self.hash_rounds {
            let index = self.round_index(element, round);
            self.bits.set(index, true);
        }
    }

    /// Test if an element might be in the filter
    ///
    /// Returns `false` as soon as one probed bit is unset.
    pub fn contains(&self, element: impl AsRef<[u8]>) -> bool {
        let element = element.as_ref();
        (0..self.hash_rounds).all(|round| self.bits[self.round_index(element, round)])
    }

    /// Estimate the number of distinct elements added
    ///
    /// `n = -(m/k) * ln(1 - s/m)`
    pub fn estimate_cardinality(&self) -> CardinalityEstimate {
        let s = self.bits_set();
        if s == 0 {
            return CardinalityEstimate::Approximate(0.0);
        }
        if s == self.capacity {
            debug!(capacity = self.capacity, "Cardinality estimate saturated");
            return CardinalityEstimate::Saturated;
        }

        let m = self.capacity as f64;
        let k = self.hash_rounds as f64;
        CardinalityEstimate::Approximate(-(m / k) * (1.0 - s as f64 / m).ln())
    }

    /// Bitwise OR of two compatible filters into a new filter
    ///
    /// The result inherits salt and algorithm from `self`. Every element
    /// added to `self` tests positive in the result. Elements added to
    /// `other` do too only when both filters share the same salt; with
    /// differing salts they may stop testing positive.
    ///
    /// # Errors
    /// `IncompatibleFilters` if capacity, hash rounds or algorithm differ.
    pub fn union(&self, other: &BloomFilter) -> FilterResult<BloomFilter> {
        let result = self.combine(other, |a, b| a | b)?;
        debug!(
            capacity = result.capacity,
            bits_set = result.bits_set(),
            "Union of bloom filters"
        );
        Ok(result)
    }

    /// Bitwise AND of two compatible filters into a new filter
    ///
    /// Elements added to both operands still test positive, but the result
    /// is approximate: it may under-count and its false positive rate is not
    /// the product of the operands' rates. The result inherits salt from
    /// `self`, so with differing salts even shared elements may test absent.
    ///
    /// # Errors
    /// `IncompatibleFilters` if capacity, hash rounds or algorithm differ.
    pub fn intersect(&self, other: &BloomFilter) -> FilterResult<BloomFilter> {
        let result = self.combine(other, |a, b| a & b)?;
        debug!(
            capacity = result.capacity,
            bits_set = result.bits_set(),
            "Intersection of bloom filters"
        );
        Ok(result)
    }

    fn combine(&self, other: &BloomFilter, op: impl Fn(u64, u64) -> u64) -> FilterResult<BloomFilter> {
        self.check_compatible(other)?;

        let mut bits = self.bits.clone();
        for (word, other_word) in bits
            .as_raw_mut_slice()
            .iter_mut()
            .zip(other.bits.as_raw_slice())
        {
            *word = op(*word, *other_word);
        }

        Ok(BloomFilter {
            capacity: self.capacity,
            hash_rounds: self.hash_rounds,
            salt: self.salt.clone(),
            algorithm: self.algorithm,
            bits,
        })
    }

    /// Filters are compatible when capacity, hash rounds and algorithm match
    ///
    /// Salt is not compared; see [`BloomFilter::union`] for what a salt
    /// mismatch means for membership in the result.
    pub fn is_compatible(&self, other: &BloomFilter) -> bool {
        self.capacity == other.capacity
            && self.hash_rounds == other.hash_rounds
            && self.algorithm == other.algorithm
    }

    fn check_compatible(&self, other: &BloomFilter) -> FilterResult<()> {
        if self.is_compatible(other) {
            return Ok(());
        }
        warn!(
            left_capacity = self.capacity,
            right_capacity = other.capacity,
            left_rounds = self.hash_rounds,
            right_rounds = other.hash_rounds,
            left_algorithm = ?self.algorithm,
            right_algorithm = ?other.algorithm,
            "Rejected incompatible bloom filters"
        );
        Err(FilterError::IncompatibleFilters {
            left_capacity: self.capacity,
            right_capacity: other.capacity,
            left_rounds: self.hash_rounds,
            right_rounds: other.hash_rounds,
            left_algorithm: self.algorithm,
            right_algorithm: other.algorithm,
        })
    }

    /// Probability that an element never added tests positive right now
    pub fn false_positive_probability(&self) -> f64 {
        false_positive_probability(self.bits_set(), self.capacity, self.hash_rounds)
    }

    /// Number of set bits (s)
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Fraction of bits set
    pub fn load_factor(&self) -> f64 {
        self.bits_set() as f64 / self.capacity as f64
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    pub fn is_saturated(&self) -> bool {
        self.bits.all()
    }

    /// Value of one slot, `None` when out of range
    pub fn bit(&self, index: usize) -> Option<bool> {
        self.bits.get(index).map(|bit| *bit)
    }

    /// Indices of all set bits in ascending order
    pub fn set_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hash_rounds(&self) -> usize {
        self.hash_rounds
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}
