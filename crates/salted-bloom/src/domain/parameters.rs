//! Bloom filter sizing and false-positive math
//!
//! Formulas:
//! - m = -n*ln(fpr) / (ln(2)^2)  -- optimal bits
//! - k = (m/n) * ln(2)           -- optimal hash rounds
//! - FPR = (1 - e^(-kn/m))^k

use std::f64::consts::LN_2;

use crate::error::{FilterError, FilterResult};

/// Upper bound on derived hash rounds
pub const MAX_DERIVED_ROUNDS: usize = 32;

/// Sizing derived from an expected element count and target FPR
#[derive(Clone, Debug, PartialEq)]
pub struct OptimalParameters {
    /// Number of bit slots
    pub capacity: usize,
    /// Number of hash rounds
    pub hash_rounds: usize,
    /// False positive rate expected once `n` elements are added
    pub expected_fpr: f64,
}

/// Size a filter for an expected workload
///
/// # Arguments
/// * `num_elements` - Distinct elements expected to be added (n)
/// * `target_fpr` - Acceptable false positive rate once `n` are added
///
/// # Returns
/// Capacity `m` and hash rounds `k` for the workload, plus the rate they
/// actually achieve. `k` is clamped to `1..=MAX_DERIVED_ROUNDS`. An empty
/// workload yields the smallest valid filter.
///
/// # Errors
/// `InvalidConfiguration` unless `target_fpr` lies strictly inside (0, 1);
/// the logarithm is undefined or non-negative outside that range.
pub fn calculate_optimal_parameters(
    num_elements: usize,
    target_fpr: f64,
) -> FilterResult<OptimalParameters> {
    if !(target_fpr > 0.0 && target_fpr < 1.0) {
        return Err(FilterError::invalid(format!(
            "target_fpr must be in (0, 1), got {}",
            target_fpr
        )));
    }
    if num_elements == 0 {
        return Ok(OptimalParameters {
            capacity: 1,
            hash_rounds: 1,
            expected_fpr: 1.0,
        });
    }

    let n = num_elements as f64;
    let ln2_squared = LN_2 * LN_2;

    let m = ((-n * target_fpr.ln() / ln2_squared).ceil() as usize).max(1);
    let k = ((m as f64 / n) * LN_2).round() as usize;
    let k = k.clamp(1, MAX_DERIVED_ROUNDS);

    Ok(OptimalParameters {
        capacity: m,
        hash_rounds: k,
        expected_fpr: calculate_fpr(m, num_elements, k),
    })
}

/// False positive rate after `n` insertions into `m` bits with `k` rounds
///
/// Zero bits means every lookup is a false positive.
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Probability that an absent element tests positive at the current load
///
/// `(s/m)^k`: every one of the `k` probed slots must already be set.
pub fn false_positive_probability(bits_set: usize, capacity: usize, hash_rounds: usize) -> f64 {
    if capacity == 0 {
        return 1.0;
    }
    (bits_set as f64 / capacity as f64).powi(hash_rounds as i32)
}
