//! Metrics hooks for Bloom filter operations
//!
//! ## Usage
//!
//! ```
//! use salted_bloom::metrics::Metrics;
//! use std::time::Duration;
//!
//! let metrics = Metrics::new();
//! metrics.record_filter_created(1000, 7);
//! metrics.record_lookup(Duration::from_nanos(120), true);
//!
//! assert_eq!(metrics.snapshot().bits_allocated, 1000);
//! assert_eq!(metrics.snapshot().lookups_positive, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Thread-safe counters for filter activity
#[derive(Default)]
pub struct Metrics {
    pub filters_created: AtomicU64,
    /// Bit slots across every filter created
    pub bits_allocated: AtomicU64,
    /// Largest hash round count seen at creation
    pub max_hash_rounds: AtomicU64,
    pub elements_added: AtomicU64,
    pub lookups_performed: AtomicU64,
    /// Lookups that answered "possibly present"
    pub lookups_positive: AtomicU64,
    pub unions: AtomicU64,
    pub intersections: AtomicU64,
    /// Set-algebra calls refused for mismatched parameters
    pub incompatible_rejections: AtomicU64,
    /// Cumulative add time in nanoseconds
    pub add_time_ns: AtomicU64,
    /// Cumulative lookup time in nanoseconds
    pub lookup_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_filter_created(&self, capacity: usize, hash_rounds: usize) {
        self.filters_created.fetch_add(1, Ordering::Relaxed);
        self.bits_allocated
            .fetch_add(capacity as u64, Ordering::Relaxed);
        self.max_hash_rounds
            .fetch_max(hash_rounds as u64, Ordering::Relaxed);
    }

    pub fn record_add(&self, duration: Duration) {
        self.elements_added.fetch_add(1, Ordering::Relaxed);
        self.add_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn record_lookup(&self, duration: Duration, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        self.lookup_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_union(&self) {
        self.unions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_intersection(&self) {
        self.intersections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_incompatible(&self) {
        self.incompatible_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_created: self.filters_created.load(Ordering::Relaxed),
            bits_allocated: self.bits_allocated.load(Ordering::Relaxed),
            max_hash_rounds: self.max_hash_rounds.load(Ordering::Relaxed),
            elements_added: self.elements_added.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            unions: self.unions.load(Ordering::Relaxed),
            intersections: self.intersections.load(Ordering::Relaxed),
            incompatible_rejections: self.incompatible_rejections.load(Ordering::Relaxed),
            avg_add_ns: self.avg_add_time_ns(),
            avg_lookup_ns: self.avg_lookup_time_ns(),
        }
    }

    pub fn avg_add_time_ns(&self) -> u64 {
        let total = self.add_time_ns.load(Ordering::Relaxed);
        let count = self.elements_added.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    pub fn avg_lookup_time_ns(&self) -> u64 {
        let total = self.lookup_time_ns.load(Ordering::Relaxed);
        let count = self.lookups_performed.load(Ordering::Relaxed);
        if count > 0 {
            total / count
        } else {
            0
        }
    }

    /// Ratio of positive lookups to all lookups
    ///
    /// Includes true positives as well as false positives.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.filters_created,
            &self.bits_allocated,
            &self.max_hash_rounds,
            &self.elements_added,
            &self.lookups_performed,
            &self.lookups_positive,
            &self.unions,
            &self.intersections,
            &self.incompatible_rejections,
            &self.add_time_ns,
            &self.lookup_time_ns,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricsSnapshot {
    pub filters_created: u64,
    pub bits_allocated: u64,
    pub max_hash_rounds: u64,
    pub elements_added: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub unions: u64,
    pub intersections: u64,
    pub incompatible_rejections: u64,
    pub avg_add_ns: u64,
    pub avg_lookup_ns: u64,
}

/// Sink for filter metrics
///
/// Implement this to forward counts to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_filter_created(&self, capacity: usize, hash_rounds: usize);

    fn record_add(&self, duration: Duration);

    fn record_lookup(&self, duration: Duration, found: bool);

    fn record_union(&self);

    fn record_intersection(&self);

    fn record_incompatible(&self);
}

/// Recorder that drops everything
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_created(&self, _: usize, _: usize) {}
    fn record_add(&self, _: Duration) {}
    fn record_lookup(&self, _: Duration, _: bool) {}
    fn record_union(&self) {}
    fn record_intersection(&self) {}
    fn record_incompatible(&self) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_created(&self, capacity: usize, hash_rounds: usize) {
        Metrics::record_filter_created(self, capacity, hash_rounds);
    }

    fn record_add(&self, duration: Duration) {
        Metrics::record_add(self, duration);
    }

    fn record_lookup(&self, duration: Duration, found: bool) {
        Metrics::record_lookup(self, duration, found);
    }

    fn record_union(&self) {
        Metrics::record_union(self);
    }

    fn record_intersection(&self) {
        Metrics::record_intersection(self);
    }

    fn record_incompatible(&self) {
        Metrics::record_incompatible(self);
    }
}
