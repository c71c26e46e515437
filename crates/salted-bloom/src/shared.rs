//! Synchronized filter handle
//!
//! [`BloomFilter`] has no internal locking. `SharedBloomFilter` wraps one in
//! an `Arc<RwLock<_>>` so several threads can add and query the same filter.

use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use tracing::trace;

use crate::domain::{BloomConfig, BloomFilter, CardinalityEstimate};
use crate::error::{FilterError, FilterResult};
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Cloneable, thread-safe handle to a single [`BloomFilter`]
///
/// `add` takes the write lock; queries share the read lock.
pub struct SharedBloomFilter<M: MetricsRecorder = NoOpMetrics> {
    inner: Arc<RwLock<BloomFilter>>,
    metrics: Arc<M>,
}

impl<M: MetricsRecorder> Clone for SharedBloomFilter<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl SharedBloomFilter<NoOpMetrics> {
    pub fn new(filter: BloomFilter) -> Self {
        Self::with_metrics(filter, Arc::new(NoOpMetrics))
    }

    pub fn from_config(config: &BloomConfig) -> FilterResult<Self> {
        Ok(Self::new(BloomFilter::with_config(config)?))
    }
}

impl<M: MetricsRecorder> SharedBloomFilter<M> {
    /// Wrap a filter, reporting operations to `metrics`
    pub fn with_metrics(filter: BloomFilter, metrics: Arc<M>) -> Self {
        metrics.record_filter_created(filter.capacity(), filter.hash_rounds());
        Self {
            inner: Arc::new(RwLock::new(filter)),
            metrics,
        }
    }

    pub fn add(&self, element: impl AsRef<[u8]>) {
        let start = Instant::now();
        self.inner.write().add(element);
        self.metrics.record_add(start.elapsed());
    }

    pub fn contains(&self, element: impl AsRef<[u8]>) -> bool {
        let start = Instant::now();
        let found = self.inner.read().contains(element);
        self.metrics.record_lookup(start.elapsed(), found);
        found
    }

    pub fn estimate_cardinality(&self) -> CardinalityEstimate {
        self.inner.read().estimate_cardinality()
    }

    /// Copy of the current filter state
    pub fn snapshot(&self) -> BloomFilter {
        self.inner.read().clone()
    }

    /// Union with another handle into a new, unshared filter
    pub fn union(&self, other: &SharedBloomFilter<M>) -> FilterResult<BloomFilter> {
        // Snapshot first so both handles may alias the same lock
        let other = other.snapshot();
        let result = self.inner.read().union(&other);
        self.report(&result, |m| m.record_union());
        result
    }

    /// Intersection with another handle into a new, unshared filter
    pub fn intersect(&self, other: &SharedBloomFilter<M>) -> FilterResult<BloomFilter> {
        let other = other.snapshot();
        let result = self.inner.read().intersect(&other);
        self.report(&result, |m| m.record_intersection());
        result
    }

    fn report(&self, result: &FilterResult<BloomFilter>, on_success: impl FnOnce(&M)) {
        match result {
            Ok(filter) => {
                trace!(bits_set = filter.bits_set(), "Shared set-algebra result");
                on_success(self.metrics.as_ref());
            }
            Err(FilterError::IncompatibleFilters { .. }) => self.metrics.record_incompatible(),
            Err(_) => {}
        }
    }

    pub fn metrics(&self) -> &M {
        self.metrics.as_ref()
    }
}
