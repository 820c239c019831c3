//! Lock-free histogram for timer samples.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Default bucket upper bounds, in ticks.
pub const DEFAULT_TICK_BUCKETS: &[u64] = &[
    1, 5, 10, 50, 100, 500, 1_000, 5_000, 10_000, 60_000,
];

/// Fixed-bucket histogram of duration samples.
///
/// Each sample lands in the first bucket whose bound is >= the sample;
/// samples above the last bound are counted in the last bucket.
#[derive(Debug)]
pub struct TimerHistogram {
    bounds: Vec<u64>,
    counts: Vec<AtomicU64>,
    sum: AtomicU64,
    count: AtomicU64,
    max: AtomicU64,
}

/// Point-in-time view of a [`TimerHistogram`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerSnapshot {
    pub count: u64,
    pub sum: u64,
    pub max: u64,
    pub mean: u64,
    pub p50: u64,
    pub p99: u64,
    /// `(upper bound, samples in bucket)` pairs.
    pub buckets: Vec<(u64, u64)>,
}

impl TimerHistogram {
    /// Create a histogram with [`DEFAULT_TICK_BUCKETS`].
    pub fn new() -> Self {
        Self::with_bounds(DEFAULT_TICK_BUCKETS.to_vec())
    }

    /// Create a histogram with custom bucket bounds.
    ///
    /// Bounds are sorted and deduplicated. An empty list yields a single
    /// unbounded bucket.
    pub fn with_bounds(mut bounds: Vec<u64>) -> Self {
        bounds.sort_unstable();
        bounds.dedup();
        if bounds.is_empty() {
            bounds.push(u64::MAX);
        }
        let counts = bounds.iter().map(|_| AtomicU64::new(0)).collect();
        Self {
            bounds,
            counts,
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
            max: AtomicU64::new(0),
        }
    }

    /// Record a sample.
    pub fn observe(&self, ticks: u64) {
        self.sum.fetch_add(ticks, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.max.fetch_max(ticks, Ordering::Relaxed);

        let idx = self
            .bounds
            .partition_point(|&bound| bound < ticks)
            .min(self.counts.len() - 1);
        self.counts[idx].fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total count of samples.
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Get the sum of all samples.
    pub fn sum(&self) -> u64 {
        self.sum.load(Ordering::Relaxed)
    }

    /// Get the largest sample.
    pub fn max(&self) -> u64 {
        self.max.load(Ordering::Relaxed)
    }

    /// Mean sample, 0 when empty.
    pub fn mean(&self) -> u64 {
        match self.count() {
            0 => 0,
            n => self.sum() / n,
        }
    }

    /// Approximate percentile (`0.5` for P50).
    ///
    /// Returns the upper bound of the bucket holding the target rank.
    pub fn percentile(&self, p: f64) -> u64 {
        let total = self.count();
        if total == 0 {
            return 0;
        }

        let target = ((total as f64 * p).ceil() as u64).max(1);
        let mut cumulative = 0u64;
        for (bound, count) in self.bounds.iter().zip(&self.counts) {
            cumulative += count.load(Ordering::Relaxed);
            if cumulative >= target {
                return *bound;
            }
        }
        self.bounds[self.bounds.len() - 1]
    }

    /// Capture the current state.
    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            count: self.count(),
            sum: self.sum(),
            max: self.max(),
            mean: self.mean(),
            p50: self.percentile(0.50),
            p99: self.percentile(0.99),
            buckets: self
                .bounds
                .iter()
                .zip(&self.counts)
                .map(|(&bound, count)| (bound, count.load(Ordering::Relaxed)))
                .collect(),
        }
    }
}

impl Default for TimerHistogram {
    fn default() -> Self {
        Self::new()
    }
}
