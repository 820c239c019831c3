//! Backing store seam.
//!
//! The monitor never persists values itself; it resolves names and hands
//! `(definition, instance, value)` to a [`MetricStore`]. Instance buckets are
//! created by the store the first time they are referenced.

mod histogram;
mod memory;
mod prometheus;

pub use histogram::{TimerHistogram, TimerSnapshot, DEFAULT_TICK_BUCKETS};
pub use memory::{CategorySnapshot, InMemoryStore, MetricSnapshot, MetricValue};

use crate::error::Result;
use crate::metrics::MetricDefinition;

/// Trait for metric backends.
pub trait MetricStore: Send + Sync {
    /// Create storage for `category` and its definitions.
    ///
    /// Called once before any update. Must succeed if the category already
    /// exists.
    fn register_definitions(&self, category: &str, definitions: &[MetricDefinition])
        -> Result<()>;

    /// Add `delta` to a counter bucket.
    fn apply_counter_delta(
        &self,
        definition: &MetricDefinition,
        instance: &str,
        delta: i64,
    ) -> Result<()>;

    /// Set a gauge bucket.
    fn apply_gauge_value(&self, definition: &MetricDefinition, instance: &str, value: i64)
        -> Result<()>;

    /// Record a timer sample.
    fn apply_timer_sample(
        &self,
        definition: &MetricDefinition,
        instance: &str,
        duration_ticks: u64,
    ) -> Result<()>;

    /// Reset a counter bucket to zero.
    fn reset_counter_total(&self, definition: &MetricDefinition, instance: &str) -> Result<()>;
}
