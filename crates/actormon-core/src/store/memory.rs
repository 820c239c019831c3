//! In-memory metric store.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;

use super::histogram::{TimerHistogram, TimerSnapshot, DEFAULT_TICK_BUCKETS};
use super::MetricStore;
use crate::error::{Error, Result};
use crate::metrics::{MetricDefinition, MetricKind};

type Buckets<T> = DashMap<String, T>;

/// Storage for one category, one bucket map per registered definition.
#[derive(Default)]
struct Category {
    counters: HashMap<String, Buckets<AtomicI64>>,
    gauges: HashMap<String, Buckets<AtomicI64>>,
    timers: HashMap<String, Buckets<TimerHistogram>>,
}

impl Category {
    /// Add storage for a definition. Returns false if already present.
    fn insert(&mut self, definition: &MetricDefinition) -> bool {
        let name = definition.name();
        let added = match definition.kind() {
            MetricKind::Counter => !self.counters.contains_key(name),
            MetricKind::Gauge => !self.gauges.contains_key(name),
            MetricKind::Timer => !self.timers.contains_key(name),
        };
        if added {
            match definition.kind() {
                MetricKind::Counter => {
                    self.counters.insert(name.to_string(), DashMap::new());
                }
                MetricKind::Gauge => {
                    self.gauges.insert(name.to_string(), DashMap::new());
                }
                MetricKind::Timer => {
                    self.timers.insert(name.to_string(), DashMap::new());
                }
            }
        }
        added
    }

    fn len(&self) -> usize {
        self.counters.len() + self.gauges.len() + self.timers.len()
    }
}

/// Value held by one instance bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Counter or gauge value.
    Value(i64),
    /// Timer statistics.
    Timer(TimerSnapshot),
}

/// Snapshot of one definition's buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricSnapshot {
    pub name: String,
    pub kind: MetricKind,
    pub instances: BTreeMap<String, MetricValue>,
}

/// Snapshot of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySnapshot {
    pub category: String,
    pub metrics: Vec<MetricSnapshot>,
}

/// Process-local [`MetricStore`].
///
/// Categories are guarded by a read-write lock that is only written during
/// registration. Buckets are atomics inside sharded maps, so concurrent
/// updates never take the category lock for writing.
pub struct InMemoryStore {
    categories: RwLock<HashMap<String, Category>>,
    timer_bounds: Vec<u64>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            categories: RwLock::new(HashMap::new()),
            timer_bounds: DEFAULT_TICK_BUCKETS.to_vec(),
        }
    }

    /// Set the bucket bounds used for new timer instances.
    pub fn with_timer_bounds(mut self, bounds: Vec<u64>) -> Self {
        self.timer_bounds = bounds;
        self
    }

    /// Check if a category exists.
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.read().contains_key(category)
    }

    /// Registered category labels, sorted.
    pub fn categories(&self) -> Vec<String> {
        let mut names: Vec<String> = self.categories.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of definitions registered in a category.
    pub fn definition_count(&self, category: &str) -> usize {
        self.categories.read().get(category).map_or(0, Category::len)
    }

    /// Current counter value, `None` if the bucket was never referenced.
    pub fn counter_value(&self, category: &str, name: &str, instance: &str) -> Option<i64> {
        let categories = self.categories.read();
        let buckets = categories.get(category)?.counters.get(name)?;
        let value = buckets.get(instance)?.load(Ordering::Relaxed);
        Some(value)
    }

    /// Current gauge value, `None` if the bucket was never referenced.
    pub fn gauge_value(&self, category: &str, name: &str, instance: &str) -> Option<i64> {
        let categories = self.categories.read();
        let buckets = categories.get(category)?.gauges.get(name)?;
        let value = buckets.get(instance)?.load(Ordering::Relaxed);
        Some(value)
    }

    /// Timer statistics, `None` if the bucket was never referenced.
    pub fn timer_snapshot(&self, category: &str, name: &str, instance: &str) -> Option<TimerSnapshot> {
        let categories = self.categories.read();
        let buckets = categories.get(category)?.timers.get(name)?;
        let snapshot = buckets.get(instance)?.snapshot();
        Some(snapshot)
    }

    /// Instance buckets referenced so far for a definition, sorted.
    pub fn instances(&self, definition: &MetricDefinition) -> Vec<String> {
        let categories = self.categories.read();
        let Some(category) = categories.get(definition.category()) else {
            return Vec::new();
        };
        let name = definition.name();
        let mut instances: Vec<String> = match definition.kind() {
            MetricKind::Counter => bucket_names(category.counters.get(name)),
            MetricKind::Gauge => bucket_names(category.gauges.get(name)),
            MetricKind::Timer => bucket_names(category.timers.get(name)),
        };
        instances.sort();
        instances
    }

    /// Capture every category, sorted by label then metric name.
    pub fn snapshot(&self) -> Vec<CategorySnapshot> {
        let categories = self.categories.read();
        let mut out: Vec<CategorySnapshot> = categories
            .iter()
            .map(|(label, category)| {
                let mut metrics = Vec::with_capacity(category.len());
                for (name, buckets) in &category.counters {
                    metrics.push(scalar_snapshot(name, MetricKind::Counter, buckets));
                }
                for (name, buckets) in &category.gauges {
                    metrics.push(scalar_snapshot(name, MetricKind::Gauge, buckets));
                }
                for (name, buckets) in &category.timers {
                    metrics.push(MetricSnapshot {
                        name: name.clone(),
                        kind: MetricKind::Timer,
                        instances: buckets
                            .iter()
                            .map(|e| (e.key().clone(), MetricValue::Timer(e.value().snapshot())))
                            .collect(),
                    });
                }
                metrics.sort_by(|a, b| a.name.cmp(&b.name).then(a.kind.cmp(&b.kind)));
                CategorySnapshot {
                    category: label.clone(),
                    metrics,
                }
            })
            .collect();
        out.sort_by(|a, b| a.category.cmp(&b.category));
        out
    }

    fn unknown(definition: &MetricDefinition) -> Error {
        Error::UnknownDefinition {
            category: definition.category().to_string(),
            name: definition.name().to_string(),
            kind: definition.kind(),
        }
    }

    fn expect_kind(definition: &MetricDefinition, expected: MetricKind) -> Result<()> {
        if definition.kind() == expected {
            Ok(())
        } else {
            Err(Error::KindMismatch {
                name: definition.name().to_string(),
                expected,
                actual: definition.kind(),
            })
        }
    }

    /// Run `f` against a scalar bucket, creating it at zero if needed.
    fn with_scalar<R>(
        &self,
        definition: &MetricDefinition,
        instance: &str,
        f: impl FnOnce(&AtomicI64) -> R,
    ) -> Result<R> {
        let categories = self.categories.read();
        let category = categories
            .get(definition.category())
            .ok_or_else(|| Self::unknown(definition))?;
        let buckets = match definition.kind() {
            MetricKind::Counter => category.counters.get(definition.name()),
            MetricKind::Gauge => category.gauges.get(definition.name()),
            MetricKind::Timer => None,
        }
        .ok_or_else(|| Self::unknown(definition))?;
        Ok(with_bucket(buckets, instance, || AtomicI64::new(0), f))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricStore for InMemoryStore {
    fn register_definitions(
        &self,
        category: &str,
        definitions: &[MetricDefinition],
    ) -> Result<()> {
        if category.is_empty() {
            return Err(Error::CategoryCreation {
                category: String::new(),
                reason: "category label is empty".to_string(),
            });
        }
        if let Some(stray) = definitions.iter().find(|d| d.category() != category) {
            return Err(Error::CategoryCreation {
                category: category.to_string(),
                reason: format!("definition {stray} belongs to another category"),
            });
        }

        let mut categories = self.categories.write();
        let created = !categories.contains_key(category);
        let entry = categories.entry(category.to_string()).or_default();
        let added = definitions.iter().filter(|d| entry.insert(d)).count();

        if created {
            tracing::info!(category, definitions = added, "metric category created");
        } else {
            tracing::debug!(category, added, "metric category already exists");
        }
        Ok(())
    }

    fn apply_counter_delta(
        &self,
        definition: &MetricDefinition,
        instance: &str,
        delta: i64,
    ) -> Result<()> {
        Self::expect_kind(definition, MetricKind::Counter)?;
        self.with_scalar(definition, instance, |bucket| {
            bucket.fetch_add(delta, Ordering::Relaxed);
        })
    }

    fn apply_gauge_value(
        &self,
        definition: &MetricDefinition,
        instance: &str,
        value: i64,
    ) -> Result<()> {
        Self::expect_kind(definition, MetricKind::Gauge)?;
        self.with_scalar(definition, instance, |bucket| {
            bucket.store(value, Ordering::Relaxed);
        })
    }

    fn apply_timer_sample(
        &self,
        definition: &MetricDefinition,
        instance: &str,
        duration_ticks: u64,
    ) -> Result<()> {
        Self::expect_kind(definition, MetricKind::Timer)?;
        let categories = self.categories.read();
        let buckets = categories
            .get(definition.category())
            .and_then(|c| c.timers.get(definition.name()))
            .ok_or_else(|| Self::unknown(definition))?;
        with_bucket(
            buckets,
            instance,
            || TimerHistogram::with_bounds(self.timer_bounds.clone()),
            |hist| hist.observe(duration_ticks),
        );
        Ok(())
    }

    fn reset_counter_total(&self, definition: &MetricDefinition, instance: &str) -> Result<()> {
        Self::expect_kind(definition, MetricKind::Counter)?;
        self.with_scalar(definition, instance, |bucket| {
            bucket.store(0, Ordering::Relaxed);
        })
    }
}

/// Run `f` on the bucket for `instance`, inserting it with `init` first.
fn with_bucket<T, R>(
    buckets: &Buckets<T>,
    instance: &str,
    init: impl FnOnce() -> T,
    f: impl FnOnce(&T) -> R,
) -> R {
    if let Some(bucket) = buckets.get(instance) {
        return f(&bucket);
    }
    let bucket = buckets.entry(instance.to_string()).or_insert_with(init);
    f(&bucket)
}

fn bucket_names<T>(buckets: Option<&Buckets<T>>) -> Vec<String> {
    buckets
        .map(|b| b.iter().map(|e| e.key().clone()).collect())
        .unwrap_or_default()
}

fn scalar_snapshot(name: &str, kind: MetricKind, buckets: &Buckets<AtomicI64>) -> MetricSnapshot {
    MetricSnapshot {
        name: name.to_string(),
        kind,
        instances: buckets
            .iter()
            .map(|e| (e.key().clone(), MetricValue::Value(e.value().load(Ordering::Relaxed))))
            .collect(),
    }
}
