//! Kind-scoped metric registry.
//!
//! The registry holds one name → definition mapping per [`MetricKind`]. It is
//! built once at startup from the built-in counter names plus an optional
//! caller-supplied [`CustomMetrics`] extension and is read-only afterwards,
//! so it can be shared across threads without locking.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::definition::{MetricDefinition, MetricKind};

/// Counter names tracked by every monitor.
pub const BUILT_IN_COUNTER_NAMES: &[&str] = &[
    "ActorRestarts",
    "ActorsCreated",
    "ActorsStopped",
    "ReceivedMessages",
    "DeadLetters",
    "UnhandledMessages",
    "DebugMessages",
    "InfoMessages",
    "WarningMessages",
    "ErrorMessages",
];

/// Name → definition mapping for a single kind.
pub type DefinitionMap = HashMap<String, MetricDefinition>;

/// Additional metric names a caller wants tracked.
///
/// Counters are merged with [`BUILT_IN_COUNTER_NAMES`]; gauges and timers
/// have no built-ins and are taken exactly as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomMetrics {
    /// Extra counter names.
    pub counters: HashSet<String>,
    /// Gauge names.
    pub gauges: HashSet<String>,
    /// Timer names.
    pub timers: HashSet<String>,
}

impl CustomMetrics {
    /// Create an empty extension set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a counter name.
    pub fn with_counter(mut self, name: impl Into<String>) -> Self {
        self.counters.insert(name.into());
        self
    }

    /// Add a gauge name.
    pub fn with_gauge(mut self, name: impl Into<String>) -> Self {
        self.gauges.insert(name.into());
        self
    }

    /// Add a timer name.
    pub fn with_timer(mut self, name: impl Into<String>) -> Self {
        self.timers.insert(name.into());
        self
    }

    /// Check if no names are listed.
    pub fn is_empty(&self) -> bool {
        self.counters.is_empty() && self.gauges.is_empty() && self.timers.is_empty()
    }
}

/// Immutable registry of metric definitions, one mapping per kind.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    category: String,
    counters: DefinitionMap,
    gauges: DefinitionMap,
    timers: DefinitionMap,
}

impl MetricRegistry {
    /// Build a registry for `category`.
    ///
    /// Counters are the union of `built_in_counters` and the extension's
    /// counters. Gauges and timers come only from the extension.
    pub fn build(
        category: &str,
        built_in_counters: &[&str],
        extension: Option<&CustomMetrics>,
    ) -> Self {
        let mut counter_names: HashSet<&str> = built_in_counters.iter().copied().collect();
        let mut gauge_names: HashSet<&str> = HashSet::new();
        let mut timer_names: HashSet<&str> = HashSet::new();

        if let Some(ext) = extension {
            counter_names.extend(ext.counters.iter().map(String::as_str));
            gauge_names.extend(ext.gauges.iter().map(String::as_str));
            timer_names.extend(ext.timers.iter().map(String::as_str));
        }

        let registry = Self {
            category: category.to_string(),
            counters: Self::definitions_for(category, MetricKind::Counter, counter_names),
            gauges: Self::definitions_for(category, MetricKind::Gauge, gauge_names),
            timers: Self::definitions_for(category, MetricKind::Timer, timer_names),
        };

        tracing::info!(
            category,
            counters = registry.counters.len(),
            gauges = registry.gauges.len(),
            timers = registry.timers.len(),
            "metric registry built"
        );

        registry
    }

    /// Build a registry with only the built-in counters.
    pub fn with_defaults(category: &str) -> Self {
        Self::build(category, BUILT_IN_COUNTER_NAMES, None)
    }

    fn definitions_for<'a>(
        category: &str,
        kind: MetricKind,
        names: impl IntoIterator<Item = &'a str>,
    ) -> DefinitionMap {
        names
            .into_iter()
            .map(|name| (name.to_string(), MetricDefinition::new(name, category, kind)))
            .collect()
    }

    /// Category shared by every definition.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get the mapping for a kind.
    pub fn definitions(&self, kind: MetricKind) -> &DefinitionMap {
        match kind {
            MetricKind::Counter => &self.counters,
            MetricKind::Gauge => &self.gauges,
            MetricKind::Timer => &self.timers,
        }
    }

    /// Get the counter mapping.
    pub fn counters(&self) -> &DefinitionMap {
        &self.counters
    }

    /// Get the gauge mapping.
    pub fn gauges(&self) -> &DefinitionMap {
        &self.gauges
    }

    /// Get the timer mapping.
    pub fn timers(&self) -> &DefinitionMap {
        &self.timers
    }

    /// Look up a definition by exact name.
    pub fn get(&self, kind: MetricKind, name: &str) -> Option<&MetricDefinition> {
        self.definitions(kind).get(name)
    }

    /// Iterate all definitions: counters, then gauges, then timers.
    pub fn iter(&self) -> impl Iterator<Item = &MetricDefinition> {
        MetricKind::ALL
            .into_iter()
            .flat_map(move |kind| self.definitions(kind).values())
    }

    /// Total number of definitions across kinds.
    pub fn len(&self) -> usize {
        self.counters.len() + self.gauges.len() + self.timers.len()
    }

    /// Check if the registry holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_contain_built_ins() {
        let registry = MetricRegistry::with_defaults("Akka");

        assert_eq!(registry.counters().len(), BUILT_IN_COUNTER_NAMES.len());
        for name in BUILT_IN_COUNTER_NAMES {
            let def = registry.get(MetricKind::Counter, name).unwrap();
            assert_eq!(def.category(), "Akka");
            assert_eq!(def.kind(), MetricKind::Counter);
        }
        assert!(registry.gauges().is_empty());
        assert!(registry.timers().is_empty());
    }

    #[test]
    fn test_extension_counters_are_unioned() {
        let ext = CustomMetrics::new()
            .with_counter("JobsQueued")
            .with_counter("ReceivedMessages");
        let registry = MetricRegistry::build("Akka", BUILT_IN_COUNTER_NAMES, Some(&ext));

        assert_eq!(registry.counters().len(), BUILT_IN_COUNTER_NAMES.len() + 1);
        assert!(registry.get(MetricKind::Counter, "JobsQueued").is_some());
        assert!(registry.get(MetricKind::Counter, "DeadLetters").is_some());
    }

    #[test]
    fn test_extension_gauges_and_timers() {
        let ext = CustomMetrics::new()
            .with_gauge("MailboxDepth")
            .with_timer("ProcessingTime");
        let registry = MetricRegistry::build("Cluster", BUILT_IN_COUNTER_NAMES, Some(&ext));

        let gauge = registry.get(MetricKind::Gauge, "MailboxDepth").unwrap();
        assert_eq!(gauge.kind(), MetricKind::Gauge);
        assert_eq!(gauge.category(), "Cluster");
        assert!(registry.get(MetricKind::Timer, "ProcessingTime").is_some());
        assert!(registry.get(MetricKind::Counter, "MailboxDepth").is_none());
        assert_eq!(registry.len(), BUILT_IN_COUNTER_NAMES.len() + 2);
    }

    #[test]
    fn test_iter_orders_by_kind() {
        let ext = CustomMetrics::new()
            .with_gauge("MailboxDepth")
            .with_timer("ProcessingTime");
        let registry = MetricRegistry::build("Akka", BUILT_IN_COUNTER_NAMES, Some(&ext));

        let kinds: Vec<MetricKind> = registry.iter().map(MetricDefinition::kind).collect();
        assert_eq!(kinds.len(), registry.len());
        assert!(kinds.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(kinds.last(), Some(&MetricKind::Timer));
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = MetricRegistry::with_defaults("Akka");
        assert!(registry.get(MetricKind::Counter, "receivedmessages").is_none());
    }

    #[test]
    fn test_custom_metrics_json_defaults() {
        let ext: CustomMetrics = serde_json::from_str(r#"{"gauges": ["MailboxDepth"]}"#).unwrap();
        assert!(ext.counters.is_empty());
        assert!(ext.timers.is_empty());
        assert!(ext.gauges.contains("MailboxDepth"));
        assert!(!ext.is_empty());
    }
}
