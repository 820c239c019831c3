//! Metric definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a tracked quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Accumulating count.
    Counter,
    /// Last-written value.
    Gauge,
    /// Duration samples.
    Timer,
}

impl MetricKind {
    /// All kinds in registration order.
    pub const ALL: [MetricKind; 3] = [MetricKind::Counter, MetricKind::Gauge, MetricKind::Timer];

    /// Lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Timer => "timer",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable descriptor of a trackable quantity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricDefinition {
    name: String,
    category: String,
    kind: MetricKind,
}

impl MetricDefinition {
    /// Create a definition.
    pub fn new(name: impl Into<String>, category: impl Into<String>, kind: MetricKind) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            kind,
        }
    }

    /// Create a counter definition.
    pub fn counter(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(name, category, MetricKind::Counter)
    }

    /// Create a gauge definition.
    pub fn gauge(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(name, category, MetricKind::Gauge)
    }

    /// Create a timer definition.
    pub fn timer(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self::new(name, category, MetricKind::Timer)
    }

    /// Get the metric name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the category label.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get the metric kind.
    pub fn kind(&self) -> MetricKind {
        self.kind
    }
}

impl fmt::Display for MetricDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.category, self.name, self.kind)
    }
}
