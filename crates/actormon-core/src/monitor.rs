//! Update dispatch.
//!
//! [`ActorPerformanceMonitor`] accepts typed updates, resolves the raw name
//! against the registry slice for that kind, and forwards the resolved
//! `(definition, instance, value)` to its [`MetricStore`]. Names that resolve
//! to nothing are dropped without error.

use std::sync::Arc;

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::metrics::{
    resolve, MetricDefinition, MetricKind, MetricRegistry, Resolution, BUILT_IN_COUNTER_NAMES,
    TOTAL_INSTANCE,
};
use crate::store::MetricStore;

/// Identifier reported by the performance-counter monitor.
pub const MONITOR_CLIENT_ID: &str = "f651b9f8-aa38-45bd-bfb9-c5595519c23c";

/// A sink for actor-system metric updates.
///
/// `sample_rate` is carried for callers that down-sample upstream;
/// implementations record whatever they are given.
pub trait MonitoringClient: Send + Sync {
    /// Add `delta` to a counter.
    fn update_counter(&self, name: &str, delta: i64, sample_rate: f64) -> Result<()>;

    /// Set a gauge.
    fn update_gauge(&self, name: &str, value: i64, sample_rate: f64) -> Result<()>;

    /// Record a timing sample.
    fn update_timing(&self, name: &str, duration_ticks: u64, sample_rate: f64) -> Result<()>;

    /// Stable identifier for this client type.
    fn monitoring_client_id(&self) -> &'static str;

    /// Release backend resources.
    fn dispose(&self) {}
}

/// Monitor that routes updates into category/instance buckets.
pub struct ActorPerformanceMonitor {
    registry: MetricRegistry,
    store: Arc<dyn MetricStore>,
}

impl ActorPerformanceMonitor {
    /// Build the registry from `config` and register it with `store`.
    ///
    /// Fails if the configuration is invalid or the store cannot create the
    /// category; no monitor is returned with a partially registered registry.
    pub fn new(config: &MonitorConfig, store: Arc<dyn MetricStore>) -> Result<Self> {
        config.validate()?;
        let registry = MetricRegistry::build(
            &config.category,
            BUILT_IN_COUNTER_NAMES,
            config.custom_metrics.as_ref(),
        );
        Self::with_registry(registry, store)
    }

    /// Register a prebuilt registry with `store`.
    pub fn with_registry(registry: MetricRegistry, store: Arc<dyn MetricStore>) -> Result<Self> {
        let definitions: Vec<MetricDefinition> = registry.iter().cloned().collect();
        if let Err(e) = store.register_definitions(registry.category(), &definitions) {
            tracing::error!(category = registry.category(), error = %e, "metric registration failed");
            return Err(e);
        }

        Ok(Self { registry, store })
    }

    /// Get the registry updates resolve against.
    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Get the backing store.
    pub fn store(&self) -> &Arc<dyn MetricStore> {
        &self.store
    }

    /// Resolve a raw name against one kind's definitions.
    pub fn resolve<'a>(&'a self, kind: MetricKind, name: &'a str) -> Option<Resolution<'a>> {
        resolve(name, self.registry.definitions(kind))
    }

    /// Reset the aggregate bucket of the counter `name` resolves to.
    ///
    /// Entity-qualified names reset the definition's `_Total` bucket; entity
    /// buckets are left alone.
    pub fn reset_counter_total(&self, name: &str) -> Result<()> {
        match self.resolve(MetricKind::Counter, name) {
            Some(res) => self.store.reset_counter_total(res.definition, TOTAL_INSTANCE),
            None => Ok(()),
        }
    }

    /// Reset the aggregate bucket of every registered counter.
    pub fn reset_all_counter_totals(&self) -> Result<()> {
        for definition in self.registry.counters().values() {
            self.store.reset_counter_total(definition, TOTAL_INSTANCE)?;
        }
        tracing::debug!(
            category = self.registry.category(),
            counters = self.registry.counters().len(),
            "counter totals reset"
        );
        Ok(())
    }
}

impl MonitoringClient for ActorPerformanceMonitor {
    fn update_counter(&self, name: &str, delta: i64, _sample_rate: f64) -> Result<()> {
        match self.resolve(MetricKind::Counter, name) {
            Some(res) => self
                .store
                .apply_counter_delta(res.definition, res.instance, delta),
            None => Ok(()),
        }
    }

    fn update_gauge(&self, name: &str, value: i64, _sample_rate: f64) -> Result<()> {
        match self.resolve(MetricKind::Gauge, name) {
            Some(res) => self.store.apply_gauge_value(res.definition, res.instance, value),
            None => Ok(()),
        }
    }

    fn update_timing(&self, name: &str, duration_ticks: u64, _sample_rate: f64) -> Result<()> {
        match self.resolve(MetricKind::Timer, name) {
            Some(res) => self
                .store
                .apply_timer_sample(res.definition, res.instance, duration_ticks),
            None => Ok(()),
        }
    }

    fn monitoring_client_id(&self) -> &'static str {
        MONITOR_CLIENT_ID
    }
}

/// Shared monitor handle.
pub type SharedMonitor = Arc<ActorPerformanceMonitor>;

/// Create a shared monitor.
pub fn new_shared_monitor(
    config: &MonitorConfig,
    store: Arc<dyn MetricStore>,
) -> Result<SharedMonitor> {
    ActorPerformanceMonitor::new(config, store).map(Arc::new)
}
