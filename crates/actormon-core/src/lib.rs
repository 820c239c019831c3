//! actormon core - metric registry, name resolution and update dispatch.
//!
//! Applications emit named counter, gauge and timer updates, optionally
//! qualified with an entity path (`system/user/worker-7/ReceivedMessages`).
//! This crate maps each update to a registered [`MetricDefinition`] and an
//! instance bucket (`_Total` or the entity qualifier) and forwards it to a
//! [`MetricStore`].

pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod store;

pub use config::{MonitorConfig, DEFAULT_CATEGORY};
pub use error::{Error, Result};
pub use metrics::{
    resolve, CustomMetrics, MetricDefinition, MetricKind, MetricRegistry, Resolution,
    BUILT_IN_COUNTER_NAMES, TOTAL_INSTANCE,
};
pub use monitor::{
    new_shared_monitor, ActorPerformanceMonitor, MonitoringClient, SharedMonitor,
    MONITOR_CLIENT_ID,
};
pub use store::{InMemoryStore, MetricStore, MetricValue, TimerSnapshot};
