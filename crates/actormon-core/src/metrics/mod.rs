//! Metric definitions, the kind-scoped registry and name resolution.
//!
//! # Usage
//!
//! ```
//! use actormon_core::metrics::{resolve, MetricKind, MetricRegistry, TOTAL_INSTANCE};
//!
//! let registry = MetricRegistry::with_defaults("Akka");
//! let counters = registry.definitions(MetricKind::Counter);
//!
//! let total = resolve("ReceivedMessages", counters).unwrap();
//! assert_eq!(total.instance, TOTAL_INSTANCE);
//!
//! let actor = resolve("system/user/worker-7/ReceivedMessages", counters).unwrap();
//! assert_eq!(actor.instance, "system/user/worker-7");
//! ```

mod definition;
mod registry;
mod resolver;

pub use definition::{MetricDefinition, MetricKind};
pub use registry::{CustomMetrics, DefinitionMap, MetricRegistry, BUILT_IN_COUNTER_NAMES};
pub use resolver::{resolve, Resolution, TOTAL_INSTANCE};
