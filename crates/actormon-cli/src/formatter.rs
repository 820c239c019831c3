//! Output formatters for store contents.

use clap::ValueEnum;
use comfy_table::Table;

use actormon_core::store::{CategorySnapshot, MetricValue};
use actormon_core::InMemoryStore;

use crate::error::CliError;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table
    Table,
    /// JSON document
    Json,
    /// Prometheus text exposition
    Prometheus,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Prometheus => write!(f, "prometheus"),
        }
    }
}

/// Render the store in the requested format.
pub fn render(store: &InMemoryStore, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(table(&store.snapshot())),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&store.snapshot())?),
        OutputFormat::Prometheus => Ok(store.to_prometheus()),
    }
}

fn table(categories: &[CategorySnapshot]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Metric", "Kind", "Instance", "Value"]);

    for category in categories {
        for metric in &category.metrics {
            for (instance, value) in &metric.instances {
                table.add_row(vec![
                    category.category.clone(),
                    metric.name.clone(),
                    metric.kind.to_string(),
                    instance.clone(),
                    format_value(value),
                ]);
            }
        }
    }

    table.to_string()
}

fn format_value(value: &MetricValue) -> String {
    match value {
        MetricValue::Value(v) => v.to_string(),
        MetricValue::Timer(t) => format!(
            "count={} sum={} max={} p50={} p99={}",
            t.count, t.sum, t.max, t.p50, t.p99
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actormon_core::{MetricDefinition, MetricStore};

    fn populated() -> InMemoryStore {
        let counter = MetricDefinition::counter("DeadLetters", "Akka");
        let timer = MetricDefinition::timer("ProcessingTime", "Akka");
        let store = InMemoryStore::new();
        store
            .register_definitions("Akka", &[counter.clone(), timer.clone()])
            .unwrap();
        store.apply_counter_delta(&counter, "worker-1", 2).unwrap();
        store.apply_timer_sample(&timer, "_Total", 9).unwrap();
        store
    }

    #[test]
    fn test_table_output() {
        let out = render(&populated(), OutputFormat::Table).unwrap();
        assert!(out.contains("DeadLetters"));
        assert!(out.contains("worker-1"));
        assert!(out.contains("count=1 sum=9 max=9"));
    }

    #[test]
    fn test_json_output() {
        let out = render(&populated(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["category"], "Akka");
        assert_eq!(parsed[0]["metrics"][0]["name"], "DeadLetters");
        assert_eq!(parsed[0]["metrics"][0]["kind"], "counter");
        assert_eq!(parsed[0]["metrics"][0]["instances"]["worker-1"], 2);
    }

    #[test]
    fn test_prometheus_output() {
        let out = render(&populated(), OutputFormat::Prometheus).unwrap();
        assert!(out.contains("akka_dead_letters{instance=\"worker-1\"} 2"));
    }
}
