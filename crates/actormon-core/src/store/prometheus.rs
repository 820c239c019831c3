//! Prometheus text exposition for [`InMemoryStore`].

use std::collections::HashSet;
use std::fmt::Write;

use super::memory::{InMemoryStore, MetricSnapshot, MetricValue};
use crate::metrics::MetricKind;

/// Sample name suffixes a summary family occupies.
const SUMMARY_SUFFIXES: &[&str] = &["", "_sum", "_count"];

impl InMemoryStore {
    /// Export every category in Prometheus text format.
    ///
    /// Families are named `<category>_<metric>` in snake case; each bucket is
    /// a sample labelled with `instance`. Timers render as a summary plus a
    /// `_max` gauge. A name already taken by an earlier family gets the kind
    /// appended, then a numeric suffix, so every family is emitted once.
    pub fn to_prometheus(&self) -> String {
        let mut out = String::new();
        let mut families = FamilyNames::default();

        for category in self.snapshot() {
            for metric in &category.metrics {
                let base = format!(
                    "{}_{}",
                    metric_name(&category.category),
                    metric_name(&metric.name)
                );
                match metric.kind {
                    MetricKind::Counter | MetricKind::Gauge => {
                        let family = families.claim(&base, metric.kind, &[""]);
                        write_scalar_family(&mut out, &family, &category.category, metric);
                    }
                    MetricKind::Timer => {
                        let family = families.claim(&base, metric.kind, SUMMARY_SUFFIXES);
                        let max_family =
                            families.claim(&format!("{family}_max"), MetricKind::Gauge, &[""]);
                        write_timer_family(
                            &mut out,
                            &family,
                            &max_family,
                            &category.category,
                            metric,
                        );
                    }
                }
            }
        }

        out
    }
}

/// Family names handed out during one export.
#[derive(Default)]
struct FamilyNames {
    taken: HashSet<String>,
}

impl FamilyNames {
    /// Reserve the first free name derived from `base`.
    ///
    /// A name is free when it and every `base + suffix` sample name are
    /// unused.
    fn claim(&mut self, base: &str, kind: MetricKind, suffixes: &[&str]) -> String {
        let with_kind = format!("{base}_{}", kind.as_str());
        let mut candidate = base.to_string();
        let mut attempt = 1;
        while suffixes
            .iter()
            .any(|s| self.taken.contains(&format!("{candidate}{s}")))
        {
            attempt += 1;
            candidate = if attempt == 2 {
                with_kind.clone()
            } else {
                format!("{with_kind}_{}", attempt - 1)
            };
        }
        if candidate != base {
            tracing::debug!(base, family = %candidate, "prometheus family renamed to avoid collision");
        }
        for s in suffixes {
            self.taken.insert(format!("{candidate}{s}"));
        }
        candidate
    }
}

fn write_scalar_family(out: &mut String, family: &str, category: &str, metric: &MetricSnapshot) {
    let prom_type = if metric.kind == MetricKind::Counter {
        "counter"
    } else {
        "gauge"
    };
    let _ = writeln!(
        out,
        "# HELP {family} {} {} {}",
        escape_help(category),
        escape_help(&metric.name),
        metric.kind
    );
    let _ = writeln!(out, "# TYPE {family} {prom_type}");
    for (instance, value) in &metric.instances {
        if let MetricValue::Value(v) = value {
            let _ = writeln!(out, "{family}{{instance=\"{}\"}} {v}", escape_label(instance));
        }
    }
    out.push('\n');
}

fn write_timer_family(
    out: &mut String,
    family: &str,
    max_family: &str,
    category: &str,
    metric: &MetricSnapshot,
) {
    let category = escape_help(category);
    let name = escape_help(&metric.name);
    let _ = writeln!(out, "# HELP {family} {category} {name} timer");
    let _ = writeln!(out, "# TYPE {family} summary");
    let mut max_lines = String::new();
    for (instance, value) in &metric.instances {
        let MetricValue::Timer(snap) = value else {
            continue;
        };
        let label = escape_label(instance);
        let _ = writeln!(out, "{family}{{instance=\"{label}\",quantile=\"0.5\"}} {}", snap.p50);
        let _ = writeln!(out, "{family}{{instance=\"{label}\",quantile=\"0.99\"}} {}", snap.p99);
        let _ = writeln!(out, "{family}_sum{{instance=\"{label}\"}} {}", snap.sum);
        let _ = writeln!(out, "{family}_count{{instance=\"{label}\"}} {}", snap.count);
        let _ = writeln!(max_lines, "{max_family}{{instance=\"{label}\"}} {}", snap.max);
    }
    out.push('\n');

    let _ = writeln!(out, "# HELP {max_family} {category} {name} timer maximum");
    let _ = writeln!(out, "# TYPE {max_family} gauge");
    out.push_str(&max_lines);
    out.push('\n');
}

/// Convert a label such as `ReceivedMessages` to `received_messages`.
fn metric_name(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(raw.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower)
            {
                out.push('_');
            }
        }
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push('_');
        }
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Escape `# HELP` text: backslashes and line feeds.
fn escape_help(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\n', "\\n")
}

fn escape_label(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MetricDefinition;
    use crate::store::MetricStore;

    #[test]
    fn test_metric_name() {
        assert_eq!(metric_name("ReceivedMessages"), "received_messages");
        assert_eq!(metric_name("Akka"), "akka");
        assert_eq!(metric_name("HTTPRequests"), "http_requests");
        assert_eq!(metric_name("my-metric.v2"), "my_metric_v2");
        assert_eq!(metric_name("2xx"), "_2xx");
    }

    #[test]
    fn test_escape_label() {
        assert_eq!(escape_label(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_label("line\nbreak"), "line\\nbreak");
    }

    #[test]
    fn test_prometheus_format() {
        let counter = MetricDefinition::counter("ReceivedMessages", "Akka");
        let timer = MetricDefinition::timer("ProcessingTime", "Akka");
        let store = InMemoryStore::new();
        store
            .register_definitions("Akka", &[counter.clone(), timer.clone()])
            .unwrap();

        store.apply_counter_delta(&counter, "_Total", 4).unwrap();
        store.apply_counter_delta(&counter, "system/user/worker-7", 3).unwrap();
        store.apply_timer_sample(&timer, "_Total", 20).unwrap();

        let text = store.to_prometheus();

        assert!(text.contains("# TYPE akka_received_messages counter"));
        assert!(text.contains("akka_received_messages{instance=\"_Total\"} 4"));
        assert!(text.contains("akka_received_messages{instance=\"system/user/worker-7\"} 3"));
        assert!(text.contains("# TYPE akka_processing_time summary"));
        assert!(text.contains("akka_processing_time_count{instance=\"_Total\"} 1"));
        assert!(text.contains("akka_processing_time_sum{instance=\"_Total\"} 20"));
        assert!(text.contains("akka_processing_time_max{instance=\"_Total\"} 20"));
    }

    #[test]
    fn test_family_names_are_unique_across_kinds() {
        let defs = [
            MetricDefinition::counter("Work", "Akka"),
            MetricDefinition::gauge("Work", "Akka"),
            MetricDefinition::gauge("LatencyMax", "Akka"),
            MetricDefinition::counter("LatencySum", "Akka"),
            MetricDefinition::timer("Latency", "Akka"),
        ];
        let store = InMemoryStore::new();
        store.register_definitions("Akka", &defs).unwrap();
        store.apply_counter_delta(&defs[0], "_Total", 1).unwrap();
        store.apply_gauge_value(&defs[1], "_Total", 2).unwrap();
        store.apply_gauge_value(&defs[2], "_Total", 3).unwrap();
        store.apply_counter_delta(&defs[3], "_Total", 4).unwrap();
        store.apply_timer_sample(&defs[4], "_Total", 5).unwrap();

        let text = store.to_prometheus();
        let families: Vec<&str> = text
            .lines()
            .filter_map(|l| l.strip_prefix("# TYPE "))
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        let unique: HashSet<&str> = families.iter().copied().collect();

        assert_eq!(families.len(), 6);
        assert_eq!(unique.len(), families.len());
        assert!(text.contains("akka_work{instance=\"_Total\"} 1"));
        assert!(text.contains("akka_work_gauge{instance=\"_Total\"} 2"));
        assert!(text.contains("akka_latency_max{instance=\"_Total\"} 5"));
        assert!(text.contains("akka_latency_max_gauge{instance=\"_Total\"} 3"));
        assert!(text.contains("akka_latency_sum_counter{instance=\"_Total\"} 4"));
        assert!(text.contains("akka_latency_sum{instance=\"_Total\"} 5"));
    }

    #[test]
    fn test_help_text_is_escaped() {
        assert_eq!(escape_help("a\\b\nc\"d"), "a\\\\b\\nc\"d");

        let def = MetricDefinition::counter("Bad\nName\\x", "Akka");
        let store = InMemoryStore::new();
        store.register_definitions("Akka", &[def.clone()]).unwrap();
        store.apply_counter_delta(&def, "_Total", 1).unwrap();

        let text = store.to_prometheus();
        assert!(text.contains("# HELP akka_bad_name_x Akka Bad\\nName\\\\x counter"));
        assert!(text
            .lines()
            .all(|l| l.is_empty() || l.starts_with('#') || l.starts_with("akka_")));
    }
}
