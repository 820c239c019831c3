//! Replay scripts.
//!
//! One update per line:
//!
//! ```text
//! counter <name> <delta> [sample_rate]
//! gauge   <name> <value> [sample_rate]
//! timing  <name> <ticks> [sample_rate]
//! reset   <name>
//! reset-all
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Names cannot contain
//! whitespace.

use std::str::FromStr;

use actormon_core::{ActorPerformanceMonitor, MonitoringClient};

use crate::error::CliError;

const DEFAULT_SAMPLE_RATE: f64 = 1.0;

/// A single replayed operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Counter {
        name: String,
        delta: i64,
        sample_rate: f64,
    },
    Gauge {
        name: String,
        value: i64,
        sample_rate: f64,
    },
    Timing {
        name: String,
        ticks: u64,
        sample_rate: f64,
    },
    Reset {
        name: String,
    },
    ResetAll,
}

impl Update {
    /// Apply this update to a monitor.
    pub fn apply(&self, monitor: &ActorPerformanceMonitor) -> actormon_core::Result<()> {
        match self {
            Update::Counter {
                name,
                delta,
                sample_rate,
            } => monitor.update_counter(name, *delta, *sample_rate),
            Update::Gauge {
                name,
                value,
                sample_rate,
            } => monitor.update_gauge(name, *value, *sample_rate),
            Update::Timing {
                name,
                ticks,
                sample_rate,
            } => monitor.update_timing(name, *ticks, *sample_rate),
            Update::Reset { name } => monitor.reset_counter_total(name),
            Update::ResetAll => monitor.reset_all_counter_totals(),
        }
    }
}

/// Parse one line. Returns `Ok(None)` for blank and comment lines.
pub fn parse_line(line: &str) -> Result<Option<Update>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let parts: Vec<&str> = line.split_whitespace().collect();
    let op = parts[0].to_ascii_lowercase();

    let update = match op.as_str() {
        "counter" => {
            let (name, delta, sample_rate) = valued(&parts)?;
            Update::Counter {
                name,
                delta,
                sample_rate,
            }
        }
        "gauge" => {
            let (name, value, sample_rate) = valued(&parts)?;
            Update::Gauge {
                name,
                value,
                sample_rate,
            }
        }
        "timing" => {
            let (name, ticks, sample_rate) = valued(&parts)?;
            Update::Timing {
                name,
                ticks,
                sample_rate,
            }
        }
        "reset" => match parts.as_slice() {
            [_, name] => Update::Reset {
                name: name.to_string(),
            },
            _ => return Err("usage: reset <name>".to_string()),
        },
        "reset-all" => match parts.len() {
            1 => Update::ResetAll,
            _ => return Err("usage: reset-all".to_string()),
        },
        other => return Err(format!("unknown operation '{other}'")),
    };

    Ok(Some(update))
}

/// Parse `<op> <name> <value> [sample_rate]`.
fn valued<T: FromStr>(parts: &[&str]) -> Result<(String, T, f64), String> {
    let (name, value, rate) = match parts {
        [_, name, value] => (*name, *value, None),
        [_, name, value, rate] => (*name, *value, Some(*rate)),
        [op, ..] => return Err(format!("usage: {op} <name> <value> [sample_rate]")),
        [] => return Err("empty line".to_string()),
    };

    let value = value
        .parse::<T>()
        .map_err(|_| format!("invalid value '{value}'"))?;
    let sample_rate = match rate {
        Some(r) => r
            .parse::<f64>()
            .map_err(|_| format!("invalid sample rate '{r}'"))?,
        None => DEFAULT_SAMPLE_RATE,
    };

    Ok((name.to_string(), value, sample_rate))
}

/// Parse a whole script, reporting the first bad line.
pub fn parse_script(content: &str) -> Result<Vec<Update>, CliError> {
    let mut updates = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(update)) => updates.push(update),
            Ok(None) => {}
            Err(message) => {
                return Err(CliError::Parse {
                    line: idx + 1,
                    message,
                })
            }
        }
    }
    Ok(updates)
}

/// Parse and apply a script. Returns the number of updates applied.
pub fn replay(monitor: &ActorPerformanceMonitor, content: &str) -> Result<usize, CliError> {
    let updates = parse_script(content)?;
    for update in &updates {
        update.apply(monitor)?;
    }
    tracing::info!(updates = updates.len(), "replay complete");
    Ok(updates.len())
}
