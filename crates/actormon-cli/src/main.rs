//! actormon command-line replay tool.
//!
//! Builds a monitor over an in-memory store, replays a script of metric
//! updates through it and prints the resulting buckets.

mod error;
mod formatter;
mod replay;

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use formatter::OutputFormat;

use actormon_core::{ActorPerformanceMonitor, CustomMetrics, InMemoryStore, MonitorConfig};

use crate::error::CliError;

/// actormon replay tool
#[derive(Parser, Debug)]
#[command(name = "actormon")]
#[command(version, about = "Replay metric updates through an actormon monitor")]
pub struct Args {
    /// Monitor configuration file (JSON)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Category label, overrides the configuration file
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Extension metric names (JSON with counters/gauges/timers), overrides the configuration file
    #[arg(short = 'm', long)]
    pub metrics: Option<PathBuf>,

    /// Replay script; reads stdin when omitted
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "actormon=info,actormon_core=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    tracing::info!(
        category = %config.category,
        custom_metrics = config.custom_metrics.is_some(),
        "configuration loaded"
    );

    let store = Arc::new(InMemoryStore::new());
    let monitor = ActorPerformanceMonitor::new(&config, store.clone())?;

    let script = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    replay::replay(&monitor, &script)?;
    println!("{}", formatter::render(&store, args.format)?);
    Ok(())
}

/// Merge the configuration file with command-line overrides.
fn load_config(args: &Args) -> Result<MonitorConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => MonitorConfig::from_json_file(path)?,
        None => MonitorConfig::default(),
    };

    if let Some(category) = &args.category {
        config = config.with_category(category.clone());
    }
    if let Some(path) = &args.metrics {
        let data = std::fs::read_to_string(path)?;
        let metrics: CustomMetrics = serde_json::from_str(&data)?;
        config = config.with_custom_metrics(metrics);
    }

    config.validate()?;
    Ok(config)
}
