use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fleetwatch::{FileProvider, FleetMonitor, Limits, LogNotifier, SubscriberId};

#[derive(Parser, Debug)]
#[command(name = "fleetwatch")]
#[command(about = "Fleet telemetry monitor with dwell alerting")]
struct Args {
    /// Path to the unit telemetry JSON file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Optional TOML settings file (FLEETWATCH_* env vars layer on top)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Evaluation interval in seconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Delay before the first tick, in seconds
    #[arg(long)]
    warmup: Option<u64>,

    /// Speed limit in km/h
    #[arg(long)]
    speed_limit: Option<f64>,

    /// Default dwell limit in minutes for units without an override
    #[arg(long)]
    dwell_limit: Option<u64>,

    /// Minimum seconds between two alerts for the same unit
    #[arg(long)]
    cooldown: Option<u64>,

    /// Alert subscriber ids (repeatable)
    #[arg(short, long = "subscriber")]
    subscribers: Vec<i64>,
}

/// Runtime settings, layered: built-in defaults, then the optional settings
/// file, then FLEETWATCH_* environment variables, then CLI flags.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct Settings {
    file: PathBuf,
    interval_secs: u64,
    warmup_secs: u64,
    speed_limit_kmh: f64,
    dwell_default_minutes: u64,
    cooldown_secs: u64,
    history_cap: usize,
    evict_batch: usize,
    subscribers: Vec<i64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            file: PathBuf::from("unidades.json"),
            interval_secs: 60,
            warmup_secs: 10,
            speed_limit_kmh: 100.0,
            dwell_default_minutes: 120,
            cooldown_secs: 14_400,
            history_cap: 1200,
            evict_batch: 150,
            subscribers: Vec::new(),
        }
    }
}

impl Settings {
    fn load(args: &Args) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = &args.config {
            builder = builder.add_source(File::from(path.as_path()));
        }
        let config = builder
            .add_source(Environment::with_prefix("FLEETWATCH"))
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;

        if let Some(file) = &args.file {
            settings.file = file.clone();
        }
        if let Some(interval) = args.interval {
            settings.interval_secs = interval;
        }
        if let Some(warmup) = args.warmup {
            settings.warmup_secs = warmup;
        }
        if let Some(speed_limit) = args.speed_limit {
            settings.speed_limit_kmh = speed_limit;
        }
        if let Some(dwell_limit) = args.dwell_limit {
            settings.dwell_default_minutes = dwell_limit;
        }
        if let Some(cooldown) = args.cooldown {
            settings.cooldown_secs = cooldown;
        }
        settings.subscribers.extend(&args.subscribers);

        Ok(settings)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let settings = Settings::load(&args)?;

    let provider = Box::new(FileProvider::new(&settings.file));
    let monitor = FleetMonitor::builder(provider, Arc::new(LogNotifier))
        .limits(Limits {
            speed_limit_kmh: settings.speed_limit_kmh,
            dwell_default_minutes: settings.dwell_default_minutes,
        })
        .cooldown_secs(settings.cooldown_secs)
        .interval(Duration::from_secs(settings.interval_secs))
        .warmup(Duration::from_secs(settings.warmup_secs))
        .history(settings.history_cap, settings.evict_batch)
        .build();

    let handle = monitor.start();
    for id in &settings.subscribers {
        handle.subscribe(SubscriberId(*id));
    }

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    handle.stop().await;

    Ok(())
}
