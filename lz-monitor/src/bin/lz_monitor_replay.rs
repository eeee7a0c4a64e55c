//! lz-monitor replay - run recorded observations through the pipeline
//!
//! Reads a JSON array of raw events, feeds them to a monitor backed by an
//! in-memory transport, and prints every report as one JSON line.
//!
//! Usage:
//!     cargo run --features replay --bin lz-monitor-replay -- events.json --options options.json
//!     lz-monitor-replay events.json --options options.json
//!     lz-monitor-replay events.json --options options.json --pretty

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use lz_monitor::report::normalize_legacy_fields;
use lz_monitor::{DeviceInfo, MemoryTransport, Monitor, MonitorOptions, RawEvent};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "lz-monitor-replay")]
#[command(about = "Replay recorded browser observations through lz-monitor")]
#[command(version)]
struct Args {
    /// JSON file holding an array of raw events
    events: PathBuf,

    /// JSON file holding monitor options (dsn, apiKey, ...)
    #[arg(short, long)]
    options: PathBuf,

    /// User agent used to fill the device fact sheet
    #[arg(long)]
    user_agent: Option<String>,

    /// Pretty-print reports
    #[arg(long)]
    pretty: bool,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lz_monitor=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let options = match load_options(&args.options) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error loading options: {}", e);
            std::process::exit(1);
        }
    };

    let events: Vec<RawEvent> = match read_json(&args.events) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("Error loading events: {}", e);
            std::process::exit(1);
        }
    };

    let device = args
        .user_agent
        .as_deref()
        .map(DeviceInfo::from_user_agent)
        .unwrap_or_default();

    let transport = MemoryTransport::new();
    let monitor = match Monitor::with_device(options, device, Arc::new(transport.clone())) {
        Ok(monitor) => monitor,
        Err(e) => {
            eprintln!("Error starting monitor: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(events = events.len(), uuid = %monitor.uuid(), "Replaying events");

    for event in events {
        monitor.dispatch(event);
    }

    for report in transport.drain() {
        let line = if args.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        match line {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(error = %e, "Failed to serialize report"),
        }
    }

    match serde_json::to_string(&monitor.stats()) {
        Ok(stats) => eprintln!("{}", stats),
        Err(e) => tracing::error!(error = %e, "Failed to serialize stats"),
    }
}

fn load_options(path: &Path) -> lz_monitor::MonitorResult<MonitorOptions> {
    let mut value: Value = read_json(path)?;
    // Older configs name the key `appId`
    normalize_legacy_fields(&mut value);
    let mut builder = MonitorOptions::builder();
    // Rejected keys are logged and keep their defaults
    let _ = builder.bind_json(&value);
    Ok(builder.build())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> lz_monitor::MonitorResult<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}
