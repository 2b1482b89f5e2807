use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use daylog::{log_error, log_info, log_warning, Facility, FacilityLayer};

/// Set to make the demo panic after logging, exercising the recovery path
const PANIC_ENV: &str = "DAYLOG_DEMO_PANIC";

fn main() -> Result<()> {
    // Exits the process if the log directory cannot be created
    let (log, guard) = daylog::initialize().context("Failed to open daily log file")?;

    // Route `tracing` events into the same channels
    tracing_subscriber::registry()
        .with(FacilityLayer::new(log.clone()))
        .init();

    log_info!(log, "Logging to:", guard.path().display());

    log.catch_panic(|| run(&log));

    guard.close().context("Failed to close daily log file")
}

fn run(log: &Facility) {
    log_warning!(log, "running without a config file, using defaults");
    tracing::info!(pid = std::process::id(), "started");

    check_inputs(log, &[]);

    if std::env::var_os(PANIC_ENV).is_some() {
        panic!("unrecoverable state");
    }
}

fn check_inputs(log: &Facility, inputs: &[&str]) {
    if inputs.is_empty() {
        log_error!(log, "no inputs given, ", inputs.len(), " files processed");
    }
}
