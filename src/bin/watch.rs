//! Hearth Watch
//!
//! Keeps the live dashboard panels refreshed in the foreground.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use hearth::{
    config::Config, display, error::Result, poll::Poller, source::SnapshotBackend, time::Zone,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;

use clap::Parser;

#[derive(Parser)]
#[command(name = "hearth-watch")]
#[command(author, version, about = "Live household dashboard")]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Household timezone (IANA id), overrides the config
    #[arg(long, env = "HEARTH_TZ")]
    zone: Option<String>,

    /// Snapshot directory, overrides the config
    #[arg(long, env = "HEARTH_SNAPSHOTS")]
    snapshots: Option<PathBuf>,

    /// Print each refresh below the last instead of redrawing
    #[arg(long)]
    no_clear: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = if let Some(ref path) = args.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };
    config.validate()?;

    // Initialize logging
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.general.log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::info!("Hearth watch starting...");

    let zone = match args.zone {
        Some(ref id) => Zone::parse(id)?,
        None => config.zone()?,
    };
    let snapshot_dir = match args.snapshots {
        Some(dir) => dir,
        None => config.snapshot_dir()?,
    };
    tracing::info!("Reading snapshots from {:?} in {}", snapshot_dir, zone);

    let backend = Arc::new(SnapshotBackend::new(snapshot_dir, zone));
    let poller = Arc::new(Poller::new(
        backend,
        config.polling.clone(),
        config.display.upcoming_limit,
    ));

    // Redraw on every publication
    let mut rx = poller.subscribe();
    let clear = !args.no_clear;
    let renderer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let snapshot = rx.borrow_and_update().clone();
            if clear {
                print!("\x1B[2J\x1B[H");
            }
            display::display_snapshot(&snapshot, &zone, zone.today(Utc::now()));
        }
    });

    // Handle shutdown signals
    let poller_clone = poller.clone();
    tokio::spawn(async move {
        let _ = signal::ctrl_c().await;
        tracing::info!("Received shutdown signal, stopping...");
        poller_clone.stop();
    });

    // Also handle SIGTERM
    #[cfg(unix)]
    {
        let poller_clone = poller.clone();
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::spawn(async move {
                    sigterm.recv().await;
                    tracing::info!("Received SIGTERM, stopping...");
                    poller_clone.stop();
                });
            }
            Err(e) => {
                tracing::warn!("Failed to register SIGTERM handler: {}. Use Ctrl+C to stop.", e);
            }
        }
    }

    // Run the poller
    poller.run().await?;
    renderer.abort();

    tracing::info!("Hearth watch stopped");
    Ok(())
}
