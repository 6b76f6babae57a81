//! Inkboard relay broker entry point.
//!
//! Runs the fan-out relay every peer on a board connects to. One broker can
//! serve many boards at once: it relays lines without parsing them, and
//! peers filter by topic on their own side.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use inkboard_peer::infrastructure::transport::broker::run_broker;

/// Relay broker for inkboard peers.
#[derive(Debug, Parser)]
#[command(name = "inkboard-broker", version, about)]
struct Args {
    /// Address to listen on, host:port.
    #[arg(long, default_value = "0.0.0.0:5556")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    info!(bind = %args.bind, "Inkboard broker starting.  Press Ctrl-C to exit.");
    run_broker(&args.bind, running).await?;
    info!("Inkboard broker stopped");
    Ok(())
}
