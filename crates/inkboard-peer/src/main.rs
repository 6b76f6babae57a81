//! Inkboard peer entry point.
//!
//! Wires together configuration, the broker transport, the input source,
//! the render surface, and the session loop.
//!
//! ```text
//! main()
//!  └─ load PeerConfig, apply CLI overrides
//!  └─ TcpTransport::connect(broker)
//!  └─ Session::run
//!       ├─ local input flow   (PointerSource channel)
//!       ├─ remote mirror flow (transport subscription)
//!       └─ render tick
//! ```
//!
//! This build is headless: input comes from a scripted [`MockPointerSource`]
//! and drawing goes to a [`RecordingSurface`]. A desktop build would swap in
//! a windowing backend behind the same two traits and change nothing else.
//!
//! [`MockPointerSource`]: inkboard_peer::infrastructure::pointer::mock::MockPointerSource
//! [`RecordingSurface`]: inkboard_peer::infrastructure::surface::mock::RecordingSurface

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inkboard_core::PeerId;
use inkboard_peer::application::{Session, SessionOptions};
use inkboard_peer::infrastructure::config::{self, PeerConfig};
use inkboard_peer::infrastructure::pointer::{mock::MockPointerSource, PointerSource};
use inkboard_peer::infrastructure::surface::mock::RecordingSurface;
use inkboard_peer::infrastructure::transport::tcp::TcpTransport;

/// Collaborative drawing board peer.
#[derive(Debug, Parser)]
#[command(name = "inkboard-peer", version, about)]
struct Args {
    /// Path to a config file (defaults to the platform config location).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Peer identity announced with every event. Must not contain ':'.
    #[arg(long)]
    name: Option<String>,

    /// Board topic to join.
    #[arg(long)]
    topic: Option<String>,

    /// Broker address, host:port.
    #[arg(long)]
    broker: Option<String>,

    /// Render ticks per second.
    #[arg(long)]
    frame_rate: Option<u32>,

    /// Broadcast local pan changes as viewport events.
    #[arg(long)]
    share_viewport: bool,
}

impl Args {
    /// CLI flags win over the config file, which wins over defaults.
    fn apply_to(&self, cfg: &mut PeerConfig) {
        if let Some(name) = &self.name {
            cfg.peer.identity = name.clone();
        }
        if let Some(topic) = &self.topic {
            cfg.board.topic = topic.clone();
        }
        if let Some(broker) = &self.broker {
            cfg.board.broker_addr = broker.clone();
        }
        if let Some(frame_rate) = self.frame_rate {
            cfg.board.frame_rate = frame_rate;
        }
        if self.share_viewport {
            cfg.board.share_viewport = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };
    args.apply_to(&mut cfg);

    // The identity is a wire field; a ':' in it would corrupt every line
    // this peer emits. Refuse to start rather than publish garbage.
    if cfg.peer.identity.contains(':') {
        anyhow::bail!(
            "peer identity must not contain ':' (got {:?})",
            cfg.peer.identity
        );
    }

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cfg.peer.log_level.clone())),
        )
        .init();

    info!(
        identity = %cfg.peer.identity,
        topic = %cfg.board.topic,
        broker = %cfg.board.broker_addr,
        "Inkboard peer starting"
    );

    let transport = Arc::new(TcpTransport::connect(&cfg.board.broker_addr).await?);

    // Shutdown flag shared with the signal handler.
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    // Headless wiring.  A desktop build would construct its windowing
    // backend here instead of the mock pair.
    let pointer = MockPointerSource::new();
    let input_rx = pointer
        .start()
        .map_err(|e| anyhow::anyhow!("failed to start input source: {e}"))?;
    let surface = Box::new(RecordingSurface::new());

    let options = SessionOptions {
        identity: PeerId::from(cfg.peer.identity.clone()),
        topic: cfg.board.topic.clone(),
        frame_rate: cfg.board.frame_rate,
        share_viewport: cfg.board.share_viewport,
    };
    let mut session = Session::new(options, surface, transport, Arc::clone(&running));

    info!("Inkboard peer ready.  Press Ctrl-C to exit.");

    if let Err(e) = session.run(input_rx).await {
        warn!(error = %e, "session ended with error");
    }
    pointer.stop();

    info!("Inkboard peer stopped");
    Ok(())
}
