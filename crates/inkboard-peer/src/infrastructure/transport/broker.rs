//! Relay broker: the fan-out hub every peer connects to.
//!
//! The broker is deliberately dumb. It accepts TCP connections, reads wire
//! lines from each, and forwards every line to every connected peer,
//! **including the one that sent it**. It never parses event payloads, so a
//! board of old peers keeps working when a newer peer sends event kinds the
//! broker has never seen.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::TransportError;

const FANOUT_CAPACITY: usize = 1024;

/// Runs the relay broker on `bind_addr` until `running` goes false.
pub async fn run_broker(bind_addr: &str, running: Arc<AtomicBool>) -> Result<(), TransportError> {
    let listener =
        TcpListener::bind(bind_addr)
            .await
            .map_err(|source| TransportError::ConnectFailed {
                addr: bind_addr.to_string(),
                source,
            })?;
    serve(listener, running).await
}

/// Runs the relay broker on an already-bound listener.
///
/// Callers that bind to port 0 can read `local_addr` off the listener
/// before the broker starts accepting.
pub async fn serve(listener: TcpListener, running: Arc<AtomicBool>) -> Result<(), TransportError> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "broker listening");
    }

    let (fanout, _) = broadcast::channel::<String>(FANOUT_CAPACITY);

    while running.load(Ordering::Relaxed) {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        info!(%peer, "peer connected");
                        let fanout = fanout.clone();
                        tokio::spawn(async move {
                            if let Err(e) = serve_peer(stream, fanout).await {
                                debug!(%peer, error = %e, "peer connection ended");
                            }
                            info!(%peer, "peer disconnected");
                        });
                    }
                    Err(e) => warn!(error = %e, "accept failed"),
                }
            }
            _ = tokio::time::sleep(std::time::Duration::from_millis(200)) => {
                // Re-check the running flag.
            }
        }
    }

    info!("broker shutting down");
    Ok(())
}

/// Serves one peer connection: relay its lines in, its board's lines out.
async fn serve_peer(
    stream: TcpStream,
    fanout: broadcast::Sender<String>,
) -> Result<(), std::io::Error> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut fanout_rx = fanout.subscribe();

    loop {
        tokio::select! {
            incoming = lines.next_line() => {
                match incoming? {
                    Some(line) => {
                        // Fan out to everyone, sender included.
                        let _ = fanout.send(line);
                    }
                    None => return Ok(()),
                }
            }
            outgoing = fanout_rx.recv() => {
                match outgoing {
                    Ok(line) => {
                        write_half.write_all(line.as_bytes()).await?;
                        write_half.write_all(b"\n").await?;
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "slow peer dropped events");
                    }
                    Err(broadcast::error::RecvError::Closed) => return Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    use super::*;

    async fn spawn_broker() -> (String, Arc<AtomicBool>) {
        // Bind here so the port is ours before the broker task starts;
        // connections queue in the backlog until it accepts.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        tokio::spawn(async move {
            serve(listener, flag).await.unwrap();
        });
        (addr, running)
    }

    #[tokio::test]
    async fn test_broker_fans_out_to_all_peers_including_sender() {
        let (addr, running) = spawn_broker().await;

        let mut alice = tokio::net::TcpStream::connect(&addr).await.unwrap();
        let bob = tokio::net::TcpStream::connect(&addr).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;

        alice.write_all(b"T:alice:2\n").await.unwrap();

        let mut bob_lines = BufReader::new(bob).lines();
        assert_eq!(bob_lines.next_line().await.unwrap().unwrap(), "T:alice:2");

        let mut alice_lines = BufReader::new(alice).lines();
        assert_eq!(
            alice_lines.next_line().await.unwrap().unwrap(),
            "T:alice:2",
            "the sender hears its own events back"
        );

        running.store(false, Ordering::Relaxed);
    }
}
