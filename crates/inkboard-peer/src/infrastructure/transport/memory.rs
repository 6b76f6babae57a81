//! In-process transport for tests and the headless binary.
//!
//! A [`MemoryHub`] plays the broker's role inside one process: every line
//! published through any of its endpoints is delivered to every endpoint's
//! subscribers, the publisher's included. That mirrors the relay broker's
//! behavior exactly, so echo suppression gets exercised in tests the same
//! way it is in production.

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

use super::{BoardTransport, TransportError};

const HUB_CAPACITY: usize = 1024;

/// An in-process fan-out hub connecting [`MemoryTransport`] endpoints.
#[derive(Clone)]
pub struct MemoryHub {
    sender: broadcast::Sender<String>,
}

impl MemoryHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(HUB_CAPACITY);
        Self { sender }
    }

    /// Creates a transport endpoint attached to this hub.
    pub fn endpoint(&self) -> MemoryTransport {
        MemoryTransport {
            sender: self.sender.clone(),
        }
    }
}

impl Default for MemoryHub {
    fn default() -> Self {
        Self::new()
    }
}

/// One peer's connection to a [`MemoryHub`].
pub struct MemoryTransport {
    sender: broadcast::Sender<String>,
}

#[async_trait]
impl BoardTransport for MemoryTransport {
    async fn publish(&self, line: String) -> Result<(), TransportError> {
        // A send error means no endpoint is subscribed yet; with a live hub
        // handle around that is transient, not fatal.
        let _ = self.sender.send(line);
        Ok(())
    }

    fn subscribe(
        &self,
        topic: &str,
    ) -> Result<mpsc::UnboundedReceiver<String>, TransportError> {
        let mut hub_rx = self.sender.subscribe();
        let (tx, rx) = mpsc::unbounded_channel();
        let prefix = format!("{topic}:");

        tokio::spawn(async move {
            loop {
                match hub_rx.recv().await {
                    Ok(line) => {
                        if line.starts_with(&prefix) && tx.send(line).is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "memory transport dropped events under load");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Ok(rx)
    }
}
