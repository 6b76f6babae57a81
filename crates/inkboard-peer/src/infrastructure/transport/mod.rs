//! Pub/sub transport for board events.
//!
//! Every peer publishes its encoded events to a shared broker and subscribes
//! to the board topic. The broker fans each line out to **all** connected
//! peers, including the one that sent it; echo suppression by sender
//! identity happens in the application layer, not here.
//!
//! Two implementations exist: [`tcp::TcpTransport`] speaks line-delimited
//! text over a TCP connection to the relay broker, and [`memory::MemoryHub`]
//! wires sessions together in-process for tests.

use async_trait::async_trait;
use tokio::sync::mpsc;

pub mod broker;
pub mod memory;
pub mod tcp;

/// Error type for transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to connect to broker at {addr}: {source}")]
    ConnectFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to publish event: {0}")]
    PublishFailed(String),
    #[error("transport already has an active subscription")]
    AlreadySubscribed,
    #[error("transport connection closed")]
    Closed,
}

/// Trait abstracting the pub/sub fabric between peers.
///
/// `publish` sends one encoded wire line to every subscriber of the board,
/// sender included. `subscribe` returns a receiver yielding only lines whose
/// topic prefix matches; the channel closing means the transport died and
/// the session should shut down.
#[async_trait]
pub trait BoardTransport: Send + Sync {
    /// Publishes one wire line to all peers on the board.
    async fn publish(&self, line: String) -> Result<(), TransportError>;

    /// Subscribes to lines whose topic field equals `topic`.
    ///
    /// Single-socket implementations support one subscription per
    /// connection and return [`TransportError::AlreadySubscribed`] on a
    /// second call.
    fn subscribe(&self, topic: &str)
        -> Result<mpsc::UnboundedReceiver<String>, TransportError>;
}
