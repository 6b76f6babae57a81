//! TCP transport speaking line-delimited wire text to the relay broker.
//!
//! Each peer holds one TCP connection to the broker. Published events are
//! written as one line each; the broker echoes every line it receives to
//! every connection, so the read side of the same socket carries both our
//! own events and everyone else's.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use super::{BoardTransport, TransportError};

/// A connection to the relay broker over TCP.
pub struct TcpTransport {
    writer: Arc<Mutex<OwnedWriteHalf>>,
    reader: std::sync::Mutex<Option<OwnedReadHalf>>,
    peer_addr: String,
}

impl TcpTransport {
    /// Connects to the broker at `addr` (e.g. `"127.0.0.1:5556"`).
    pub async fn connect(addr: &str) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|source| TransportError::ConnectFailed {
                addr: addr.to_string(),
                source,
            })?;
        // Wire lines are tiny and latency-sensitive; never batch them.
        if let Err(e) = stream.set_nodelay(true) {
            warn!(error = %e, "failed to set TCP_NODELAY");
        }
        info!(addr, "connected to broker");

        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            writer: Arc::new(Mutex::new(write_half)),
            reader: std::sync::Mutex::new(Some(read_half)),
            peer_addr: addr.to_string(),
        })
    }
}

#[async_trait]
impl BoardTransport for TcpTransport {
    async fn publish(&self, line: String) -> Result<(), TransportError> {
        let mut writer = self.writer.lock().await;
        writer
            .write_all(line.as_bytes())
            .await
            .map_err(|e| TransportError::PublishFailed(e.to_string()))?;
        writer
            .write_all(b"\n")
            .await
            .map_err(|e| TransportError::PublishFailed(e.to_string()))?;
        Ok(())
    }

    fn subscribe(
        &self,
        topic: &str,
    ) -> Result<mpsc::UnboundedReceiver<String>, TransportError> {
        let read_half = self
            .reader
            .lock()
            .expect("lock poisoned")
            .take()
            .ok_or(TransportError::AlreadySubscribed)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let prefix = format!("{topic}:");
        let addr = self.peer_addr.clone();

        tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if !line.starts_with(&prefix) {
                            debug!(%line, "ignoring line for another topic");
                            continue;
                        }
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        info!(addr, "broker closed the connection");
                        break;
                    }
                    Err(e) => {
                        warn!(addr, error = %e, "broker read failed");
                        break;
                    }
                }
            }
            // Dropping tx closes the channel; the session sees it and exits.
        });

        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    async fn test_publish_writes_one_line_per_event() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let accept = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut lines = BufReader::new(stream).lines();
            let first = lines.next_line().await.unwrap().unwrap();
            let second = lines.next_line().await.unwrap().unwrap();
            (first, second)
        });

        let transport = TcpTransport::connect(&addr).await.unwrap();
        transport.publish("T:alice:2".to_string()).await.unwrap();
        transport
            .publish("T:alice:1:10:20".to_string())
            .await
            .unwrap();

        let (first, second) = accept.await.unwrap();
        assert_eq!(first, "T:alice:2");
        assert_eq!(second, "T:alice:1:10:20");
    }

    #[tokio::test]
    async fn test_subscribe_filters_and_closes_on_disconnect() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let serve = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            stream.write_all(b"OTHER:bob:2\n").await.unwrap();
            stream.write_all(b"T:bob:3\n").await.unwrap();
            // Dropping the stream closes the connection.
        });

        let transport = TcpTransport::connect(&addr).await.unwrap();
        let mut rx = transport.subscribe("T").unwrap();

        assert_eq!(rx.recv().await.unwrap(), "T:bob:3");
        assert!(rx.recv().await.is_none(), "channel closes on disconnect");
        serve.await.unwrap();
    }

    #[tokio::test]
    async fn test_second_subscribe_is_rejected_not_a_panic() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let transport = TcpTransport::connect(&addr).await.unwrap();
        let _rx = transport.subscribe("T").unwrap();

        assert!(matches!(
            transport.subscribe("T"),
            Err(TransportError::AlreadySubscribed)
        ));
    }
}
