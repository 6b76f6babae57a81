//! The session task: single owner of the replica store and the surface.
//!
//! All three flows meet here in one `select!` loop:
//!
//! - local device samples from the [`PointerSource`] channel,
//! - remote wire lines from the transport subscription,
//! - the render tick.
//!
//! Because the loop owns the store and surface outright, the flows are
//! serialized by construction and no drawing state is ever behind a lock.
//!
//! [`PointerSource`]: crate::infrastructure::pointer::PointerSource

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use inkboard_core::{
    encode_message, BoardEvent, BoardStore, PanKeys, PeerId, ProtocolError, WireMessage,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::application::local_input::{LocalAction, LocalInputError, LocalInputUseCase};
use crate::application::remote_mirror::{RemoteAction, RemoteMirrorUseCase};
use crate::application::render_frame::RenderFrameUseCase;
use crate::infrastructure::pointer::RawInputEvent;
use crate::infrastructure::surface::DrawSurface;
use crate::infrastructure::transport::{BoardTransport, TransportError};

/// Error type for the session loop.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Input(#[from] LocalInputError),
    #[error("failed to encode event: {0}")]
    Encode(#[from] ProtocolError),
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("lost connection to the broker")]
    TransportClosed,
}

/// Tunables the session needs from configuration.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub identity: PeerId,
    pub topic: String,
    pub frame_rate: u32,
    pub share_viewport: bool,
}

/// One peer's run of the board.
pub struct Session {
    store: BoardStore,
    surface: Box<dyn DrawSurface>,
    transport: Arc<dyn BoardTransport>,
    pan_keys: PanKeys,
    local_input: LocalInputUseCase,
    remote_mirror: RemoteMirrorUseCase,
    render: RenderFrameUseCase,
    topic: String,
    frame_rate: u32,
    share_viewport: bool,
    running: Arc<AtomicBool>,
    close_sent: bool,
}

impl Session {
    pub fn new(
        options: SessionOptions,
        surface: Box<dyn DrawSurface>,
        transport: Arc<dyn BoardTransport>,
        running: Arc<AtomicBool>,
    ) -> Self {
        Self {
            store: BoardStore::new(options.identity),
            local_input: LocalInputUseCase::new(options.topic.clone(), Arc::clone(&transport)),
            remote_mirror: RemoteMirrorUseCase::new(options.topic.clone()),
            render: RenderFrameUseCase::new(),
            surface,
            transport,
            pan_keys: PanKeys::default(),
            topic: options.topic,
            frame_rate: options.frame_rate.max(1),
            share_viewport: options.share_viewport,
            running,
            close_sent: false,
        }
    }

    /// Read access to the replica store, mainly for integration tests that
    /// inspect convergence after the loop exits.
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Runs the session until quit, shutdown flag, or transport loss.
    ///
    /// A closed input channel ends the session normally (the device backend
    /// is gone); a closed transport subscription is an error, because the
    /// board cannot function without the broker.
    pub async fn run(
        &mut self,
        mut input_rx: mpsc::UnboundedReceiver<RawInputEvent>,
    ) -> Result<(), SessionError> {
        let mut remote_rx = self.transport.subscribe(&self.topic)?;

        let period = Duration::from_millis(u64::from((1000 / self.frame_rate).max(1)));
        let mut tick = tokio::time::interval(period);
        // A stalled frame is stale the moment it is late; skip it rather
        // than bursting to catch up.
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(topic = %self.topic, peer = %self.store.local_id(), "session started");

        // First frame: empty board.
        self.render.repaint(&self.store, self.surface.as_mut());
        self.render.present(&self.store, self.surface.as_mut());

        let mut needs_repaint = false;

        let result = loop {
            tokio::select! {
                sample = input_rx.recv() => {
                    match sample {
                        Some(event) => {
                            let action = self
                                .local_input
                                .handle(
                                    event,
                                    &mut self.store,
                                    self.surface.as_mut(),
                                    &mut self.pan_keys,
                                )
                                .await?;
                            match action {
                                LocalAction::Continue => {}
                                LocalAction::Repaint => needs_repaint = true,
                                LocalAction::Shutdown => break Ok(()),
                            }
                        }
                        None => {
                            info!("input source closed, ending session");
                            break Ok(());
                        }
                    }
                }
                line = remote_rx.recv() => {
                    match line {
                        Some(line) => {
                            let action = self.remote_mirror.handle(
                                &line,
                                &mut self.store,
                                self.surface.as_mut(),
                            );
                            if action == RemoteAction::Repaint {
                                needs_repaint = true;
                            }
                        }
                        None => {
                            warn!("transport subscription closed");
                            break Err(SessionError::TransportClosed);
                        }
                    }
                }
                _ = tick.tick() => {
                    if !self.running.load(Ordering::Relaxed) {
                        info!("shutdown flag set, ending session");
                        break Ok(());
                    }
                    if self.render.apply_pan(&self.pan_keys, &mut self.store) {
                        needs_repaint = true;
                        if self.share_viewport {
                            self.publish_viewport().await?;
                        }
                    }
                    if needs_repaint {
                        self.render.repaint(&self.store, self.surface.as_mut());
                        needs_repaint = false;
                    }
                    self.render.present(&self.store, self.surface.as_mut());
                }
            }
        };

        self.send_close().await;
        result
    }

    async fn publish_viewport(&mut self) -> Result<(), SessionError> {
        let offset = self.store.local().view_offset;
        let message = WireMessage::new(
            &self.topic,
            self.store.local_id().clone(),
            BoardEvent::SetViewport {
                x: offset.x,
                y: offset.y,
            },
        );
        self.transport.publish(encode_message(&message)?).await?;
        Ok(())
    }

    /// Announces departure. Best effort: a dead transport at shutdown is not
    /// worth an error, the board tolerates silent departures anyway.
    async fn send_close(&mut self) {
        if self.close_sent {
            return;
        }
        self.close_sent = true;

        let message = WireMessage::new(
            &self.topic,
            self.store.local_id().clone(),
            BoardEvent::Close,
        );
        match encode_message(&message) {
            Ok(line) => {
                if let Err(error) = self.transport.publish(line).await {
                    debug!(%error, "could not announce departure");
                }
            }
            Err(error) => debug!(%error, "could not encode departure event"),
        }
    }
}
