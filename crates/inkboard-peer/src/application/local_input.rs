//! LocalInputUseCase: turns raw device samples into board mutations and
//! published wire events.
//!
//! This is the only place local device input touches the replica store, and
//! the only publisher of this peer's events. Screen coordinates from the
//! device are converted to global coordinates here (through the local
//! viewer's pan offset) before anything is stored or broadcast — wire events
//! always carry global coordinates.

use std::sync::Arc;

use inkboard_core::{
    encode_message, palette, BoardEvent, BoardStore, PanKeys, Point, ProtocolError, StrokePhase,
    WireMessage,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::infrastructure::pointer::{KeyCommand, RawInputEvent};
use crate::infrastructure::surface::DrawSurface;
use crate::infrastructure::transport::{BoardTransport, TransportError};

/// Error type for the local-input use case.
#[derive(Debug, Error)]
pub enum LocalInputError {
    #[error("failed to encode event: {0}")]
    Encode(#[from] ProtocolError),
    #[error("failed to publish event: {0}")]
    Publish(#[from] TransportError),
}

/// What the session loop should do after one local sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalAction {
    /// Nothing beyond what the use case already did.
    Continue,
    /// The stroke history changed shape; repaint the whole buffer.
    Repaint,
    /// The user asked to quit.
    Shutdown,
}

/// Handles one raw input sample at a time.
pub struct LocalInputUseCase {
    topic: String,
    transport: Arc<dyn BoardTransport>,
}

impl LocalInputUseCase {
    pub fn new(topic: String, transport: Arc<dyn BoardTransport>) -> Self {
        Self { topic, transport }
    }

    /// Applies one sample to the local replica, paints any new segment, and
    /// publishes the corresponding wire event.
    pub async fn handle(
        &self,
        event: RawInputEvent,
        store: &mut BoardStore,
        surface: &mut dyn DrawSurface,
        pan_keys: &mut PanKeys,
    ) -> Result<LocalAction, LocalInputError> {
        match event {
            RawInputEvent::PenDown { x, y } => {
                let global = store.local().view_offset.unproject(Point::new(x, y));
                let replica = store.local_mut();
                replica.cursor = global;
                replica.begin_stroke();
                self.publish(store, BoardEvent::PenDown).await?;
                Ok(LocalAction::Continue)
            }
            RawInputEvent::PenMove { x, y } => {
                let offset = store.local().view_offset;
                let global = offset.unproject(Point::new(x, y));
                let replica = store.local_mut();
                replica.cursor = global;
                replica.extend_stroke(global);

                // Paint just the new segment; the rest of the buffer is
                // already correct. Only an open stroke can have grown.
                if store.local().pen_down() {
                    if let Some(stroke) = store.local().strokes().last() {
                        if stroke.phase == StrokePhase::Open {
                            if let Some((from, to)) = stroke.last_segment() {
                                surface.draw_line(
                                    offset.project(from),
                                    offset.project(to),
                                    stroke.brush.size,
                                    stroke.brush.color,
                                );
                            }
                        }
                    }
                }

                // Motion is published with the pen up too; that is how other
                // peers track this cursor.
                self.publish(
                    store,
                    BoardEvent::PenMotion {
                        x: global.x,
                        y: global.y,
                    },
                )
                .await?;
                Ok(LocalAction::Continue)
            }
            RawInputEvent::PenUp { x, y } => {
                let global = store.local().view_offset.unproject(Point::new(x, y));
                let replica = store.local_mut();
                replica.cursor = global;
                replica.end_stroke();
                self.publish(store, BoardEvent::PenUp).await?;
                Ok(LocalAction::Continue)
            }
            RawInputEvent::KeyDown(command) => {
                self.handle_key_down(command, store, pan_keys).await
            }
            RawInputEvent::KeyUp(command) => {
                if let KeyCommand::Pan(direction) = command {
                    pan_keys.set(direction, false);
                }
                Ok(LocalAction::Continue)
            }
        }
    }

    async fn handle_key_down(
        &self,
        command: KeyCommand,
        store: &mut BoardStore,
        pan_keys: &mut PanKeys,
    ) -> Result<LocalAction, LocalInputError> {
        match command {
            KeyCommand::Pan(direction) => {
                // Held keys drive panning from the render tick; nothing to
                // publish and nothing to mutate here.
                pan_keys.set(direction, true);
                Ok(LocalAction::Continue)
            }
            KeyCommand::ColorSlot(slot) => {
                let Some(color) = palette::color_for_slot(slot) else {
                    debug!(slot, "ignoring unbound color slot");
                    return Ok(LocalAction::Continue);
                };
                store.local_mut().brush.color = color;
                self.publish(
                    store,
                    BoardEvent::SetColor {
                        r: i32::from(color.r),
                        g: i32::from(color.g),
                        b: i32::from(color.b),
                    },
                )
                .await?;
                Ok(LocalAction::Continue)
            }
            KeyCommand::BrushSize(size) => {
                let size = size.clamp(1, palette::MAX_BRUSH_SIZE);
                store.local_mut().brush.size = size;
                self.publish(store, BoardEvent::SetSize { size: size as i32 })
                    .await?;
                Ok(LocalAction::Continue)
            }
            KeyCommand::Undo => {
                store.local_mut().undo();
                self.publish(store, BoardEvent::Undo).await?;
                Ok(LocalAction::Repaint)
            }
            KeyCommand::Quit => {
                info!("quit requested from keyboard");
                Ok(LocalAction::Shutdown)
            }
        }
    }

    async fn publish(
        &self,
        store: &BoardStore,
        event: BoardEvent,
    ) -> Result<(), LocalInputError> {
        let message = WireMessage::new(&self.topic, store.local_id().clone(), event);
        let line = encode_message(&message)?;
        self.transport.publish(line).await?;
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use inkboard_core::PeerId;
    use tokio::sync::mpsc;

    use super::*;
    use crate::infrastructure::surface::mock::{RecordingSurface, SurfaceCall};

    /// Records published lines instead of sending them anywhere.
    struct RecordingTransport {
        published: Mutex<Vec<String>>,
    }

    impl RecordingTransport {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                published: Mutex::new(Vec::new()),
            })
        }

        fn lines(&self) -> Vec<String> {
            self.published.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl BoardTransport for RecordingTransport {
        async fn publish(&self, line: String) -> Result<(), TransportError> {
            self.published.lock().unwrap().push(line);
            Ok(())
        }

        fn subscribe(
            &self,
            _topic: &str,
        ) -> Result<mpsc::UnboundedReceiver<String>, TransportError> {
            let (_tx, rx) = mpsc::unbounded_channel();
            Ok(rx)
        }
    }

    fn fixture() -> (
        LocalInputUseCase,
        Arc<RecordingTransport>,
        BoardStore,
        RecordingSurface,
        PanKeys,
    ) {
        let transport = RecordingTransport::new();
        let use_case = LocalInputUseCase::new("T".to_string(), transport.clone());
        let store = BoardStore::new(PeerId::from("alice"));
        (
            use_case,
            transport,
            store,
            RecordingSurface::new(),
            PanKeys::default(),
        )
    }

    #[tokio::test]
    async fn test_gesture_publishes_down_motion_up_wire_lines() {
        // Arrange
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();

        // Act
        for event in [
            RawInputEvent::PenDown { x: 10, y: 20 },
            RawInputEvent::PenMove { x: 11, y: 21 },
            RawInputEvent::PenUp { x: 11, y: 21 },
        ] {
            use_case
                .handle(event, &mut store, &mut surface, &mut keys)
                .await
                .unwrap();
        }

        // Assert
        assert_eq!(
            transport.lines(),
            vec!["T:alice:2", "T:alice:1:11:21", "T:alice:3"]
        );
    }

    #[tokio::test]
    async fn test_motion_paints_only_the_new_segment() {
        let (use_case, _transport, mut store, mut surface, mut keys) = fixture();
        let log = surface.log();

        use_case
            .handle(
                RawInputEvent::PenDown { x: 0, y: 0 },
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();
        use_case
            .handle(
                RawInputEvent::PenMove { x: 5, y: 5 },
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();
        // First motion point alone has no segment yet.
        assert_eq!(log.line_count(), 0);

        use_case
            .handle(
                RawInputEvent::PenMove { x: 10, y: 5 },
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        assert_eq!(log.line_count(), 1);
        assert_eq!(
            log.calls().last().unwrap(),
            &SurfaceCall::Line {
                from: Point::new(5, 5),
                to: Point::new(10, 5),
                width: 1,
                color: palette::RED,
            }
        );
    }

    #[tokio::test]
    async fn test_panned_viewer_stores_global_coords_but_paints_screen_coords() {
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();
        let log = surface.log();
        store.local_mut().view_offset.translate(100, 40);

        use_case
            .handle(
                RawInputEvent::PenDown { x: 0, y: 0 },
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();
        use_case
            .handle(
                RawInputEvent::PenMove { x: 0, y: 0 },
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();
        use_case
            .handle(
                RawInputEvent::PenMove { x: 3, y: 0 },
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        // Stored and broadcast coordinates are global.
        assert_eq!(
            store.local().strokes()[0].points,
            vec![Point::new(100, 40), Point::new(103, 40)]
        );
        assert!(transport.lines().contains(&"T:alice:1:103:40".to_string()));

        // The painted segment is back in screen coordinates.
        assert_eq!(
            log.calls().last().unwrap(),
            &SurfaceCall::Line {
                from: Point::new(0, 0),
                to: Point::new(3, 0),
                width: 1,
                color: palette::RED,
            }
        );
    }

    #[tokio::test]
    async fn test_motion_with_pen_up_moves_cursor_and_publishes() {
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();

        use_case
            .handle(
                RawInputEvent::PenMove { x: 7, y: 9 },
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        assert_eq!(store.local().cursor, Point::new(7, 9));
        assert!(store.local().strokes().is_empty());
        assert_eq!(transport.lines(), vec!["T:alice:1:7:9"]);
    }

    #[tokio::test]
    async fn test_color_key_updates_brush_and_publishes_rgb() {
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();

        use_case
            .handle(
                RawInputEvent::KeyDown(KeyCommand::ColorSlot(4)),
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        assert_eq!(store.local().brush.color, palette::CYAN);
        assert_eq!(transport.lines(), vec!["T:alice:5:0:255:255"]);
    }

    #[tokio::test]
    async fn test_unbound_color_slot_is_ignored() {
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();

        use_case
            .handle(
                RawInputEvent::KeyDown(KeyCommand::ColorSlot(9)),
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        assert_eq!(store.local().brush.color, palette::RED);
        assert!(transport.lines().is_empty());
    }

    #[tokio::test]
    async fn test_size_key_updates_brush_and_publishes() {
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();

        use_case
            .handle(
                RawInputEvent::KeyDown(KeyCommand::BrushSize(4)),
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        assert_eq!(store.local().brush.size, 4);
        assert_eq!(transport.lines(), vec!["T:alice:6:4"]);
    }

    #[tokio::test]
    async fn test_undo_key_truncates_history_publishes_and_requests_repaint() {
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();
        let local = store.local_mut();
        local.begin_stroke();
        local.extend_stroke(Point::new(1, 1));
        local.end_stroke();

        let action = use_case
            .handle(
                RawInputEvent::KeyDown(KeyCommand::Undo),
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        assert_eq!(action, LocalAction::Repaint);
        assert!(store.local().strokes().is_empty());
        assert_eq!(transport.lines(), vec!["T:alice:7"]);
    }

    #[tokio::test]
    async fn test_pan_keys_track_held_state_without_publishing() {
        let (use_case, transport, mut store, mut surface, mut keys) = fixture();

        use_case
            .handle(
                RawInputEvent::KeyDown(KeyCommand::Pan(inkboard_core::PanDirection::Left)),
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();
        assert!(keys.any_held());
        assert!(transport.lines().is_empty());

        use_case
            .handle(
                RawInputEvent::KeyUp(KeyCommand::Pan(inkboard_core::PanDirection::Left)),
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();
        assert!(!keys.any_held());
    }

    #[tokio::test]
    async fn test_quit_key_requests_shutdown() {
        let (use_case, _transport, mut store, mut surface, mut keys) = fixture();

        let action = use_case
            .handle(
                RawInputEvent::KeyDown(KeyCommand::Quit),
                &mut store,
                &mut surface,
                &mut keys,
            )
            .await
            .unwrap();

        assert_eq!(action, LocalAction::Shutdown);
    }
}
