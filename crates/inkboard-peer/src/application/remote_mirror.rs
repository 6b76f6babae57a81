//! RemoteMirrorUseCase: replays received wire lines onto the replica store.
//!
//! One received line at a time: decode, drop echoes of our own events, apply
//! to the sender's replica, and paint whatever became visible. Malformed
//! lines are logged and dropped — one bad peer must not take the board down.

use inkboard_core::{decode_message, BoardEvent, BoardStore, StrokePhase};
use tracing::{trace, warn};

use crate::infrastructure::surface::DrawSurface;

/// What the session loop should do after one received line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteAction {
    /// The event was applied; any visible change is already painted.
    Applied,
    /// The event was applied and invalidated the buffer; repaint everything.
    Repaint,
    /// The line was an echo, malformed, or for another topic.
    Ignored,
}

/// Mirrors remote peers' events into the local store.
pub struct RemoteMirrorUseCase {
    topic: String,
}

impl RemoteMirrorUseCase {
    pub fn new(topic: String) -> Self {
        Self { topic }
    }

    /// Processes one wire line.
    pub fn handle(
        &self,
        line: &str,
        store: &mut BoardStore,
        surface: &mut dyn DrawSurface,
    ) -> RemoteAction {
        let message = match decode_message(line) {
            Ok(message) => message,
            Err(error) => {
                warn!(%line, %error, "dropping malformed wire line");
                return RemoteAction::Ignored;
            }
        };

        // The transport filters by topic prefix already; this catches a
        // topic that happens to share a prefix with ours.
        if message.topic != self.topic {
            return RemoteAction::Ignored;
        }

        // Echo suppression: our own events were applied when the device
        // produced them. Replaying the echo would double every point.
        if &message.sender == store.local_id() {
            trace!("suppressing echo of our own event");
            return RemoteAction::Ignored;
        }

        let event = message.event;
        store.apply_remote(&message.sender, &event);

        match event {
            BoardEvent::PenMotion { .. } => {
                // Paint the segment the motion added, if any, through the
                // *local* viewer's pan offset.
                let offset = store.local().view_offset;
                let replica = store
                    .replica(&message.sender)
                    .expect("apply_remote created the replica");
                if replica.pen_down() {
                    if let Some(stroke) = replica.strokes().last() {
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
                RemoteAction::Applied
            }
            // Undo removed marks the buffer still shows.
            BoardEvent::Undo => RemoteAction::Repaint,
            _ => RemoteAction::Applied,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use inkboard_core::{palette, PeerId, Point};

    use super::*;
    use crate::infrastructure::surface::mock::{RecordingSurface, SurfaceCall};

    fn fixture() -> (RemoteMirrorUseCase, BoardStore, RecordingSurface) {
        (
            RemoteMirrorUseCase::new("T".to_string()),
            BoardStore::new(PeerId::from("alice")),
            RecordingSurface::new(),
        )
    }

    #[test]
    fn test_remote_gesture_builds_stroke_on_senders_replica() {
        // Arrange
        let (use_case, mut store, mut surface) = fixture();

        // Act
        for line in ["T:bob:2", "T:bob:1:0:0", "T:bob:1:5:5", "T:bob:3"] {
            use_case.handle(line, &mut store, &mut surface);
        }

        // Assert
        let bob = store.replica(&PeerId::from("bob")).unwrap();
        assert_eq!(bob.strokes().len(), 1);
        assert_eq!(
            bob.strokes()[0].points,
            vec![Point::new(0, 0), Point::new(5, 5)]
        );
        assert!(store.local().strokes().is_empty());
    }

    #[test]
    fn test_own_events_are_suppressed() {
        let (use_case, mut store, mut surface) = fixture();

        let action = use_case.handle("T:alice:2", &mut store, &mut surface);

        assert_eq!(action, RemoteAction::Ignored);
        assert!(
            !store.local().pen_down(),
            "an echoed pen-down must not touch the local replica"
        );
    }

    #[test]
    fn test_malformed_line_is_dropped_without_panic() {
        let (use_case, mut store, mut surface) = fixture();

        assert_eq!(
            use_case.handle("garbage", &mut store, &mut surface),
            RemoteAction::Ignored
        );
        assert_eq!(
            use_case.handle("T:bob:1:not-a-number:2", &mut store, &mut surface),
            RemoteAction::Ignored
        );
        assert_eq!(store.peer_count(), 1, "bad lines must not create replicas");
    }

    #[test]
    fn test_other_topic_is_ignored() {
        let (use_case, mut store, mut surface) = fixture();

        let action = use_case.handle("OTHER:bob:2", &mut store, &mut surface);

        assert_eq!(action, RemoteAction::Ignored);
        assert_eq!(store.peer_count(), 1);
    }

    #[test]
    fn test_remote_motion_paints_segment_with_senders_brush() {
        let (use_case, mut store, mut surface) = fixture();
        let log = surface.log();

        use_case.handle("T:bob:5:0:255:255", &mut store, &mut surface);
        use_case.handle("T:bob:6:3", &mut store, &mut surface);
        use_case.handle("T:bob:2", &mut store, &mut surface);
        use_case.handle("T:bob:1:0:0", &mut store, &mut surface);
        use_case.handle("T:bob:1:4:4", &mut store, &mut surface);

        assert_eq!(
            log.calls(),
            vec![SurfaceCall::Line {
                from: Point::new(0, 0),
                to: Point::new(4, 4),
                width: 3,
                color: palette::CYAN,
            }]
        );
    }

    #[test]
    fn test_remote_motion_projects_through_local_pan_offset() {
        let (use_case, mut store, mut surface) = fixture();
        let log = surface.log();
        store.local_mut().view_offset.translate(50, -10);

        use_case.handle("T:bob:2", &mut store, &mut surface);
        use_case.handle("T:bob:1:100:100", &mut store, &mut surface);
        use_case.handle("T:bob:1:110:100", &mut store, &mut surface);

        assert_eq!(
            log.calls(),
            vec![SurfaceCall::Line {
                from: Point::new(50, 110),
                to: Point::new(60, 110),
                width: 1,
                color: palette::RED,
            }]
        );
    }

    #[test]
    fn test_remote_undo_requests_full_repaint() {
        let (use_case, mut store, mut surface) = fixture();
        for line in ["T:bob:2", "T:bob:1:0:0", "T:bob:1:5:5", "T:bob:3"] {
            use_case.handle(line, &mut store, &mut surface);
        }

        let action = use_case.handle("T:bob:7", &mut store, &mut surface);

        assert_eq!(action, RemoteAction::Repaint);
        assert!(store.replica(&PeerId::from("bob")).unwrap().strokes().is_empty());
    }

    #[test]
    fn test_remote_viewport_is_recorded_but_changes_nothing_visible() {
        let (use_case, mut store, mut surface) = fixture();
        let log = surface.log();

        let action = use_case.handle("T:bob:4:300:200", &mut store, &mut surface);

        assert_eq!(action, RemoteAction::Applied);
        assert!(log.calls().is_empty());
        assert_eq!(
            store.replica(&PeerId::from("bob")).unwrap().view_offset,
            inkboard_core::ViewOffset::new(300, 200)
        );
    }

    #[test]
    fn test_motion_after_remote_undo_does_not_revive_the_stroke() {
        let (use_case, mut store, mut surface) = fixture();
        let log = surface.log();

        use_case.handle("T:bob:2", &mut store, &mut surface);
        use_case.handle("T:bob:1:0:0", &mut store, &mut surface);
        use_case.handle("T:bob:1:1:1", &mut store, &mut surface);
        // Bob undoes mid-draw; the open stroke disappears.
        use_case.handle("T:bob:7", &mut store, &mut surface);
        log.clear();

        use_case.handle("T:bob:1:2:2", &mut store, &mut surface);

        let bob = store.replica(&PeerId::from("bob")).unwrap();
        assert!(bob.strokes().is_empty());
        assert!(log.calls().is_empty(), "dropped motion must not paint");
    }
}
