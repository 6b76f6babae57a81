//! All Inkboard wire event types.
//!
//! Every message on the wire is one event scoped to a `(topic, sender)` pair.
//! The topic is the pub/sub namespace shared by one drawing session; the
//! sender is the peer identity whose replica the event mutates.
//!
//! Color and size fields are deliberately *not* range-validated here. The
//! codec passes through whatever integers were on the wire; the consumer
//! clamps them when storing into a brush (see [`crate::Rgb::from_wire`]).

use serde::{Deserialize, Serialize};

use crate::domain::board::PeerId;

// ── Event tag codes ───────────────────────────────────────────────────────────

/// All event tag codes as they appear in the third wire field.
///
/// The numbering is load-bearing: peers of different builds must agree on it,
/// so the codes are stable and new events are only ever appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventTag {
    PenMotion = 1,
    PenDown = 2,
    PenUp = 3,
    SetViewport = 4,
    SetColor = 5,
    SetSize = 6,
    Undo = 7,
    Close = 8,
}

impl TryFrom<u8> for EventTag {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(EventTag::PenMotion),
            2 => Ok(EventTag::PenDown),
            3 => Ok(EventTag::PenUp),
            4 => Ok(EventTag::SetViewport),
            5 => Ok(EventTag::SetColor),
            6 => Ok(EventTag::SetSize),
            7 => Ok(EventTag::Undo),
            8 => Ok(EventTag::Close),
            _ => Err(()),
        }
    }
}

// ── Event payloads ────────────────────────────────────────────────────────────

/// One drawing event, the unit of replication between peers.
///
/// All coordinates are in the shared global coordinate space. Viewport pan
/// offsets are a per-viewer render concern and never shift these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// The sender pressed its pen; a new stroke opens.
    PenDown,
    /// The sender's pen moved to `(x, y)` in global coordinates. Extends the
    /// open stroke while the pen is down, otherwise only moves the cursor.
    PenMotion { x: i32, y: i32 },
    /// The sender lifted its pen; the open stroke closes.
    PenUp,
    /// The sender changed its brush color. Components are raw wire integers;
    /// receivers clamp to 0–255.
    SetColor { r: i32, g: i32, b: i32 },
    /// The sender changed its brush size. Raw wire integer; receivers clamp
    /// to a positive value.
    SetSize { size: i32 },
    /// The sender's pan offset changed. Recorded on the sender's replica but
    /// never applied to stroke geometry; panning is strictly per-viewer.
    /// Only broadcast when the optional viewport-sharing flag is on.
    SetViewport { x: i32, y: i32 },
    /// Remove the sender's most recent stroke that actually drew something.
    Undo,
    /// The sender is shutting down. Best-effort; receivers keep the sender's
    /// replica so its drawing stays on the board.
    Close,
}

impl BoardEvent {
    /// Returns the wire tag code for this event.
    pub fn tag(&self) -> EventTag {
        match self {
            BoardEvent::PenMotion { .. } => EventTag::PenMotion,
            BoardEvent::PenDown => EventTag::PenDown,
            BoardEvent::PenUp => EventTag::PenUp,
            BoardEvent::SetViewport { .. } => EventTag::SetViewport,
            BoardEvent::SetColor { .. } => EventTag::SetColor,
            BoardEvent::SetSize { .. } => EventTag::SetSize,
            BoardEvent::Undo => EventTag::Undo,
            BoardEvent::Close => EventTag::Close,
        }
    }
}

// ── Scoped message ────────────────────────────────────────────────────────────

/// A [`BoardEvent`] together with the topic and sender identity that scope it.
///
/// This is what the codec encodes to and decodes from one wire line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireMessage {
    /// Pub/sub namespace of the drawing session. Must not contain `:`.
    pub topic: String,
    /// Identity of the peer that produced the event.
    pub sender: PeerId,
    /// The event itself.
    pub event: BoardEvent,
}

impl WireMessage {
    /// Convenience constructor used on the publish path.
    pub fn new(topic: impl Into<String>, sender: PeerId, event: BoardEvent) -> Self {
        Self {
            topic: topic.into(),
            sender,
            event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_code_round_trips_through_u8() {
        for tag in [
            EventTag::PenMotion,
            EventTag::PenDown,
            EventTag::PenUp,
            EventTag::SetViewport,
            EventTag::SetColor,
            EventTag::SetSize,
            EventTag::Undo,
            EventTag::Close,
        ] {
            assert_eq!(EventTag::try_from(tag as u8), Ok(tag));
        }
    }

    #[test]
    fn test_unknown_tag_code_is_rejected() {
        assert!(EventTag::try_from(0).is_err());
        assert!(EventTag::try_from(9).is_err());
        assert!(EventTag::try_from(255).is_err());
    }

    #[test]
    fn test_event_reports_matching_tag() {
        assert_eq!(BoardEvent::PenDown.tag(), EventTag::PenDown);
        assert_eq!(
            BoardEvent::PenMotion { x: 1, y: 2 }.tag(),
            EventTag::PenMotion
        );
        assert_eq!(BoardEvent::Undo.tag(), EventTag::Undo);
    }
}
