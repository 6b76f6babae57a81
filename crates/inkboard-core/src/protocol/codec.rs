//! Textual codec for encoding and decoding Inkboard wire messages.
//!
//! Wire format:
//! ```text
//! <topic>:<senderId>:<tag>[:<field>]*
//! ```
//! Fields are decimal integers. Per-event field sets:
//!
//! | tag | event       | fields  |
//! |-----|-------------|---------|
//! | 1   | PenMotion   | x, y    |
//! | 2   | PenDown     | –       |
//! | 3   | PenUp       | –       |
//! | 4   | SetViewport | x, y    |
//! | 5   | SetColor    | r, g, b |
//! | 6   | SetSize     | size    |
//! | 7   | Undo        | –       |
//! | 8   | Close       | –       |
//!
//! A malformed line (too few fields, non-integer field, unknown tag) is a
//! protocol error. The receive loop drops the message and keeps running; a
//! bad line from one peer must never take the whole process down.
//!
//! No value-range validation happens here: a color component of 999 or a
//! negative size decodes fine and is clamped downstream when stored.

use thiserror::Error;

use crate::domain::board::PeerId;
use crate::protocol::messages::{BoardEvent, EventTag, WireMessage};

/// Errors that can occur while decoding (or encoding) a wire line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The line has fewer colon-separated fields than the minimum
    /// `topic:sender:tag`.
    #[error("too few fields: need at least {needed}, got {got}")]
    TooFewFields { needed: usize, got: usize },

    /// The tag field is not an integer or not a known tag code.
    #[error("unknown event tag: {0:?}")]
    UnknownTag(String),

    /// The sender identity field is empty.
    #[error("empty sender identity")]
    EmptySender,

    /// An event value field is not a decimal integer.
    #[error("invalid integer in field {name:?}: {value:?}")]
    InvalidField { name: &'static str, value: String },

    /// The number of value fields does not match the event kind.
    #[error("{tag:?}: expected {expected} value field(s), got {got}")]
    FieldCountMismatch {
        tag: EventTag,
        expected: usize,
        got: usize,
    },

    /// The topic contains the `:` delimiter and cannot be framed.
    #[error("topic must not contain ':': {0:?}")]
    InvalidTopic(String),

    /// The sender identity contains the `:` delimiter and cannot be framed.
    #[error("sender identity must not contain ':': {0:?}")]
    InvalidSender(String),
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Encodes a [`WireMessage`] into one wire line (no trailing newline).
///
/// # Errors
///
/// Returns [`ProtocolError::InvalidTopic`] or [`ProtocolError::InvalidSender`]
/// if the topic or sender contains the field delimiter — such a line would
/// split wrong on every receiver. Every other message encodes
/// unconditionally.
pub fn encode_message(msg: &WireMessage) -> Result<String, ProtocolError> {
    if msg.topic.contains(':') {
        return Err(ProtocolError::InvalidTopic(msg.topic.clone()));
    }
    if msg.sender.as_str().contains(':') {
        return Err(ProtocolError::InvalidSender(msg.sender.as_str().to_string()));
    }

    let head = format!("{}:{}:{}", msg.topic, msg.sender, msg.event.tag() as u8);
    let line = match &msg.event {
        BoardEvent::PenMotion { x, y } => format!("{head}:{x}:{y}"),
        BoardEvent::SetViewport { x, y } => format!("{head}:{x}:{y}"),
        BoardEvent::SetColor { r, g, b } => format!("{head}:{r}:{g}:{b}"),
        BoardEvent::SetSize { size } => format!("{head}:{size}"),
        BoardEvent::PenDown | BoardEvent::PenUp | BoardEvent::Undo | BoardEvent::Close => head,
    };
    Ok(line)
}

/// Decodes one wire line into a [`WireMessage`].
///
/// The transport has already filtered by topic prefix, but the decoded topic
/// is returned so the caller can double-check the scoping.
///
/// # Errors
///
/// Returns [`ProtocolError`] describing the first malformed field found.
pub fn decode_message(line: &str) -> Result<WireMessage, ProtocolError> {
    let fields: Vec<&str> = line.split(':').collect();
    if fields.len() < 3 {
        return Err(ProtocolError::TooFewFields {
            needed: 3,
            got: fields.len(),
        });
    }

    let topic = fields[0].to_string();
    let sender = fields[1];
    if sender.is_empty() {
        return Err(ProtocolError::EmptySender);
    }

    let tag_code: u8 = fields[2]
        .parse()
        .map_err(|_| ProtocolError::UnknownTag(fields[2].to_string()))?;
    let tag =
        EventTag::try_from(tag_code).map_err(|_| ProtocolError::UnknownTag(fields[2].to_string()))?;

    let values = &fields[3..];
    let event = match tag {
        EventTag::PenMotion => {
            require_values(tag, values, 2)?;
            BoardEvent::PenMotion {
                x: parse_field("x", values[0])?,
                y: parse_field("y", values[1])?,
            }
        }
        EventTag::PenDown => {
            require_values(tag, values, 0)?;
            BoardEvent::PenDown
        }
        EventTag::PenUp => {
            require_values(tag, values, 0)?;
            BoardEvent::PenUp
        }
        EventTag::SetViewport => {
            require_values(tag, values, 2)?;
            BoardEvent::SetViewport {
                x: parse_field("x", values[0])?,
                y: parse_field("y", values[1])?,
            }
        }
        EventTag::SetColor => {
            require_values(tag, values, 3)?;
            BoardEvent::SetColor {
                r: parse_field("r", values[0])?,
                g: parse_field("g", values[1])?,
                b: parse_field("b", values[2])?,
            }
        }
        EventTag::SetSize => {
            require_values(tag, values, 1)?;
            BoardEvent::SetSize {
                size: parse_field("size", values[0])?,
            }
        }
        EventTag::Undo => {
            require_values(tag, values, 0)?;
            BoardEvent::Undo
        }
        EventTag::Close => {
            require_values(tag, values, 0)?;
            BoardEvent::Close
        }
    };

    Ok(WireMessage {
        topic,
        sender: PeerId::from(sender),
        event,
    })
}

// ── Utility helpers ───────────────────────────────────────────────────────────

fn require_values(tag: EventTag, values: &[&str], expected: usize) -> Result<(), ProtocolError> {
    if values.len() != expected {
        Err(ProtocolError::FieldCountMismatch {
            tag,
            expected,
            got: values.len(),
        })
    } else {
        Ok(())
    }
}

fn parse_field(name: &'static str, value: &str) -> Result<i32, ProtocolError> {
    value.parse().map_err(|_| ProtocolError::InvalidField {
        name,
        value: value.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
