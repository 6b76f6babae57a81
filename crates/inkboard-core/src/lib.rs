//! # inkboard-core
//!
//! Shared library for Inkboard containing the wire protocol codec, the
//! replicated drawing domain model, and the viewport math.
//!
//! This crate is used by every peer process. It has zero dependencies on OS
//! APIs, UI frameworks, or network sockets.
//!
//! # Architecture overview
//!
//! Inkboard is a shared freehand drawing surface: several participants draw
//! on the same canvas at the same time. Each participant runs one peer
//! process. A peer captures its own pen strokes locally, broadcasts them as
//! small events over a pub/sub transport, and replays the events it receives
//! from every other peer onto its own mirror of the shared canvas.
//!
//! This crate defines:
//!
//! - **`protocol`** – How events travel over the network. Events are encoded
//!   into a colon-delimited text line (`topic:sender:tag:field...`) and
//!   decoded back into typed Rust values on the other end.
//!
//! - **`domain`** – Pure drawing state with no OS dependencies. The central
//!   pieces are the [`Replica`] (one participant's pen state and stroke
//!   history) and the [`BoardStore`] (the map of every known participant's
//!   replica, keyed by peer identity).

// Rust will look for each module in a subdirectory with the same name
// (e.g., src/protocol/mod.rs).
pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `inkboard_core::Replica` instead of `inkboard_core::domain::replica::Replica`.
pub use domain::board::{BoardStore, PeerId};
pub use domain::palette;
pub use domain::replica::{Brush, Point, Replica, Rgb, Stroke, StrokePhase};
pub use domain::viewport::{PanDirection, PanKeys, ViewOffset, PAN_STEP};
pub use protocol::codec::{decode_message, encode_message, ProtocolError};
pub use protocol::messages::{BoardEvent, EventTag, WireMessage};
