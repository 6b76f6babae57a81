//! Pointing-device and key input for the peer process.
//!
//! Raw samples are produced by a [`PointerSource`] implementation on its own
//! thread or task and consumed by the session loop over a channel. Samples
//! carry *screen* coordinates; the application layer converts them to global
//! coordinates (adding the viewer's pan offset) before anything is stored
//! or broadcast.
//!
//! # Testability
//!
//! The `PointerSource` trait lets tests and the headless binary inject
//! synthetic samples without a display server. A production backend wrapping
//! SDL or libinput would implement the same trait.

use inkboard_core::PanDirection;
use tokio::sync::mpsc;

pub mod mock;

/// A raw input sample produced by the pointer infrastructure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawInputEvent {
    /// The pen or mouse button was pressed at screen position `(x, y)`.
    PenDown { x: i32, y: i32 },
    /// The pen moved to screen position `(x, y)`.
    PenMove { x: i32, y: i32 },
    /// The pen or mouse button was released at screen position `(x, y)`.
    PenUp { x: i32, y: i32 },
    /// A bound key went down.
    KeyDown(KeyCommand),
    /// A bound key came back up. Only pan keys care about release.
    KeyUp(KeyCommand),
}

/// The keyboard bindings that matter to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// An edge key; pans the local view while held.
    Pan(PanDirection),
    /// A digit key 0–5 selecting a palette color slot.
    ColorSlot(u8),
    /// A size key selecting a brush width of 1–6 pixels.
    BrushSize(u32),
    /// Remove the most recent drawn stroke.
    Undo,
    /// Close the window / quit the process.
    Quit,
}

/// Error type for pointer capture operations.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to start pointer backend: {0}")]
    BackendStartFailed(String),
    #[error("pointer source has already been stopped")]
    AlreadyStopped,
}

/// Trait abstracting raw input production.
///
/// Implementations own whatever thread or callback machinery their backend
/// needs and deliver samples over the returned channel. Dropping the sender
/// (via [`stop`](PointerSource::stop) or backend death) closes the channel,
/// which the session loop treats as end of local input.
pub trait PointerSource: Send {
    /// Starts the source and returns the receiver for captured samples.
    fn start(&self) -> Result<mpsc::UnboundedReceiver<RawInputEvent>, CaptureError>;
    /// Stops the source and releases its resources.
    fn stop(&self);
}
