//! inkboard-peer library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry points share the same module tree.
//!
//! # What does a peer do?
//!
//! One peer process represents one participant on the shared drawing board.
//! It runs three flows:
//!
//! 1. **Local input** – pointer and key samples from this participant's
//!    device mutate the local replica, paint the new line segment, and are
//!    broadcast to every other peer as wire events.
//! 2. **Remote mirror** – events received from the pub/sub transport are
//!    decoded and replayed onto the sending peer's replica, with the local
//!    peer's own echoed events discarded.
//! 3. **Render** – at a fixed cadence the canvas buffer is presented and
//!    every peer's live cursor is drawn on top, projected through this
//!    viewer's pan offset.
//!
//! The drawing state is owned by a single task; the flows feed it over
//! channels instead of sharing locks.

/// Application layer: the session loop and its use cases.
pub mod application;

/// Infrastructure layer: device, surface, transport, and config adapters.
pub mod infrastructure;
