//! Infrastructure layer for the peer process.
//!
//! Everything that touches the outside world lives here, behind traits the
//! application layer depends on: the pointing device, the render surface,
//! the pub/sub transport, and the on-disk configuration.

pub mod config;
pub mod pointer;
pub mod surface;
pub mod transport;
