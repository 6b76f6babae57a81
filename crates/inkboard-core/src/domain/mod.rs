//! Domain entities for Inkboard.
//!
//! This module contains pure drawing-state logic with no infrastructure
//! dependencies: no sockets, no window handles, no clocks. Everything here
//! can be unit-tested on any platform without external setup.
//!
//! The domain is deliberately deterministic: the same event sequence applied
//! to a fresh [`replica::Replica`] always produces the same stroke history.
//! That determinism is what lets N peers converge to an equivalent canvas
//! while consuming each other's event streams out of lock-step.

/// One participant's pen state and stroke history.
pub mod replica;

/// The map of every known participant's replica, keyed by peer identity.
pub mod board;

/// Per-viewer pan offset and the global-to-screen projection.
pub mod viewport;

/// The built-in brush colors and their key slots.
pub mod palette;
