//! Render surface abstraction for the peer process.
//!
//! The session loop draws through the [`DrawSurface`] trait and never talks
//! to a window system directly. The contract distinguishes two layers:
//!
//! - **Buffer** calls ([`fill_background`](DrawSurface::fill_background),
//!   [`draw_line`](DrawSurface::draw_line)) paint the persistent offscreen
//!   buffer. Stroke segments land here, incrementally, as motion events
//!   arrive; the buffer survives across frames.
//! - [`present`](DrawSurface::present) copies the buffer to the visible
//!   screen, wiping whatever was drawn on top of the previous frame.
//! - [`draw_circle`](DrawSurface::draw_circle) paints directly onto the
//!   visible screen *after* a present. Live cursors are drawn this way each
//!   frame so they never contaminate the buffer.
//!
//! A full repaint (after an undo or a pan) is `fill_background` followed by
//! re-drawing every replica's strokes; incremental updates are single
//! `draw_line` calls.

use inkboard_core::{Point, Rgb};

pub mod mock;

/// Trait abstracting the drawing backend.
///
/// A production implementation wraps a window library's canvas; tests and
/// the headless binary use [`mock::RecordingSurface`].
pub trait DrawSurface: Send {
    /// Clears the offscreen buffer to the background color.
    fn fill_background(&mut self);

    /// Paints one line segment into the offscreen buffer.
    fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb);

    /// Paints a filled circle directly onto the visible screen, on top of
    /// the last presented frame.
    fn draw_circle(&mut self, center: Point, radius: u32, color: Rgb);

    /// Copies the offscreen buffer to the screen and makes it visible.
    fn present(&mut self);
}
