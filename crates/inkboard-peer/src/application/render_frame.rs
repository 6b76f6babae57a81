//! RenderFrameUseCase: the per-tick drawing pass.
//!
//! Every tick the session loop advances the pan offset, repaints the buffer
//! if something invalidated it, presents, and overlays every peer's live
//! cursor on the presented frame. Cursors go on the overlay and never into
//! the buffer, so they vanish and re-appear at the new spot each frame
//! instead of smearing trails across the board.

use inkboard_core::{BoardStore, PanKeys};

use crate::infrastructure::surface::DrawSurface;

/// Cursor circles are drawn at twice the peer's brush width.
const CURSOR_RADIUS_FACTOR: u32 = 2;

/// Runs the drawing pass of each render tick.
pub struct RenderFrameUseCase;

impl RenderFrameUseCase {
    pub fn new() -> Self {
        Self
    }

    /// Advances the local pan offset by one tick of held keys.
    ///
    /// Returns true if the offset moved; the caller must repaint the buffer
    /// in that case because every projected pixel shifted.
    pub fn apply_pan(&self, keys: &PanKeys, store: &mut BoardStore) -> bool {
        keys.apply(&mut store.local_mut().view_offset)
    }

    /// Repaints the whole buffer from the replica store.
    ///
    /// Background first, then every stroke of every replica, projected
    /// through the local viewer's offset. O(total points); only undo and
    /// panning pay this cost.
    pub fn repaint(&self, store: &BoardStore, surface: &mut dyn DrawSurface) {
        surface.fill_background();
        let offset = store.local().view_offset;
        for (_peer, replica) in store.iter() {
            for stroke in replica.strokes() {
                for pair in stroke.points.windows(2) {
                    surface.draw_line(
                        offset.project(pair[0]),
                        offset.project(pair[1]),
                        stroke.brush.size,
                        stroke.brush.color,
                    );
                }
            }
        }
    }

    /// Presents the buffer and overlays every peer's cursor.
    pub fn present(&self, store: &BoardStore, surface: &mut dyn DrawSurface) {
        surface.present();
        let offset = store.local().view_offset;
        for (_peer, replica) in store.iter() {
            surface.draw_circle(
                offset.project(replica.cursor),
                replica.brush.size * CURSOR_RADIUS_FACTOR,
                replica.brush.color,
            );
        }
    }
}

impl Default for RenderFrameUseCase {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
