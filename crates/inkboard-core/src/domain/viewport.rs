//! Per-viewer panning: the view offset and the global-to-screen projection.
//!
//! All strokes and cursors are stored in one shared global coordinate space.
//! Each viewer owns a pan offset and projects every peer's geometry through
//! it at render time:
//!
//! ```text
//! screen_point = global_point - view_offset
//! ```
//!
//! The offset is never transmitted as geometry and never shifts stored
//! points, so two viewers panned to different corners of the board still
//! agree on where every mark lives.

use serde::{Deserialize, Serialize};

use crate::domain::replica::Point;

/// Pixels the view moves per held pan key per render tick.
pub const PAN_STEP: i32 = 20;

/// A viewer's pan offset in global coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOffset {
    pub x: i32,
    pub y: i32,
}

impl ViewOffset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Projects a global point onto this viewer's screen.
    pub fn project(&self, global: Point) -> Point {
        Point::new(global.x - self.x, global.y - self.y)
    }

    /// Converts a screen point back to global coordinates. Used when storing
    /// device samples, so that a panned viewer still draws where it points.
    pub fn unproject(&self, screen: Point) -> Point {
        Point::new(screen.x + self.x, screen.y + self.y)
    }

    pub fn translate(&mut self, dx: i32, dy: i32) {
        self.x += dx;
        self.y += dy;
    }
}

/// The four pan directions driven by the edge keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Sustained pan-key state.
///
/// Panning is driven by *held* keys, not key events: while a key is held the
/// render loop advances the offset by [`PAN_STEP`] every tick. Opposite keys
/// held together cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanKeys {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl PanKeys {
    /// Records a key transition from the input flow.
    pub fn set(&mut self, direction: PanDirection, held: bool) {
        match direction {
            PanDirection::Up => self.up = held,
            PanDirection::Down => self.down = held,
            PanDirection::Left => self.left = held,
            PanDirection::Right => self.right = held,
        }
    }

    pub fn any_held(&self) -> bool {
        self.up || self.down || self.left || self.right
    }

    /// Advances `offset` one tick's worth of panning.
    ///
    /// Returns true if the offset actually moved; the caller repaints the
    /// whole buffer in that case, because a pan shifts every pixel and there
    /// is no cheaper incremental update.
    pub fn apply(&self, offset: &mut ViewOffset) -> bool {
        let mut dx = 0;
        let mut dy = 0;
        if self.up {
            dy -= PAN_STEP;
        }
        if self.down {
            dy += PAN_STEP;
        }
        if self.left {
            dx -= PAN_STEP;
        }
        if self.right {
            dx += PAN_STEP;
        }
        if dx == 0 && dy == 0 {
            return false;
        }
        offset.translate(dx, dy);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_subtracts_offset_uniformly() {
        let offset = ViewOffset::new(30, -10);

        // Translating the offset by (dx, dy) must move every projected
        // point by exactly (-dx, -dy), for any peer's geometry.
        let points = [Point::new(0, 0), Point::new(100, 50), Point::new(-7, 3)];
        let before: Vec<Point> = points.iter().map(|p| offset.project(*p)).collect();

        let mut panned = offset;
        panned.translate(5, 8);
        let after: Vec<Point> = points.iter().map(|p| panned.project(*p)).collect();

        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(a.x, b.x - 5);
            assert_eq!(a.y, b.y - 8);
        }
    }

    #[test]
    fn test_unproject_inverts_project() {
        let offset = ViewOffset::new(17, 23);
        let global = Point::new(120, -4);

        assert_eq!(offset.unproject(offset.project(global)), global);
    }

    #[test]
    fn test_held_key_advances_offset_each_tick() {
        let mut keys = PanKeys::default();
        keys.set(PanDirection::Right, true);

        let mut offset = ViewOffset::default();
        assert!(keys.apply(&mut offset));
        assert!(keys.apply(&mut offset));
        assert_eq!(offset, ViewOffset::new(2 * PAN_STEP, 0));

        keys.set(PanDirection::Right, false);
        assert!(!keys.apply(&mut offset));
        assert_eq!(offset, ViewOffset::new(2 * PAN_STEP, 0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut keys = PanKeys::default();
        keys.set(PanDirection::Left, true);
        keys.set(PanDirection::Right, true);

        let mut offset = ViewOffset::default();
        assert!(!keys.apply(&mut offset), "no net movement, no repaint");
        assert_eq!(offset, ViewOffset::default());
    }

    #[test]
    fn test_diagonal_pan_moves_both_axes() {
        let mut keys = PanKeys::default();
        keys.set(PanDirection::Up, true);
        keys.set(PanDirection::Left, true);

        let mut offset = ViewOffset::default();
        assert!(keys.apply(&mut offset));
        assert_eq!(offset, ViewOffset::new(-PAN_STEP, -PAN_STEP));
    }
}
