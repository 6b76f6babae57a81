//! One participant's drawing state: pen flag, brush, cursor, stroke history.
//!
//! A [`Replica`] exists for every peer the local process has ever heard of,
//! including the local peer itself. Exactly one replica (the local one) is
//! mutated by device input; all others are mutated only by replaying events
//! received from their owning peer. Both paths go through the same operations
//! here, which is what keeps the replicas convergent.
//!
//! # Stroke lifecycle
//!
//! A stroke opens on pen-down, collects points on motion, and closes on
//! pen-up. Open-ness is an explicit [`StrokePhase`] tag on the stroke rather
//! than an inference from "last element of the list": undo can remove the
//! open stroke out from under a peer that still has its pen down, and the
//! explicit tag is what stops later motion events from leaking into the
//! previous stroke.

use serde::{Deserialize, Serialize};

use crate::domain::palette;
use crate::domain::viewport::ViewOffset;
use crate::protocol::messages::BoardEvent;

// ── Value types ───────────────────────────────────────────────────────────────

/// A point in the shared global coordinate space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// An RGB color triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from raw wire integers, clamping each component to
    /// 0–255. The codec passes values through unchecked; this is where they
    /// become storable.
    pub fn from_wire(r: i32, g: i32, b: i32) -> Self {
        Self {
            r: r.clamp(0, 255) as u8,
            g: g.clamp(0, 255) as u8,
            b: b.clamp(0, 255) as u8,
        }
    }
}

/// Pen style: width in pixels plus color.
///
/// This is the *current* style of a peer, captured into each stroke when the
/// stroke opens. Changing the brush never restyles strokes already drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brush {
    /// Stroke width in pixels; always at least 1.
    pub size: u32,
    pub color: Rgb,
}

impl Brush {
    /// Clamps a raw wire size to something drawable.
    pub fn size_from_wire(size: i32) -> u32 {
        size.max(1) as u32
    }
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            size: 1,
            color: palette::RED,
        }
    }
}

/// Whether a stroke is still receiving motion points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrokePhase {
    /// The owning peer's pen is down and motion events append here.
    Open,
    /// The stroke is finished; its point list is final.
    Closed,
}

/// One continuous pen-down-to-pen-up mark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stroke {
    /// Style captured when the stroke opened.
    pub brush: Brush,
    /// Ordered points in global coordinates. May be empty: a tap that never
    /// moved leaves an empty stroke behind, which undo skips over.
    pub points: Vec<Point>,
    /// Lifecycle tag; at most the last stroke of a replica is `Open`.
    pub phase: StrokePhase,
}

impl Stroke {
    fn open(brush: Brush) -> Self {
        Self {
            brush,
            points: Vec::new(),
            phase: StrokePhase::Open,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the two most recent points, if the stroke has at least two.
    ///
    /// This is the segment an incremental repaint draws after one motion
    /// event; a single-point stroke has nothing visible yet.
    pub fn last_segment(&self) -> Option<(Point, Point)> {
        match self.points.as_slice() {
            [.., a, b] => Some((*a, *b)),
            _ => None,
        }
    }
}

// ── Replica ───────────────────────────────────────────────────────────────────

/// One peer's drawing state as known locally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replica {
    /// True while the owning peer's input device is pressed.
    pen_down: bool,
    /// Stroke history, append-only except for undo truncation at the tail.
    strokes: Vec<Stroke>,
    /// Latest known pointer position in global coordinates.
    pub cursor: Point,
    /// Pan offset. Meaningful only on the replica of the *local* viewer;
    /// for remote replicas this merely records the last `SetViewport` seen
    /// and is never applied to anyone's geometry.
    pub view_offset: ViewOffset,
    /// Current pen style for strokes opened from now on.
    pub brush: Brush,
}

impl Replica {
    pub fn new() -> Self {
        Self {
            brush: Brush::default(),
            ..Self::default()
        }
    }

    pub fn pen_down(&self) -> bool {
        self.pen_down
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    // ── Stroke engine operations ─────────────────────────────────────────────

    /// Opens a new empty stroke with the current brush and marks the pen down.
    ///
    /// A re-entrant begin (pen-down while already down, which out-of-order
    /// delivery can produce) closes the previous stroke and opens a fresh
    /// one; no points are ever dropped.
    pub fn begin_stroke(&mut self) {
        self.close_open_stroke();
        self.strokes.push(Stroke::open(self.brush));
        self.pen_down = true;
    }

    /// Appends a point to the open stroke.
    ///
    /// Silently does nothing when the pen is up, when no stroke exists, or
    /// when the tail stroke is closed. The last case happens after an undo
    /// truncated the open stroke mid-draw: the remaining motion events of
    /// that stroke are dropped instead of corrupting the previous one.
    pub fn extend_stroke(&mut self, point: Point) {
        if !self.pen_down {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            if stroke.phase == StrokePhase::Open {
                stroke.points.push(point);
            }
        }
    }

    /// Marks the pen up and closes the open stroke.
    ///
    /// Nothing is removed; an empty stroke from a motionless tap stays in
    /// the history (and is skipped by undo).
    pub fn end_stroke(&mut self) {
        self.pen_down = false;
        self.close_open_stroke();
    }

    /// Removes the most recent stroke that actually drew something, together
    /// with everything after it.
    ///
    /// Scanning from the tail, the target is the last stroke with a
    /// non-empty point list; empty tap-strokes are skipped over rather than
    /// counted as undoable content. If no stroke ever drew anything, the
    /// whole history is cleared. The pen flag is never touched: undo is a
    /// history operation, not an input operation.
    pub fn undo(&mut self) {
        match self.strokes.iter().rposition(|s| !s.points.is_empty()) {
            Some(target) => self.strokes.truncate(target),
            None => self.strokes.clear(),
        }
    }

    /// Replays one wire event onto this replica.
    ///
    /// This is the single write path for remote replicas, and uses exactly
    /// the same operations as local input so both sides converge.
    pub fn apply_event(&mut self, event: &BoardEvent) {
        match event {
            BoardEvent::PenDown => self.begin_stroke(),
            BoardEvent::PenMotion { x, y } => {
                let point = Point::new(*x, *y);
                self.cursor = point;
                self.extend_stroke(point);
            }
            BoardEvent::PenUp => self.end_stroke(),
            BoardEvent::SetColor { r, g, b } => {
                self.brush.color = Rgb::from_wire(*r, *g, *b);
            }
            BoardEvent::SetSize { size } => {
                self.brush.size = Brush::size_from_wire(*size);
            }
            BoardEvent::SetViewport { x, y } => {
                // Recorded for completeness only; rendering always projects
                // through the local viewer's own offset.
                self.view_offset = ViewOffset::new(*x, *y);
            }
            BoardEvent::Undo => self.undo(),
            BoardEvent::Close => {
                // The peer is gone but its drawing stays on the board.
            }
        }
    }

    fn close_open_stroke(&mut self) {
        if let Some(stroke) = self.strokes.last_mut() {
            if stroke.phase == StrokePhase::Open {
                stroke.phase = StrokePhase::Closed;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
