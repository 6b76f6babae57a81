//! Recording surface for unit and integration testing.
//!
//! Records every draw call instead of painting pixels, so tests can assert
//! on what would have been drawn. The call log is behind a shared handle
//! because the session loop takes ownership of the surface itself.

use std::sync::{Arc, Mutex};

use inkboard_core::{Point, Rgb};

use super::DrawSurface;

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceCall {
    Fill,
    Line {
        from: Point,
        to: Point,
        width: u32,
        color: Rgb,
    },
    Circle {
        center: Point,
        radius: u32,
        color: Rgb,
    },
    Present,
}

/// Shared view into a [`RecordingSurface`]'s call log.
#[derive(Clone, Default)]
pub struct SurfaceLog {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl SurfaceLog {
    /// Snapshot of all calls so far.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls.lock().expect("lock poisoned").clone()
    }

    pub fn clear(&self) {
        self.calls.lock().expect("lock poisoned").clear();
    }

    pub fn line_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Line { .. }))
    }

    pub fn circle_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Circle { .. }))
    }

    pub fn fill_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Fill))
    }

    pub fn present_count(&self) -> usize {
        self.count(|c| matches!(c, SurfaceCall::Present))
    }

    fn count(&self, pred: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter(|c| pred(c))
            .count()
    }

    fn push(&self, call: SurfaceCall) {
        self.calls.lock().expect("lock poisoned").push(call);
    }
}

/// A [`DrawSurface`] that records calls instead of rendering.
#[derive(Default)]
pub struct RecordingSurface {
    log: SurfaceLog,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle that stays valid after the surface is moved into
    /// the session loop.
    pub fn log(&self) -> SurfaceLog {
        self.log.clone()
    }
}

impl DrawSurface for RecordingSurface {
    fn fill_background(&mut self) {
        self.log.push(SurfaceCall::Fill);
    }

    fn draw_line(&mut self, from: Point, to: Point, width: u32, color: Rgb) {
        self.log.push(SurfaceCall::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn draw_circle(&mut self, center: Point, radius: u32, color: Rgb) {
        self.log.push(SurfaceCall::Circle {
            center,
            radius,
            color,
        });
    }

    fn present(&mut self) {
        self.log.push(SurfaceCall::Present);
    }
}
