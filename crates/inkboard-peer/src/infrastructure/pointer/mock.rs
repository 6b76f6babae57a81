//! Mock pointer source for unit and integration testing.
//!
//! Allows tests to inject synthetic [`RawInputEvent`]s without a display
//! server or input device.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, UnboundedSender};

use super::{CaptureError, PointerSource, RawInputEvent};

/// A mock implementation of [`PointerSource`] that lets tests inject samples.
pub struct MockPointerSource {
    sender: Arc<Mutex<Option<UnboundedSender<RawInputEvent>>>>,
}

impl MockPointerSource {
    /// Creates a new mock pointer source.
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
        }
    }

    /// Injects a synthetic sample, as if captured from hardware.
    ///
    /// Panics if `start()` has not been called or `stop()` already has.
    pub fn inject_event(&self, event: RawInputEvent) {
        let guard = self.sender.lock().expect("lock poisoned");
        if let Some(ref sender) = *guard {
            sender
                .send(event)
                .expect("receiver has been dropped; is the session loop running?");
        } else {
            panic!("MockPointerSource::inject_event called before start()");
        }
    }

    /// Injects a full pen-down, N-motion, pen-up gesture along a line.
    pub fn inject_gesture(&self, from: (i32, i32), to: (i32, i32), steps: i32) {
        self.inject_event(RawInputEvent::PenDown {
            x: from.0,
            y: from.1,
        });
        for i in 1..=steps {
            let x = from.0 + (to.0 - from.0) * i / steps;
            let y = from.1 + (to.1 - from.1) * i / steps;
            self.inject_event(RawInputEvent::PenMove { x, y });
        }
        self.inject_event(RawInputEvent::PenUp { x: to.0, y: to.1 });
    }
}

impl Default for MockPointerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSource for MockPointerSource {
    fn start(&self) -> Result<mpsc::UnboundedReceiver<RawInputEvent>, CaptureError> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().expect("lock poisoned") = Some(tx);
        Ok(rx)
    }

    fn stop(&self) {
        // Drop the sender to close the channel.
        *self.sender.lock().expect("lock poisoned") = None;
    }
}
