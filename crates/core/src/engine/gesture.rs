use tracing::trace;

use super::capture::CaptureGuard;

/// One pointer-down to pointer-up interval.
///
/// Replaced wholesale by every new pointer-down; nothing carries over
/// between drags. Owns the pointer capture, which is released when the
/// session is dropped.
#[derive(Debug)]
pub struct GestureSession {
    origin_y: f64,
    start_offset: f64,
    last_y: f64,
    last_time_ms: f64,
    /// Offset units per frame; positive moves toward higher offsets.
    velocity: f64,
    _capture: CaptureGuard,
}

impl GestureSession {
    pub fn begin(pointer_y: f64, start_offset: f64, now_ms: f64, capture: CaptureGuard) -> Self {
        Self {
            origin_y: pointer_y,
            start_offset,
            last_y: pointer_y,
            last_time_ms: now_ms,
            velocity: 0.0,
            _capture: capture,
        }
    }

    /// Record a pointer sample and return the unclamped offset it asks for.
    ///
    /// Dragging upward (decreasing `pointer_y`) increases the offset.
    /// A sample with no elapsed time keeps the previous velocity.
    pub fn sample(&mut self, pointer_y: f64, now_ms: f64, frame_ms: f64) -> f64 {
        let delta_y = self.origin_y - pointer_y;
        let delta_time = now_ms - self.last_time_ms;
        if delta_time > 0.0 {
            self.velocity = (self.last_y - pointer_y) / delta_time * frame_ms;
        }
        self.last_y = pointer_y;
        self.last_time_ms = now_ms;
        trace!(pointer_y, delta_y, velocity = self.velocity, "drag sample");
        self.start_offset + delta_y
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn start_offset(&self) -> f64 {
        self.start_offset
    }

    /// Close the session, releasing the capture, and return the release
    /// velocity.
    pub fn finish(self) -> f64 {
        self.velocity
    }
}
