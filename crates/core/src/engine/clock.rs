use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Millisecond time source for velocity sampling.
///
/// Only differences between readings matter, so the origin is arbitrary.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Monotonic wall clock for native hosts.
///
/// The origin is taken on the first reading, so constructing one never
/// touches the platform timer (wasm32 hosts use [`HostClock`] instead).
#[derive(Debug, Clone, Default)]
pub struct SystemClock {
    origin: Cell<Option<Instant>>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        let origin = match self.origin.get() {
            Some(origin) => origin,
            None => {
                let now = Instant::now();
                self.origin.set(Some(now));
                now
            }
        };
        origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock the host advances explicitly.
///
/// Clones share the same reading: a host keeps one handle and sets it from
/// its own frame time (`performance.now()`, egui input time) before
/// forwarding events. Tests drive it the same way.
#[derive(Debug, Clone, Default)]
pub struct HostClock(Rc<Cell<f64>>);

impl HostClock {
    pub fn new(start_ms: f64) -> Self {
        Self(Rc::new(Cell::new(start_ms)))
    }

    pub fn set(&self, now_ms: f64) {
        self.0.set(now_ms);
    }

    pub fn advance(&self, delta_ms: f64) {
        self.0.set(self.0.get() + delta_ms);
    }
}

impl Clock for HostClock {
    fn now_ms(&self) -> f64 {
        self.0.get()
    }
}
