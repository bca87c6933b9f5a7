use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Routes pointer moves and releases to a dragging picker even after the
/// pointer leaves the picker's bounds.
///
/// A host implements this by subscribing to surface-wide pointer events;
/// the returned guard unsubscribes when dropped.
pub trait PointerCapture {
    fn acquire(&self) -> CaptureGuard;
}

/// Scoped pointer subscription.
///
/// Owned by the gesture session, so the capture is released on every way a
/// drag can finish: release, cancel, external reset, teardown or drop.
pub struct CaptureGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl CaptureGuard {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A guard with nothing to release.
    pub fn detached() -> Self {
        Self { release: None }
    }

    pub fn is_attached(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureGuard")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// For hosts that deliver every pointer event to the picker anyway.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn acquire(&self) -> CaptureGuard {
        CaptureGuard::detached()
    }
}

/// Records which of several pickers currently owns the pointer.
///
/// Hosts with one event loop for many wheels (the date/time form) hand each
/// picker a [`SlotCapture`] and route moves and releases to
/// [`CaptureSlot::holder`].
#[derive(Debug, Clone, Default)]
pub struct CaptureSlot(Rc<Cell<Option<usize>>>);

impl CaptureSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn holder(&self) -> Option<usize> {
        self.0.get()
    }

    pub fn handle(&self, owner: usize) -> SlotCapture {
        SlotCapture {
            slot: self.clone(),
            owner,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlotCapture {
    slot: CaptureSlot,
    owner: usize,
}

impl PointerCapture for SlotCapture {
    fn acquire(&self) -> CaptureGuard {
        self.slot.0.set(Some(self.owner));
        let slot = self.slot.clone();
        let owner = self.owner;
        CaptureGuard::new(move || {
            // A later acquire by another owner must survive this release.
            if slot.0.get() == Some(owner) {
                slot.0.set(None);
            }
        })
    }
}
