//! Interaction engine: gesture tracking, momentum and snapping.
//!
//! A [`WheelPicker`] is always in exactly one phase: idle, dragging (a
//! [`GestureSession`] is open) or coasting (a [`MomentumRun`] is pending).
//! Every interaction ends on an item boundary via [`snap`].

pub mod capture;
pub mod clock;
pub mod gesture;
pub mod momentum;
pub mod picker;
pub mod snap;

pub use capture::{CaptureGuard, CaptureSlot, NoCapture, PointerCapture, SlotCapture};
pub use clock::{Clock, HostClock, SystemClock};
pub use gesture::GestureSession;
pub use momentum::{FrameToken, MomentumRun, MomentumStep};
pub use picker::{FrameOutcome, PickerError, Release, Settle, WheelPicker};
