use std::fmt;

use thiserror::Error;
use tracing::{debug, info, trace};

use super::capture::{NoCapture, PointerCapture};
use super::clock::{Clock, SystemClock};
use super::gesture::GestureSession;
use super::momentum::{FrameToken, MomentumRun, MomentumStep};
use super::snap;
use crate::model::{ConfigError, PickerConfig, PickerValue, ValueError, ValueList};
use crate::views::wheel::WheelView;

#[derive(Debug, Error)]
pub enum PickerError {
    #[error(transparent)]
    Values(#[from] ValueError),
    #[error("value {0} is not one of the wheel's values")]
    ValueNotFound(PickerValue),
    #[error("invalid picker config: {0}")]
    Config(#[from] ConfigError),
}

/// Called with the newly committed value when a wheel comes to rest on a
/// different item.
pub type ChangeCallback = Box<dyn FnMut(&PickerValue)>;

/// Result of settling on an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settle {
    pub index: usize,
    /// Whether the change callback fired.
    pub changed: bool,
}

/// What a pointer release did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// No drag was in progress.
    Ignored,
    /// Slow release: snapped immediately.
    Settled(Settle),
    /// Fast release: a momentum run is waiting for the given frame.
    Momentum(FrameToken),
}

/// What a refresh callback did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// The token no longer names a pending tick (cancelled or consumed).
    Stale,
    /// The offset moved; call again with `next` on the following frame.
    Advanced { offset: f64, next: FrameToken },
    /// The run ended and the wheel snapped.
    Settled(Settle),
}

#[derive(Debug)]
enum Phase {
    Idle,
    Dragging(GestureSession),
    Coasting(MomentumRun),
}

/// A vertically scrolling list that snaps to one item.
///
/// The scroll offset is the only positional state; it stays within
/// `[0, (len-1) * item_height]` at every step and rests on an exact item
/// boundary whenever no drag or momentum run is active.
///
/// ```
/// use wheel_pick_core::engine::{HostClock, WheelPicker};
/// use wheel_pick_core::{PickerConfig, PickerValue, ValueList};
///
/// let days = ValueList::new(1..=31i64).unwrap();
/// let clock = HostClock::new(0.0);
/// let mut picker = WheelPicker::new(days, PickerValue::Int(15), PickerConfig::default())
///     .unwrap()
///     .with_clock(clock.clone());
/// assert_eq!(picker.offset(), 560.0);
///
/// // Drag 85px downward, then hold still so the release is slow.
/// picker.begin(300.0);
/// clock.advance(500.0);
/// picker.move_to(385.0);
/// clock.advance(100.0);
/// picker.move_to(385.0);
/// picker.end();
/// assert_eq!(picker.value(), &PickerValue::Int(13));
/// ```
pub struct WheelPicker {
    config: PickerConfig,
    values: ValueList,
    /// The value the owner last saw, through `set_value` or the callback.
    committed: PickerValue,
    offset: f64,
    phase: Phase,
    next_token: FrameToken,
    clock: Box<dyn Clock>,
    capture: Box<dyn PointerCapture>,
    on_change: Option<ChangeCallback>,
}

impl WheelPicker {
    /// Create a picker resting on `value`.
    ///
    /// Fails if `value` is not in `values` or the config is invalid.
    pub fn new(
        values: ValueList,
        value: PickerValue,
        config: PickerConfig,
    ) -> Result<Self, PickerError> {
        config.validate()?;
        let index = values
            .position(&value)
            .ok_or_else(|| PickerError::ValueNotFound(value.clone()))?;
        Ok(Self {
            offset: snap::index_offset(index, config.item_height),
            config,
            values,
            committed: value,
            phase: Phase::Idle,
            next_token: FrameToken::first(),
            clock: Box::new(SystemClock::new()),
            capture: Box::new(NoCapture),
            on_change: None,
        })
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_capture(mut self, capture: impl PointerCapture + 'static) -> Self {
        self.capture = Box::new(capture);
        self
    }

    pub fn on_change(mut self, callback: impl FnMut(&PickerValue) + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn set_on_change(&mut self, callback: impl FnMut(&PickerValue) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    pub fn values(&self) -> &ValueList {
        &self.values
    }

    /// The committed value.
    pub fn value(&self) -> &PickerValue {
        &self.committed
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn max_offset(&self) -> f64 {
        snap::max_offset(self.values.len(), self.config.item_height)
    }

    /// The item currently nearest the selection band.
    pub fn centered_index(&self) -> usize {
        snap::nearest_index(self.offset, self.config.item_height, self.values.len())
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging(_))
    }

    pub fn is_coasting(&self) -> bool {
        matches!(self.phase, Phase::Coasting(_))
    }

    /// Whether the offset is on an item boundary with nothing in flight.
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// The tick the host should deliver on its next refresh, if any.
    pub fn pending_frame(&self) -> Option<FrameToken> {
        match &self.phase {
            Phase::Coasting(run) => Some(run.token()),
            _ => None,
        }
    }

    /// Velocity of the open drag or momentum run.
    pub fn velocity(&self) -> f64 {
        match &self.phase {
            Phase::Idle => 0.0,
            Phase::Dragging(session) => session.velocity(),
            Phase::Coasting(run) => run.velocity(),
        }
    }

    /// Snapshot for the render views.
    pub fn view(&self) -> WheelView<'_> {
        WheelView {
            values: &self.values,
            offset: self.offset,
            item_height: self.config.item_height,
            visible_count: self.config.visible_count,
            is_dragging: self.is_dragging(),
        }
    }

    /// Pointer down at `pointer_y`.
    ///
    /// Cancels any momentum run and replaces any open drag.
    pub fn begin(&mut self, pointer_y: f64) {
        // Drop the previous session first so its capture is released
        // before the new one is acquired.
        self.stop();
        let now = self.clock.now_ms();
        let capture = self.capture.acquire();
        trace!(pointer_y, offset = self.offset, "drag begin");
        self.phase = Phase::Dragging(GestureSession::begin(
            pointer_y,
            self.offset,
            now,
            capture,
        ));
    }

    /// Pointer moved to `pointer_y`. Ignored unless a drag is open.
    ///
    /// Returns whether the sample was applied.
    pub fn move_to(&mut self, pointer_y: f64) -> bool {
        let max = self.max_offset();
        let now = self.clock.now_ms();
        let Phase::Dragging(session) = &mut self.phase else {
            return false;
        };
        let target = session.sample(pointer_y, now, self.config.momentum.frame_ms);
        self.offset = snap::clamp_offset(target, max);
        true
    }

    /// Pointer released.
    ///
    /// A release faster than the momentum threshold starts coasting;
    /// anything slower snaps now.
    pub fn end(&mut self) -> Release {
        let session = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(session) => session,
            other => {
                self.phase = other;
                return Release::Ignored;
            }
        };
        let velocity = session.finish();
        if velocity.abs() > self.config.momentum.release_threshold {
            let token = self.issue_token();
            debug!(velocity, offset = self.offset, "momentum start");
            self.phase = Phase::Coasting(MomentumRun::start(velocity, token));
            Release::Momentum(token)
        } else {
            Release::Settled(self.settle(self.offset))
        }
    }

    /// Pointer cancelled by the platform. Snaps without momentum.
    pub fn cancel(&mut self) -> Release {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Dragging(_) => Release::Settled(self.settle(self.offset)),
            other => {
                self.phase = other;
                Release::Ignored
            }
        }
    }

    /// Refresh callback for the tick named by `token`.
    pub fn on_frame(&mut self, token: FrameToken) -> FrameOutcome {
        let max = self.max_offset();
        let momentum = self.config.momentum;
        let Phase::Coasting(run) = &mut self.phase else {
            return FrameOutcome::Stale;
        };
        if run.token() != token {
            return FrameOutcome::Stale;
        }
        match run.step(self.offset, max, &momentum) {
            MomentumStep::Advance { offset } => {
                self.offset = offset;
                let next = run.token();
                self.next_token = next.next();
                FrameOutcome::Advanced { offset, next }
            }
            MomentumStep::Settle => {
                debug!(ticks = run.ticks(), offset = self.offset, "momentum stop");
                self.phase = Phase::Idle;
                FrameOutcome::Settled(self.settle(self.offset))
            }
        }
    }

    /// Deliver the pending tick, if there is one.
    pub fn tick(&mut self) -> Option<FrameOutcome> {
        let token = self.pending_frame()?;
        Some(self.on_frame(token))
    }

    /// Drop any drag or momentum and snap where the wheel is now.
    pub fn snap(&mut self) -> Settle {
        self.stop();
        self.settle(self.offset)
    }

    /// Snap as if an interaction had ended at `offset`.
    pub fn snap_to_offset(&mut self, offset: f64) -> Settle {
        self.stop();
        self.settle(offset)
    }

    /// Move `delta` items from the centered item and commit it, as a
    /// keyboard step would.
    pub fn step_by(&mut self, delta: i64) -> Settle {
        let current = self.centered_index() as i64;
        let target = (current + delta).clamp(0, self.values.last_index() as i64);
        self.snap_to_offset(snap::index_offset(target as usize, self.config.item_height))
    }

    /// Owner-driven selection. Positions the wheel on `value` without
    /// calling back.
    pub fn set_value(&mut self, value: PickerValue) -> Result<(), PickerError> {
        let index = self
            .values
            .position(&value)
            .ok_or_else(|| PickerError::ValueNotFound(value.clone()))?;
        self.stop();
        let target = snap::resolve(
            snap::index_offset(index, self.config.item_height),
            self.config.item_height,
            self.values.len(),
        );
        self.offset = target.offset;
        self.committed = value;
        Ok(())
    }

    /// Cancel everything in flight. Any pending frame becomes stale and the
    /// pointer capture is released. The offset is left where it is.
    pub fn teardown(&mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Phase::Coasting(run) = &self.phase {
            debug!(velocity = run.velocity(), "momentum cancelled");
        }
        self.phase = Phase::Idle;
        // Tokens handed out before now must not match anything later.
        self.next_token = self.next_token.next();
    }

    fn issue_token(&mut self) -> FrameToken {
        let token = self.next_token;
        self.next_token = token.next();
        token
    }

    fn settle(&mut self, offset: f64) -> Settle {
        let target = snap::resolve(offset, self.config.item_height, self.values.len());
        self.offset = target.offset;
        let Some(value) = self.values.get(target.index) else {
            return Settle {
                index: target.index,
                changed: false,
            };
        };
        let changed = *value != self.committed;
        if changed {
            let value = value.clone();
            info!(index = target.index, %value, "value committed");
            self.committed = value.clone();
            if let Some(callback) = self.on_change.as_mut() {
                callback(&value);
            }
        }
        Settle {
            index: target.index,
            changed,
        }
    }
}

impl fmt::Debug for WheelPicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WheelPicker")
            .field("config", &self.config)
            .field("len", &self.values.len())
            .field("committed", &self.committed)
            .field("offset", &self.offset)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::capture::CaptureSlot;
    use crate::engine::clock::HostClock;

    struct Harness {
        picker: WheelPicker,
        clock: HostClock,
        changes: Rc<RefCell<Vec<PickerValue>>>,
    }

    fn days(value: i64) -> Harness {
        let values = ValueList::new(1..=31i64).unwrap_or_else(|_| unreachable!());
        let clock = HostClock::new(1_000.0);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = changes.clone();
        let picker = WheelPicker::new(values, PickerValue::Int(value), PickerConfig::default())
            .unwrap_or_else(|e| unreachable!("{e}"))
            .with_clock(clock.clone())
            .on_change(move |v| sink.borrow_mut().push(v.clone()));
        Harness {
            picker,
            clock,
            changes,
        }
    }

    impl Harness {
        /// Drag from `from` to `to` in small steps, then hold still long
        /// enough for the release to be slow.
        fn slow_drag(&mut self, from: f64, to: f64) -> Release {
            self.picker.begin(from);
            let steps = 10;
            for i in 1..=steps {
                self.clock.advance(50.0);
                let y = from + (to - from) * f64::from(i) / f64::from(steps);
                self.picker.move_to(y);
            }
            self.clock.advance(200.0);
            self.picker.move_to(to);
            self.picker.end()
        }

        fn run_to_rest(&mut self) -> u32 {
            let mut frames = 0;
            while let Some(outcome) = self.picker.tick() {
                frames += 1;
                if matches!(outcome, FrameOutcome::Settled(_)) {
                    break;
                }
            }
            frames
        }
    }

    #[test]
    fn initial_offset_comes_from_value_index() {
        let h = days(15);
        assert_eq!(h.picker.offset(), 560.0);
        assert_eq!(h.picker.centered_index(), 14);
        assert!(h.picker.is_settled());
    }

    #[test]
    fn unknown_initial_value_is_rejected() {
        let values = ValueList::new(1..=31i64).unwrap_or_else(|_| unreachable!());
        let result = WheelPicker::new(values, PickerValue::Int(32), PickerConfig::default());
        assert!(matches!(result, Err(PickerError::ValueNotFound(PickerValue::Int(32)))));
    }

    #[test]
    fn downward_drag_of_85px_commits_13() {
        let mut h = days(15);
        let release = h.slow_drag(300.0, 385.0);
        assert_eq!(
            release,
            Release::Settled(Settle {
                index: 12,
                changed: true
            })
        );
        assert_eq!(h.picker.offset(), 480.0);
        assert_eq!(*h.changes.borrow(), vec![PickerValue::Int(13)]);
    }

    #[test]
    fn upward_drag_of_85px_commits_17() {
        let mut h = days(15);
        h.slow_drag(385.0, 300.0);
        assert_eq!(h.picker.offset(), 640.0);
        assert_eq!(*h.changes.borrow(), vec![PickerValue::Int(17)]);
    }

    #[test]
    fn drag_offset_is_clamped_at_both_ends() {
        let mut h = days(2);
        h.picker.begin(100.0);
        h.clock.advance(16.0);
        h.picker.move_to(400.0);
        assert_eq!(h.picker.offset(), 0.0);
        h.clock.advance(16.0);
        h.picker.move_to(-5_000.0);
        assert_eq!(h.picker.offset(), h.picker.max_offset());
    }

    #[test]
    fn no_callback_while_dragging() {
        let mut h = days(15);
        h.picker.begin(300.0);
        for _ in 0..20 {
            h.clock.advance(16.0);
            h.picker.move_to(200.0);
        }
        assert!(h.changes.borrow().is_empty());
        assert_ne!(h.picker.offset(), 560.0);
    }

    #[test]
    fn move_without_session_is_ignored() {
        let mut h = days(15);
        assert!(!h.picker.move_to(10.0));
        assert_eq!(h.picker.offset(), 560.0);
        assert_eq!(h.picker.end(), Release::Ignored);
    }

    #[test]
    fn fast_release_coasts_then_settles_once() {
        let mut h = days(15);
        h.picker.begin(300.0);
        h.clock.advance(16.0);
        h.picker.move_to(290.0);
        h.clock.advance(16.0);
        h.picker.move_to(280.0);
        let Release::Momentum(_) = h.picker.end() else {
            unreachable!("10px per frame should coast");
        };
        assert!(h.picker.is_coasting());
        let frames = h.run_to_rest();
        assert!(frames > 1);
        assert!(h.picker.is_settled());
        let rest = h.picker.offset();
        assert_eq!(rest % 40.0, 0.0);
        assert_eq!(h.changes.borrow().len(), 1);
    }

    #[test]
    fn momentum_offset_never_leaves_range() {
        let mut h = days(29);
        h.picker.begin(300.0);
        h.clock.advance(8.0);
        h.picker.move_to(200.0);
        assert!(matches!(h.picker.end(), Release::Momentum(_)));
        while let Some(outcome) = h.picker.tick() {
            let offset = h.picker.offset();
            assert!((0.0..=h.picker.max_offset()).contains(&offset));
            if matches!(outcome, FrameOutcome::Settled(_)) {
                break;
            }
        }
        assert_eq!(h.picker.offset(), 1_200.0);
        assert_eq!(*h.changes.borrow(), vec![PickerValue::Int(31)]);
    }

    #[test]
    fn new_gesture_cancels_momentum_and_stale_frames_do_nothing() {
        let mut h = days(15);
        h.picker.begin(300.0);
        h.clock.advance(16.0);
        h.picker.move_to(280.0);
        let Release::Momentum(token) = h.picker.end() else {
            unreachable!("should coast");
        };
        h.picker.begin(280.0);
        let offset = h.picker.offset();
        assert_eq!(h.picker.on_frame(token), FrameOutcome::Stale);
        assert_eq!(h.picker.offset(), offset);
        assert_eq!(h.picker.velocity(), 0.0);
    }

    #[test]
    fn consumed_frame_token_is_stale() {
        let mut h = days(15);
        h.picker.begin(300.0);
        h.clock.advance(16.0);
        h.picker.move_to(280.0);
        let Release::Momentum(token) = h.picker.end() else {
            unreachable!("should coast");
        };
        let FrameOutcome::Advanced { next, .. } = h.picker.on_frame(token) else {
            unreachable!("first tick moves");
        };
        let offset = h.picker.offset();
        assert_eq!(h.picker.on_frame(token), FrameOutcome::Stale);
        assert_eq!(h.picker.offset(), offset);
        assert!(matches!(h.picker.on_frame(next), FrameOutcome::Advanced { .. }));
    }

    #[test]
    fn teardown_stops_momentum_without_settling() {
        let mut h = days(15);
        h.picker.begin(300.0);
        h.clock.advance(16.0);
        h.picker.move_to(280.0);
        let Release::Momentum(token) = h.picker.end() else {
            unreachable!("should coast");
        };
        h.picker.teardown();
        assert_eq!(h.picker.pending_frame(), None);
        assert_eq!(h.picker.on_frame(token), FrameOutcome::Stale);
        assert!(h.changes.borrow().is_empty());
    }

    #[test]
    fn snap_is_idempotent() {
        let mut h = days(15);
        let first = h.picker.snap_to_offset(523.0);
        let second = h.picker.snap();
        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(h.changes.borrow().len(), 1);
        assert_eq!(h.picker.offset(), 520.0);
    }

    #[test]
    fn snap_to_same_item_does_not_call_back() {
        let mut h = days(15);
        let settle = h.picker.snap_to_offset(570.0);
        assert_eq!(settle, Settle { index: 14, changed: false });
        assert_eq!(h.picker.offset(), 560.0);
        assert!(h.changes.borrow().is_empty());
    }

    #[test]
    fn set_value_repositions_silently() {
        let mut h = days(15);
        assert!(h.picker.set_value(PickerValue::Int(20)).is_ok());
        assert_eq!(h.picker.offset(), 19.0 * 40.0);
        assert_eq!(h.picker.value(), &PickerValue::Int(20));
        assert!(h.changes.borrow().is_empty());
        // Settling where it already is stays quiet too.
        assert!(!h.picker.snap().changed);
    }

    #[test]
    fn set_value_with_unknown_value_leaves_state() {
        let mut h = days(15);
        let result = h.picker.set_value(PickerValue::from("15"));
        assert!(matches!(result, Err(PickerError::ValueNotFound(_))));
        assert_eq!(h.picker.offset(), 560.0);
        assert_eq!(h.picker.value(), &PickerValue::Int(15));
    }

    #[test]
    fn cancel_snaps_without_momentum() {
        let mut h = days(15);
        h.picker.begin(300.0);
        h.clock.advance(16.0);
        h.picker.move_to(250.0);
        let release = h.picker.cancel();
        assert!(matches!(release, Release::Settled(_)));
        assert_eq!(h.picker.pending_frame(), None);
        assert_eq!(h.picker.offset(), 600.0);
    }

    #[test]
    fn step_by_clamps_and_commits() {
        let mut h = days(30);
        assert_eq!(h.picker.step_by(1).index, 30);
        assert_eq!(h.picker.step_by(5).index, 30);
        assert_eq!(*h.changes.borrow(), vec![PickerValue::Int(31)]);
    }

    #[test]
    fn capture_is_held_only_while_dragging() {
        let slot = CaptureSlot::new();
        let mut h = days(15);
        h.picker = h.picker.with_capture(slot.handle(7));
        h.picker.begin(10.0);
        assert_eq!(slot.holder(), Some(7));
        h.picker.end();
        assert_eq!(slot.holder(), None);

        h.picker.begin(10.0);
        assert!(h.picker.set_value(PickerValue::Int(3)).is_ok());
        assert_eq!(slot.holder(), None);

        h.picker.begin(10.0);
        drop(h.picker);
        assert_eq!(slot.holder(), None);
    }
}
