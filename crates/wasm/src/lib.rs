//! JavaScript bridge: pickers live here, addressed by integer handles.
//!
//! The host owns the clock and the refresh loop. Every pointer call carries
//! the host's `performance.now()`, and a momentum run is driven by calling
//! [`frame`] with the token from the previous outcome on each animation
//! frame until the outcome is no longer `"frame"`.

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wheel_pick_core::engine::{FrameOutcome, HostClock, Release, Settle};
use wheel_pick_core::report::{MemStore, ReportError, ReportStore};
use wheel_pick_core::views::render_wheel;
use wheel_pick_core::{PickerConfig, PickerValue, ValueList, WheelPicker};
use wheel_pick_protocol::Viewport;

#[derive(Debug, Error)]
enum BridgeError {
    #[error("invalid picker handle {0}")]
    Handle(usize),
    #[error("bad json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Picker(#[from] wheel_pick_core::engine::PickerError),
    #[error(transparent)]
    Config(#[from] wheel_pick_core::model::ConfigError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

struct Entry {
    picker: WheelPicker,
    clock: HostClock,
    committed: Rc<RefCell<Vec<PickerValue>>>,
}

thread_local! {
    static PICKERS: RefCell<Vec<Option<Entry>>> = const { RefCell::new(Vec::new()) };
    static REPORTS: RefCell<MemStore> = RefCell::new(MemStore::new());
}

/// What a pointer or frame call did, as seen from JavaScript.
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum Outcome {
    Ignored,
    Stale,
    Settled { index: usize, changed: bool },
    Frame { token: u64, offset: f64 },
}

impl From<Settle> for Outcome {
    fn from(s: Settle) -> Self {
        Outcome::Settled {
            index: s.index,
            changed: s.changed,
        }
    }
}

fn release_outcome(release: Release, offset: f64) -> Outcome {
    match release {
        Release::Ignored => Outcome::Ignored,
        Release::Settled(s) => s.into(),
        Release::Momentum(token) => Outcome::Frame {
            token: token.id(),
            offset,
        },
    }
}

fn with_entry<T>(
    handle: usize,
    f: impl FnOnce(&mut Entry) -> Result<T, BridgeError>,
) -> Result<T, BridgeError> {
    PICKERS.with(|pickers| {
        let mut pickers = pickers.borrow_mut();
        let entry = pickers
            .get_mut(handle)
            .and_then(Option::as_mut)
            .ok_or(BridgeError::Handle(handle))?;
        f(entry)
    })
}

fn to_json(value: &impl Serialize) -> Result<String, BridgeError> {
    Ok(serde_json::to_string(value)?)
}

fn create(
    values: &str,
    value: &str,
    config: Option<&str>,
    now_ms: f64,
) -> Result<usize, BridgeError> {
    let values: ValueList = serde_json::from_str(values)?;
    let value: PickerValue = serde_json::from_str(value)?;
    let config = match config {
        Some(json) => PickerConfig::from_json(json.as_bytes())?,
        None => PickerConfig::default(),
    };
    let clock = HostClock::new(now_ms);
    let committed = Rc::new(RefCell::new(Vec::new()));
    let sink = committed.clone();
    let picker = WheelPicker::new(values, value, config)?
        .with_clock(clock.clone())
        .on_change(move |v| sink.borrow_mut().push(v.clone()));
    let entry = Entry {
        picker,
        clock,
        committed,
    };
    Ok(PICKERS.with(|pickers| {
        let mut pickers = pickers.borrow_mut();
        match pickers.iter().position(Option::is_none) {
            Some(free) => {
                pickers[free] = Some(entry);
                free
            }
            None => {
                pickers.push(Some(entry));
                pickers.len() - 1
            }
        }
    }))
}

fn down(handle: usize, y: f64, now_ms: f64) -> Result<(), BridgeError> {
    with_entry(handle, |e| {
        e.clock.set(now_ms);
        e.picker.begin(y);
        Ok(())
    })
}

fn moved(handle: usize, y: f64, now_ms: f64) -> Result<f64, BridgeError> {
    with_entry(handle, |e| {
        e.clock.set(now_ms);
        e.picker.move_to(y);
        Ok(e.picker.offset())
    })
}

fn up(handle: usize, now_ms: f64) -> Result<Outcome, BridgeError> {
    with_entry(handle, |e| {
        e.clock.set(now_ms);
        let release = e.picker.end();
        Ok(release_outcome(release, e.picker.offset()))
    })
}

fn cancelled(handle: usize) -> Result<Outcome, BridgeError> {
    with_entry(handle, |e| {
        let release = e.picker.cancel();
        Ok(release_outcome(release, e.picker.offset()))
    })
}

fn tick(handle: usize, token: u64) -> Result<Outcome, BridgeError> {
    with_entry(handle, |e| {
        let Some(pending) = e.picker.pending_frame().filter(|t| t.id() == token) else {
            return Ok(Outcome::Stale);
        };
        Ok(match e.picker.on_frame(pending) {
            FrameOutcome::Stale => Outcome::Stale,
            FrameOutcome::Advanced { offset, next } => Outcome::Frame {
                token: next.id(),
                offset,
            },
            FrameOutcome::Settled(s) => s.into(),
        })
    })
}

fn set(handle: usize, value: &str) -> Result<(), BridgeError> {
    let value: PickerValue = serde_json::from_str(value)?;
    with_entry(handle, |e| Ok(e.picker.set_value(value)?))
}

fn render(handle: usize, width: f64) -> Result<String, BridgeError> {
    with_entry(handle, |e| {
        let view = e.picker.view();
        let viewport = Viewport::new(width, view.height());
        to_json(&render_wheel(&view, &viewport, "wheel"))
    })
}

fn drain_committed(handle: usize) -> Result<String, BridgeError> {
    with_entry(handle, |e| {
        let values = std::mem::take(&mut *e.committed.borrow_mut());
        to_json(&values)
    })
}

fn destroy(handle: usize) -> Result<(), BridgeError> {
    PICKERS.with(|pickers| {
        let mut pickers = pickers.borrow_mut();
        let slot = pickers
            .get_mut(handle)
            .filter(|slot| slot.is_some())
            .ok_or(BridgeError::Handle(handle))?;
        if let Some(mut entry) = slot.take() {
            entry.picker.teardown();
        }
        Ok(())
    })
}

fn file_report(payload: &str) -> Result<String, BridgeError> {
    let report = REPORTS.with(|store| store.borrow_mut().create_from_json(payload.as_bytes()))?;
    to_json(&report)
}

fn all_reports() -> Result<String, BridgeError> {
    REPORTS.with(|store| to_json(&store.borrow().list()))
}

/// Create a picker. `values` is a JSON array of ints/strings, `value` one
/// of them, `config` an optional picker config. Returns a handle.
#[wasm_bindgen]
pub fn create_picker(
    values: &str,
    value: &str,
    config: Option<String>,
    now_ms: f64,
) -> Result<usize, JsError> {
    Ok(create(values, value, config.as_deref(), now_ms)?)
}

#[wasm_bindgen]
pub fn pointer_down(handle: usize, y: f64, now_ms: f64) -> Result<(), JsError> {
    Ok(down(handle, y, now_ms)?)
}

/// Returns the new offset.
#[wasm_bindgen]
pub fn pointer_move(handle: usize, y: f64, now_ms: f64) -> Result<f64, JsError> {
    Ok(moved(handle, y, now_ms)?)
}

/// Returns an outcome as JSON: `{"kind":"settled",...}`, or
/// `{"kind":"frame","token":n,...}` when momentum needs frames.
#[wasm_bindgen]
pub fn pointer_up(handle: usize, now_ms: f64) -> Result<String, JsError> {
    Ok(to_json(&up(handle, now_ms)?)?)
}

#[wasm_bindgen]
pub fn pointer_cancel(handle: usize) -> Result<String, JsError> {
    Ok(to_json(&cancelled(handle)?)?)
}

/// Animation-frame callback. A token that no longer names the pending
/// tick yields `{"kind":"stale"}` and changes nothing.
#[wasm_bindgen]
pub fn frame(handle: usize, token: f64) -> Result<String, JsError> {
    Ok(to_json(&tick(handle, token as u64)?)?)
}

/// Position the picker on `value` (JSON) without reporting a change.
#[wasm_bindgen]
pub fn set_value(handle: usize, value: &str) -> Result<(), JsError> {
    Ok(set(handle, value)?)
}

/// Render commands for the picker as JSON.
#[wasm_bindgen]
pub fn render_picker(handle: usize, width: f64) -> Result<String, JsError> {
    Ok(render(handle, width)?)
}

/// Values committed since the last call, oldest first, as a JSON array.
#[wasm_bindgen]
pub fn take_committed(handle: usize) -> Result<String, JsError> {
    Ok(drain_committed(handle)?)
}

/// Cancel any drag or momentum and free the handle.
#[wasm_bindgen]
pub fn destroy_picker(handle: usize) -> Result<(), JsError> {
    Ok(destroy(handle)?)
}

/// Store an alert report from a `{"eventDate": ..., "description": ...}`
/// payload. Returns the stored report.
#[wasm_bindgen]
pub fn create_report(payload: &str) -> Result<String, JsError> {
    Ok(file_report(payload)?)
}

#[wasm_bindgen]
pub fn list_reports() -> Result<String, JsError> {
    Ok(all_reports()?)
}
