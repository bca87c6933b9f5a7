//! Wheel picker engine for wheel.pick.
//!
//! The [`engine`] turns pointer samples into a clamped scroll offset,
//! runs post-release momentum and snaps to the nearest item. [`views`]
//! derives render commands from that offset, [`datetime`] composes five
//! pickers into a date/time form and [`report`] stores confirmed dates.

pub mod datetime;
pub mod engine;
pub mod model;
pub mod report;
pub mod views;

pub use engine::WheelPicker;
pub use model::{PickerConfig, PickerValue, ValueList};
