//! Integration test: drive the date/time form the way a host would and file
//! an alert report from the confirmed value.

use chrono::{NaiveDate, NaiveDateTime, TimeZone, Utc};
use wheel_pick_core::datetime::{DateTimeForm, Field, Locale};
use wheel_pick_core::engine::{HostClock, Release};
use wheel_pick_core::report::{MemStore, NewAlertReport, ReportStore};
use wheel_pick_core::views::{FormLayout, render_form};
use wheel_pick_core::PickerConfig;
use wheel_pick_protocol::{RenderCommand, Viewport};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(h, min, 0))
        .expect("valid date")
}

#[test]
fn slow_drag_on_day_column_commits_and_reports() {
    let clock = HostClock::new(0.0);
    let mut form = DateTimeForm::new(
        at(2026, 1, 15, 9, 5),
        Locale::Es,
        PickerConfig::default(),
        clock.clone(),
    )
    .expect("form opens");

    let layout = FormLayout::new(400.0, &PickerConfig::default());
    let column = layout.column(Field::Day);
    let press = column.center();
    assert_eq!(layout.hit(press), Some(Field::Day));

    // Drag the day wheel 85px down, pausing before release.
    let day = form.picker_mut(Field::Day);
    day.begin(press.y);
    clock.advance(400.0);
    day.move_to(press.y + 85.0);
    clock.advance(200.0);
    day.move_to(press.y + 85.0);
    assert!(matches!(day.end(), Release::Settled(_)));

    assert_eq!(form.selection().day, 13);
    assert_eq!(form.summary(), "13 Ene 2026 - 09:05");

    let confirmed = form.confirm().expect("valid date");
    let mut store = MemStore::new();
    let report = store.create(NewAlertReport::new(Utc.from_utc_datetime(&confirmed)));
    assert_eq!(report.event_date.to_rfc3339(), "2026-01-13T09:05:00+00:00");
    assert_eq!(store.list().len(), 1);
}

#[test]
fn fast_flick_on_minutes_coasts_until_every_frame_is_delivered() {
    let clock = HostClock::new(0.0);
    let mut form = DateTimeForm::new(
        at(2026, 6, 1, 12, 30),
        Locale::En,
        PickerConfig::default(),
        clock.clone(),
    )
    .expect("form opens");

    let minute = form.picker_mut(Field::Minute);
    minute.begin(300.0);
    clock.advance(16.0);
    minute.move_to(280.0);
    assert!(matches!(minute.end(), Release::Momentum(_)));
    assert_eq!(form.pending_frames().len(), 1);
    assert!(form.is_animating());

    let mut frames = 0;
    while form.tick_all() {
        frames += 1;
        assert!(frames < 1_000);
    }
    assert!(!form.is_animating());
    assert!(form.pending_frames().is_empty());
    assert!(form.selection().minute > 30);
}

#[test]
fn reset_after_drag_restores_now_and_rerenders() {
    let clock = HostClock::new(0.0);
    let now = at(2026, 1, 15, 9, 5);
    let mut form = DateTimeForm::new(now, Locale::Es, PickerConfig::default(), clock)
        .expect("form opens");
    form.picker_mut(Field::Year).step_by(2);
    assert_eq!(form.selection().year, 2028);

    form.reset(now).expect("now is in range");
    assert_eq!(form.selection().year, 2026);

    let cmds = render_form(&form, &Viewport::new(400.0, 900.0), None);
    let summary = cmds.iter().any(|c| {
        matches!(c, RenderCommand::DrawText { text, .. } if text.as_str() == "15 Ene 2026 - 09:05")
    });
    assert!(summary);
}

#[test]
fn teardown_leaves_no_pending_frames() {
    let clock = HostClock::new(0.0);
    let mut form = DateTimeForm::new(
        at(2026, 1, 15, 9, 5),
        Locale::Es,
        PickerConfig::default(),
        clock.clone(),
    )
    .expect("form opens");
    let hour = form.picker_mut(Field::Hour);
    hour.begin(300.0);
    clock.advance(16.0);
    hour.move_to(200.0);
    hour.end();
    assert!(!form.pending_frames().is_empty());
    form.teardown();
    assert!(form.pending_frames().is_empty());
    assert_eq!(form.capture_holder(), None);
}
