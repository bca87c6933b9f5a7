//! Property tests for the offset invariants of a single wheel.

use proptest::prelude::*;
use wheel_pick_core::engine::{FrameOutcome, HostClock, Release};
use wheel_pick_core::{PickerConfig, PickerValue, ValueList, WheelPicker};

fn picker(len: i64, start: i64, clock: &HostClock) -> WheelPicker {
    let values = ValueList::new(0..len).expect("non-empty");
    WheelPicker::new(values, PickerValue::Int(start), PickerConfig::default())
        .expect("start is in range")
        .with_clock(clock.clone())
}

proptest! {
    #[test]
    fn drag_never_leaves_range(
        len in 1i64..60,
        start_frac in 0.0f64..1.0,
        moves in prop::collection::vec((-2_000.0f64..2_000.0, 0.0f64..40.0), 1..40),
    ) {
        let start = ((len - 1) as f64 * start_frac) as i64;
        let clock = HostClock::new(0.0);
        let mut p = picker(len, start, &clock);
        p.begin(0.0);
        for (y, dt) in moves {
            clock.advance(dt);
            p.move_to(y);
            prop_assert!(p.offset() >= 0.0 && p.offset() <= p.max_offset());
        }
        let release = p.end();
        if let Release::Momentum(_) = release {
            let mut guard = 0;
            while let Some(outcome) = p.tick() {
                prop_assert!(p.offset() >= 0.0 && p.offset() <= p.max_offset());
                guard += 1;
                prop_assert!(guard < 10_000);
                if matches!(outcome, FrameOutcome::Settled(_)) {
                    break;
                }
            }
        }
        prop_assert!(p.is_settled());
        prop_assert_eq!(p.offset() % 40.0, 0.0);
        let index = (p.offset() / 40.0) as i64;
        prop_assert_eq!(p.value(), &PickerValue::Int(index));
    }

    #[test]
    fn snap_rounds_to_nearest_item_and_is_idempotent(
        len in 1i64..60,
        offset in -500.0f64..3_000.0,
    ) {
        let clock = HostClock::new(0.0);
        let mut p = picker(len, 0, &clock);
        let settle = p.snap_to_offset(offset);
        let expected = (offset / 40.0).round().clamp(0.0, (len - 1) as f64) as usize;
        prop_assert_eq!(settle.index, expected);
        prop_assert_eq!(p.offset(), expected as f64 * 40.0);

        let again = p.snap();
        prop_assert_eq!(again.index, expected);
        prop_assert!(!again.changed);
    }
}
