//! Offset ↔ index arithmetic shared by dragging, momentum and settling.

/// An exact resting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapTarget {
    pub index: usize,
    pub offset: f64,
}

/// Largest valid offset for `len` items.
pub fn max_offset(len: usize, item_height: f64) -> f64 {
    len.saturating_sub(1) as f64 * item_height
}

pub fn clamp_offset(offset: f64, max: f64) -> f64 {
    offset.max(0.0).min(max)
}

/// Nearest item to `offset`, clamped into `[0, len-1]`.
///
/// Rounds half away from zero, so an offset exactly between two items
/// resolves to the later one.
pub fn nearest_index(offset: f64, item_height: f64, len: usize) -> usize {
    let last = len.saturating_sub(1) as f64;
    let raw = (offset / item_height).round();
    // NaN falls through both comparisons and casts to 0.
    raw.max(0.0).min(last) as usize
}

pub fn index_offset(index: usize, item_height: f64) -> f64 {
    index as f64 * item_height
}

/// Where an interaction ending at `offset` comes to rest.
pub fn resolve(offset: f64, item_height: f64, len: usize) -> SnapTarget {
    let index = nearest_index(offset, item_height, len);
    SnapTarget {
        index,
        offset: index_offset(index, item_height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 40.0;

    #[test]
    fn rounds_to_nearest_item() {
        assert_eq!(nearest_index(0.0, H, 31), 0);
        assert_eq!(nearest_index(19.9, H, 31), 0);
        assert_eq!(nearest_index(20.0, H, 31), 1);
        assert_eq!(nearest_index(475.0, H, 31), 12);
        assert_eq!(nearest_index(645.0, H, 31), 16);
    }

    #[test]
    fn clamps_out_of_range_offsets() {
        assert_eq!(nearest_index(-500.0, H, 31), 0);
        assert_eq!(nearest_index(10_000.0, H, 31), 30);
        assert_eq!(nearest_index(f64::NAN, H, 31), 0);
    }

    #[test]
    fn resolve_lands_exactly_on_boundary() {
        let t = resolve(523.7, H, 31);
        assert_eq!(t.index, 13);
        assert_eq!(t.offset, 520.0);
    }

    #[test]
    fn single_item_wheel_has_zero_range() {
        assert_eq!(max_offset(1, H), 0.0);
        assert_eq!(resolve(35.0, H, 1), SnapTarget { index: 0, offset: 0.0 });
    }

    #[test]
    fn clamp_offset_pins_both_ends() {
        assert_eq!(clamp_offset(-3.0, 80.0), 0.0);
        assert_eq!(clamp_offset(81.0, 80.0), 80.0);
        assert_eq!(clamp_offset(42.5, 80.0), 42.5);
    }
}
