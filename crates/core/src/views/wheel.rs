use wheel_pick_protocol::{
    FadeEdge, FontWeight, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport,
};

use crate::model::ValueList;

const CENTER_FONT_SIZE: f64 = 24.0;
const ITEM_FONT_SIZE: f64 = 18.0;
const MIN_OPACITY: f64 = 0.3;
const OPACITY_FALLOFF: f64 = 0.35;
const MIN_SCALE: f64 = 0.7;
const SCALE_FALLOFF: f64 = 0.15;
const FADE_HEIGHT: f64 = 64.0;
const BAND_RADIUS: f64 = 6.0;

/// What a wheel looks like at one offset.
#[derive(Debug, Clone, Copy)]
pub struct WheelView<'a> {
    pub values: &'a ValueList,
    pub offset: f64,
    pub item_height: f64,
    pub visible_count: usize,
    /// Hosts that ease toward the offset should follow it directly while
    /// this is set.
    pub is_dragging: bool,
}

impl WheelView<'_> {
    pub fn height(&self) -> f64 {
        self.visible_count as f64 * self.item_height
    }

    /// Top of the selection band; also the blank space above item 0.
    pub fn band_top(&self) -> f64 {
        (self.visible_count / 2) as f64 * self.item_height
    }

    /// Top edge of item `index` inside the wheel.
    pub fn item_top(&self, index: usize) -> f64 {
        self.band_top() + index as f64 * self.item_height - self.offset
    }

    /// Indices of items at least partly inside the window.
    pub fn visible_range(&self) -> std::ops::Range<usize> {
        let first = ((self.offset - self.band_top()) / self.item_height).floor();
        let last = ((self.offset - self.band_top() + self.height()) / self.item_height).ceil();
        let len = self.values.len() as f64;
        let start = first.max(0.0).min(len) as usize;
        let end = last.max(0.0).min(len) as usize;
        start..end
    }
}

/// Per-item appearance derived from the offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub index: usize,
    /// Distance from the band, in items.
    pub distance: f64,
    pub opacity: f64,
    pub scale: f64,
    pub centered: bool,
}

impl ItemStyle {
    pub fn font_size(&self) -> f64 {
        let base = if self.centered {
            CENTER_FONT_SIZE
        } else {
            ITEM_FONT_SIZE
        };
        base * self.scale
    }

    pub fn weight(&self) -> FontWeight {
        if self.centered {
            FontWeight::Semibold
        } else {
            FontWeight::Regular
        }
    }
}

pub fn item_style(index: usize, offset: f64, item_height: f64) -> ItemStyle {
    let position = offset / item_height;
    let distance = (index as f64 - position).abs();
    ItemStyle {
        index,
        distance,
        opacity: (1.0 - distance * OPACITY_FALLOFF).max(MIN_OPACITY),
        scale: (1.0 - distance * SCALE_FALLOFF).max(MIN_SCALE),
        centered: position.round() == index as f64,
    }
}

/// Render one wheel at the origin of `viewport`.
///
/// The wheel is `viewport.width` wide and `visible_count` items tall. Items
/// fully outside the window are skipped.
pub fn render_wheel(view: &WheelView<'_>, viewport: &Viewport, id: &str) -> Vec<RenderCommand> {
    let width = viewport.width;
    let height = view.height();
    let window = Rect::new(0.0, 0.0, width, height);
    let range = view.visible_range();

    let mut commands = Vec::with_capacity(range.len() + 8);
    commands.push(RenderCommand::BeginGroup {
        id: SharedStr::from(id),
        label: None,
    });
    commands.push(RenderCommand::SetClip { rect: window });
    commands.push(RenderCommand::DrawRect {
        rect: window,
        color: ThemeToken::Surface,
        border_color: None,
        corner_radius: 0.0,
    });
    commands.push(RenderCommand::DrawRect {
        rect: Rect::new(0.0, view.band_top(), width, view.item_height),
        color: ThemeToken::SelectionBand,
        border_color: Some(ThemeToken::SelectionBorder),
        corner_radius: BAND_RADIUS,
    });

    for index in range {
        let Some(value) = view.values.get(index) else {
            continue;
        };
        let style = item_style(index, view.offset, view.item_height);
        let top = view.item_top(index);
        commands.push(RenderCommand::DrawText {
            position: Point::new(width / 2.0, top + view.item_height / 2.0),
            text: value.label(),
            color: if style.centered {
                ThemeToken::WheelItemSelected
            } else {
                ThemeToken::WheelItemText
            },
            font_size: style.font_size(),
            weight: style.weight(),
            opacity: style.opacity,
            align: TextAlign::Center,
        });
    }

    let fade = FADE_HEIGHT.min(height / 2.0);
    commands.push(RenderCommand::DrawFade {
        rect: Rect::new(0.0, 0.0, width, fade),
        color: ThemeToken::FadeOverlay,
        edge: FadeEdge::Top,
    });
    commands.push(RenderCommand::DrawFade {
        rect: Rect::new(0.0, height - fade, width, fade),
        color: ThemeToken::FadeOverlay,
        edge: FadeEdge::Bottom,
    });
    commands.push(RenderCommand::ClearClip);
    commands.push(RenderCommand::EndGroup);
    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn days() -> ValueList {
        ValueList::new(1..=31i64).unwrap_or_else(|_| unreachable!())
    }

    fn view(values: &ValueList, offset: f64) -> WheelView<'_> {
        WheelView {
            values,
            offset,
            item_height: 40.0,
            visible_count: 5,
            is_dragging: false,
        }
    }

    fn texts(cmds: &[RenderCommand]) -> Vec<(String, f64, f64)> {
        cmds.iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText {
                    text,
                    position,
                    opacity,
                    ..
                } => Some((text.to_string(), position.y, *opacity)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn style_falls_off_with_distance() {
        let centered = item_style(14, 560.0, 40.0);
        assert!(centered.centered);
        assert_eq!(centered.opacity, 1.0);
        assert_eq!(centered.scale, 1.0);
        assert_eq!(centered.font_size(), 24.0);

        let one = item_style(15, 560.0, 40.0);
        assert!(!one.centered);
        assert!((one.opacity - 0.65).abs() < 1e-12);
        assert!((one.scale - 0.85).abs() < 1e-12);
        assert!((one.font_size() - 18.0 * 0.85).abs() < 1e-12);

        let far = item_style(20, 560.0, 40.0);
        assert_eq!(far.opacity, 0.3);
        assert_eq!(far.scale, 0.7);
    }

    #[test]
    fn mid_drag_centers_the_rounded_item() {
        let a = item_style(12, 475.0, 40.0);
        let b = item_style(11, 475.0, 40.0);
        assert!(a.centered);
        assert!(!b.centered);
        assert!((a.distance - 0.125).abs() < 1e-12);
    }

    #[test]
    fn settled_value_sits_in_band() {
        let values = days();
        let v = view(&values, 560.0);
        assert_eq!(v.band_top(), 80.0);
        assert_eq!(v.item_top(14), 80.0);
        let cmds = render_wheel(&v, &Viewport::new(90.0, 200.0), "day");
        let centered: Vec<_> = texts(&cmds)
            .into_iter()
            .filter(|(_, _, opacity)| *opacity == 1.0)
            .collect();
        assert_eq!(centered, vec![("15".to_string(), 100.0, 1.0)]);
    }

    #[test]
    fn culls_items_outside_window() {
        let values = days();
        let cmds = render_wheel(&view(&values, 560.0), &Viewport::new(90.0, 200.0), "day");
        let labels: Vec<_> = texts(&cmds).into_iter().map(|(t, _, _)| t).collect();
        assert_eq!(labels, vec!["13", "14", "15", "16", "17"]);
    }

    #[test]
    fn partially_visible_items_are_kept_mid_drag() {
        let values = days();
        let v = view(&values, 575.0);
        assert_eq!(v.visible_range(), 12..18);
    }

    #[test]
    fn first_item_leaves_padding_above() {
        let values = days();
        let v = view(&values, 0.0);
        assert_eq!(v.visible_range(), 0..3);
        assert_eq!(v.item_top(0), 80.0);
    }

    #[test]
    fn wheel_is_wrapped_in_group_and_clip() {
        let values = days();
        let cmds = render_wheel(&view(&values, 0.0), &Viewport::new(90.0, 200.0), "day");
        assert!(matches!(cmds.first(), Some(RenderCommand::BeginGroup { .. })));
        assert!(matches!(cmds.get(1), Some(RenderCommand::SetClip { .. })));
        assert!(matches!(cmds.last(), Some(RenderCommand::EndGroup)));
        let fades = cmds
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawFade { .. }))
            .count();
        assert_eq!(fades, 2);
    }
}
