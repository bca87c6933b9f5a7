use wheel_pick_protocol::{
    FontWeight, Point, Rect, RenderCommand, SharedStr, TextAlign, ThemeToken, Viewport,
};

use crate::datetime::{DateTimeForm, Field};
use crate::model::PickerConfig;

use super::wheel::render_wheel;

const MARGIN: f64 = 16.0;
const TITLE_HEIGHT: f64 = 28.0;
const SUBTITLE_HEIGHT: f64 = 20.0;
const HEADING_HEIGHT: f64 = 24.0;
const LABEL_HEIGHT: f64 = 20.0;
const SECTION_GAP: f64 = 20.0;
const DATE_GAP: f64 = 8.0;
const TIME_GAP: f64 = 16.0;
const SUMMARY_HEIGHT: f64 = 64.0;
const FOCUS_INSET: f64 = 2.0;

/// Where each part of the date/time form sits inside a viewport.
///
/// Hosts use the same layout to hit-test pointer events, so a press lands
/// on the wheel that was drawn under it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormLayout {
    pub title: Point,
    pub subtitle: Point,
    pub date_heading: Point,
    pub time_heading: Point,
    columns: [Rect; 5],
    pub summary: Rect,
    pub height: f64,
}

impl FormLayout {
    pub fn new(width: f64, config: &PickerConfig) -> Self {
        let inner = (width - 2.0 * MARGIN).max(0.0);
        let wheel_h = config.viewport_height();

        let title = Point::new(MARGIN, MARGIN);
        let subtitle = Point::new(MARGIN, MARGIN + TITLE_HEIGHT);
        let mut y = MARGIN + TITLE_HEIGHT + SUBTITLE_HEIGHT + SECTION_GAP;

        let date_heading = Point::new(MARGIN, y);
        y += HEADING_HEIGHT + LABEL_HEIGHT;
        let date_w = ((inner - 2.0 * DATE_GAP) / 3.0).max(0.0);
        let date_top = y;
        y += wheel_h + SECTION_GAP;

        let time_heading = Point::new(MARGIN, y);
        y += HEADING_HEIGHT + LABEL_HEIGHT;
        let time_w = ((inner - TIME_GAP) / 2.0).max(0.0);
        let time_top = y;
        y += wheel_h + SECTION_GAP;

        let date_col =
            |i: f64| Rect::new(MARGIN + i * (date_w + DATE_GAP), date_top, date_w, wheel_h);
        let time_col =
            |i: f64| Rect::new(MARGIN + i * (time_w + TIME_GAP), time_top, time_w, wheel_h);
        let columns = [
            date_col(0.0),
            date_col(1.0),
            date_col(2.0),
            time_col(0.0),
            time_col(1.0),
        ];

        let summary = Rect::new(MARGIN, y, inner, SUMMARY_HEIGHT);
        y += SUMMARY_HEIGHT + MARGIN;

        Self {
            title,
            subtitle,
            date_heading,
            time_heading,
            columns,
            summary,
            height: y,
        }
    }

    /// The wheel window for `field`, in viewport coordinates.
    pub fn column(&self, field: Field) -> Rect {
        self.columns[field.index()]
    }

    /// The wheel under `point`, if any.
    pub fn hit(&self, point: Point) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|&f| self.column(f).contains(point))
    }
}

fn text(
    position: Point,
    text: impl Into<SharedStr>,
    color: ThemeToken,
    font_size: f64,
    weight: FontWeight,
    align: TextAlign,
) -> RenderCommand {
    RenderCommand::DrawText {
        position,
        text: text.into(),
        color,
        font_size,
        weight,
        opacity: 1.0,
        align,
    }
}

/// Render the whole form: headings, five labelled wheels and the summary card.
pub fn render_form(
    form: &DateTimeForm,
    viewport: &Viewport,
    focus: Option<Field>,
) -> Vec<RenderCommand> {
    let strings = form.locale().strings();
    let config = form.picker(Field::Day).config();
    let layout = FormLayout::new(viewport.width, config);

    let mut commands = Vec::new();
    commands.push(RenderCommand::DrawRect {
        rect: viewport.rect(),
        color: ThemeToken::Background,
        border_color: None,
        corner_radius: 0.0,
    });

    commands.push(text(
        layout.title,
        strings.title,
        ThemeToken::TextPrimary,
        20.0,
        FontWeight::Semibold,
        TextAlign::Left,
    ));
    commands.push(text(
        layout.subtitle,
        strings.subtitle,
        ThemeToken::TextSecondary,
        13.0,
        FontWeight::Regular,
        TextAlign::Left,
    ));
    commands.push(text(
        layout.date_heading,
        strings.date_heading,
        ThemeToken::SectionHeading,
        12.0,
        FontWeight::Medium,
        TextAlign::Left,
    ));
    commands.push(text(
        layout.time_heading,
        strings.time_heading,
        ThemeToken::SectionHeading,
        12.0,
        FontWeight::Medium,
        TextAlign::Left,
    ));

    for field in Field::ALL {
        let col = layout.column(field);
        commands.push(text(
            Point::new(col.center().x, col.y - LABEL_HEIGHT / 2.0),
            field.label(form.locale()),
            if focus == Some(field) {
                ThemeToken::FocusRing
            } else {
                ThemeToken::ColumnLabel
            },
            12.0,
            FontWeight::Medium,
            TextAlign::Center,
        ));
        if focus == Some(field) {
            commands.push(RenderCommand::DrawRect {
                rect: Rect::new(
                    col.x - FOCUS_INSET,
                    col.y - FOCUS_INSET,
                    col.w + 2.0 * FOCUS_INSET,
                    col.h + 2.0 * FOCUS_INSET,
                ),
                color: ThemeToken::Background,
                border_color: Some(ThemeToken::FocusRing),
                corner_radius: 8.0,
            });
        }
        commands.push(RenderCommand::PushTransform {
            translate: Point::new(col.x, col.y),
            scale: 1.0,
        });
        let view = form.picker(field).view();
        commands.extend(render_wheel(
            &view,
            &Viewport::new(col.w, col.h),
            field.id(),
        ));
        commands.push(RenderCommand::PopTransform);
    }

    let card = layout.summary;
    commands.push(RenderCommand::DrawRect {
        rect: card,
        color: ThemeToken::SummaryBackground,
        border_color: Some(ThemeToken::Border),
        corner_radius: 8.0,
    });
    commands.push(text(
        Point::new(card.center().x, card.y + 18.0),
        strings.current_selection,
        ThemeToken::TextMuted,
        12.0,
        FontWeight::Regular,
        TextAlign::Center,
    ));
    commands.push(text(
        Point::new(card.center().x, card.y + 42.0),
        form.summary(),
        ThemeToken::SummaryText,
        18.0,
        FontWeight::Semibold,
        TextAlign::Center,
    ));
    commands
}
