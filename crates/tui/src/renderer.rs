use std::io::{Stdout, stdout};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{Local, TimeZone, Utc};
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders},
};
use tracing::{debug, warn};
use wheel_pick_core::datetime::{DateTimeForm, Field};
use wheel_pick_core::report::{MemStore, NewAlertReport, ReportStore};
use wheel_pick_core::views::{FormLayout, render_form};
use wheel_pick_protocol::{
    FadeEdge, FontWeight, Point, RenderCommand, TextAlign, ThemeToken, Viewport,
};

/// Viewport units per terminal column.
const COL_PX: f64 = 8.0;
/// Viewport units per terminal row. Two rows per 40px item.
const ROW_PX: f64 = 20.0;
const FRAME: Duration = Duration::from_millis(16);
const IDLE_POLL: Duration = Duration::from_millis(250);

fn theme_to_color(token: &ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::Surface => Color::Rgb(18, 18, 24),
        ThemeToken::Border => Color::DarkGray,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextSecondary => Color::Gray,
        ThemeToken::TextMuted => Color::DarkGray,
        ThemeToken::WheelItemText => Color::Gray,
        ThemeToken::WheelItemSelected => Color::White,
        ThemeToken::SelectionBand => Color::Rgb(40, 48, 72),
        ThemeToken::SelectionBorder => Color::Rgb(90, 110, 170),
        ThemeToken::FadeOverlay => Color::Black,
        ThemeToken::SectionHeading => Color::LightBlue,
        ThemeToken::ColumnLabel => Color::Gray,
        ThemeToken::SummaryBackground => Color::Rgb(24, 30, 44),
        ThemeToken::SummaryText => Color::LightGreen,
        ThemeToken::FocusRing => Color::Yellow,
    }
}

#[derive(Debug, Clone, Copy)]
struct Transform {
    dx: f64,
    dy: f64,
    scale: f64,
}

impl Transform {
    const IDENTITY: Transform = Transform {
        dx: 0.0,
        dy: 0.0,
        scale: 1.0,
    };

    fn apply(&self, p: Point) -> Point {
        Point::new(self.dx + p.x * self.scale, self.dy + p.y * self.scale)
    }

    fn apply_rect(&self, r: &wheel_pick_protocol::Rect) -> wheel_pick_protocol::Rect {
        let origin = self.apply(Point::new(r.x, r.y));
        wheel_pick_protocol::Rect::new(origin.x, origin.y, r.w * self.scale, r.h * self.scale)
    }
}

/// Cell span `[start, end)` covered by viewport units `[a, b)`.
fn cells(a: f64, b: f64, unit: f64) -> (i32, i32) {
    ((a / unit).round() as i32, (b / unit).round() as i32)
}

/// Paints render commands into `buf` inside `area`.
///
/// Commands are in viewport units; one column is [`COL_PX`] wide and one
/// row [`ROW_PX`] tall.
struct Painter<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    transforms: Vec<Transform>,
    clip: Option<(i32, i32, i32, i32)>,
}

impl<'a> Painter<'a> {
    fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self {
            buf,
            area,
            transforms: vec![Transform::IDENTITY],
            clip: None,
        }
    }

    fn transform(&self) -> Transform {
        self.transforms
            .last()
            .copied()
            .unwrap_or(Transform::IDENTITY)
    }

    fn visible(&self, col: i32, row: i32) -> bool {
        if col < 0
            || row < 0
            || col >= i32::from(self.area.width)
            || row >= i32::from(self.area.height)
        {
            return false;
        }
        match self.clip {
            Some((c0, r0, c1, r1)) => col >= c0 && col < c1 && row >= r0 && row < r1,
            None => true,
        }
    }

    fn cell(&mut self, col: i32, row: i32) -> Option<&mut ratatui::buffer::Cell> {
        if !self.visible(col, row) {
            return None;
        }
        let x = self.area.x + col as u16;
        let y = self.area.y + row as u16;
        self.buf.cell_mut((x, y))
    }

    fn paint(&mut self, cmds: &[RenderCommand]) {
        for cmd in cmds {
            match cmd {
                RenderCommand::DrawRect {
                    rect,
                    color,
                    border_color,
                    ..
                } => {
                    let r = self.transform().apply_rect(rect);
                    let (c0, c1) = cells(r.x, r.x + r.w, COL_PX);
                    let (r0, r1) = cells(r.y, r.bottom(), ROW_PX);
                    let bg = theme_to_color(color);
                    let border = border_color.as_ref().map(theme_to_color);
                    for row in r0..r1 {
                        for col in c0..c1 {
                            let edge = row == r0 || row == r1 - 1 || col == c0 || col == c1 - 1;
                            let Some(cell) = self.cell(col, row) else {
                                continue;
                            };
                            cell.set_char(' ').set_bg(bg);
                            if let (true, Some(fg)) = (edge, border) {
                                let side = col == c0 || col == c1 - 1;
                                let cap = row == r0 || row == r1 - 1;
                                let ch = match (side, cap) {
                                    (true, true) => '+',
                                    (true, false) => '│',
                                    _ => '─',
                                };
                                cell.set_char(ch).set_fg(fg);
                            }
                        }
                    }
                }
                RenderCommand::DrawText {
                    position,
                    text,
                    color,
                    weight,
                    opacity,
                    align,
                    ..
                } => {
                    let p = self.transform().apply(*position);
                    let len = text.chars().count() as i32;
                    let anchor = (p.x / COL_PX).round() as i32;
                    let start = match align {
                        TextAlign::Left => anchor,
                        TextAlign::Center => anchor - len / 2,
                        TextAlign::Right => anchor - len,
                    };
                    let row = (p.y / ROW_PX).floor() as i32;
                    let mut style = Style::default().fg(theme_to_color(color));
                    if !matches!(weight, FontWeight::Regular) {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    if *opacity < 0.5 {
                        style = style.add_modifier(Modifier::DIM);
                    }
                    for (i, ch) in text.chars().enumerate() {
                        if let Some(cell) = self.cell(start + i as i32, row) {
                            cell.set_char(ch).set_style(style);
                        }
                    }
                }
                RenderCommand::DrawFade { rect, edge, .. } => {
                    let r = self.transform().apply_rect(rect);
                    let (c0, c1) = cells(r.x, r.x + r.w, COL_PX);
                    let (r0, r1) = cells(r.y, r.bottom(), ROW_PX);
                    // Only the outermost row fades; terminals have no alpha.
                    let row = match edge {
                        FadeEdge::Top => r0,
                        FadeEdge::Bottom => r1 - 1,
                    };
                    for col in c0..c1 {
                        if let Some(cell) = self.cell(col, row) {
                            cell.set_style(Style::default().add_modifier(Modifier::DIM));
                        }
                    }
                }
                RenderCommand::SetClip { rect } => {
                    let r = self.transform().apply_rect(rect);
                    let (c0, c1) = cells(r.x, r.x + r.w, COL_PX);
                    let (r0, r1) = cells(r.y, r.bottom(), ROW_PX);
                    self.clip = Some((c0, r0, c1, r1));
                }
                RenderCommand::ClearClip => self.clip = None,
                RenderCommand::PushTransform { translate, scale } => {
                    let t = self.transform();
                    let origin = t.apply(*translate);
                    self.transforms.push(Transform {
                        dx: origin.x,
                        dy: origin.y,
                        scale: t.scale * scale,
                    });
                }
                RenderCommand::PopTransform => {
                    if self.transforms.len() > 1 {
                        self.transforms.pop();
                    }
                }
                RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
            }
        }
    }
}

/// Map a terminal cell to the viewport point at its center.
/// Cancel the drag in progress, if any, settling its wheel without momentum.
fn release_drag(form: &mut DateTimeForm) -> Option<Field> {
    let field = form.capture_holder()?;
    form.picker_mut(field).cancel();
    Some(field)
}

fn cell_to_point(content: Rect, column: u16, row: u16) -> Option<Point> {
    if column < content.x
        || row < content.y
        || column >= content.x + content.width
        || row >= content.y + content.height
    {
        return None;
    }
    Some(Point::new(
        f64::from(column - content.x) * COL_PX + COL_PX / 2.0,
        f64::from(row - content.y) * ROW_PX + ROW_PX / 2.0,
    ))
}

/// Interaction state the form doesn't own.
struct Session {
    focus: Field,
    status: String,
    last_tick: Instant,
}

pub fn run(form: &mut DateTimeForm, store: &mut MemStore) -> Result<()> {
    enable_raw_mode()?;
    let mut out = stdout();
    execute!(
        out,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(out);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, form, store);

    form.teardown();
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    form: &mut DateTimeForm,
    store: &mut MemStore,
) -> Result<()> {
    let strings = form.locale().strings();
    let mut session = Session {
        focus: Field::Day,
        status: String::new(),
        last_tick: Instant::now(),
    };

    loop {
        let size = terminal.size()?;
        let content = Rect::new(0, 1, size.width, size.height.saturating_sub(2));
        let viewport = Viewport::new(
            f64::from(content.width) * COL_PX,
            f64::from(content.height) * ROW_PX,
        );
        let layout = FormLayout::new(viewport.width, form.picker(Field::Day).config());
        let cmds = render_form(form, &viewport, Some(session.focus));

        terminal.draw(|frame| {
            let area = frame.area();

            let header_area = Rect::new(0, 0, area.width, 1);
            let header = Block::default()
                .title(format!(
                    " wheel.pick | {} | drag or ↑↓ to pick | ←→ column | Enter {} | r {} | q quit ",
                    strings.title, strings.confirm, strings.reset
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, header_area);

            let block = Block::default()
                .borders(Borders::NONE)
                .style(Style::default().bg(Color::Black));
            frame.render_widget(block, content);
            Painter::new(frame.buffer_mut(), content).paint(&cmds);

            let footer_area = Rect::new(0, area.height.saturating_sub(1), area.width, 1);
            let footer = Block::default()
                .title(format!(" {} reports | {} ", store.len(), session.status))
                .style(Style::default().fg(Color::Gray).bg(Color::Black));
            frame.render_widget(footer, footer_area);
        })?;

        let timeout = if form.is_animating() {
            FRAME.saturating_sub(session.last_tick.elapsed())
        } else {
            IDLE_POLL
        };
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Left | KeyCode::BackTab => session.focus = session.focus.prev(),
                    KeyCode::Right | KeyCode::Tab => session.focus = session.focus.next(),
                    KeyCode::Up => {
                        form.picker_mut(session.focus).step_by(-1);
                    }
                    KeyCode::Down => {
                        form.picker_mut(session.focus).step_by(1);
                    }
                    KeyCode::Enter => {
                        session.status = confirm(form, store);
                    }
                    KeyCode::Char('r') => match form.reset(Local::now().naive_local()) {
                        Ok(()) => session.status = form.summary(),
                        Err(err) => {
                            warn!(error = %err, "reset failed");
                            session.status = err.to_string();
                        }
                    },
                    _ => {}
                },
                Event::Mouse(mouse) => {
                    let point = cell_to_point(content, mouse.column, mouse.row);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            if let Some(field) = point.and_then(|p| layout.hit(p)) {
                                session.focus = field;
                                if let Some(p) = point {
                                    form.picker_mut(field).begin(p.y);
                                }
                            }
                        }
                        // Captured drags keep following the pointer outside
                        // their column, so use the raw row.
                        MouseEventKind::Drag(MouseButton::Left) => {
                            if let Some(field) = form.capture_holder() {
                                let y = (f64::from(mouse.row) - f64::from(content.y)) * ROW_PX
                                    + ROW_PX / 2.0;
                                form.picker_mut(field).move_to(y);
                            }
                        }
                        MouseEventKind::Up(MouseButton::Left) => {
                            if let Some(field) = form.capture_holder() {
                                let release = form.picker_mut(field).end();
                                debug!(%field, ?release, "pointer up");
                            }
                        }
                        MouseEventKind::ScrollDown => {
                            if let Some(field) = point.and_then(|p| layout.hit(p)) {
                                form.picker_mut(field).step_by(1);
                            }
                        }
                        MouseEventKind::ScrollUp => {
                            if let Some(field) = point.and_then(|p| layout.hit(p)) {
                                form.picker_mut(field).step_by(-1);
                            }
                        }
                        _ => {}
                    }
                }
                Event::FocusLost => {
                    if let Some(field) = release_drag(form) {
                        debug!(%field, "drag cancelled on focus loss");
                    }
                }
                _ => {}
            }
        }

        if session.last_tick.elapsed() >= FRAME {
            form.tick_all();
            session.last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Confirm the form and file a report. Returns the status line.
fn confirm(form: &DateTimeForm, store: &mut MemStore) -> String {
    let strings = form.locale().strings();
    let naive = match form.confirm() {
        Ok(dt) => dt,
        Err(err) => {
            warn!(error = %err, "confirm failed");
            return err.to_string();
        }
    };
    let Some(local) = Local.from_local_datetime(&naive).earliest() else {
        warn!(%naive, "confirmed time does not exist locally");
        return format!("{naive} does not exist in the local time zone");
    };
    let report = store.create(NewAlertReport::new(local.with_timezone(&Utc)));
    format!("{}: {} ({})", strings.confirmed, form.summary(), report.id)
}

#[cfg(test)]
mod tests {
    use wheel_pick_protocol::{Rect as VRect, SharedStr};

    use super::*;

    #[test]
    fn focus_loss_cancels_the_drag() {
        use chrono::NaiveDate;
        use wheel_pick_core::PickerConfig;
        use wheel_pick_core::datetime::Locale;
        use wheel_pick_core::engine::HostClock;

        let now = NaiveDate::from_ymd_opt(2026, 3, 15)
            .and_then(|d| d.and_hms_opt(9, 5, 0))
            .unwrap_or_default();
        let clock = HostClock::new(0.0);
        let Ok(mut form) =
            DateTimeForm::new(now, Locale::Es, PickerConfig::default(), clock.clone())
        else {
            unreachable!("form opens on a valid date");
        };
        assert_eq!(release_drag(&mut form), None);

        form.picker_mut(Field::Minute).begin(200.0);
        clock.advance(16.0);
        form.picker_mut(Field::Minute).move_to(150.0);
        assert_eq!(release_drag(&mut form), Some(Field::Minute));
        assert_eq!(form.capture_holder(), None);
        let minute = form.picker(Field::Minute);
        assert!(minute.is_settled());
        assert_eq!(minute.pending_frame(), None);
    }

    fn symbols(buf: &Buffer, row: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, row)].symbol().to_string())
            .collect()
    }

    #[test]
    fn text_is_centered_on_its_anchor() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        Painter::new(&mut buf, area).paint(&[RenderCommand::DrawText {
            position: Point::new(80.0, 30.0),
            text: SharedStr::from("15"),
            color: ThemeToken::WheelItemSelected,
            font_size: 24.0,
            weight: FontWeight::Semibold,
            opacity: 1.0,
            align: TextAlign::Center,
        }]);
        assert_eq!(&symbols(&buf, 1)[9..11], "15");
        assert!(buf[(9, 1)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn transform_and_clip_apply_to_text() {
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        Painter::new(&mut buf, area).paint(&[
            RenderCommand::PushTransform {
                translate: Point::new(40.0, 20.0),
                scale: 1.0,
            },
            RenderCommand::SetClip {
                rect: VRect::new(0.0, 0.0, 16.0, 20.0),
            },
            RenderCommand::DrawText {
                position: Point::new(0.0, 0.0),
                text: SharedStr::from("abcd"),
                color: ThemeToken::TextPrimary,
                font_size: 12.0,
                weight: FontWeight::Regular,
                opacity: 0.3,
                align: TextAlign::Left,
            },
            RenderCommand::ClearClip,
            RenderCommand::PopTransform,
        ]);
        assert_eq!(&symbols(&buf, 1)[5..9], "ab  ");
        assert!(buf[(5, 1)].modifier.contains(Modifier::DIM));
    }

    #[test]
    fn pointer_maps_to_cell_centers() {
        let content = Rect::new(0, 1, 10, 10);
        assert_eq!(cell_to_point(content, 0, 0), None);
        assert_eq!(cell_to_point(content, 2, 3), Some(Point::new(20.0, 50.0)));
    }
}
