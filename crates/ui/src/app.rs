use chrono::{DateTime, NaiveDateTime, Utc};
use eframe::egui;
use tracing::{debug, warn};
use wheel_pick_core::PickerConfig;
use wheel_pick_core::datetime::{DateTimeForm, Field, FormError, Locale};
use wheel_pick_core::engine::HostClock;
use wheel_pick_core::report::{AlertReport, MemStore, NewAlertReport, ReportStore};
use wheel_pick_core::views::{FormLayout, render_form};
use wheel_pick_protocol::{Point, Viewport};

use crate::renderer;
use crate::theme::{self, ThemeMode};

/// The wall-clock "now" the form opens on and resets to.
#[cfg(not(target_arch = "wasm32"))]
fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[cfg(target_arch = "wasm32")]
fn local_now() -> NaiveDateTime {
    let d = js_sys::Date::new_0();
    chrono::NaiveDate::from_ymd_opt(
        d.get_full_year() as i32,
        d.get_month() + 1,
        d.get_date(),
    )
    .and_then(|date| date.and_hms_opt(d.get_hours(), d.get_minutes(), 0))
    .unwrap_or_default()
}

/// Interpret a picked wall-clock time in the host's time zone.
#[cfg(not(target_arch = "wasm32"))]
fn to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    use chrono::TimeZone;
    chrono::Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(target_arch = "wasm32")]
fn to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    use chrono::{Datelike, Timelike};
    let d = js_sys::Date::new_with_year_month_day_hr_min(
        naive.year() as u32,
        naive.month0() as i32,
        naive.day() as i32,
        naive.hour() as i32,
        naive.minute() as i32,
    );
    DateTime::from_timestamp_millis(d.get_time() as i64)
}

/// Pointer state of the form canvas for one frame, taken from its
/// `Response`.
#[derive(Debug, Clone, Copy, Default)]
struct CanvasInput {
    drag_started: bool,
    dragged: bool,
    drag_stopped: bool,
    clicked: bool,
    /// Where the primary button went down.
    press_origin: Option<egui::Pos2>,
    pointer: Option<egui::Pos2>,
    hover: Option<egui::Pos2>,
    scroll: f32,
}

impl CanvasInput {
    fn read(ui: &egui::Ui, response: &egui::Response) -> Self {
        let (press_origin, scroll) =
            ui.input(|i| (i.pointer.press_origin(), i.raw_scroll_delta.y));
        Self {
            drag_started: response.drag_started(),
            dragged: response.dragged(),
            drag_stopped: response.drag_stopped(),
            clicked: response.clicked(),
            press_origin,
            pointer: response.interact_pointer_pos(),
            hover: response.hover_pos(),
            scroll,
        }
    }
}

/// Feed one frame of canvas input to the wheels. `origin` is the canvas'
/// top-left corner in screen space.
fn route_pointer(
    form: &mut DateTimeForm,
    focus: &mut Option<Field>,
    input: &CanvasInput,
    origin: egui::Pos2,
    layout: &FormLayout,
) {
    let to_local =
        |p: egui::Pos2| Point::new(f64::from(p.x - origin.x), f64::from(p.y - origin.y));

    if input.drag_started {
        let grab = input.press_origin.or(input.pointer).map(to_local);
        if let Some((field, p)) = grab.and_then(|p| layout.hit(p).map(|f| (f, p))) {
            *focus = Some(field);
            form.picker_mut(field).begin(p.y);
        }
    } else if input.clicked {
        if let Some(field) = input.pointer.map(to_local).and_then(|p| layout.hit(p)) {
            *focus = Some(field);
        }
    }

    if let Some(field) = form.capture_holder() {
        if input.dragged || input.drag_stopped {
            if let Some(p) = input.pointer.map(to_local) {
                form.picker_mut(field).move_to(p.y);
            }
        }
        if input.drag_stopped {
            let release = form.picker_mut(field).end();
            debug!(%field, ?release, "pointer up");
        }
        return;
    }

    if input.scroll.abs() > 0.0 {
        if let Some(field) = input.hover.map(to_local).and_then(|p| layout.hit(p)) {
            form.picker_mut(field)
                .step_by(if input.scroll > 0.0 { -1 } else { 1 });
        }
    }
}

/// Main application state.
pub struct WheelPickApp {
    form: DateTimeForm,
    /// Fed from egui's input time every frame.
    clock: HostClock,
    store: MemStore,
    focus: Option<Field>,
    theme_mode: ThemeMode,
    status: Option<String>,
    error: Option<String>,
}

impl WheelPickApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Result<Self, FormError> {
        cc.egui_ctx.set_visuals(theme::dark_visuals());
        theme::apply_typography(&cc.egui_ctx);

        let clock = HostClock::new(0.0);
        let form = DateTimeForm::new(
            local_now(),
            Locale::default(),
            PickerConfig::default(),
            clock.clone(),
        )?;
        Ok(Self {
            form,
            clock,
            store: MemStore::new(),
            focus: None,
            theme_mode: ThemeMode::Dark,
            status: None,
            error: None,
        })
    }

    fn confirm(&mut self) {
        let filed = self
            .form
            .confirm()
            .map_err(|e| e.to_string())
            .and_then(|naive| {
                to_utc(naive)
                    .ok_or_else(|| format!("{naive} does not exist in the local time zone"))
            })
            .map(|utc| self.store.create(NewAlertReport::new(utc)));
        match filed {
            Ok(report) => {
                let strings = self.form.locale().strings();
                self.status = Some(format!("{}: {}", strings.confirmed, self.form.summary()));
                self.error = None;
                debug!(id = %report.id, "report filed");
            }
            Err(err) => {
                warn!(error = %err, "confirm failed");
                self.error = Some(err);
            }
        }
    }

    fn reset(&mut self) {
        match self.form.reset(local_now()) {
            Ok(()) => {
                self.status = None;
                self.error = None;
            }
            Err(err) => self.error = Some(err.to_string()),
        }
    }

    fn reports_panel(&self, ui: &mut egui::Ui) {
        ui.label(egui::RichText::new("Reports").size(theme::FONT_EMPHASIS));
        ui.separator();
        let reports: Vec<AlertReport> = self.store.list();
        if reports.is_empty() {
            ui.weak("None yet");
            return;
        }
        egui::ScrollArea::vertical().show(ui, |ui| {
            for report in reports.iter().rev() {
                ui.monospace(report.event_date.format("%Y-%m-%d %H:%M UTC").to_string());
                ui.small(report.id.to_string());
                ui.add_space(4.0);
            }
        });
    }
}

impl eframe::App for WheelPickApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.clock.set(ctx.input(|i| i.time) * 1000.0);
        let strings = self.form.locale().strings();

        // Top toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("wheel.pick");
                ui.separator();

                if ui.button(strings.confirm).clicked() {
                    self.confirm();
                }
                if ui.button(strings.reset).clicked() {
                    self.reset();
                }

                ui.separator();

                let theme_label = match self.theme_mode {
                    ThemeMode::Dark => "Dark",
                    ThemeMode::Light => "Light",
                };
                if ui.button(theme_label).clicked() {
                    self.theme_mode = match self.theme_mode {
                        ThemeMode::Dark => {
                            ctx.set_visuals(theme::light_visuals());
                            ThemeMode::Light
                        }
                        ThemeMode::Light => {
                            ctx.set_visuals(theme::dark_visuals());
                            ThemeMode::Dark
                        }
                    };
                }
            });
        });

        // Status bar
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(err) = &self.error {
                    ui.colored_label(egui::Color32::RED, err);
                } else if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.label(format!("{}: {}", strings.current_selection, self.form.summary()));
                }
            });
        });

        egui::SidePanel::right("reports")
            .default_width(220.0)
            .show(ctx, |ui| self.reports_panel(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_rect_before_wrap();
            let layout = FormLayout::new(
                f64::from(available.width()),
                self.form.picker(Field::Day).config(),
            );
            let response = ui.allocate_rect(available, egui::Sense::click_and_drag());
            let input = CanvasInput::read(ui, &response);
            route_pointer(&mut self.form, &mut self.focus, &input, available.min, &layout);

            let viewport = Viewport::new(
                f64::from(available.width()),
                f64::from(available.height()).max(layout.height),
            );
            let cmds = render_form(&self.form, &viewport, self.focus);
            let mut painter = ui.painter_at(available);
            renderer::render_commands(&mut painter, &cmds, available.min, self.theme_mode);
        });

        let action = ctx.input(|i| {
            if i.key_pressed(egui::Key::Enter) {
                return Some(Action::Confirm);
            }
            let field = self.focus?;
            if i.key_pressed(egui::Key::ArrowUp) {
                Some(Action::Step(field, -1))
            } else if i.key_pressed(egui::Key::ArrowDown) {
                Some(Action::Step(field, 1))
            } else if i.key_pressed(egui::Key::ArrowLeft) {
                Some(Action::Focus(field.prev()))
            } else if i.key_pressed(egui::Key::ArrowRight) {
                Some(Action::Focus(field.next()))
            } else {
                None
            }
        });
        match action {
            Some(Action::Confirm) => self.confirm(),
            Some(Action::Step(field, delta)) => {
                self.form.picker_mut(field).step_by(delta);
            }
            Some(Action::Focus(field)) => self.focus = Some(field),
            None => {}
        }

        // One momentum tick per displayed frame.
        if self.form.tick_all() || self.form.is_animating() {
            ctx.request_repaint();
        }
    }
}

enum Action {
    Confirm,
    Step(Field, i64),
    Focus(Field),
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn open_form(clock: &HostClock) -> DateTimeForm {
        let now = NaiveDate::from_ymd_opt(2026, 3, 15)
            .and_then(|d| d.and_hms_opt(9, 5, 0))
            .unwrap_or_default();
        let Ok(form) = DateTimeForm::new(now, Locale::Es, PickerConfig::default(), clock.clone())
        else {
            unreachable!("form opens on a valid date");
        };
        form
    }

    fn screen(layout: &FormLayout, field: Field, origin: egui::Pos2, dy: f32) -> egui::Pos2 {
        let col = layout.column(field);
        egui::pos2(
            origin.x + (col.x + col.w / 2.0) as f32,
            origin.y + (col.y + col.h / 2.0) as f32 + dy,
        )
    }

    #[test]
    fn canvas_drag_moves_the_grabbed_wheel() {
        let clock = HostClock::new(0.0);
        let mut form = open_form(&clock);
        let layout = FormLayout::new(600.0, form.picker(Field::Day).config());
        let origin = egui::pos2(10.0, 30.0);
        let mut focus = None;
        let press = screen(&layout, Field::Day, origin, 0.0);

        let start = CanvasInput {
            drag_started: true,
            dragged: true,
            press_origin: Some(press),
            pointer: Some(press),
            ..CanvasInput::default()
        };
        route_pointer(&mut form, &mut focus, &start, origin, &layout);
        assert_eq!(focus, Some(Field::Day));
        assert_eq!(form.capture_holder(), Some(Field::Day));

        // Leaving the column keeps driving the same wheel.
        clock.advance(400.0);
        let far = egui::pos2(press.x + 300.0, press.y + 80.0);
        let drag = CanvasInput {
            dragged: true,
            pointer: Some(far),
            ..CanvasInput::default()
        };
        route_pointer(&mut form, &mut focus, &drag, origin, &layout);
        assert_eq!(form.picker(Field::Day).offset(), 14.0 * 40.0 - 80.0);

        clock.advance(400.0);
        let stop = CanvasInput {
            drag_stopped: true,
            pointer: Some(far),
            ..CanvasInput::default()
        };
        route_pointer(&mut form, &mut focus, &stop, origin, &layout);
        assert_eq!(form.capture_holder(), None);
        assert_eq!(form.selection().day, 13);
    }

    #[test]
    fn scroll_steps_the_hovered_wheel() {
        let clock = HostClock::new(0.0);
        let mut form = open_form(&clock);
        let layout = FormLayout::new(600.0, form.picker(Field::Day).config());
        let origin = egui::Pos2::ZERO;
        let mut focus = None;
        let scroll = CanvasInput {
            hover: Some(screen(&layout, Field::Hour, origin, 0.0)),
            scroll: -1.0,
            ..CanvasInput::default()
        };
        route_pointer(&mut form, &mut focus, &scroll, origin, &layout);
        assert_eq!(form.selection().hour, 10);
        assert_eq!(focus, None);
    }
}
