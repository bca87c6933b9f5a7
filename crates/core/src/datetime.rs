//! The date/time entry form: five wheels and the selection they produce.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::engine::{CaptureSlot, Clock, FrameToken, PickerError, WheelPicker};
use crate::model::{PickerConfig, PickerValue, ValueList};

/// Years offered on either side of the year the form was opened in.
pub const YEAR_SPAN: i32 = 5;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("{field} wheel: {source}")]
    Picker {
        field: Field,
        #[source]
        source: PickerError,
    },
    #[error("{0} is not a calendar date")]
    InvalidDate(String),
    #[error("unknown locale {0:?}")]
    UnknownLocale(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Es,
    En,
}

/// User-facing strings for one locale.
#[derive(Debug)]
pub struct Strings {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub date_heading: &'static str,
    pub time_heading: &'static str,
    pub day: &'static str,
    pub month: &'static str,
    pub year: &'static str,
    pub hour: &'static str,
    pub minute: &'static str,
    pub current_selection: &'static str,
    pub confirm: &'static str,
    pub reset: &'static str,
    pub confirmed: &'static str,
}

const ES: Strings = Strings {
    title: "Reporte de Alerta",
    subtitle: "Selecciona la fecha y hora del evento",
    date_heading: "FECHA DEL EVENTO",
    time_heading: "HORA DEL EVENTO",
    day: "Día",
    month: "Mes",
    year: "Año",
    hour: "Hora",
    minute: "Minutos",
    current_selection: "Selección Actual",
    confirm: "Confirmar Fecha y Hora",
    reset: "Restablecer",
    confirmed: "Fecha y Hora Confirmada",
};

const EN: Strings = Strings {
    title: "Alert Report",
    subtitle: "Select the date and time of the event",
    date_heading: "EVENT DATE",
    time_heading: "EVENT TIME",
    day: "Day",
    month: "Month",
    year: "Year",
    hour: "Hour",
    minute: "Minutes",
    current_selection: "Current Selection",
    confirm: "Confirm Date and Time",
    reset: "Reset",
    confirmed: "Date and Time Confirmed",
};

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::Es => &ES,
            Locale::En => &EN,
        }
    }

    /// Three-letter month names, January first.
    pub fn month_names(self) -> [&'static str; 12] {
        match self {
            Locale::Es => [
                "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
            ],
            Locale::En => [
                "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
            ],
        }
    }
}

impl FromStr for Locale {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "es" => Ok(Locale::Es),
            "en" => Ok(Locale::En),
            _ => Err(FormError::UnknownLocale(s.to_string())),
        }
    }
}

/// One wheel of the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Day,
    Month,
    Year,
    Hour,
    Minute,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Day,
        Field::Month,
        Field::Year,
        Field::Hour,
        Field::Minute,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Field> {
        Self::ALL.get(index).copied()
    }

    pub fn id(self) -> &'static str {
        match self {
            Field::Day => "day",
            Field::Month => "month",
            Field::Year => "year",
            Field::Hour => "hour",
            Field::Minute => "minute",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        let s = locale.strings();
        match self {
            Field::Day => s.day,
            Field::Month => s.month,
            Field::Year => s.year,
            Field::Hour => s.hour,
            Field::Minute => s.minute,
        }
    }

    pub fn next(self) -> Field {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Field {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The form's current choice. Month is zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub day: u32,
    pub month0: u32,
    pub year: i32,
    pub hour: u32,
    pub minute: u32,
}

impl Selection {
    pub fn from_datetime(dt: NaiveDateTime) -> Self {
        Self {
            day: dt.day(),
            month0: dt.month0(),
            year: dt.year(),
            hour: dt.hour(),
            minute: dt.minute(),
        }
    }

    /// Build the date, rolling days past the end of the month into the
    /// next one (31 Apr is 1 May).
    pub fn to_datetime(&self) -> Result<NaiveDateTime, FormError> {
        let invalid = || {
            FormError::InvalidDate(format!(
                "{}-{:02}-{:02} {:02}:{:02}",
                self.year,
                self.month0 + 1,
                self.day,
                self.hour,
                self.minute
            ))
        };
        let first = NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1).ok_or_else(invalid)?;
        let date = first
            .checked_add_days(Days::new(u64::from(self.day.saturating_sub(1))))
            .ok_or_else(invalid)?;
        date.and_hms_opt(self.hour, self.minute, 0)
            .ok_or_else(invalid)
    }
}

fn padded(n: u32) -> PickerValue {
    PickerValue::from(format!("{n:02}"))
}

fn parse_padded(value: &PickerValue) -> Option<u32> {
    value.as_text()?.parse().ok()
}

/// Five wheels (day, month, year, hour, minute) feeding one [`Selection`].
///
/// The form owns the selection; each picker reports into it through its
/// change callback, and [`DateTimeForm::reset`] pushes a new selection
/// back out through `set_value` without triggering those callbacks.
pub struct DateTimeForm {
    locale: Locale,
    selection: Rc<RefCell<Selection>>,
    pickers: Vec<WheelPicker>,
    capture: CaptureSlot,
}

impl DateTimeForm {
    /// Open the form on `now`. Every picker reads time from `clock`.
    pub fn new<C>(
        now: NaiveDateTime,
        locale: Locale,
        config: PickerConfig,
        clock: C,
    ) -> Result<Self, FormError>
    where
        C: Clock + Clone + 'static,
    {
        let selection = Rc::new(RefCell::new(Selection::from_datetime(now)));
        let capture = CaptureSlot::new();
        let initial = *selection.borrow();

        let mut pickers = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let (values, value) = Self::wheel_values(field, locale, initial)
                .map_err(|source| FormError::Picker { field, source })?;
            let picker = WheelPicker::new(values.clone(), value, config)
                .map_err(|source| FormError::Picker { field, source })?
                .with_clock(clock.clone())
                .with_capture(capture.handle(field.index()));
            let sink = selection.clone();
            let picker = picker.on_change(move |value| {
                let mut sel = sink.borrow_mut();
                let updated = match field {
                    Field::Day => value
                        .as_int()
                        .and_then(|d| u32::try_from(d).ok())
                        .map(|d| sel.day = d),
                    Field::Month => values
                        .position(value)
                        .and_then(|m| u32::try_from(m).ok())
                        .map(|m| sel.month0 = m),
                    Field::Year => value
                        .as_int()
                        .and_then(|y| i32::try_from(y).ok())
                        .map(|y| sel.year = y),
                    Field::Hour => parse_padded(value).map(|h| sel.hour = h),
                    Field::Minute => parse_padded(value).map(|m| sel.minute = m),
                };
                if updated.is_some() {
                    debug!(%field, %value, "selection updated");
                }
            });
            pickers.push(picker);
        }

        Ok(Self {
            locale,
            selection,
            pickers,
            capture,
        })
    }

    fn wheel_values(
        field: Field,
        locale: Locale,
        sel: Selection,
    ) -> Result<(ValueList, PickerValue), PickerError> {
        let pair = match field {
            Field::Day => (
                ValueList::new(1..=31i64)?,
                PickerValue::from(sel.day),
            ),
            Field::Month => {
                let names = locale.month_names();
                let name = names.get(sel.month0 as usize).copied().unwrap_or(names[0]);
                (ValueList::new(names)?, PickerValue::from(name))
            }
            Field::Year => (
                ValueList::new((sel.year - YEAR_SPAN)..=(sel.year + YEAR_SPAN))?,
                PickerValue::from(sel.year),
            ),
            Field::Hour => (ValueList::new((0..24u32).map(padded))?, padded(sel.hour)),
            Field::Minute => (ValueList::new((0..60u32).map(padded))?, padded(sel.minute)),
        };
        Ok(pair)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn selection(&self) -> Selection {
        *self.selection.borrow()
    }

    pub fn picker(&self, field: Field) -> &WheelPicker {
        &self.pickers[field.index()]
    }

    pub fn picker_mut(&mut self, field: Field) -> &mut WheelPicker {
        &mut self.pickers[field.index()]
    }

    /// The wheel currently holding the pointer, if a drag is open.
    pub fn capture_holder(&self) -> Option<Field> {
        self.capture.holder().and_then(Field::from_index)
    }

    /// `"15 Ene 2026"`.
    pub fn formatted_date(&self) -> String {
        let sel = self.selection();
        let names = self.locale.month_names();
        let month = names.get(sel.month0 as usize).copied().unwrap_or("?");
        format!("{} {} {}", sel.day, month, sel.year)
    }

    /// `"09:05"`.
    pub fn formatted_time(&self) -> String {
        let sel = self.selection();
        format!("{:02}:{:02}", sel.hour, sel.minute)
    }

    pub fn summary(&self) -> String {
        format!("{} - {}", self.formatted_date(), self.formatted_time())
    }

    /// The selected moment.
    pub fn confirm(&self) -> Result<NaiveDateTime, FormError> {
        let dt = self.selection().to_datetime()?;
        debug!(%dt, "form confirmed");
        Ok(dt)
    }

    /// Move every wheel to `now` without firing change callbacks.
    ///
    /// Fails if `now` falls outside the year wheel's range. Every value is
    /// looked up before any wheel moves, so a failed reset changes nothing.
    pub fn reset(&mut self, now: NaiveDateTime) -> Result<(), FormError> {
        let sel = Selection::from_datetime(now);
        let names = self.locale.month_names();
        let targets = Field::ALL.map(|field| match field {
            Field::Day => PickerValue::from(sel.day),
            Field::Month => {
                PickerValue::from(names.get(sel.month0 as usize).copied().unwrap_or(names[0]))
            }
            Field::Year => PickerValue::from(sel.year),
            Field::Hour => padded(sel.hour),
            Field::Minute => padded(sel.minute),
        });
        for (field, value) in Field::ALL.iter().zip(&targets) {
            if self.pickers[field.index()].values().position(value).is_none() {
                return Err(FormError::Picker {
                    field: *field,
                    source: PickerError::ValueNotFound(value.clone()),
                });
            }
        }
        for (field, value) in Field::ALL.into_iter().zip(targets) {
            self.pickers[field.index()]
                .set_value(value)
                .map_err(|source| FormError::Picker { field, source })?;
        }
        *self.selection.borrow_mut() = sel;
        debug!(summary = %self.summary(), "form reset");
        Ok(())
    }

    /// Wheels with a momentum tick waiting for the next refresh.
    pub fn pending_frames(&self) -> Vec<(Field, FrameToken)> {
        Field::ALL
            .iter()
            .filter_map(|&f| self.pickers[f.index()].pending_frame().map(|t| (f, t)))
            .collect()
    }

    /// Deliver one refresh to every coasting wheel. Returns whether any
    /// wheel still needs another.
    pub fn tick_all(&mut self) -> bool {
        for (field, token) in self.pending_frames() {
            self.pickers[field.index()].on_frame(token);
        }
        self.pickers.iter().any(|p| p.pending_frame().is_some())
    }

    /// Whether any wheel is being dragged or is coasting.
    pub fn is_animating(&self) -> bool {
        self.pickers.iter().any(|p| !p.is_settled())
    }

    /// Cancel every drag and momentum run.
    pub fn teardown(&mut self) {
        for picker in &mut self.pickers {
            picker.teardown();
        }
    }
}

impl fmt::Debug for DateTimeForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateTimeForm")
            .field("locale", &self.locale)
            .field("selection", &self.selection())
            .field("capture", &self.capture_holder())
            .finish_non_exhaustive()
    }
}
