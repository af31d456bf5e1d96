//! Cell value normalizers: clock strings, packed `HHMM` numbers, Excel serial dates
//! and the approval marker.

use super::tokens::strip_approved;
use crate::models::attendance::PunchValue;
use crate::models::cell::Cell;
use chrono::{Datelike, Duration, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Serial numbers in this range are read as dates (roughly 1954..2119).
pub const EXCEL_SERIAL_MIN: f64 = 20000.0;
pub const EXCEL_SERIAL_MAX: f64 = 80000.0;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").expect("clock pattern"));

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^\d])(\d{1,2})[/.](\d{1,2})(?:[/.](\d{2,4}))?(?:$|[^\d])")
        .expect("date pattern")
});

/// `H:MM` / `HH:MM[:SS]` → decimal hours.
pub fn parse_clock(text: &str) -> Option<f64> {
    let caps = CLOCK_RE.captures(text.trim())?;
    let h: u32 = caps.get(1)?.as_str().parse().ok()?;
    let m: u32 = caps.get(2)?.as_str().parse().ok()?;
    let s: u32 = caps
        .get(3)
        .and_then(|x| x.as_str().parse().ok())
        .unwrap_or(0);

    if h > 24 || m > 59 || s > 59 || (h == 24 && (m > 0 || s > 0)) {
        return None;
    }
    Some(h as f64 + m as f64 / 60.0 + s as f64 / 3600.0)
}

/// Packed three/four digit `HHMM` value (930 → 9.5).
pub fn packed_time(n: f64) -> Option<f64> {
    if n.fract() != 0.0 || !(100.0..=2359.0).contains(&n) {
        return None;
    }
    let v = n as u32;
    let (h, m) = (v / 100, v % 100);
    if m > 59 {
        return None;
    }
    Some(h as f64 + m as f64 / 60.0)
}

/// Any time representation the multi-scholar export uses.
pub fn cell_time(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(n) if (0.0..1.0).contains(n) => Some(n * 24.0),
        Cell::Number(n) => packed_time(*n),
        Cell::Text(s) => text_time(s),
        Cell::Empty => None,
    }
}

fn text_time(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Some(h) = parse_clock(s) {
        return Some(h);
    }
    if (3..=4).contains(&s.len()) && s.chars().all(|c| c.is_ascii_digit()) {
        return s.parse::<f64>().ok().and_then(packed_time);
    }
    None
}

/// Approval-aware punch normalization for the multi-scholar layout.
pub fn punch_value(cell: &Cell) -> PunchValue {
    if let Cell::Text(s) = cell
        && let Some(rest) = strip_approved(s)
    {
        return match text_time(rest) {
            Some(h) => PunchValue::ApprovedLate(h),
            None => PunchValue::ApprovedAbsence,
        };
    }

    match cell_time(cell) {
        Some(h) => PunchValue::Recorded(h),
        None => PunchValue::Empty,
    }
}

/// Colon-delimited strings only, as written by the per-scholar export.
pub fn legacy_time(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Text(s) => parse_clock(s),
        _ => None,
    }
}

pub fn is_excel_serial(n: f64) -> bool {
    (EXCEL_SERIAL_MIN..=EXCEL_SERIAL_MAX).contains(&n)
}

pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !is_excel_serial(serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.floor() as i64))
}

/// Day, month and year recognisable in a cell. Month/year are absent for a bare
/// day-of-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateParts {
    pub day: u32,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

pub fn date_parts(cell: &Cell) -> Option<DateParts> {
    match cell {
        Cell::Number(n) if is_excel_serial(*n) => {
            let d = excel_serial_to_date(*n)?;
            Some(DateParts {
                day: d.day(),
                month: Some(d.month()),
                year: Some(d.year()),
            })
        }
        Cell::Number(n) => bare_day(*n),
        Cell::Text(s) => {
            let s = s.trim();
            if let Ok(n) = s.parse::<f64>() {
                return bare_day(n);
            }
            text_date(s)
        }
        Cell::Empty => None,
    }
}

fn bare_day(n: f64) -> Option<DateParts> {
    if n.fract() == 0.0 && (1.0..=31.0).contains(&n) {
        Some(DateParts {
            day: n as u32,
            month: None,
            year: None,
        })
    } else {
        None
    }
}

fn text_date(s: &str) -> Option<DateParts> {
    let caps = DATE_RE.captures(s)?;
    let day: u32 = caps.get(1)?.as_str().parse().ok()?;
    let month: u32 = caps.get(2)?.as_str().parse().ok()?;
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return None;
    }
    let year = caps
        .get(3)
        .and_then(|y| y.as_str().parse::<i32>().ok())
        .map(|y| if y < 100 { 2000 + y } else { y });

    Some(DateParts {
        day,
        month: Some(month),
        year,
    })
}

pub fn day_of_month(cell: &Cell) -> Option<u32> {
    date_parts(cell).map(|p| p.day)
}
