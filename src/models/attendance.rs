//! Layout-independent attendance records handed from the extractors to the calculator.

use super::month::MonthLabel;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Marker shown in the punch column of a synthesized absent day.
pub const ABSENT_MARKER: &str = "נעדר";

/// Marker shown in the punch column of an explicit day off.
pub const DAY_OFF_MARKER: &str = "חופש";

/// A normalized punch cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PunchValue {
    Empty,
    Recorded(f64),
    /// The approval marker on its own.
    ApprovedAbsence,
    /// The approval marker followed by a time.
    ApprovedLate(f64),
}

impl PunchValue {
    pub fn hours(&self) -> Option<f64> {
        match self {
            PunchValue::Recorded(h) | PunchValue::ApprovedLate(h) => Some(*h),
            _ => None,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, PunchValue::ApprovedAbsence | PunchValue::ApprovedLate(_))
    }
}

/// The two historically grown workbook layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Layout {
    /// One sheet, scholars as rows, (date, session, kind) triples as columns.
    Wide,
    /// One sheet per scholar, days as rows.
    Legacy,
}

/// One scholar's attendance on one calendar day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub day: u32,
    pub date_label: String,
    /// Session id → hours inside the session window.
    pub sessions: BTreeMap<String, f64>,
    pub punches: String,
    pub late: BTreeMap<String, bool>,
    pub absence_approved: BTreeMap<String, bool>,
    pub lateness_approved: BTreeMap<String, bool>,
    #[serde(default)]
    pub day_off: bool,
    #[serde(default)]
    pub absent: bool,
}

impl DailyRecord {
    pub fn new(day: u32, date_label: String) -> Self {
        Self {
            day,
            date_label,
            ..Default::default()
        }
    }

    /// Placeholder for an active day without any punches.
    pub fn absent(day: u32, date_label: String) -> Self {
        Self {
            day,
            date_label,
            punches: ABSENT_MARKER.to_string(),
            absent: true,
            ..Default::default()
        }
    }

    pub fn day_off(day: u32, date_label: String) -> Self {
        Self {
            day,
            date_label,
            punches: DAY_OFF_MARKER.to_string(),
            day_off: true,
            ..Default::default()
        }
    }

    pub fn hours(&self, session_id: &str) -> f64 {
        self.sessions.get(session_id).copied().unwrap_or(0.0)
    }

    pub fn is_late(&self, session_id: &str) -> bool {
        flag(&self.late, session_id)
    }

    pub fn is_absence_approved(&self, session_id: &str) -> bool {
        flag(&self.absence_approved, session_id)
    }

    pub fn is_lateness_approved(&self, session_id: &str) -> bool {
        flag(&self.lateness_approved, session_id)
    }

    pub fn append_punches(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.punches.is_empty() {
            self.punches.push_str(" | ");
        }
        self.punches.push_str(text);
    }
}

fn flag(map: &BTreeMap<String, bool>, key: &str) -> bool {
    map.get(key).copied().unwrap_or(false)
}

/// Everything one extractor learned about one scholar.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScholarAttendance {
    pub name: String,
    pub days: Vec<DailyRecord>,
    /// Bonus column / bonus-kind header text → summed occurrence value.
    pub bonus_counts: BTreeMap<String, f64>,
}

impl ScholarAttendance {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn day_mut(&mut self, day: u32, label: impl FnOnce() -> String) -> &mut DailyRecord {
        let idx = match self.days.iter().position(|d| d.day == day) {
            Some(i) => i,
            None => {
                self.days.push(DailyRecord::new(day, label()));
                self.days.len() - 1
            }
        };
        &mut self.days[idx]
    }

    pub fn add_bonus(&mut self, key: &str, value: f64) {
        *self.bonus_counts.entry(key.to_string()).or_insert(0.0) += value;
    }
}

/// Output of the layout detector plus whichever extractor ran.
#[derive(Debug, Clone)]
pub struct ParsedWorkbook {
    pub layout: Layout,
    pub month: MonthLabel,
    pub scholars: Vec<ScholarAttendance>,
    /// Days the institution was open; unknown for legacy workbooks.
    pub active_days: Option<BTreeSet<u32>>,
    /// Non-fatal problems (e.g. skipped legacy sheets).
    pub warnings: Vec<String>,
}
