//! Per-session overlap rule shared by both extractors.

use super::tokens::{HeaderField, rule};
use crate::core::calculator::EPSILON;
use crate::models::attendance::{DailyRecord, PunchValue};
use crate::settings::Session;
use crate::utils::time::format_hours;

/// What one entry/exit pair means for one configured session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionPunch {
    /// Overlap of [entry, exit] with the session window, never negative.
    pub hours: f64,
    pub late: bool,
    pub absence_approved: bool,
    pub lateness_approved: bool,
}

/// `None` when both cells are empty.
///
/// A marker on either cell excuses the lateness of a late entry. The absence is
/// approved only when a cell is the bare marker or the marked times do not
/// overlap the window; the calculator then credits the full session duration.
/// A marked pair that does overlap keeps its real hours. Lateness is measured
/// against the session start plus its grace period.
pub fn evaluate(entry: PunchValue, exit: PunchValue, session: &Session) -> Option<SessionPunch> {
    if entry == PunchValue::Empty && exit == PunchValue::Empty {
        return None;
    }

    let start = session.start_hours();
    let end = session.end_hours();

    let hours = match (entry.hours(), exit.hours()) {
        (Some(a), Some(b)) => (b.min(end) - a.max(start)).max(0.0),
        _ => 0.0,
    };

    let grace = session.lateness_grace_minutes as f64 / 60.0;
    let late = entry
        .hours()
        .map(|a| a > start + grace + EPSILON)
        .unwrap_or(false);

    let marked = entry.is_approved() || exit.is_approved();
    let bare_marker = entry == PunchValue::ApprovedAbsence || exit == PunchValue::ApprovedAbsence;

    Some(SessionPunch {
        hours,
        late,
        absence_approved: bare_marker || (marked && hours <= EPSILON),
        lateness_approved: marked && late,
    })
}

impl SessionPunch {
    pub fn apply(&self, record: &mut DailyRecord, session_id: &str) {
        let key = session_id.to_string();
        record.sessions.insert(key.clone(), self.hours);
        if self.late {
            record.late.insert(key.clone(), true);
        }
        if self.absence_approved {
            record.absence_approved.insert(key.clone(), true);
        }
        if self.lateness_approved {
            record.lateness_approved.insert(key, true);
        }
    }
}

/// Display form of a punch pair, e.g. `9:05-13:00` or `מאושר-13:00`.
pub fn describe(entry: PunchValue, exit: PunchValue) -> String {
    format!("{}-{}", describe_one(entry), describe_one(exit))
}

fn describe_one(v: PunchValue) -> String {
    let marker = rule(HeaderField::Approved).spellings[0];
    match v {
        PunchValue::Empty => "?".to_string(),
        PunchValue::Recorded(h) => format_hours(h),
        PunchValue::ApprovedAbsence => marker.to_string(),
        PunchValue::ApprovedLate(h) => format!("{} {}", marker, format_hours(h)),
    }
}
