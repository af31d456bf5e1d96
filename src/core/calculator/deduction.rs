use super::EPSILON;
use crate::models::attendance::ScholarAttendance;
use crate::models::result::DeductionLine;
use crate::settings::{DeductionRule, Session};

/// Per-session hour totals over the working days of the month.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SessionTally {
    pub credited: f64,
    pub required: f64,
    /// Hours excused by an approved absence; reported, never penalized.
    pub approved_deficit: f64,
}

impl SessionTally {
    pub fn deficit(&self) -> f64 {
        (self.required - self.credited).max(0.0)
    }

    pub fn attendance_percent(&self) -> f64 {
        if self.required <= 0.0 {
            100.0
        } else {
            self.credited / self.required * 100.0
        }
    }
}

/// Credit one session across `working_days`. An approved absence credits the full
/// session duration; a day without any record credits nothing.
pub fn tally_session(att: &ScholarAttendance, session: &Session, working_days: &[u32]) -> SessionTally {
    let duration = session.duration_hours();
    let mut tally = SessionTally {
        required: working_days.len() as f64 * duration,
        ..Default::default()
    };

    for day in working_days {
        let Some(record) = att.days.iter().find(|d| d.day == *day) else {
            continue;
        };
        let actual = record.hours(&session.id).min(duration);
        if record.is_absence_approved(&session.id) {
            tally.credited += duration;
            tally.approved_deficit += (duration - actual).max(0.0);
        } else {
            tally.credited += actual;
        }
    }

    tally
}

/// Deduction line for a session, or `None` when the deficit is negligible.
pub fn deduction_line(
    session: &Session,
    global: &DeductionRule,
    tally: &SessionTally,
) -> Option<DeductionLine> {
    let deficit = tally.deficit();
    if deficit <= EPSILON {
        return None;
    }

    let pct = tally.attendance_percent();
    let rate = session.deduction_rule(global).rate_for(pct);

    Some(DeductionLine {
        session_id: session.id.clone(),
        session_name: session.name.clone(),
        required_hours: tally.required,
        credited_hours: tally.credited,
        deficit_hours: deficit,
        attendance_percent: pct,
        rate,
        amount: deficit * rate,
    })
}
