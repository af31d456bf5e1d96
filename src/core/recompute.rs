//! Recomputing stored months: after a settings edit, or after an administrator
//! approves an absence or a lateness.

use crate::core::calculator::{attendance_of, calculate};
use crate::errors::{AppError, AppResult};
use crate::models::result::MonthlyReport;
use crate::settings::Settings;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalKind {
    Absence,
    Lateness,
}

impl FromStr for ApprovalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "absence" | "absent" => Ok(ApprovalKind::Absence),
            "lateness" | "late" => Ok(ApprovalKind::Lateness),
            other => Err(format!("unknown approval kind '{other}' (use absence|lateness)")),
        }
    }
}

impl fmt::Display for ApprovalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalKind::Absence => write!(f, "absence"),
            ApprovalKind::Lateness => write!(f, "lateness"),
        }
    }
}

/// Re-run the calculator for every scholar of a stored month.
pub fn recompute_report(report: &mut MonthlyReport, settings: &Settings) {
    for result in report.results.iter_mut() {
        let att = attendance_of(result);
        *result = calculate(&att, settings, report.active_days.as_ref(), &report.month);
    }
}

/// Set or clear one approval flag and recompute that scholar.
///
/// Approving an absence on a synthesized absent day turns the placeholder into a
/// real record so the approval survives later recomputes.
pub fn apply_approval(
    report: &mut MonthlyReport,
    settings: &Settings,
    scholar: &str,
    day: u32,
    session_id: &str,
    kind: ApprovalKind,
    approved: bool,
) -> AppResult<()> {
    if settings.session(session_id).is_none() {
        return Err(AppError::UnknownSession(session_id.to_string()));
    }

    let month = report.month;
    let active_days = report.active_days.clone();
    let result = report
        .results
        .iter_mut()
        .find(|r| r.name == scholar.trim())
        .ok_or_else(|| AppError::UnknownScholar(scholar.to_string()))?;

    let not_working = || AppError::NotAWorkingDay {
        day,
        month: month.to_string(),
    };

    let record = result
        .daily
        .iter_mut()
        .find(|d| d.day == day && !d.day_off)
        .ok_or_else(not_working)?;

    let flags = match kind {
        ApprovalKind::Absence => &mut record.absence_approved,
        ApprovalKind::Lateness => &mut record.lateness_approved,
    };
    if approved {
        flags.insert(session_id.to_string(), true);
    } else {
        flags.remove(session_id);
    }

    if record.absent && approved {
        record.absent = false;
    } else if !record.absent
        && record.sessions.is_empty()
        && record.absence_approved.is_empty()
        && record.lateness_approved.is_empty()
        && record.punches == crate::models::attendance::ABSENT_MARKER
    {
        record.absent = true;
    }

    let att = attendance_of(result);
    *result = calculate(&att, settings, active_days.as_ref(), &month);
    Ok(())
}
