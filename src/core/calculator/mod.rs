//! Stipend calculator: one scholar's attendance plus the organization settings in,
//! an itemized [`StipendResult`] out.
//!
//! The calculator is layout-agnostic and pure; recomputing a stored month runs the
//! exact same code.

pub mod bonus;
pub mod daily;
pub mod deduction;
pub mod rounding;

use crate::models::attendance::ScholarAttendance;
use crate::models::month::MonthLabel;
use crate::models::result::StipendResult;
use crate::settings::{Session, Settings};
use std::collections::BTreeSet;

/// Tolerance for hour and currency comparisons.
pub const EPSILON: f64 = 0.01;

/// Base stipend after partial-attendance scaling.
///
/// Scaling applies only when the scholar attended a non-empty strict subset of the
/// assigned sessions and the attended percentages sum to a value in (0, 100].
pub fn scaled_base(base: f64, assigned: &[&Session], att: &ScholarAttendance) -> f64 {
    let attended: Vec<_> = assigned
        .iter()
        .filter(|s| att.days.iter().any(|d| d.hours(&s.id) > EPSILON))
        .collect();

    if attended.is_empty() || attended.len() == assigned.len() {
        return base;
    }

    let pct: f64 = attended.iter().map(|s| s.partial_stipend_percentage).sum();
    if pct > 0.0 && pct <= 100.0 {
        base * pct / 100.0
    } else {
        base
    }
}

pub fn calculate(
    att: &ScholarAttendance,
    settings: &Settings,
    active_days: Option<&BTreeSet<u32>>,
    month: &MonthLabel,
) -> StipendResult {
    let assigned = settings.assigned_sessions(&att.name);
    let days = daily::working_days(att, active_days);

    let base = scaled_base(settings.base_stipend, &assigned, att);

    let mut deductions = Vec::new();
    let mut credited = 0.0;
    let mut required = 0.0;
    let mut approved_absence_hours = 0.0;

    for session in assigned.iter().filter(|s| s.duration_hours() > 0.0) {
        let tally = deduction::tally_session(att, session, &days);
        credited += tally.credited;
        required += tally.required;
        approved_absence_hours += tally.approved_deficit;

        if let Some(line) = deduction::deduction_line(session, &settings.deduction, &tally) {
            deductions.push(line);
        }
    }

    // Summing an empty f64 iterator yields -0.0.
    let total_deduction = deductions.iter().fold(0.0, |acc, d| acc + d.amount);
    let attendance_percent = if required > 0.0 {
        credited / required * 100.0
    } else {
        100.0
    };

    let mut bonuses = Vec::new();
    let mut approved_lateness_count = 0;
    for session in &assigned {
        let tally = bonus::punctuality_tally(att, &session.id, &days);
        approved_lateness_count += tally.approved_late as usize;
        if let Some(line) = bonus::punctuality_line(session, &tally) {
            bonuses.push(line);
        }
    }
    bonuses.extend(bonus::general_lines(
        &settings.general_bonuses,
        &att.bonus_counts,
        attendance_percent,
        settings.bonus_attendance_threshold,
    ));

    let total_bonus = bonuses.iter().fold(0.0, |acc, b| acc + b.amount);
    let stipend = rounding::finalize_amount(base - total_deduction + total_bonus, settings.rounding);

    StipendResult {
        name: att.name.clone(),
        total_hours: credited,
        stipend,
        deductions,
        bonuses,
        attendance_percent,
        base_stipend_used: base,
        total_deduction,
        total_bonus,
        hour_deficit: (required - credited).max(0.0),
        required_hours: required,
        working_days: days.len(),
        approved_absence_hours,
        approved_lateness_count,
        daily: daily::reconstruct(att, active_days, month),
        bonus_counts: att.bonus_counts.clone(),
    }
}

/// Rebuild the calculator input from a stored result.
pub fn attendance_of(result: &StipendResult) -> ScholarAttendance {
    ScholarAttendance {
        name: result.name.clone(),
        days: result.daily.iter().filter(|d| !d.absent).cloned().collect(),
        bonus_counts: result.bonus_counts.clone(),
    }
}
