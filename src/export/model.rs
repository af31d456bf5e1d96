// src/export/model.rs

use crate::models::result::MonthlyReport;
use crate::utils::time::format_hours;
use serde::Serialize;

/// One exported line per scholar.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SummaryRow {
    pub scholar: String,
    pub month: String,
    pub working_days: usize,
    pub required_hours: f64,
    pub credited_hours: f64,
    pub hour_deficit: f64,
    pub attendance_percent: f64,
    pub base_stipend: f64,
    pub total_deduction: f64,
    pub total_bonus: f64,
    pub stipend: f64,
    pub approved_absence_hours: f64,
    pub approved_lateness_count: usize,
}

/// One line per scholar and day, for the xlsx details sheet.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct DetailRow {
    pub scholar: String,
    pub date: String,
    pub punches: String,
    pub hours: String,
    pub status: String,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

pub fn summary_rows(report: &MonthlyReport) -> Vec<SummaryRow> {
    let month = report.month.to_string();
    report
        .results
        .iter()
        .map(|r| SummaryRow {
            scholar: r.name.clone(),
            month: month.clone(),
            working_days: r.working_days,
            required_hours: round2(r.required_hours),
            credited_hours: round2(r.total_hours),
            hour_deficit: round2(r.hour_deficit),
            attendance_percent: round2(r.attendance_percent),
            base_stipend: round2(r.base_stipend_used),
            total_deduction: round2(r.total_deduction),
            total_bonus: round2(r.total_bonus),
            stipend: round2(r.stipend),
            approved_absence_hours: round2(r.approved_absence_hours),
            approved_lateness_count: r.approved_lateness_count,
        })
        .collect()
}

pub fn detail_rows(report: &MonthlyReport) -> Vec<DetailRow> {
    let mut out = Vec::new();
    for r in &report.results {
        for d in &r.daily {
            let status = if d.day_off {
                "day off"
            } else if d.absent {
                "absent"
            } else if !d.absence_approved.is_empty() || !d.lateness_approved.is_empty() {
                "approved"
            } else if d.late.values().any(|l| *l) {
                "late"
            } else {
                ""
            };
            out.push(DetailRow {
                scholar: r.name.clone(),
                date: d.date_label.clone(),
                punches: d.punches.clone(),
                hours: format_hours(d.sessions.values().sum()),
                status: status.to_string(),
            });
        }
    }
    out
}

pub(crate) fn summary_headers() -> Vec<&'static str> {
    vec![
        "scholar",
        "month",
        "working_days",
        "required_hours",
        "credited_hours",
        "hour_deficit",
        "attendance_percent",
        "base_stipend",
        "total_deduction",
        "total_bonus",
        "stipend",
        "approved_absence_hours",
        "approved_lateness_count",
    ]
}

pub(crate) fn summary_to_row(s: &SummaryRow) -> Vec<String> {
    vec![
        s.scholar.clone(),
        s.month.clone(),
        s.working_days.to_string(),
        format!("{:.2}", s.required_hours),
        format!("{:.2}", s.credited_hours),
        format!("{:.2}", s.hour_deficit),
        format!("{:.2}", s.attendance_percent),
        format!("{:.2}", s.base_stipend),
        format!("{:.2}", s.total_deduction),
        format!("{:.2}", s.total_bonus),
        format!("{:.2}", s.stipend),
        format!("{:.2}", s.approved_absence_hours),
        s.approved_lateness_count.to_string(),
    ]
}

pub(crate) fn detail_headers() -> Vec<&'static str> {
    vec!["scholar", "date", "punches", "hours", "status"]
}

pub(crate) fn detail_to_row(d: &DetailRow) -> Vec<String> {
    vec![
        d.scholar.clone(),
        d.date.clone(),
        d.punches.clone(),
        d.hours.clone(),
        d.status.clone(),
    ]
}
