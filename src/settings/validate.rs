use super::{DeductionRule, Settings};
use crate::errors::{AppError, AppResult};
use std::collections::HashSet;

/// Checks the invariants the calculator relies on. Run before every save.
pub fn validate(settings: &Settings) -> AppResult<()> {
    let mut problems: Vec<String> = Vec::new();

    if settings.base_stipend < 0.0 {
        problems.push("base stipend must not be negative".into());
    }
    check_rule("default deduction", &settings.deduction, &mut problems);
    check_percent(
        "bonus attendance threshold",
        settings.bonus_attendance_threshold,
        &mut problems,
    );

    let mut ids = HashSet::new();
    for s in &settings.sessions {
        if !ids.insert(s.id.as_str()) {
            problems.push(format!("duplicate session id '{}'", s.id));
        }
        if s.start >= s.end {
            problems.push(format!("session '{}' must start before it ends", s.name));
        }
        if s.punctuality_bonus_amount < 0.0 {
            problems.push(format!("session '{}': negative punctuality bonus", s.name));
        }
        check_percent(
            &format!("session '{}' partial stipend", s.name),
            s.partial_stipend_percentage,
            &mut problems,
        );
        if s.deduction_override.enabled {
            check_rule(
                &format!("session '{}' deduction", s.name),
                &s.deduction_override.rule,
                &mut problems,
            );
        }
    }

    let mut windows: Vec<_> = settings.sessions.iter().collect();
    windows.sort_by_key(|s| s.start);
    for pair in windows.windows(2) {
        if pair[1].start < pair[0].end {
            problems.push(format!(
                "sessions '{}' and '{}' overlap",
                pair[0].name, pair[1].name
            ));
        }
    }

    for b in &settings.general_bonuses {
        if b.name.trim().is_empty() {
            problems.push("general bonus without a name".into());
        }
        if b.amount < 0.0 {
            problems.push(format!("bonus '{}' has a negative amount", b.name));
        }
    }

    for (scholar, o) in &settings.scholar_overrides {
        for id in &o.sessions {
            if settings.session(id).is_none() {
                problems.push(format!("override for '{scholar}' names unknown session '{id}'"));
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidSettings(problems.join("; ")))
    }
}

fn check_rule(label: &str, rule: &DeductionRule, problems: &mut Vec<String>) {
    if rule.high_rate < 0.0 || rule.low_rate < 0.0 {
        problems.push(format!("{label}: rates must not be negative"));
    }
    check_percent(&format!("{label} threshold"), rule.threshold_percent, problems);
}

fn check_percent(label: &str, value: f64, problems: &mut Vec<String>) {
    if !(0.0..=100.0).contains(&value) {
        problems.push(format!("{label} must be between 0 and 100"));
    }
}
