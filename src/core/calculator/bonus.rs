use super::EPSILON;
use crate::models::attendance::ScholarAttendance;
use crate::models::result::{BonusLine, BonusSource};
use crate::parser::tokens::fold;
use crate::settings::{BonusKind, GeneralBonus, Session};
use std::collections::BTreeMap;

/// Unexcused latenesses and on-time attendances of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PunctualityTally {
    pub unexcused_late: u32,
    pub on_time: u32,
    pub approved_late: u32,
}

pub fn punctuality_tally(att: &ScholarAttendance, session_id: &str, working_days: &[u32]) -> PunctualityTally {
    let mut t = PunctualityTally::default();

    for record in att.days.iter().filter(|d| working_days.contains(&d.day)) {
        let late = record.is_late(session_id);
        let excused = record.is_lateness_approved(session_id);

        if late && excused {
            t.approved_late += 1;
        }
        if late && !excused {
            t.unexcused_late += 1;
        }
        if record.hours(session_id) > EPSILON && (!late || excused) {
            t.on_time += 1;
        }
    }

    t
}

/// The punctuality line for a session, if any. Reaching the cancellation threshold
/// voids the bonus for the month; the line is kept with a zero amount.
pub fn punctuality_line(session: &Session, tally: &PunctualityTally) -> Option<BonusLine> {
    if !session.punctuality_bonus_enabled {
        return None;
    }

    let threshold = session.punctuality_bonus_cancellation_threshold;
    if threshold > 0 && tally.unexcused_late >= threshold {
        return Some(BonusLine {
            source: BonusSource::Punctuality,
            name: session.name.clone(),
            count: tally.on_time as f64,
            amount: 0.0,
            cancelled: true,
        });
    }

    if tally.on_time == 0 {
        return None;
    }

    Some(BonusLine {
        source: BonusSource::Punctuality,
        name: session.name.clone(),
        count: tally.on_time as f64,
        amount: tally.on_time as f64 * session.punctuality_bonus_amount,
        cancelled: false,
    })
}

/// Occurrences of a general bonus: every counter whose key contains the bonus name.
pub fn bonus_count(counts: &BTreeMap<String, f64>, name: &str) -> f64 {
    let needle = fold(name);
    if needle.is_empty() {
        return 0.0;
    }
    counts
        .iter()
        .filter(|(k, _)| fold(k).contains(&needle))
        .map(|(_, v)| *v)
        .sum()
}

pub fn general_lines(
    bonuses: &[GeneralBonus],
    counts: &BTreeMap<String, f64>,
    attendance_percent: f64,
    attendance_threshold: f64,
) -> Vec<BonusLine> {
    bonuses
        .iter()
        .filter(|b| b.enabled)
        .filter(|b| !b.attendance_gated || attendance_percent + EPSILON >= attendance_threshold)
        .filter_map(|b| {
            let count = bonus_count(counts, &b.name);
            if count.abs() < EPSILON {
                return None;
            }
            let amount = match b.kind {
                BonusKind::Count => count * b.amount,
                BonusKind::Amount => count,
            };
            Some(BonusLine {
                source: BonusSource::General,
                name: b.name.clone(),
                count,
                amount,
                cancelled: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::{DailyRecord, PunchValue};
    use crate::parser::punch::evaluate;
    use crate::settings::normalize;
    use serde_json::json;

    fn morning() -> Session {
        normalize(json!({
            "sessions": [{"id": "a", "name": "סדר א", "start": "09:00", "end": "13:00"}]
        }))
        .unwrap()
        .sessions
        .remove(0)
    }

    /// Day 1 punched with the given pair, days 2 and 3 on time.
    fn month_with(entry: PunchValue, exit: PunchValue) -> ScholarAttendance {
        let s = morning();
        let mut att = ScholarAttendance::new("x");
        for (day, (e, x)) in [
            (entry, exit),
            (PunchValue::Recorded(9.0), PunchValue::Recorded(13.0)),
            (PunchValue::Recorded(9.0), PunchValue::Recorded(13.0)),
        ]
        .into_iter()
        .enumerate()
        {
            let mut d = DailyRecord::new(day as u32 + 1, String::new());
            if let Some(p) = evaluate(e, x, &s) {
                p.apply(&mut d, "a");
            }
            att.days.push(d);
        }
        att
    }

    #[test]
    fn entry_and_exit_markers_tally_alike_when_attended() {
        let on_entry = punctuality_tally(
            &month_with(PunchValue::ApprovedLate(10.0), PunchValue::Recorded(13.0)),
            "a",
            &[1, 2, 3],
        );
        let on_exit = punctuality_tally(
            &month_with(PunchValue::Recorded(10.0), PunchValue::ApprovedLate(13.0)),
            "a",
            &[1, 2, 3],
        );
        assert_eq!(on_entry, on_exit);
        assert_eq!(on_entry.on_time, 3);
        assert_eq!(on_entry.approved_late, 1);
        assert_eq!(on_entry.unexcused_late, 0);
    }

    #[test]
    fn approved_absences_are_not_on_time() {
        let on_entry = punctuality_tally(
            &month_with(PunchValue::ApprovedAbsence, PunchValue::Recorded(13.0)),
            "a",
            &[1, 2, 3],
        );
        let on_exit = punctuality_tally(
            &month_with(PunchValue::Recorded(10.0), PunchValue::ApprovedAbsence),
            "a",
            &[1, 2, 3],
        );
        assert_eq!(on_entry.on_time, 2);
        assert_eq!(on_exit.on_time, 2);
        assert_eq!(on_entry.unexcused_late, 0);
        assert_eq!(on_exit.unexcused_late, 0);
    }

    fn bonus(name: &str, amount: f64, kind: BonusKind, gated: bool) -> GeneralBonus {
        GeneralBonus {
            name: name.into(),
            amount,
            kind,
            attendance_gated: gated,
            enabled: true,
        }
    }

    #[test]
    fn counters_are_matched_by_substring() {
        let counts: BTreeMap<String, f64> = [
            ("מבחן".to_string(), 2.0),
            ("בונוס מבחן".to_string(), 1.0),
            ("חזרה".to_string(), 4.0),
        ]
        .into_iter()
        .collect();
        assert_eq!(bonus_count(&counts, "מבחן"), 3.0);
        assert_eq!(bonus_count(&counts, "other"), 0.0);
    }

    #[test]
    fn count_and_amount_kinds_pay_differently() {
        let counts: BTreeMap<String, f64> =
            [("Test".to_string(), 3.0), ("Extra".to_string(), 120.0)].into_iter().collect();
        let lines = general_lines(
            &[
                bonus("test", 50.0, BonusKind::Count, false),
                bonus("extra", 0.0, BonusKind::Amount, false),
            ],
            &counts,
            100.0,
            0.0,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].amount, 150.0);
        assert_eq!(lines[1].amount, 120.0);
    }

    #[test]
    fn gated_bonus_needs_the_attendance_threshold() {
        let counts: BTreeMap<String, f64> = [("Test".to_string(), 1.0)].into_iter().collect();
        let defs = [bonus("Test", 50.0, BonusKind::Count, true)];
        assert!(general_lines(&defs, &counts, 79.0, 80.0).is_empty());
        assert_eq!(general_lines(&defs, &counts, 80.0, 80.0).len(), 1);
    }
}
