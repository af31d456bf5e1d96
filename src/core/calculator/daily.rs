use crate::models::attendance::{DailyRecord, ScholarAttendance};
use crate::models::month::MonthLabel;
use std::collections::BTreeSet;

/// Days a scholar was expected to attend: the institution's active days when
/// known, otherwise every recorded day that is not a day off.
pub fn working_days(att: &ScholarAttendance, active_days: Option<&BTreeSet<u32>>) -> Vec<u32> {
    match active_days {
        Some(days) => days.iter().copied().collect(),
        None => {
            let mut days: Vec<u32> = att
                .days
                .iter()
                .filter(|d| !d.day_off)
                .map(|d| d.day)
                .collect();
            days.sort_unstable();
            days.dedup();
            days
        }
    }
}

/// Daily detail list. With known active days every active day gets an entry,
/// synthesizing an absent placeholder where the scholar has no record.
pub fn reconstruct(
    att: &ScholarAttendance,
    active_days: Option<&BTreeSet<u32>>,
    month: &MonthLabel,
) -> Vec<DailyRecord> {
    match active_days {
        Some(days) => days
            .iter()
            .map(|&day| {
                att.days
                    .iter()
                    .find(|d| d.day == day)
                    .cloned()
                    .unwrap_or_else(|| DailyRecord::absent(day, month.day_label(day)))
            })
            .collect(),
        None => {
            let mut days = att.days.clone();
            days.sort_by_key(|d| d.day);
            days
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::ABSENT_MARKER;

    fn scholar() -> ScholarAttendance {
        let mut s = ScholarAttendance::new("Levi");
        s.days.push(DailyRecord::new(5, "05/03/2024".into()));
        s.days.push(DailyRecord::day_off(2, "02/03/2024".into()));
        s.days.push(DailyRecord::new(1, "01/03/2024".into()));
        s
    }

    #[test]
    fn active_days_fill_gaps_with_absent_placeholders() {
        let month = MonthLabel::new(2024, 3).unwrap();
        let active: BTreeSet<u32> = [1, 3, 5].into_iter().collect();
        let daily = reconstruct(&scholar(), Some(&active), &month);

        let days: Vec<u32> = daily.iter().map(|d| d.day).collect();
        assert_eq!(days, vec![1, 3, 5]);
        assert!(daily[1].absent);
        assert_eq!(daily[1].punches, ABSENT_MARKER);
        assert_eq!(daily[1].date_label, "03/03/2024");
    }

    #[test]
    fn without_active_days_records_are_sorted() {
        let month = MonthLabel::new(2024, 3).unwrap();
        let days: Vec<u32> = reconstruct(&scholar(), None, &month)
            .iter()
            .map(|d| d.day)
            .collect();
        assert_eq!(days, vec![1, 2, 5]);
        assert_eq!(working_days(&scholar(), None), vec![1, 5]);
    }
}
