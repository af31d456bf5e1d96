use crate::errors::{AppError, AppResult};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reporting month of a timesheet.
///
/// Displayed as `MM/YYYY`; persisted snapshots are keyed by [`MonthLabel::key`]
/// (`YYYY-MM`) so that keys sort chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthLabel {
    pub year: i32,
    pub month: u32,
}

impl MonthLabel {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) && (1900..=2200).contains(&year) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    pub fn from_date(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
        }
    }

    pub fn key(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    pub fn days_in_month(&self) -> u32 {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1);
        let next = if self.month == 12 {
            NaiveDate::from_ymd_opt(self.year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(self.year, self.month + 1, 1)
        };
        match (first, next) {
            (Some(a), Some(b)) => (b - a).num_days() as u32,
            _ => 31,
        }
    }

    /// `DD/MM/YYYY` label for a day of this month.
    pub fn day_label(&self, day: u32) -> String {
        format!("{:02}/{:02}/{:04}", day, self.month, self.year)
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for MonthLabel {
    type Err = AppError;

    /// Accepts `YYYY-MM`, `MM/YYYY` and `MM-YYYY`.
    fn from_str(s: &str) -> AppResult<Self> {
        let s = s.trim();
        let invalid = || AppError::InvalidMonth(s.to_string());

        let (a, b) = s
            .split_once(['-', '/', '.'])
            .ok_or_else(invalid)?;

        let (year, month) = if a.len() == 4 {
            (a.parse::<i32>(), b.parse::<u32>())
        } else {
            (b.parse::<i32>(), a.parse::<u32>())
        };

        match (year, month) {
            (Ok(y), Ok(m)) => MonthLabel::new(y, m).ok_or_else(invalid),
            _ => Err(invalid()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_label_orders() {
        let a: MonthLabel = "2024-03".parse().unwrap();
        let b: MonthLabel = "03/2024".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.key(), "2024-03");
        assert_eq!(a.to_string(), "03/2024");
    }

    #[test]
    fn rejects_nonsense() {
        assert!("2024-13".parse::<MonthLabel>().is_err());
        assert!("march".parse::<MonthLabel>().is_err());
    }

    #[test]
    fn knows_month_lengths() {
        assert_eq!(MonthLabel::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(MonthLabel::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(MonthLabel::new(2024, 12).unwrap().days_in_month(), 31);
    }
}
