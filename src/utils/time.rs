//! Time utilities: parsing HH:MM, decimal-hour conversion, formatting hours.

use chrono::{NaiveTime, Timelike};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    let t = t.trim();
    NaiveTime::parse_from_str(t, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M:%S"))
        .ok()
}

/// Time of day as decimal hours (09:30 → 9.5).
pub fn hours_of(t: NaiveTime) -> f64 {
    t.num_seconds_from_midnight() as f64 / 3600.0
}

/// Decimal hours as `H:MM`, rounded to the minute.
pub fn format_hours(hours: f64) -> String {
    let sign = if hours < 0.0 { "-" } else { "" };
    let mins = (hours.abs() * 60.0).round() as i64;
    format!("{}{}:{:02}", sign, mins / 60, mins % 60)
}

/// Serde adapter storing a `NaiveTime` as `HH:MM` (or `HH:MM:SS` when seconds are set).
pub mod hhmm {
    use super::parse_time;
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(t: &NaiveTime, s: S) -> Result<S::Ok, S::Error> {
        let fmt = if t.second() == 0 { "%H:%M" } else { "%H:%M:%S" };
        s.serialize_str(&t.format(fmt).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse_time(&raw).ok_or_else(|| D::Error::custom(format!("invalid time of day '{raw}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_hours_round_trip_through_formatting() {
        let t = parse_time("09:45").unwrap();
        assert_eq!(hours_of(t), 9.75);
        assert_eq!(format_hours(9.75), "9:45");
        assert_eq!(format_hours(-0.5), "-0:30");
    }

    #[test]
    fn seconds_are_accepted() {
        assert!(parse_time("13:00:00").is_some());
        assert!(parse_time("25:00").is_none());
    }
}
