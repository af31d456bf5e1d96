//! Header vocabulary of the time-clock exports.
//!
//! Every header comparison in the extractors goes through [`TOKEN_TABLE`], so the
//! heuristics can be audited (and tested) in one place.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    ScholarName,
    Entry,
    Exit,
    Bonus,
    SessionMarker,
    Total,
    Approved,
    DayOff,
    Day,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    Exact,
    Contains,
    Prefix,
}

#[derive(Debug)]
pub struct TokenRule {
    pub field: HeaderField,
    pub spellings: &'static [&'static str],
    pub mode: MatchMode,
}

pub const TOKEN_TABLE: &[TokenRule] = &[
    TokenRule {
        field: HeaderField::ScholarName,
        spellings: &["שם", "שם האברך"],
        mode: MatchMode::Exact,
    },
    TokenRule {
        field: HeaderField::Entry,
        spellings: &["כניסה", "entry"],
        mode: MatchMode::Contains,
    },
    TokenRule {
        field: HeaderField::Exit,
        spellings: &["יציאה", "exit"],
        mode: MatchMode::Contains,
    },
    TokenRule {
        field: HeaderField::Bonus,
        spellings: &["בונוס", "bonus"],
        mode: MatchMode::Contains,
    },
    TokenRule {
        field: HeaderField::SessionMarker,
        spellings: &["סדר", "seder"],
        mode: MatchMode::Contains,
    },
    TokenRule {
        field: HeaderField::Total,
        spellings: &["סה\"כ", "סה״כ", "סהכ", "total"],
        mode: MatchMode::Contains,
    },
    TokenRule {
        field: HeaderField::Approved,
        spellings: &["מאושר", "approved"],
        mode: MatchMode::Prefix,
    },
    TokenRule {
        field: HeaderField::DayOff,
        spellings: &["חופש", "day off"],
        mode: MatchMode::Contains,
    },
    TokenRule {
        field: HeaderField::Day,
        spellings: &["יום", "day"],
        mode: MatchMode::Exact,
    },
    TokenRule {
        field: HeaderField::Date,
        spellings: &["תאריך", "date"],
        mode: MatchMode::Exact,
    },
];

/// Lowercase, trim and collapse inner whitespace.
pub fn fold(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn rule(field: HeaderField) -> &'static TokenRule {
    TOKEN_TABLE
        .iter()
        .find(|r| r.field == field)
        .unwrap_or(&TOKEN_TABLE[0])
}

pub fn matches(field: HeaderField, text: &str) -> bool {
    let folded = fold(text);
    if folded.is_empty() {
        return false;
    }
    let r = rule(field);
    r.spellings.iter().any(|s| match r.mode {
        MatchMode::Exact => folded == *s,
        MatchMode::Contains => folded.contains(s),
        MatchMode::Prefix => folded.starts_with(s),
    })
}

/// Strips a leading approval marker, returning the remainder.
pub fn strip_approved(text: &str) -> Option<&str> {
    let trimmed = text.trim_start();
    let lower = trimmed.to_lowercase();
    rule(HeaderField::Approved)
        .spellings
        .iter()
        .find(|s| lower.starts_with(*s))
        .and_then(|s| trimmed.get(s.len()..))
        .map(|rest| rest.trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-'))
}

/// Column kinds recognised on the kind row of the multi-scholar layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Entry,
    Exit,
    Bonus,
}

pub fn column_kind(text: &str) -> Option<ColumnKind> {
    if matches(HeaderField::Entry, text) {
        Some(ColumnKind::Entry)
    } else if matches(HeaderField::Exit, text) {
        Some(ColumnKind::Exit)
    } else if matches(HeaderField::Bonus, text) {
        Some(ColumnKind::Bonus)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_field_has_a_rule() {
        for f in [
            HeaderField::ScholarName,
            HeaderField::Entry,
            HeaderField::Exit,
            HeaderField::Bonus,
            HeaderField::SessionMarker,
            HeaderField::Total,
            HeaderField::Approved,
            HeaderField::DayOff,
            HeaderField::Day,
            HeaderField::Date,
        ] {
            assert_eq!(rule(f).field, f);
        }
    }

    #[test]
    fn name_header_requires_exact_match() {
        assert!(matches(HeaderField::ScholarName, " שם "));
        assert!(matches(HeaderField::ScholarName, "שם  האברך"));
        assert!(!matches(HeaderField::ScholarName, "שם משפחה"));
    }

    #[test]
    fn kinds_match_by_substring() {
        assert_eq!(column_kind("שעת כניסה"), Some(ColumnKind::Entry));
        assert_eq!(column_kind("Exit"), Some(ColumnKind::Exit));
        assert_eq!(column_kind("בונוס שיעור"), Some(ColumnKind::Bonus));
        assert_eq!(column_kind("הערות"), None);
    }

    #[test]
    fn total_marker_variants() {
        assert!(matches(HeaderField::Total, "סה\"כ"));
        assert!(matches(HeaderField::Total, "סה״כ שעות"));
        assert!(matches(HeaderField::Total, "TOTAL"));
    }

    #[test]
    fn approval_prefix_is_stripped() {
        assert_eq!(strip_approved("מאושר 09:15"), Some("09:15"));
        assert_eq!(strip_approved("מאושר"), Some(""));
        assert_eq!(strip_approved("Approved: 0915"), Some("0915"));
        assert_eq!(strip_approved("09:15"), None);
    }
}
