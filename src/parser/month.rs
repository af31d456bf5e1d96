//! Reporting month inference: file name first, then the header block.

use super::layout::HEADER_SCAN_ROWS;
use super::normalize::{date_parts, is_excel_serial};
use crate::models::cell::{Cell, Row};
use crate::models::month::MonthLabel;
use regex::Regex;
use std::sync::LazyLock;

/// `15-03-2024`, `01.03.24`
static FULL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|\D)(\d{1,2})[-_.](\d{1,2})[-_.](\d{4}|\d{2})(?:\D|$)").expect("pattern")
});

/// `2024-03`, `2024_3`
static YEAR_FIRST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{4})[-_. ](\d{1,2})(?:\D|$)").expect("pattern"));

/// `03-2024`, `15-03`, `01.03`
static TWO_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\D)(\d{1,2})[-_.](\d{4}|\d{1,2})(?:\D|$)").expect("pattern"));

/// What a file name says about the reporting month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameMonth {
    Known(MonthLabel),
    /// A `DD-MM` stamp: the year has to come from the sheet.
    YearUnknown(u32),
}

fn stem_of(name: &str) -> &str {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

pub fn filename_month(name: &str) -> Option<FilenameMonth> {
    let stem = stem_of(name);

    if let Some(c) = FULL_DATE.captures(stem)
        && let Some(label) = label_from(c.get(3).map(|m| m.as_str()), c.get(2).map(|m| m.as_str()))
    {
        return Some(FilenameMonth::Known(label));
    }

    if let Some(c) = YEAR_FIRST.captures(stem) {
        let y = c.get(1).and_then(|m| m.as_str().parse::<i32>().ok());
        let m = c.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
        if let (Some(y), Some(m)) = (y, m)
            && let Some(label) = MonthLabel::new(y, m)
        {
            return Some(FilenameMonth::Known(label));
        }
    }

    let c = TWO_PART.captures(stem)?;
    let first = c.get(1)?.as_str();
    let second = c.get(2)?.as_str();
    if second.len() == 4 {
        return label_from(Some(second), Some(first)).map(FilenameMonth::Known);
    }

    let day = first.parse::<u32>().ok()?;
    let month = second.parse::<u32>().ok()?;
    ((1..=31).contains(&day) && (1..=12).contains(&month)).then_some(FilenameMonth::YearUnknown(month))
}

/// The month a file name fully determines, year included.
pub fn month_from_filename(name: &str) -> Option<MonthLabel> {
    match filename_month(name)? {
        FilenameMonth::Known(label) => Some(label),
        FilenameMonth::YearUnknown(_) => None,
    }
}

fn label_from(year: Option<&str>, month: Option<&str>) -> Option<MonthLabel> {
    let raw_year = year?;
    let y = raw_year.parse::<i32>().ok()?;
    let y = if raw_year.len() == 2 { 2000 + y } else { y };
    MonthLabel::new(y, month?.parse::<u32>().ok()?)
}

/// Combine the file name with a month read from the sheet. A `DD-MM` file name
/// keeps its month and borrows the sheet's year.
pub fn month_with_content(
    filename: Option<&str>,
    content: impl FnOnce() -> Option<MonthLabel>,
) -> Option<MonthLabel> {
    match filename.and_then(filename_month) {
        Some(FilenameMonth::Known(label)) => Some(label),
        Some(FilenameMonth::YearUnknown(month)) => {
            let found = content()?;
            MonthLabel::new(found.year, month).or(Some(found))
        }
        None => content(),
    }
}

/// First Excel serial date or full `D/M/Y` string in the header block.
pub fn month_from_rows(rows: &[Row]) -> Option<MonthLabel> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .flat_map(|r| r.iter())
        .find_map(month_of_cell)
}

pub fn month_of_cell(cell: &Cell) -> Option<MonthLabel> {
    let is_candidate = match cell {
        Cell::Number(n) => is_excel_serial(*n),
        Cell::Text(_) => true,
        Cell::Empty => false,
    };
    if !is_candidate {
        return None;
    }
    let p = date_parts(cell)?;
    MonthLabel::new(p.year?, p.month?)
}

pub fn resolve_month(filename: Option<&str>, rows: &[Row]) -> Option<MonthLabel> {
    month_with_content(filename, || month_from_rows(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_patterns() {
        assert_eq!(month_from_filename("נוכחות 03-2024.xlsx"), MonthLabel::new(2024, 3));
        assert_eq!(month_from_filename("/tmp/attendance_2024-11.xls"), MonthLabel::new(2024, 11));
        assert_eq!(month_from_filename("export 15-03-2024.xlsx"), MonthLabel::new(2024, 3));
        assert_eq!(month_from_filename("report.xlsx"), None);
        assert_eq!(month_from_filename("13-2024.xlsx"), None);
    }

    #[test]
    fn day_month_names_leave_the_year_to_the_sheet() {
        assert_eq!(filename_month("נוכחות 01-03.xlsx"), Some(FilenameMonth::YearUnknown(3)));
        assert_eq!(filename_month("attendance 15-03.xlsx"), Some(FilenameMonth::YearUnknown(3)));
        assert_eq!(month_from_filename("נוכחות 01-03.xlsx"), None);
        assert_eq!(filename_month("report 7.24.xlsx"), None);

        let rows = vec![vec![Cell::text("01/03/2024")]];
        assert_eq!(resolve_month(Some("נוכחות 01-03.xlsx"), &rows), MonthLabel::new(2024, 3));
        assert_eq!(resolve_month(Some("attendance 15-04.xlsx"), &rows), MonthLabel::new(2024, 4));
        assert_eq!(resolve_month(Some("נוכחות 01-03.xlsx"), &[]), None);
        assert_eq!(resolve_month(Some("report 7.24.xlsx"), &rows), MonthLabel::new(2024, 3));
    }

    #[test]
    fn content_fallback() {
        let rows = vec![
            vec![Cell::text("דוח נוכחות")],
            vec![Cell::Empty, Cell::text("לתקופה 01/02/2024 - 29/02/2024")],
        ];
        assert_eq!(month_from_rows(&rows), MonthLabel::new(2024, 2));

        let serial = vec![vec![Cell::Number(45352.0)]];
        assert_eq!(resolve_month(Some("x.xlsx"), &serial), MonthLabel::new(2024, 3));
    }

    #[test]
    fn bare_day_numbers_do_not_resolve_a_month() {
        let rows = vec![vec![Cell::Number(1.0), Cell::Number(2.0), Cell::text("3")]];
        assert_eq!(month_from_rows(&rows), None);
    }
}
