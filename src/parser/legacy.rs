//! Per-scholar layout: one worksheet per scholar, one row per day.

use super::layout::HEADER_SCAN_ROWS;
use super::month::{month_from_rows, month_of_cell, month_with_content};
use super::normalize::{date_parts, day_of_month, legacy_time};
use super::punch::{describe, evaluate};
use super::tokens::{ColumnKind, HeaderField, column_kind, fold, matches, rule};
use crate::errors::{AppError, AppResult};
use crate::models::attendance::{DailyRecord, PunchValue, ScholarAttendance};
use crate::models::cell::{Cell, Row, row_cell};
use crate::models::month::MonthLabel;
use crate::settings::Settings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyHeader {
    pub row: usize,
    pub day_col: usize,
    pub date_col: Option<usize>,
    /// (entry, exit) column pairs in sheet order; pair `i` feeds session `i`.
    pub pairs: Vec<(usize, usize)>,
}

pub fn locate_header(grid: &[Row]) -> Option<LegacyHeader> {
    grid.iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(ri, row)| {
            let texts: Vec<String> = row.iter().map(Cell::as_text).collect();
            let day_col = texts.iter().position(|t| matches(HeaderField::Day, t))?;
            if !texts.iter().any(|t| matches(HeaderField::Entry, t)) {
                return None;
            }

            let cols_of = |kind: ColumnKind| -> Vec<usize> {
                texts
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| column_kind(t) == Some(kind))
                    .map(|(i, _)| i)
                    .collect()
            };

            Some(LegacyHeader {
                row: ri,
                day_col,
                date_col: texts.iter().position(|t| matches(HeaderField::Date, t)),
                pairs: cols_of(ColumnKind::Entry)
                    .into_iter()
                    .zip(cols_of(ColumnKind::Exit))
                    .collect(),
            })
        })
}

/// `שם: <name>` in one cell, or `שם:` followed by the name in the next cell,
/// above the header row. A bare `שם` cell is the wide-layout name header and is
/// never read as a label here.
fn scholar_name(grid: &[Row], header_row: usize) -> Option<String> {
    let tokens = rule(HeaderField::ScholarName).spellings;

    for row in grid.iter().take(header_row) {
        for (ci, cell) in row.iter().enumerate() {
            let text = cell.as_text();
            let folded = fold(&text);

            for token in tokens {
                let Some(rest) = folded.strip_prefix(token).map(str::trim_start) else {
                    continue;
                };
                if rest == ":" {
                    let next = row
                        .iter()
                        .skip(ci + 1)
                        .map(Cell::as_text)
                        .find(|t| !t.is_empty());
                    if next.is_some() {
                        return next;
                    }
                } else if rest.starts_with(':')
                    && let Some((_, value)) = text.split_once(':')
                {
                    return Some(value.trim().to_string());
                }
            }
        }
    }
    None
}

fn is_separator(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| matches!(c, '-' | '=' | '_' | '*' | '.' | ' '))
}

fn row_is_day_off(row: &Row) -> bool {
    row.iter().any(|c| matches(HeaderField::DayOff, &c.as_text()))
}

fn resolve_sheet_month(
    grid: &[Row],
    header: &LegacyHeader,
    filename: Option<&str>,
) -> Option<MonthLabel> {
    month_with_content(filename, || {
        header
            .date_col
            .and_then(|dc| {
                grid.iter()
                    .skip(header.row + 1)
                    .find_map(|r| month_of_cell(row_cell(r, dc)))
            })
            .or_else(|| month_from_rows(grid))
    })
}

fn sheet_error(sheet: &str, reason: &str) -> AppError {
    AppError::Sheet {
        sheet: sheet.to_string(),
        reason: reason.to_string(),
    }
}

pub fn extract_sheet(
    sheet_name: &str,
    grid: &[Row],
    filename: Option<&str>,
    settings: &Settings,
) -> AppResult<(ScholarAttendance, MonthLabel)> {
    let header = locate_header(grid)
        .ok_or_else(|| sheet_error(sheet_name, "header row with day and entry columns not found"))?;

    let month = resolve_sheet_month(grid, &header, filename)
        .ok_or_else(|| sheet_error(sheet_name, "could not determine month/year"))?;

    let name = scholar_name(grid, header.row).unwrap_or_else(|| sheet_name.trim().to_string());
    let mut scholar = ScholarAttendance::new(&name);

    for row in grid.iter().skip(header.row + 1) {
        let day_text = row_cell(row, header.day_col).as_text();
        let date_cell = header.date_col.map(|c| row_cell(row, c));

        if matches(HeaderField::Total, &day_text)
            || date_cell.is_some_and(|c| matches(HeaderField::Total, &c.as_text()))
            || is_separator(&day_text)
        {
            continue;
        }

        let day = date_cell
            .and_then(|c| date_parts(c).map(|p| p.day))
            .or_else(|| day_of_month(row_cell(row, header.day_col)));
        let Some(day) = day else {
            continue;
        };
        if scholar.days.iter().any(|d| d.day == day) {
            continue;
        }

        if row_is_day_off(row) {
            scholar.days.push(DailyRecord::day_off(day, month.day_label(day)));
            continue;
        }

        let mut record = DailyRecord::new(day, month.day_label(day));
        for (&(ec, xc), session) in header.pairs.iter().zip(&settings.sessions) {
            let entry = legacy_punch(row_cell(row, ec));
            let exit = legacy_punch(row_cell(row, xc));
            if let Some(p) = evaluate(entry, exit, session) {
                p.apply(&mut record, &session.id);
                record.append_punches(&describe(entry, exit));
            }
        }
        scholar.days.push(record);
    }

    if scholar.days.is_empty() {
        return Err(sheet_error(sheet_name, "no data rows"));
    }

    scholar.days.sort_by_key(|d| d.day);
    Ok((scholar, month))
}

fn legacy_punch(cell: &Cell) -> PunchValue {
    legacy_time(cell)
        .map(PunchValue::Recorded)
        .unwrap_or(PunchValue::Empty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::normalize;
    use serde_json::json;

    fn t(s: &str) -> Cell {
        Cell::text(s)
    }

    fn settings() -> Settings {
        normalize(json!({
            "sessions": [
                {"id": "a", "name": "סדר א", "start": "09:00", "end": "13:00", "latenessGraceMinutes": 5},
                {"id": "b", "name": "סדר ב", "start": "15:00", "end": "19:00"}
            ]
        }))
        .unwrap()
    }

    fn sheet() -> Vec<Row> {
        vec![
            vec![t("דוח נוכחות חודשי")],
            vec![t("שם:  משה לוי")],
            vec![t("יום"), t("תאריך"), t("כניסה"), t("יציאה"), t("כניסה"), t("יציאה")],
            vec![t("ראשון"), t("03/03/2024"), t("09:00"), t("13:00"), t("15:00"), t("19:00")],
            vec![t("שני"), t("04/03/2024"), t("09:20"), t("13:00"), Cell::Empty, Cell::Empty],
            vec![t("שלישי"), t("05/03/2024"), t("חופש")],
            vec![t("-----")],
            vec![t("סה\"כ"), Cell::Empty, t("31:40")],
        ]
    }

    #[test]
    fn header_pairs_follow_sheet_order() {
        let h = locate_header(&sheet()).unwrap();
        assert_eq!(h.row, 2);
        assert_eq!(h.day_col, 0);
        assert_eq!(h.date_col, Some(1));
        assert_eq!(h.pairs, vec![(2, 3), (4, 5)]);
    }

    #[test]
    fn rows_become_daily_records() {
        let (scholar, month) = extract_sheet("Sheet1", &sheet(), None, &settings()).unwrap();

        assert_eq!(scholar.name, "משה לוי");
        assert_eq!(month, MonthLabel::new(2024, 3).unwrap());
        assert_eq!(scholar.days.len(), 3);

        let d3 = &scholar.days[0];
        assert_eq!(d3.hours("a"), 4.0);
        assert_eq!(d3.hours("b"), 4.0);

        let d4 = &scholar.days[1];
        assert!(d4.is_late("a"));
        assert!(!d4.sessions.contains_key("b"));

        assert!(scholar.days[2].day_off);
    }

    #[test]
    fn sheet_without_header_is_an_error() {
        let grid = vec![vec![t("nothing here")]];
        let err = extract_sheet("Summary", &grid, None, &settings()).unwrap_err();
        assert!(err.to_string().contains("Summary"));
    }

    #[test]
    fn name_falls_back_to_sheet_name() {
        let mut grid = sheet();
        grid[1] = vec![];
        let (scholar, _) = extract_sheet("יוסף", &grid, Some("x 03-2024.xlsx"), &settings()).unwrap();
        assert_eq!(scholar.name, "יוסף");
    }

    #[test]
    fn bare_name_token_is_not_a_label() {
        let mut grid = sheet();
        grid[1] = vec![t("שם"), t("משה לוי")];
        let (scholar, _) = extract_sheet("יוסף", &grid, None, &settings()).unwrap();
        assert_eq!(scholar.name, "יוסף");

        grid[1] = vec![t("שם:"), t("משה לוי")];
        let (scholar, _) = extract_sheet("יוסף", &grid, None, &settings()).unwrap();
        assert_eq!(scholar.name, "משה לוי");
    }

    #[test]
    fn day_month_file_name_takes_the_year_from_the_dates() {
        let (_, month) = extract_sheet("Sheet1", &sheet(), Some("נוכחות 01-03.xlsx"), &settings()).unwrap();
        assert_eq!(month, MonthLabel::new(2024, 3).unwrap());
    }
}
