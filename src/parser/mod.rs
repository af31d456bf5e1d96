//! Spreadsheet side of the pipeline: layout detection and the two extractors.
//!
//! Both extractors produce [`ScholarAttendance`] records so nothing downstream
//! knows which layout a workbook used.

pub mod layout;
pub mod legacy;
pub mod month;
pub mod normalize;
pub mod punch;
pub mod tokens;
pub mod wide;
pub mod workbook;

use crate::errors::{AppError, AppResult};
use crate::models::attendance::{Layout, ParsedWorkbook, ScholarAttendance};
use crate::models::cell::Grid;
use crate::settings::Settings;
use tracing::{debug, warn};

/// Read an in-memory workbook and extract every scholar's attendance.
pub fn parse_workbook(
    bytes: &[u8],
    filename: Option<&str>,
    settings: &Settings,
) -> AppResult<ParsedWorkbook> {
    let sheets = workbook::read_sheets(bytes)?;
    parse_sheets(&sheets, filename, settings)
}

/// Same as [`parse_workbook`] for already-materialized grids.
pub fn parse_sheets(
    sheets: &[(String, Grid)],
    filename: Option<&str>,
    settings: &Settings,
) -> AppResult<ParsedWorkbook> {
    let (_, first) = sheets.first().ok_or(AppError::NoValidData)?;
    let layout = layout::detect_layout(first);
    debug!(?layout, sheets = sheets.len(), "detected workbook layout");

    match layout {
        Layout::Wide => {
            let sheet = wide::extract(first, filename, settings)?;
            if sheet.scholars.is_empty() {
                return Err(AppError::NoValidData);
            }
            Ok(ParsedWorkbook {
                layout,
                month: sheet.month,
                scholars: sheet.scholars,
                active_days: Some(sheet.active_days),
                warnings: Vec::new(),
            })
        }
        Layout::Legacy => parse_legacy(sheets, filename, settings),
    }
}

fn parse_legacy(
    sheets: &[(String, Grid)],
    filename: Option<&str>,
    settings: &Settings,
) -> AppResult<ParsedWorkbook> {
    let mut scholars: Vec<ScholarAttendance> = Vec::new();
    let mut warnings = Vec::new();
    let mut month = None;

    for (name, grid) in sheets {
        match legacy::extract_sheet(name, grid, filename, settings) {
            Ok((scholar, sheet_month)) => {
                match month {
                    None => month = Some(sheet_month),
                    Some(m) if m != sheet_month => {
                        let msg = format!(
                            "Sheet '{name}' is dated {sheet_month}, expected {m}; using {m}"
                        );
                        warn!("{msg}");
                        warnings.push(msg);
                    }
                    _ => {}
                }
                scholars.push(scholar);
            }
            Err(e) => {
                warn!(sheet = %name, error = %e, "skipping sheet");
                warnings.push(e.to_string());
            }
        }
    }

    let month = month.ok_or(AppError::NoValidData)?;
    if scholars.is_empty() {
        return Err(AppError::NoValidData);
    }

    Ok(ParsedWorkbook {
        layout: Layout::Legacy,
        month,
        scholars,
        active_days: None,
        warnings,
    })
}
