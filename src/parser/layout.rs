use super::tokens::{HeaderField, matches};
use crate::models::attendance::Layout;
use crate::models::cell::Row;

/// Only this many leading rows are ever inspected for headers.
pub const HEADER_SCAN_ROWS: usize = 10;

/// Multi-scholar sheets carry a scholar-name header cell near the top; anything
/// else is treated as one sheet per scholar.
pub fn detect_layout(first_sheet: &[Row]) -> Layout {
    let wide = first_sheet.iter().take(HEADER_SCAN_ROWS).any(|row| {
        row.iter()
            .any(|c| matches(HeaderField::ScholarName, &c.as_text()))
    });

    if wide { Layout::Wide } else { Layout::Legacy }
}
