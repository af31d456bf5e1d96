//! Workbook reading through calamine into plain cell grids.

use crate::errors::AppResult;
use crate::models::cell::{Cell, Grid};
use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

fn to_cell(value: &Data) -> Cell {
    match value {
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::String(s) => {
            if s.trim().is_empty() {
                Cell::Empty
            } else {
                Cell::Text(s.clone())
            }
        }
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        _ => Cell::Empty,
    }
}

/// Absolute grid: the range's leading empty rows/columns are restored so indices
/// match what the user sees in the spreadsheet.
fn to_grid(range: &Range<Data>) -> Grid {
    let (row0, col0) = range.start().unwrap_or((0, 0));
    let mut grid: Grid = vec![Vec::new(); row0 as usize];

    for row in range.rows() {
        let mut cells = vec![Cell::Empty; col0 as usize];
        cells.extend(row.iter().map(to_cell));
        while matches!(cells.last(), Some(Cell::Empty)) {
            cells.pop();
        }
        grid.push(cells);
    }

    grid
}

/// All worksheets of an in-memory workbook (xlsx, xls, ods), in workbook order.
pub fn read_sheets(bytes: &[u8]) -> AppResult<Vec<(String, Grid)>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        sheets.push((name, to_grid(&range)));
    }
    Ok(sheets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_map_to_cells() {
        assert_eq!(to_cell(&Data::Int(930)), Cell::Number(930.0));
        assert_eq!(to_cell(&Data::String("  ".into())), Cell::Empty);
        assert_eq!(to_cell(&Data::String("כניסה".into())), Cell::text("כניסה"));
        assert_eq!(to_cell(&Data::Empty), Cell::Empty);
    }

    #[test]
    fn garbage_bytes_are_a_workbook_error() {
        let err = read_sheets(b"definitely not a spreadsheet").unwrap_err();
        assert!(matches!(err, crate::errors::AppError::Workbook(_)));
    }
}
