//! In-memory worksheet grid shared by the layout detector and both extractors.

/// A single worksheet cell, reduced to the two shapes the time-clock exports use.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

pub type Row = Vec<Cell>;
pub type Grid = Vec<Row>;

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn text<S: Into<String>>(s: S) -> Self {
        Cell::Text(s.into())
    }

    /// Blank text counts as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }

    /// Trimmed textual form. Whole numbers are rendered without decimals.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => format!("{}", n),
        }
    }

    /// Numeric value of a number cell or of a text cell holding a plain number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty => None,
        }
    }
}

/// Bounds-safe cell lookup; ragged rows read as empty.
pub fn cell_at(grid: &[Row], row: usize, col: usize) -> &Cell {
    grid.get(row).map(|r| row_cell(r, col)).unwrap_or(&EMPTY)
}

pub fn row_cell(row: &[Cell], col: usize) -> &Cell {
    row.get(col).unwrap_or(&EMPTY)
}

/// Widest row in the grid.
pub fn grid_width(grid: &[Row]) -> usize {
    grid.iter().map(|r| r.len()).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_render_without_trailing_zeroes() {
        assert_eq!(Cell::Number(5.0).as_text(), "5");
        assert_eq!(Cell::Number(5.25).as_text(), "5.25");
        assert_eq!(Cell::text("  שם ").as_text(), "שם");
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let grid = vec![vec![Cell::Number(1.0)], vec![]];
        assert!(cell_at(&grid, 1, 3).is_empty());
        assert!(cell_at(&grid, 9, 0).is_empty());
        assert_eq!(grid_width(&grid), 1);
    }
}
