//! Raw cell grid of a loaded statement

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single loosely-typed spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Scalar {
    Text(String),
    Number(f64),
    #[default]
    Blank,
}

impl Scalar {
    /// Create a text cell
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Trimmed string rendering used by every structural check
    pub fn trimmed(&self) -> String {
        self.to_string().trim().to_string()
    }

    /// True when the cell renders to nothing after trimming
    pub fn is_blank(&self) -> bool {
        match self {
            Scalar::Blank => true,
            Scalar::Text(s) => s.trim().is_empty(),
            Scalar::Number(_) => false,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(s) => f.write_str(s),
            // Shortest round-trip rendering, never exponent notation
            Scalar::Number(n) => write!(f, "{}", n),
            Scalar::Blank => Ok(()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            Scalar::Blank
        } else {
            Scalar::Text(value.to_string())
        }
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

/// Immutable 2-D grid of cells indexed by (row, column)
///
/// Rows are padded to a common width so every row has `column_count` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawGrid {
    cells: Vec<Vec<Scalar>>,
    column_count: usize,
}

static BLANK: Scalar = Scalar::Blank;

impl RawGrid {
    /// Build a grid from rows of cells, padding short rows with blanks
    pub fn from_rows(rows: Vec<Vec<Scalar>>) -> Self {
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells = rows
            .into_iter()
            .map(|mut row| {
                row.resize(column_count, Scalar::Blank);
                row
            })
            .collect();
        Self { cells, column_count }
    }

    pub fn row_count(&self) -> usize {
        self.cells.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Cell at (row, col); out-of-range positions read as blank
    pub fn cell(&self, row: usize, col: usize) -> &Scalar {
        self.cells
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&BLANK)
    }

    /// All cells of a row, or an empty slice past the last row
    pub fn row(&self, row: usize) -> &[Scalar] {
        self.cells.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Trimmed string rendering of every cell in a row, in column order
    pub fn row_strings(&self, row: usize) -> Vec<String> {
        (0..self.column_count)
            .map(|col| self.cell(row, col).trimmed())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(Scalar::Number(100.0).to_string(), "100");
        assert_eq!(Scalar::Number(1234.5).to_string(), "1234.5");
        assert_eq!(Scalar::text("  abc ").trimmed(), "abc");
        assert_eq!(Scalar::Blank.to_string(), "");
    }

    #[test]
    fn test_blankness() {
        assert!(Scalar::Blank.is_blank());
        assert!(Scalar::text("   ").is_blank());
        assert!(!Scalar::Number(0.0).is_blank());
        assert!(!Scalar::text("x").is_blank());
    }

    #[test]
    fn test_grid_padding_and_bounds() {
        let grid = RawGrid::from_rows(vec![
            vec![Scalar::from("a")],
            vec![Scalar::from("b"), Scalar::from(2.0)],
        ]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell(0, 1), &Scalar::Blank);
        assert_eq!(grid.cell(1, 1), &Scalar::Number(2.0));
        assert_eq!(grid.cell(9, 9), &Scalar::Blank);
        assert!(grid.row(9).is_empty());
        assert_eq!(grid.row_strings(1), vec!["b", "2"]);
    }
}
