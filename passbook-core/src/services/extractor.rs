//! Transaction extractor - raw body rows between marker rows

use std::ops::Range;

use tracing::debug;

use crate::domain::{RawGrid, Scalar};

/// One untyped body row with its position in the source grid
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// Absolute row index in the grid
    pub index: usize,
    pub cells: Vec<Scalar>,
}

impl RawRow {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(Scalar::is_blank)
    }
}

/// Rectangular table of raw body rows under header-derived column names
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Pair extracted rows with the header, padding or truncating each row
    /// to the header width
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.cells.resize(width, Scalar::Blank);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Drop fully blank rows, then fully blank columns (with their names)
    ///
    /// The order is fixed: rows first, then columns.
    pub fn cleaned(mut self) -> Self {
        self.rows.retain(|row| !row.is_blank());

        let keep: Vec<bool> = (0..self.columns.len())
            .map(|col| self.rows.iter().any(|row| !row.cells[col].is_blank()))
            .collect();

        if keep.iter().all(|k| *k) {
            return self;
        }

        let dropped: Vec<&str> = self
            .columns
            .iter()
            .zip(&keep)
            .filter(|(_, k)| !**k)
            .map(|(name, _)| name.as_str())
            .collect();
        debug!(columns = ?dropped, "dropping blank columns");

        let columns = retain_flagged(self.columns, &keep);
        let rows = self
            .rows
            .into_iter()
            .map(|row| RawRow {
                index: row.index,
                cells: retain_flagged(row.cells, &keep),
            })
            .collect();

        Self { columns, rows }
    }

    /// Position of a column by exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

fn retain_flagged<T>(items: Vec<T>, keep: &[bool]) -> Vec<T> {
    items
        .into_iter()
        .zip(keep)
        .filter_map(|(item, k)| k.then_some(item))
        .collect()
}

/// Raw rows in `[body.start, body.end)` with at least one non-empty cell
///
/// Blank separator rows inside the body are skipped; order is preserved.
pub fn extract_rows(grid: &RawGrid, body: Range<usize>) -> Vec<RawRow> {
    let rows: Vec<RawRow> = body
        .filter(|&row| grid.row_strings(row).iter().any(|cell| !cell.is_empty()))
        .map(|row| RawRow {
            index: row,
            cells: grid.row(row).to_vec(),
        })
        .collect();
    debug!(rows = rows.len(), "extracted body rows");
    rows
}
