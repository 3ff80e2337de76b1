//! Legacy Excel (.xls) grid source backed by calamine

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Range, Reader, Xls};
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{RawGrid, Scalar};
use crate::ports::GridSource;

/// Reads the first sheet of a binary .xls workbook
pub struct XlsGridSource {
    path: PathBuf,
}

impl XlsGridSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl GridSource for XlsGridSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load_grid(&self) -> Result<RawGrid> {
        let mut workbook: Xls<_> = open_workbook(&self.path).map_err(|e| {
            Error::format(format!("Failed to open {} as .xls: {}", self.path.display(), e))
        })?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::format(format!("{} has no sheets", self.path.display())))?
            .map_err(|e| Error::format(format!("Failed to read first sheet: {}", e)))?;

        let grid = grid_from_range(&range);
        debug!(
            rows = grid.row_count(),
            columns = grid.column_count(),
            "loaded workbook grid"
        );
        Ok(grid)
    }
}

/// Convert a decoded sheet into a grid anchored at A1
///
/// calamine ranges start at the first used cell; leading empty rows and
/// columns are restored so row indices match the sheet.
pub fn grid_from_range(range: &Range<Data>) -> RawGrid {
    let Some((start_row, start_col)) = range.start() else {
        return RawGrid::default();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);
    let (height, width) = range.get_size();

    let mut rows = vec![vec![Scalar::Blank; start_col + width]; start_row + height];
    for (row, col, value) in range.cells() {
        rows[start_row + row][start_col + col] = scalar_from_data(value);
    }

    RawGrid::from_rows(rows)
}

/// Map a calamine cell onto the three-way scalar
fn scalar_from_data(value: &Data) -> Scalar {
    match value {
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::Text(s.clone()),
        Data::Float(f) => Scalar::Number(*f),
        Data::Int(i) => Scalar::Number(*i as f64),
        Data::Bool(b) => Scalar::Number(if *b { 1.0 } else { 0.0 }),
        // Serial day number, the way the sheet stores it
        Data::DateTime(dt) => Scalar::Number(dt.as_f64()),
        Data::Error(e) => Scalar::Text(format!("#ERR:{}", e)),
        Data::Empty => Scalar::Blank,
    }
}
