//! Structure locator - marker rows, header row and body bounds

use std::ops::Range;

use tracing::debug;

use crate::domain::layout::marker_pattern;
use crate::domain::result::{Error, Result};
use crate::domain::{RawGrid, StatementColumn};

/// Marker rows found in a grid, in ascending row order
///
/// The first marker precedes the header row, the second opens the
/// transaction body and the third closes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionMarkers {
    rows: Vec<usize>,
}

impl SectionMarkers {
    /// Scan every row of the grid for marker cells
    pub fn scan(grid: &RawGrid) -> Self {
        let rows = find_delimiters(grid);
        debug!(markers = ?rows, "scanned marker rows");
        Self { rows }
    }

    /// The row right below the first marker
    pub fn header_row(&self) -> Result<usize> {
        self.require(2, "locate the header row")?;
        Ok(self.rows[0] + 1)
    }

    /// Rows strictly after the second marker, up to the third (exclusive)
    pub fn body_rows(&self) -> Result<Range<usize>> {
        self.require(3, "bound the transaction body")?;
        Ok(self.rows[1] + 1..self.rows[2])
    }

    fn require(&self, required: usize, purpose: &'static str) -> Result<()> {
        if self.rows.len() < required {
            return Err(Error::Structure {
                found: self.rows.len(),
                required,
                purpose,
            });
        }
        Ok(())
    }
}

/// Row indices whose trimmed cells contain a marker run, ascending
pub fn find_delimiters(grid: &RawGrid) -> Vec<usize> {
    let pattern = marker_pattern();
    (0..grid.row_count())
        .filter(|&row| {
            grid.row_strings(row)
                .iter()
                .any(|cell| cell.contains(&pattern))
        })
        .collect()
}

/// Trimmed header names of a row, one per grid column
///
/// No de-duplication and no filtering of empty names at this stage.
pub fn extract_header(grid: &RawGrid, header_row: usize) -> Vec<String> {
    grid.row_strings(header_row)
}

/// Fail with every required column the header lacks
pub fn validate_header(header: &[String]) -> Result<()> {
    let missing: Vec<String> = StatementColumn::ALL
        .iter()
        .map(|c| c.header())
        .filter(|name| !header.iter().any(|h| h.as_str() == *name))
        .map(str::to_string)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Error::Schema { missing })
    }
}

/// Find, extract and validate the header row
pub fn locate_header(grid: &RawGrid, markers: &SectionMarkers) -> Result<Vec<String>> {
    let header_row = markers.header_row()?;
    let header = extract_header(grid, header_row);
    validate_header(&header)?;
    debug!(row = header_row, columns = header.len(), "validated header row");
    Ok(header)
}
