//! Grid source port
//!
//! Anything that can hand the parser a fully loaded cell grid: a decoded
//! workbook on disk, an uploaded byte buffer, or an in-memory grid in tests.

use crate::domain::result::Result;
use crate::domain::RawGrid;

/// Source of a statement's raw cell grid
pub trait GridSource {
    /// Human-readable description of the source (file name, "upload", ...)
    fn describe(&self) -> String;

    /// Read the source to completion and return its first sheet
    fn load_grid(&self) -> Result<RawGrid>;
}

impl GridSource for RawGrid {
    fn describe(&self) -> String {
        format!("in-memory grid ({}x{})", self.row_count(), self.column_count())
    }

    fn load_grid(&self) -> Result<RawGrid> {
        Ok(self.clone())
    }
}
