//! Statement service - end-to-end parse of a statement document

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::adapters::XlsGridSource;
use crate::config::Config;
use crate::domain::result::Result;
use crate::domain::{RawGrid, StatementTable};
use crate::ports::GridSource;
use crate::services::classifier;
use crate::services::export::{self, ExportOptions};
use crate::services::extractor::{extract_rows, RawTable};
use crate::services::locator::{locate_header, SectionMarkers};
use crate::services::normalizer::normalize;

/// Parse a loaded grid into an enriched statement table
///
/// Header problems are reported before body problems: a document with two
/// markers and a bad header fails with the schema error.
pub fn parse_grid(grid: &RawGrid) -> Result<StatementTable> {
    let markers = SectionMarkers::scan(grid);
    let header = locate_header(grid, &markers)?;
    let body = markers.body_rows()?;
    debug!(start = body.start, end = body.end, "transaction body bounds");

    let raw = RawTable::new(header, extract_rows(grid, body)).cleaned();
    let table = classifier::enrich(normalize(&raw)?);
    info!(transactions = table.len(), "parsed statement");
    Ok(table)
}

/// Statement service for loading and exporting statements
pub struct StatementService {
    config: Config,
}

impl StatementService {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn export_options(&self) -> &ExportOptions {
        &self.config.export
    }

    /// Load and parse a statement from any grid source
    pub fn load(&self, source: &dyn GridSource) -> Result<StatementTable> {
        debug!(source = %source.describe(), "loading statement");
        let grid = source.load_grid()?;
        parse_grid(&grid)
    }

    /// Load and parse a .xls statement on disk
    pub fn load_file(&self, path: &Path) -> Result<StatementTable> {
        self.load(&XlsGridSource::new(path))
    }

    /// Parse uploaded statement bytes
    pub fn load_upload(&self, bytes: &[u8]) -> Result<StatementTable> {
        self.process_upload(bytes, None)
    }

    /// Parse a statement and, when `export_to` is given, write its export
    pub fn process(&self, path: &Path, export_to: Option<&Path>) -> Result<StatementTable> {
        self.process_source(&XlsGridSource::new(path), export_to)
    }

    /// `process` for uploaded bytes
    ///
    /// The bytes are staged in a named temp file which is removed when this
    /// returns, whether or not parsing succeeded.
    pub fn process_upload(&self, bytes: &[u8], export_to: Option<&Path>) -> Result<StatementTable> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("passbook-upload-").suffix(".xls");
        let mut staged = match &self.config.staging_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        staged.write_all(bytes)?;
        staged.flush()?;
        debug!(path = %staged.path().display(), bytes = bytes.len(), "staged upload");

        self.process_source(&XlsGridSource::new(staged.path()), export_to)
    }

    /// `process` for any grid source
    pub fn process_source(&self, source: &dyn GridSource, export_to: Option<&Path>) -> Result<StatementTable> {
        let table = self.load(source)?;
        if let Some(out) = export_to {
            self.export(&table, out)?;
        }
        Ok(table)
    }

    /// Write a table's export using the configured options
    pub fn export(&self, table: &StatementTable, path: &Path) -> Result<()> {
        export::export_to_path(table, path, &self.config.export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Error;
    use crate::domain::{Scalar, StatementColumn};

    fn row(cells: &[&str]) -> Vec<Scalar> {
        cells.iter().map(|c| Scalar::from(*c)).collect()
    }

    fn header_row() -> Vec<Scalar> {
        StatementColumn::ALL.iter().map(|c| Scalar::from(c.header())).collect()
    }

    #[test]
    fn test_header_checked_before_body() {
        let grid = RawGrid::from_rows(vec![
            row(&["*****"]),
            row(&["Date", "Narration"]),
            row(&["*****"]),
        ]);
        assert!(matches!(parse_grid(&grid), Err(Error::Schema { .. })));
    }

    #[test]
    fn test_two_markers_cannot_bound_body() {
        let grid = RawGrid::from_rows(vec![
            row(&["*****"]),
            header_row(),
            row(&["*****"]),
            row(&["01/01/24", "x", "", "01/01/24", "1", "", "9"]),
        ]);
        assert!(matches!(
            parse_grid(&grid),
            Err(Error::Structure { found: 2, required: 3, .. })
        ));
    }

    #[test]
    fn test_single_marker() {
        let grid = RawGrid::from_rows(vec![row(&["HDFC BANK"]), row(&["*****"])]);
        assert!(matches!(
            parse_grid(&grid),
            Err(Error::Structure { found: 1, required: 2, .. })
        ));
    }

    #[test]
    fn test_process_source_writes_export() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let out = temp_dir.path().join("statement.csv");
        let grid = RawGrid::from_rows(vec![
            row(&["*****"]),
            header_row(),
            row(&["*****"]),
            row(&["03/02/24", "UPI-CAFE-77-ybl", "", "03/02/24", "120.50", "", "879.50"]),
            row(&["*****"]),
        ]);

        let service = StatementService::new(Config::default());
        let table = service.process_source(&grid, Some(&out)).unwrap();
        assert_eq!(table.len(), 1);

        let written = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2024-02-03,UPI-CAFE-77-ybl,,2024-02-03,120.50,,879.50,CAFE");
    }

    #[test]
    fn test_process_source_without_export_target() {
        let grid = RawGrid::from_rows(vec![row(&["*****"]), header_row(), row(&["*****"]), row(&["*****"])]);
        let service = StatementService::new(Config::default());
        assert!(service.process_source(&grid, None).unwrap().is_empty());
    }

    #[test]
    fn test_failed_parse_writes_no_export() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let out = temp_dir.path().join("statement.csv");
        let grid = RawGrid::from_rows(vec![row(&["*****"])]);

        let service = StatementService::new(Config::default());
        assert!(service.process_source(&grid, Some(&out)).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn test_load_from_grid_source() {
        let grid = RawGrid::from_rows(vec![
            row(&["*****"]),
            header_row(),
            row(&["*****"]),
            row(&["01/01/24", "UPI-ALICE-1", "", "01/01/24", "10", "", "90"]),
            row(&["*****"]),
        ]);

        let service = StatementService::new(Config::default());
        let table = service.load(&grid).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.transactions()[0].counterparty.as_deref(), Some("ALICE"));
    }
}
