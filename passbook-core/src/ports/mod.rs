//! Port definitions (trait interfaces)
//!
//! Ports define the boundary between the parsing core and the spreadsheet
//! decoding it depends on.

mod grid_source;

pub use grid_source::GridSource;
