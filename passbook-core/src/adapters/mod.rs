//! Adapter implementations
//!
//! Concrete implementations of port traits for spreadsheet decoding.

pub mod xls;

pub use xls::XlsGridSource;
