//! Service layer - statement parsing and analysis
//!
//! Each module covers one stage of the pipeline: locate the document
//! structure, extract the raw body, normalize fields, classify narrations,
//! then analyze or export the resulting table.

pub mod analysis;
pub mod classifier;
pub mod export;
pub mod extractor;
pub mod locator;
pub mod logging;
pub mod normalizer;
mod statement;

pub use analysis::{analyze, BalancePoint, CounterpartyActivity, StatementAnalysis};
pub use export::{read_export, read_export_path, write_export, ExportOptions};
pub use logging::{init_logging, EntryPoint};
pub use statement::{parse_grid, StatementService};
