//! Passbook Core - bank statement parsing and analysis
//!
//! This crate turns a fixed-layout spreadsheet export of a bank account
//! statement into typed transactions, following hexagonal architecture:
//!
//! - **domain**: Core entities (RawGrid, Transaction, StatementTable, etc.)
//! - **ports**: Trait definitions for external dependencies (GridSource)
//! - **services**: Parsing pipeline, analysis and export
//! - **adapters**: Concrete implementations (calamine .xls reader)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;

use anyhow::Result;

use config::Config;
use services::StatementService;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult};
pub use domain::{RawGrid, Scalar, StatementColumn, StatementSummary, StatementTable, Transaction};
pub use services::{EntryPoint, StatementAnalysis};

/// Main context for Passbook operations
///
/// Holds the loaded configuration and the services built from it. Each
/// parse builds fresh grids and tables; nothing is shared between calls.
pub struct PassbookContext {
    pub config: Config,
    pub statement_service: StatementService,
}

impl PassbookContext {
    /// Create a context from the settings in `passbook_dir`
    pub fn new(passbook_dir: &Path) -> Result<Self> {
        let config = Config::load(passbook_dir)?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        let statement_service = StatementService::new(config.clone());
        Self {
            config,
            statement_service,
        }
    }
}
