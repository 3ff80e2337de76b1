//! CLI command implementations

pub mod analyze;
pub mod counterparties;
pub mod export;
pub mod transactions;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tracing::debug;

use passbook_core::config::default_passbook_dir;
use passbook_core::{OperationResult, PassbookContext, StatementTable};

/// Get the passbook directory from environment or default
pub fn get_passbook_dir() -> Result<PathBuf> {
    default_passbook_dir().ok_or_else(|| anyhow!("Could not find home directory; set PASSBOOK_DIR"))
}

/// Build the passbook context from the user's settings
///
/// The directory is not created; a missing settings file means defaults.
pub fn get_context() -> Result<PassbookContext> {
    let passbook_dir = get_passbook_dir()?;
    debug!(dir = %passbook_dir.display(), "loading settings");
    PassbookContext::new(&passbook_dir)
        .with_context(|| format!("Failed to load settings from {:?}", passbook_dir))
}

/// Parse the statement at `file`, or the bytes on stdin when `file` is `-`,
/// writing its export to `export_to` when given
pub fn load_statement(
    ctx: &PassbookContext,
    file: &Path,
    export_to: Option<&Path>,
) -> passbook_core::domain::result::Result<StatementTable> {
    if file == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        ctx.statement_service.process_upload(&bytes, export_to)
    } else {
        ctx.statement_service.process(file, export_to)
    }
}

/// Print a JSON envelope; a failed envelope also fails the command
pub fn print_json<T: Serialize>(result: OperationResult<T>) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&result)?);
    if result.success {
        Ok(())
    } else {
        Err(anyhow!(result.error.unwrap_or_else(|| "command failed".to_string())))
    }
}
