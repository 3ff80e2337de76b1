//! Export command - write normalized transactions as delimited text

use std::path::Path;

use anyhow::{Context, Result};

use super::{get_context, load_statement};
use crate::output;

pub fn run(file: &Path, output_path: &Path) -> Result<()> {
    let ctx = get_context()?;
    let table = load_statement(&ctx, file, Some(output_path))
        .with_context(|| format!("Failed to export {:?} to {:?}", file, output_path))?;

    let delimiter = ctx.statement_service.export_options().delimiter as char;
    output::success(&format!(
        "Exported {} transactions to {} (delimiter {:?})",
        table.len(),
        output_path.display(),
        delimiter
    ));
    Ok(())
}
