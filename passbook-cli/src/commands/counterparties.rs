//! Counterparties command - UPI payees and payers by activity

use std::path::Path;

use anyhow::Result;
use comfy_table::Cell;

use passbook_core::services::analysis::counterparty_activity;
use passbook_core::OperationResult;

use super::{get_context, load_statement, print_json};
use crate::output::{self, amount_cell, create_table, signed_amount};

pub fn run(file: &Path, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let top = ctx.config.display.top_counterparties;
    let activity = load_statement(&ctx, file, None).map(|table| counterparty_activity(&table));

    if json {
        let result = OperationResult::from(activity).with_context("source", file.display().to_string());
        return print_json(result);
    }

    let activity = activity?;
    if activity.is_empty() {
        output::warning("No UPI counterparties in this statement.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Counterparty", "Transactions", "Paid", "Received", "Net"]);
    for entry in activity.iter().take(top) {
        table.add_row(vec![
            Cell::new(&entry.counterparty),
            Cell::new(entry.transaction_count),
            amount_cell(Some(entry.withdrawals.sum)),
            amount_cell(Some(entry.deposits.sum)),
            Cell::new(signed_amount(entry.net)),
        ]);
    }
    println!("{}", table);

    if activity.len() > top {
        println!("{} more counterparties not shown (display.topCounterparties = {})", activity.len() - top, top);
    }

    Ok(())
}
