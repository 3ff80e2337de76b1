//! Analyze command - statement summary and monthly activity

use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};

use passbook_core::services::analyze;
use passbook_core::OperationResult;

use super::{get_context, load_statement, print_json};
use crate::output::{self, amount_cell, create_table, format_amount, signed_amount};

pub fn run(file: &Path, json: bool, export_to: Option<&Path>) -> Result<()> {
    let ctx = get_context()?;
    let loaded = load_statement(&ctx, file, export_to);

    if json {
        let mut result = OperationResult::from(loaded.map(|table| analyze(&table)))
            .with_context("source", file.display().to_string());
        if let Some(out) = export_to {
            result = result.with_context("export", out.display().to_string());
        }
        return print_json(result);
    }

    let table = loaded?;
    let analysis = analyze(&table);
    let summary = &analysis.summary;

    println!("{}", "Statement Summary".bold());
    println!();

    let mut totals = Table::new();
    totals.set_content_arrangement(ContentArrangement::Dynamic);
    totals.add_row(vec!["Transactions".to_string(), summary.transaction_count.to_string()]);
    totals.add_row(vec!["Total withdrawals".to_string(), format_amount(summary.total_withdrawals)]);
    totals.add_row(vec!["Total deposits".to_string(), format_amount(summary.total_deposits)]);
    totals.add_row(vec![
        "Final balance".to_string(),
        summary.final_balance.map(format_amount).unwrap_or_else(|| "-".to_string()),
    ]);
    println!("{}", totals);
    println!();

    if let Some(range) = &summary.date_range {
        println!("Date range: {} to {}", range.earliest, range.latest);
        println!();
    }

    if analysis.monthly.is_empty() {
        output::warning("No transactions found in the statement body.");
    } else {
        println!("{}", "Monthly Activity".bold());
        let mut monthly = create_table();
        monthly.set_header(vec!["Month", "Withdrawals", "Count", "Deposits", "Count", "Net"]);
        for month in &analysis.monthly {
            monthly.add_row(vec![
                Cell::new(month.month.to_string()),
                amount_cell(Some(month.withdrawals.sum)),
                Cell::new(month.withdrawals.count),
                amount_cell(Some(month.deposits.sum)),
                Cell::new(month.deposits.count),
                Cell::new(signed_amount(month.deposits.sum.saturating_sub(month.withdrawals.sum))),
            ]);
        }
        println!("{}", monthly);
    }

    let top = ctx.config.display.top_counterparties;
    if !analysis.counterparties.is_empty() && top > 0 {
        println!();
        println!("{}", "Top Counterparties".bold());
        let mut parties = create_table();
        parties.set_header(vec!["Counterparty", "Transactions", "Net"]);
        for entry in analysis.counterparties.iter().take(top) {
            parties.add_row(vec![
                Cell::new(&entry.counterparty),
                Cell::new(entry.transaction_count),
                Cell::new(signed_amount(entry.net)),
            ]);
        }
        println!("{}", parties);
    }

    if let Some(out) = export_to {
        println!();
        output::success(&format!("Exported {} transactions to {}", table.len(), out.display()));
    }

    Ok(())
}
