//! Transactions command - list parsed statement rows

use std::path::Path;

use anyhow::Result;
use comfy_table::Cell;
use serde::Serialize;

use passbook_core::{OperationResult, Transaction};

use super::{get_context, load_statement, print_json};
use crate::output::{self, amount_cell, create_table};

pub fn run(file: &Path, limit: Option<usize>, counterparty: Option<&str>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let limit = limit.unwrap_or(ctx.config.display.transaction_limit);

    let selected = load_statement(&ctx, file, None).map(|table| {
        let (_, transactions) = table.into_parts();
        select(transactions, counterparty, limit)
    });

    if json {
        let mut result = OperationResult::from(selected)
            .with_context("source", file.display().to_string())
            .with_context("limit", limit);
        if let Some(name) = counterparty {
            result = result.with_context("counterparty", name);
        }
        return print_json(result);
    }

    let page = selected?;
    if page.transactions.is_empty() {
        output::warning("No matching transactions.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Date", "Narration", "Ref", "Withdrawal", "Deposit", "Balance"]);
    for tx in &page.transactions {
        table.add_row(vec![
            Cell::new(tx.date.format("%Y-%m-%d")),
            Cell::new(&tx.narration),
            Cell::new(tx.reference.as_deref().unwrap_or("")),
            amount_cell(tx.withdrawal_amount),
            amount_cell(tx.deposit_amount),
            amount_cell(tx.closing_balance),
        ]);
    }
    println!("{}", table);

    if page.total > page.transactions.len() {
        println!(
            "Showing {} of {} transactions (use --limit to see more)",
            page.transactions.len(),
            page.total
        );
    }

    Ok(())
}

/// Matching transactions, capped at the display limit
#[derive(Debug, Serialize)]
struct TransactionPage {
    /// Matches before the limit was applied
    total: usize,
    transactions: Vec<Transaction>,
}

fn select(transactions: Vec<Transaction>, counterparty: Option<&str>, limit: usize) -> TransactionPage {
    let matching: Vec<Transaction> = transactions
        .into_iter()
        .filter(|tx| counterparty.map_or(true, |name| tx.counterparty.as_deref() == Some(name)))
        .collect();
    let total = matching.len();
    TransactionPage {
        total,
        transactions: matching.into_iter().take(limit).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(counterparty: Option<&str>) -> Transaction {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut tx = Transaction::new(date, date);
        tx.counterparty = counterparty.map(str::to_string);
        tx
    }

    #[test]
    fn test_select_filters_then_limits() {
        let all = vec![tx(Some("ALICE")), tx(None), tx(Some("ALICE")), tx(Some("BOB"))];

        let page = select(all.clone(), Some("ALICE"), 1);
        assert_eq!(page.total, 2);
        assert_eq!(page.transactions.len(), 1);

        let page = select(all, None, 10);
        assert_eq!((page.transactions.len(), page.total), (4, 4));
    }
}
