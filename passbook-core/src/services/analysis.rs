//! Analysis service - statement insights for presentation layers

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{saturating_total, AmountTally, MonthlyActivity, StatementSummary, StatementTable};

/// Everything a dashboard needs from one statement
#[derive(Debug, Clone, Serialize)]
pub struct StatementAnalysis {
    pub summary: StatementSummary,
    pub monthly: Vec<MonthlyActivity>,
    pub balance_trend: Vec<BalancePoint>,
    pub counterparties: Vec<CounterpartyActivity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalancePoint {
    pub date: NaiveDate,
    pub closing_balance: Option<Decimal>,
}

/// Payments exchanged with one UPI counterparty
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyActivity {
    pub counterparty: String,
    pub transaction_count: usize,
    pub withdrawals: AmountTally,
    pub deposits: AmountTally,
    /// Deposits minus withdrawals
    pub net: Decimal,
}

pub fn analyze(table: &StatementTable) -> StatementAnalysis {
    StatementAnalysis {
        summary: table.summary().clone(),
        monthly: table.monthly().to_vec(),
        balance_trend: balance_trend(table),
        counterparties: counterparty_activity(table),
    }
}

/// Closing balance after each transaction, in statement order
pub fn balance_trend(table: &StatementTable) -> Vec<BalancePoint> {
    table
        .transactions()
        .iter()
        .map(|tx| BalancePoint {
            date: tx.date,
            closing_balance: tx.closing_balance,
        })
        .collect()
}

/// Per-counterparty totals, busiest first (ties by name)
pub fn counterparty_activity(table: &StatementTable) -> Vec<CounterpartyActivity> {
    let mut by_name: HashMap<&str, CounterpartyActivity> = HashMap::new();
    for tx in table.transactions() {
        let Some(name) = tx.counterparty.as_deref() else {
            continue;
        };
        let entry = by_name.entry(name).or_insert_with(|| CounterpartyActivity {
            counterparty: name.to_string(),
            transaction_count: 0,
            withdrawals: AmountTally::default(),
            deposits: AmountTally::default(),
            net: Decimal::ZERO,
        });
        entry.transaction_count += 1;
        entry.withdrawals.add(tx.withdrawal_amount);
        entry.deposits.add(tx.deposit_amount);
        entry.net = saturating_total(entry.net, tx.net_amount());
    }

    let mut activity: Vec<CounterpartyActivity> = by_name.into_values().collect();
    activity.sort_by(|a, b| {
        b.transaction_count
            .cmp(&a.transaction_count)
            .then_with(|| a.counterparty.cmp(&b.counterparty))
    });
    activity
}
