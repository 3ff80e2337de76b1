//! Statement table and its derived aggregates

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::Transaction;

/// Sum and count of the values present in a column
///
/// Absent values are skipped by both: a month with three transactions of
/// which two carry a withdrawal has a withdrawal count of two. A sum that
/// would leave the `Decimal` range saturates at its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AmountTally {
    pub sum: Decimal,
    pub count: usize,
}

impl AmountTally {
    pub fn add(&mut self, value: Option<Decimal>) {
        if let Some(v) = value {
            self.sum = saturating_total(self.sum, v);
            self.count += 1;
        }
    }
}

/// `a + b`, clamped to the `Decimal` range with a warning on overflow
pub fn saturating_total(a: Decimal, b: Decimal) -> Decimal {
    match a.checked_add(b) {
        Some(total) => total,
        None => {
            warn!("amount total exceeds the decimal range, saturating");
            a.saturating_add(b)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub earliest: NaiveDate,
    pub latest: NaiveDate,
}

/// Headline figures of a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementSummary {
    pub transaction_count: usize,
    /// None for an empty statement
    pub date_range: Option<DateRange>,
    pub total_withdrawals: Decimal,
    pub total_deposits: Decimal,
    /// Closing balance of the last transaction
    pub final_balance: Option<Decimal>,
}

/// Calendar month key, ordered chronologically
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatementMonth {
    pub year: i32,
    pub month: u32,
}

impl StatementMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for StatementMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyActivity {
    pub month: StatementMonth,
    pub withdrawals: AmountTally,
    pub deposits: AmountTally,
}

/// Ordered transactions of one statement plus derived aggregates
///
/// Immutable once built; rows keep their source order and are never sorted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementTable {
    extra_columns: Vec<String>,
    transactions: Vec<Transaction>,
    summary: StatementSummary,
    monthly: Vec<MonthlyActivity>,
}

impl StatementTable {
    /// Build a table and compute its aggregates
    pub fn new(extra_columns: Vec<String>, transactions: Vec<Transaction>) -> Self {
        let summary = summarize(&transactions);
        let monthly = monthly_activity(&transactions);
        Self {
            extra_columns,
            transactions,
            summary,
            monthly,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Names of the non-required source columns kept after cleanup
    pub fn extra_columns(&self) -> &[String] {
        &self.extra_columns
    }

    pub fn summary(&self) -> &StatementSummary {
        &self.summary
    }

    /// Per-month withdrawal and deposit tallies, earliest month first
    pub fn monthly(&self) -> &[MonthlyActivity] {
        &self.monthly
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Take the table apart to rebuild it with changed transactions
    pub fn into_parts(self) -> (Vec<String>, Vec<Transaction>) {
        (self.extra_columns, self.transactions)
    }
}

fn summarize(transactions: &[Transaction]) -> StatementSummary {
    let mut withdrawals = AmountTally::default();
    let mut deposits = AmountTally::default();
    for tx in transactions {
        withdrawals.add(tx.withdrawal_amount);
        deposits.add(tx.deposit_amount);
    }

    let earliest = transactions.iter().map(|t| t.date).min();
    let latest = transactions.iter().map(|t| t.date).max();
    let date_range = match (earliest, latest) {
        (Some(earliest), Some(latest)) => Some(DateRange { earliest, latest }),
        _ => None,
    };

    StatementSummary {
        transaction_count: transactions.len(),
        date_range,
        total_withdrawals: withdrawals.sum,
        total_deposits: deposits.sum,
        final_balance: transactions.last().and_then(|t| t.closing_balance),
    }
}

fn monthly_activity(transactions: &[Transaction]) -> Vec<MonthlyActivity> {
    let mut months: BTreeMap<StatementMonth, (AmountTally, AmountTally)> = BTreeMap::new();
    for tx in transactions {
        let entry = months.entry(StatementMonth::of(tx.date)).or_default();
        entry.0.add(tx.withdrawal_amount);
        entry.1.add(tx.deposit_amount);
    }

    months
        .into_iter()
        .map(|(month, (withdrawals, deposits))| MonthlyActivity {
            month,
            withdrawals,
            deposits,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(date: (i32, u32, u32), withdrawal: Option<i64>, deposit: Option<i64>, balance: i64) -> Transaction {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        let mut t = Transaction::new(date, date);
        t.withdrawal_amount = withdrawal.map(|v| Decimal::new(v, 2));
        t.deposit_amount = deposit.map(|v| Decimal::new(v, 2));
        t.closing_balance = Some(Decimal::new(balance, 2));
        t
    }

    #[test]
    fn test_summary() {
        let table = StatementTable::new(
            vec![],
            vec![
                tx((2024, 3, 5), Some(10000), None, 90000),
                tx((2024, 2, 28), None, Some(5050), 95050),
                tx((2024, 4, 1), Some(2500), None, 92550),
            ],
        );

        let summary = table.summary();
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.total_withdrawals, Decimal::new(12500, 2));
        assert_eq!(summary.total_deposits, Decimal::new(5050, 2));
        // Last in source order, not the latest date
        assert_eq!(summary.final_balance, Some(Decimal::new(92550, 2)));

        let range = summary.date_range.unwrap();
        assert_eq!(range.earliest, NaiveDate::from_ymd_opt(2024, 2, 28).unwrap());
        assert_eq!(range.latest, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
    }

    #[test]
    fn test_empty_statement_summary() {
        let table = StatementTable::new(vec![], vec![]);
        assert!(table.is_empty());
        assert_eq!(table.summary().date_range, None);
        assert_eq!(table.summary().total_withdrawals, Decimal::ZERO);
        assert_eq!(table.summary().final_balance, None);
        assert!(table.monthly().is_empty());
    }

    #[test]
    fn test_tally_saturates_instead_of_overflowing() {
        let huge = Decimal::from_str_exact("10000000000000000000000000000").unwrap();
        let mut tally = AmountTally::default();
        for _ in 0..9 {
            tally.add(Some(huge));
        }
        assert_eq!(tally.sum, Decimal::MAX);
        assert_eq!(tally.count, 9);

        tally.add(Some(-huge));
        assert_eq!(tally.sum, Decimal::MAX - huge);
    }

    #[test]
    fn test_monthly_counts_present_values_only() {
        let table = StatementTable::new(
            vec![],
            vec![
                tx((2024, 3, 20), Some(100), None, 0),
                tx((2024, 2, 1), Some(300), None, 0),
                tx((2024, 3, 5), Some(200), None, 0),
                tx((2024, 3, 9), None, Some(1000), 0),
            ],
        );

        let monthly = table.monthly();
        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].month.to_string(), "2024-02");
        assert_eq!(monthly[1].month.to_string(), "2024-03");

        assert_eq!(monthly[1].withdrawals.count, 2);
        assert_eq!(monthly[1].withdrawals.sum, Decimal::new(300, 2));
        assert_eq!(monthly[1].deposits.count, 1);
        assert_eq!(monthly[0].deposits, AmountTally::default());
    }
}
