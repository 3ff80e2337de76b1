//! Field normalizer - raw cells to typed transaction fields
//!
//! Dates are strict: a cell that is not `dd/mm/yy` aborts the parse, since
//! ordering and monthly grouping depend on it. Amounts are lenient: anything
//! that does not clean up into a number becomes "no value" for that field
//! alone.

use std::str::FromStr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::layout::{CURRENCY_TOKENS, DATE_FORMAT};
use crate::domain::result::{Error, Result};
use crate::domain::{Scalar, StatementColumn, StatementTable, Transaction};
use crate::services::extractor::{RawRow, RawTable};

/// Thousands separators and currency tokens
static AMOUNT_NOISE: Lazy<Regex> = Lazy::new(|| {
    let tokens: Vec<String> = CURRENCY_TOKENS.iter().map(|t| regex::escape(t)).collect();
    Regex::new(&format!(",|{}", tokens.join("|"))).expect("amount noise pattern is valid")
});

/// Parse a `dd/mm/yy` date; no other format is attempted
pub fn parse_statement_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

/// Parse an amount cell, stripping separators and currency tokens
///
/// Returns None for empty, whitespace-only or non-numeric input.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let cleaned = AMOUNT_NOISE.replace_all(value, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(cleaned)
        .or_else(|_| Decimal::from_scientific(cleaned))
        .ok()
}

/// Column positions of the required fields in a cleaned raw table
///
/// A required column may be absent here when the blank-column cleanup
/// removed it; its fields then read as blank.
struct ColumnIndex {
    positions: [Option<usize>; 7],
    extras: Vec<usize>,
}

impl ColumnIndex {
    fn new(raw: &RawTable) -> Self {
        let mut positions = [None; 7];
        for (slot, column) in positions.iter_mut().zip(StatementColumn::ALL) {
            *slot = raw.column_index(column.header());
        }
        let extras = raw
            .columns
            .iter()
            .enumerate()
            .filter(|(_, name)| !StatementColumn::is_required_header(name))
            .map(|(i, _)| i)
            .collect();
        Self { positions, extras }
    }

    fn cell<'a>(&self, row: &'a RawRow, column: StatementColumn) -> Option<&'a Scalar> {
        let slot = StatementColumn::ALL.iter().position(|c| *c == column)?;
        self.positions[slot].and_then(|i| row.cells.get(i))
    }
}

/// Convert a cleaned raw table into typed transactions (no counterparty yet)
pub fn normalize(raw: &RawTable) -> Result<StatementTable> {
    let index = ColumnIndex::new(raw);
    let extra_columns: Vec<String> = index.extras.iter().map(|&i| raw.columns[i].clone()).collect();

    let mut coerced = 0usize;
    let mut transactions = Vec::with_capacity(raw.rows.len());
    for row in &raw.rows {
        let mut amount = |column: StatementColumn| {
            let (value, was_coerced) = amount_field(&index, row, column);
            coerced += usize::from(was_coerced);
            value
        };
        let withdrawal_amount = amount(StatementColumn::WithdrawalAmount);
        let deposit_amount = amount(StatementColumn::DepositAmount);
        let closing_balance = amount(StatementColumn::ClosingBalance);

        transactions.push(Transaction {
            date: date_field(&index, row, StatementColumn::Date)?,
            narration: text_field(&index, row, StatementColumn::Narration).unwrap_or_default(),
            reference: text_field(&index, row, StatementColumn::Reference),
            value_date: date_field(&index, row, StatementColumn::ValueDate)?,
            withdrawal_amount,
            deposit_amount,
            closing_balance,
            extra: index
                .extras
                .iter()
                .map(|&i| non_empty(row.cells[i].trimmed()))
                .collect(),
            counterparty: None,
        });
    }

    debug!(
        transactions = transactions.len(),
        coerced_amounts = coerced,
        "normalized statement rows"
    );
    Ok(StatementTable::new(extra_columns, transactions))
}

fn date_field(index: &ColumnIndex, row: &RawRow, column: StatementColumn) -> Result<NaiveDate> {
    let value = index.cell(row, column).map(Scalar::trimmed).unwrap_or_default();
    parse_statement_date(&value).ok_or_else(|| Error::Parse {
        row: row.index,
        column: column.header().to_string(),
        value,
    })
}

/// Amount value and whether a non-empty cell was coerced to "no value"
fn amount_field(index: &ColumnIndex, row: &RawRow, column: StatementColumn) -> (Option<Decimal>, bool) {
    let Some(cell) = index.cell(row, column) else {
        return (None, false);
    };
    let text = cell.trimmed();
    match parse_amount(&text) {
        Some(value) => (Some(value), false),
        None if AMOUNT_NOISE.replace_all(&text, "").trim().is_empty() => (None, false),
        None => {
            warn!(row = row.index, column = column.header(), "non-numeric amount treated as no value");
            (None, true)
        }
    }
}

fn text_field(index: &ColumnIndex, row: &RawRow, column: StatementColumn) -> Option<String> {
    index.cell(row, column).and_then(|cell| non_empty(cell.trimmed()))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
