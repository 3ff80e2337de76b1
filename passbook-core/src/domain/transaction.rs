//! Transaction domain model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single statement line, in source order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    /// Bank-supplied description, may be empty
    pub narration: String,
    /// Cheque or reference number
    pub reference: Option<String>,
    /// Settlement date, may lag `date`
    pub value_date: NaiveDate,
    pub withdrawal_amount: Option<Decimal>,
    pub deposit_amount: Option<Decimal>,
    /// Running balance after this transaction
    pub closing_balance: Option<Decimal>,
    /// Values of non-required source columns, aligned with
    /// `StatementTable::extra_columns`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra: Vec<Option<String>>,
    /// Peer-to-peer counterparty derived from the narration
    pub counterparty: Option<String>,
}

impl Transaction {
    /// Create a transaction with only its dates set
    pub fn new(date: NaiveDate, value_date: NaiveDate) -> Self {
        Self {
            date,
            narration: String::new(),
            reference: None,
            value_date,
            withdrawal_amount: None,
            deposit_amount: None,
            closing_balance: None,
            extra: Vec::new(),
            counterparty: None,
        }
    }

    /// Withdrawal amount, zero when absent
    pub fn withdrawal(&self) -> Decimal {
        self.withdrawal_amount.unwrap_or(Decimal::ZERO)
    }

    /// Deposit amount, zero when absent
    pub fn deposit(&self) -> Decimal {
        self.deposit_amount.unwrap_or(Decimal::ZERO)
    }

    /// Deposit minus withdrawal, clamped to the `Decimal` range
    pub fn net_amount(&self) -> Decimal {
        self.deposit().saturating_sub(self.withdrawal())
    }
}
