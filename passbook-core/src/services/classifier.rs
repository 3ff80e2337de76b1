//! Narration classifier - counterparty of peer-to-peer payments
//!
//! Best-effort heuristic: UPI narrations are hyphen-separated with the
//! counterparty handle in the second field. Anything else has no
//! counterparty, which is the common case rather than an error.

use crate::domain::layout::UPI_PREFIX;
use crate::domain::StatementTable;

/// Counterparty of a `UPI-` narration, verbatim and untrimmed
///
/// An empty second field ("UPI-", "UPI--x") has no counterparty.
pub fn classify(narration: &str) -> Option<String> {
    if !narration.starts_with(UPI_PREFIX) {
        return None;
    }
    narration
        .split('-')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Fill in the counterparty of every transaction from its narration
pub fn enrich(table: StatementTable) -> StatementTable {
    let (extra_columns, mut transactions) = table.into_parts();
    for tx in &mut transactions {
        tx.counterparty = classify(&tx.narration);
    }
    StatementTable::new(extra_columns, transactions)
}
