//! Fixed layout of the supported statement export
//!
//! The export is a single sheet: a free-text preamble, a marker row, the
//! column header, another marker row, the transaction body, a third marker
//! row and a closing summary. Everything here is a compile-time constant.

use serde::{Deserialize, Serialize};

/// Character repeated to form a marker row
pub const MARKER_CHAR: char = '*';

/// Minimum run of consecutive marker characters in a cell
pub const MARKER_RUN: usize = 5;

/// Textual format of the date and value date cells (e.g. "05/03/24")
pub const DATE_FORMAT: &str = "%d/%m/%y";

/// Currency tokens stripped from amount cells, including the mis-decoded
/// (UTF-8 read as Windows-1252) rendering of the rupee sign
pub const CURRENCY_TOKENS: [&str; 2] = ["\u{20b9}", "\u{e2}\u{201a}\u{b9}"];

/// Narration prefix of structured peer-to-peer payments
pub const UPI_PREFIX: &str = "UPI-";

/// The marker substring a cell must contain
pub fn marker_pattern() -> String {
    MARKER_CHAR.to_string().repeat(MARKER_RUN)
}

/// Required transaction columns, in statement order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementColumn {
    Date,
    Narration,
    Reference,
    ValueDate,
    WithdrawalAmount,
    DepositAmount,
    ClosingBalance,
}

impl StatementColumn {
    pub const ALL: [StatementColumn; 7] = [
        StatementColumn::Date,
        StatementColumn::Narration,
        StatementColumn::Reference,
        StatementColumn::ValueDate,
        StatementColumn::WithdrawalAmount,
        StatementColumn::DepositAmount,
        StatementColumn::ClosingBalance,
    ];

    /// Header text as printed in the statement (case and whitespace exact)
    pub fn header(&self) -> &'static str {
        match self {
            StatementColumn::Date => "Date",
            StatementColumn::Narration => "Narration",
            StatementColumn::Reference => "Chq./Ref.No.",
            StatementColumn::ValueDate => "Value Dt",
            StatementColumn::WithdrawalAmount => "Withdrawal Amt.",
            StatementColumn::DepositAmount => "Deposit Amt.",
            StatementColumn::ClosingBalance => "Closing Balance",
        }
    }

    /// Field name used in the normalized export
    pub fn field_name(&self) -> &'static str {
        match self {
            StatementColumn::Date => "date",
            StatementColumn::Narration => "narration",
            StatementColumn::Reference => "reference",
            StatementColumn::ValueDate => "value_date",
            StatementColumn::WithdrawalAmount => "withdrawal_amount",
            StatementColumn::DepositAmount => "deposit_amount",
            StatementColumn::ClosingBalance => "closing_balance",
        }
    }

    /// Whether the header text names a required column
    pub fn is_required_header(header: &str) -> bool {
        Self::ALL.iter().any(|c| c.header() == header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_pattern() {
        assert_eq!(marker_pattern(), "*****");
    }

    #[test]
    fn test_mis_decoded_rupee_token() {
        // UTF-8 bytes of the rupee sign read back as Windows-1252
        assert_eq!(CURRENCY_TOKENS[1], "â‚¹");
    }

    #[test]
    fn test_required_headers_are_exact() {
        assert!(StatementColumn::is_required_header("Value Dt"));
        assert!(!StatementColumn::is_required_header("value dt"));
        assert!(!StatementColumn::is_required_header(" Value Dt"));
    }
}
