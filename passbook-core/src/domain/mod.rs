//! Core domain entities
//!
//! All statement entities are defined here. These are pure data structures
//! with derivation logic - no I/O or external dependencies.

mod grid;
pub mod layout;
pub mod result;
mod statement;
mod transaction;

pub use grid::{RawGrid, Scalar};
pub use layout::StatementColumn;
pub use statement::{
    saturating_total, AmountTally, DateRange, MonthlyActivity, StatementMonth, StatementSummary,
    StatementTable,
};
pub use transaction::Transaction;
