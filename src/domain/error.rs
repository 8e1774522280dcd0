//! # Ledger Errors
//!
//! Typed rejection outcomes for spend authorization. These are returned as
//! values so handlers can branch on them; the `Display` text is what gets
//! shown to the requester.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    #[error("amount ${amount} exceeds the per-transaction limit of ${limit}")]
    LimitExceeded { amount: Decimal, limit: Decimal },

    #[error(
        "daily budget exceeded: spent ${spent_today} of ${budget} today, requested ${requested}"
    )]
    BudgetExceeded {
        spent_today: Decimal,
        budget: Decimal,
        requested: Decimal,
    },

    #[error("amount must not be negative")]
    InvalidAmount,
}
