//! # Domain Types
//!
//! Common data structures shared across the application logic: ledger records,
//! invoice tracking, and service pricing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether a transaction moved money out of the treasury or into it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Spend,
    Earn,
}

/// An immutable ledger record. Rejected spend attempts never become
/// transactions, so `approved` is always true once a record exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: u64,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub approved: bool,
}

/// Aggregate view over the transaction log.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingStats {
    pub spent_today: Decimal,
    pub spent_total: Decimal,
    pub earned_total: Decimal,
    pub transaction_count: usize,
    pub last_spend: Option<DateTime<Utc>>,
}

/// A payment request tracked through its lifecycle by order id.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub order_id: String,
    pub amount: Decimal,
    pub currency: String,
    pub created_at: DateTime<Utc>,
}

/// Invoice lifecycle. `Confirmed` and `Expired` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceState {
    Pending,
    Confirmed,
    Expired,
}

impl std::fmt::Display for InvoiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Confirmed => write!(f, "confirmed"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// What a command costs the treasury to fulfil.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Price {
    Free,
    Fixed(Decimal),
    /// Priced per request, e.g. by the [`Pricer`](crate::domain::traits::Pricer).
    Variable,
}

/// A pricing proposal for a custom service request.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub price: Decimal,
    pub reasoning: String,
}

/// A market quote for a ticker symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketQuote {
    pub symbol: String,
    pub price: Decimal,
    pub change_24h: Decimal,
}
