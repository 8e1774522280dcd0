//! # Domain Traits
//!
//! Abstract interfaces for the bot's external collaborators (chat transport,
//! payment provider, pricing, market data). Implementations live in the
//! Infrastructure layer; tests substitute their own.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::domain::types::{InvoiceState, MarketQuote, Quote};

/// Abstract interface for a chat provider (e.g. Matrix, Slack, Console).
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a markdown message to the room.
    async fn send_message(&self, content: &str) -> Result<()>;

    /// Send a short, untracked notification.
    async fn send_notification(&self, content: &str) -> Result<()>;

    /// Toggle the typing indicator.
    async fn typing(&self, active: bool) -> Result<()>;

    /// The room this provider is bound to.
    fn room_id(&self) -> String;
}

/// A freshly created invoice as reported by the payment provider.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    pub order_id: String,
    pub payment_url: String,
    pub address: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Current status of a tracked payment.
#[derive(Debug, Clone)]
pub struct PaymentStatus {
    pub order_id: String,
    pub state: InvoiceState,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub confirmed_at: Option<DateTime<Utc>>,
}

/// Abstract interface for the payment provider backing the treasury.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_invoice(
        &self,
        order_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<NewInvoice>;

    async fn check_payment(&self, order_id: &str) -> Result<PaymentStatus>;

    /// Wallet balances keyed by currency code.
    async fn balances(&self) -> Result<BTreeMap<String, Decimal>>;

    async fn send_payment(&self, currency: &str, to_address: &str, amount: Decimal) -> Result<()>;
}

/// Prices a custom service request. The returned quote never exceeds the
/// treasury's per-transaction limit.
#[async_trait]
pub trait Pricer: Send + Sync {
    async fn propose(&self, service_description: &str) -> Quote;
}

/// Market quote lookup. `None` means no feed is available for the symbol.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn quote(&self, symbol: &str) -> Result<Option<MarketQuote>>;
}

/// Placeholder feed used until a real market-data integration lands.
pub struct NoMarketData;

#[async_trait]
impl MarketData for NoMarketData {
    async fn quote(&self, _symbol: &str) -> Result<Option<MarketQuote>> {
        Ok(None)
    }
}
