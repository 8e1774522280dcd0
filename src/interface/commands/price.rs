//! # Price Command
//!
//! Handles `!price <symbol>` through the market-data capability. With no
//! feed configured the reply says so instead of inventing numbers.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::registry::{Command, CommandContext};
use crate::domain::types::Price;
use crate::strings::messages;

pub struct PriceCommand;

#[async_trait]
impl Command for PriceCommand {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        let args = ctx.args();
        let Some(symbol) = args.first() else {
            return ctx.chat.send_notification(messages::PRICE_USAGE).await;
        };
        let symbol = symbol.to_uppercase();

        match ctx.market.quote(&symbol).await {
            Ok(Some(quote)) => {
                ctx.chat
                    .send_message(&messages::market_quote(
                        &quote.symbol,
                        &quote.price.to_string(),
                        &quote.change_24h.to_string(),
                    ))
                    .await
            }
            Ok(None) => ctx.chat.send_message(&messages::quote_unavailable(&symbol)).await,
            Err(e) => {
                tracing::warn!(error = %e, %symbol, "quote lookup failed");
                ctx.chat.send_notification(messages::QUOTES_UNAVAILABLE).await
            }
        }
    }

    fn description(&self) -> &str {
        "Get market quotes"
    }

    fn price(&self) -> Price {
        Price::Free
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testutil::{MockChat, ScriptedPayments, test_context};
    use std::sync::Arc;

    #[tokio::test]
    async fn without_a_feed_the_reply_says_quotes_are_unavailable() {
        let chat = Arc::new(MockChat::new());
        let payments = Arc::new(ScriptedPayments::always_pending());
        let (ctx, _ledger) = test_context(chat.clone(), payments, "!price btc");

        PriceCommand.handle(&ctx).await.unwrap();

        assert!(chat.sent()[0].contains("BTC"));
        assert!(chat.sent()[0].contains("coming soon"));
    }

    #[tokio::test]
    async fn a_bare_price_command_gets_the_usage_line() {
        let chat = Arc::new(MockChat::new());
        let payments = Arc::new(ScriptedPayments::always_pending());
        let (ctx, _ledger) = test_context(chat.clone(), payments, "!price");

        PriceCommand.handle(&ctx).await.unwrap();

        assert!(chat.sent()[0].starts_with("Usage:"));
    }
}
