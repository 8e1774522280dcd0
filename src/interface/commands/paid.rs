//! # Paid Services
//!
//! The fixed-price service commands (`!alert`, `!summarize`, `!image`,
//! `!code`). Each validates that the treasury can afford its own cost and
//! replies with payment instructions; fulfilment happens after payment and
//! is not wired up here.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::application::registry::{Command, CommandContext};
use crate::domain::types::Price;
use crate::strings::messages;

pub struct PaidService {
    prefix: &'static str,
    title: &'static str,
    /// Short verb phrase for rejection messages ("create alert", ...).
    action: &'static str,
    syntax: &'static str,
    usage: &'static str,
    blurb: &'static str,
    cost: Decimal,
    min_args: usize,
}

impl PaidService {
    pub fn alert() -> Self {
        Self {
            prefix: "!alert",
            title: "Price Alert",
            action: "create alert",
            syntax: "!alert <symbol> <price>",
            usage: "Usage: `!alert <symbol> <price>`\nExample: `!alert BTC 50000`",
            blurb: "Set a price alert for any symbol",
            cost: dec!(0.10),
            min_args: 2,
        }
    }

    pub fn summarize() -> Self {
        Self {
            prefix: "!summarize",
            title: "Article Summary",
            action: "summarize",
            syntax: "!summarize <url>",
            usage: "Usage: `!summarize <url>`\nExample: `!summarize https://example.com/article`",
            blurb: "Summarize any article or webpage",
            cost: dec!(0.50),
            min_args: 1,
        }
    }

    pub fn image() -> Self {
        Self {
            prefix: "!image",
            title: "Image Generation",
            action: "generate image",
            syntax: "!image <prompt>",
            usage: "Usage: `!image <prompt>`\nExample: `!image a lighthouse in a thunderstorm`",
            blurb: "Generate images from text prompts",
            cost: dec!(0.75),
            min_args: 1,
        }
    }

    pub fn code() -> Self {
        Self {
            prefix: "!code",
            title: "Code Generation",
            action: "generate code",
            syntax: "!code <description>",
            usage: "Usage: `!code <description>`\nExample: `!code a function that parses RFC 3339 dates`",
            blurb: "Generate code snippets from a description",
            cost: dec!(0.50),
            min_args: 1,
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn syntax(&self) -> &'static str {
        self.syntax
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }
}

#[async_trait]
impl Command for PaidService {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        let args = ctx.args();
        if args.len() < self.min_args {
            return ctx.chat.send_notification(self.usage).await;
        }

        if let Err(reason) = ctx.ledger.can_spend(self.cost) {
            return ctx
                .chat
                .send_message(&messages::rejection(self.action, &reason.to_string()))
                .await;
        }

        let detail = format!("Request: {}", args.join(" "));
        ctx.chat
            .send_message(&messages::service_instructions(
                self.title,
                &detail,
                &self.cost.to_string(),
            ))
            .await?;

        tracing::info!(service = self.prefix, sender = %ctx.sender, "service requested");
        Ok(())
    }

    fn description(&self) -> &str {
        self.blurb
    }

    fn price(&self) -> Price {
        Price::Fixed(self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testutil::{MockChat, ScriptedPayments, test_context};
    use std::sync::Arc;

    #[tokio::test]
    async fn an_affordable_service_gets_payment_instructions() {
        let chat = Arc::new(MockChat::new());
        let payments = Arc::new(ScriptedPayments::always_pending());
        let (ctx, _ledger) = test_context(chat.clone(), payments, "!alert BTC 50000");

        PaidService::alert().handle(&ctx).await.unwrap();

        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Price Alert"));
        assert!(sent[0].contains("Request: BTC 50000"));
        assert!(sent[0].contains("!pay 0.10 USDT"));
    }

    #[tokio::test]
    async fn an_exhausted_budget_turns_into_a_rejection_reply() {
        let chat = Arc::new(MockChat::new());
        let payments = Arc::new(ScriptedPayments::always_pending());
        let (ctx, ledger) = test_context(chat.clone(), payments, "!image a cat");
        for _ in 0..5 {
            ledger.record_spend(Decimal::ONE, "USDT", "drain").unwrap();
        }

        PaidService::image().handle(&ctx).await.unwrap();

        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Cannot generate image"));
        assert!(sent[0].contains("daily budget exceeded"));
        // A rejection never becomes a transaction.
        assert_eq!(ledger.stats().transaction_count, 5);
    }

    #[tokio::test]
    async fn missing_arguments_get_the_usage_line() {
        let chat = Arc::new(MockChat::new());
        let payments = Arc::new(ScriptedPayments::always_pending());
        let (ctx, _ledger) = test_context(chat.clone(), payments, "!alert BTC");

        PaidService::alert().handle(&ctx).await.unwrap();

        assert!(chat.sent()[0].starts_with("Usage:"));
    }
}
