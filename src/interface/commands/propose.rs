//! # Propose Command
//!
//! Handles `!propose <idea>`: asks the pricer for a quote on a custom
//! service and replies with the recommended price and its reasoning.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::registry::{Command, CommandContext};
use crate::domain::types::Price;
use crate::strings::messages;

pub struct ProposeCommand;

#[async_trait]
impl Command for ProposeCommand {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        let args = ctx.args();
        if args.is_empty() {
            return ctx.chat.send_notification(messages::PROPOSE_USAGE).await;
        }
        let idea = args.join(" ");

        let quote = ctx.pricer.propose(&idea).await;
        ctx.chat
            .send_message(&messages::proposal(
                &idea,
                &quote.price.to_string(),
                &quote.reasoning,
            ))
            .await?;

        tracing::info!(sender = %ctx.sender, price = %quote.price, "custom service proposed");
        Ok(())
    }

    fn description(&self) -> &str {
        "I propose a price for a custom service"
    }

    fn price(&self) -> Price {
        Price::Variable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testutil::{MockChat, ScriptedPayments, test_context};
    use std::sync::Arc;

    #[tokio::test]
    async fn a_proposal_carries_price_and_reasoning() {
        let chat = Arc::new(MockChat::new());
        let payments = Arc::new(ScriptedPayments::always_pending());
        let (ctx, _ledger) = test_context(chat.clone(), payments, "!propose scrape shop prices");

        ProposeCommand.handle(&ctx).await.unwrap();

        let sent = chat.sent();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("scrape shop prices"));
        assert!(sent[0].contains("Recommended price:"));
        assert!(sent[0].contains("Reasoning:"));
    }

    #[tokio::test]
    async fn a_bare_propose_gets_the_usage_line() {
        let chat = Arc::new(MockChat::new());
        let payments = Arc::new(ScriptedPayments::always_pending());
        let (ctx, _ledger) = test_context(chat.clone(), payments, "!propose");

        ProposeCommand.handle(&ctx).await.unwrap();

        assert!(chat.sent()[0].starts_with("Usage:"));
    }
}
