//! # Balance Command
//!
//! Handles `!balance`: the treasury's wallet balances from the payment
//! provider plus the ledger's limits and spending stats.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::registry::{Command, CommandContext};
use crate::domain::types::Price;
use crate::strings::messages;

pub struct BalanceCommand;

#[async_trait]
impl Command for BalanceCommand {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        let balances = match ctx.payments.balances().await {
            Ok(balances) => balances,
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch balances");
                return ctx.chat.send_notification(messages::BALANCES_UNAVAILABLE).await;
            }
        };

        let stats = ctx.ledger.stats();
        let mut msg = String::from("💰 **Agent Treasury**\n\n");

        if balances.is_empty() {
            msg.push_str("No funds available yet.\n");
        } else {
            for (currency, amount) in &balances {
                msg.push_str(&format!("• {currency}: {amount}\n"));
            }
        }

        msg.push_str("\n📊 **Spending Limits**\n");
        msg.push_str(&format!(
            "• Per transaction: ${}\n",
            ctx.ledger.per_transaction_limit()
        ));
        msg.push_str(&format!("• Daily budget: ${}\n", ctx.ledger.daily_budget()));
        msg.push_str(&format!("• Spent today: ${}\n", stats.spent_today));
        msg.push_str(&format!(
            "• Remaining today: ${}\n",
            ctx.ledger.daily_budget() - stats.spent_today
        ));

        match stats.last_spend {
            None => msg.push_str("\n✅ No spending yet today"),
            Some(at) => msg.push_str(&format!("\n🕐 Last spend: {}", at.format("%H:%M UTC"))),
        }

        ctx.chat.send_message(&msg).await
    }

    fn description(&self) -> &str {
        "Check my treasury and spending limits"
    }

    fn price(&self) -> Price {
        Price::Free
    }
}
