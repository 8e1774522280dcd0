//! # Payment Commands
//!
//! Handles `!pay <amount> <currency>` (create an invoice and watch it until
//! it confirms or expires) and `!status <order_id>` (one-off status check).

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::application::registry::{Command, CommandContext};
use crate::domain::types::{Invoice, InvoiceState, Price};
use crate::strings::messages;

pub struct PayCommand;

#[async_trait]
impl Command for PayCommand {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        let args = ctx.args();
        if args.len() < 2 {
            return ctx.chat.send_notification(messages::PAY_USAGE).await;
        }

        let amount = match Decimal::from_str(args[0]) {
            Ok(amount) if amount > Decimal::ZERO => amount,
            _ => return ctx.chat.send_notification(&messages::invalid_amount(args[0])).await,
        };
        let currency = args[1].to_uppercase();
        let order_id = uuid::Uuid::new_v4().to_string();

        let created = match ctx.payments.create_invoice(&order_id, amount, &currency).await {
            Ok(created) => created,
            Err(e) => {
                tracing::warn!(error = %e, "invoice creation failed");
                return ctx.chat.send_notification(messages::INVOICE_UNAVAILABLE).await;
            }
        };

        let mut reply = messages::invoice_created(
            &created.order_id,
            &amount.to_string(),
            &currency,
            &created.payment_url,
            &created.address,
        );
        if let Some(at) = created.expires_at {
            reply.push_str(&format!("\nExpires at: {}", at.format("%H:%M UTC")));
        }
        ctx.chat.send_message(&reply).await?;

        let invoice = Invoice {
            order_id: created.order_id,
            amount,
            currency,
            created_at: Utc::now(),
        };
        let _ = ctx.monitor.spawn(ctx.chat.clone(), invoice);
        Ok(())
    }

    fn description(&self) -> &str {
        "Send money to me"
    }

    fn price(&self) -> Price {
        Price::Free
    }
}

pub struct StatusCommand;

#[async_trait]
impl Command for StatusCommand {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        let args = ctx.args();
        let Some(order_id) = args.first() else {
            return ctx.chat.send_notification(messages::STATUS_USAGE).await;
        };

        let status = match ctx.payments.check_payment(order_id).await {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(error = %e, %order_id, "status check failed");
                return ctx.chat.send_notification(messages::STATUS_UNAVAILABLE).await;
            }
        };

        let mut msg = messages::payment_status(&status.order_id, &status.state.to_string());
        if status.state == InvoiceState::Confirmed {
            if let (Some(amount), Some(currency)) = (status.amount, status.currency.as_deref()) {
                msg.push_str(&format!("\nAmount: {amount} {currency}"));
            }
            if let Some(at) = status.confirmed_at {
                msg.push_str(&format!("\nReceived at: {}", at.format("%H:%M UTC")));
            }
        }
        ctx.chat.send_message(&msg).await
    }

    fn description(&self) -> &str {
        "Check payment status"
    }

    fn price(&self) -> Price {
        Price::Free
    }
}
