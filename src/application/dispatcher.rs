//! # Message Dispatcher
//!
//! Receives inbound chat messages, resolves a handler through the registry,
//! and invokes it on its own task so a slow handler never stalls ingestion of
//! subsequent messages. Handler failures are caught and logged at the task
//! boundary; nothing propagates back into the sync loop.

use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::application::ledger::Ledger;
use crate::application::monitor::PaymentMonitor;
use crate::application::registry::{CommandContext, CommandRegistry};
use crate::domain::traits::{ChatProvider, MarketData, PaymentProvider, Pricer};

pub struct Dispatcher {
    registry: Arc<CommandRegistry>,
    bot_user_id: String,
    ledger: Arc<Ledger>,
    payments: Arc<dyn PaymentProvider>,
    pricer: Arc<dyn Pricer>,
    market: Arc<dyn MarketData>,
    monitor: Arc<PaymentMonitor>,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<CommandRegistry>,
        bot_user_id: String,
        ledger: Arc<Ledger>,
        payments: Arc<dyn PaymentProvider>,
        pricer: Arc<dyn Pricer>,
        market: Arc<dyn MarketData>,
        monitor: Arc<PaymentMonitor>,
    ) -> Self {
        Self {
            registry,
            bot_user_id,
            ledger,
            payments,
            pricer,
            market,
            monitor,
        }
    }

    /// Route one inbound message. Returns the spawned handler task, if any;
    /// callers normally drop it (fire-and-forget), tests await it.
    pub fn dispatch(
        &self,
        chat: Arc<dyn ChatProvider>,
        sender: &str,
        body: &str,
    ) -> Option<JoinHandle<()>> {
        if sender == self.bot_user_id {
            return None;
        }

        let body = body.trim();
        if body.is_empty() {
            return None;
        }

        let command = self.registry.find(body)?.clone();
        tracing::info!(room = %chat.room_id(), sender, body, "dispatching command");

        let ctx = CommandContext {
            chat,
            sender: sender.to_string(),
            body: body.to_string(),
            ledger: self.ledger.clone(),
            payments: self.payments.clone(),
            pricer: self.pricer.clone(),
            market: self.market.clone(),
            monitor: self.monitor.clone(),
        };

        Some(tokio::spawn(async move {
            if let Err(e) = command.handle(&ctx).await {
                tracing::error!(error = %e, body = %ctx.body, "command handler failed");
            }
        }))
    }
}
