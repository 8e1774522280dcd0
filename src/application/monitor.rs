//! # Payment Monitor
//!
//! Watches invoices until the payment provider confirms them or an overall
//! timeout expires. Each invoice gets its own task; watchers share no mutable
//! state other than the ledger's own synchronized operations.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::application::ledger::Ledger;
use crate::domain::config::MonitorConfig;
use crate::domain::traits::{ChatProvider, PaymentProvider};
use crate::domain::types::{Invoice, InvoiceState};
use crate::strings;

/// Spawns and supervises one watcher task per invoice.
pub struct PaymentMonitor {
    provider: Arc<dyn PaymentProvider>,
    ledger: Arc<Ledger>,
    poll_interval: Duration,
    timeout: Duration,
    shutdown: CancellationToken,
}

impl PaymentMonitor {
    pub fn new(
        provider: Arc<dyn PaymentProvider>,
        ledger: Arc<Ledger>,
        config: &MonitorConfig,
    ) -> Self {
        Self::with_intervals(
            provider,
            ledger,
            Duration::from_secs(config.poll_interval_secs),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn with_intervals(
        provider: Arc<dyn PaymentProvider>,
        ledger: Arc<Ledger>,
        poll_interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            ledger,
            poll_interval,
            timeout,
            shutdown: CancellationToken::new(),
        }
    }

    /// Start watching an invoice. The task polls the provider on a fixed
    /// interval until the payment confirms or the timeout elapses; whichever
    /// fires first is the single terminal transition. The returned handle is
    /// normally dropped (fire-and-forget); tests await it.
    pub fn spawn(&self, chat: Arc<dyn ChatProvider>, invoice: Invoice) -> JoinHandle<InvoiceState> {
        let provider = self.provider.clone();
        let ledger = self.ledger.clone();
        let poll_interval = self.poll_interval;
        let timeout = self.timeout;
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            watch(provider, ledger, chat, invoice, poll_interval, timeout, shutdown).await
        })
    }

    /// Stop all watchers. Pending invoices are abandoned without notification.
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

async fn watch(
    provider: Arc<dyn PaymentProvider>,
    ledger: Arc<Ledger>,
    chat: Arc<dyn ChatProvider>,
    invoice: Invoice,
    poll_interval: Duration,
    timeout: Duration,
    shutdown: CancellationToken,
) -> InvoiceState {
    tracing::info!(
        order_id = %invoice.order_id,
        amount = %invoice.amount,
        created_at = %invoice.created_at,
        "watching invoice"
    );

    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // An interval's first tick completes immediately; consume it so the first
    // poll happens one full interval after the invoice was created.
    ticker.tick().await;

    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!(order_id = %invoice.order_id, "watcher stopped at shutdown");
                return InvoiceState::Pending;
            }
            _ = &mut deadline => {
                tracing::info!(order_id = %invoice.order_id, "invoice expired");
                let _ = chat
                    .send_message(&strings::messages::payment_expired(&invoice.order_id))
                    .await;
                return InvoiceState::Expired;
            }
            _ = ticker.tick() => {
                match provider.check_payment(&invoice.order_id).await {
                    Err(e) => {
                        // Transient: retried on the next tick, invisible to the user.
                        tracing::debug!(order_id = %invoice.order_id, error = %e, "status poll failed");
                    }
                    Ok(status) if status.state == InvoiceState::Confirmed => {
                        let amount = status.amount.unwrap_or(invoice.amount);
                        let currency = status.currency.as_deref().unwrap_or(&invoice.currency);
                        ledger.record_earn(
                            amount,
                            currency,
                            &format!("payment {}", invoice.order_id),
                        );
                        let _ = chat
                            .send_message(&strings::messages::payment_confirmed(&invoice.order_id))
                            .await;
                        return InvoiceState::Confirmed;
                    }
                    Ok(_) => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testutil::{MockChat, ScriptedPayments};
    use crate::domain::config::TreasuryConfig;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn monitor_with(
        provider: Arc<ScriptedPayments>,
        poll_ms: u64,
        timeout_ms: u64,
    ) -> (PaymentMonitor, Arc<Ledger>) {
        let ledger = Arc::new(Ledger::new(&TreasuryConfig::default()));
        let monitor = PaymentMonitor::with_intervals(
            provider,
            ledger.clone(),
            Duration::from_millis(poll_ms),
            Duration::from_millis(timeout_ms),
        );
        (monitor, ledger)
    }

    fn invoice() -> Invoice {
        Invoice {
            order_id: "ord-1".to_string(),
            amount: dec!(2.50),
            currency: "USDT".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn confirmation_records_one_earning_and_one_notification() {
        let provider = Arc::new(ScriptedPayments::confirm_after(2));
        let (monitor, ledger) = monitor_with(provider.clone(), 10, 5_000);
        let chat = Arc::new(MockChat::new());

        let state = monitor.spawn(chat.clone(), invoice()).await.unwrap();

        assert_eq!(state, InvoiceState::Confirmed);
        assert_eq!(provider.check_calls(), 3);
        assert_eq!(chat.sent().len(), 1);
        assert!(chat.sent()[0].contains("confirmed"));
        let stats = ledger.stats();
        assert_eq!(stats.earned_total, dec!(2.50));
        assert_eq!(stats.transaction_count, 1);
    }

    #[tokio::test]
    async fn an_unconfirmed_invoice_expires_with_one_notification() {
        let provider = Arc::new(ScriptedPayments::always_pending());
        let (monitor, ledger) = monitor_with(provider, 10, 60);
        let chat = Arc::new(MockChat::new());

        let state = monitor.spawn(chat.clone(), invoice()).await.unwrap();

        assert_eq!(state, InvoiceState::Expired);
        assert_eq!(chat.sent().len(), 1);
        assert!(chat.sent()[0].contains("expired"));
        assert_eq!(ledger.stats().transaction_count, 0);
    }

    #[tokio::test]
    async fn poll_errors_are_retried_not_fatal() {
        let provider = Arc::new(ScriptedPayments::errors_then_confirm(3));
        let (monitor, ledger) = monitor_with(provider.clone(), 10, 5_000);
        let chat = Arc::new(MockChat::new());

        let state = monitor.spawn(chat.clone(), invoice()).await.unwrap();

        assert_eq!(state, InvoiceState::Confirmed);
        assert_eq!(provider.check_calls(), 4);
        assert_eq!(chat.sent().len(), 1);
        assert_eq!(ledger.stats().earned_total, dec!(2.50));
    }

    #[tokio::test]
    async fn confirmed_amount_from_the_provider_wins_over_the_requested_amount() {
        let provider = Arc::new(ScriptedPayments::confirm_with_amount(dec!(3.00), "USDC"));
        let (monitor, ledger) = monitor_with(provider, 10, 5_000);
        let chat = Arc::new(MockChat::new());

        monitor.spawn(chat, invoice()).await.unwrap();

        assert_eq!(ledger.stats().earned_total, dec!(3.00));
    }

    #[tokio::test]
    async fn shutdown_stops_watchers_without_notifications() {
        let provider = Arc::new(ScriptedPayments::always_pending());
        let (monitor, _ledger) = monitor_with(provider, 10, 60_000);
        let chat = Arc::new(MockChat::new());

        let handle = monitor.spawn(chat.clone(), invoice());
        tokio::time::sleep(Duration::from_millis(30)).await;
        monitor.shutdown();

        assert_eq!(handle.await.unwrap(), InvoiceState::Pending);
        assert!(chat.sent().is_empty());
    }
}
