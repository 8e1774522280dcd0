//! Shared mock collaborators for the application- and interface-layer tests.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::application::ledger::Ledger;
use crate::application::monitor::PaymentMonitor;
use crate::application::pricing::HeuristicPricer;
use crate::application::registry::CommandContext;
use crate::domain::config::TreasuryConfig;
use crate::domain::traits::{ChatProvider, NewInvoice, NoMarketData, PaymentProvider, PaymentStatus};
use crate::domain::types::InvoiceState;

/// Captures everything sent to the room.
pub struct MockChat {
    sent: Mutex<Vec<String>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChat {
    async fn send_message(&self, content: &str) -> Result<()> {
        self.sent.lock().unwrap().push(content.to_string());
        Ok(())
    }

    async fn send_notification(&self, content: &str) -> Result<()> {
        self.send_message(content).await
    }

    async fn typing(&self, _active: bool) -> Result<()> {
        Ok(())
    }

    fn room_id(&self) -> String {
        "!test:example.org".to_string()
    }
}

enum Scripted {
    Pending,
    Confirmed {
        amount: Option<Decimal>,
        currency: Option<String>,
    },
    Error,
}

/// Payment provider whose `check_payment` replies follow a script, repeating
/// the final entry once the script is exhausted.
pub struct ScriptedPayments {
    script: Vec<Scripted>,
    calls: AtomicUsize,
    invoices: Mutex<Vec<(String, Decimal, String)>>,
    fail_invoices: bool,
    fail_balances: bool,
}

impl ScriptedPayments {
    fn new(script: Vec<Scripted>) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            invoices: Mutex::new(Vec::new()),
            fail_invoices: false,
            fail_balances: false,
        }
    }

    /// `n` pending replies, then confirmed (with no reported amount).
    pub fn confirm_after(n: usize) -> Self {
        let mut script: Vec<Scripted> = (0..n).map(|_| Scripted::Pending).collect();
        script.push(Scripted::Confirmed {
            amount: None,
            currency: None,
        });
        Self::new(script)
    }

    pub fn always_pending() -> Self {
        Self::new(vec![Scripted::Pending])
    }

    /// `n` transport errors, then confirmed.
    pub fn errors_then_confirm(n: usize) -> Self {
        let mut script: Vec<Scripted> = (0..n).map(|_| Scripted::Error).collect();
        script.push(Scripted::Confirmed {
            amount: None,
            currency: None,
        });
        Self::new(script)
    }

    /// Confirms immediately, reporting the given settled amount.
    pub fn confirm_with_amount(amount: Decimal, currency: &str) -> Self {
        Self::new(vec![Scripted::Confirmed {
            amount: Some(amount),
            currency: Some(currency.to_string()),
        }])
    }

    pub fn with_failing_invoices(mut self) -> Self {
        self.fail_invoices = true;
        self
    }

    pub fn with_failing_balances(mut self) -> Self {
        self.fail_balances = true;
        self
    }

    pub fn check_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Invoices created through this provider, as (order_id, amount, currency).
    pub fn created_invoices(&self) -> Vec<(String, Decimal, String)> {
        self.invoices.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentProvider for ScriptedPayments {
    async fn create_invoice(
        &self,
        order_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<NewInvoice> {
        if self.fail_invoices {
            return Err(anyhow!("shkeeper returned status 502"));
        }
        self.invoices
            .lock()
            .unwrap()
            .push((order_id.to_string(), amount, currency.to_string()));
        Ok(NewInvoice {
            order_id: order_id.to_string(),
            payment_url: format!("https://pay.example.org/{order_id}"),
            address: "TTestAddress".to_string(),
            expires_at: None,
        })
    }

    async fn check_payment(&self, order_id: &str) -> Result<PaymentStatus> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let step = &self.script[call.min(self.script.len() - 1)];
        match step {
            Scripted::Error => Err(anyhow!("connection refused")),
            Scripted::Pending => Ok(PaymentStatus {
                order_id: order_id.to_string(),
                state: InvoiceState::Pending,
                amount: None,
                currency: None,
                confirmed_at: None,
            }),
            Scripted::Confirmed { amount, currency } => Ok(PaymentStatus {
                order_id: order_id.to_string(),
                state: InvoiceState::Confirmed,
                amount: *amount,
                currency: currency.clone(),
                confirmed_at: Some(Utc::now()),
            }),
        }
    }

    async fn balances(&self) -> Result<BTreeMap<String, Decimal>> {
        if self.fail_balances {
            return Err(anyhow!("shkeeper returned status 503"));
        }
        let mut balances = BTreeMap::new();
        balances.insert("USDT".to_string(), dec!(42.50));
        Ok(balances)
    }

    async fn send_payment(&self, _currency: &str, _to: &str, _amount: Decimal) -> Result<()> {
        Ok(())
    }
}

/// A fully wired handler context over mock collaborators: default treasury
/// limits ($1.00 / $5.00), a 10ms-poll monitor, and the heuristic pricer.
pub fn test_context(
    chat: Arc<MockChat>,
    payments: Arc<ScriptedPayments>,
    body: &str,
) -> (CommandContext, Arc<Ledger>) {
    let ledger = Arc::new(Ledger::new(&TreasuryConfig::default()));
    let monitor = Arc::new(PaymentMonitor::with_intervals(
        payments.clone(),
        ledger.clone(),
        Duration::from_millis(10),
        Duration::from_millis(500),
    ));
    let ctx = CommandContext {
        chat,
        sender: "@alice:example.org".to_string(),
        body: body.to_string(),
        ledger: ledger.clone(),
        payments,
        pricer: Arc::new(HeuristicPricer::new(ledger.per_transaction_limit())),
        market: Arc::new(NoMarketData),
        monitor,
    };
    (ctx, ledger)
}
