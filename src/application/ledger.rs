//! # Treasury Ledger
//!
//! Owns all monetary state of the bot: the append-only transaction log, the
//! per-day spending totals, and the limits that authorize every outgoing
//! payment. All access goes through the synchronized operations here; nothing
//! else in the application touches monetary state directly.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::domain::config::TreasuryConfig;
use crate::domain::error::LedgerError;
use crate::domain::types::{SpendingStats, Transaction, TransactionKind};

/// Spend/earn tracker with limit enforcement.
///
/// Constructed once at startup and shared as `Arc<Ledger>`. The interior lock
/// is a plain `RwLock`: no operation awaits while holding it, reads
/// (`can_spend`, `stats`) take the shared side, and `record_spend` performs
/// its validate-and-append sequence under one exclusive critical section so
/// two concurrent callers can never jointly exceed the budget.
pub struct Ledger {
    per_transaction_limit: Decimal,
    daily_budget: Decimal,
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    /// Append-only; order is the authorization order.
    transactions: Vec<Transaction>,
    /// Cache of per-day spend totals, always recomputable from the log.
    daily_spending: HashMap<NaiveDate, Decimal>,
    last_spend: Option<DateTime<Utc>>,
    next_id: u64,
}

impl Ledger {
    pub fn new(config: &TreasuryConfig) -> Self {
        Self {
            per_transaction_limit: config.per_transaction_limit,
            daily_budget: config.daily_budget,
            inner: RwLock::new(Inner::default()),
        }
    }

    pub fn per_transaction_limit(&self) -> Decimal {
        self.per_transaction_limit
    }

    pub fn daily_budget(&self) -> Decimal {
        self.daily_budget
    }

    /// Read-only check of both limits. Advisory only: a passing result does
    /// not reserve budget, `record_spend` re-validates atomically.
    pub fn can_spend(&self, amount: Decimal) -> Result<(), LedgerError> {
        self.can_spend_at(amount, Utc::now())
    }

    fn can_spend_at(&self, amount: Decimal, now: DateTime<Utc>) -> Result<(), LedgerError> {
        let inner = self.inner.read().expect("ledger lock poisoned");
        self.check(&inner, amount, now.date_naive())
    }

    /// Authorize and record a spend. Validation and append happen under a
    /// single exclusive critical section.
    pub fn record_spend(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
    ) -> Result<Transaction, LedgerError> {
        self.record_spend_at(amount, currency, description, Utc::now())
    }

    fn record_spend_at(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Transaction, LedgerError> {
        let mut inner = self.inner.write().expect("ledger lock poisoned");
        let day = now.date_naive();
        self.check(&inner, amount, day)?;

        let tx = Self::append(&mut inner, TransactionKind::Spend, amount, currency, description, now);
        *inner.daily_spending.entry(day).or_insert(Decimal::ZERO) += amount;
        inner.last_spend = Some(now);

        let spent_today = inner.daily_spending[&day];
        tracing::info!(
            amount = %amount,
            currency,
            description,
            remaining_today = %(self.daily_budget - spent_today),
            "treasury spend recorded"
        );
        Ok(tx)
    }

    /// Record an earning. Earnings are unbounded: no limit check, and they do
    /// not count against the spend budget.
    pub fn record_earn(&self, amount: Decimal, currency: &str, description: &str) -> Transaction {
        self.record_earn_at(amount, currency, description, Utc::now())
    }

    fn record_earn_at(
        &self,
        amount: Decimal,
        currency: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Transaction {
        let mut inner = self.inner.write().expect("ledger lock poisoned");
        let tx = Self::append(&mut inner, TransactionKind::Earn, amount, currency, description, now);
        tracing::info!(amount = %amount, currency, description, "treasury earning recorded");
        tx
    }

    /// Aggregate stats over the log. Reflects every transaction appended
    /// before the call returns.
    pub fn stats(&self) -> SpendingStats {
        self.stats_at(Utc::now())
    }

    fn stats_at(&self, now: DateTime<Utc>) -> SpendingStats {
        let inner = self.inner.read().expect("ledger lock poisoned");
        let day = now.date_naive();

        let mut spent_total = Decimal::ZERO;
        let mut earned_total = Decimal::ZERO;
        for tx in &inner.transactions {
            match tx.kind {
                TransactionKind::Spend => spent_total += tx.amount,
                TransactionKind::Earn => earned_total += tx.amount,
            }
        }

        SpendingStats {
            spent_today: inner.daily_spending.get(&day).copied().unwrap_or(Decimal::ZERO),
            spent_total,
            earned_total,
            transaction_count: inner.transactions.len(),
            last_spend: inner.last_spend,
        }
    }

    /// Log a closing summary. Called once at shutdown.
    pub fn log_summary(&self) {
        let stats = self.stats();
        tracing::info!(
            spent_total = %stats.spent_total,
            earned_total = %stats.earned_total,
            transactions = stats.transaction_count,
            "treasury summary"
        );
    }

    fn check(&self, inner: &Inner, amount: Decimal, day: NaiveDate) -> Result<(), LedgerError> {
        if amount.is_sign_negative() {
            return Err(LedgerError::InvalidAmount);
        }
        if amount > self.per_transaction_limit {
            return Err(LedgerError::LimitExceeded {
                amount,
                limit: self.per_transaction_limit,
            });
        }
        let spent_today = inner.daily_spending.get(&day).copied().unwrap_or(Decimal::ZERO);
        if spent_today + amount > self.daily_budget {
            return Err(LedgerError::BudgetExceeded {
                spent_today,
                budget: self.daily_budget,
                requested: amount,
            });
        }
        Ok(())
    }

    fn append(
        inner: &mut Inner,
        kind: TransactionKind,
        amount: Decimal,
        currency: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Transaction {
        inner.next_id += 1;
        let tx = Transaction {
            id: inner.next_id,
            kind,
            amount,
            currency: currency.to_string(),
            description: description.to_string(),
            timestamp: now,
            approved: true,
        };
        inner.transactions.push(tx.clone());
        tx
    }

    #[cfg(test)]
    fn transactions(&self) -> Vec<Transaction> {
        self.inner.read().expect("ledger lock poisoned").transactions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn treasury(limit: Decimal, budget: Decimal) -> TreasuryConfig {
        TreasuryConfig {
            per_transaction_limit: limit,
            daily_budget: budget,
        }
    }

    fn ledger() -> Ledger {
        Ledger::new(&treasury(dec!(1.00), dec!(5.00)))
    }

    #[test]
    fn five_spends_fill_the_budget_and_the_sixth_is_rejected() {
        let ledger = ledger();
        for _ in 0..5 {
            ledger.record_spend(dec!(1.00), "USDT", "x").unwrap();
        }
        let err = ledger.record_spend(dec!(1.00), "USDT", "x").unwrap_err();
        assert!(matches!(err, LedgerError::BudgetExceeded { .. }));
        assert_eq!(ledger.stats().spent_today, dec!(5.00));
        assert_eq!(ledger.stats().transaction_count, 5);
    }

    #[test]
    fn over_limit_spend_is_rejected_before_the_budget_check() {
        let ledger = ledger();
        let err = ledger.record_spend(dec!(1.50), "USDT", "x").unwrap_err();
        assert_eq!(
            err,
            LedgerError::LimitExceeded {
                amount: dec!(1.50),
                limit: dec!(1.00)
            }
        );
        assert_eq!(ledger.stats().transaction_count, 0);
        assert_eq!(ledger.stats().spent_today, Decimal::ZERO);
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let ledger = ledger();
        assert_eq!(
            ledger.record_spend(dec!(-0.10), "USDT", "x").unwrap_err(),
            LedgerError::InvalidAmount
        );
    }

    #[test]
    fn can_spend_never_mutates() {
        let ledger = ledger();
        ledger.can_spend(dec!(0.50)).unwrap();
        ledger.can_spend(dec!(9.00)).unwrap_err();
        assert_eq!(ledger.stats().transaction_count, 0);
    }

    #[test]
    fn earnings_do_not_count_against_the_budget() {
        let ledger = ledger();
        ledger.record_earn(dec!(100.00), "USDT", "invoice");
        let stats = ledger.stats();
        assert_eq!(stats.earned_total, dec!(100.00));
        assert_eq!(stats.spent_today, Decimal::ZERO);
        assert_eq!(stats.transaction_count, 1);
        ledger.record_spend(dec!(1.00), "USDT", "x").unwrap();
    }

    #[test]
    fn daily_cache_matches_a_recompute_from_the_log() {
        let ledger = ledger();
        ledger.record_spend(dec!(0.75), "USDT", "a").unwrap();
        ledger.record_earn(dec!(2.00), "USDT", "b");
        ledger.record_spend(dec!(0.25), "USDC", "c").unwrap();

        let today = Utc::now().date_naive();
        let from_log: Decimal = ledger
            .transactions()
            .iter()
            .filter(|tx| tx.kind == TransactionKind::Spend && tx.timestamp.date_naive() == today)
            .map(|tx| tx.amount)
            .sum();
        assert_eq!(ledger.stats().spent_today, from_log);
    }

    #[test]
    fn stats_are_idempotent_without_mutation() {
        let ledger = ledger();
        ledger.record_spend(dec!(0.40), "USDT", "x").unwrap();
        assert_eq!(ledger.stats(), ledger.stats());
    }

    #[test]
    fn transaction_ids_are_monotonic_in_authorization_order() {
        let ledger = ledger();
        ledger.record_spend(dec!(0.10), "USDT", "a").unwrap();
        ledger.record_earn(dec!(0.20), "USDT", "b");
        ledger.record_spend(dec!(0.30), "USDT", "c").unwrap();
        let ids: Vec<u64> = ledger.transactions().iter().map(|tx| tx.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn the_daily_window_resets_on_the_next_day() {
        let ledger = ledger();
        let day_one = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let day_two = Utc.with_ymd_and_hms(2026, 3, 2, 0, 5, 0).unwrap();

        for _ in 0..5 {
            ledger.record_spend_at(dec!(1.00), "USDT", "x", day_one).unwrap();
        }
        ledger.can_spend_at(dec!(1.00), day_one).unwrap_err();
        ledger.can_spend_at(dec!(1.00), day_two).unwrap();
        ledger.record_spend_at(dec!(1.00), "USDT", "x", day_two).unwrap();
        assert_eq!(ledger.stats_at(day_two).spent_today, dec!(1.00));
        assert_eq!(ledger.stats_at(day_two).spent_total, dec!(6.00));
    }

    #[test]
    fn concurrent_spends_never_exceed_the_budget() {
        let ledger = Arc::new(ledger());
        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = ledger.clone();
            handles.push(std::thread::spawn(move || {
                let mut approved = 0;
                for _ in 0..10 {
                    if ledger.record_spend(dec!(1.00), "USDT", "race").is_ok() {
                        approved += 1;
                    }
                }
                approved
            }));
        }
        let approved: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(approved, 5);
        assert_eq!(ledger.stats().spent_today, dec!(5.00));
    }

    #[test]
    fn last_spend_tracks_the_most_recent_spend_only() {
        let ledger = ledger();
        assert!(ledger.stats().last_spend.is_none());
        let tx = ledger.record_spend(dec!(0.10), "USDT", "x").unwrap();
        ledger.record_earn(dec!(1.00), "USDT", "y");
        assert_eq!(ledger.stats().last_spend, Some(tx.timestamp));
    }
}
