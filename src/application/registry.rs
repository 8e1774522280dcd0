//! # Command Registry
//!
//! Maps textual command prefixes to handler implementations. The table is
//! built once at startup and shared read-only; lookups take no lock.
//!
//! Matching is case-insensitive on the leading substring of the message.
//! Entries are kept sorted longest-prefix-first so overlapping prefixes
//! resolve deterministically, and duplicate prefixes are rejected at
//! registration time.

use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Arc;

use crate::application::ledger::Ledger;
use crate::application::monitor::PaymentMonitor;
use crate::domain::types::Price;
use crate::domain::traits::{ChatProvider, MarketData, PaymentProvider, Pricer};

/// Everything a handler invocation gets to work with.
pub struct CommandContext {
    pub chat: Arc<dyn ChatProvider>,
    pub sender: String,
    /// The trimmed message text, prefix included.
    pub body: String,
    pub ledger: Arc<Ledger>,
    pub payments: Arc<dyn PaymentProvider>,
    pub pricer: Arc<dyn Pricer>,
    pub market: Arc<dyn MarketData>,
    pub monitor: Arc<PaymentMonitor>,
}

impl CommandContext {
    /// Whitespace-separated arguments after the command prefix.
    pub fn args(&self) -> Vec<&str> {
        self.body.split_whitespace().skip(1).collect()
    }
}

/// A command handler.
#[async_trait]
pub trait Command: Send + Sync {
    async fn handle(&self, ctx: &CommandContext) -> Result<()>;

    /// One-line description for the help listing.
    fn description(&self) -> &str;

    /// What fulfilling the command costs the treasury.
    fn price(&self) -> Price;
}

pub struct CommandRegistry {
    /// Sorted by descending prefix length, then lexicographically.
    entries: Vec<(String, Arc<dyn Command>)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn register(&mut self, prefix: &str, command: Arc<dyn Command>) -> Result<()> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.is_empty() || !prefix.starts_with('!') {
            bail!("command prefix {prefix:?} must start with '!'");
        }
        if self.entries.iter().any(|(p, _)| *p == prefix) {
            bail!("command prefix {prefix:?} registered twice");
        }
        self.entries.push((prefix, command));
        self.entries
            .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Ok(())
    }

    /// First matching prefix wins; longer prefixes are tried first.
    pub fn find(&self, message: &str) -> Option<&Arc<dyn Command>> {
        let lowered = message.to_lowercase();
        self.entries
            .iter()
            .find(|(prefix, _)| lowered.starts_with(prefix.as_str()))
            .map(|(_, command)| command)
    }

    /// Registered commands in match order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Arc<dyn Command>)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c))
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
