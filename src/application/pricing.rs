//! # Service Pricing
//!
//! Heuristic implementation of the [`Pricer`] capability. Prices a custom
//! service request from its description length and hard-caps the result at
//! the treasury's per-transaction limit. A model-backed pricer can replace
//! this behind the same trait.

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::domain::traits::Pricer;
use crate::domain::types::Quote;

pub struct HeuristicPricer {
    cap: Decimal,
}

impl HeuristicPricer {
    /// `cap` is the treasury's per-transaction limit; no quote may exceed it.
    pub fn new(cap: Decimal) -> Self {
        Self { cap }
    }

    fn base_price(description: &str) -> Decimal {
        match description.len() {
            0..=50 => dec!(0.50),
            51..=100 => dec!(0.75),
            _ => dec!(1.00),
        }
    }
}

#[async_trait]
impl Pricer for HeuristicPricer {
    async fn propose(&self, service_description: &str) -> Quote {
        let price = Self::base_price(service_description).min(self.cap);
        let reasoning = format!(
            "Based on request complexity. Capped at ${} by my spending limits.",
            self.cap
        );
        Quote { price, reasoning }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn price_scales_with_description_length() {
        let pricer = HeuristicPricer::new(dec!(1.00));
        assert_eq!(pricer.propose("short").await.price, dec!(0.50));
        assert_eq!(pricer.propose(&"m".repeat(80)).await.price, dec!(0.75));
        assert_eq!(pricer.propose(&"l".repeat(200)).await.price, dec!(1.00));
    }

    #[tokio::test]
    async fn quotes_never_exceed_the_cap() {
        let pricer = HeuristicPricer::new(dec!(0.30));
        for description in ["", "short", &"x".repeat(60), &"x".repeat(500)] {
            let quote = pricer.propose(description).await;
            assert!(quote.price <= dec!(0.30), "quote {} over cap", quote.price);
        }
    }

    #[tokio::test]
    async fn reasoning_names_the_cap() {
        let pricer = HeuristicPricer::new(dec!(1.00));
        assert!(pricer.propose("anything").await.reasoning.contains("$1.00"));
    }
}
