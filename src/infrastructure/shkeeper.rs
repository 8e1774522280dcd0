//! # SHKeeper Client
//!
//! Implements the `PaymentProvider` trait against the SHKeeper crypto payment
//! gateway's HTTP API. Amounts travel as strings on the wire and are parsed
//! to `Decimal` at this boundary.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::config::ShkeeperConfig;
use crate::domain::traits::{NewInvoice, PaymentProvider, PaymentStatus};
use crate::domain::types::InvoiceState;

pub struct ShkeeperClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct InvoiceRequest<'a> {
    order_id: &'a str,
    amount: String,
    currency: &'a str,
}

#[derive(Deserialize)]
struct InvoiceResponse {
    order_id: String,
    payment_url: String,
    address: String,
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct PaymentStatusResponse {
    order_id: String,
    status: String,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    confirmed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    currency: &'a str,
    to: &'a str,
    amount: String,
}

impl ShkeeperClient {
    pub fn new(config: &ShkeeperConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn check_status(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            bail!("shkeeper returned status {}", response.status());
        }
        Ok(response)
    }

    fn parse_state(status: &str) -> InvoiceState {
        match status {
            "confirmed" => InvoiceState::Confirmed,
            "expired" => InvoiceState::Expired,
            _ => InvoiceState::Pending,
        }
    }

    fn parse_amount(raw: &str) -> Result<Decimal> {
        Decimal::from_str(raw).with_context(|| format!("unparseable amount {raw:?}"))
    }
}

#[async_trait]
impl PaymentProvider for ShkeeperClient {
    async fn create_invoice(
        &self,
        order_id: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<NewInvoice> {
        let request = InvoiceRequest {
            order_id,
            amount: amount.to_string(),
            currency,
        };
        let response = self
            .http
            .post(self.url("/api/v1/invoice"))
            .header("X-API-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("invoice request failed")?;
        let invoice: InvoiceResponse = self
            .check_status(response)?
            .json()
            .await
            .context("invalid invoice response")?;
        Ok(NewInvoice {
            order_id: invoice.order_id,
            payment_url: invoice.payment_url,
            address: invoice.address,
            expires_at: invoice.expires_at,
        })
    }

    async fn check_payment(&self, order_id: &str) -> Result<PaymentStatus> {
        let response = self
            .http
            .get(self.url(&format!("/api/v1/payment/{order_id}")))
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .context("payment status request failed")?;
        let status: PaymentStatusResponse = self
            .check_status(response)?
            .json()
            .await
            .context("invalid payment status response")?;
        let amount = status.amount.as_deref().map(Self::parse_amount).transpose()?;
        Ok(PaymentStatus {
            order_id: status.order_id,
            state: Self::parse_state(&status.status),
            amount,
            currency: status.currency,
            confirmed_at: status.confirmed_at,
        })
    }

    async fn balances(&self) -> Result<BTreeMap<String, Decimal>> {
        let response = self
            .http
            .get(self.url("/api/v1/balances"))
            .header("X-API-Key", &self.api_key)
            .send()
            .await
            .context("balances request failed")?;
        let raw: BTreeMap<String, String> = self
            .check_status(response)?
            .json()
            .await
            .context("invalid balances response")?;
        raw.into_iter()
            .map(|(currency, amount)| Ok((currency, Self::parse_amount(&amount)?)))
            .collect()
    }

    async fn send_payment(&self, currency: &str, to_address: &str, amount: Decimal) -> Result<()> {
        let request = SendRequest {
            currency,
            to: to_address,
            amount: amount.to_string(),
        };
        let response = self
            .http
            .post(self.url("/api/v1/send"))
            .header("X-API-Key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("send request failed")?;
        self.check_status(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_payment_status_payload_deserializes() {
        let payload = r#"{
            "order_id": "ord-9",
            "status": "confirmed",
            "amount": "2.50",
            "currency": "USDT",
            "received": "2.50",
            "confirmed_at": "2026-08-07T12:34:56Z"
        }"#;
        let status: PaymentStatusResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(status.order_id, "ord-9");
        assert_eq!(ShkeeperClient::parse_state(&status.status), InvoiceState::Confirmed);
        assert_eq!(
            ShkeeperClient::parse_amount(status.amount.as_deref().unwrap()).unwrap(),
            Decimal::new(250, 2)
        );
        assert!(status.confirmed_at.is_some());
    }

    #[test]
    fn an_invoice_payload_deserializes_without_optional_fields() {
        let payload = r#"{
            "order_id": "ord-9",
            "payment_url": "https://pay.example.org/ord-9",
            "address": "TAddr",
            "amount": "1.00",
            "currency": "USDT",
            "status": "pending"
        }"#;
        let invoice: InvoiceResponse = serde_json::from_str(payload).unwrap();
        assert_eq!(invoice.address, "TAddr");
        assert!(invoice.expires_at.is_none());
    }

    #[test]
    fn wire_status_strings_map_to_states() {
        assert_eq!(ShkeeperClient::parse_state("pending"), InvoiceState::Pending);
        assert_eq!(ShkeeperClient::parse_state("confirmed"), InvoiceState::Confirmed);
        assert_eq!(ShkeeperClient::parse_state("expired"), InvoiceState::Expired);
        // Unknown statuses stay pending rather than failing the poll.
        assert_eq!(ShkeeperClient::parse_state("partial"), InvoiceState::Pending);
    }

    #[test]
    fn wire_amounts_parse_to_decimals() {
        assert_eq!(ShkeeperClient::parse_amount("1.50").unwrap(), Decimal::new(150, 2));
        assert!(ShkeeperClient::parse_amount("one").is_err());
    }

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let client = ShkeeperClient::new(&ShkeeperConfig {
            base_url: "https://pay.example.org/".to_string(),
            api_key: "k".to_string(),
        })
        .unwrap();
        assert_eq!(client.url("/api/v1/balances"), "https://pay.example.org/api/v1/balances");
    }
}
