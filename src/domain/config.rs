//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file
//! (`config.yaml`). Defines the structs for the chat service, the payment
//! provider, and the treasury limits the ledger enforces.

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main application configuration structure.
/// Matches the layout of `config.yaml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub services: ServicesConfig,
    #[serde(default)]
    pub treasury: TreasuryConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub system: SystemConfig,
}

/// Configuration for the connected services.
#[derive(Debug, Deserialize, Clone)]
pub struct ServicesConfig {
    pub matrix: MatrixConfig,
    pub shkeeper: ShkeeperConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Deserialize, Clone)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Connection settings for the SHKeeper payment gateway.
#[derive(Debug, Deserialize, Clone)]
pub struct ShkeeperConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Spending limits the ledger enforces on the bot's own treasury.
#[derive(Debug, Deserialize, Clone)]
pub struct TreasuryConfig {
    #[serde(default = "default_per_transaction_limit")]
    pub per_transaction_limit: Decimal,
    #[serde(default = "default_daily_budget")]
    pub daily_budget: Decimal,
}

impl Default for TreasuryConfig {
    fn default() -> Self {
        Self {
            per_transaction_limit: default_per_transaction_limit(),
            daily_budget: default_daily_budget(),
        }
    }
}

fn default_per_transaction_limit() -> Decimal {
    Decimal::new(100, 2) // $1.00
}
fn default_daily_budget() -> Decimal {
    Decimal::new(500, 2) // $5.00
}

/// Timing for the per-invoice payment watchers.
#[derive(Debug, Deserialize, Clone)]
pub struct MonitorConfig {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_monitor_timeout")]
    pub timeout_secs: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_monitor_timeout(),
        }
    }
}

fn default_poll_interval() -> u64 {
    10
}
fn default_monitor_timeout() -> u64 {
    30 * 60
}

/// System-level settings for the bot.
#[derive(Debug, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_filter: default_log_filter(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}
fn default_log_filter() -> String {
    "info,matrix_sdk=warn,matrix_sdk_base=warn,matrix_sdk_crypto=error,ruma=warn,hyper=warn"
        .to_string()
}

impl AppConfig {
    /// Load configuration from an explicit path, or search `./config.yaml`
    /// followed by the user config directory (`~/.config/barter/config.yaml`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::find_config()?,
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn find_config() -> Result<PathBuf> {
        let local = PathBuf::from("config.yaml");
        if local.exists() {
            return Ok(local);
        }
        if let Some(dir) = dirs::config_dir() {
            let user = dir.join("barter").join("config.yaml");
            if user.exists() {
                return Ok(user);
            }
        }
        bail!("No config.yaml found (looked in . and the user config directory)")
    }

    /// Reject settings the bot cannot safely start with.
    pub fn validate(&self) -> Result<()> {
        if self.treasury.per_transaction_limit <= Decimal::ZERO {
            bail!("treasury.per_transaction_limit must be positive");
        }
        if self.treasury.daily_budget <= Decimal::ZERO {
            bail!("treasury.daily_budget must be positive");
        }
        if self.monitor.poll_interval_secs == 0 {
            bail!("monitor.poll_interval_secs must be at least 1");
        }
        if self.monitor.timeout_secs <= self.monitor.poll_interval_secs {
            bail!("monitor.timeout_secs must exceed monitor.poll_interval_secs");
        }
        if self.services.matrix.homeserver.is_empty() || self.services.matrix.username.is_empty() {
            bail!("services.matrix.homeserver and username are required");
        }
        if self.services.shkeeper.base_url.is_empty() {
            bail!("services.shkeeper.base_url is required");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
services:
  matrix:
    homeserver: "https://matrix.example.org"
    username: "@barter:example.org"
    password: "hunter2"
  shkeeper:
    base_url: "https://shkeeper.example.org"
    api_key: "key"
"#;

    #[test]
    fn minimal_config_gets_defaults() {
        let config: AppConfig = serde_yaml::from_str(MINIMAL).unwrap();
        assert_eq!(config.treasury.per_transaction_limit, Decimal::new(100, 2));
        assert_eq!(config.treasury.daily_budget, Decimal::new(500, 2));
        assert_eq!(config.monitor.poll_interval_secs, 10);
        assert_eq!(config.monitor.timeout_secs, 1800);
        assert_eq!(config.system.data_dir, "data");
        config.validate().unwrap();
    }

    #[test]
    fn explicit_limits_override_defaults() {
        let yaml = format!("{MINIMAL}\ntreasury:\n  per_transaction_limit: \"0.25\"\n  daily_budget: \"2.00\"\n");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config.treasury.per_transaction_limit, Decimal::new(25, 2));
        assert_eq!(config.treasury.daily_budget, Decimal::new(200, 2));
    }

    #[test]
    fn validation_rejects_non_positive_limits() {
        let yaml = format!("{MINIMAL}\ntreasury:\n  per_transaction_limit: \"0\"\n");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_timeout_not_above_interval() {
        let yaml = format!("{MINIMAL}\nmonitor:\n  poll_interval_secs: 60\n  timeout_secs: 60\n");
        let config: AppConfig = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_and_validates_a_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.services.matrix.username, "@barter:example.org");
    }

    #[test]
    fn load_fails_on_missing_required_section() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"services:\n  matrix:\n    homeserver: h\n    username: u\n    password: p\n")
            .unwrap();
        assert!(AppConfig::load(Some(file.path())).is_err());
    }
}
