//! # Command Handlers
//!
//! One module per command family, plus the registry builder that wires the
//! full command surface together at startup.

pub mod balance;
pub mod help;
pub mod paid;
pub mod pay;
pub mod price;
pub mod propose;
pub mod services;

use anyhow::Result;
use std::sync::Arc;

use crate::application::registry::{Command, CommandRegistry};
use crate::domain::config::AppConfig;
use crate::strings;

use balance::BalanceCommand;
use help::HelpCommand;
use paid::PaidService;
use pay::{PayCommand, StatusCommand};
use price::PriceCommand;
use propose::ProposeCommand;
use services::ServicesCommand;

/// Build the full command surface. Fails fast on a bad registration, which
/// is a programming error surfaced at startup.
pub fn build_registry(config: &AppConfig) -> Result<CommandRegistry> {
    let paid = [
        PaidService::alert(),
        PaidService::summarize(),
        PaidService::image(),
        PaidService::code(),
    ];

    let mut paid_lines = String::new();
    for service in &paid {
        paid_lines.push_str(&format!(
            "• `{}` - ${}\n  {}\n",
            service.syntax(),
            service.cost(),
            service.description()
        ));
    }
    let catalogue = strings::help::services_catalogue(
        &paid_lines,
        &config.treasury.per_transaction_limit.to_string(),
        &config.treasury.daily_budget.to_string(),
    );

    let mut registry = CommandRegistry::new();
    registry.register("!help", Arc::new(HelpCommand))?;
    registry.register("!balance", Arc::new(BalanceCommand))?;
    registry.register("!services", Arc::new(ServicesCommand::new(catalogue)))?;
    registry.register("!price", Arc::new(PriceCommand))?;
    for service in paid {
        registry.register(service.prefix(), Arc::new(service))?;
    }
    registry.register("!propose", Arc::new(ProposeCommand))?;
    registry.register("!pay", Arc::new(PayCommand))?;
    registry.register("!status", Arc::new(StatusCommand))?;
    Ok(registry)
}
