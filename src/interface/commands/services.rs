//! # Services Command
//!
//! Handles `!services`: the catalogue of everything the bot offers, with
//! prices and the configured treasury limits. The text is assembled once at
//! registration time from the actual paid-service definitions.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::registry::{Command, CommandContext};
use crate::domain::types::Price;

pub struct ServicesCommand {
    catalogue: String,
}

impl ServicesCommand {
    pub fn new(catalogue: String) -> Self {
        Self { catalogue }
    }
}

#[async_trait]
impl Command for ServicesCommand {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        ctx.chat.send_message(&self.catalogue).await
    }

    fn description(&self) -> &str {
        "List all available services"
    }

    fn price(&self) -> Price {
        Price::Free
    }
}
