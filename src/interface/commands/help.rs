//! # Help Command
//!
//! Handles `!help`: displays the command reference.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::registry::{Command, CommandContext};
use crate::domain::types::Price;
use crate::strings;

pub struct HelpCommand;

#[async_trait]
impl Command for HelpCommand {
    async fn handle(&self, ctx: &CommandContext) -> Result<()> {
        ctx.chat.send_message(strings::help::MAIN).await
    }

    fn description(&self) -> &str {
        "Show this message"
    }

    fn price(&self) -> Price {
        Price::Free
    }
}
