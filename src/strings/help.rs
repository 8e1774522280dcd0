//! # Help Text
//!
//! The `!help` reference and the `!services` catalogue template.

pub const MAIN: &str = "🤖 **barter - command reference**

**Free commands**
• `!help` - this message
• `!balance` - my treasury, limits and spending
• `!services` - service catalogue with prices
• `!price <symbol>` - market quote

**Paid services**
• `!alert <symbol> <price>` - set a price alert
• `!summarize <url>` - summarize an article
• `!image <prompt>` - generate an image
• `!code <description>` - generate a code snippet
• `!propose <idea>` - I propose a price for a custom service

**Payments**
• `!pay <amount> <currency>` - send me money
• `!status <order_id>` - check a payment

My spending limits are listed under `!balance`. Need something else? Just ask!";

pub fn services_catalogue(paid_lines: &str, limit: &str, budget: &str) -> String {
    format!(
        "📋 **Available Services**\n\n**Free**\n• `!help` - show commands\n• `!balance` - check my treasury\n• `!services` - this message\n• `!price <symbol>` - market quotes\n\n**Paid**\n{paid_lines}\n• `!propose <idea>` - custom service, priced per request\n\n💡 **My limits:** ${limit} per transaction, ${budget} per day\n\nAll payments in USDT or USDC. Type `!pay` to send payment."
    )
}
