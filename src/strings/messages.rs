//! # Messages
//!
//! Constant strings and format functions for user-facing replies: payment
//! notifications, rejections, and the apologies shown when an upstream
//! service is unavailable.

pub const WELCOME: &str = "👋 Hello! I'm **barter**.

I offer small paid services and can help your room:

**Free commands**
• `!help` - show all commands
• `!balance` - my treasury and spending
• `!services` - what I can do
• `!price <symbol>` - market quote

**Paid services**
• `!alert <symbol> <price>` - price alerts
• `!summarize <url>` - article summaries
• `!image <prompt>` - image generation
• `!code <description>` - code snippets

Type `!help` for details.";

pub const BALANCES_UNAVAILABLE: &str =
    "⚠️ Unable to fetch balances right now. Try again later.";
pub const INVOICE_UNAVAILABLE: &str =
    "⚠️ Could not create the invoice right now. Try again later.";
pub const STATUS_UNAVAILABLE: &str =
    "⚠️ Could not check that payment. Make sure the order id is correct.";

pub const PRICE_USAGE: &str = "Usage: `!price <symbol>`\nExample: `!price BTC`";
pub const PROPOSE_USAGE: &str =
    "Usage: `!propose <your idea>`\nExample: `!propose a script that watches shop prices`";
pub const PAY_USAGE: &str = "Usage: `!pay <amount> <currency>`\nExample: `!pay 0.50 USDT`";
pub const STATUS_USAGE: &str = "Usage: `!status <order_id>`";

pub fn rejection(action: &str, reason: &str) -> String {
    format!("❌ Cannot {action}: {reason}")
}

pub fn service_instructions(title: &str, detail: &str, price: &str) -> String {
    format!(
        "💳 **{title}**\n{detail}\n\nThis service costs ${price}. Pay with:\n`!pay {price} USDT`"
    )
}

pub fn proposal(idea: &str, price: &str, reasoning: &str) -> String {
    format!(
        "🤖 **Custom Service Proposal**\n\nYour request: {idea}\n\n**Recommended price:** ${price}\n**Reasoning:** {reasoning}\n\nPay with `!pay {price} USDT` to go ahead."
    )
}

pub fn invoice_created(order_id: &str, amount: &str, currency: &str, url: &str, address: &str) -> String {
    format!(
        "🧾 **Invoice created**\n\nOrder: `{order_id}`\nAmount: {amount} {currency}\nPay at: {url}\nAddress: `{address}`\n\nUse `!status {order_id}` to check progress."
    )
}

pub fn payment_confirmed(order_id: &str) -> String {
    format!("✅ **Payment confirmed!**\nOrder: `{order_id}`\nThank you! 🙏")
}

pub fn payment_expired(order_id: &str) -> String {
    format!("⏰ Payment expired. Order: `{order_id}`")
}

pub fn payment_status(order_id: &str, status: &str) -> String {
    format!("📋 **Payment Status**\n\nOrder: `{order_id}`\nStatus: {status}")
}

pub fn quote_unavailable(symbol: &str) -> String {
    format!("📉 No market feed is wired up yet - `{symbol}` quotes are coming soon.")
}

pub fn market_quote(symbol: &str, price: &str, change: &str) -> String {
    format!("💰 **{symbol}**\n\nCurrent: ${price}\n24h change: {change}%")
}

pub fn invalid_amount(raw: &str) -> String {
    format!("⚠️ `{raw}` is not a valid positive amount.")
}

pub const QUOTES_UNAVAILABLE: &str = "⚠️ Unable to fetch quotes right now. Try again later.";
