//! Basic Handler
//!
//! `/help` pager and `/wifi`.

use std::sync::Arc;

use crate::config::BotConfig;

use super::response::{Button, ButtonStyle, CommandResponse, Embed, COLOR_BLURPLE, COLOR_GOLD, COLOR_GREEN};
use super::HelpPage;

const UNKNOWN: &str = "Unknown";

/// Handler for static, configuration-backed commands
pub struct BasicHandler {
    config: Arc<BotConfig>,
}

impl BasicHandler {
    pub fn new(config: Arc<BotConfig>) -> Self {
        Self { config }
    }

    /// Render one help page with the pager buttons
    pub fn help(&self, page: HelpPage) -> CommandResponse {
        let embed = match page {
            HelpPage::Basic => basic_help_embed(),
            HelpPage::Budget => budget_help_embed(),
            HelpPage::Reminders => reminders_help_embed(),
            HelpPage::Close => {
                return CommandResponse::private("Help closed.").with_buttons(pager_buttons(None));
            }
        };

        CommandResponse::default()
            .with_embed(embed)
            .with_buttons(pager_buttons(Some(page)))
            .ephemeral()
    }

    /// Guest WiFi credentials
    pub fn wifi(&self) -> CommandResponse {
        let name = self.config.wifi_name.as_deref().unwrap_or(UNKNOWN);
        let password = self.config.wifi_password.as_deref().unwrap_or(UNKNOWN);

        CommandResponse::private(format!(
            "**📶 Guest Wi-Fi Information**\n```ini\nSSID     = {name}\nPassword = {password}\n```"
        ))
    }
}

/// Pager buttons; the active page is highlighted, all disabled once closed
fn pager_buttons(active: Option<HelpPage>) -> Vec<Button> {
    let page_button = |page: HelpPage, id: &str, label: &str| Button {
        custom_id: format!("help:{id}"),
        label: label.to_string(),
        style: if active == Some(page) {
            ButtonStyle::Primary
        } else {
            ButtonStyle::Secondary
        },
        disabled: active.is_none(),
    };

    vec![
        page_button(HelpPage::Basic, "basic", "Basic"),
        page_button(HelpPage::Budget, "budget", "Budget"),
        page_button(HelpPage::Reminders, "reminders", "Reminders"),
        Button {
            custom_id: "help:close".to_string(),
            label: "Close".to_string(),
            style: ButtonStyle::Danger,
            disabled: active.is_none(),
        },
    ]
}

fn basic_help_embed() -> Embed {
    Embed::new("🤖 StavidBot: Basic", COLOR_GREEN)
        .description("General utility commands.")
        .field("/wifi", "📶 Get the guest Wi-Fi network name and password.")
        .footer("Use the buttons below to switch pages.")
}

fn budget_help_embed() -> Embed {
    Embed::new("💸 StavidBot: Budget", COLOR_BLURPLE)
        .description("Track shared expenses and payments.")
        .field(
            "/venmo",
            "Log an expense owed by your partner. Example: `/venmo amount: 23.50 note: Dinner`",
        )
        .field(
            "/pay",
            "Record a payment you made. Example: `/pay amount: 50 note: Rent share`",
        )
        .field("/balance", "Check the current net balance between you and your partner.")
        .field("/ledger", "See the itemized ledger for this month.")
        .field("/rent", "Log your partner's share of this month's rent.")
        .field("/settle", "Close the books: everything so far counts as settled.")
        .footer("Use the buttons below to switch pages.")
}

fn reminders_help_embed() -> Embed {
    Embed::new("⏰ StavidBot: Reminders", COLOR_GOLD)
        .description("Shared reminders.")
        .field(
            "/remind",
            "Create a reminder. Example: `/remind date: 2025-08-08 time: 15:00 note: Trash day`",
        )
        .field("/reminders", "View all active reminders.")
        .field("/reset_reminders", "Mark all reminders as done.")
        .footer("Use the buttons below to switch pages.")
}
