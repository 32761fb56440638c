//! Command Handlers module
//!
//! Slash-command handlers. Each handler turns a command into ledger or
//! reminder operations and formats the reply; [`CommandDispatcher`] routes
//! an invocation to the right one.

mod basic_handler;
mod budget_handler;
mod commands;
mod partner;
mod reminder_handler;
pub mod response;


use std::sync::Arc;

pub use basic_handler::BasicHandler;
pub use budget_handler::{net_message, BudgetHandler};
pub use commands::*;
pub use partner::{PartnerDirectory, PartyContext};
pub use reminder_handler::ReminderHandler;
pub use response::CommandResponse;

use crate::config::BotConfig;
use crate::error::AppResult;
use crate::ledger::LedgerStore;
use crate::reminders::ReminderStore;

/// Routes invocations to handlers
pub struct CommandDispatcher {
    partners: PartnerDirectory,
    basic: BasicHandler,
    budget: BudgetHandler,
    reminders: ReminderHandler,
}

impl CommandDispatcher {
    pub fn new(
        config: Arc<BotConfig>,
        ledger: Arc<dyn LedgerStore>,
        reminders: Arc<dyn ReminderStore>,
    ) -> Self {
        Self {
            partners: PartnerDirectory::new(config.partner_ids.clone()),
            budget: BudgetHandler::new(ledger, config.rent),
            reminders: ReminderHandler::new(reminders, config.reminder_offset),
            basic: BasicHandler::new(config),
        }
    }

    /// Execute one invocation
    pub async fn dispatch(&self, invocation: CommandInvocation) -> AppResult<CommandResponse> {
        let CommandInvocation {
            scope_id,
            user_id,
            command,
        } = invocation;

        tracing::info!(
            command = command.name(),
            scope_id = ?scope_id,
            user_id = %user_id,
            "Handling command"
        );

        let pair = || self.partners.resolve(scope_id, user_id);

        match command {
            Command::Help { page } => Ok(self.basic.help(page)),
            Command::Wifi => Ok(self.basic.wifi()),

            Command::Venmo { amount, note } => self.budget.venmo(pair()?, &amount, &note).await,
            Command::Pay { amount, note } => self.budget.pay(pair()?, &amount, &note).await,
            Command::Balance => self.budget.balance(pair()?).await,
            Command::Ledger => self.budget.ledger(pair()?).await,
            Command::Rent => self.budget.rent(pair()?).await,
            Command::Settle => self.budget.settle(pair()?).await,
            Command::SuggestPayment => self.budget.suggest_payment(pair()?).await,

            Command::Remind {
                date,
                time,
                note,
                location,
            } => {
                self.reminders
                    .remind(pair()?, date.as_deref(), time.as_deref(), &note, location)
                    .await
            }
            Command::Reminders => self.reminders.reminders(pair()?.scope_id).await,
            Command::ResetReminders => self.reminders.reset(pair()?.scope_id).await,
        }
    }
}
