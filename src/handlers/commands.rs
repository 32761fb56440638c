//! Command definitions
//!
//! Commands represent slash-command invocations forwarded by the chat
//! gateway, already tagged with the invoking user and server.

use serde::{Deserialize, Serialize};

use crate::domain::{Cents, DomainError, PartyId, ScopeId};

/// One slash-command invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Server the command was used in; absent for direct messages
    #[serde(default)]
    pub scope_id: Option<ScopeId>,
    pub user_id: PartyId,
    pub command: Command,
}

impl CommandInvocation {
    pub fn new(scope_id: Option<ScopeId>, user_id: PartyId, command: Command) -> Self {
        Self {
            scope_id,
            user_id,
            command,
        }
    }
}

/// Slash commands the bot understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Command {
    /// `/help`, or a pager button press
    Help {
        #[serde(default)]
        page: HelpPage,
    },
    /// `/wifi`
    Wifi,
    /// `/venmo`: the partner owes the invoker `amount`
    Venmo { amount: AmountInput, note: String },
    /// `/pay`: the invoker paid the partner `amount`
    Pay {
        amount: AmountInput,
        #[serde(default = "default_payment_note")]
        note: String,
    },
    /// `/balance`
    Balance,
    /// `/ledger`: itemized entries for this month
    Ledger,
    /// `/rent`: log the monthly rent share
    Rent,
    /// `/settle`: close the accounting period
    Settle,
    /// Amount suggestion for `/pay`
    SuggestPayment,
    /// `/remind`
    Remind {
        #[serde(default)]
        date: Option<String>,
        #[serde(default)]
        time: Option<String>,
        note: String,
        #[serde(default)]
        location: Option<String>,
    },
    /// `/reminders`
    Reminders,
    /// `/reset_reminders`
    ResetReminders,
}

impl Command {
    /// Slash-command name, for logs
    pub fn name(&self) -> &'static str {
        match self {
            Command::Help { .. } => "help",
            Command::Wifi => "wifi",
            Command::Venmo { .. } => "venmo",
            Command::Pay { .. } => "pay",
            Command::Balance => "balance",
            Command::Ledger => "ledger",
            Command::Rent => "rent",
            Command::Settle => "settle",
            Command::SuggestPayment => "suggest_payment",
            Command::Remind { .. } => "remind",
            Command::Reminders => "reminders",
            Command::ResetReminders => "reset_reminders",
        }
    }
}

fn default_payment_note() -> String {
    "Payment made".to_string()
}

/// Help pager pages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelpPage {
    #[default]
    Basic,
    Budget,
    Reminders,
    /// Close button
    Close,
}

/// Monetary input as typed by the user: a decimal string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Text(String),
    Number(f64),
}

impl AmountInput {
    /// Round half-up to whole cents.
    pub fn to_cents(&self) -> Result<Cents, DomainError> {
        let cents = match self {
            AmountInput::Text(text) => text.parse::<Cents>()?,
            AmountInput::Number(value) => Cents::from_f64(*value)?,
        };
        Ok(cents)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_string())
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}
