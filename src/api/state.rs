//! Shared application state

use std::sync::Arc;

use crate::config::BotConfig;
use crate::handlers::CommandDispatcher;
use crate::ledger::{BalanceEngine, LedgerStore};
use crate::reminders::ReminderStore;

/// State handed to every route and middleware
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<CommandDispatcher>,
    pub ledger: Arc<dyn LedgerStore>,
    pub engine: BalanceEngine,
    /// Hex SHA-256 of the accepted API key
    pub api_key_hash: Arc<str>,
}

impl AppState {
    pub fn new(
        bot: BotConfig,
        api_key_hash: impl Into<Arc<str>>,
        ledger: Arc<dyn LedgerStore>,
        reminders: Arc<dyn ReminderStore>,
    ) -> Self {
        Self {
            dispatcher: Arc::new(CommandDispatcher::new(Arc::new(bot), ledger.clone(), reminders)),
            engine: BalanceEngine::new(ledger.clone()),
            ledger,
            api_key_hash: api_key_hash.into(),
        }
    }
}
