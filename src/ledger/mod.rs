//! Ledger module
//!
//! Shared two-party expense ledger: an append-only store of signed
//! transactions and the balance queries derived from it.

pub mod balance;
mod entry;
mod memory;
mod period;
mod store;

pub use balance::{fold_net_balance, BalanceEngine, NetPosition, Statement};
pub use entry::{LedgerEntry, NewLedgerEntry};
pub use memory::InMemoryLedgerStore;
pub use period::Window;
pub use store::{LedgerError, LedgerStore, PgLedgerStore};
