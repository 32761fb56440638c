//! stavid_bot Library
//!
//! Re-exports modules for integration testing and the server binary.

pub mod api;
pub mod config;
pub mod db;
pub mod domain;
mod error;
pub mod handlers;
pub mod ledger;
pub mod reminders;

pub use config::{BotConfig, Config};
pub use domain::{AmountError, Cents, DomainError, PartyId, ScopeId};
pub use error::{AppError, AppResult};
