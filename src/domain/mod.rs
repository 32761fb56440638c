//! Domain module
//!
//! Core domain types and business rules.

pub mod amount;
pub mod error;
pub mod ids;

pub use amount::{format_money, AmountError, Cents};
pub use error::DomainError;
pub use ids::{PartyId, ScopeId};
