//! Domain Error Types
//!
//! Pure domain errors that don't depend on infrastructure.

use thiserror::Error;

use super::AmountError;

/// Business rule violations for ledger entries and reminders.
///
/// These are independent of the web/infrastructure layer; storage failures
/// live in the store error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Amount rounds to zero or negative cents, or exceeds the limit
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Creditor and debtor are the same party
    #[error("Creditor and debtor must be different parties")]
    SameParty,

    /// No counterparty could be determined for the invoking user
    #[error("Could not determine a partner (check PARTNER_IDS)")]
    PartnerUnresolved,

    /// Reminder date/time could not be understood
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    /// Feature needs configuration that is absent
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

impl DomainError {
    /// Create a not-configured error
    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured(what.into())
    }

    /// Check if this is a client error (user's fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidAmount(_) | Self::SameParty | Self::InvalidSchedule(_)
        )
    }
}

impl From<AmountError> for DomainError {
    fn from(err: AmountError) -> Self {
        Self::InvalidAmount(err.to_string())
    }
}
