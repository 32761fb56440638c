//! Ledger entries
//!
//! One row per recorded transaction. Direction is carried by the
//! creditor/debtor roles, never by the sign of the amount.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Cents, DomainError, PartyId, ScopeId};

/// A persisted, immutable ledger row.
///
/// `creditor_id` is owed `amount_cents` by `debtor_id`. Only `settled` ever
/// changes after insertion, and only from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LedgerEntry {
    pub id: i64,
    pub scope_id: ScopeId,
    pub creditor_id: PartyId,
    pub debtor_id: PartyId,
    pub amount_cents: i64,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub settled: bool,
}

impl LedgerEntry {
    /// True when the entry is between exactly these two parties, in either role.
    pub fn is_between(&self, a: PartyId, b: PartyId) -> bool {
        (self.creditor_id == a && self.debtor_id == b)
            || (self.creditor_id == b && self.debtor_id == a)
    }

    /// Signed contribution of this entry to `me`'s position against `partner`.
    ///
    /// Settled entries and entries involving anyone else contribute 0.
    pub fn signed_for(&self, me: PartyId, partner: PartyId) -> i64 {
        if self.settled {
            return 0;
        }
        if self.creditor_id == me && self.debtor_id == partner {
            self.amount_cents
        } else if self.creditor_id == partner && self.debtor_id == me {
            -self.amount_cents
        } else {
            0
        }
    }
}

/// A validated entry waiting to be appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    pub scope_id: ScopeId,
    pub creditor_id: PartyId,
    pub debtor_id: PartyId,
    pub amount: Cents,
    pub note: String,
}

impl NewLedgerEntry {
    /// Validate a transaction before it reaches storage.
    ///
    /// # Errors
    /// - `DomainError::InvalidAmount` if `amount_cents <= 0` or above the
    ///   $1,000,000.00 cap
    /// - `DomainError::SameParty` if creditor equals debtor
    pub fn new(
        scope_id: ScopeId,
        creditor_id: PartyId,
        debtor_id: PartyId,
        amount_cents: i64,
        note: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let amount = Cents::new(amount_cents)?;

        if creditor_id == debtor_id {
            return Err(DomainError::SameParty);
        }

        Ok(Self {
            scope_id,
            creditor_id,
            debtor_id,
            amount,
            note: note.into(),
        })
    }
}
