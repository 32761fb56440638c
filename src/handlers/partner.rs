//! Partner resolution
//!
//! The ledger is strictly two-party; the counterparty comes from the
//! configured partner ids rather than a member directory lookup.

use std::collections::BTreeSet;

use crate::domain::{DomainError, PartyId, ScopeId};

#[derive(Debug, Clone, Default)]
pub struct PartnerDirectory {
    partner_ids: BTreeSet<PartyId>,
}

impl PartnerDirectory {
    pub fn new(partner_ids: BTreeSet<PartyId>) -> Self {
        Self { partner_ids }
    }

    /// The other configured partner, if `me` is one of them.
    pub fn partner_of(&self, me: PartyId) -> Result<PartyId, DomainError> {
        if !self.partner_ids.contains(&me) {
            return Err(DomainError::PartnerUnresolved);
        }
        self.partner_ids
            .iter()
            .copied()
            .find(|id| *id != me)
            .ok_or(DomainError::PartnerUnresolved)
    }

    /// Scope and counterparty for an invocation. Direct messages have no
    /// scope and therefore no partner.
    pub fn resolve(
        &self,
        scope_id: Option<ScopeId>,
        me: PartyId,
    ) -> Result<PartyContext, DomainError> {
        let scope_id = scope_id.ok_or(DomainError::PartnerUnresolved)?;
        let partner = self.partner_of(me)?;
        Ok(PartyContext {
            scope_id,
            me,
            partner,
        })
    }
}

/// Invoker and counterparty inside a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartyContext {
    pub scope_id: ScopeId,
    pub me: PartyId,
    pub partner: PartyId,
}
