//! Balance Engine
//!
//! Derives a party's net position from the ledger without mutating it.
//! Nothing is cached: every answer is recomputed from the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{PartyId, ScopeId};

use super::{LedgerEntry, LedgerError, LedgerStore, Window};

/// Stateless fold over ledger entries.
///
/// `(me -> partner)` adds, `(partner -> me)` subtracts, settled entries and
/// other pairs contribute nothing. Callers are responsible for scoping.
pub fn fold_net_balance<'a>(
    entries: impl IntoIterator<Item = &'a LedgerEntry>,
    me: PartyId,
    partner: PartyId,
) -> i64 {
    entries
        .into_iter()
        .map(|entry| entry.signed_for(me, partner))
        .sum()
}

/// Where a party stands against their partner, as absolute cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetPosition {
    /// Partner owes me
    Owed(i64),
    /// I owe partner
    Owes(i64),
    Square,
}

impl NetPosition {
    pub fn from_cents(net_cents: i64) -> Self {
        match net_cents {
            n if n > 0 => Self::Owed(n.saturating_abs()),
            n if n < 0 => Self::Owes(n.saturating_abs()),
            _ => Self::Square,
        }
    }
}

/// Itemized entries for a window plus the current net.
#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    pub scope_id: ScopeId,
    pub me: PartyId,
    pub partner: PartyId,
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
    pub entries: Vec<LedgerEntry>,
    pub net_cents: i64,
}

/// Read-side queries over a ledger store
#[derive(Clone)]
pub struct BalanceEngine {
    store: Arc<dyn LedgerStore>,
}

impl BalanceEngine {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Net balance of `me` against `partner` over unsettled entries.
    ///
    /// Positive: partner owes me. Negative: I owe partner. Zero when there
    /// is nothing outstanding.
    pub async fn net_balance(
        &self,
        scope_id: ScopeId,
        me: PartyId,
        partner: PartyId,
    ) -> Result<i64, LedgerError> {
        self.store.net_between(scope_id, me, partner).await
    }

    /// Entries between the two parties inside `window`, with the current net.
    pub async fn statement(
        &self,
        scope_id: ScopeId,
        me: PartyId,
        partner: PartyId,
        window: Window,
    ) -> Result<Statement, LedgerError> {
        let entries = self
            .store
            .list_between(scope_id, me, partner, window)
            .await?;
        let net_cents = self.net_balance(scope_id, me, partner).await?;

        Ok(Statement {
            scope_id,
            me,
            partner,
            since: window.since,
            until: window.until,
            entries,
            net_cents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedgerStore;

    const S: ScopeId = ScopeId(1);
    const A: PartyId = PartyId(10);
    const B: PartyId = PartyId(20);
    const C: PartyId = PartyId(30);

    fn entry(id: i64, creditor: PartyId, debtor: PartyId, amount_cents: i64) -> LedgerEntry {
        LedgerEntry {
            id,
            scope_id: S,
            creditor_id: creditor,
            debtor_id: debtor,
            amount_cents,
            note: format!("entry {id}"),
            created_at: Utc::now(),
            settled: false,
        }
    }

    #[test]
    fn test_fold_ignores_third_parties_and_settled() {
        let mut settled = entry(4, A, B, 10_000);
        settled.settled = true;
        let entries = vec![
            entry(1, A, B, 500),
            entry(2, B, A, 200),
            entry(3, A, C, 7_000),
            settled,
        ];

        assert_eq!(fold_net_balance(&entries, A, B), 300);
        assert_eq!(fold_net_balance(&entries, B, A), -300);
        assert_eq!(fold_net_balance(&entries, A, C), 7_000);
    }

    #[test]
    fn test_fold_empty_is_zero() {
        assert_eq!(fold_net_balance(&Vec::<LedgerEntry>::new(), A, B), 0);
    }

    #[test]
    fn test_net_position() {
        assert_eq!(NetPosition::from_cents(0), NetPosition::Square);
        assert_eq!(NetPosition::from_cents(300), NetPosition::Owed(300));
        assert_eq!(NetPosition::from_cents(-300), NetPosition::Owes(300));
        assert_eq!(
            NetPosition::from_cents(i64::MIN),
            NetPosition::Owes(i64::MAX)
        );
    }

    #[tokio::test]
    async fn test_engine_matches_fold_over_listing() {
        let store = Arc::new(InMemoryLedgerStore::new());
        store.record(S, A, B, 1_250, "rent").await.unwrap();
        store.record(S, B, A, 400, "dinner").await.unwrap();
        store.record(S, A, B, 99, "coffee").await.unwrap();

        let engine = BalanceEngine::new(store.clone());
        let window = Window::current_month(Utc::now());
        let statement = engine.statement(S, A, B, window).await.unwrap();

        assert_eq!(statement.entries.len(), 3);
        assert_eq!(statement.net_cents, 949);
        assert_eq!(fold_net_balance(&statement.entries, A, B), statement.net_cents);
        assert_eq!(engine.net_balance(S, B, A).await.unwrap(), -949);
    }
}
