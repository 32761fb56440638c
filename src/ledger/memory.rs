//! In-memory ledger store
//!
//! Same semantics as the PostgreSQL store, held behind a single lock.
//! Used by tests and for running the bot without a database.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::domain::{PartyId, ScopeId};

use super::balance::fold_net_balance;
use super::{LedgerEntry, LedgerError, LedgerStore, NewLedgerEntry, Window};

/// Vec-backed ledger; ids and timestamps are assigned under the write lock.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    entries: RwLock<Vec<LedgerEntry>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries across all scopes.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    fn push(entries: &mut Vec<LedgerEntry>, entry: NewLedgerEntry) -> LedgerEntry {
        let created_at = next_timestamp(entries.last().map(|e| e.created_at));
        let stored = LedgerEntry {
            id: entries.len() as i64 + 1,
            scope_id: entry.scope_id,
            creditor_id: entry.creditor_id,
            debtor_id: entry.debtor_id,
            amount_cents: entry.amount.value(),
            note: entry.note,
            created_at,
            settled: false,
        };
        entries.push(stored.clone());
        stored
    }
}

/// Wall-clock time, nudged forward so timestamps stay strictly monotonic with ids.
fn next_timestamp(last: Option<DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    match last {
        Some(last) if now <= last => last + Duration::microseconds(1),
        _ => now,
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn append(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerError> {
        let mut entries = self.entries.write().await;
        Ok(Self::push(&mut entries, entry))
    }

    async fn append_with_balance(
        &self,
        entry: NewLedgerEntry,
    ) -> Result<(LedgerEntry, i64), LedgerError> {
        let mut entries = self.entries.write().await;
        let (scope_id, me, partner) = (entry.scope_id, entry.creditor_id, entry.debtor_id);
        let stored = Self::push(&mut entries, entry);
        let net = fold_net_balance(
            entries.iter().filter(|e| e.scope_id == scope_id),
            me,
            partner,
        );
        Ok((stored, net))
    }

    async fn list_between(
        &self,
        scope_id: ScopeId,
        party_a: PartyId,
        party_b: PartyId,
        window: Window,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|e| {
                e.scope_id == scope_id
                    && e.is_between(party_a, party_b)
                    && window.contains(e.created_at)
            })
            .cloned()
            .collect())
    }

    async fn net_between(
        &self,
        scope_id: ScopeId,
        me: PartyId,
        partner: PartyId,
    ) -> Result<i64, LedgerError> {
        let entries = self.entries.read().await;
        Ok(fold_net_balance(
            entries.iter().filter(|e| e.scope_id == scope_id),
            me,
            partner,
        ))
    }

    async fn settle_all(&self, scope_id: ScopeId) -> Result<u64, LedgerError> {
        let mut entries = self.entries.write().await;
        let mut rows_settled = 0;
        for entry in entries
            .iter_mut()
            .filter(|e| e.scope_id == scope_id && !e.settled)
        {
            entry.settled = true;
            rows_settled += 1;
        }
        Ok(rows_settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    const S: ScopeId = ScopeId(100);
    const OTHER_SCOPE: ScopeId = ScopeId(200);
    const A: PartyId = PartyId(1);
    const B: PartyId = PartyId(2);

    fn all_time() -> Window {
        Window::new(DateTime::<Utc>::MIN_UTC, DateTime::<Utc>::MAX_UTC)
    }

    #[tokio::test]
    async fn test_record_then_net_both_directions() {
        let store = InMemoryLedgerStore::new();
        store.record(S, A, B, 500, "x").await.unwrap();

        assert_eq!(store.net_between(S, A, B).await.unwrap(), 500);
        assert_eq!(store.net_between(S, B, A).await.unwrap(), -500);
    }

    #[tokio::test]
    async fn test_opposing_entries_net_out() {
        let store = InMemoryLedgerStore::new();
        store.record(S, A, B, 500, "a").await.unwrap();
        store.record(S, B, A, 200, "b").await.unwrap();

        assert_eq!(store.net_between(S, A, B).await.unwrap(), 300);
    }

    #[tokio::test]
    async fn test_empty_ledger_nets_zero() {
        let store = InMemoryLedgerStore::new();
        assert_eq!(store.net_between(S, A, B).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_settle_all_zeroes_and_is_idempotent() {
        let store = InMemoryLedgerStore::new();
        store.record(S, A, B, 500, "a").await.unwrap();
        store.record(S, B, A, 200, "b").await.unwrap();
        store.record(OTHER_SCOPE, A, B, 900, "c").await.unwrap();

        assert_eq!(store.settle_all(S).await.unwrap(), 2);
        assert_eq!(store.net_between(S, A, B).await.unwrap(), 0);
        assert_eq!(store.settle_all(S).await.unwrap(), 0);

        // Other scopes untouched
        assert_eq!(store.net_between(OTHER_SCOPE, A, B).await.unwrap(), 900);

        // New activity is visible again
        store.record(S, B, A, 150, "after").await.unwrap();
        assert_eq!(store.net_between(S, A, B).await.unwrap(), -150);
    }

    #[tokio::test]
    async fn test_rejected_record_persists_nothing() {
        let store = InMemoryLedgerStore::new();

        let result = store.record(S, A, B, 0, "x").await;
        assert!(matches!(result, Err(LedgerError::Domain(DomainError::InvalidAmount(_)))));

        let result = store.record(S, A, A, 100, "x").await;
        assert!(matches!(result, Err(LedgerError::Domain(DomainError::SameParty))));

        assert!(store.is_empty().await);
        assert!(store.list_between(S, A, B, all_time()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_enforces_single_entry_cap() {
        let store = InMemoryLedgerStore::new();

        store.record(S, A, B, 100_000_000, "max").await.unwrap();

        let result = store.record(S, A, B, 100_000_001, "too big").await;
        assert!(matches!(result, Err(LedgerError::Domain(DomainError::InvalidAmount(_)))));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_list_between_filters_scope_window_and_orders() {
        let store = InMemoryLedgerStore::new();
        let first = store.record(S, A, B, 100, "first").await.unwrap();
        let foreign = store.record(OTHER_SCOPE, A, B, 200, "other scope").await.unwrap();
        let third = store.record(S, B, A, 300, "third").await.unwrap();

        assert!(first.created_at < foreign.created_at);
        assert!(foreign.created_at < third.created_at);

        let everything = store.list_between(S, A, B, all_time()).await.unwrap();
        let ids: Vec<i64> = everything.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![first.id, third.id]);

        // Window ending at the third entry excludes it
        let early = Window::new(first.created_at, third.created_at);
        let listed = store.list_between(S, B, A, early).await.unwrap();
        assert_eq!(listed, vec![first.clone()]);

        // Window starting at the third entry excludes the first
        let late = Window::new(third.created_at, DateTime::<Utc>::MAX_UTC);
        let listed = store.list_between(S, A, B, late).await.unwrap();
        assert_eq!(listed, vec![third]);
    }

    #[tokio::test]
    async fn test_append_with_balance_reads_back_net() {
        let store = InMemoryLedgerStore::new();
        store.record(S, B, A, 1000, "groceries").await.unwrap();

        let entry = NewLedgerEntry::new(S, A, B, 250, "dinner").unwrap();
        let (stored, net) = store.append_with_balance(entry).await.unwrap();

        assert_eq!(stored.amount_cents, 250);
        assert!(!stored.settled);
        assert_eq!(net, -750);
    }

    #[test]
    fn test_next_timestamp_is_monotonic() {
        let future = Utc::now() + Duration::hours(1);
        let next = next_timestamp(Some(future));
        assert_eq!(next, future + Duration::microseconds(1));
    }
}
