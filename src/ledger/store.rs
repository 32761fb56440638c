//! Ledger Store
//!
//! Durable, append-only record of transactions, scoped by context.
//! Balances are never stored; they are aggregated from the rows on demand,
//! so concurrent appends cannot race on a running total.

use async_trait::async_trait;
use sqlx::{PgExecutor, PgPool};

use crate::domain::{DomainError, PartyId, ScopeId};

use super::{LedgerEntry, NewLedgerEntry, Window};

/// Ledger store errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Append-only storage for ledger entries.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Append one validated entry; assigns id and timestamp.
    async fn append(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerError>;

    /// Append one entry and read back `creditor`'s net against `debtor` in
    /// the same transaction.
    async fn append_with_balance(
        &self,
        entry: NewLedgerEntry,
    ) -> Result<(LedgerEntry, i64), LedgerError>;

    /// Entries between exactly these two parties created inside `window`,
    /// oldest first.
    async fn list_between(
        &self,
        scope_id: ScopeId,
        party_a: PartyId,
        party_b: PartyId,
        window: Window,
    ) -> Result<Vec<LedgerEntry>, LedgerError>;

    /// Conditional sum over unsettled entries; positive means `partner` owes `me`.
    async fn net_between(
        &self,
        scope_id: ScopeId,
        me: PartyId,
        partner: PartyId,
    ) -> Result<i64, LedgerError>;

    /// Mark every unsettled entry in scope as settled. Returns rows changed.
    async fn settle_all(&self, scope_id: ScopeId) -> Result<u64, LedgerError>;

    /// Validate and append a transaction.
    ///
    /// # Errors
    /// - `DomainError::InvalidAmount` if `amount_cents <= 0` or above the cap
    /// - `DomainError::SameParty` if creditor equals debtor
    async fn record(
        &self,
        scope_id: ScopeId,
        creditor_id: PartyId,
        debtor_id: PartyId,
        amount_cents: i64,
        note: &str,
    ) -> Result<LedgerEntry, LedgerError> {
        let entry = NewLedgerEntry::new(scope_id, creditor_id, debtor_id, amount_cents, note)?;
        self.append(entry).await
    }
}

// =========================================================================
// PostgreSQL
// =========================================================================

const ENTRY_COLUMNS: &str =
    "id, scope_id, creditor_id, debtor_id, amount_cents, note, created_at, settled";

/// PostgreSQL-backed ledger store
#[derive(Debug, Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        entry: &NewLedgerEntry,
    ) -> Result<LedgerEntry, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO ledger_entries (scope_id, creditor_id, debtor_id, amount_cents, note)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ENTRY_COLUMNS}
            "#
        );

        sqlx::query_as::<_, LedgerEntry>(&sql)
            .bind(entry.scope_id)
            .bind(entry.creditor_id)
            .bind(entry.debtor_id)
            .bind(entry.amount.value())
            .bind(&entry.note)
            .fetch_one(executor)
            .await
    }

    async fn net<'e, E: PgExecutor<'e>>(
        executor: E,
        scope_id: ScopeId,
        me: PartyId,
        partner: PartyId,
    ) -> Result<i64, sqlx::Error> {
        // SUM over BIGINT yields NUMERIC, hence the cast
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(
                CASE
                    WHEN creditor_id = $2 AND debtor_id = $3 THEN amount_cents
                    WHEN creditor_id = $3 AND debtor_id = $2 THEN -amount_cents
                    ELSE 0
                END
            ), 0)::BIGINT
            FROM ledger_entries
            WHERE scope_id = $1 AND settled = FALSE
            "#,
        )
        .bind(scope_id)
        .bind(me)
        .bind(partner)
        .fetch_one(executor)
        .await
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn append(&self, entry: NewLedgerEntry) -> Result<LedgerEntry, LedgerError> {
        let stored = Self::insert(&self.pool, &entry).await?;

        tracing::debug!(
            entry_id = stored.id,
            scope_id = %stored.scope_id,
            creditor_id = %stored.creditor_id,
            debtor_id = %stored.debtor_id,
            amount_cents = stored.amount_cents,
            "Ledger entry recorded"
        );

        Ok(stored)
    }

    async fn append_with_balance(
        &self,
        entry: NewLedgerEntry,
    ) -> Result<(LedgerEntry, i64), LedgerError> {
        let mut tx = self.pool.begin().await?;

        let stored = Self::insert(&mut *tx, &entry).await?;
        let net = Self::net(&mut *tx, entry.scope_id, entry.creditor_id, entry.debtor_id).await?;

        tx.commit().await?;

        tracing::debug!(
            entry_id = stored.id,
            scope_id = %stored.scope_id,
            amount_cents = stored.amount_cents,
            net_cents = net,
            "Ledger entry recorded with balance"
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
        let sql = format!(
            r#"
            SELECT {ENTRY_COLUMNS}
            FROM ledger_entries
            WHERE scope_id = $1
              AND ((creditor_id = $2 AND debtor_id = $3)
                OR (creditor_id = $3 AND debtor_id = $2))
              AND created_at >= $4
              AND created_at < $5
            ORDER BY created_at ASC, id ASC
            "#
        );

        let entries = sqlx::query_as::<_, LedgerEntry>(&sql)
            .bind(scope_id)
            .bind(party_a)
            .bind(party_b)
            .bind(window.since)
            .bind(window.until)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    async fn net_between(
        &self,
        scope_id: ScopeId,
        me: PartyId,
        partner: PartyId,
    ) -> Result<i64, LedgerError> {
        Ok(Self::net(&self.pool, scope_id, me, partner).await?)
    }

    async fn settle_all(&self, scope_id: ScopeId) -> Result<u64, LedgerError> {
        let result = sqlx::query(
            r#"
            UPDATE ledger_entries
            SET settled = TRUE
            WHERE scope_id = $1 AND settled = FALSE
            "#,
        )
        .bind(scope_id)
        .execute(&self.pool)
        .await?;

        let rows_settled = result.rows_affected();

        tracing::info!(
            scope_id = %scope_id,
            rows_settled = rows_settled,
            "Settled ledger entries"
        );

        Ok(rows_settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_error_display() {
        let err: LedgerError = DomainError::SameParty.into();
        assert_eq!(err.to_string(), "Creditor and debtor must be different parties");

        let err: LedgerError = sqlx::Error::RowNotFound.into();
        assert!(err.to_string().starts_with("Database error"));
    }
}
