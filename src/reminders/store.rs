//! Reminder Store
//!
//! Reminders are only ever created and marked done; nothing is deleted.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::domain::ScopeId;

use super::{NewReminder, Reminder};

/// Reminder store errors
#[derive(Debug, thiserror::Error)]
pub enum ReminderError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Storage for reminder notes
#[async_trait]
pub trait ReminderStore: Send + Sync {
    async fn create(&self, reminder: NewReminder) -> Result<Reminder, ReminderError>;

    /// Not-done reminders in scope: ASAP first, then by due time.
    async fn list_active(&self, scope_id: ScopeId) -> Result<Vec<Reminder>, ReminderError>;

    /// Mark every active reminder in scope done. Returns rows changed.
    async fn complete_all(&self, scope_id: ScopeId) -> Result<u64, ReminderError>;
}

const REMINDER_COLUMNS: &str =
    "id, scope_id, creator_id, partner_id, remind_at, note, location, done, created_at";

/// PostgreSQL-backed reminder store
#[derive(Debug, Clone)]
pub struct PgReminderStore {
    pool: PgPool,
}

impl PgReminderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReminderStore for PgReminderStore {
    async fn create(&self, reminder: NewReminder) -> Result<Reminder, ReminderError> {
        let sql = format!(
            r#"
            INSERT INTO reminder_entries (scope_id, creator_id, partner_id, remind_at, note, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {REMINDER_COLUMNS}
            "#
        );

        let stored = sqlx::query_as::<_, Reminder>(&sql)
            .bind(reminder.scope_id)
            .bind(reminder.creator_id)
            .bind(reminder.partner_id)
            .bind(reminder.remind_at)
            .bind(&reminder.note)
            .bind(&reminder.location)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(
            reminder_id = stored.id,
            scope_id = %stored.scope_id,
            remind_at = ?stored.remind_at,
            "Reminder created"
        );

        Ok(stored)
    }

    async fn list_active(&self, scope_id: ScopeId) -> Result<Vec<Reminder>, ReminderError> {
        let sql = format!(
            r#"
            SELECT {REMINDER_COLUMNS}
            FROM reminder_entries
            WHERE scope_id = $1 AND done = FALSE
            ORDER BY remind_at ASC NULLS FIRST, id ASC
            "#
        );

        let reminders = sqlx::query_as::<_, Reminder>(&sql)
            .bind(scope_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(reminders)
    }

    async fn complete_all(&self, scope_id: ScopeId) -> Result<u64, ReminderError> {
        let result = sqlx::query(
            r#"
            UPDATE reminder_entries
            SET done = TRUE
            WHERE scope_id = $1 AND done = FALSE
            "#,
        )
        .bind(scope_id)
        .execute(&self.pool)
        .await?;

        let rows_completed = result.rows_affected();

        if rows_completed > 0 {
            tracing::info!(
                scope_id = %scope_id,
                rows_completed = rows_completed,
                "Marked reminders done"
            );
        }

        Ok(rows_completed)
    }
}

/// Vec-backed reminder store for tests and database-less runs
#[derive(Debug, Default)]
pub struct InMemoryReminderStore {
    reminders: RwLock<Vec<Reminder>>,
}

impl InMemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReminderStore for InMemoryReminderStore {
    async fn create(&self, reminder: NewReminder) -> Result<Reminder, ReminderError> {
        let mut reminders = self.reminders.write().await;
        let stored = Reminder {
            id: reminders.len() as i64 + 1,
            scope_id: reminder.scope_id,
            creator_id: reminder.creator_id,
            partner_id: reminder.partner_id,
            remind_at: reminder.remind_at,
            note: reminder.note,
            location: reminder.location,
            done: false,
            created_at: Utc::now(),
        };
        reminders.push(stored.clone());
        Ok(stored)
    }

    async fn list_active(&self, scope_id: ScopeId) -> Result<Vec<Reminder>, ReminderError> {
        let reminders = self.reminders.read().await;
        let mut active: Vec<Reminder> = reminders
            .iter()
            .filter(|r| r.scope_id == scope_id && !r.done)
            .cloned()
            .collect();
        // None sorts before Some, matching NULLS FIRST
        active.sort_by_key(|r| (r.remind_at, r.id));
        Ok(active)
    }

    async fn complete_all(&self, scope_id: ScopeId) -> Result<u64, ReminderError> {
        let mut reminders = self.reminders.write().await;
        let mut rows_completed = 0;
        for reminder in reminders
            .iter_mut()
            .filter(|r| r.scope_id == scope_id && !r.done)
        {
            reminder.done = true;
            rows_completed += 1;
        }
        Ok(rows_completed)
    }
}
