//! Reminder Handler
//!
//! `/remind`, `/reminders` and `/reset_reminders`.

use std::sync::Arc;

use chrono::{FixedOffset, Utc};

use crate::domain::ScopeId;
use crate::error::AppResult;
use crate::reminders::{parse_schedule, NewReminder, Reminder, ReminderStore};

use super::partner::PartyContext;
use super::response::{capped_description, CommandResponse, Embed, COLOR_GOLD};

/// Handler for reminder commands
pub struct ReminderHandler {
    store: Arc<dyn ReminderStore>,
    offset: FixedOffset,
}

impl ReminderHandler {
    pub fn new(store: Arc<dyn ReminderStore>, offset: FixedOffset) -> Self {
        Self { store, offset }
    }

    /// `/remind`: blank date and time means as soon as possible
    pub async fn remind(
        &self,
        ctx: PartyContext,
        date: Option<&str>,
        time: Option<&str>,
        note: &str,
        location: Option<String>,
    ) -> AppResult<CommandResponse> {
        let remind_at = parse_schedule(date, time, self.offset, Utc::now())?;
        let reminder = NewReminder::new(ctx.scope_id, ctx.me, ctx.partner, remind_at, note)
            .with_location(location);

        let stored = self.store.create(reminder).await?;

        tracing::info!(
            reminder_id = stored.id,
            scope_id = %ctx.scope_id,
            remind_at = ?stored.remind_at,
            "Reminder created"
        );

        let mut message = format!(
            "⏰ **Reminder Set**\n**When:** {}\n**Note:** {}",
            when(&stored),
            stored.note
        );
        if let Some(location) = &stored.location {
            message.push_str(&format!("\n**Where:** {location}"));
        }
        message.push_str(&format!("\n**For:** {} and {}", ctx.me.mention(), ctx.partner.mention()));

        Ok(CommandResponse::public(message))
    }

    /// `/reminders`: active reminders in this scope
    pub async fn reminders(&self, scope_id: ScopeId) -> AppResult<CommandResponse> {
        let active = self.store.list_active(scope_id).await?;

        let description = if active.is_empty() {
            "No active reminders.".to_string()
        } else {
            let lines: Vec<String> = active.iter().map(reminder_line).collect();
            capped_description(&lines)
        };

        let embed = Embed::new("⏰ Active Reminders", COLOR_GOLD).description(description);
        Ok(CommandResponse::default().with_embed(embed).ephemeral())
    }

    /// `/reset_reminders`: mark every active reminder done
    pub async fn reset(&self, scope_id: ScopeId) -> AppResult<CommandResponse> {
        let rows_completed = self.store.complete_all(scope_id).await?;

        Ok(CommandResponse::private(format!(
            "✅ Marked {} {} as done.",
            rows_completed,
            if rows_completed == 1 { "reminder" } else { "reminders" }
        )))
    }
}

/// Chat timestamp markup, or ASAP
fn when(reminder: &Reminder) -> String {
    match reminder.remind_at {
        Some(at) => format!("<t:{}:F>", at.timestamp()),
        None => "As soon as possible".to_string(),
    }
}

fn reminder_line(reminder: &Reminder) -> String {
    let mut line = format!("• {} | {}", when(reminder), reminder.note);
    if let Some(location) = &reminder.location {
        line.push_str(&format!(" @ {location}"));
    }
    line.push_str(&format!(" (by {})", reminder.creator_id.mention()));
    line
}
