//! Reminders module
//!
//! Scheduled notes between the two partners. Reminders are recorded and
//! listed here; delivering them is up to the chat gateway.

mod reminder;
mod store;

pub use reminder::{parse_schedule, NewReminder, Reminder};
pub use store::{InMemoryReminderStore, PgReminderStore, ReminderError, ReminderStore};
