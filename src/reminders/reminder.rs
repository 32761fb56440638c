//! Reminder types and schedule parsing

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, PartyId, ScopeId};

/// Time of day used when only a date is given.
const DEFAULT_HOUR: u32 = 9;

/// A stored reminder. `remind_at` of `None` means "as soon as possible".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reminder {
    pub id: i64,
    pub scope_id: ScopeId,
    pub creator_id: PartyId,
    pub partner_id: PartyId,
    pub remind_at: Option<DateTime<Utc>>,
    pub note: String,
    pub location: Option<String>,
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

/// A reminder waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub scope_id: ScopeId,
    pub creator_id: PartyId,
    pub partner_id: PartyId,
    pub remind_at: Option<DateTime<Utc>>,
    pub note: String,
    pub location: Option<String>,
}

impl NewReminder {
    pub fn new(
        scope_id: ScopeId,
        creator_id: PartyId,
        partner_id: PartyId,
        remind_at: Option<DateTime<Utc>>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            scope_id,
            creator_id,
            partner_id,
            remind_at,
            note: note.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }
}

/// Turn optional `YYYY-MM-DD` / `HH:MM` input into a UTC instant.
///
/// Both blank: ASAP (`None`). Blank time: 09:00. Blank date: today in
/// `offset`. Input is interpreted in `offset` and converted to UTC.
pub fn parse_schedule(
    date: Option<&str>,
    time: Option<&str>,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> Result<Option<DateTime<Utc>>, DomainError> {
    let date = date.map(str::trim).filter(|d| !d.is_empty());
    let time = time.map(str::trim).filter(|t| !t.is_empty());

    if date.is_none() && time.is_none() {
        return Ok(None);
    }

    let day = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d").map_err(|_| {
            DomainError::InvalidSchedule(format!("date {d:?} is not YYYY-MM-DD"))
        })?,
        None => now.with_timezone(&offset).date_naive(),
    };

    let at = match time {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M")
            .map_err(|_| DomainError::InvalidSchedule(format!("time {t:?} is not HH:MM")))?,
        None => NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0)
            .ok_or_else(|| DomainError::InvalidSchedule("default time".to_string()))?,
    };

    let local = offset
        .from_local_datetime(&day.and_time(at))
        .single()
        .ok_or_else(|| DomainError::InvalidSchedule(format!("{day} {at} does not exist")))?;

    Ok(Some(local.with_timezone(&Utc)))
}
