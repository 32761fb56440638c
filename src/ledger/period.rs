//! Time windows for itemized listings

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Half-open interval `[since, until)` over entry creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub since: DateTime<Utc>,
    pub until: DateTime<Utc>,
}

impl Window {
    pub fn new(since: DateTime<Utc>, until: DateTime<Utc>) -> Self {
        Self { since, until }
    }

    /// The calendar month (UTC) containing `now`.
    pub fn current_month(now: DateTime<Utc>) -> Self {
        let since = month_start(now.year(), now.month());
        let until = if now.month() == 12 {
            month_start(now.year() + 1, 1)
        } else {
            month_start(now.year(), now.month() + 1)
        };
        Self { since, until }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.since <= at && at < self.until
    }
}

fn month_start(year: i32, month: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
