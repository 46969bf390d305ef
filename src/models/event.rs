// file: src/event.rs
use chrono::{DateTime, Duration, Local, Utc};
use std::fmt;

/// Look-ahead used for the tooltip summary.
pub const SOON_WINDOW_HOURS: i64 = 12;
/// Look-ahead used for notifications.
pub const VERY_SOON_WINDOW_MINUTES: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub uid: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub all_day: bool,
}

impl Event {
    pub fn time_left(&self, now: DateTime<Utc>) -> Duration {
        self.start - now
    }

    pub fn ended(&self, now: DateTime<Utc>) -> bool {
        self.end < now
    }

    /// Starts within the next 12 hours.
    pub fn soon(&self, now: DateTime<Utc>) -> bool {
        let left = self.time_left(now);
        left > Duration::zero() && left < Duration::hours(SOON_WINDOW_HOURS)
    }

    /// Starts within the next 10 minutes.
    pub fn very_soon(&self, now: DateTime<Utc>) -> bool {
        let left = self.time_left(now);
        left > Duration::zero() && left < Duration::minutes(VERY_SOON_WINDOW_MINUTES)
    }

    pub fn running(&self, now: DateTime<Utc>) -> bool {
        self.start < now && now < self.end
    }

    /// Fractional minutes until start, as shown in the notification title.
    pub fn minutes_left(&self, now: DateTime<Utc>) -> f64 {
        self.time_left(now).num_seconds() as f64 / 60.0
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {}",
            self.start.with_timezone(&Local).format("%H:%M"),
            self.end.with_timezone(&Local).format("%H:%M"),
            self.summary
        )
    }
}
