//! `HH:MM:SS` time-of-day values and the `HH:MM` remaining-time display.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::TimeError;

pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Parse a 24-hour zero-padded `HH:MM:SS` string.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, TimeError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| TimeError::Malformed {
        value: value.to_string(),
    })
}

/// Format a time of day as the wire form `HH:MM:SS`.
pub fn format_time_of_day(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// `HH:MM` prefix of a wire time, for display. Short inputs come back as-is.
pub fn short_time(value: &str) -> &str {
    value.get(..5).unwrap_or(value)
}

/// `date` at `time`'s hour and minute, seconds dropped.
pub(crate) fn at_hour_minute(date: NaiveDate, time: NaiveTime) -> NaiveDateTime {
    // hour/minute come from a valid NaiveTime, so this cannot be out of range
    date.and_hms_opt(time.hour(), time.minute(), 0)
        .unwrap_or_else(|| date.and_time(time))
}

/// Time left before a habit window opens, truncated to whole minutes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RemainingTime {
    pub hours: i64,
    pub minutes: i64,
}

impl RemainingTime {
    pub const ZERO: RemainingTime = RemainingTime {
        hours: 0,
        minutes: 0,
    };

    /// Negative durations clamp to zero; seconds are dropped.
    pub fn from_duration(duration: Duration) -> Self {
        let secs = duration.num_seconds().max(0);
        Self {
            hours: secs / 3600,
            minutes: secs % 3600 / 60,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::hours(self.hours) + Duration::minutes(self.minutes)
    }
}

impl fmt::Display for RemainingTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hours, self.minutes)
    }
}
