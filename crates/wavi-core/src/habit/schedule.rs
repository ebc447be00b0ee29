//! Weekday and time-window derivations for a habit.
//!
//! All functions are pure: the caller passes the reference date or instant
//! (normally from a [`Clock`](crate::clock::Clock)). Instants are local
//! wall-clock values.
//!
//! Windows that cross midnight (`end_time < start_time`) are not modelled;
//! such a habit counts as expired as soon as its end time has passed today.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::time::{at_hour_minute, parse_time_of_day, RemainingTime};
use super::{Habit, HabitStatus};
use crate::error::TimeError;

/// Convert a Sunday-first weekday number (1=Sunday .. 7=Saturday) to the
/// backend's Monday-first numbering (1=Monday .. 7=Sunday).
///
/// `None` for anything outside 1..=7.
pub fn domain_weekday(platform_weekday: u32) -> Option<u8> {
    match platform_weekday {
        1 => Some(7),
        2..=7 => u8::try_from(platform_weekday - 1).ok(),
        _ => None,
    }
}

/// Whether `habit` is scheduled on `today`'s weekday.
pub fn is_scheduled_today(habit: &Habit, today: NaiveDate) -> bool {
    domain_weekday(today.weekday().number_from_sunday())
        .is_some_and(|weekday| habit.days_of_week.contains(weekday))
}

/// Time until the habit's start time today, or zero once it has started.
///
/// A start time that does not parse also yields zero; use
/// [`try_remaining_time`] to tell the two apart.
pub fn remaining_time(habit: &Habit, now: NaiveDateTime) -> RemainingTime {
    match try_remaining_time(habit, now) {
        Ok(remaining) => remaining,
        Err(e) => {
            tracing::warn!(habit_id = habit.id, error = %e, "treating malformed start time as no time remaining");
            RemainingTime::ZERO
        }
    }
}

/// Like [`remaining_time`] but reports a malformed start time.
pub fn try_remaining_time(habit: &Habit, now: NaiveDateTime) -> Result<RemainingTime, TimeError> {
    let start = parse_time_of_day(&habit.start_time)?;
    let today_start = at_hour_minute(now.date(), start);
    if now < today_start {
        Ok(RemainingTime::from_duration(today_start - now))
    } else {
        Ok(RemainingTime::ZERO)
    }
}

/// Whether today's window has closed: `now` is strictly after today's end
/// hour and minute.
pub fn is_expired(habit: &Habit, now: NaiveDateTime) -> Result<bool, TimeError> {
    let end = parse_time_of_day(&habit.end_time)?;
    Ok(now > at_hour_minute(now.date(), end))
}

/// Card text: `"100%"` when completed, `"0%"` when failed or deactivated,
/// otherwise the remaining time as `HH:MM`.
pub fn display_text(habit: &Habit, now: NaiveDateTime) -> String {
    match habit.status {
        HabitStatus::Completed => "100%".to_string(),
        HabitStatus::Failed | HabitStatus::Deactive => "0%".to_string(),
        HabitStatus::Active => remaining_time(habit, now).to_string(),
    }
}
