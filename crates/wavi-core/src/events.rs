use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::habit::{HabitId, HabitStatus};

/// Why a habit left the `ACTIVE` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeactivationCause {
    /// The user recorded a failure.
    UserFailure,
    /// The habit's window closed while it was still active.
    Expired,
}

/// Every status change in the today view produces an Event.
/// The CLI prints them; tests assert on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    HabitsRefreshed {
        total: usize,
        scheduled_today: usize,
        at: NaiveDateTime,
    },
    /// The calendar date changed between two refreshes; overlays were dropped.
    DayRolledOver {
        previous: Option<NaiveDate>,
        current: NaiveDate,
        cleared: usize,
    },
    HabitCompleted {
        habit_id: HabitId,
        previous: HabitStatus,
        at: NaiveDateTime,
    },
    HabitDeactivated {
        habit_id: HabitId,
        previous: HabitStatus,
        cause: DeactivationCause,
        at: NaiveDateTime,
    },
    HabitRemoved {
        habit_id: HabitId,
        at: NaiveDateTime,
    },
}

impl Event {
    /// Habit the event refers to, if any.
    pub fn habit_id(&self) -> Option<HabitId> {
        match self {
            Event::HabitCompleted { habit_id, .. }
            | Event::HabitDeactivated { habit_id, .. }
            | Event::HabitRemoved { habit_id, .. } => Some(*habit_id),
            _ => None,
        }
    }
}
