//! Habit entity model.
//!
//! A [`Habit`] is a recurring activity with a weekday set and a daily time
//! window. Start and end times are kept as the backend sent them so that a
//! malformed value never prevents the rest of the list from loading; the
//! resolver in [`schedule`] decides what a bad time means.

mod days;
pub mod schedule;
mod time;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use days::DaysOfWeek;
pub use time::{format_time_of_day, parse_time_of_day, short_time, RemainingTime, TIME_FORMAT};

pub type HabitId = u64;

/// Day-scoped status of a habit.
///
/// The backend reports `ACTIVE` for a habit that applies today; `COMPLETED`
/// and `DEACTIVE` are local overlays valid until the next day boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitStatus {
    #[default]
    Active,
    Completed,
    Deactive,
    Failed,
}

impl HabitStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStatus::Active => "ACTIVE",
            HabitStatus::Completed => "COMPLETED",
            HabitStatus::Deactive => "DEACTIVE",
            HabitStatus::Failed => "FAILED",
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A habit as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub id: HabitId,
    pub name: String,
    #[serde(default)]
    pub status: HabitStatus,
    #[serde(rename = "dayOfWeek")]
    pub days_of_week: DaysOfWeek,
    pub icon: String,
    pub start_time: String,
    pub end_time: String,
}

/// Identity is the id alone.
impl PartialEq for Habit {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Habit {}

impl std::hash::Hash for Habit {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Habit {
    /// `"HH:MM - HH:MM"` for list rows.
    pub fn time_range(&self) -> String {
        format!(
            "{} - {}",
            short_time(&self.start_time),
            short_time(&self.end_time)
        )
    }

    pub fn is_active(&self) -> bool {
        self.status == HabitStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == HabitStatus::Completed
    }

    pub fn is_deactive(&self) -> bool {
        self.status == HabitStatus::Deactive
    }

    /// Failed for display purposes: explicit failure or deactivated.
    pub fn is_failed(&self) -> bool {
        matches!(self.status, HabitStatus::Failed | HabitStatus::Deactive)
    }

    /// Same habit with a different status.
    pub fn with_status(&self, status: HabitStatus) -> Habit {
        Habit {
            status,
            ..self.clone()
        }
    }

    /// Editable fields, e.g. to prefill an update.
    pub fn to_draft(&self) -> HabitDraft {
        HabitDraft {
            name: self.name.clone(),
            days_of_week: self.days_of_week.clone(),
            icon: self.icon.clone(),
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
        }
    }
}

/// Create/update body for a habit. Also the shape the chat analysis returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitDraft {
    pub name: String,
    #[serde(rename = "dayOfWeek")]
    pub days_of_week: DaysOfWeek,
    pub icon: String,
    pub start_time: String,
    pub end_time: String,
}

impl HabitDraft {
    /// Check the fields the backend cannot be trusted to reject.
    ///
    /// Windows that end before they start are accepted; nothing downstream
    /// handles midnight-spanning windows, so they behave as expired once the
    /// end time has passed on the same day.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Empty("name"));
        }
        if self.icon.trim().is_empty() {
            return Err(ValidationError::Empty("icon"));
        }
        if self.days_of_week.is_empty() {
            return Err(ValidationError::NoDays);
        }
        parse_time_of_day(&self.start_time).map_err(|source| ValidationError::Time {
            field: "startTime",
            source,
        })?;
        parse_time_of_day(&self.end_time).map_err(|source| ValidationError::Time {
            field: "endTime",
            source,
        })?;
        Ok(())
    }
}

/// Predefined failure reasons; ids match the backend's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FailureReason {
    LackOfWill = 0,
    HealthProblem = 1,
    OverambitiousGoal = 2,
    LackOfTime = 3,
    ScheduleConflict = 4,
    /// Free text supplied by the user.
    Other = 5,
}

impl FailureReason {
    pub const ALL: [FailureReason; 6] = [
        FailureReason::LackOfWill,
        FailureReason::HealthProblem,
        FailureReason::OverambitiousGoal,
        FailureReason::LackOfTime,
        FailureReason::ScheduleConflict,
        FailureReason::Other,
    ];

    pub fn id(&self) -> u8 {
        *self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn label(&self) -> &'static str {
        match self {
            FailureReason::LackOfWill => "lack of will",
            FailureReason::HealthProblem => "health problem",
            FailureReason::OverambitiousGoal => "overambitious goal",
            FailureReason::LackOfTime => "lack of time",
            FailureReason::ScheduleConflict => "schedule conflict",
            FailureReason::Other => "other",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            FailureReason::LackOfWill => "😭",
            FailureReason::HealthProblem => "💊",
            FailureReason::OverambitiousGoal => "🤕",
            FailureReason::LackOfTime => "⏳",
            FailureReason::ScheduleConflict => "🤯",
            FailureReason::Other => "🤔",
        }
    }

    /// Validate a failure selection and return the wire ids.
    ///
    /// `Other` needs non-blank custom text.
    pub fn validate_selection(
        reasons: &[FailureReason],
        custom_reason: Option<&str>,
    ) -> Result<Vec<u8>, ValidationError> {
        if reasons.is_empty() {
            return Err(ValidationError::NoFailureReason);
        }
        let needs_text = reasons.contains(&FailureReason::Other);
        let has_text = custom_reason.is_some_and(|s| !s.trim().is_empty());
        if needs_text && !has_text {
            return Err(ValidationError::Empty("customReason"));
        }
        let mut ids: Vec<u8> = reasons.iter().map(FailureReason::id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

impl From<FailureReason> for u8 {
    fn from(reason: FailureReason) -> Self {
        reason.id()
    }
}

impl TryFrom<u8> for FailureReason {
    type Error = ValidationError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::from_id(id).ok_or(ValidationError::OutOfRange {
            field: "failureReasonId",
            message: format!("unknown failure reason id {id}"),
        })
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.emoji(), self.label())
    }
}

/// Failure reason attached to a log entry by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedFailureReason {
    pub id: u64,
    pub reason: String,
}

/// One success/failure record for a habit on a date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitLog {
    pub id: u64,
    pub habit_id: HabitId,
    pub name: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub completed: bool,
    #[serde(default)]
    pub failure_reasons: Option<Vec<LoggedFailureReason>>,
}
