//! Wire shapes for requests and responses. All bodies are camelCase JSON.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::habit::{Habit, HabitDraft, HabitId};
use crate::report::ReportKind;

/// Standard response wrapper: `{status, message, data}`.
///
/// Some routes send `code` instead of `status`; every field is optional so
/// a sparse body still decodes.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub status: Option<i64>,
    pub code: Option<i64>,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// The payload, or a decode error naming the route when it is missing.
    pub fn into_data(self, what: &str) -> Result<T, ApiError> {
        self.data
            .ok_or_else(|| ApiError::Decode(format!("{what}: response has no data")))
    }
}

/// Home screen payload from `GET /api/v1/main`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodaySnapshot {
    pub nickname: String,
    pub profile_image: i64,
    pub habits: Vec<Habit>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRequest {
    pub failure_reason_ids: Vec<u8>,
    pub custom_reason: Option<String>,
}

/// Filters for `GET /api/v1/log`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogQuery {
    pub habit_id: Option<HabitId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

impl LogQuery {
    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..Self::default()
        }
    }

    pub fn on(date: NaiveDate) -> Self {
        Self::between(date, date)
    }
}

/// Filters for `GET /api/v1/report`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportQuery {
    pub kind: Option<ReportKind>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub current_prompt: String,
    pub history: Vec<String>,
}

/// `data` of a chat reply: a follow-up question or a habit proposal.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ChatData {
    Text(String),
    Draft(HabitDraft),
    /// Any other shape, e.g. an object missing required fields.
    Other(serde_json::Value),
}

/// Chat replies are decoded for 4xx statuses as well.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<ChatData>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub email: String,
}

/// `POST /api/v1/user/check-email` answers without the envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailCheckResponse {
    pub available: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
    pub new_password: String,
    pub verification_code: String,
}
