//! Remote operations behind the today view.
//!
//! [`HabitGateway`] is the seam the [`TodayController`] is written against;
//! [`RemoteGateway`] is the HTTP implementation and also carries the
//! read-only routes used by the list, history and report screens.
//!
//! Each call is a single round trip. Nothing is retried and errors are
//! returned as the transport reported them.
//!
//! [`TodayController`]: crate::today::TodayController

use std::future::Future;

use super::client::{ApiClient, NO_BODY};
use super::dto::{
    ChatRequest, ChatResponse, Envelope, FailureRequest, LogQuery, ReportQuery, TodaySnapshot,
};
use super::endpoint::Endpoint;
use crate::error::ApiError;
use crate::habit::{Habit, HabitDraft, HabitId, HabitLog};
use crate::report::Report;

pub trait HabitGateway: Send + Sync {
    /// Home screen data: nickname, profile image and today's habits.
    fn fetch_today(&self) -> impl Future<Output = Result<TodaySnapshot, ApiError>> + Send;

    fn log_success(&self, habit_id: HabitId) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `reason_ids` are already validated wire ids.
    fn log_failure(
        &self,
        habit_id: HabitId,
        reason_ids: Vec<u8>,
        custom_reason: Option<String>,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// The created habit, if the backend echoed it back.
    fn create_habit(
        &self,
        draft: &HabitDraft,
    ) -> impl Future<Output = Result<Option<Habit>, ApiError>> + Send;

    fn update_habit(
        &self,
        habit_id: HabitId,
        draft: &HabitDraft,
    ) -> impl Future<Output = Result<Option<Habit>, ApiError>> + Send;

    fn delete_habit(&self, habit_id: HabitId) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// [`HabitGateway`] over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    client: ApiClient,
}

impl RemoteGateway {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    /// `GET /api/v1/habit/today`: today's habits without the profile fields.
    pub async fn fetch_today_habits(&self) -> Result<Vec<Habit>, ApiError> {
        let env: Envelope<Vec<Habit>> = self.client.send(Endpoint::TodayHabits, NO_BODY).await?;
        Ok(env.data.unwrap_or_default())
    }

    pub async fn fetch_all_habits(&self) -> Result<Vec<Habit>, ApiError> {
        let env: Envelope<Vec<Habit>> = self.client.send(Endpoint::AllHabits, NO_BODY).await?;
        Ok(env.data.unwrap_or_default())
    }

    pub async fn fetch_habit(&self, habit_id: HabitId) -> Result<Habit, ApiError> {
        let env: Envelope<Habit> = self.client.send(Endpoint::Habit(habit_id), NO_BODY).await?;
        env.into_data("habit")
    }

    pub async fn fetch_logs(&self, query: LogQuery) -> Result<Vec<HabitLog>, ApiError> {
        let env: Envelope<Vec<HabitLog>> = self.client.send(Endpoint::Logs(query), NO_BODY).await?;
        Ok(env.data.unwrap_or_default())
    }

    pub async fn fetch_reports(&self, query: ReportQuery) -> Result<Vec<Report>, ApiError> {
        let env: Envelope<Vec<Report>> =
            self.client.send(Endpoint::Reports(query), NO_BODY).await?;
        Ok(env.data.unwrap_or_default())
    }

    /// Chat replies are decoded for any status; the caller interprets it.
    pub async fn analyze_message(
        &self,
        request: &ChatRequest,
    ) -> Result<(u16, ChatResponse), ApiError> {
        self.client.send_lenient(Endpoint::Chat, Some(request)).await
    }
}

impl HabitGateway for RemoteGateway {
    async fn fetch_today(&self) -> Result<TodaySnapshot, ApiError> {
        let env: Envelope<TodaySnapshot> = self.client.send(Endpoint::Main, NO_BODY).await?;
        let snapshot = env.into_data("main")?;
        tracing::info!(habits = snapshot.habits.len(), "fetched today's snapshot");
        Ok(snapshot)
    }

    async fn log_success(&self, habit_id: HabitId) -> Result<(), ApiError> {
        self.client
            .send_unit(Endpoint::LogSuccess(habit_id), NO_BODY)
            .await
    }

    async fn log_failure(
        &self,
        habit_id: HabitId,
        reason_ids: Vec<u8>,
        custom_reason: Option<String>,
    ) -> Result<(), ApiError> {
        let body = FailureRequest {
            failure_reason_ids: reason_ids,
            custom_reason,
        };
        self.client
            .send_unit(Endpoint::LogFailure(habit_id), Some(&body))
            .await
    }

    async fn create_habit(&self, draft: &HabitDraft) -> Result<Option<Habit>, ApiError> {
        let env: Envelope<serde_json::Value> =
            self.client.send(Endpoint::CreateHabit, Some(draft)).await?;
        Ok(echoed_habit(env))
    }

    async fn update_habit(
        &self,
        habit_id: HabitId,
        draft: &HabitDraft,
    ) -> Result<Option<Habit>, ApiError> {
        let env: Envelope<serde_json::Value> = self
            .client
            .send(Endpoint::UpdateHabit(habit_id), Some(draft))
            .await?;
        Ok(echoed_habit(env))
    }

    async fn delete_habit(&self, habit_id: HabitId) -> Result<(), ApiError> {
        self.client
            .send_unit(Endpoint::DeleteHabit(habit_id), NO_BODY)
            .await
    }
}

/// Habit echoed in a write response. Some deployments answer with a bare
/// message or an id instead, which is not an error.
fn echoed_habit(env: Envelope<serde_json::Value>) -> Option<Habit> {
    env.data
        .and_then(|data| serde_json::from_value(data).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(data: Option<serde_json::Value>) -> Envelope<serde_json::Value> {
        Envelope {
            status: Some(200),
            code: None,
            message: Some("ok".into()),
            data,
        }
    }

    #[test]
    fn echoed_habit_accepts_full_habit_only() {
        let habit = json!({"id": 8, "name": "Swim", "dayOfWeek": [6], "icon": "🏊",
                           "startTime": "06:00:00", "endTime": "07:00:00"});
        assert_eq!(echoed_habit(envelope(Some(habit))).map(|h| h.id), Some(8));
        assert!(echoed_habit(envelope(Some(json!(8)))).is_none());
        assert!(echoed_habit(envelope(None)).is_none());
    }
}
