//! Today view state: the overlay store plus the profile header, driven by a
//! [`HabitGateway`].
//!
//! User actions are optimistic. The local status changes first, then the
//! backend is told; if that fails the whole list is re-fetched and the
//! original error is returned.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::HabitGateway;
use crate::clock::Clock;
use crate::error::{ApiError, CoreError};
use crate::events::{DeactivationCause, Event};
use crate::habit::schedule::display_text;
use crate::habit::{FailureReason, Habit, HabitDraft, HabitId};
use crate::status::{lock, SharedStore, StatusOverlayStore};
use crate::sweeper::ExpirySweeper;

/// A habit with its card text for the current instant.
#[derive(Debug, Clone, PartialEq)]
pub struct HabitCard {
    pub habit: Habit,
    pub display: String,
}

pub struct TodayController<G, C> {
    gateway: G,
    clock: C,
    store: SharedStore,
    nickname: Option<String>,
    profile_image: Option<i64>,
    error_message: Option<String>,
}

impl<G: HabitGateway, C: Clock> TodayController<G, C> {
    pub fn new(gateway: G, clock: C) -> Self {
        Self::with_store(gateway, clock, StatusOverlayStore::new().shared())
    }

    pub fn with_store(gateway: G, clock: C, store: SharedStore) -> Self {
        Self {
            gateway,
            clock,
            store,
            nickname: None,
            profile_image: None,
            error_message: None,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn profile_image(&self) -> Option<i64> {
        self.profile_image
    }

    /// Message from the last failed load, cleared by the next success.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Snapshot of today's habits.
    pub fn habits(&self) -> Vec<Habit> {
        lock(&self.store).habits().to_vec()
    }

    pub fn cards(&self) -> Vec<HabitCard> {
        let now = self.clock.now();
        lock(&self.store)
            .habits()
            .iter()
            .map(|h| HabitCard {
                display: display_text(h, now),
                habit: h.clone(),
            })
            .collect()
    }

    /// Fetch today's snapshot and refresh the overlay store.
    ///
    /// On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<Vec<Event>, ApiError> {
        match self.gateway.fetch_today().await {
            Ok(snapshot) => {
                self.nickname = Some(snapshot.nickname);
                self.profile_image = Some(snapshot.profile_image);
                self.error_message = None;
                let now = self.clock.now();
                Ok(lock(&self.store).refresh(snapshot.habits, now))
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load today's habits");
                self.error_message = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Mark a habit completed locally, then log the success remotely.
    ///
    /// The remote log is sent even when the habit is not in today's list;
    /// the returned event is `None` in that case.
    pub async fn record_success(&mut self, habit_id: HabitId) -> Result<Option<Event>, ApiError> {
        let event = {
            let now = self.clock.now();
            lock(&self.store).mark_completed(habit_id, now)
        };
        if let Err(e) = self.gateway.log_success(habit_id).await {
            self.resync(habit_id, &e).await;
            return Err(e);
        }
        Ok(event)
    }

    /// Validate the reasons, mark the habit deactive locally, then log the
    /// failure remotely. `custom_reason` is only sent with
    /// [`FailureReason::Other`].
    pub async fn record_failure(
        &mut self,
        habit_id: HabitId,
        reasons: &[FailureReason],
        custom_reason: Option<&str>,
    ) -> Result<Option<Event>, CoreError> {
        let ids = FailureReason::validate_selection(reasons, custom_reason)?;
        let custom = if reasons.contains(&FailureReason::Other) {
            custom_reason.map(|s| s.trim().to_string())
        } else {
            None
        };

        let event = {
            let now = self.clock.now();
            lock(&self.store).mark_deactive(habit_id, DeactivationCause::UserFailure, now)
        };
        if let Err(e) = self.gateway.log_failure(habit_id, ids, custom).await {
            self.resync(habit_id, &e).await;
            return Err(e.into());
        }
        Ok(event)
    }

    /// Create a habit and reload so it shows up if it applies today.
    pub async fn create_habit(&mut self, draft: &HabitDraft) -> Result<Option<Habit>, CoreError> {
        draft.validate()?;
        let created = self.gateway.create_habit(draft).await?;
        self.reload_after_write().await;
        Ok(created)
    }

    pub async fn update_habit(
        &mut self,
        habit_id: HabitId,
        draft: &HabitDraft,
    ) -> Result<Option<Habit>, CoreError> {
        draft.validate()?;
        let updated = self.gateway.update_habit(habit_id, draft).await?;
        self.reload_after_write().await;
        Ok(updated)
    }

    /// Delete remotely, then drop the habit from today's list.
    pub async fn delete_habit(&mut self, habit_id: HabitId) -> Result<Option<Event>, ApiError> {
        self.gateway.delete_habit(habit_id).await?;
        let now = self.clock.now();
        Ok(lock(&self.store).remove(habit_id, now))
    }

    /// Run one expiry sweep now.
    pub fn sweep(&self) -> Vec<Event> {
        let now = self.clock.now();
        lock(&self.store).sweep_expired(now)
    }

    /// Start the periodic sweep on this controller's store.
    pub fn spawn_sweeper(
        &self,
        period: Duration,
        events: Option<UnboundedSender<Event>>,
    ) -> ExpirySweeper
    where
        C: Clone + 'static,
    {
        ExpirySweeper::spawn(self.store.clone(), self.clock.clone(), period, events)
    }

    async fn resync(&mut self, habit_id: HabitId, cause: &ApiError) {
        tracing::warn!(habit_id, error = %cause, "remote update failed, resynchronizing");
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "resynchronization failed");
        }
    }

    async fn reload_after_write(&mut self) {
        if let Err(e) = self.load().await {
            tracing::warn!(error = %e, "reload after write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TodaySnapshot;
    use crate::clock::ManualClock;
    use crate::habit::{DaysOfWeek, HabitStatus};
    use chrono::{NaiveDate, NaiveDateTime};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        FetchToday,
        LogSuccess(HabitId),
        LogFailure(HabitId, Vec<u8>, Option<String>),
        Create,
        Delete(HabitId),
    }

    /// Scripted gateway: each fetch pops the next snapshot, writes fail
    /// while `fail_writes` is set.
    #[derive(Default)]
    struct FakeGateway {
        snapshots: Mutex<VecDeque<Result<Vec<Habit>, u16>>>,
        fail_writes: Mutex<bool>,
        calls: Mutex<Vec<Call>>,
    }

    impl FakeGateway {
        fn with_snapshots(snapshots: Vec<Result<Vec<Habit>, u16>>) -> Self {
            Self {
                snapshots: Mutex::new(snapshots.into()),
                ..Self::default()
            }
        }

        fn failing_writes(self) -> Self {
            *self.fail_writes.lock().unwrap() = true;
            self
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn write_result(&self) -> Result<(), ApiError> {
            if *self.fail_writes.lock().unwrap() {
                Err(ApiError::Status {
                    status: 500,
                    message: Some("boom".into()),
                })
            } else {
                Ok(())
            }
        }
    }

    impl HabitGateway for FakeGateway {
        async fn fetch_today(&self) -> Result<TodaySnapshot, ApiError> {
            self.calls.lock().unwrap().push(Call::FetchToday);
            match self.snapshots.lock().unwrap().pop_front() {
                Some(Ok(habits)) => Ok(TodaySnapshot {
                    nickname: "bin".into(),
                    profile_image: 1,
                    habits,
                }),
                Some(Err(status)) => Err(ApiError::Status {
                    status,
                    message: None,
                }),
                None => Err(ApiError::Decode("no more snapshots".into())),
            }
        }

        async fn log_success(&self, habit_id: HabitId) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(Call::LogSuccess(habit_id));
            self.write_result()
        }

        async fn log_failure(
            &self,
            habit_id: HabitId,
            reason_ids: Vec<u8>,
            custom_reason: Option<String>,
        ) -> Result<(), ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(Call::LogFailure(habit_id, reason_ids, custom_reason));
            self.write_result()
        }

        async fn create_habit(&self, _draft: &HabitDraft) -> Result<Option<Habit>, ApiError> {
            self.calls.lock().unwrap().push(Call::Create);
            self.write_result().map(|_| None)
        }

        async fn update_habit(
            &self,
            _habit_id: HabitId,
            _draft: &HabitDraft,
        ) -> Result<Option<Habit>, ApiError> {
            self.write_result().map(|_| None)
        }

        async fn delete_habit(&self, habit_id: HabitId) -> Result<(), ApiError> {
            self.calls.lock().unwrap().push(Call::Delete(habit_id));
            self.write_result()
        }
    }

    fn wed(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 10, 15)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn habit(id: HabitId, days: &[u8], start: &str, end: &str) -> Habit {
        Habit {
            id,
            name: format!("habit {id}"),
            status: HabitStatus::Active,
            days_of_week: DaysOfWeek::new(days.iter().copied()).unwrap(),
            icon: "⭐".into(),
            start_time: start.into(),
            end_time: end.into(),
        }
    }

    fn list() -> Vec<Habit> {
        vec![
            habit(1, &[1, 3, 5], "09:30:00", "10:00:00"),
            habit(2, &[3], "07:00:00", "07:30:00"),
            habit(3, &[2], "12:00:00", "13:00:00"),
        ]
    }

    #[tokio::test]
    async fn load_refreshes_store_and_profile() {
        let gw = FakeGateway::with_snapshots(vec![Ok(list())]);
        let mut today = TodayController::new(gw, ManualClock::new(wed(6, 0)));
        today.load().await.unwrap();

        assert_eq!(today.nickname(), Some("bin"));
        assert_eq!(today.profile_image(), Some(1));
        let ids: Vec<HabitId> = today.habits().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![2, 1]);
        let cards = today.cards();
        assert_eq!(cards[0].display, "01:00");
        assert_eq!(cards[1].display, "03:30");
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let gw = FakeGateway::with_snapshots(vec![Ok(list()), Err(503)]);
        let mut today = TodayController::new(gw, ManualClock::new(wed(6, 0)));
        today.load().await.unwrap();
        assert!(today.load().await.is_err());
        assert_eq!(today.habits().len(), 2);
        assert!(today.error_message().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn success_is_optimistic_and_survives_reload() {
        let gw = FakeGateway::with_snapshots(vec![Ok(list()), Ok(list())]);
        let mut today = TodayController::new(gw, ManualClock::new(wed(9, 0)));
        today.load().await.unwrap();

        let event = today.record_success(1).await.unwrap();
        assert!(matches!(event, Some(Event::HabitCompleted { habit_id: 1, .. })));
        today.load().await.unwrap();
        assert_eq!(lock(today.store()).status_of(1), Some(HabitStatus::Completed));
        assert_eq!(today.cards()[1].display, "100%");
    }

    #[tokio::test]
    async fn failed_success_log_resyncs() {
        let gw = FakeGateway::with_snapshots(vec![Ok(list()), Ok(list())]).failing_writes();
        let mut today = TodayController::new(gw, ManualClock::new(wed(9, 0)));
        today.load().await.unwrap();

        let err = today.record_success(1).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            today.gateway().calls(),
            vec![Call::FetchToday, Call::LogSuccess(1), Call::FetchToday]
        );
        // Same-day overlay still holds the optimistic status after resync.
        assert_eq!(lock(today.store()).status_of(1), Some(HabitStatus::Completed));
    }

    #[tokio::test]
    async fn failure_requires_valid_reasons() {
        let gw = FakeGateway::with_snapshots(vec![Ok(list())]);
        let mut today = TodayController::new(gw, ManualClock::new(wed(9, 0)));
        today.load().await.unwrap();

        assert!(matches!(
            today.record_failure(1, &[], None).await,
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            today.record_failure(1, &[FailureReason::Other], Some(" ")).await,
            Err(CoreError::Validation(_))
        ));
        assert_eq!(lock(today.store()).status_of(1), Some(HabitStatus::Active));
        assert_eq!(today.gateway().calls(), vec![Call::FetchToday]);
    }

    #[tokio::test]
    async fn failure_sends_custom_reason_only_with_other() {
        let gw = FakeGateway::with_snapshots(vec![Ok(list())]);
        let mut today = TodayController::new(gw, ManualClock::new(wed(9, 0)));
        today.load().await.unwrap();

        today
            .record_failure(1, &[FailureReason::LackOfTime], Some("ignored"))
            .await
            .unwrap();
        today
            .record_failure(2, &[FailureReason::Other, FailureReason::LackOfWill], Some(" rain "))
            .await
            .unwrap();

        let calls = today.gateway().calls();
        assert_eq!(calls[1], Call::LogFailure(1, vec![3], None));
        assert_eq!(calls[2], Call::LogFailure(2, vec![0, 5], Some("rain".into())));
        assert_eq!(lock(today.store()).status_of(2), Some(HabitStatus::Deactive));
    }

    #[tokio::test]
    async fn delete_removes_locally_after_remote_success() {
        let gw = FakeGateway::with_snapshots(vec![Ok(list())]);
        let mut today = TodayController::new(gw, ManualClock::new(wed(6, 0)));
        today.load().await.unwrap();
        assert!(today.delete_habit(2).await.unwrap().is_some());
        assert_eq!(today.habits().len(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_is_not_sent() {
        let gw = FakeGateway::with_snapshots(vec![]);
        let mut today = TodayController::new(gw, ManualClock::new(wed(6, 0)));
        let draft = HabitDraft {
            name: "".into(),
            days_of_week: DaysOfWeek::every_day(),
            icon: "x".into(),
            start_time: "08:00:00".into(),
            end_time: "09:00:00".into(),
        };
        assert!(today.create_habit(&draft).await.is_err());
        assert!(today.gateway().calls().is_empty());
    }

    #[tokio::test]
    async fn manual_sweep_uses_clock() {
        let clock = ManualClock::new(wed(6, 0));
        let gw = FakeGateway::with_snapshots(vec![Ok(list())]);
        let mut today = TodayController::new(gw, clock.clone());
        today.load().await.unwrap();

        assert!(today.sweep().is_empty());
        clock.set(wed(7, 31));
        assert_eq!(today.sweep().len(), 1);
        assert_eq!(today.cards()[0].display, "0%");
    }
}
