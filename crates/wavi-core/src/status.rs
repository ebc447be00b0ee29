//! Day-scoped status overlay for today's habits.
//!
//! The backend always reports today's habits as `ACTIVE`. Completing or
//! failing a habit is recorded here, keyed by habit id, so the change
//! survives a re-fetch on the same day. The overlay is dropped as soon as a
//! refresh happens on a different calendar date.
//!
//! ## Transitions
//!
//! ```text
//! ACTIVE -> COMPLETED   (user success)
//! ACTIVE -> DEACTIVE    (user failure, or window expired)
//! ```
//!
//! Both targets are terminal for the day, but the mark operations accept any
//! current state; the last mark wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, NaiveDateTime};

use crate::events::{DeactivationCause, Event};
use crate::habit::schedule::{is_expired, is_scheduled_today};
use crate::habit::{Habit, HabitId, HabitStatus};

/// Store shared between the today controller and the expiry sweeper.
pub type SharedStore = Arc<Mutex<StatusOverlayStore>>;

/// Lock a shared store, recovering from a poisoned lock.
///
/// Every mutation runs to completion under the lock, so a panic elsewhere
/// cannot leave the store half-updated.
pub fn lock(store: &SharedStore) -> MutexGuard<'_, StatusOverlayStore> {
    store.lock().unwrap_or_else(|e| e.into_inner())
}

/// Owner of today's habit list and its status overlay.
#[derive(Debug, Default)]
pub struct StatusOverlayStore {
    overlay: HashMap<HabitId, HabitStatus>,
    last_refresh: Option<NaiveDate>,
    habits: Vec<Habit>,
}

impl StatusOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Today's habits, sorted by start time, with overlays applied.
    pub fn habits(&self) -> &[Habit] {
        &self.habits
    }

    pub fn get(&self, habit_id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == habit_id)
    }

    pub fn status_of(&self, habit_id: HabitId) -> Option<HabitStatus> {
        self.get(habit_id).map(|h| h.status)
    }

    /// Overlay entry recorded for today, if any.
    pub fn overlay_of(&self, habit_id: HabitId) -> Option<HabitStatus> {
        self.overlay.get(&habit_id).copied()
    }

    pub fn last_refresh_date(&self) -> Option<NaiveDate> {
        self.last_refresh
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the list with freshly fetched habits.
    ///
    /// In order: reset the overlay if the date changed, keep habits scheduled
    /// today, apply overlay statuses (default `ACTIVE`), sort by start time,
    /// then deactivate habits whose window has already closed.
    pub fn refresh(&mut self, fetched: Vec<Habit>, now: NaiveDateTime) -> Vec<Event> {
        let mut events = Vec::new();
        let today = now.date();

        if self.last_refresh != Some(today) {
            let cleared = self.overlay.len();
            self.overlay.clear();
            events.push(Event::DayRolledOver {
                previous: self.last_refresh,
                current: today,
                cleared,
            });
        }

        let total = fetched.len();
        let mut habits: Vec<Habit> = fetched
            .into_iter()
            .filter(|h| is_scheduled_today(h, today))
            .map(|mut h| {
                h.status = self.overlay.get(&h.id).copied().unwrap_or_default();
                h
            })
            .collect();
        // Zero-padded HH:MM:SS sorts correctly as a string.
        habits.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        self.habits = habits;
        self.last_refresh = Some(today);

        tracing::info!(
            total,
            scheduled_today = self.habits.len(),
            overlays = self.overlay.len(),
            "today's habits refreshed"
        );
        events.push(Event::HabitsRefreshed {
            total,
            scheduled_today: self.habits.len(),
            at: now,
        });

        events.extend(self.sweep_expired(now));
        events
    }

    /// Record a success for today. Returns `None` if the habit is not in
    /// today's list.
    pub fn mark_completed(&mut self, habit_id: HabitId, now: NaiveDateTime) -> Option<Event> {
        let habit = self.habits.iter_mut().find(|h| h.id == habit_id)?;
        let previous = habit.status;
        habit.status = HabitStatus::Completed;
        self.overlay.insert(habit_id, HabitStatus::Completed);
        tracing::info!(habit_id, %previous, "habit marked completed");
        Some(Event::HabitCompleted {
            habit_id,
            previous,
            at: now,
        })
    }

    /// Record a failure or expiry for today. Returns `None` if the habit is
    /// not in today's list.
    pub fn mark_deactive(
        &mut self,
        habit_id: HabitId,
        cause: DeactivationCause,
        now: NaiveDateTime,
    ) -> Option<Event> {
        let habit = self.habits.iter_mut().find(|h| h.id == habit_id)?;
        let previous = habit.status;
        habit.status = HabitStatus::Deactive;
        self.overlay.insert(habit_id, HabitStatus::Deactive);
        tracing::info!(habit_id, %previous, ?cause, "habit marked deactive");
        Some(Event::HabitDeactivated {
            habit_id,
            previous,
            cause,
            at: now,
        })
    }

    /// Deactivate every `ACTIVE` habit whose window closed before `now`.
    ///
    /// Habits already completed or deactivated are left alone, so repeated
    /// sweeps are no-ops. A malformed end time never expires.
    pub fn sweep_expired(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let expired: Vec<HabitId> = self
            .habits
            .iter()
            .filter(|h| h.is_active())
            .filter(|h| match is_expired(h, now) {
                Ok(expired) => expired,
                Err(e) => {
                    tracing::warn!(habit_id = h.id, error = %e, "skipping expiry check");
                    false
                }
            })
            .map(|h| h.id)
            .collect();

        expired
            .into_iter()
            .filter_map(|id| self.mark_deactive(id, DeactivationCause::Expired, now))
            .collect()
    }

    /// Drop a deleted habit from today's list and its overlay entry.
    pub fn remove(&mut self, habit_id: HabitId, now: NaiveDateTime) -> Option<Event> {
        let index = self.habits.iter().position(|h| h.id == habit_id)?;
        self.habits.remove(index);
        self.overlay.remove(&habit_id);
        Some(Event::HabitRemoved { habit_id, at: now })
    }
}
