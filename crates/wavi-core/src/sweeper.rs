//! Periodic expiry sweep over the shared overlay store.

use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::clock::Clock;
use crate::events::Event;
use crate::status::{lock, SharedStore};

/// Background task that deactivates habits whose window has closed.
///
/// The first sweep runs one period after spawning. A tick that falls behind
/// is delayed rather than replayed. The task is aborted on [`stop`] or when
/// the sweeper is dropped.
///
/// [`stop`]: ExpirySweeper::stop
#[derive(Debug)]
pub struct ExpirySweeper {
    handle: Option<JoinHandle<()>>,
    period: Duration,
}

impl ExpirySweeper {
    pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60);

    /// Start sweeping. Must be called from within a Tokio runtime.
    ///
    /// Expiry events are forwarded to `events` when given; a closed receiver
    /// does not stop the sweep. A zero `period` falls back to
    /// [`DEFAULT_PERIOD`](Self::DEFAULT_PERIOD).
    pub fn spawn<C>(
        store: SharedStore,
        clock: C,
        period: Duration,
        events: Option<UnboundedSender<Event>>,
    ) -> Self
    where
        C: Clock + 'static,
    {
        let period = if period.is_zero() {
            tracing::warn!("zero sweep period, using the default");
            Self::DEFAULT_PERIOD
        } else {
            period
        };
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let now = clock.now();
                // Lock is released before anything is sent.
                let expired = lock(&store).sweep_expired(now);
                if expired.is_empty() {
                    continue;
                }
                tracing::info!(expired = expired.len(), "expiry sweep deactivated habits");
                if let Some(tx) = &events {
                    for event in expired {
                        if tx.send(event).is_err() {
                            tracing::debug!("expiry event receiver closed");
                            break;
                        }
                    }
                }
            }
        });
        tracing::debug!(period_secs = period.as_secs(), "expiry sweeper started");
        Self {
            handle: Some(handle),
            period,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancel the task. Calling it again is a no-op.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            tracing::debug!("expiry sweeper stopped");
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}
