//! # WAVI Core Library
//!
//! Domain layer of the WAVI habit tracker client. The `wavi-cli` binary is a
//! thin presentation layer over the same library.
//!
//! ## Architecture
//!
//! - **Habit model**: habits, weekday sets and the pure schedule resolver
//!   (scheduled today, remaining time, expiry, card text)
//! - **Status overlay**: day-scoped `COMPLETED`/`DEACTIVE` statuses layered
//!   over the backend list, reset at the day boundary
//! - **Expiry sweeper**: a Tokio task that deactivates habits whose window
//!   has closed
//! - **API**: REST gateway, auth service and DTOs over `reqwest`
//! - **Flows**: today controller, sign-up wizard, chat session, reports
//!
//! ## Key Components
//!
//! - [`StatusOverlayStore`]: owner of today's list and its overlay
//! - [`TodayController`]: optimistic actions with resync on failure
//! - [`HabitGateway`]: the remote seam; [`RemoteGateway`] is the HTTP one
//! - [`Config`]: TOML configuration

pub mod api;
pub mod chat;
pub mod clock;
pub mod config;
pub mod credentials;
pub mod error;
pub mod events;
pub mod habit;
pub mod report;
pub mod signup;
pub mod status;
pub mod sweeper;
pub mod today;

pub use api::{ApiClient, AuthService, HabitGateway, RemoteGateway, TodaySnapshot};
pub use chat::{ChatOutcome, ChatSession};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use credentials::{KeyringTokenStore, MemoryTokenStore, TokenStore};
pub use error::{ApiError, AuthError, ConfigError, CoreError, CredentialError, TimeError, ValidationError};
pub use events::{DeactivationCause, Event};
pub use habit::{DaysOfWeek, FailureReason, Habit, HabitDraft, HabitId, HabitLog, HabitStatus};
pub use report::{DailySummary, Report, ReportKind};
pub use signup::{SignUpRequest, SignUpStep, SignUpWizard};
pub use status::{SharedStore, StatusOverlayStore};
pub use sweeper::ExpirySweeper;
pub use today::{HabitCard, TodayController};
