//! REST access to the WAVI backend.

pub mod auth;
mod client;
pub mod dto;
mod endpoint;
pub mod gateway;

pub use auth::AuthService;
pub use client::ApiClient;
pub use dto::{ChatData, ChatRequest, ChatResponse, LogQuery, ReportQuery, TodaySnapshot};
pub use endpoint::Endpoint;
pub use gateway::{HabitGateway, RemoteGateway};
