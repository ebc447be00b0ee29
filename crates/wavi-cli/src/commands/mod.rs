pub mod auth;
pub mod chat;
pub mod config;
pub mod habit;
pub mod log;
pub mod report;
pub mod signup;
pub mod today;
