//! Core error types for wavi-core.
//!
//! Network-facing failures are reported through [`ApiError`], which keeps the
//! three transport categories apart: no response at all, a non-2xx status,
//! and a body that does not decode. Malformed domain data found while
//! deriving schedule values is a [`TimeError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wavi-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Remote API errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication flow errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential store errors
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Time-of-day parsing errors
    #[error("Time error: {0}")]
    Time(#[from] TimeError),
}

/// Errors surfaced by the REST gateway.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (DNS, TLS, connection, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("{}", status_message(*.status, .message.as_deref()))]
    Status { status: u16, message: Option<String> },

    /// The server rejected the bearer token.
    #[error("Authentication failed: {}", .message.as_deref().unwrap_or("unauthorized"))]
    Unauthorized { message: Option<String> },

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// An authenticated endpoint was called with no stored access token.
    #[error("Not logged in: no access token stored")]
    NotAuthenticated,

    /// The configured base URL cannot be combined with the endpoint path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading the access token failed.
    #[error("Credential store error: {0}")]
    Credential(#[from] CredentialError),
}

fn status_message(status: u16, message: Option<&str>) -> String {
    match message {
        Some(m) => format!("Server returned HTTP {status}: {m}"),
        None => format!("Server returned HTTP {status}"),
    }
}

impl ApiError {
    /// HTTP status code if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Authentication flow errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Login succeeded at HTTP level but carried no token.
    #[error("Login response did not contain a token")]
    NoLoginData,

    /// Credentials were rejected.
    #[error("Invalid e-mail or password")]
    InvalidCredentials,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Credential store errors.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The OS keyring refused the operation.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Lock on an in-process store was poisoned.
    #[error("Credential store is unavailable")]
    Unavailable,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dotted key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory could not be determined or created
    #[error("Configuration directory unavailable: {0}")]
    DirUnavailable(String),
}

/// A time-of-day string that does not parse as `HH:MM:SS`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Malformed time '{value}': expected HH:MM:SS")]
    Malformed { value: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or blank
    #[error("'{0}' must not be empty")]
    Empty(&'static str),

    /// Weekday outside 1..=7
    #[error("Day of week {0} is out of range (expected 1=Monday .. 7=Sunday)")]
    DayOutOfRange(u8),

    /// No weekdays selected
    #[error("At least one day of week is required")]
    NoDays,

    /// Time field does not parse
    #[error("Invalid value for '{field}': {source}")]
    Time {
        field: &'static str,
        #[source]
        source: TimeError,
    },

    /// E-mail address lacks an '@'
    #[error("'{0}' is not a valid e-mail address")]
    InvalidEmail(String),

    /// Password confirmation differs
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Numeric value out of range
    #[error("Invalid value for '{field}': {message}")]
    OutOfRange { field: &'static str, message: String },

    /// Failure log without any reason
    #[error("At least one failure reason is required")]
    NoFailureReason,

    /// Wizard step submitted out of order
    #[error("Sign-up step '{0}' is not the current step")]
    WrongStep(&'static str),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
