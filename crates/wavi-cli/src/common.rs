//! Wiring shared by the subcommands: runtime, logging, services and
//! terminal prompts.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;
use wavi_core::error::ApiError;
use wavi_core::{
    ApiClient, AuthService, Config, KeyringTokenStore, RemoteGateway, SystemClock,
    TodayController,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Log to stderr, filtered by `RUST_LOG` or else `log.level`.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}

/// `WAVI_ENV=dev` keeps its token apart from the production one.
fn token_store() -> KeyringTokenStore {
    match std::env::var("WAVI_ENV").as_deref() {
        Ok("dev") => KeyringTokenStore::with_service("wavi-dev"),
        _ => KeyringTokenStore::new(),
    }
}

pub fn client(config: &Config) -> Result<ApiClient, ApiError> {
    ApiClient::from_config(config, Arc::new(token_store()))
}

pub fn gateway(config: &Config) -> Result<RemoteGateway, ApiError> {
    Ok(RemoteGateway::new(client(config)?))
}

pub fn auth(config: &Config) -> Result<AuthService, ApiError> {
    Ok(AuthService::new(client(config)?))
}

pub fn controller(config: &Config) -> Result<TodayController<RemoteGateway, SystemClock>, ApiError> {
    Ok(TodayController::new(gateway(config)?, SystemClock))
}

/// Print `label: ` and read one trimmed line. `None` on end of input.
pub fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Like [`prompt`] but end of input is an error.
pub fn require(label: &str) -> Result<String, Box<dyn std::error::Error>> {
    prompt(label)?.ok_or_else(|| format!("no input for {label}").into())
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
