//! Thin reqwest wrapper: URL building, bearer auth, status and decode
//! mapping.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::endpoint::Endpoint;
use crate::config::Config;
use crate::credentials::TokenStore;
use crate::error::ApiError;

/// Placeholder body for calls that send none.
pub(crate) const NO_BODY: Option<&()> = None;

/// HTTP client bound to one backend and one token store.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: Arc<dyn TokenStore>,
    ) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wavi/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: Url::parse(base_url)?,
            tokens,
        })
    }

    pub fn from_config(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        Self::new(&config.api.base_url, config.request_timeout(), tokens)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn url(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        Ok(self.base_url.join(&endpoint.path_and_query())?)
    }

    /// Send and decode a 2xx body as `T`.
    pub async fn send<T, B>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.execute(&endpoint, body).await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(status_error(status, &text));
        }
        decode(&endpoint, &text)
    }

    /// Send and ignore a 2xx body.
    pub async fn send_unit<B>(&self, endpoint: Endpoint, body: Option<&B>) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let resp = self.execute(&endpoint, body).await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let text = resp.text().await?;
        Err(status_error(status, &text))
    }

    /// Send and decode the body whatever the status, returning the status
    /// alongside. A non-2xx body that does not decode is a status error.
    pub async fn send_lenient<T, B>(
        &self,
        endpoint: Endpoint,
        body: Option<&B>,
    ) -> Result<(u16, T), ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let resp = self.execute(&endpoint, body).await?;
        let status = resp.status();
        let text = resp.text().await?;
        match decode(&endpoint, &text) {
            Ok(value) => Ok((status.as_u16(), value)),
            Err(_) if !status.is_success() => Err(status_error(status, &text)),
            Err(e) => Err(e),
        }
    }

    async fn execute<B>(&self, endpoint: &Endpoint, body: Option<&B>) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(endpoint)?;
        let method = endpoint.method();

        let mut req = self
            .http
            .request(method.clone(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if endpoint.requires_auth() {
            let token = self
                .tokens
                .load_access_token()?
                .ok_or(ApiError::NotAuthenticated)?;
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        tracing::debug!(%method, %url, "sending request");
        let resp = req.send().await?;
        tracing::debug!(%method, %url, status = resp.status().as_u16(), "received response");
        Ok(resp)
    }
}

fn decode<T: DeserializeOwned>(endpoint: &Endpoint, text: &str) -> Result<T, ApiError> {
    serde_json::from_str(text).map_err(|e| {
        tracing::debug!(path = %endpoint.path(), error = %e, "response did not decode");
        ApiError::Decode(format!("{}: {e}", endpoint.path()))
    })
}

/// Map a non-2xx response, keeping the server's `message` if it sent one.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized { message }
    } else {
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}
