//! Access-token storage.
//!
//! The token lives in the OS keyring under service `wavi`. Tests and
//! short-lived tooling use [`MemoryTokenStore`].

use std::sync::{Arc, Mutex};

use crate::error::CredentialError;

const SERVICE: &str = "wavi";
const ACCESS_TOKEN_KEY: &str = "access_token";

/// Where the bearer token is kept between runs.
pub trait TokenStore: Send + Sync {
    fn load_access_token(&self) -> Result<Option<String>, CredentialError>;

    fn save_access_token(&self, token: &str) -> Result<(), CredentialError>;

    /// Remove every stored token. Succeeds when nothing is stored.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Token store backed by the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self {
            service: SERVICE.to_string(),
        }
    }
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store under a different keyring service, e.g. `wavi-dev`.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, CredentialError> {
        Ok(keyring::Entry::new(&self.service, key)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load_access_token(&self) -> Result<Option<String>, CredentialError> {
        match self.entry(ACCESS_TOKEN_KEY)?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_access_token(&self, token: &str) -> Result<(), CredentialError> {
        self.entry(ACCESS_TOKEN_KEY)?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match self.entry(ACCESS_TOKEN_KEY)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process token store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    token: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load_access_token(&self) -> Result<Option<String>, CredentialError> {
        let guard = self.token.lock().map_err(|_| CredentialError::Unavailable)?;
        Ok(guard.clone())
    }

    fn save_access_token(&self, token: &str) -> Result<(), CredentialError> {
        let mut guard = self.token.lock().map_err(|_| CredentialError::Unavailable)?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut guard = self.token.lock().map_err(|_| CredentialError::Unavailable)?;
        *guard = None;
        Ok(())
    }
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn load_access_token(&self) -> Result<Option<String>, CredentialError> {
        (**self).load_access_token()
    }

    fn save_access_token(&self, token: &str) -> Result<(), CredentialError> {
        (**self).save_access_token(token)
    }

    fn clear(&self) -> Result<(), CredentialError> {
        (**self).clear()
    }
}
