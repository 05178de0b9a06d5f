//! Credentials and bearer token lifecycle.
//!
//! The service exchanges a long-lived access/secret key pair for a
//! short-lived bearer token. [`TokenManager`] performs that exchange lazily
//! and keeps the result in a [`TokenCache`] until it is about to expire.

use std::fmt;
use std::sync::RwLock;
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client as HttpClient, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::body_to_value;
use crate::error::{ESignError, Result};

/// Seconds before `exp` at which a cached token is treated as expired.
pub const REFRESH_BUFFER_SECS: u64 = 60;

const ACCESS_KEY_ENV: &str = "ESIGN_ACCESS_KEY";
const SECRET_KEY_ENV: &str = "ESIGN_SECRET_KEY";

/// Access/secret key pair issued by the signature service.
#[derive(Clone, Serialize)]
pub struct Credentials {
    access_key: String,
    secret_key: String,
}

impl Credentials {
    /// Create a credential pair.
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Load the credential pair from `ESIGN_ACCESS_KEY` and `ESIGN_SECRET_KEY`.
    pub fn from_env() -> Result<Self> {
        let access_key = std::env::var(ACCESS_KEY_ENV)
            .map_err(|_| ESignError::MissingConfig(ACCESS_KEY_ENV.to_string()))?;
        let secret_key = std::env::var(SECRET_KEY_ENV)
            .map_err(|_| ESignError::MissingConfig(SECRET_KEY_ENV.to_string()))?;
        Ok(Self::new(access_key, secret_key))
    }

    /// The public half of the pair.
    pub fn access_key(&self) -> &str {
        &self.access_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

/// A bearer token and its expiry in epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CachedToken {
    /// Bearer token value.
    pub token: String,
    /// Expiry as seconds since the Unix epoch.
    #[serde(rename = "exp")]
    pub expires_at: u64,
}

impl CachedToken {
    /// Whether the token may still be handed out at `now`.
    pub fn is_fresh_at(&self, now: u64) -> bool {
        now.saturating_add(REFRESH_BUFFER_SECS) < self.expires_at
    }
}

/// Single-slot token cache.
///
/// The value is replaced as a unit; readers only need some currently valid
/// token, so a racing refresh at expiry is harmless.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: RwLock<Option<CachedToken>>,
}

impl TokenCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token if it is fresh at `now`.
    pub fn get_at(&self, now: u64) -> Option<String> {
        let guard = self.slot.read().unwrap_or_else(|e| e.into_inner());
        guard
            .as_ref()
            .filter(|cached| cached.is_fresh_at(now))
            .map(|cached| cached.token.clone())
    }

    /// Replace the cached token.
    pub fn store(&self, token: CachedToken) {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token);
    }

    /// Drop the cached token.
    pub fn clear(&self) {
        let mut guard = self.slot.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

pub(crate) fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Exchanges credentials for bearer tokens and caches the result.
#[derive(Debug)]
pub(crate) struct TokenManager {
    http: HttpClient,
    token_url: String,
    credentials: Credentials,
    cache: TokenCache,
}

impl TokenManager {
    pub(crate) fn new(http: HttpClient, base_url: &str, credentials: Credentials) -> Self {
        Self {
            http,
            token_url: format!("{}/auth/token", base_url),
            credentials,
            cache: TokenCache::new(),
        }
    }

    /// Return a valid token, exchanging the key pair if none is cached.
    pub(crate) async fn get_token(&self) -> Result<String> {
        if let Some(token) = self.cache.get_at(now_epoch_secs()) {
            debug!("using cached bearer token");
            return Ok(token);
        }

        debug!("exchanging credentials for bearer token");
        let response = self
            .http
            .post(&self.token_url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&self.credentials)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            warn!(status = status.as_u16(), "token exchange rejected");
            return Err(ESignError::Auth {
                status: status.as_u16(),
                body: body_to_value(&bytes),
            });
        }

        let fresh: CachedToken = serde_json::from_slice(&bytes)?;
        debug!(expires_at = fresh.expires_at, "bearer token refreshed");
        let token = fresh.token.clone();
        self.cache.store(fresh);
        Ok(token)
    }

    pub(crate) fn invalidate(&self) {
        self.cache.clear();
    }
}
