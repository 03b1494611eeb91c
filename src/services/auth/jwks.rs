//! Key resolver: fetch the published key set and pick the JWK for a `kid`.
//!
//! Every call goes to the key source again. There is no cache here; a caching
//! `KeySource` can be layered in front without changing the resolver.
//!
//! Entries stay raw JSON until one matches the `kid`, so a key type this crate
//! cannot represent never hides the keys it can.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::Jwk;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum KeyResolveError {
    #[error("no JWK with kid {kid:?} in key set")]
    NotFound { kid: String },
    #[error("JWK with kid {kid:?} is not a usable key")]
    Unusable {
        kid: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to fetch JWK set: {0}")]
    Fetch(#[from] KeyFetchError),
}

/// Transport / decoding failures while retrieving the key set.
#[derive(Debug, Error)]
pub enum KeyFetchError {
    #[error("JWK set request timed out")]
    Timeout,
    #[error("JWK set request failed")]
    Request(#[source] reqwest::Error),
    #[error("JWK set endpoint responded with {status}")]
    Status { status: StatusCode },
    #[error("JWK set body is not a valid key set")]
    Body(#[source] reqwest::Error),
}

impl From<reqwest::Error> for KeyFetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Body(e)
        } else {
            Self::Request(e)
        }
    }
}

/// A published key set with its entries left unparsed.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySet {
    pub keys: Vec<Value>,
}

impl KeySet {
    /// First entry whose `kid` equals `kid`.
    fn find(self, kid: &str) -> Option<Value> {
        self.keys
            .into_iter()
            .find(|entry| entry.get("kid").and_then(Value::as_str) == Some(kid))
    }
}

/// Where the key set comes from.
///
/// Implementations must be cheap to share (`Arc<dyn KeySource>`).
#[async_trait]
pub trait KeySource: Send + Sync + 'static {
    async fn fetch(&self) -> Result<KeySet, KeyFetchError>;
}

/// `GET <jwks_url>` with a bounded request timeout.
#[derive(Clone, Debug)]
pub struct RemoteJwks {
    http_client: Client,
    url: Url,
}

impl RemoteJwks {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, KeyFetchError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KeyFetchError::Request)?;

        Ok(Self { http_client, url })
    }
}

#[async_trait]
impl KeySource for RemoteJwks {
    async fn fetch(&self) -> Result<KeySet, KeyFetchError> {
        let response = self
            .http_client
            .get(self.url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(url = %self.url, error = ?e, "JWK set request failed");
                KeyFetchError::from(e)
            })?;

        if !response.status().is_success() {
            tracing::warn!(url = %self.url, status = %response.status(), "JWK set endpoint error");
            return Err(KeyFetchError::Status {
                status: response.status(),
            });
        }

        let key_set: KeySet = response.json().await.map_err(|e| {
            tracing::warn!(url = %self.url, error = ?e, "invalid JWK set body");
            KeyFetchError::from(e)
        })?;

        tracing::debug!(url = %self.url, keys = key_set.keys.len(), "fetched JWK set");
        Ok(key_set)
    }
}

/// Resolves a `kid` to its JWK, fetching the key set on every call.
#[derive(Clone)]
pub struct KeyResolver {
    source: std::sync::Arc<dyn KeySource>,
}

impl std::fmt::Debug for KeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyResolver").finish_non_exhaustive()
    }
}

impl KeyResolver {
    pub fn new(source: std::sync::Arc<dyn KeySource>) -> Self {
        Self { source }
    }

    pub async fn resolve(&self, kid: &str) -> Result<Jwk, KeyResolveError> {
        let key_set = self.source.fetch().await?;

        // First match wins. A miss never falls back to another key.
        let entry = key_set.find(kid).ok_or_else(|| KeyResolveError::NotFound {
            kid: kid.to_string(),
        })?;

        serde_json::from_value(entry).map_err(|source| {
            tracing::warn!(kid, error = %source, "JWK for kid cannot be parsed");
            KeyResolveError::Unusable {
                kid: kid.to_string(),
                source,
            }
        })
    }
}
