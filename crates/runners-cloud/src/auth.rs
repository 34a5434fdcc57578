//! Service account authentication.
//!
//! # Design
//! - A short-lived PS256 assertion is signed with the authorized key and
//!   exchanged for an IAM bearer token.
//! - The key file is read on every acquisition so a rotated key is picked up
//!   without a restart.
//! - Caching and refresh timing belong to the caller; this module never retries.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;
use crate::http::send_json;

/// Lifetime of a signed assertion.
pub const ASSERTION_LIFETIME: Duration = Duration::from_secs(360);

const PEM_MARKER: &str = "-----BEGIN";
const SUFFIX_LEN: usize = 10;

/// IAM bearer token. `Debug` output never reveals the value.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Raw value for the `Authorization` header.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Trailing characters safe to print in logs.
    #[must_use]
    pub fn suffix(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(SUFFIX_LEN - 1)
            .map_or(0, |(index, _)| index);
        &self.0[start..]
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BearerToken(..{})", self.suffix())
    }
}

/// Claims carried by the signed assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionClaims {
    /// Token exchange URL.
    pub aud: String,
    /// Service account id.
    pub iss: String,
    /// Issue time, seconds since the epoch.
    pub iat: i64,
    /// Expiry time, seconds since the epoch.
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(rename = "iamToken", default)]
    iam_token: Option<String>,
}

/// Anything able to produce a fresh bearer token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Obtain a new token.
    ///
    /// # Errors
    ///
    /// Returns an [`AuthError`] describing the first failing step.
    async fn acquire_token(&self) -> Result<BearerToken, AuthError>;
}

/// Exchanges a service account key for IAM tokens.
#[derive(Debug, Clone)]
pub struct IamTokenProvider {
    client: Client,
    endpoint: String,
    service_account_id: String,
    key_id: String,
    key_path: PathBuf,
}

impl IamTokenProvider {
    /// Construct a provider posting to `endpoint`.
    #[must_use]
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        service_account_id: impl Into<String>,
        key_id: impl Into<String>,
        key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            service_account_id: service_account_id.into(),
            key_id: key_id.into(),
            key_path: key_path.into(),
        }
    }

    /// Sign an assertion issued at `issued_at` (seconds since the epoch).
    ///
    /// Any banner text preceding the PEM block is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::KeyParse`] for a key that is not RSA PEM and
    /// [`AuthError::Sign`] if signing fails.
    pub fn sign_assertion(&self, key_pem: &str, issued_at: i64) -> Result<String, AuthError> {
        let pem = key_pem.find(PEM_MARKER).map_or(key_pem, |start| &key_pem[start..]);
        let key = EncodingKey::from_rsa_pem(pem.as_bytes()).map_err(|source| {
            AuthError::KeyParse {
                path: self.key_path.clone(),
                source,
            }
        })?;

        let mut header = Header::new(Algorithm::PS256);
        header.kid = Some(self.key_id.clone());

        let lifetime = i64::try_from(ASSERTION_LIFETIME.as_secs()).unwrap_or(i64::MAX);
        let claims = AssertionClaims {
            aud: self.endpoint.clone(),
            iss: self.service_account_id.clone(),
            iat: issued_at,
            exp: issued_at.saturating_add(lifetime),
        };

        jsonwebtoken::encode(&header, &claims, &key).map_err(|source| AuthError::Sign { source })
    }

    async fn read_key(&self) -> Result<String, AuthError> {
        tokio::fs::read_to_string(&self.key_path)
            .await
            .map_err(|source| AuthError::KeyRead {
                path: self.key_path.clone(),
                source,
            })
    }
}

#[async_trait]
impl TokenSource for IamTokenProvider {
    async fn acquire_token(&self) -> Result<BearerToken, AuthError> {
        let key_pem = self.read_key().await?;
        let assertion = self.sign_assertion(&key_pem, Utc::now().timestamp())?;

        let request = self
            .client
            .post(&self.endpoint)
            .query(&[("jwt", assertion.as_str())])
            .header(CONTENT_TYPE, "application/json");
        let response: TokenResponse = send_json(&self.endpoint, request).await?;

        let token = response
            .iam_token
            .map(|value| value.trim_end().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AuthError::MissingToken {
                endpoint: self.endpoint.clone(),
            })?;

        let token = BearerToken::new(token);
        debug!(token_suffix = token.suffix(), "token exchange succeeded");
        Ok(token)
    }
}
