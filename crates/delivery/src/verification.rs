//! Bot-verification tokens.
//!
//! A [`TokenIssuer`] hands out a one-time token for a site key and an
//! action label. [`HttpTokenIssuer`] obtains it from a token service over
//! HTTP: it POSTs `{"siteKey", "action"}` and expects `{"token": "..."}`
//! back.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Action label sent with every token request unless configured otherwise.
pub const DEFAULT_ACTION: &str = "submit";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for token fetch failures.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The underlying HTTP request failed (network, DNS, timeout, body decode).
    #[error("Token request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The token service returned a non-2xx status code.
    #[error("Token service returned HTTP {0}")]
    HttpStatus(u16),

    /// The response did not carry a usable token.
    #[error("Token service returned no token")]
    MissingToken,

    /// The verification client rejected the call.
    #[error("Verification client error: {0}")]
    Client(String),
}

// ---------------------------------------------------------------------------
// VerificationToken
// ---------------------------------------------------------------------------

/// A single-use proof that the submitter passed the bot check.
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationToken(String);

impl VerificationToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for VerificationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VerificationToken({} chars)", self.0.len())
    }
}

// ---------------------------------------------------------------------------
// TokenIssuer
// ---------------------------------------------------------------------------

/// Issues verification tokens scoped to a site key and an action.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn fetch_token(
        &self,
        site_key: &str,
        action: &str,
    ) -> Result<VerificationToken, VerificationError>;
}

// ---------------------------------------------------------------------------
// HttpTokenIssuer
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    site_key: &'a str,
    action: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
}

/// Fetches tokens from an HTTP token service.
pub struct HttpTokenIssuer {
    client: reqwest::Client,
    url: String,
}

impl HttpTokenIssuer {
    /// Create an issuer for `url`. `timeout` bounds each request; `None`
    /// waits indefinitely.
    pub fn new(
        url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, VerificationError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TokenIssuer for HttpTokenIssuer {
    async fn fetch_token(
        &self,
        site_key: &str,
        action: &str,
    ) -> Result<VerificationToken, VerificationError> {
        let response = self
            .client
            .post(&self.url)
            .json(&TokenRequest { site_key, action })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(VerificationError::HttpStatus(response.status().as_u16()));
        }

        let body: TokenResponse = response.json().await?;
        match body.token {
            Some(token) if !token.is_empty() => {
                tracing::debug!(action, "Verification token issued");
                Ok(VerificationToken::new(token))
            }
            _ => Err(VerificationError::MissingToken),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
