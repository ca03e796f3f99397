//! Lead delivery to the form-relay endpoint.
//!
//! [`HttpLeadSubmitter`] sends a [`LeadPayload`] to a fixed URL via HTTP
//! POST, either as JSON or as multipart form-data. Exactly one attempt is
//! made per call; a non-2xx status or a transport failure is reported as a
//! [`SubmissionError`].

use std::time::Duration;

use async_trait::async_trait;
use leadline_core::LeadPayload;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for lead delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint returned a non-2xx status code.
    #[error("Submission endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// PayloadFormat
// ---------------------------------------------------------------------------

/// Body encoding used for the POST.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PayloadFormat {
    #[default]
    Json,
    /// The form field set as `multipart/form-data`.
    Multipart,
}

impl PayloadFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "multipart" | "form" | "form-data" => Some(Self::Multipart),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// LeadSubmitter
// ---------------------------------------------------------------------------

/// Relays a verified lead to its destination.
#[async_trait]
pub trait LeadSubmitter: Send + Sync {
    /// Send `payload`. On success returns the response body parsed as JSON,
    /// or an empty object if the body is absent or not JSON.
    async fn submit(&self, payload: &LeadPayload) -> Result<Value, SubmissionError>;
}

// ---------------------------------------------------------------------------
// HttpLeadSubmitter
// ---------------------------------------------------------------------------

pub struct HttpLeadSubmitter {
    client: reqwest::Client,
    endpoint: String,
    format: PayloadFormat,
}

impl HttpLeadSubmitter {
    /// Create a submitter for `endpoint`. `timeout` bounds each request;
    /// `None` waits indefinitely.
    pub fn new(
        endpoint: impl Into<String>,
        format: PayloadFormat,
        timeout: Option<Duration>,
    ) -> Result<Self, SubmissionError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: endpoint.into(),
            format,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn format(&self) -> PayloadFormat {
        self.format
    }
}

#[async_trait]
impl LeadSubmitter for HttpLeadSubmitter {
    async fn submit(&self, payload: &LeadPayload) -> Result<Value, SubmissionError> {
        let request = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json");

        let request = match self.format {
            PayloadFormat::Json => request.json(payload),
            PayloadFormat::Multipart => request.multipart(multipart_form(payload)),
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                endpoint = %self.endpoint,
                status = status.as_u16(),
                "Lead submission rejected"
            );
            return Err(SubmissionError::HttpStatus(status.as_u16()));
        }

        let body = match response.json::<Value>().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!(error = %e, "Submission response was not JSON, ignoring body");
                Value::Object(Default::default())
            }
        };

        tracing::info!(endpoint = %self.endpoint, "Lead submitted");
        Ok(body)
    }
}

fn multipart_form(payload: &LeadPayload) -> Form {
    payload
        .form_pairs()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
