use std::path::PathBuf;
use std::time::Duration;

use leadline_delivery::verification::DEFAULT_ACTION;
use leadline_delivery::PayloadFormat;
use leadline_store::DEFAULT_LEADS_KEY;

use crate::handler::HandlerSettings;

/// Default directory for the local lead store.
const DEFAULT_STORAGE_DIR: &str = ".leadline";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

// ---------------------------------------------------------------------------
// StorageConfig
// ---------------------------------------------------------------------------

/// Where leads are kept locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub dir: PathBuf,
    pub key: String,
}

impl StorageConfig {
    /// | Env Var            | Default         |
    /// |--------------------|-----------------|
    /// | `LEAD_STORAGE_DIR` | `.leadline`     |
    /// | `LEAD_STORAGE_KEY` | `contact_leads` |
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            dir: lookup("LEAD_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR)),
            key: lookup("LEAD_STORAGE_KEY").unwrap_or_else(|| DEFAULT_LEADS_KEY.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// IntakeConfig
// ---------------------------------------------------------------------------

/// Intake configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Form-relay URL leads are POSTed to.
    pub submit_endpoint: String,
    /// Verification site key.
    pub site_key: String,
    /// Verification action label.
    pub action: String,
    /// Token service URL. Unset means the verification client is unavailable.
    pub token_url: Option<String>,
    pub payload_format: PayloadFormat,
    pub storage: StorageConfig,
    pub guard_double_submit: bool,
    /// Per-request timeout for outbound calls. Unset waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Text shown once the contact details are revealed.
    pub contact_details: String,
}

impl IntakeConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Required | Default          |
    /// |-----------------------------|----------|------------------|
    /// | `LEAD_SUBMIT_ENDPOINT`      | yes      | -                |
    /// | `RECAPTCHA_SITE_KEY`        | yes      | -                |
    /// | `RECAPTCHA_ACTION`          | no       | `submit`         |
    /// | `RECAPTCHA_TOKEN_URL`       | no       | unset (no issuer) |
    /// | `LEAD_PAYLOAD_FORMAT`       | no       | `json`           |
    /// | `LEAD_STORAGE_DIR`          | no       | `.leadline`      |
    /// | `LEAD_STORAGE_KEY`          | no       | `contact_leads`  |
    /// | `LEAD_GUARD_DOUBLE_SUBMIT`  | no       | `false`          |
    /// | `LEAD_REQUEST_TIMEOUT_SECS` | no       | unset (no timeout) |
    /// | `LEAD_CONTACT_DETAILS`      | no       | empty            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    /// Load configuration through `lookup` instead of the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let submit_endpoint =
            lookup("LEAD_SUBMIT_ENDPOINT").ok_or(ConfigError::Missing("LEAD_SUBMIT_ENDPOINT"))?;
        let site_key =
            lookup("RECAPTCHA_SITE_KEY").ok_or(ConfigError::Missing("RECAPTCHA_SITE_KEY"))?;

        let payload_format = match lookup("LEAD_PAYLOAD_FORMAT") {
            None => PayloadFormat::default(),
            Some(value) => PayloadFormat::parse(&value).ok_or(ConfigError::Invalid {
                name: "LEAD_PAYLOAD_FORMAT",
                value,
            })?,
        };

        let guard_double_submit = match lookup("LEAD_GUARD_DOUBLE_SUBMIT") {
            None => false,
            Some(value) => parse_flag(&value).ok_or(ConfigError::Invalid {
                name: "LEAD_GUARD_DOUBLE_SUBMIT",
                value,
            })?,
        };

        let request_timeout = match lookup("LEAD_REQUEST_TIMEOUT_SECS") {
            None => None,
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "LEAD_REQUEST_TIMEOUT_SECS",
                        value,
                    })
                }
            },
        };

        Ok(Self {
            submit_endpoint,
            site_key,
            action: lookup("RECAPTCHA_ACTION").unwrap_or_else(|| DEFAULT_ACTION.to_string()),
            token_url: lookup("RECAPTCHA_TOKEN_URL").filter(|url| !url.trim().is_empty()),
            payload_format,
            storage: StorageConfig::from_lookup(&lookup),
            guard_double_submit,
            request_timeout,
            contact_details: lookup("LEAD_CONTACT_DETAILS").unwrap_or_default(),
        })
    }

    pub fn handler_settings(&self) -> HandlerSettings {
        HandlerSettings {
            site_key: self.site_key.clone(),
            action: self.action.clone(),
            guard_double_submit: self.guard_double_submit,
        }
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
