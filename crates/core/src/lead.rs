//! The contact form schema and the records built from it.
//!
//! A [`Lead`] is what gets appended to local storage; a [`LeadPayload`] is
//! what gets sent to the delivery endpoint. Both carry the same seven
//! trimmed [`LeadFields`] and serialize with the form's camelCase names.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::validation::validate_fields;

/// Payload key under which the verification token travels.
pub const TOKEN_FIELD: &str = "g-recaptcha-response";

// ---------------------------------------------------------------------------
// FieldName
// ---------------------------------------------------------------------------

/// The named inputs of the contact form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    FirstName,
    LastName,
    Phone,
    Email,
    Reason,
    PersonalRelation,
    BusinessRelation,
}

impl FieldName {
    /// Every field, in form order.
    pub const ALL: [FieldName; 7] = [
        FieldName::FirstName,
        FieldName::LastName,
        FieldName::Phone,
        FieldName::Email,
        FieldName::Reason,
        FieldName::PersonalRelation,
        FieldName::BusinessRelation,
    ];

    /// The input's `name` attribute.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldName::FirstName => "firstName",
            FieldName::LastName => "lastName",
            FieldName::Phone => "phone",
            FieldName::Email => "email",
            FieldName::Reason => "reason",
            FieldName::PersonalRelation => "personalRelation",
            FieldName::BusinessRelation => "businessRelation",
        }
    }

    /// Look a field up by its `name` attribute.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// LeadFields
// ---------------------------------------------------------------------------

/// Trimmed values of the seven form inputs. Absent inputs read as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LeadFields {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub reason: String,
    pub personal_relation: String,
    pub business_relation: String,
}

impl LeadFields {
    /// Collect the form values through `read`, trimming each one.
    pub fn read_from<F>(mut read: F) -> Self
    where
        F: FnMut(FieldName) -> Option<String>,
    {
        let mut fields = Self::default();
        for name in FieldName::ALL {
            if let Some(value) = read(name) {
                fields.set(name, &value);
            }
        }
        fields
    }

    pub fn get(&self, name: FieldName) -> &str {
        match name {
            FieldName::FirstName => &self.first_name,
            FieldName::LastName => &self.last_name,
            FieldName::Phone => &self.phone,
            FieldName::Email => &self.email,
            FieldName::Reason => &self.reason,
            FieldName::PersonalRelation => &self.personal_relation,
            FieldName::BusinessRelation => &self.business_relation,
        }
    }

    /// Store `value` for `name`, trimmed of surrounding whitespace.
    pub fn set(&mut self, name: FieldName, value: &str) {
        let slot = match name {
            FieldName::FirstName => &mut self.first_name,
            FieldName::LastName => &mut self.last_name,
            FieldName::Phone => &mut self.phone,
            FieldName::Email => &mut self.email,
            FieldName::Reason => &mut self.reason,
            FieldName::PersonalRelation => &mut self.personal_relation,
            FieldName::BusinessRelation => &mut self.business_relation,
        };
        *slot = trim_form_value(value).to_string();
    }

    /// `(name, value)` pairs in form order, as a form-data body would carry them.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        FieldName::ALL
            .into_iter()
            .map(move |name| (name.as_str(), self.get(name)))
    }
}

// ---------------------------------------------------------------------------
// Lead
// ---------------------------------------------------------------------------

/// A locally stored contact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub fields: LeadFields,
    #[serde(default)]
    pub timestamp: String,
}

impl Lead {
    pub fn new(fields: LeadFields, timestamp: impl Into<String>) -> Self {
        Self {
            fields,
            timestamp: timestamp.into(),
        }
    }

    /// Validate `fields` and stamp them with the current time.
    pub fn create(fields: LeadFields) -> Result<Self, CoreError> {
        let errors = validate_fields(&fields);
        if !errors.is_empty() {
            return Err(CoreError::Validation(errors));
        }
        Ok(Self::new(fields, now_timestamp()))
    }
}

// ---------------------------------------------------------------------------
// LeadPayload
// ---------------------------------------------------------------------------

/// The body relayed to the delivery endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPayload {
    #[serde(flatten)]
    pub fields: LeadFields,
    pub submitted_at: String,
    #[serde(rename = "g-recaptcha-response", skip_serializing_if = "Option::is_none")]
    pub verification_token: Option<String>,
}

impl LeadPayload {
    /// Build an unverified payload stamped with the current time.
    pub fn new(fields: LeadFields) -> Self {
        Self {
            fields,
            submitted_at: now_timestamp(),
            verification_token: None,
        }
    }

    pub fn attach_token(&mut self, token: impl Into<String>) {
        self.verification_token = Some(token.into());
    }

    /// Every field of the payload as `(name, value)` pairs, token last.
    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<(&'static str, String)> = self
            .fields
            .pairs()
            .map(|(name, value)| (name, value.to_string()))
            .collect();
        pairs.push(("submittedAt", self.submitted_at.clone()));
        if let Some(token) = &self.verification_token {
            pairs.push((TOKEN_FIELD, token.clone()));
        }
        pairs
    }
}

/// Strip surrounding whitespace the way a browser's `String.prototype.trim`
/// does, which also removes the byte order mark (U+FEFF).
pub fn trim_form_value(value: &str) -> &str {
    value.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g.
/// `2026-10-16T09:30:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
