//! Contact form rules. Pure logic, no I/O.
//!
//! [`validate_fields`] returns one message per failing field. A field that
//! is absent from the returned [`FieldErrors`] is valid.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::lead::{trim_form_value, FieldName, LeadFields};

pub const MSG_FIRST_NAME_REQUIRED: &str = "Name is required.";
pub const MSG_LAST_NAME_REQUIRED: &str = "Last name is required.";
pub const MSG_PHONE_REQUIRED: &str = "Phone is required.";
pub const MSG_EMAIL_REQUIRED: &str = "Email is required.";
pub const MSG_EMAIL_INVALID: &str = "Please enter a valid email.";
pub const MSG_REASON_REQUIRED: &str = "Please describe the reason for contact.";

/// One `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// somewhere after it.
const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// FieldErrors
// ---------------------------------------------------------------------------

/// Field name to human-readable message, for every field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<FieldName, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: FieldName) -> bool {
        self.0.contains_key(&field)
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn insert(&mut self, field: FieldName, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Failing fields in form order.
    pub fn fields(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields().map(FieldName::as_str).collect();
        write!(f, "{}", names.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Evaluate every field rule against `fields`.
pub fn validate_fields(fields: &LeadFields) -> FieldErrors {
    let mut errors = FieldErrors::default();

    require(&mut errors, fields, FieldName::FirstName, MSG_FIRST_NAME_REQUIRED);
    require(&mut errors, fields, FieldName::LastName, MSG_LAST_NAME_REQUIRED);
    require(&mut errors, fields, FieldName::Phone, MSG_PHONE_REQUIRED);

    let email = trim_form_value(&fields.email);
    if email.is_empty() {
        errors.insert(FieldName::Email, MSG_EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.insert(FieldName::Email, MSG_EMAIL_INVALID);
    }

    require(&mut errors, fields, FieldName::Reason, MSG_REASON_REQUIRED);

    errors
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn require(errors: &mut FieldErrors, fields: &LeadFields, field: FieldName, message: &str) {
    if trim_form_value(fields.get(field)).is_empty() {
        errors.insert(field, message);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
