//! Domain model for the Leadline contact form.
//!
//! - [`lead`]: the fixed form schema, the [`Lead`] record and the outbound
//!   [`LeadPayload`].
//! - [`validation`]: per-field rules producing [`FieldErrors`].
//! - [`csv_export`]: CSV rendering of stored leads.
//! - [`state`]: the submission state machine and per-attempt history.

pub mod csv_export;
pub mod error;
pub mod lead;
pub mod state;
pub mod validation;

pub use error::CoreError;
pub use lead::{FieldName, Lead, LeadFields, LeadPayload};
pub use state::{AttemptLog, SubmissionState};
pub use validation::{validate_fields, FieldErrors};
