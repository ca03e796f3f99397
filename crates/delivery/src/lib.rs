//! Outbound calls made while relaying a lead.
//!
//! - [`verification`]: the bot-verification token capability
//!   ([`TokenIssuer`]) and its HTTP implementation.
//! - [`submission`]: the form-delivery capability ([`LeadSubmitter`]) and
//!   its HTTP implementation.
//!
//! Both calls are single-shot: no retries, no backoff.

pub mod submission;
pub mod verification;

pub use submission::{HttpLeadSubmitter, LeadSubmitter, PayloadFormat, SubmissionError};
pub use verification::{HttpTokenIssuer, TokenIssuer, VerificationError, VerificationToken};
