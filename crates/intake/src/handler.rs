//! Submission orchestrator.
//!
//! [`LeadIntakeHandler`] is attached once to a form surface and runs one
//! linear attempt per [`submit`](LeadIntakeHandler::submit) call:
//!
//! 1. clear the status and every field error, read and trim the fields;
//! 2. validate, stopping with inline errors if anything fails;
//! 3. save a copy of the lead locally (best effort);
//! 4. fetch a verification token, stopping if the client is absent or fails;
//! 5. send the lead with the token attached;
//! 6. reveal the contact details, whether or not delivery succeeded.
//!
//! The two network calls are awaited in sequence. Nothing is retried, and
//! unless [`HandlerSettings::guard_double_submit`] is set, overlapping calls
//! run as fully independent attempts.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Datelike;
use leadline_core::{
    AttemptLog, CoreError, FieldErrors, FieldName, Lead, LeadFields, LeadPayload, SubmissionState,
};
use leadline_delivery::verification::DEFAULT_ACTION;
use leadline_delivery::{LeadSubmitter, TokenIssuer};
use leadline_store::LeadLog;

use crate::export::{self, ExportOutcome};
use crate::messages;
use crate::presenter::{clear_errors, show_errors};
use crate::surface::{FormSurface, StatusTone};

// ---------------------------------------------------------------------------
// Settings & context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSettings {
    /// Site key the verification token is scoped to.
    pub site_key: String,
    /// Action label sent with the token request.
    pub action: String,
    /// Reject a submit while another attempt is still in flight.
    pub guard_double_submit: bool,
}

impl Default for HandlerSettings {
    fn default() -> Self {
        Self {
            site_key: String::new(),
            action: DEFAULT_ACTION.to_string(),
            guard_double_submit: false,
        }
    }
}

/// The collaborators a handler drives.
#[derive(Clone)]
pub struct IntakeContext {
    pub surface: Arc<dyn FormSurface>,
    pub leads: LeadLog,
    /// `None` when the verification client failed to load.
    pub issuer: Option<Arc<dyn TokenIssuer>>,
    pub submitter: Arc<dyn LeadSubmitter>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How one submit attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// At least one field failed validation; nothing was saved or sent.
    Invalid(FieldErrors),
    /// No verification client was available; nothing was sent or revealed.
    VerificationUnavailable,
    /// The token fetch failed; nothing was sent or revealed.
    VerificationFailed,
    /// The lead was delivered and the contact details revealed.
    Delivered,
    /// Delivery failed, but the contact details were revealed anyway.
    NotificationFailed,
    /// Another attempt was in flight and the double-submit guard is on.
    Rejected,
}

impl SubmitOutcome {
    pub fn contact_revealed(&self) -> bool {
        matches!(self, Self::Delivered | Self::NotificationFailed)
    }
}

/// Result of one submit attempt together with the states it went through.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub outcome: SubmitOutcome,
    pub log: AttemptLog,
    /// Whether the local copy was written.
    pub saved_locally: bool,
}

impl AttemptRecord {
    pub fn final_state(&self) -> SubmissionState {
        self.log.current()
    }
}

// ---------------------------------------------------------------------------
// LeadIntakeHandler
// ---------------------------------------------------------------------------

pub struct LeadIntakeHandler {
    ctx: IntakeContext,
    settings: HandlerSettings,
    state: Mutex<SubmissionState>,
    in_flight: AtomicBool,
}

impl LeadIntakeHandler {
    /// Attach to the form: stamps the current year into the surface and
    /// starts in `Idle`.
    pub fn attach(ctx: IntakeContext, settings: HandlerSettings) -> Self {
        ctx.surface.set_year(chrono::Utc::now().year());
        if ctx.issuer.is_none() {
            tracing::warn!("Verification client unavailable; submissions will be refused");
        }
        Self {
            ctx,
            settings,
            state: Mutex::new(SubmissionState::Idle),
            in_flight: AtomicBool::new(false),
        }
    }

    /// State most recently entered by any attempt.
    pub fn state(&self) -> SubmissionState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn settings(&self) -> &HandlerSettings {
        &self.settings
    }

    /// A field was edited: an `Invalid` form goes back to `Idle`.
    pub fn field_edited(&self) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *state == SubmissionState::Invalid {
            *state = SubmissionState::Idle;
        }
    }

    /// Run one submit attempt to its terminal state.
    pub async fn submit(&self) -> AttemptRecord {
        let _guard = if self.settings.guard_double_submit {
            match InFlightGuard::acquire(&self.in_flight) {
                Some(guard) => Some(guard),
                None => {
                    tracing::info!("Submit ignored, another attempt is in flight");
                    return AttemptRecord {
                        outcome: SubmitOutcome::Rejected,
                        log: AttemptLog::new(),
                        saved_locally: false,
                    };
                }
            }
        } else {
            None
        };

        let mut log = AttemptLog::new();
        let (outcome, saved_locally) = self.run_attempt(&mut log).await;
        tracing::info!(outcome = ?outcome, states = ?log.states(), "Submit attempt finished");

        AttemptRecord {
            outcome,
            log,
            saved_locally,
        }
    }

    /// Export the stored leads as CSV through the surface.
    pub fn export_csv(&self) -> ExportOutcome {
        export::export_csv(self.ctx.surface.as_ref(), &self.ctx.leads)
    }

    async fn run_attempt(&self, log: &mut AttemptLog) -> (SubmitOutcome, bool) {
        let surface = self.ctx.surface.as_ref();

        surface.set_status("", StatusTone::Neutral);
        self.advance(log, SubmissionState::Validating);
        clear_errors(surface, &FieldName::ALL);

        let fields = LeadFields::read_from(|field| surface.field_value(field));
        let lead = match Lead::create(fields) {
            Ok(lead) => lead,
            Err(CoreError::Validation(errors)) => {
                tracing::debug!(fields = %errors, "Lead failed validation");
                show_errors(surface, &errors);
                surface.set_status(messages::STATUS_CORRECT_FIELDS, StatusTone::Error);
                self.advance(log, SubmissionState::Invalid);
                return (SubmitOutcome::Invalid(errors), false);
            }
        };

        let saved_locally = self.ctx.leads.save_best_effort(&lead);
        let mut payload = LeadPayload::new(lead.fields);

        surface.set_status(messages::STATUS_VERIFYING, StatusTone::Neutral);
        self.advance(log, SubmissionState::Verifying);

        let Some(issuer) = &self.ctx.issuer else {
            surface.set_status(messages::STATUS_VERIFICATION_UNAVAILABLE, StatusTone::Error);
            self.advance(log, SubmissionState::VerificationFailed);
            return (SubmitOutcome::VerificationUnavailable, saved_locally);
        };

        let token = match issuer
            .fetch_token(&self.settings.site_key, &self.settings.action)
            .await
        {
            Ok(token) => token,
            Err(e) => {
                tracing::error!(error = %e, "Verification token fetch failed");
                surface.set_status(messages::STATUS_VERIFICATION_FAILED, StatusTone::Error);
                self.advance(log, SubmissionState::VerificationFailed);
                return (SubmitOutcome::VerificationFailed, saved_locally);
            }
        };
        payload.attach_token(token.into_inner());

        surface.set_status(messages::STATUS_SENDING, StatusTone::Neutral);
        self.advance(log, SubmissionState::Sending);

        let outcome = match self.ctx.submitter.submit(&payload).await {
            Ok(_) => {
                surface.reveal_contact_details();
                surface.set_status(messages::STATUS_DELIVERED, StatusTone::Success);
                self.advance(log, SubmissionState::Success);
                SubmitOutcome::Delivered
            }
            Err(e) => {
                tracing::error!(error = %e, "Lead submission failed");
                surface.reveal_contact_details();
                surface.set_status(messages::STATUS_NOTIFICATION_FAILED, StatusTone::Error);
                self.advance(log, SubmissionState::SendFailed);
                SubmitOutcome::NotificationFailed
            }
        };
        (outcome, saved_locally)
    }

    fn advance(&self, log: &mut AttemptLog, next: SubmissionState) {
        log.advance(next);
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
        tracing::debug!(state = ?next, "Submission state changed");
    }
}

/// Holds the in-flight flag for the lifetime of one attempt.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_guard_is_exclusive_and_released_on_drop() {
        let flag = AtomicBool::new(false);
        let first = InFlightGuard::acquire(&flag);
        assert!(first.is_some());
        assert!(InFlightGuard::acquire(&flag).is_none());

        drop(first);
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[test]
    fn only_revealing_outcomes_report_contact_revealed() {
        assert!(SubmitOutcome::Delivered.contact_revealed());
        assert!(SubmitOutcome::NotificationFailed.contact_revealed());
        assert!(!SubmitOutcome::VerificationFailed.contact_revealed());
        assert!(!SubmitOutcome::VerificationUnavailable.contact_revealed());
        assert!(!SubmitOutcome::Rejected.contact_revealed());
        assert!(!SubmitOutcome::Invalid(FieldErrors::default()).contact_revealed());
    }

    #[test]
    fn default_settings_use_submit_action_unguarded() {
        let settings = HandlerSettings::default();
        assert_eq!(settings.action, "submit");
        assert!(!settings.guard_double_submit);
    }
}
