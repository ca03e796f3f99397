//! Submission state machine.
//!
//! ```text
//! Idle -> Validating -> Invalid
//!                    -> Verifying -> VerificationFailed
//!                                 -> Sending -> Success
//!                                            -> SendFailed
//! ```
//!
//! `Invalid` returns to `Idle` on the next field edit. Every terminal state
//! may start a new attempt (`Validating`).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Invalid,
    Verifying,
    Sending,
    Success,
    /// Delivery failed; contact details were still revealed.
    SendFailed,
    /// Verification failed or was unavailable; nothing was sent or revealed.
    VerificationFailed,
}

impl SubmissionState {
    /// Whether an attempt ends in this state.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Invalid | Self::Success | Self::SendFailed | Self::VerificationFailed
        )
    }

    /// Whether reaching this state reveals the contact details.
    pub fn reveals_contact(self) -> bool {
        matches!(self, Self::Success | Self::SendFailed)
    }

    pub fn can_transition_to(self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        match (self, next) {
            (Idle, Validating) => true,
            (Validating, Invalid | Verifying) => true,
            (Verifying, Sending | VerificationFailed) => true,
            (Sending, Success | SendFailed) => true,
            (Invalid, Idle) => true,
            (from, Validating) if from.is_terminal() => true,
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// AttemptLog
// ---------------------------------------------------------------------------

/// Ordered states visited by one submit attempt, starting at `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttemptLog {
    states: Vec<SubmissionState>,
}

impl AttemptLog {
    pub fn new() -> Self {
        Self {
            states: vec![SubmissionState::Idle],
        }
    }

    pub fn current(&self) -> SubmissionState {
        self.states
            .last()
            .copied()
            .unwrap_or(SubmissionState::Idle)
    }

    /// Record a move to `next`.
    pub fn advance(&mut self, next: SubmissionState) {
        debug_assert!(
            self.current().can_transition_to(next),
            "illegal transition {:?} -> {next:?}",
            self.current()
        );
        self.states.push(next);
    }

    pub fn states(&self) -> &[SubmissionState] {
        &self.states
    }
}

impl Default for AttemptLog {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
