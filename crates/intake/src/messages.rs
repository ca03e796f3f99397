//! User-facing status copy.

pub const STATUS_CORRECT_FIELDS: &str = "Please correct the highlighted fields and try again.";

pub const STATUS_VERIFYING: &str = "Verifying identity (reCAPTCHA)...";

pub const STATUS_VERIFICATION_UNAVAILABLE: &str =
    "reCAPTCHA failed to load. Please refresh the page and try again.";

pub const STATUS_VERIFICATION_FAILED: &str =
    "There was a problem verifying you are human. Please try again.";

pub const STATUS_SENDING: &str = "Sending your request...";

pub const STATUS_DELIVERED: &str =
    "Thank you. The contact details are now visible below. A notification email has also been sent.";

pub const STATUS_NOTIFICATION_FAILED: &str =
    "Contact info revealed, but email notification failed.";

pub const STATUS_NOTHING_TO_EXPORT: &str = "No leads stored locally yet.";

pub const STATUS_EXPORT_FAILED: &str = "Could not export the stored leads.";

pub fn status_exported(count: usize) -> String {
    format!("Exported {count} lead(s).")
}
