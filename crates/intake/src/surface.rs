//! The form surface the handler reads from and renders into.
//!
//! A browser page, a terminal, or a test double all implement
//! [`FormSurface`]. Every method takes `&self`; implementations use interior
//! mutability so one surface can be shared by overlapping submit attempts.

use std::io;

use leadline_core::FieldName;

/// Visual tone of the status line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusTone {
    #[default]
    Neutral,
    Error,
    Success,
}

/// A client-side file download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub mime_type: String,
    pub contents: String,
}

pub trait FormSurface: Send + Sync {
    /// Raw value of the input named `field`, or `None` if the form has no
    /// such input.
    fn field_value(&self, field: FieldName) -> Option<String>;

    /// Whether the form renders an input for `field`.
    fn has_field(&self, field: FieldName) -> bool {
        self.field_value(field).is_some()
    }

    /// Mark `field` as errored and write `message` into its error slot.
    fn mark_field_error(&self, field: FieldName, message: &str);

    /// Remove the errored mark from `field` and empty its error slot.
    fn clear_field_error(&self, field: FieldName);

    /// Replace the status line.
    fn set_status(&self, text: &str, tone: StatusTone);

    /// Make the contact details visible and no longer hidden from
    /// assistive technology.
    fn reveal_contact_details(&self);

    /// Write the year into the footer stamp, if the surface has one.
    fn set_year(&self, _year: i32) {}

    /// Hand `download` to the user. Surfaces without a download trigger
    /// report `Unsupported`.
    fn trigger_download(&self, _download: &Download) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "surface has no download trigger",
        ))
    }
}
