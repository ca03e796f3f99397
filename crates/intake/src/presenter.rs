//! Inline field error rendering.

use leadline_core::{FieldErrors, FieldName};

use crate::surface::FormSurface;

/// Clear the errored mark and message of every listed field the surface has.
pub fn clear_errors(surface: &dyn FormSurface, fields: &[FieldName]) {
    for &field in fields {
        if surface.has_field(field) {
            surface.clear_field_error(field);
        }
    }
}

/// Mark each errored field and write its message. Fields the surface does
/// not render are skipped.
pub fn show_errors(surface: &dyn FormSurface, errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        if surface.has_field(field) {
            surface.mark_field_error(field, message);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
