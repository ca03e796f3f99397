//! CSV export of the locally stored leads.

use leadline_core::csv_export::{render_leads_csv, CSV_FILE_NAME, CSV_MIME_TYPE};
use leadline_store::LeadLog;

use crate::messages;
use crate::surface::{Download, FormSurface, StatusTone};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    /// The stored list was empty or unreadable; nothing was downloaded.
    Empty,
    Exported { count: usize },
    /// The surface could not deliver the file.
    DownloadFailed,
}

/// Render every stored lead as CSV and hand the file to the surface.
pub fn export_csv(surface: &dyn FormSurface, leads: &LeadLog) -> ExportOutcome {
    let stored = leads.load_or_empty();
    if stored.is_empty() {
        surface.set_status(messages::STATUS_NOTHING_TO_EXPORT, StatusTone::Error);
        return ExportOutcome::Empty;
    }

    let download = Download {
        file_name: CSV_FILE_NAME.to_string(),
        mime_type: CSV_MIME_TYPE.to_string(),
        contents: render_leads_csv(&stored),
    };

    match surface.trigger_download(&download) {
        Ok(()) => {
            let count = stored.len();
            tracing::info!(count, file = %download.file_name, "Exported stored leads");
            surface.set_status(&messages::status_exported(count), StatusTone::Success);
            ExportOutcome::Exported { count }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Lead export download failed");
            surface.set_status(messages::STATUS_EXPORT_FAILED, StatusTone::Error);
            ExportOutcome::DownloadFailed
        }
    }
}
