//! A [`FormSurface`] rendered on a terminal, used by the `leadline` binary.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use leadline_core::FieldName;

use crate::surface::{Download, FormSurface, StatusTone};

pub struct TerminalSurface {
    values: HashMap<FieldName, String>,
    contact_details: String,
    download_path: Option<PathBuf>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl TerminalSurface {
    /// A surface whose inputs hold `values`, writing to stdout.
    pub fn new(values: HashMap<FieldName, String>, contact_details: impl Into<String>) -> Self {
        Self::with_writer(values, contact_details, Box::new(io::stdout()))
    }

    pub fn with_writer(
        values: HashMap<FieldName, String>,
        contact_details: impl Into<String>,
        out: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            values,
            contact_details: contact_details.into(),
            download_path: None,
            out: Mutex::new(out),
        }
    }

    /// Write downloads to `path` instead of the suggested file name in the
    /// working directory.
    pub fn download_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.download_path = Some(path.into());
        self
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{text}") {
            tracing::warn!(error = %e, "Terminal write failed");
        }
    }
}

impl FormSurface for TerminalSurface {
    fn field_value(&self, field: FieldName) -> Option<String> {
        // Every input exists on the terminal form; unset ones are blank.
        Some(self.values.get(&field).cloned().unwrap_or_default())
    }

    fn mark_field_error(&self, field: FieldName, message: &str) {
        self.line(&format!("  {field}: {message}"));
    }

    fn clear_field_error(&self, _field: FieldName) {}

    fn set_status(&self, text: &str, tone: StatusTone) {
        if text.is_empty() {
            return;
        }
        match tone {
            StatusTone::Neutral => self.line(text),
            StatusTone::Error => self.line(&format!("error: {text}")),
            StatusTone::Success => self.line(&format!("ok: {text}")),
        }
    }

    fn reveal_contact_details(&self) {
        if !self.contact_details.is_empty() {
            self.line(&self.contact_details);
        }
    }

    fn trigger_download(&self, download: &Download) -> io::Result<()> {
        let path = self
            .download_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&download.file_name));
        fs::write(&path, &download.contents)?;
        self.line(&format!("Saved {}", path.display()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
