//! Test doubles for the intake handler: a recording form surface and fake
//! verification / delivery capabilities.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use leadline_core::{FieldName, LeadPayload};
use leadline_delivery::{
    LeadSubmitter, SubmissionError, TokenIssuer, VerificationError, VerificationToken,
};
use leadline_intake::{
    Download, FormSurface, HandlerSettings, IntakeContext, LeadIntakeHandler, StatusTone,
};
use leadline_store::{KeyValueStorage, LeadLog, MemoryStorage};
use serde_json::{json, Value};
use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// RecordingSurface
// ---------------------------------------------------------------------------

/// An in-memory form that records everything the handler renders.
pub struct RecordingSurface {
    values: Mutex<HashMap<FieldName, String>>,
    absent: Vec<FieldName>,
    field_errors: Mutex<BTreeMap<FieldName, String>>,
    statuses: Mutex<Vec<(String, StatusTone)>>,
    contact_visible: Mutex<bool>,
    year: Mutex<Option<i32>>,
    downloads: Mutex<Vec<Download>>,
    can_download: bool,
}

impl RecordingSurface {
    pub fn new(values: &[(FieldName, &str)]) -> Self {
        Self {
            values: Mutex::new(values.iter().map(|(f, v)| (*f, v.to_string())).collect()),
            absent: Vec::new(),
            field_errors: Mutex::new(BTreeMap::new()),
            statuses: Mutex::new(Vec::new()),
            contact_visible: Mutex::new(false),
            year: Mutex::new(None),
            downloads: Mutex::new(Vec::new()),
            can_download: true,
        }
    }

    /// A fully valid form with whitespace around every value.
    pub fn valid() -> Self {
        Self::new(&valid_values())
    }

    pub fn without_download_trigger(mut self) -> Self {
        self.can_download = false;
        self
    }

    /// Drop the inputs for `fields` from the form entirely.
    pub fn without_inputs(mut self, fields: &[FieldName]) -> Self {
        self.absent.extend_from_slice(fields);
        self
    }

    pub fn set_value(&self, field: FieldName, value: &str) {
        self.values.lock().unwrap().insert(field, value.to_string());
    }

    pub fn field_error(&self, field: FieldName) -> Option<String> {
        self.field_errors.lock().unwrap().get(&field).cloned()
    }

    pub fn errored_fields(&self) -> Vec<FieldName> {
        self.field_errors.lock().unwrap().keys().copied().collect()
    }

    pub fn status(&self) -> (String, StatusTone) {
        self.statuses
            .lock()
            .unwrap()
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn status_texts(&self) -> Vec<String> {
        self.statuses
            .lock()
            .unwrap()
            .iter()
            .map(|(text, _)| text.clone())
            .collect()
    }

    pub fn contact_visible(&self) -> bool {
        *self.contact_visible.lock().unwrap()
    }

    /// Value of the contact element's `aria-hidden` attribute.
    pub fn contact_aria_hidden(&self) -> &'static str {
        if self.contact_visible() {
            "false"
        } else {
            "true"
        }
    }

    pub fn year(&self) -> Option<i32> {
        *self.year.lock().unwrap()
    }

    pub fn downloads(&self) -> Vec<Download> {
        self.downloads.lock().unwrap().clone()
    }
}

impl FormSurface for RecordingSurface {
    fn field_value(&self, field: FieldName) -> Option<String> {
        if self.absent.contains(&field) {
            return None;
        }
        Some(self.values.lock().unwrap().get(&field).cloned().unwrap_or_default())
    }

    fn mark_field_error(&self, field: FieldName, message: &str) {
        self.field_errors
            .lock()
            .unwrap()
            .insert(field, message.to_string());
    }

    fn clear_field_error(&self, field: FieldName) {
        self.field_errors.lock().unwrap().remove(&field);
    }

    fn set_status(&self, text: &str, tone: StatusTone) {
        self.statuses.lock().unwrap().push((text.to_string(), tone));
    }

    fn reveal_contact_details(&self) {
        *self.contact_visible.lock().unwrap() = true;
    }

    fn set_year(&self, year: i32) {
        *self.year.lock().unwrap() = Some(year);
    }

    fn trigger_download(&self, download: &Download) -> io::Result<()> {
        if !self.can_download {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "no trigger"));
        }
        self.downloads.lock().unwrap().push(download.clone());
        Ok(())
    }
}

pub fn valid_values() -> Vec<(FieldName, &'static str)> {
    vec![
        (FieldName::FirstName, "  Ada "),
        (FieldName::LastName, "Lovelace  "),
        (FieldName::Phone, " 555-0100"),
        (FieldName::Email, " ada@example.com "),
        (FieldName::Reason, "\tAnalytical engine consulting\n"),
        (FieldName::PersonalRelation, " Met at the Royal Society "),
        (FieldName::BusinessRelation, ""),
    ]
}

// ---------------------------------------------------------------------------
// FakeIssuer
// ---------------------------------------------------------------------------

pub struct FakeIssuer {
    result: Result<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl FakeIssuer {
    pub fn issuing(token: &str) -> Self {
        Self {
            result: Ok(token.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            result: Err(reason.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(site_key, action)` of every call.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TokenIssuer for FakeIssuer {
    async fn fetch_token(
        &self,
        site_key: &str,
        action: &str,
    ) -> Result<VerificationToken, VerificationError> {
        self.calls
            .lock()
            .unwrap()
            .push((site_key.to_string(), action.to_string()));
        match &self.result {
            Ok(token) => Ok(VerificationToken::new(token.clone())),
            Err(reason) => Err(VerificationError::Client(reason.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// FakeSubmitter
// ---------------------------------------------------------------------------

pub struct FakeSubmitter {
    fail_with: Option<u16>,
    gate: Option<Arc<Notify>>,
    started: AtomicUsize,
    payloads: Mutex<Vec<LeadPayload>>,
}

impl FakeSubmitter {
    pub fn accepting() -> Self {
        Self {
            fail_with: None,
            gate: None,
            started: AtomicUsize::new(0),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting(status: u16) -> Self {
        Self {
            fail_with: Some(status),
            ..Self::accepting()
        }
    }

    /// Each submit waits for a notification on `gate` before answering.
    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::accepting()
        }
    }

    /// Number of submits that have started.
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn payloads(&self) -> Vec<LeadPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadSubmitter for FakeSubmitter {
    async fn submit(&self, payload: &LeadPayload) -> Result<Value, SubmissionError> {
        self.started.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.payloads.lock().unwrap().push(payload.clone());
        match self.fail_with {
            Some(status) => Err(SubmissionError::HttpStatus(status)),
            None => Ok(json!({ "ok": true })),
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub const SITE_KEY: &str = "test-site-key";

pub fn settings() -> HandlerSettings {
    HandlerSettings {
        site_key: SITE_KEY.to_string(),
        ..HandlerSettings::default()
    }
}

/// A handler wired to fakes, with handles on every collaborator.
pub struct Harness {
    pub handler: Arc<LeadIntakeHandler>,
    pub surface: Arc<RecordingSurface>,
    pub storage: Arc<MemoryStorage>,
    pub leads: LeadLog,
    pub issuer: Option<Arc<FakeIssuer>>,
    pub submitter: Arc<FakeSubmitter>,
}

impl Harness {
    pub fn new(
        surface: RecordingSurface,
        issuer: Option<FakeIssuer>,
        submitter: FakeSubmitter,
        settings: HandlerSettings,
    ) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        Self::with_storage(surface, issuer, submitter, settings, storage)
    }

    pub fn with_storage(
        surface: RecordingSurface,
        issuer: Option<FakeIssuer>,
        submitter: FakeSubmitter,
        settings: HandlerSettings,
        storage: Arc<MemoryStorage>,
    ) -> Self {
        let surface = Arc::new(surface);
        let issuer = issuer.map(Arc::new);
        let submitter = Arc::new(submitter);
        let leads = LeadLog::with_default_key(storage.clone());

        let ctx = IntakeContext {
            surface: surface.clone(),
            leads: leads.clone(),
            issuer: issuer.clone().map(|i| i as Arc<dyn TokenIssuer>),
            submitter: submitter.clone(),
        };

        Self {
            handler: Arc::new(LeadIntakeHandler::attach(ctx, settings)),
            surface,
            storage,
            leads,
            issuer,
            submitter,
        }
    }

    /// Valid form, issuing verifier, accepting endpoint.
    pub fn happy() -> Self {
        Self::new(
            RecordingSurface::valid(),
            Some(FakeIssuer::issuing("tok-123")),
            FakeSubmitter::accepting(),
            settings(),
        )
    }

    pub fn issuer_calls(&self) -> usize {
        self.issuer.as_ref().map_or(0, |i| i.calls().len())
    }

    pub fn stored_raw(&self) -> Option<String> {
        self.storage.get_item(self.leads.key()).unwrap()
    }
}
