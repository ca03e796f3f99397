//! Append-only list of leads kept under one storage key.

use std::sync::{Arc, Mutex, PoisonError};

use leadline_core::Lead;
use serde_json::Value;

use crate::error::StoreError;
use crate::storage::KeyValueStorage;

/// Storage key holding the JSON array of leads.
pub const DEFAULT_LEADS_KEY: &str = "contact_leads";

/// The locally persisted leads.
///
/// The stored document is a JSON array of lead objects. An absent key or a
/// document that does not parse is treated as an empty list.
///
/// Clones share one append lock, so concurrent appends through any clone
/// each add exactly one record.
#[derive(Clone)]
pub struct LeadLog {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    append_lock: Arc<Mutex<()>>,
}

impl LeadLog {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
            append_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn with_default_key(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::new(storage, DEFAULT_LEADS_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read every stored lead. An absent key is an empty list; malformed
    /// content is an error.
    pub fn load(&self) -> Result<Vec<Lead>, StoreError> {
        match self.storage.get_item(&self.key)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Like [`load`](Self::load), but any failure reads as an empty list.
    pub fn load_or_empty(&self) -> Vec<Lead> {
        match self.load() {
            Ok(leads) => leads,
            Err(e) => {
                tracing::warn!(
                    key = %self.key,
                    error = %e,
                    "Stored leads unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Append `lead` and write the list back. Returns the new list length.
    ///
    /// Records already in storage are carried over verbatim, including any
    /// keys this version does not know about.
    pub fn append(&self, lead: &Lead) -> Result<usize, StoreError> {
        let _held = self.append_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut records = self.read_records()?;
        records.push(serde_json::to_value(lead)?);

        let encoded = serde_json::to_string(&records)?;
        self.storage.set_item(&self.key, &encoded)?;
        Ok(records.len())
    }

    /// Append `lead`, logging and swallowing any failure.
    ///
    /// Returns whether the lead was written.
    pub fn save_best_effort(&self, lead: &Lead) -> bool {
        match self.append(lead) {
            Ok(count) => {
                tracing::debug!(key = %self.key, count, "Lead saved locally");
                true
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Local storage save failed");
                false
            }
        }
    }

    fn read_records(&self) -> Result<Vec<Value>, StoreError> {
        let Some(raw) = self.storage.get_item(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(records) => Ok(records),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding unparsable lead list");
                Ok(Vec::new())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
