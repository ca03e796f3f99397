//! Local persistence for submitted leads.
//!
//! A [`KeyValueStorage`] is a small string-keyed store in the spirit of a
//! browser's `localStorage`; [`FileStorage`] and [`MemoryStorage`] are the
//! two backends. [`LeadLog`] keeps the append-only list of leads as one JSON
//! array under a fixed key.

pub mod error;
pub mod lead_log;
pub mod storage;

pub use error::StoreError;
pub use lead_log::{LeadLog, DEFAULT_LEADS_KEY};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
