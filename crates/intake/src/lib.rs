//! `leadline-intake` library crate.
//!
//! Wires the contact form surface to validation, local persistence,
//! verification and delivery. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod export;
pub mod handler;
pub mod messages;
pub mod presenter;
pub mod surface;
pub mod terminal;

pub use export::ExportOutcome;
pub use handler::{
    AttemptRecord, HandlerSettings, IntakeContext, LeadIntakeHandler, SubmitOutcome,
};
pub use surface::{Download, FormSurface, StatusTone};
