//! # folio-core
//!
//! Shared types for the Folio editor session engine.
//!
//! This crate provides:
//! - Document identity and content with a save baseline (dirty derivation)
//! - Creation and patch descriptors for documents
//! - Session configuration and its builder
//! - Clocks for debounce timing (system and manually driven)
//! - The error type for the few fallible session edges

pub mod clock;
pub mod config;
pub mod document;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{
    SessionConfig, SessionConfigBuilder, DEBOUNCE_MS, DEFAULT_DOCUMENT_ID, DEFAULT_DOCUMENT_NAME,
    MAX_EVENT_CAPACITY, MAX_HISTORY_SIZE,
};
pub use document::{Document, DocumentId, DocumentPatch, NewDocument, OpenedFile};
pub use error::{Result, SessionError};
