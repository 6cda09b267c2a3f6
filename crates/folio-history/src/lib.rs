//! # folio-history
//!
//! Undo/redo history for the Folio session engine.
//!
//! This crate provides:
//! - Bounded undo/redo stacks of full content snapshots, one pair per document
//! - A store keyed by document id, created and dropped with the document
//! - Debounced checkpoint scheduling: bursts of edits collapse into one undo
//!   step, edits separated by a quiet period each get their own
//!
//! ## Example
//!
//! ```rust
//! use folio_core::DocumentId;
//! use folio_history::{CheckpointDecision, DebounceScheduler, HistoryStore};
//! use std::time::{Duration, Instant};
//!
//! let doc = DocumentId::from("notes");
//! let mut history = HistoryStore::new(100);
//! let mut scheduler = DebounceScheduler::new(Duration::from_millis(300));
//!
//! let now = Instant::now();
//! if scheduler.on_edit(&doc, now) == CheckpointDecision::Open {
//!     history.push(&doc, "before the burst".to_string());
//! }
//! assert_eq!(scheduler.on_edit(&doc, now), CheckpointDecision::Coalesce);
//!
//! let restored = history.undo(&doc, "after the burst".to_string());
//! assert_eq!(restored.as_deref(), Some("before the burst"));
//! ```

pub mod debounce;
pub mod history;

pub use debounce::{CheckpointDecision, DebounceScheduler};
pub use history::{History, HistoryStore};

pub use folio_core::{DEBOUNCE_MS, MAX_HISTORY_SIZE};
