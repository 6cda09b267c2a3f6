//! Folio session - the multi-document core of a text editor.
//!
//! A [`Session`] tracks the open documents of one window, which one is
//! active, a bounded and debounced undo/redo history per document, and
//! whether each document has unsaved changes.
//!
//! # Quick Start
//!
//! ```rust
//! use folio_session::{NewDocument, Session, SessionConfig};
//!
//! let mut session = Session::new(SessionConfig::default());
//!
//! // Type into the default document
//! session.update_content("# Meeting Notes\n");
//! assert!(session.active_doc().is_dirty());
//! assert!(session.can_undo());
//!
//! // Open a second tab
//! let id = session.add_document(NewDocument::new().name("todo.md"));
//! assert_eq!(session.active_tab_id(), &id);
//! assert!(!session.can_undo());
//!
//! // Closing it returns to the first document, history intact
//! session.close_tab(&id);
//! assert!(session.can_undo());
//! ```
//!
//! # Architecture
//!
//! - [`registry`] - ordered tab strip and active selection
//! - [`dirty`] - unsaved-changes cache for UI binding
//! - [`session`] - the facade composing registry, history and timers
//! - [`events`] - change notifications
//! - [`transfer`] - moving documents between sessions

pub mod dirty;
pub mod events;
pub mod registry;
pub mod session;
pub mod transfer;

// Re-exports for convenience
pub use dirty::DirtyTracker;
pub use events::SessionEvent;
pub use registry::{Closed, Registry};
pub use session::{OpenOutcome, Session};
pub use transfer::DocumentTransfer;

pub use folio_core::{
    Clock, Document, DocumentId, DocumentPatch, ManualClock, NewDocument, OpenedFile, Result,
    SessionConfig, SessionConfigBuilder, SessionError, SystemClock,
};
pub use folio_history::{DEBOUNCE_MS, MAX_HISTORY_SIZE};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::events::SessionEvent;
    pub use crate::session::{OpenOutcome, Session};
    pub use folio_core::{
        Clock, Document, DocumentId, DocumentPatch, NewDocument, OpenedFile, SessionConfig,
    };
}
