//! Events emitted by a session.

use folio_core::DocumentId;

/// Changes observable by the UI shell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// A document was added to the tab strip.
    DocumentAdded { id: DocumentId },
    /// A document was closed.
    DocumentClosed { id: DocumentId },
    /// The last document was closed and a default one took its place.
    DocumentReplaced {
        closed: DocumentId,
        replacement: DocumentId,
    },
    /// A different document became active.
    ActiveChanged { id: DocumentId },
    /// A document's content changed (edit, undo, redo or update).
    ContentChanged { id: DocumentId },
    /// A document's unsaved-changes flag flipped.
    DirtyChanged { id: DocumentId, dirty: bool },
    /// A document's undo/redo availability may have changed.
    HistoryChanged {
        id: DocumentId,
        can_undo: bool,
        can_redo: bool,
    },
    /// A debounce window closed; the next edit opens a new undo step.
    CheckpointSealed { id: DocumentId },
    /// A tab moved.
    Reordered { from: usize, to: usize },
}
