//! The session - one window's worth of open documents.
//!
//! Every write goes through here so the registry, the undo histories, the
//! debounce timers and the dirty cache stay consistent with each other.

use crate::dirty::DirtyTracker;
use crate::events::SessionEvent;
use crate::registry::Registry;
use crate::transfer::DocumentTransfer;
use folio_core::{
    Clock, Document, DocumentId, DocumentPatch, NewDocument, OpenedFile, Result, SessionConfig,
    SessionError, SystemClock, MAX_EVENT_CAPACITY,
};
use folio_history::{CheckpointDecision, DebounceScheduler, HistoryStore};
use std::collections::HashSet;
use std::time::Instant;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// How [`Session::open_file`] placed the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The path was already open; that tab was activated.
    Focused(DocumentId),
    /// The active tab was an untouched empty document and now holds the file.
    Replaced(DocumentId),
    /// The file was opened in a new tab.
    Added(DocumentId),
}

impl OpenOutcome {
    pub fn id(&self) -> &DocumentId {
        match self {
            OpenOutcome::Focused(id) | OpenOutcome::Replaced(id) | OpenOutcome::Added(id) => id,
        }
    }
}

/// A multi-document editing session.
pub struct Session<C: Clock = SystemClock> {
    config: SessionConfig,
    clock: C,
    registry: Registry,
    history: HistoryStore,
    scheduler: DebounceScheduler,
    dirty: DirtyTracker,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl Session<SystemClock> {
    /// Create a session on the system clock, holding one empty default document.
    pub fn new(config: SessionConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Session<C> {
    /// Create a session on `clock`, holding one empty default document.
    pub fn with_clock(config: SessionConfig, clock: C) -> Self {
        let registry = Registry::new(
            DocumentId::from_string(config.default_document_id.clone()),
            config.default_document_name.clone(),
        );
        Self::from_registry(config, clock, registry)
    }

    fn from_registry(config: SessionConfig, clock: C, registry: Registry) -> Self {
        let capacity = config.event_capacity.clamp(1, MAX_EVENT_CAPACITY);
        let (event_tx, _) = broadcast::channel(capacity);
        let mut dirty = DirtyTracker::new();
        for doc in registry.iter() {
            dirty.refresh(doc);
        }

        Self {
            history: HistoryStore::new(config.max_history),
            scheduler: DebounceScheduler::new(config.debounce),
            config,
            clock,
            registry,
            dirty,
            event_tx,
        }
    }

    /// Get the session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the clock driving debounce windows.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Subscribe to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.event_tx.send(event);
    }

    fn emit_history(&self, id: &DocumentId) {
        self.emit(SessionEvent::HistoryChanged {
            id: id.clone(),
            can_undo: self.history.can_undo(id),
            can_redo: self.history.can_redo(id),
        });
    }

    fn refresh_dirty(&mut self, id: &DocumentId) {
        let Some(doc) = self.registry.get(id) else {
            return;
        };
        if let Some(dirty) = self.dirty.refresh(doc) {
            debug!(doc = %id, dirty, "dirty state changed");
            self.emit(SessionEvent::DirtyChanged {
                id: id.clone(),
                dirty,
            });
        }
    }

    // === Read views ===

    /// Documents in tab order.
    pub fn documents(&self) -> &[Document] {
        self.registry.documents()
    }

    /// The document being displayed and edited.
    pub fn active_doc(&self) -> &Document {
        self.registry.resolve_active()
    }

    /// Id of the active document.
    pub fn active_tab_id(&self) -> &DocumentId {
        self.registry.active_id()
    }

    /// Get a document by ID.
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.registry.get(id)
    }

    /// Get a document that must be open.
    pub fn document(&self, id: &DocumentId) -> Result<&Document> {
        self.registry
            .get(id)
            .ok_or_else(|| SessionError::DocumentNotFound(id.to_string()))
    }

    /// Whether the active document can undo.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo(self.active_tab_id())
    }

    /// Whether the active document can redo.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo(self.active_tab_id())
    }

    pub fn undo_depth(&self, id: &DocumentId) -> usize {
        self.history.undo_depth(id)
    }

    pub fn redo_depth(&self, id: &DocumentId) -> usize {
        self.history.redo_depth(id)
    }

    /// Whether edits to `id` are currently being folded into an open checkpoint.
    pub fn is_checkpoint_pending(&self, id: &DocumentId) -> bool {
        self.scheduler.is_pending(id, self.clock.now())
    }

    /// Whether any open document has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        !self.dirty.dirty_ids().is_empty()
    }

    /// Dirty flag as last published through [`SessionEvent::DirtyChanged`].
    pub fn is_document_dirty(&self, id: &DocumentId) -> bool {
        self.dirty.is_dirty(id)
    }

    /// Ids of documents with unsaved changes, sorted by id.
    pub fn dirty_document_ids(&self) -> Vec<DocumentId> {
        self.dirty.dirty_ids()
    }

    /// Documents with unsaved changes, in tab order.
    pub fn dirty_documents(&self) -> Vec<&Document> {
        self.registry.iter().filter(|doc| doc.is_dirty()).collect()
    }

    /// Find the document backed by exactly `path`.
    pub fn find_document_by_path(&self, path: &str) -> Option<&Document> {
        self.registry.find_by_path(path)
    }

    // === Document lifecycle ===

    /// Open a new document and make it active. Returns its id.
    ///
    /// If the id is already open, that document is activated instead.
    pub fn add_document(&mut self, new: NewDocument) -> DocumentId {
        let doc = Document::from_new(new, self.registry.default_name());
        self.insert_document(doc)
    }

    fn insert_document(&mut self, doc: Document) -> DocumentId {
        let id = doc.id.clone();
        let previous_active = self.active_tab_id().clone();

        if self.registry.insert(doc) {
            self.refresh_dirty(&id);
            self.emit(SessionEvent::DocumentAdded { id: id.clone() });
        }
        if previous_active != id {
            self.emit(SessionEvent::ActiveChanged { id: id.clone() });
        }
        id
    }

    /// Open a new empty document named "Untitled", "Untitled 2", ...
    pub fn new_untitled(&mut self) -> DocumentId {
        let name = self.next_untitled_name();
        self.add_document(NewDocument::new().name(name))
    }

    /// The first free untitled name.
    pub fn next_untitled_name(&self) -> String {
        let base = self.registry.default_name();
        let taken: HashSet<&str> = self.registry.iter().map(|doc| doc.name.as_str()).collect();

        if !taken.contains(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{base} {n}"))
            .find(|name| !taken.contains(name.as_str()))
            .unwrap_or_else(|| base.to_string())
    }

    /// Merge fields into an open document. Unknown ids are ignored.
    ///
    /// Neither the saved baseline nor the undo history is touched.
    pub fn update_existing_document(&mut self, id: &DocumentId, patch: DocumentPatch) -> bool {
        let content_changed = patch.content.is_some();
        if !self.registry.update(id, patch) {
            return false;
        }

        trace!(doc = %id, "document updated");
        if content_changed {
            self.emit(SessionEvent::ContentChanged { id: id.clone() });
        }
        self.refresh_dirty(id);
        true
    }

    /// Replace the active document's content, as on every keystroke.
    ///
    /// The first edit after a quiet period snapshots the previous content as
    /// an undo step; edits inside the debounce window fold into it. Text equal
    /// to the current content still counts as an edit: it can open a
    /// checkpoint and clear redo.
    pub fn update_content(&mut self, content: impl Into<String>) {
        let now = self.clock.now();
        let id = self.active_tab_id().clone();

        let decision = self.scheduler.on_edit(&id, now);
        if decision == CheckpointDecision::Open {
            let snapshot = self.registry.resolve_active().content.clone();
            self.history.push(&id, snapshot);
            debug!(doc = %id, depth = self.history.undo_depth(&id), "checkpoint opened");
        } else {
            trace!(doc = %id, "edit coalesced");
        }

        self.registry.resolve_active_mut().set_content(content);

        self.emit(SessionEvent::ContentChanged { id: id.clone() });
        if decision == CheckpointDecision::Open {
            self.emit_history(&id);
        }
        self.refresh_dirty(&id);
    }

    /// Close a tab, discarding its history and timer. Unknown ids are ignored.
    pub fn close_tab(&mut self, id: &DocumentId) -> bool {
        self.remove_document(id).is_some()
    }

    fn remove_document(&mut self, id: &DocumentId) -> Option<Document> {
        let closed = self.registry.close(id)?;

        self.history.drop_document(id);
        self.scheduler.cancel(id);
        self.dirty.forget(id);
        self.emit(SessionEvent::DocumentClosed { id: id.clone() });

        if let Some(replacement) = closed.replacement {
            self.refresh_dirty(&replacement);
            self.emit(SessionEvent::DocumentReplaced {
                closed: id.clone(),
                replacement,
            });
        }
        if closed.active_changed {
            self.emit(SessionEvent::ActiveChanged {
                id: self.active_tab_id().clone(),
            });
        }
        Some(closed.document)
    }

    /// Activate a tab. Unknown ids are ignored.
    pub fn set_active_tab_id(&mut self, id: &DocumentId) -> bool {
        if self.active_tab_id() == id {
            return self.registry.contains(id);
        }
        if !self.registry.set_active(id) {
            return false;
        }
        self.emit(SessionEvent::ActiveChanged { id: id.clone() });
        true
    }

    /// Move the tab at `from` to `to`.
    pub fn reorder_documents(&mut self, from: usize, to: usize) -> bool {
        if !self.registry.reorder(from, to) {
            return false;
        }
        self.emit(SessionEvent::Reordered { from, to });
        true
    }

    // === Persistence bookkeeping ===

    /// Record that the document's current content is on disk.
    pub fn mark_document_saved(&mut self, id: &DocumentId) -> bool {
        let Some(doc) = self.registry.get_mut(id) else {
            return false;
        };
        doc.mark_saved();
        debug!(doc = %id, "baseline advanced");
        self.refresh_dirty(id);
        true
    }

    /// Record a save to a new location: the document takes the new path and
    /// name, then its baseline advances.
    pub fn mark_document_saved_as(
        &mut self,
        id: &DocumentId,
        path: impl Into<String>,
        name: impl Into<String>,
    ) -> bool {
        let patch = DocumentPatch::new().name(name).file_path(Some(path.into()));
        if !self.registry.update(id, patch) {
            return false;
        }
        self.mark_document_saved(id)
    }

    /// Place a file read from disk.
    ///
    /// An already-open path is focused. An untouched empty active document
    /// is reused. Otherwise the file gets a new tab. The file's content is
    /// the saved baseline in every case.
    pub fn open_file(&mut self, file: OpenedFile) -> OpenOutcome {
        if let Some(existing) = self.registry.find_by_path(&file.path) {
            let id = existing.id.clone();
            self.set_active_tab_id(&id);
            debug!(doc = %id, path = %file.path, "file already open");
            return OpenOutcome::Focused(id);
        }

        if self.active_is_pristine() {
            let id = self.active_tab_id().clone();
            let patch = DocumentPatch::new()
                .name(file.name)
                .content(file.content)
                .file_path(Some(file.path));
            self.registry.update(&id, patch);
            self.scheduler.cancel(&id);
            self.mark_document_saved(&id);
            self.emit(SessionEvent::ContentChanged { id: id.clone() });
            debug!(doc = %id, "file opened into empty document");
            return OpenOutcome::Replaced(id);
        }

        let id = self.add_document(
            NewDocument::new()
                .name(file.name)
                .content(file.content)
                .file_path(file.path),
        );
        OpenOutcome::Added(id)
    }

    fn active_is_pristine(&self) -> bool {
        let doc = self.active_doc();
        doc.is_untitled()
            && doc.content.is_empty()
            && !doc.is_dirty()
            && !self.history.can_undo(&doc.id)
            && !self.history.can_redo(&doc.id)
    }

    // === History ===

    /// Undo the active document's last checkpoint. Returns whether anything
    /// changed.
    ///
    /// Any open debounce window is closed, so the next edit starts a new
    /// checkpoint and invalidates redo.
    pub fn undo(&mut self) -> bool {
        let id = self.active_tab_id().clone();
        self.scheduler.cancel(&id);

        let current = self.registry.resolve_active().content.clone();
        let Some(previous) = self.history.undo(&id, current) else {
            trace!(doc = %id, "nothing to undo");
            return false;
        };
        self.restore(&id, previous);
        debug!(doc = %id, depth = self.history.undo_depth(&id), "undo applied");
        true
    }

    /// Redo the active document's last undone checkpoint. Returns whether
    /// anything changed.
    pub fn redo(&mut self) -> bool {
        let id = self.active_tab_id().clone();
        self.scheduler.cancel(&id);

        let current = self.registry.resolve_active().content.clone();
        let Some(next) = self.history.redo(&id, current) else {
            trace!(doc = %id, "nothing to redo");
            return false;
        };
        self.restore(&id, next);
        debug!(doc = %id, depth = self.history.redo_depth(&id), "redo applied");
        true
    }

    fn restore(&mut self, id: &DocumentId, content: String) {
        self.registry.resolve_active_mut().set_content(content);
        self.emit(SessionEvent::ContentChanged { id: id.clone() });
        self.emit_history(id);
        self.refresh_dirty(id);
    }

    // === Timers ===

    /// When the earliest open debounce window closes. A host event loop can
    /// sleep until then and call [`Session::fire_due_timers`].
    pub fn next_timer_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Seal every debounce window whose deadline has passed.
    ///
    /// Windows are also checked against the clock on each edit, so calling
    /// this only matters to observers of [`SessionEvent::CheckpointSealed`].
    pub fn fire_due_timers(&mut self) -> Vec<DocumentId> {
        let sealed = self.scheduler.fire_due(self.clock.now());
        for id in &sealed {
            trace!(doc = %id, "checkpoint sealed");
            self.emit(SessionEvent::CheckpointSealed { id: id.clone() });
        }
        sealed
    }

    // === Cross-window transfer ===

    /// Take a document out of this session, e.g. to move it to another
    /// window. Its tab is closed and its history discarded.
    pub fn detach_document(&mut self, id: &DocumentId) -> Option<DocumentTransfer> {
        let document = self.remove_document(id)?;
        let transfer = DocumentTransfer::from_document(&document);
        debug!(doc = %id, "document detached");
        Some(transfer)
    }

    /// Receive a document detached from another session. Its unsaved state
    /// is preserved; its history starts empty.
    pub fn attach_document(&mut self, transfer: DocumentTransfer) -> Result<DocumentId> {
        if self.registry.contains(&transfer.id) {
            return Err(SessionError::DuplicateDocument(transfer.id.to_string()));
        }
        let id = self.insert_document(transfer.into_document());
        debug!(doc = %id, "document attached");
        Ok(id)
    }
}

impl<C: Clock> Drop for Session<C> {
    fn drop(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        trace!(cancelled, "session torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ManualClock;

    fn session() -> (Session<ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        (Session::with_clock(SessionConfig::default(), clock.clone()), clock)
    }

    #[test]
    fn test_session_starts_with_default_document() {
        let (session, _) = session();
        assert_eq!(session.documents().len(), 1);
        assert_eq!(session.active_tab_id(), &DocumentId::from("default"));
        assert_eq!(session.active_doc().name, "Untitled");
        assert!(!session.can_undo());
        assert!(!session.can_redo());
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn test_burst_is_one_undo_step() {
        let (mut session, clock) = session();
        for text in ["h", "he", "hel", "hell", "hello"] {
            session.update_content(text);
            clock.advance_ms(100);
        }

        assert_eq!(session.undo_depth(session.active_tab_id()), 1);
        assert!(session.undo());
        assert_eq!(session.active_doc().content, "");
        assert!(!session.undo());
    }

    #[test]
    fn test_undo_closes_open_window() {
        let (mut session, clock) = session();
        session.update_content("a");
        clock.advance_ms(50);
        session.update_content("ab");

        assert!(session.undo());
        assert_eq!(session.active_doc().content, "");
        assert!(session.can_redo());

        // Still inside the original window, but the edit opens a new step
        clock.advance_ms(50);
        session.update_content("x");
        assert!(!session.can_redo());
        assert!(session.can_undo());
    }

    #[test]
    fn test_next_untitled_name() {
        let (mut session, _) = session();
        assert_eq!(session.next_untitled_name(), "Untitled 2");

        session.new_untitled();
        assert_eq!(session.active_doc().name, "Untitled 2");
        assert_eq!(session.next_untitled_name(), "Untitled 3");

        session.close_tab(&DocumentId::from("default"));
        assert_eq!(session.next_untitled_name(), "Untitled");
    }

    #[test]
    fn test_open_file_reuses_pristine_document() {
        let (mut session, _) = session();
        let outcome = session.open_file(OpenedFile::new("a.md", "/a.md", "# A"));

        assert_eq!(outcome, OpenOutcome::Replaced(DocumentId::from("default")));
        assert_eq!(session.documents().len(), 1);
        assert_eq!(session.active_doc().content, "# A");
        assert!(!session.active_doc().is_dirty());
    }

    #[test]
    fn test_open_file_focuses_existing_path() {
        let (mut session, _) = session();
        session.update_content("scratch");
        let added = session.open_file(OpenedFile::new("a.md", "/a.md", "# A"));
        assert!(matches!(added, OpenOutcome::Added(_)));

        session.set_active_tab_id(&DocumentId::from("default"));
        let again = session.open_file(OpenedFile::new("a.md", "/a.md", "changed on disk"));

        assert_eq!(again, OpenOutcome::Focused(added.id().clone()));
        assert_eq!(session.active_tab_id(), added.id());
        assert_eq!(session.active_doc().content, "# A");
        assert_eq!(session.documents().len(), 2);
    }

    #[test]
    fn test_fire_due_timers() {
        let (mut session, clock) = session();
        let mut events = session.subscribe();
        session.update_content("a");

        assert!(session.fire_due_timers().is_empty());
        assert!(session.is_checkpoint_pending(&DocumentId::from("default")));

        clock.advance_ms(300);
        assert_eq!(session.fire_due_timers(), vec![DocumentId::from("default")]);
        assert!(!session.is_checkpoint_pending(&DocumentId::from("default")));

        let mut sealed = false;
        while let Ok(event) = events.try_recv() {
            sealed |= matches!(event, SessionEvent::CheckpointSealed { .. });
        }
        assert!(sealed);
    }

    #[test]
    fn test_strict_lookup() {
        let (session, _) = session();
        assert!(session.document(&DocumentId::from("default")).is_ok());
        assert_eq!(
            session.document(&DocumentId::from("nope")).unwrap_err(),
            SessionError::DocumentNotFound("nope".to_string())
        );
    }
}
