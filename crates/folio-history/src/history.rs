//! Snapshot history - bounded undo/redo stacks of full document content.
//!
//! Each entry is the complete text at some earlier point; nothing is diffed.
//! - Pushing a checkpoint clears the redo stack
//! - Undo and redo move snapshots between the stacks without clearing either
//! - The undo stack is capped; the oldest checkpoint is evicted first

use folio_core::{DocumentId, MAX_HISTORY_SIZE};
use std::collections::{HashMap, VecDeque};
use tracing::trace;

/// Undo/redo stacks for a single document.
#[derive(Clone, Debug)]
pub struct History {
    /// Earlier states, most recent last.
    past: VecDeque<String>,
    /// Undone states, most recent last.
    future: VecDeque<String>,
    /// Maximum number of undo checkpoints.
    max_history: usize,
}

impl History {
    /// Create an empty history with the given cap.
    pub fn new(max_history: usize) -> Self {
        Self {
            past: VecDeque::new(),
            future: VecDeque::new(),
            max_history,
        }
    }

    /// Record a checkpoint. Invalidates everything that could be redone.
    pub fn push(&mut self, snapshot: String) {
        self.past.push_back(snapshot);
        self.trim();
        self.future.clear();
    }

    /// Step back. `current` becomes redoable; returns the content to restore.
    pub fn undo(&mut self, current: String) -> Option<String> {
        let previous = self.past.pop_back()?;
        self.future.push_back(current);
        Some(previous)
    }

    /// Step forward again. The inverse of [`History::undo`]: the redo stack
    /// is not cleared.
    pub fn redo(&mut self, current: String) -> Option<String> {
        let next = self.future.pop_back()?;
        self.past.push_back(current);
        self.trim();
        Some(next)
    }

    /// Check if we can undo.
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    /// Check if we can redo.
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Get the undo stack size.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Get the redo stack size.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    fn trim(&mut self) {
        while self.past.len() > self.max_history {
            self.past.pop_front();
        }
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}

/// Histories for every open document, keyed by id.
///
/// A document without an entry behaves as if both stacks were empty.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    histories: HashMap<DocumentId, History>,
    max_history: usize,
}

impl HistoryStore {
    /// Create a store whose histories hold at most `max_history` checkpoints.
    pub fn new(max_history: usize) -> Self {
        Self {
            histories: HashMap::new(),
            max_history,
        }
    }

    fn for_document(&mut self, id: &DocumentId) -> &mut History {
        let max_history = self.max_history;
        self.histories
            .entry(id.clone())
            .or_insert_with(|| History::new(max_history))
    }

    /// Record a checkpoint for a document.
    pub fn push(&mut self, id: &DocumentId, snapshot: String) {
        let history = self.for_document(id);
        history.push(snapshot);
        trace!(doc = %id, depth = history.undo_depth(), "checkpoint pushed");
    }

    /// Undo for a document. `None` when there is nothing to undo.
    pub fn undo(&mut self, id: &DocumentId, current: String) -> Option<String> {
        self.histories.get_mut(id)?.undo(current)
    }

    /// Redo for a document. `None` when there is nothing to redo.
    pub fn redo(&mut self, id: &DocumentId, current: String) -> Option<String> {
        self.histories.get_mut(id)?.redo(current)
    }

    /// Check if we can undo for a document.
    pub fn can_undo(&self, id: &DocumentId) -> bool {
        self.histories.get(id).map(|h| h.can_undo()).unwrap_or(false)
    }

    /// Check if we can redo for a document.
    pub fn can_redo(&self, id: &DocumentId) -> bool {
        self.histories.get(id).map(|h| h.can_redo()).unwrap_or(false)
    }

    pub fn undo_depth(&self, id: &DocumentId) -> usize {
        self.histories.get(id).map(|h| h.undo_depth()).unwrap_or(0)
    }

    pub fn redo_depth(&self, id: &DocumentId) -> usize {
        self.histories.get(id).map(|h| h.redo_depth()).unwrap_or(0)
    }

    /// Discard a document's history entirely.
    pub fn drop_document(&mut self, id: &DocumentId) -> bool {
        self.histories.remove(id).is_some()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}
