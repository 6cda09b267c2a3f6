//! Dirty tracking for UI binding.
//!
//! The source of truth is always [`Document::is_dirty`]. This tracker only
//! remembers the last value published per document so that a change event
//! fires on transitions, not on every keystroke.

use folio_core::{Document, DocumentId};
use std::collections::HashMap;

#[derive(Clone, Debug, Default)]
pub struct DirtyTracker {
    published: HashMap<DocumentId, bool>,
}

impl DirtyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the flag for `doc`. Returns the new value if it changed
    /// since the last refresh; a document seen for the first time counts as
    /// previously clean.
    pub fn refresh(&mut self, doc: &Document) -> Option<bool> {
        let dirty = doc.is_dirty();
        let previous = self.published.insert(doc.id.clone(), dirty).unwrap_or(false);
        (previous != dirty).then_some(dirty)
    }

    /// The last published flag.
    pub fn is_dirty(&self, id: &DocumentId) -> bool {
        self.published.get(id).copied().unwrap_or(false)
    }

    /// Forget a closed document.
    pub fn forget(&mut self, id: &DocumentId) {
        self.published.remove(id);
    }

    /// Ids currently published as dirty, sorted.
    pub fn dirty_ids(&self) -> Vec<DocumentId> {
        let mut ids: Vec<DocumentId> = self
            .published
            .iter()
            .filter(|(_, dirty)| **dirty)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }
}
