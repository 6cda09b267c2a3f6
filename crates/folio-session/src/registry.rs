//! Document registry - the ordered tab strip and the active selection.
//!
//! Invariants:
//! - the registry is never empty
//! - ids are unique
//! - the active id always names a document in the registry

use folio_core::{Document, DocumentId, DocumentPatch};
use tracing::{debug, warn};

/// The result of closing a document.
#[derive(Clone, Debug)]
pub struct Closed {
    /// The document that was removed.
    pub document: Document,
    /// Id of the default document created because the closed one was the
    /// last. May equal the closed id.
    pub replacement: Option<DocumentId>,
    /// Whether the active selection moved.
    pub active_changed: bool,
}

/// The ordered collection of open documents.
#[derive(Clone, Debug)]
pub struct Registry {
    documents: Vec<Document>,
    active_id: DocumentId,
    default_id: DocumentId,
    default_name: String,
}

impl Registry {
    /// Create a registry holding a single empty default document.
    pub fn new(default_id: DocumentId, default_name: impl Into<String>) -> Self {
        let default_name = default_name.into();
        let initial = Document::new(default_id.clone(), default_name.clone(), "", None);
        Self {
            active_id: default_id.clone(),
            documents: vec![initial],
            default_id,
            default_name,
        }
    }

    /// The name given to documents created without one.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Append a document and make it active.
    ///
    /// An id already present is not duplicated: the existing document is
    /// activated and left unchanged. Returns whether the document was added.
    pub fn insert(&mut self, document: Document) -> bool {
        if self.contains(&document.id) {
            warn!(doc = %document.id, "document already open, focusing it instead");
            self.active_id = document.id;
            return false;
        }

        debug!(doc = %document.id, name = %document.name, "document added");
        self.active_id = document.id.clone();
        self.documents.push(document);
        true
    }

    /// Merge `patch` into the document with `id`. Unknown ids are ignored.
    pub fn update(&mut self, id: &DocumentId, patch: DocumentPatch) -> bool {
        match self.get_mut(id) {
            Some(doc) => {
                doc.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove the document with `id`.
    ///
    /// Closing the last document replaces it with a fresh default document.
    /// Closing the active document activates the last remaining one.
    pub fn close(&mut self, id: &DocumentId) -> Option<Closed> {
        let index = self.position(id)?;
        let document = self.documents.remove(index);
        let was_active = self.active_id == document.id;

        if self.documents.is_empty() {
            let replacement = Document::new(
                self.default_id.clone(),
                self.default_name.clone(),
                "",
                None,
            );
            let replacement_id = replacement.id.clone();
            self.documents.push(replacement);
            self.active_id = replacement_id.clone();
            debug!(doc = %document.id, replacement = %replacement_id, "last document closed");

            return Some(Closed {
                document,
                replacement: Some(replacement_id),
                active_changed: true,
            });
        }

        if was_active {
            if let Some(last) = self.documents.last() {
                self.active_id = last.id.clone();
            }
        }
        debug!(doc = %document.id, active = %self.active_id, "document closed");

        Some(Closed {
            document,
            replacement: None,
            active_changed: was_active,
        })
    }

    /// Activate the document with `id`. Unknown ids leave the selection alone.
    pub fn set_active(&mut self, id: &DocumentId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.active_id = id.clone();
        true
    }

    /// Move the document at `from` to `to`, shifting the others.
    ///
    /// `from` out of range is a no-op; `to` is clamped to the last index.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.documents.len() {
            return false;
        }
        let document = self.documents.remove(from);
        let to = to.min(self.documents.len());
        self.documents.insert(to, document);
        debug!(from, to, "documents reordered");
        true
    }

    /// Find the document backed by exactly `path`.
    pub fn find_by_path(&self, path: &str) -> Option<&Document> {
        self.documents
            .iter()
            .find(|doc| doc.file_path.as_deref() == Some(path))
    }

    /// The active document, falling back to the first if the id is stale.
    pub fn resolve_active(&self) -> &Document {
        self.documents
            .iter()
            .find(|doc| doc.id == self.active_id)
            .unwrap_or(&self.documents[0])
    }

    pub fn resolve_active_mut(&mut self) -> &mut Document {
        let index = self.position(&self.active_id).unwrap_or(0);
        &mut self.documents[index]
    }

    /// Id of the active document.
    pub fn active_id(&self) -> &DocumentId {
        &self.resolve_active().id
    }

    /// Get a document by ID.
    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.iter().find(|doc| &doc.id == id)
    }

    /// Get a mutable document by ID.
    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|doc| &doc.id == id)
    }

    /// Index of the document in tab order.
    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.documents.iter().position(|doc| &doc.id == id)
    }

    /// Check if a document exists.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.position(id).is_some()
    }

    /// Documents in tab order.
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> Document {
        Document::new(DocumentId::from(id), id, format!("content of {id}"), None)
    }

    fn registry_with(ids: &[&str]) -> Registry {
        let mut registry = Registry::new(DocumentId::from("default"), "Untitled");
        for id in ids {
            registry.insert(doc(id));
        }
        registry
    }

    fn order(registry: &Registry) -> Vec<&str> {
        registry.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_starts_with_default_document() {
        let registry = Registry::new(DocumentId::from("default"), "Untitled");
        assert_eq!(registry.documents().len(), 1);
        assert_eq!(registry.active_id(), &DocumentId::from("default"));
        assert_eq!(registry.resolve_active().name, "Untitled");
    }

    #[test]
    fn test_insert_activates() {
        let registry = registry_with(&["a", "b"]);
        assert_eq!(order(&registry), vec!["default", "a", "b"]);
        assert_eq!(registry.active_id(), &DocumentId::from("b"));
    }

    #[test]
    fn test_insert_duplicate_focuses_existing() {
        let mut registry = registry_with(&["a", "b"]);
        let mut dup = doc("a");
        dup.content = "other".to_string();

        assert!(!registry.insert(dup));
        assert_eq!(registry.documents().len(), 3);
        assert_eq!(registry.active_id(), &DocumentId::from("a"));
        assert_eq!(registry.get(&DocumentId::from("a")).unwrap().content, "content of a");
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let mut registry = registry_with(&["a"]);
        assert!(!registry.update(&DocumentId::from("zzz"), DocumentPatch::new().name("x")));
        assert!(registry.update(&DocumentId::from("a"), DocumentPatch::new().name("x")));
        assert_eq!(registry.get(&DocumentId::from("a")).unwrap().name, "x");
    }

    #[test]
    fn test_close_only_document_replaces_it() {
        let mut registry = Registry::new(DocumentId::from("default"), "Untitled");
        registry.update(
            &DocumentId::from("default"),
            DocumentPatch::new()
                .content("text")
                .file_path(Some("/a.md".to_string())),
        );

        let closed = registry.close(&DocumentId::from("default")).unwrap();
        assert_eq!(closed.replacement, Some(DocumentId::from("default")));
        assert_eq!(registry.documents().len(), 1);

        let active = registry.resolve_active();
        assert_eq!(active.id, "default");
        assert_eq!(active.content, "");
        assert_eq!(active.file_path, None);
        assert!(!active.is_dirty());
    }

    #[test]
    fn test_close_active_moves_to_last() {
        let mut registry = registry_with(&["a", "b", "c"]);
        registry.set_active(&DocumentId::from("a"));

        let closed = registry.close(&DocumentId::from("a")).unwrap();
        assert!(closed.active_changed);
        assert_eq!(registry.active_id(), &DocumentId::from("c"));
    }

    #[test]
    fn test_close_inactive_keeps_selection() {
        let mut registry = registry_with(&["a", "b", "c"]);
        registry.set_active(&DocumentId::from("b"));

        let closed = registry.close(&DocumentId::from("c")).unwrap();
        assert!(!closed.active_changed);
        assert_eq!(registry.active_id(), &DocumentId::from("b"));
        assert_eq!(order(&registry), vec!["default", "a", "b"]);
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let mut registry = registry_with(&["a"]);
        assert!(registry.close(&DocumentId::from("zzz")).is_none());
        assert_eq!(registry.documents().len(), 2);
    }

    #[test]
    fn test_set_active_unknown_is_noop() {
        let mut registry = registry_with(&["a"]);
        assert!(!registry.set_active(&DocumentId::from("zzz")));
        assert_eq!(registry.active_id(), &DocumentId::from("a"));
    }

    #[test]
    fn test_reorder_moves_element() {
        let mut registry = registry_with(&["a", "b", "c"]);
        assert!(registry.reorder(0, 2));
        assert_eq!(order(&registry), vec!["a", "b", "default", "c"]);

        assert!(registry.reorder(3, 0));
        assert_eq!(order(&registry), vec!["c", "a", "b", "default"]);

        assert!(!registry.reorder(4, 0));
        assert!(registry.reorder(0, 99));
        assert_eq!(order(&registry), vec!["a", "b", "default", "c"]);
    }

    #[test]
    fn test_reorder_keeps_active_id() {
        let mut registry = registry_with(&["a", "b"]);
        registry.reorder(2, 0);
        assert_eq!(registry.active_id(), &DocumentId::from("b"));
        assert_eq!(registry.position(&DocumentId::from("b")), Some(0));
    }

    #[test]
    fn test_find_by_path_is_exact() {
        let mut registry = registry_with(&["a"]);
        registry.update(
            &DocumentId::from("a"),
            DocumentPatch::new().file_path(Some("/docs/a.md".to_string())),
        );

        assert_eq!(registry.find_by_path("/docs/a.md").unwrap().id, "a");
        assert!(registry.find_by_path("/docs/a.md/").is_none());
        assert!(registry.find_by_path("a.md").is_none());
        assert!(registry.find_by_path("/docs/a").is_none());
        assert!(registry.find_by_path("").is_none());
    }

    #[test]
    fn test_resolve_active_falls_back_to_first() {
        let mut registry = registry_with(&["a"]);
        registry.active_id = DocumentId::from("stale");
        assert_eq!(registry.resolve_active().id, "default");
        assert_eq!(registry.resolve_active_mut().id, "default");
    }
}
