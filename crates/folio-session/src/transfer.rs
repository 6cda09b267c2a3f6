//! Moving documents between sessions, e.g. dragging a tab into another window.
//!
//! A transfer carries the baseline along with the content so the receiving
//! session reports the same unsaved-changes state. Undo history stays behind.

use folio_core::{Document, DocumentId, Result};
use serde::{Deserialize, Serialize};

/// A serialisable snapshot of one document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTransfer {
    pub id: DocumentId,
    pub name: String,
    pub content: String,
    pub file_path: Option<String>,
    pub last_saved_content: String,
}

impl DocumentTransfer {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.id.clone(),
            name: doc.name.clone(),
            content: doc.content.clone(),
            file_path: doc.file_path.clone(),
            last_saved_content: doc.baseline().to_string(),
        }
    }

    /// Rebuild the document, keeping its baseline.
    pub fn into_document(self) -> Document {
        Document::new(self.id, self.name, self.content, self.file_path)
            .with_baseline(self.last_saved_content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
