//! Documents - the open text buffers of a session.
//!
//! A document carries its live content and a baseline: the last content
//! acknowledged as saved. Dirty state is never stored; it is always the
//! comparison of the two.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use ulid::{Generator, Ulid};

/// Unique identifier for a document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

fn generator() -> &'static Mutex<Generator> {
    static GENERATOR: OnceLock<Mutex<Generator>> = OnceLock::new();
    GENERATOR.get_or_init(|| Mutex::new(Generator::new()))
}

impl DocumentId {
    /// A fresh id derived from the current time.
    ///
    /// Ids are strictly increasing within the process.
    pub fn new() -> Self {
        // The generator only fails when the random part overflows inside
        // one millisecond; a plain ULID is still unique.
        let ulid = generator().lock().generate().unwrap_or_else(|_| Ulid::new());
        Self(ulid.to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for DocumentId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for DocumentId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// An open document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Document ID.
    pub id: DocumentId,
    /// Display label shown on the tab.
    pub name: String,
    /// Full current text.
    pub content: String,
    /// Backing file, if the document has ever been saved or opened from disk.
    /// Compared by exact string equality, never normalised.
    pub file_path: Option<String>,
    /// Last content acknowledged as saved.
    #[serde(rename = "last_saved_content")]
    baseline: String,
    /// Last time any field changed.
    pub modified_at: DateTime<Utc>,
}

impl Document {
    /// Create a document whose baseline is its initial content.
    pub fn new(
        id: DocumentId,
        name: impl Into<String>,
        content: impl Into<String>,
        file_path: Option<String>,
    ) -> Self {
        let content = content.into();

        Self {
            id,
            name: name.into(),
            baseline: content.clone(),
            content,
            file_path,
            modified_at: Utc::now(),
        }
    }

    /// Build a document from a creation descriptor, filling in defaults.
    pub fn from_new(new: NewDocument, default_name: &str) -> Self {
        Self::new(
            new.id.unwrap_or_default(),
            new.name.unwrap_or_else(|| default_name.to_string()),
            new.content.unwrap_or_default(),
            new.file_path,
        )
    }

    /// Replace the baseline, e.g. when a document moves between sessions
    /// with unsaved changes.
    pub fn with_baseline(mut self, baseline: impl Into<String>) -> Self {
        self.baseline = baseline.into();
        self
    }

    /// Whether the content differs from the last saved content.
    pub fn is_dirty(&self) -> bool {
        self.content != self.baseline
    }

    /// The last content acknowledged as saved.
    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    /// Whether the document has never been backed by a file.
    pub fn is_untitled(&self) -> bool {
        self.file_path.is_none()
    }

    /// Advance the baseline to the current content.
    pub fn mark_saved(&mut self) {
        self.baseline.clone_from(&self.content);
    }

    /// Replace the content. Returns whether it actually changed.
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        let content = content.into();
        if content == self.content {
            return false;
        }
        self.content = content;
        self.touch();
        true
    }

    /// Merge the fields present in `patch`. The baseline is left alone.
    pub fn apply(&mut self, patch: DocumentPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(file_path) = patch.file_path {
            self.file_path = file_path;
        }
        self.touch();
    }

    /// Touch the modified timestamp.
    pub fn touch(&mut self) {
        self.modified_at = Utc::now();
    }
}

/// Fields for creating a document; absent fields take defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NewDocument {
    pub id: Option<DocumentId>,
    pub name: Option<String>,
    pub content: Option<String>,
    pub file_path: Option<String>,
}

impl NewDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<DocumentId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn file_path(mut self, path: impl Into<String>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// A partial update; only `Some` fields are written.
///
/// `file_path: Some(None)` detaches the document from its file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub name: Option<String>,
    pub content: Option<String>,
    pub file_path: Option<Option<String>>,
}

impl DocumentPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn file_path(mut self, path: Option<String>) -> Self {
        self.file_path = Some(path);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.file_path.is_none()
    }
}

/// A file read from disk by the host, ready to become a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenedFile {
    pub name: String,
    pub path: String,
    pub content: String,
}

impl OpenedFile {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            content: content.into(),
        }
    }
}
