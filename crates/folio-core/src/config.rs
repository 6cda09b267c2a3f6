//! Session configuration.

use std::time::Duration;

/// Maximum number of undo checkpoints retained per document.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Quiet period after which the next edit opens a fresh checkpoint.
pub const DEBOUNCE_MS: u64 = 300;

/// Id given to the document a session starts with, and to the replacement
/// created when the last open document is closed.
pub const DEFAULT_DOCUMENT_ID: &str = "default";

/// Display name for new documents that do not carry one.
pub const DEFAULT_DOCUMENT_NAME: &str = "Untitled";

/// Largest event channel capacity a session will allocate.
pub const MAX_EVENT_CAPACITY: usize = 1 << 16;

/// Configuration for a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Undo checkpoints kept per document; the oldest is evicted beyond this.
    pub max_history: usize,
    /// Debounce window for coalescing edits into one checkpoint.
    pub debounce: Duration,
    /// Id of the default document.
    pub default_document_id: String,
    /// Name for documents created without one.
    pub default_document_name: String,
    /// Capacity of the session event channel, clamped to
    /// `1..=MAX_EVENT_CAPACITY` when the channel is created.
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history: MAX_HISTORY_SIZE,
            debounce: Duration::from_millis(DEBOUNCE_MS),
            default_document_id: DEFAULT_DOCUMENT_ID.to_string(),
            default_document_name: DEFAULT_DOCUMENT_NAME.to_string(),
            event_capacity: 100,
        }
    }
}

/// Builder for session configuration.
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    pub fn max_history(mut self, max: usize) -> Self {
        self.config.max_history = max;
        self
    }

    pub fn debounce(mut self, window: Duration) -> Self {
        self.config.debounce = window;
        self
    }

    pub fn debounce_ms(self, ms: u64) -> Self {
        self.debounce(Duration::from_millis(ms))
    }

    pub fn default_document_id(mut self, id: impl Into<String>) -> Self {
        self.config.default_document_id = id.into();
        self
    }

    pub fn default_document_name(mut self, name: impl Into<String>) -> Self {
        self.config.default_document_name = name.into();
        self
    }

    pub fn event_capacity(mut self, capacity: usize) -> Self {
        // broadcast channels reject a zero capacity
        self.config.event_capacity = capacity.clamp(1, MAX_EVENT_CAPACITY);
        self
    }

    pub fn build(self) -> SessionConfig {
        self.config
    }
}

impl Default for SessionConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.max_history, 100);
        assert_eq!(config.debounce, Duration::from_millis(300));
        assert_eq!(config.default_document_id, "default");
        assert_eq!(config.default_document_name, "Untitled");
    }

    #[test]
    fn test_builder() {
        let config = SessionConfigBuilder::new()
            .max_history(5)
            .debounce_ms(50)
            .default_document_id("d0")
            .default_document_name("New")
            .event_capacity(0)
            .build();

        assert_eq!(config.max_history, 5);
        assert_eq!(config.debounce, Duration::from_millis(50));
        assert_eq!(config.default_document_id, "d0");
        assert_eq!(config.default_document_name, "New");
        assert_eq!(config.event_capacity, 1);
    }

    #[test]
    fn test_builder_caps_event_capacity() {
        let config = SessionConfigBuilder::new().event_capacity(usize::MAX).build();
        assert_eq!(config.event_capacity, MAX_EVENT_CAPACITY);
    }
}
