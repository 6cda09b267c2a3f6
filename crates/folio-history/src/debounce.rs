//! Debounced checkpoint scheduling.
//!
//! Each document owns at most one armed deadline. An edit arriving with no
//! armed deadline (or after it passed) opens a checkpoint; an edit arriving
//! before it restarts the window and coalesces into the open checkpoint.
//!
//! Deadlines are plain instants compared against a caller-supplied `now`, so
//! a late "timer" can never act on a document that was closed: closing
//! removes the entry.

use folio_core::DocumentId;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::trace;

/// What an incoming edit should do to the undo history.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckpointDecision {
    /// Snapshot the pre-edit content as a new undo step.
    Open,
    /// Fold into the checkpoint already open.
    Coalesce,
}

/// Per-document debounce timers.
#[derive(Clone, Debug)]
pub struct DebounceScheduler {
    window: Duration,
    deadlines: HashMap<DocumentId, Instant>,
}

impl DebounceScheduler {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadlines: HashMap::new(),
        }
    }

    /// Register an edit at `now` and decide whether it opens a checkpoint.
    ///
    /// Either way the document's deadline becomes `now + window`.
    pub fn on_edit(&mut self, id: &DocumentId, now: Instant) -> CheckpointDecision {
        let decision = if self.is_pending(id, now) {
            CheckpointDecision::Coalesce
        } else {
            CheckpointDecision::Open
        };

        self.deadlines.insert(id.clone(), now + self.window);
        trace!(doc = %id, ?decision, "debounce armed");
        decision
    }

    /// Whether a debounce window is open for the document at `now`.
    ///
    /// A window is open strictly before its deadline; an edit landing exactly
    /// one window after the previous one starts a new checkpoint.
    pub fn is_pending(&self, id: &DocumentId, now: Instant) -> bool {
        self.deadlines
            .get(id)
            .map(|deadline| now < *deadline)
            .unwrap_or(false)
    }

    /// The earliest armed deadline across all documents.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.values().min().copied()
    }

    /// Fire every timer whose deadline has passed, returning the documents
    /// whose windows were sealed.
    pub fn fire_due(&mut self, now: Instant) -> Vec<DocumentId> {
        let mut due: Vec<DocumentId> = self
            .deadlines
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(id, _)| id.clone())
            .collect();
        due.sort();

        for id in &due {
            self.deadlines.remove(id);
        }
        due
    }

    /// Cancel a document's timer. Returns whether one was armed.
    pub fn cancel(&mut self, id: &DocumentId) -> bool {
        self.deadlines.remove(id).is_some()
    }

    /// Cancel every timer.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.deadlines.len();
        self.deadlines.clear();
        cancelled
    }
}
