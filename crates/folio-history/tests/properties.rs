//! Property-based tests for history stacks and the debounce scheduler

use folio_core::DocumentId;
use folio_history::{CheckpointDecision, DebounceScheduler, History};
use proptest::prelude::*;
use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
enum Op {
    Push(String),
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z]{0,6}".prop_map(Op::Push),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

// ============================================================================
// History Property Tests
// ============================================================================

proptest! {
    #[test]
    fn undo_stack_respects_cap(
        cap in 1usize..20,
        ops in prop::collection::vec(op_strategy(), 0..80),
    ) {
        let mut history = History::new(cap);
        let mut current = String::new();

        for op in ops {
            match op {
                Op::Push(text) => {
                    history.push(std::mem::replace(&mut current, text));
                    prop_assert!(!history.can_redo());
                }
                Op::Undo => {
                    if let Some(previous) = history.undo(current.clone()) {
                        current = previous;
                    }
                }
                Op::Redo => {
                    if let Some(next) = history.redo(current.clone()) {
                        current = next;
                    }
                }
            }
            prop_assert!(history.undo_depth() <= cap);
        }
    }

    #[test]
    fn undo_then_redo_restores_content(
        snapshots in prop::collection::vec("[a-z]{0,6}", 1..30),
        current in "[a-z]{0,6}",
    ) {
        let mut history = History::default();
        for snapshot in snapshots {
            history.push(snapshot);
        }

        let depth = history.undo_depth();
        let restored = history.undo(current.clone());
        prop_assert!(restored.is_some());
        let back = history.redo(restored.unwrap_or_default());
        prop_assert_eq!(back, Some(current));
        prop_assert_eq!(history.undo_depth(), depth);
        prop_assert!(!history.can_redo());
    }
}

// ============================================================================
// Debounce Property Tests
// ============================================================================

proptest! {
    #[test]
    fn only_gaps_of_a_full_window_open_checkpoints(
        gaps in prop::collection::vec(0u64..600, 1..40),
    ) {
        let window = Duration::from_millis(300);
        let mut scheduler = DebounceScheduler::new(window);
        let id = DocumentId::from("doc");
        let mut now = Instant::now();

        prop_assert_eq!(scheduler.on_edit(&id, now), CheckpointDecision::Open);
        for gap in gaps {
            now += Duration::from_millis(gap);
            let expected = if gap >= 300 {
                CheckpointDecision::Open
            } else {
                CheckpointDecision::Coalesce
            };
            prop_assert_eq!(scheduler.on_edit(&id, now), expected);
        }
    }
}
