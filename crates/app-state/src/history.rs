//! Patch-based undo/redo history.
//!
//! Each undoable action records one [`HistoryEntry`] holding the forward
//! patches that produced it and the inverse patches that take it back. The
//! log is linear:
//! - Recording a new entry after an undo discards the redo branch
//! - The oldest entries are evicted once the configured maximum is exceeded
//! - `current_index` points at the entry that produced the current state
//!
//! Undo and redo never touch the live state. They start from
//! [`TimelineState::normalized`] and replay patches onto that copy.
//!
//! # Usage
//!
//! ```ignore
//! let mut next = reduced_state;
//! next.history.record(HistoryEntry::new("Split clip", patches, inverse), 100);
//!
//! if let Some(undone) = undo(&next) {
//!     publish(undone.state);
//! }
//! ```

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::events::TimelineEvent;
use crate::patch::{apply_all, Patch};
use crate::state::TimelineState;

/// A single entry in the undo/redo history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Human-readable label describing the action (e.g., "Split clip").
    pub description: String,
    /// Milliseconds since the Unix epoch when the entry was recorded.
    pub timestamp: u64,
    pub patches: Vec<Patch>,
    pub inverse_patches: Vec<Patch>,
}

impl HistoryEntry {
    pub fn new(
        description: impl Into<String>,
        patches: Vec<Patch>,
        inverse_patches: Vec<Patch>,
    ) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            description: description.into(),
            timestamp,
            patches,
            inverse_patches,
        }
    }
}

/// The linear history log carried inside every [`TimelineState`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryState {
    entries: Vec<Arc<HistoryEntry>>,
    /// Index of the entry that produced the current state; `None` when empty.
    current_index: Option<usize>,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry after the current one.
    ///
    /// - Drops every entry after `current_index` (forking a new branch).
    /// - Evicts the oldest entries while more than `max_entries` remain.
    pub fn record(&mut self, entry: HistoryEntry, max_entries: usize) {
        let keep = self.current_index.map_or(0, |i| i + 1);
        let discarded = self.entries.len().saturating_sub(keep);
        self.entries.truncate(keep);

        let description = entry.description.clone();
        self.entries.push(Arc::new(entry));

        // Enforce max history size
        let max_entries = max_entries.max(1);
        if self.entries.len() > max_entries {
            let excess = self.entries.len() - max_entries;
            self.entries.drain(..excess);
        }
        self.current_index = Some(self.entries.len() - 1);

        tracing::debug!(
            description = %description,
            discarded,
            depth = self.entries.len(),
            "History entry recorded"
        );
    }

    pub fn entries(&self) -> &[Arc<HistoryEntry>] {
        &self.entries
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Undo needs an entry above the floor: the first entry is the baseline
    /// and is never reverted.
    pub fn can_undo(&self) -> bool {
        self.undo_entry().is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.next_index() < self.entries.len()
    }

    /// Label of the action that would be undone next.
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_entry().map(|(_, e)| e.description.as_str())
    }

    /// Label of the action that would be redone next.
    pub fn redo_label(&self) -> Option<&str> {
        self.entries
            .get(self.next_index())
            .map(|e| e.description.as_str())
    }

    /// Consistency problems in a log supplied from outside, e.g. by
    /// SET_STATE. Empty when the log is usable.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        match self.current_index {
            Some(i) if i >= self.entries.len() => problems.push(format!(
                "History index {i} is out of range for {} entries",
                self.entries.len()
            )),
            None if !self.entries.is_empty() => {
                problems.push("History has entries but no current index".to_string())
            }
            _ => {}
        }
        problems
    }

    fn undo_entry(&self) -> Option<(usize, &Arc<HistoryEntry>)> {
        let index = self.current_index.filter(|&i| i > 0)?;
        self.entries.get(index).map(|entry| (index, entry))
    }

    fn next_index(&self) -> usize {
        self.current_index.map_or(0, |i| i + 1)
    }
}

/// Result of a successful undo or redo.
#[derive(Clone, Debug)]
pub struct Replayed {
    pub state: TimelineState,
    pub event: TimelineEvent,
}

/// Revert the entry at `current_index`.
///
/// Returns `None` when there is nothing to undo. The returned state is built
/// from a normalized copy, so no track is shared with `state`.
pub fn undo(state: &TimelineState) -> Option<Replayed> {
    let (from_index, entry) = state.history.undo_entry()?;
    let entry = Arc::clone(entry);
    let to_index = from_index - 1;

    let mut next = state.normalized();
    let skipped = apply_all(&mut next, &entry.inverse_patches);
    next.selection.ensure_clip_exists(&next.tracks);
    next.history.current_index = Some(to_index);
    next.error = None;

    tracing::debug!(
        description = %entry.description,
        from_index,
        to_index,
        skipped,
        "Undo"
    );

    Some(Replayed {
        state: next,
        event: TimelineEvent::UndoComplete {
            from_index,
            to_index,
            description: entry.description.clone(),
        },
    })
}

/// Re-apply the entry after `current_index`. `None` at the tip of the log.
pub fn redo(state: &TimelineState) -> Option<Replayed> {
    let to_index = state.history.next_index();
    let entry = Arc::clone(state.history.entries.get(to_index)?);

    let mut next = state.normalized();
    let skipped = apply_all(&mut next, &entry.patches);
    next.selection.ensure_clip_exists(&next.tracks);
    next.history.current_index = Some(to_index);
    next.error = None;

    tracing::debug!(
        description = %entry.description,
        from_index = ?state.history.current_index,
        to_index,
        skipped,
        "Redo"
    );

    Some(Replayed {
        state: next,
        event: TimelineEvent::RedoComplete {
            from_index: state.history.current_index,
            to_index,
            description: entry.description.clone(),
        },
    })
}

/// Undoable dispatches collected between `begin_batch` and `end_batch`,
/// folded into a single history entry.
#[derive(Clone, Debug)]
pub struct HistoryBatch {
    label: String,
    patches: Vec<Patch>,
    inverse_patches: Vec<Patch>,
}

impl HistoryBatch {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            patches: Vec::new(),
            inverse_patches: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Fold one edit in. Its inverse runs before everything recorded so far.
    pub fn push(&mut self, patches: Vec<Patch>, inverse_patches: Vec<Patch>) {
        self.patches.extend(patches);
        let mut inverse = inverse_patches;
        inverse.append(&mut self.inverse_patches);
        self.inverse_patches = inverse;
    }

    /// `None` when nothing undoable happened during the batch.
    pub fn into_entry(self) -> Option<HistoryEntry> {
        if self.patches.is_empty() {
            return None;
        }
        Some(HistoryEntry::new(
            self.label,
            self.patches,
            self.inverse_patches,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nle_common::MediaKind;
    use nle_timeline::{Clip, ClipPayload, Track};

    fn make_entry(tag: &str) -> HistoryEntry {
        HistoryEntry::new(
            tag,
            vec![Patch::SelectClips {
                clip_ids: vec![format!("clip_{tag}")],
            }],
            vec![Patch::SelectClips { clip_ids: Vec::new() }],
        )
    }

    fn labels(h: &HistoryState) -> Vec<&str> {
        h.entries().iter().map(|e| e.description.as_str()).collect()
    }

    #[test]
    fn new_history_is_empty() {
        let h = HistoryState::new();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
        assert!(h.is_empty());
        assert_eq!(h.current_index(), None);
        assert!(h.undo_label().is_none());
        assert!(h.redo_label().is_none());
    }

    #[test]
    fn record_advances_index() {
        let mut h = HistoryState::new();
        h.record(make_entry("A"), 50);
        assert_eq!(h.current_index(), Some(0));
        assert!(!h.can_undo());

        h.record(make_entry("B"), 50);
        assert_eq!(h.current_index(), Some(1));
        assert!(h.can_undo());
        assert_eq!(h.undo_label(), Some("B"));
    }

    #[test]
    fn record_truncates_redo_branch() {
        let mut h = HistoryState::new();
        h.record(make_entry("A"), 50);
        h.record(make_entry("B"), 50);
        h.record(make_entry("C"), 50);
        h.current_index = Some(0);
        assert!(h.can_redo());
        assert_eq!(h.redo_label(), Some("B"));

        h.record(make_entry("D"), 50);
        assert_eq!(labels(&h), vec!["A", "D"]);
        assert!(!h.can_redo());
    }

    #[test]
    fn max_entries_enforced() {
        let mut h = HistoryState::new();
        for tag in ["A", "B", "C", "D"] {
            h.record(make_entry(tag), 3);
        }
        assert_eq!(labels(&h), vec!["B", "C", "D"]);
        assert_eq!(h.current_index(), Some(2));
    }

    #[test]
    fn batch_merges_inverse_in_reverse_order() {
        let mut batch = HistoryBatch::new("Drag clip");
        assert!(batch.is_empty());
        batch.push(
            vec![Patch::SelectClips { clip_ids: vec!["a".into()] }],
            vec![Patch::SelectClips { clip_ids: vec![] }],
        );
        batch.push(
            vec![Patch::SelectClips { clip_ids: vec!["b".into()] }],
            vec![Patch::SelectClips { clip_ids: vec!["a".into()] }],
        );
        let entry = batch.into_entry().unwrap();
        assert_eq!(entry.description, "Drag clip");
        assert_eq!(entry.patches.len(), 2);
        assert_eq!(
            entry.inverse_patches,
            vec![
                Patch::SelectClips { clip_ids: vec!["a".into()] },
                Patch::SelectClips { clip_ids: vec![] },
            ]
        );
    }

    #[test]
    fn empty_batch_records_nothing() {
        assert!(HistoryBatch::new("Nothing").into_entry().is_none());
    }

    #[test]
    fn out_of_range_index_is_reported_not_indexed() {
        let mut h = HistoryState::new();
        h.current_index = Some(3);
        assert_eq!(h.problems().len(), 1);
        assert!(!h.can_undo());
        assert!(h.undo_label().is_none());
        assert!(h.redo_label().is_none());

        let state = TimelineState {
            history: h,
            ..TimelineState::new()
        };
        assert!(undo(&state).is_none());
        assert!(redo(&state).is_none());
    }

    #[test]
    fn undo_at_floor_returns_none() {
        let mut state = TimelineState::new();
        state.history.record(make_entry("A"), 50);
        assert!(undo(&state).is_none());
    }

    #[test]
    fn redo_at_tip_returns_none() {
        let mut state = TimelineState::new();
        state.history.record(make_entry("A"), 50);
        assert!(redo(&state).is_none());
    }

    #[test]
    fn undo_then_redo_replays_patches() {
        let track = Track::new("t1", MediaKind::Video).with_clips(vec![
            Clip::new("a", ClipPayload::video("a.mp4"), 0.0, 1.0),
            Clip::new("b", ClipPayload::video("a.mp4"), 1.0, 2.0),
        ]);
        let mut state = TimelineState::new();
        state.tracks.push(Arc::new(track));
        state.history.record(make_entry("A"), 50);
        state.history.record(
            HistoryEntry::new(
                "Select b",
                vec![Patch::SelectClips { clip_ids: vec!["b".into()] }],
                vec![Patch::SelectClips { clip_ids: vec!["a".into()] }],
            ),
            50,
        );
        state.selection.select_clips(&["b".into()]);

        let undone = undo(&state).unwrap();
        assert_eq!(undone.state.selection.clip_ids(), ["a".to_string()]);
        assert_eq!(undone.state.history.current_index(), Some(0));
        match &undone.event {
            TimelineEvent::UndoComplete { from_index, to_index, description } => {
                assert_eq!((*from_index, *to_index), (1, 0));
                assert_eq!(description, "Select b");
            }
            other => panic!("unexpected event {other:?}"),
        }

        let redone = redo(&undone.state).unwrap();
        assert_eq!(redone.state.selection.clip_ids(), ["b".to_string()]);
        assert_eq!(redone.state.history.current_index(), Some(1));
    }
}
