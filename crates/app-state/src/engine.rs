//! One dispatch step: reduce, record history, resolve undo/redo.
//!
//! The returned state is a new `Arc` only when something observable changed.
//! Ignored and rejected actions hand back the input `Arc` itself, so callers
//! can detect a no-op with [`Arc::ptr_eq`].

use std::sync::Arc;

use nle_common::{Disposition, EditorConfig};

use crate::action::Action;
use crate::events::TimelineEvent;
use crate::history::{self, HistoryBatch, HistoryEntry, Replayed};
use crate::reducer::{reduce, Edit, Reduction};
use crate::state::TimelineState;

/// The state after a dispatch plus the events it produced.
#[derive(Clone, Debug)]
pub struct Dispatched {
    pub state: Arc<TimelineState>,
    pub events: Vec<TimelineEvent>,
}

impl Dispatched {
    fn quiet(state: Arc<TimelineState>) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }
}

/// Apply `action` to `state`.
///
/// Undoable edits are recorded into `batch` when one is open, otherwise
/// straight into the state's history.
pub fn dispatch(
    state: &Arc<TimelineState>,
    action: &Action,
    config: &EditorConfig,
    batch: Option<&mut HistoryBatch>,
) -> Dispatched {
    match action {
        Action::Undo => return replay(state, history::undo(state), "undo"),
        Action::Redo => return replay(state, history::redo(state), "redo"),
        _ => {}
    }

    match reduce(state, action, config) {
        Ok(Reduction::Unchanged) => Dispatched::quiet(clear_error(state)),
        Ok(Reduction::Updated(mut next)) => {
            next.error = None;
            Dispatched::quiet(Arc::new(next))
        }
        Ok(Reduction::Edited(edit)) => record(edit, config, batch),
        Err(err) => {
            match err.disposition() {
                Disposition::Ignored => {
                    tracing::debug!(action = action.name(), error = %err, "Action ignored");
                    Dispatched::quiet(Arc::clone(state))
                }
                Disposition::Rejected => {
                    tracing::warn!(action = action.name(), error = %err, "Action rejected");
                    Dispatched::quiet(Arc::clone(state))
                }
                Disposition::Recoverable => {
                    tracing::warn!(action = action.name(), error = %err, "Action failed");
                    let mut next = (**state).clone();
                    next.error = Some(err.to_string());
                    Dispatched::quiet(Arc::new(next))
                }
            }
        }
    }
}

fn record(edit: Edit, config: &EditorConfig, batch: Option<&mut HistoryBatch>) -> Dispatched {
    let Edit {
        mut state,
        patches,
        inverse_patches,
        description,
        events,
    } = edit;
    state.error = None;

    match batch {
        Some(batch) => {
            tracing::trace!(batch = batch.label(), description, "Edit folded into batch");
            batch.push(patches, inverse_patches);
        }
        None => state.history.record(
            HistoryEntry::new(description, patches, inverse_patches),
            config.max_history_entries,
        ),
    }

    Dispatched {
        state: Arc::new(state),
        events,
    }
}

fn replay(state: &Arc<TimelineState>, replayed: Option<Replayed>, what: &str) -> Dispatched {
    match replayed {
        Some(Replayed { state: next, event }) => Dispatched {
            state: Arc::new(next),
            events: vec![event],
        },
        None => {
            tracing::debug!(what, "Nothing to replay");
            Dispatched::quiet(Arc::clone(state))
        }
    }
}

/// A valid action clears a previously reported error, even if it changed
/// nothing else.
fn clear_error(state: &Arc<TimelineState>) -> Arc<TimelineState> {
    if state.error.is_none() {
        return Arc::clone(state);
    }
    let mut next = (**state).clone();
    next.error = None;
    Arc::new(next)
}
