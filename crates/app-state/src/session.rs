//! Editing session: owns the current state, the event bus and an open batch.

use std::sync::Arc;

use crossbeam::channel::Receiver;
use nle_common::EditorConfig;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::action::Action;
use crate::engine::{self, Dispatched};
use crate::events::{EventBus, TimelineEvent};
use crate::history::HistoryBatch;
use crate::state::TimelineState;

/// Single-writer owner of the timeline state.
pub struct TimelineSession {
    state: Arc<TimelineState>,
    config: EditorConfig,
    bus: EventBus,
    batch: Option<HistoryBatch>,
}

impl TimelineSession {
    pub fn new(config: EditorConfig) -> Self {
        Self::with_state(config, TimelineState::new())
    }

    pub fn with_state(config: EditorConfig, state: TimelineState) -> Self {
        Self {
            state: Arc::new(state),
            config,
            bus: EventBus::new(),
            batch: None,
        }
    }

    /// Current state. Cheap: shares the `Arc`.
    pub fn state(&self) -> Arc<TimelineState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Receive every event published after this call.
    pub fn subscribe(&mut self) -> Receiver<TimelineEvent> {
        self.bus.subscribe()
    }

    /// Apply one action and publish its events. Returns the new state.
    pub fn dispatch(&mut self, action: Action) -> Arc<TimelineState> {
        match action {
            Action::Undo | Action::Redo if self.batch.is_some() => {
                warn!("Ending stuck batch before undo");
                self.end_batch();
            }
            Action::SetState(_) | Action::ClearState => {
                if let Some(batch) = self.batch.take() {
                    warn!(batch = batch.label(), "Discarding open batch on state replacement");
                }
            }
            _ => {}
        }

        let Dispatched { state, events } =
            engine::dispatch(&self.state, &action, &self.config, self.batch.as_mut());
        if !Arc::ptr_eq(&state, &self.state) {
            debug!(action = action.name(), events = events.len(), "State updated");
        }
        self.state = state;
        self.bus.publish(&events);
        self.state()
    }

    /// Parse a wire-format action and dispatch it. A payload that does not
    /// parse is reported on `state.error`.
    pub fn dispatch_json(&mut self, value: serde_json::Value) -> Arc<TimelineState> {
        match Action::from_json(value) {
            Ok(action) => self.dispatch(action),
            Err(err) => {
                warn!(error = %err, "Malformed action");
                let mut next = (*self.state).clone();
                next.error = Some(format!("Malformed action: {err}"));
                self.state = Arc::new(next);
                self.state()
            }
        }
    }

    /// Fold the following undoable dispatches into one history entry.
    pub fn begin_batch(&mut self, label: impl Into<String>) {
        if let Some(open) = &self.batch {
            warn!(batch = open.label(), "Batch already open, ignoring nested begin");
            return;
        }
        let batch = HistoryBatch::new(label);
        debug!(batch = batch.label(), "Batch started");
        self.batch = Some(batch);
    }

    /// Close the open batch, recording it if anything changed.
    pub fn end_batch(&mut self) {
        let Some(batch) = self.batch.take() else {
            return;
        };
        debug!(batch = batch.label(), "Batch ended");
        if let Some(entry) = batch.into_entry() {
            let mut next = (*self.state).clone();
            next.history.record(entry, self.config.max_history_entries);
            self.state = Arc::new(next);
        }
    }

    pub fn is_batching(&self) -> bool {
        self.batch.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.state.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.history.can_redo()
    }
}

/// Shareable handle to a session, for callers on several threads.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<Mutex<TimelineSession>>,
}

impl SessionHandle {
    pub fn new(session: TimelineSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn state(&self) -> Arc<TimelineState> {
        self.inner.lock().state()
    }

    pub fn dispatch(&self, action: Action) -> Arc<TimelineState> {
        self.inner.lock().dispatch(action)
    }

    pub fn subscribe(&self) -> Receiver<TimelineEvent> {
        self.inner.lock().subscribe()
    }

    pub fn begin_batch(&self, label: impl Into<String>) {
        self.inner.lock().begin_batch(label);
    }

    pub fn end_batch(&self) {
        self.inner.lock().end_batch();
    }
}
