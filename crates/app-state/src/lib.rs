//! `nle-app-state` -- Editing state management for the timeline engine.
//!
//! This crate provides:
//!
//! - **`TimelineState`**: Immutable state value holding tracks, view, selection,
//!   markers, and history.
//! - **`Action`** / **`reduce`**: The action vocabulary and the pure reducer that applies it.
//! - **`Patch`**: Typed structural edits whose application yields their own inverse.
//! - **`HistoryState`**: Patch-based undo/redo log with truncation and a size cap.
//! - **`TimelineSession`**: Single-writer owner that dispatches actions, batches
//!   history, and publishes events.
//!
//! # Architecture
//!
//! ```text
//! TimelineSession
//! ├── state: Arc<TimelineState>
//! │   ├── tracks: Vec<Arc<Track>>      (copy-on-write per track)
//! │   ├── view: ViewState              (playhead, zoom, scroll, drag)
//! │   ├── selection: SelectionState    (clips, captions, track)
//! │   ├── markers: Vec<Marker>
//! │   └── history: HistoryState        (entries of patches + inverse patches)
//! ├── bus: EventBus                    (crossbeam fan-out of TimelineEvent)
//! └── batch: Option<HistoryBatch>      (group several edits into one entry)
//!
//! dispatch(action)
//! └── engine::dispatch
//!     ├── UNDO / REDO  -> history::undo / history::redo
//!     └── otherwise    -> reducer::reduce -> record history -> publish events
//! ```

pub mod action;
pub mod engine;
pub mod events;
pub mod history;
pub mod patch;
pub mod reducer;
pub mod selection;
pub mod session;
pub mod state;
pub mod view;

// Re-export primary types at crate root for convenience.
pub use action::Action;
pub use engine::{dispatch, Dispatched};
pub use events::{ClipSummary, EventBus, TimelineEvent};
pub use history::{HistoryBatch, HistoryEntry, HistoryState};
pub use patch::{Patch, Transaction};
pub use reducer::{reduce, Edit, Reduction};
pub use selection::SelectionState;
pub use session::{SessionHandle, TimelineSession};
pub use state::TimelineState;
pub use view::{DragOrigin, ViewState};
