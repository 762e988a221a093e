//! Central error types for the editing engine (thiserror-based).

use thiserror::Error;

use crate::types::MediaKind;

/// How the reducer treats a failed edit.
///
/// Ignored and rejected edits hand back the previous state untouched.
/// Recoverable failures are surfaced to the caller through `state.error`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Target does not exist or the edit is geometrically impossible.
    Ignored,
    /// The edit touches a locked track.
    Rejected,
    /// Malformed input; reported on the state, never panics.
    Recoverable,
}

/// Edit failures produced while reducing an action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Track not found: {0}")]
    TrackNotFound(String),

    #[error("Clip not found: {0}")]
    ClipNotFound(String),

    #[error("Transition not found: {0}")]
    TransitionNotFound(String),

    #[error("Marker not found: {0}")]
    MarkerNotFound(String),

    #[error("Split time {time} is outside clip {clip_id} ({start}..{end})")]
    SplitOutOfBounds {
        clip_id: String,
        time: f64,
        start: f64,
        end: f64,
    },

    #[error("Clips {clip_a_id} and {clip_b_id} are not adjacent")]
    NotAdjacent { clip_a_id: String, clip_b_id: String },

    #[error("Track {0} is locked")]
    TrackLocked(String),

    #[error("Nothing to change for clip {0}")]
    EmptyTrim(String),

    #[error("Invalid clip {clip_id}: {reason}")]
    InvalidClip { clip_id: String, reason: String },

    #[error("Invalid timeline state: {0}")]
    InvalidState(String),

    #[error("Duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },

    #[error("Cannot place {clip:?} clip on {track:?} track")]
    IncompatibleTrack { clip: MediaKind, track: MediaKind },

    #[error("Unknown action type")]
    UnknownAction,
}

impl EditError {
    pub fn disposition(&self) -> Disposition {
        match self {
            EditError::TrackNotFound(_)
            | EditError::ClipNotFound(_)
            | EditError::TransitionNotFound(_)
            | EditError::MarkerNotFound(_)
            | EditError::SplitOutOfBounds { .. }
            | EditError::NotAdjacent { .. }
            | EditError::EmptyTrim(_) => Disposition::Ignored,
            EditError::TrackLocked(_) => Disposition::Rejected,
            EditError::InvalidClip { .. }
            | EditError::InvalidState(_)
            | EditError::DuplicateId { .. }
            | EditError::IncompatibleTrack { .. }
            | EditError::UnknownAction => Disposition::Recoverable,
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Convenience alias for edit results.
pub type EditResult<T> = Result<T, EditError>;
