//! The action vocabulary accepted by `dispatch`.
//!
//! On the wire an action is `{"type": "SPLIT_CLIP", "payload": {...}}`.
//! Unrecognised types deserialize to [`Action::Unknown`], which the reducer
//! reports on `state.error` instead of failing.

use nle_timeline::{
    Clip, ClipPatch, Marker, MarkerPatch, Track, TrackPatch, TransitionPatch, TransitionSpec,
};
use serde::{Deserialize, Serialize};

use crate::state::TimelineState;
use crate::view::DragOrigin;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    // View and transport
    SetCurrentTime(f64),
    SetPlaying(bool),
    SetScrollX(f64),
    SetScrollY(f64),
    SetDragging {
        is_dragging: bool,
        #[serde(default)]
        drag_origin: Option<DragOrigin>,
    },
    SetZoom(f64),
    SetDuration(f64),

    // Selection
    SelectClips {
        clip_ids: Vec<String>,
    },
    SelectCaptions {
        caption_ids: Vec<String>,
    },
    SelectTrack {
        track_id: Option<String>,
    },

    // Whole-state replacement
    SetState(Box<TimelineState>),
    ClearState,

    // Tracks
    AddTrack {
        track: Track,
    },
    UpdateTrack {
        track_id: String,
        updates: TrackPatch,
    },
    RemoveTrack {
        track_id: String,
    },
    MoveTrack {
        track_id: String,
        /// Target position; past the end means last.
        to_index: usize,
    },
    /// Replace every track at once, keeping view, markers, and history.
    SetTracks(Vec<Track>),

    // Clips
    AddClip {
        track_id: String,
        clip: Clip,
    },
    UpdateClip {
        track_id: String,
        clip_id: String,
        clip: ClipPatch,
    },
    RemoveClip {
        track_id: String,
        clip_id: String,
        /// Close the gap by pulling later clips back.
        #[serde(default)]
        ripple: bool,
    },
    MoveClip {
        clip_id: String,
        from_track_id: String,
        to_track_id: String,
        new_start_time: f64,
    },
    SplitClip {
        track_id: String,
        clip_id: String,
        time: f64,
    },
    TrimClip {
        clip_id: String,
        #[serde(default)]
        start_time: Option<f64>,
        #[serde(default)]
        end_time: Option<f64>,
        #[serde(default)]
        ripple: bool,
    },

    // Transitions
    AddTransition {
        transition: TransitionSpec,
    },
    UpdateTransition {
        transition_id: String,
        #[serde(default)]
        params: TransitionPatch,
    },
    RemoveTransition {
        transition_id: String,
    },

    // Markers
    AddMarker {
        marker: Marker,
    },
    UpdateMarker {
        marker_id: String,
        updates: MarkerPatch,
    },
    RemoveMarker {
        marker_id: String,
    },

    // History
    Undo,
    Redo,

    #[serde(other)]
    Unknown,
}

impl Action {
    /// Parse a wire-format action.
    ///
    /// A type this build does not know still maps to [`Action::Unknown`]
    /// when it carries a payload, which the derived impl would reject.
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Action> {
        let tag = value.get("type").cloned();
        match serde_json::from_value(value) {
            Ok(action) => Ok(action),
            Err(err) => match tag {
                Some(tag) => match serde_json::from_value(serde_json::json!({ "type": tag })) {
                    Ok(Action::Unknown) => Ok(Action::Unknown),
                    _ => Err(err),
                },
                None => Err(err),
            },
        }
    }

    /// History label for undoable actions; `None` for everything else.
    pub fn description(&self) -> Option<&'static str> {
        let label = match self {
            Action::AddTrack { .. } => "Add track",
            Action::UpdateTrack { .. } => "Update track",
            Action::RemoveTrack { .. } => "Remove track",
            Action::MoveTrack { .. } => "Move track",
            Action::SetTracks(_) => "Set tracks",
            Action::AddClip { .. } => "Add clip",
            Action::UpdateClip { .. } => "Update clip",
            Action::RemoveClip { ripple: true, .. } => "Ripple delete",
            Action::RemoveClip { .. } => "Remove clip",
            Action::MoveClip { .. } => "Move clip",
            Action::SplitClip { .. } => "Split clip",
            Action::TrimClip { ripple: true, .. } => "Ripple trim",
            Action::TrimClip { .. } => "Trim clip",
            Action::AddTransition { .. } => "Add transition",
            Action::UpdateTransition { .. } => "Update transition",
            Action::RemoveTransition { .. } => "Remove transition",
            Action::AddMarker { .. } => "Add marker",
            Action::UpdateMarker { .. } => "Update marker",
            Action::RemoveMarker { .. } => "Remove marker",
            _ => return None,
        };
        Some(label)
    }

    /// Whether a successful dispatch of this action is recorded in history.
    pub fn is_undoable(&self) -> bool {
        self.description().is_some()
    }

    /// Wire name of the action type, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetCurrentTime(_) => "SET_CURRENT_TIME",
            Action::SetPlaying(_) => "SET_PLAYING",
            Action::SetScrollX(_) => "SET_SCROLL_X",
            Action::SetScrollY(_) => "SET_SCROLL_Y",
            Action::SetDragging { .. } => "SET_DRAGGING",
            Action::SetZoom(_) => "SET_ZOOM",
            Action::SetDuration(_) => "SET_DURATION",
            Action::SelectClips { .. } => "SELECT_CLIPS",
            Action::SelectCaptions { .. } => "SELECT_CAPTIONS",
            Action::SelectTrack { .. } => "SELECT_TRACK",
            Action::SetState(_) => "SET_STATE",
            Action::ClearState => "CLEAR_STATE",
            Action::AddTrack { .. } => "ADD_TRACK",
            Action::UpdateTrack { .. } => "UPDATE_TRACK",
            Action::RemoveTrack { .. } => "REMOVE_TRACK",
            Action::MoveTrack { .. } => "MOVE_TRACK",
            Action::SetTracks(_) => "SET_TRACKS",
            Action::AddClip { .. } => "ADD_CLIP",
            Action::UpdateClip { .. } => "UPDATE_CLIP",
            Action::RemoveClip { .. } => "REMOVE_CLIP",
            Action::MoveClip { .. } => "MOVE_CLIP",
            Action::SplitClip { .. } => "SPLIT_CLIP",
            Action::TrimClip { .. } => "TRIM_CLIP",
            Action::AddTransition { .. } => "ADD_TRANSITION",
            Action::UpdateTransition { .. } => "UPDATE_TRANSITION",
            Action::RemoveTransition { .. } => "REMOVE_TRANSITION",
            Action::AddMarker { .. } => "ADD_MARKER",
            Action::UpdateMarker { .. } => "UPDATE_MARKER",
            Action::RemoveMarker { .. } => "REMOVE_MARKER",
            Action::Undo => "UNDO",
            Action::Redo => "REDO",
            Action::Unknown => "UNKNOWN",
        }
    }
}
