//! The timeline state value produced by every dispatch.
//!
//! A `TimelineState` is never mutated once handed out. Tracks sit behind
//! `Arc` so a transition copies only the tracks it touches; everything else is
//! shared with the previous state.

use std::sync::Arc;

use nle_timeline::{validate_tracks, Clip, Marker, Track, Transition};
use serde::{Deserialize, Serialize};

use crate::history::HistoryState;
use crate::selection::SelectionState;
use crate::view::ViewState;

/// Central editing state: tracks, view, selection, markers, and history.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineState {
    /// All tracks, top of the list first.
    pub tracks: Vec<Arc<Track>>,
    /// Total timeline duration in seconds, as set by collaborators.
    pub duration: f64,
    pub view: ViewState,
    pub selection: SelectionState,
    pub markers: Vec<Marker>,
    pub history: HistoryState,
    /// Message of the last recoverable failure; cleared by the next
    /// successful action.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TimelineState {
    /// Create an empty timeline with default view settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Find a track by ID.
    pub fn find_track(&self, track_id: &str) -> Option<&Track> {
        self.tracks
            .iter()
            .map(|t| t.as_ref())
            .find(|t| t.id == track_id)
    }

    pub fn track_index(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    /// Mutable access to a track, copying it first if it is shared with
    /// another state.
    pub(crate) fn track_mut(&mut self, track_id: &str) -> Option<&mut Track> {
        self.tracks
            .iter_mut()
            .find(|t| t.id == track_id)
            .map(Arc::make_mut)
    }

    /// Find a clip across all tracks by clip ID.
    pub fn find_clip(&self, clip_id: &str) -> Option<(&Track, &Clip)> {
        self.tracks.iter().find_map(|track| {
            track.clip(clip_id).map(|clip| (track.as_ref(), clip))
        })
    }

    /// Find a transition across all tracks by ID.
    pub fn find_transition(&self, transition_id: &str) -> Option<(&Track, &Transition)> {
        self.tracks.iter().find_map(|track| {
            track
                .transitions
                .iter()
                .find(|t| t.id == transition_id)
                .map(|t| (track.as_ref(), t))
        })
    }

    pub fn marker_index(&self, marker_id: &str) -> Option<usize> {
        self.markers.iter().position(|m| m.id == marker_id)
    }

    /// Latest clip end across all tracks.
    pub fn content_end(&self) -> f64 {
        self.tracks
            .iter()
            .map(|t| t.content_end())
            .fold(0.0_f64, f64::max)
    }

    /// Total number of clips across all tracks.
    pub fn clip_count(&self) -> usize {
        self.tracks.iter().map(|t| t.clips.len()).sum()
    }

    /// Invariant violations across all tracks and the history log, one
    /// message each.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = validate_tracks(self.tracks.iter().map(|t| t.as_ref()));
        problems.extend(self.history.problems());
        problems
    }

    /// Deep copy with no track shared with `self`, every clip's `layer`
    /// defaulted to 0. History replay starts from this.
    pub fn normalized(&self) -> Self {
        let tracks = self
            .tracks
            .iter()
            .map(|track| {
                let mut track = Track::clone(track);
                for clip in &mut track.clips {
                    clip.layer.get_or_insert(0);
                }
                Arc::new(track)
            })
            .collect();
        Self {
            tracks,
            ..self.clone()
        }
    }
}
