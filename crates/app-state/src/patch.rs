//! Typed edit operations and the transaction that records them.
//!
//! A [`Patch`] names one structural change by track id and position. Applying
//! a patch hands back its exact inverse, so the reducer never diffs states:
//! it builds the forward list and the inverse list side by side.

use std::sync::Arc;

use nle_timeline::{Clip, Marker, Track, TrackSettings, Transition};
use serde::{Deserialize, Serialize};

use crate::state::TimelineState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Patch {
    InsertTrack {
        index: usize,
        track: Track,
    },
    RemoveTrack {
        index: usize,
    },
    SetTrackSettings {
        track_id: String,
        settings: TrackSettings,
    },
    InsertClip {
        track_id: String,
        index: usize,
        clip: Clip,
    },
    RemoveClip {
        track_id: String,
        index: usize,
    },
    ReplaceClip {
        track_id: String,
        index: usize,
        clip: Clip,
    },
    InsertTransition {
        track_id: String,
        index: usize,
        transition: Transition,
    },
    RemoveTransition {
        track_id: String,
        index: usize,
    },
    ReplaceTransition {
        track_id: String,
        index: usize,
        transition: Transition,
    },
    InsertMarker {
        index: usize,
        marker: Marker,
    },
    RemoveMarker {
        index: usize,
    },
    ReplaceMarker {
        index: usize,
        marker: Marker,
    },
    SelectClips {
        clip_ids: Vec<String>,
    },
}

impl Patch {
    /// Apply to `state` and return the patch that undoes it.
    ///
    /// Returns `None` (leaving `state` untouched) when the target track or
    /// index does not exist.
    pub fn apply(&self, state: &mut TimelineState) -> Option<Patch> {
        match self {
            Patch::InsertTrack { index, track } => {
                let index = (*index).min(state.tracks.len());
                state.tracks.insert(index, Arc::new(track.clone()));
                Some(Patch::RemoveTrack { index })
            }
            Patch::RemoveTrack { index } => {
                if *index >= state.tracks.len() {
                    return None;
                }
                let track = state.tracks.remove(*index);
                Some(Patch::InsertTrack {
                    index: *index,
                    track: Arc::unwrap_or_clone(track),
                })
            }
            Patch::SetTrackSettings { track_id, settings } => {
                let track = state.track_mut(track_id)?;
                let previous = track.settings();
                track.apply_settings(settings.clone());
                Some(Patch::SetTrackSettings {
                    track_id: track_id.clone(),
                    settings: previous,
                })
            }
            Patch::InsertClip {
                track_id,
                index,
                clip,
            } => {
                let track = state.track_mut(track_id)?;
                let index = (*index).min(track.clips.len());
                track.clips.insert(index, clip.clone());
                Some(Patch::RemoveClip {
                    track_id: track_id.clone(),
                    index,
                })
            }
            Patch::RemoveClip { track_id, index } => {
                let track = state.track_mut(track_id)?;
                if *index >= track.clips.len() {
                    return None;
                }
                let clip = track.clips.remove(*index);
                Some(Patch::InsertClip {
                    track_id: track_id.clone(),
                    index: *index,
                    clip,
                })
            }
            Patch::ReplaceClip {
                track_id,
                index,
                clip,
            } => {
                let track = state.track_mut(track_id)?;
                let slot = track.clips.get_mut(*index)?;
                let previous = std::mem::replace(slot, clip.clone());
                Some(Patch::ReplaceClip {
                    track_id: track_id.clone(),
                    index: *index,
                    clip: previous,
                })
            }
            Patch::InsertTransition {
                track_id,
                index,
                transition,
            } => {
                let track = state.track_mut(track_id)?;
                let index = (*index).min(track.transitions.len());
                track.transitions.insert(index, transition.clone());
                Some(Patch::RemoveTransition {
                    track_id: track_id.clone(),
                    index,
                })
            }
            Patch::RemoveTransition { track_id, index } => {
                let track = state.track_mut(track_id)?;
                if *index >= track.transitions.len() {
                    return None;
                }
                let transition = track.transitions.remove(*index);
                Some(Patch::InsertTransition {
                    track_id: track_id.clone(),
                    index: *index,
                    transition,
                })
            }
            Patch::ReplaceTransition {
                track_id,
                index,
                transition,
            } => {
                let track = state.track_mut(track_id)?;
                let slot = track.transitions.get_mut(*index)?;
                let previous = std::mem::replace(slot, transition.clone());
                Some(Patch::ReplaceTransition {
                    track_id: track_id.clone(),
                    index: *index,
                    transition: previous,
                })
            }
            Patch::InsertMarker { index, marker } => {
                let index = (*index).min(state.markers.len());
                state.markers.insert(index, marker.clone());
                Some(Patch::RemoveMarker { index })
            }
            Patch::RemoveMarker { index } => {
                if *index >= state.markers.len() {
                    return None;
                }
                let marker = state.markers.remove(*index);
                Some(Patch::InsertMarker {
                    index: *index,
                    marker,
                })
            }
            Patch::ReplaceMarker { index, marker } => {
                let slot = state.markers.get_mut(*index)?;
                let previous = std::mem::replace(slot, marker.clone());
                Some(Patch::ReplaceMarker {
                    index: *index,
                    marker: previous,
                })
            }
            Patch::SelectClips { clip_ids } => {
                let previous = state.selection.clip_ids().to_vec();
                state.selection.set_clip_ids(clip_ids.clone());
                Some(Patch::SelectClips { clip_ids: previous })
            }
        }
    }
}

/// Apply `patches` in order, skipping any whose target is gone. Returns the
/// number skipped.
pub fn apply_all(state: &mut TimelineState, patches: &[Patch]) -> usize {
    let mut skipped = 0;
    for patch in patches {
        if patch.apply(state).is_none() {
            tracing::warn!(?patch, "Patch target missing, skipped");
            skipped += 1;
        }
    }
    skipped
}

/// A working copy of the state plus the patches applied to it so far.
pub struct Transaction {
    state: TimelineState,
    patches: Vec<Patch>,
    inverse: Vec<Patch>,
}

impl Transaction {
    pub fn new(base: &TimelineState) -> Self {
        Self {
            state: base.clone(),
            patches: Vec::new(),
            inverse: Vec::new(),
        }
    }

    /// The state with every patch so far applied.
    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    /// Apply and record one patch. Returns false if its target was missing.
    pub fn apply(&mut self, patch: Patch) -> bool {
        match patch.apply(&mut self.state) {
            Some(inverse) => {
                self.patches.push(patch);
                self.inverse.push(inverse);
                true
            }
            None => {
                tracing::warn!(?patch, "Patch target missing, skipped");
                false
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Consume the transaction: `(state, patches, inverse_patches)`, with the
    /// inverse list ordered to undo the last patch first.
    pub fn finish(self) -> (TimelineState, Vec<Patch>, Vec<Patch>) {
        let mut inverse = self.inverse;
        inverse.reverse();
        (self.state, self.patches, inverse)
    }
}
