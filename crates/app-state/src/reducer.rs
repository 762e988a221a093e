//! The action reducer: `(state, action) -> next state`.
//!
//! [`reduce`] is pure. View actions produce an updated copy directly.
//! Structural edits run through an [`Editor`], which applies [`Patch`]es to a
//! [`Transaction`] so the forward and inverse patch lists fall out of the edit
//! itself. History recording and undo/redo live one layer up, in
//! [`crate::engine`].

use nle_common::{EditError, EditResult, EditorConfig};
use nle_timeline::edit::{self, SplitResult, TrimRequest};
use nle_timeline::transition::are_adjacent;
use nle_timeline::{
    validate_clip, validate_track, validate_tracks, Clip, ClipPatch, Marker, MarkerPatch, Track,
    TrackPatch, Transition, TransitionPatch, TransitionSpec,
};

use crate::action::Action;
use crate::events::{ClipSummary, TimelineEvent};
use crate::patch::{Patch, Transaction};
use crate::state::TimelineState;

/// Outcome of reducing one action.
#[derive(Debug)]
pub enum Reduction {
    /// Nothing changed; callers keep the previous state value.
    Unchanged,
    /// A view, selection, or whole-state change. Never recorded in history.
    Updated(TimelineState),
    /// A structural edit, recorded in history.
    Edited(Edit),
}

#[derive(Debug)]
pub struct Edit {
    pub state: TimelineState,
    pub patches: Vec<Patch>,
    pub inverse_patches: Vec<Patch>,
    pub description: &'static str,
    pub events: Vec<TimelineEvent>,
}

/// Compute the state that follows `action`.
///
/// UNDO and REDO report `Unchanged` here; they are resolved against the
/// history log by the engine.
pub fn reduce(
    state: &TimelineState,
    action: &Action,
    config: &EditorConfig,
) -> EditResult<Reduction> {
    match action {
        Action::SetCurrentTime(time) => Ok(update_view(state, |v| v.seek(*time))),
        Action::SetPlaying(playing) => Ok(update_view(state, |v| v.set_playing(*playing))),
        Action::SetScrollX(x) => Ok(update_view(state, |v| v.set_scroll(Some(*x), None))),
        Action::SetScrollY(y) => Ok(update_view(state, |v| v.set_scroll(None, Some(*y)))),
        Action::SetDragging {
            is_dragging,
            drag_origin,
        } => Ok(update_view(state, |v| v.set_dragging(*is_dragging, *drag_origin))),
        Action::SetZoom(zoom) => Ok(update_view(state, |v| v.set_zoom(*zoom, config))),
        Action::SetDuration(duration) => set_duration(state, *duration),
        Action::SelectClips { clip_ids } => {
            Ok(update_selection(state, |s| s.select_clips(clip_ids)))
        }
        Action::SelectCaptions { caption_ids } => {
            Ok(update_selection(state, |s| s.select_captions(caption_ids)))
        }
        Action::SelectTrack { track_id } => {
            Ok(update_selection(state, |s| s.select_track(track_id.as_deref())))
        }
        Action::SetState(next) => set_state(next),
        Action::ClearState => {
            tracing::debug!("Timeline state cleared");
            Ok(Reduction::Updated(TimelineState::new()))
        }
        Action::Undo | Action::Redo => Ok(Reduction::Unchanged),
        Action::Unknown => Err(EditError::UnknownAction),
        structural => {
            let description = structural
                .description()
                .ok_or(EditError::UnknownAction)?;
            let mut editor = Editor::new(state, config);
            editor.run(structural)?;
            Ok(editor.finish(description))
        }
    }
}

fn update_view(state: &TimelineState, f: impl FnOnce(&mut crate::view::ViewState)) -> Reduction {
    let mut view = state.view.clone();
    f(&mut view);
    if view == state.view {
        return Reduction::Unchanged;
    }
    Reduction::Updated(TimelineState {
        view,
        ..state.clone()
    })
}

fn update_selection(
    state: &TimelineState,
    f: impl FnOnce(&mut crate::selection::SelectionState),
) -> Reduction {
    let mut selection = state.selection.clone();
    f(&mut selection);
    if selection == state.selection {
        return Reduction::Unchanged;
    }
    Reduction::Updated(TimelineState {
        selection,
        ..state.clone()
    })
}

fn set_duration(state: &TimelineState, duration: f64) -> EditResult<Reduction> {
    if !duration.is_finite() {
        return Err(EditError::InvalidState(
            "duration must be finite".to_string(),
        ));
    }
    let duration = duration.max(0.0);
    if duration == state.duration {
        return Ok(Reduction::Unchanged);
    }
    Ok(Reduction::Updated(TimelineState {
        duration,
        ..state.clone()
    }))
}

fn set_state(next: &TimelineState) -> EditResult<Reduction> {
    let problems = next.validate();
    if !problems.is_empty() {
        return Err(EditError::InvalidState(problems.join("; ")));
    }
    tracing::debug!(
        tracks = next.tracks.len(),
        clips = next.clip_count(),
        "Timeline state replaced"
    );
    Ok(Reduction::Updated(next.clone()))
}

/// Applies one structural action to a transaction.
struct Editor<'a> {
    tx: Transaction,
    config: &'a EditorConfig,
    events: Vec<TimelineEvent>,
}

impl<'a> Editor<'a> {
    fn new(state: &TimelineState, config: &'a EditorConfig) -> Self {
        Self {
            tx: Transaction::new(state),
            config,
            events: Vec::new(),
        }
    }

    fn finish(self, description: &'static str) -> Reduction {
        if self.tx.is_empty() {
            return Reduction::Unchanged;
        }
        let (state, patches, inverse_patches) = self.tx.finish();
        tracing::debug!(
            description,
            patches = patches.len(),
            events = self.events.len(),
            "Edit applied"
        );
        Reduction::Edited(Edit {
            state,
            patches,
            inverse_patches,
            description,
            events: self.events,
        })
    }

    fn run(&mut self, action: &Action) -> EditResult<()> {
        match action {
            Action::AddTrack { track } => self.add_track(track),
            Action::UpdateTrack { track_id, updates } => self.update_track(track_id, updates),
            Action::RemoveTrack { track_id } => self.remove_track(track_id),
            Action::MoveTrack { track_id, to_index } => self.move_track(track_id, *to_index),
            Action::SetTracks(tracks) => self.set_tracks(tracks),
            Action::AddClip { track_id, clip } => self.add_clip(track_id, clip),
            Action::UpdateClip {
                track_id,
                clip_id,
                clip,
            } => self.update_clip(track_id, clip_id, clip),
            Action::RemoveClip {
                track_id,
                clip_id,
                ripple,
            } => self.remove_clip(track_id, clip_id, *ripple),
            Action::MoveClip {
                clip_id,
                from_track_id,
                to_track_id,
                new_start_time,
            } => self.move_clip(clip_id, from_track_id, to_track_id, *new_start_time),
            Action::SplitClip {
                track_id,
                clip_id,
                time,
            } => self.split_clip(track_id, clip_id, *time),
            Action::TrimClip {
                clip_id,
                start_time,
                end_time,
                ripple,
            } => {
                let request = TrimRequest {
                    start_time: *start_time,
                    end_time: *end_time,
                };
                self.trim_clip(clip_id, request, *ripple)
            }
            Action::AddTransition { transition } => self.add_transition(transition),
            Action::UpdateTransition {
                transition_id,
                params,
            } => self.update_transition(transition_id, params),
            Action::RemoveTransition { transition_id } => self.remove_transition(transition_id),
            Action::AddMarker { marker } => self.add_marker(marker),
            Action::UpdateMarker { marker_id, updates } => self.update_marker(marker_id, updates),
            Action::RemoveMarker { marker_id } => self.remove_marker(marker_id),
            other => {
                tracing::warn!(action = other.name(), "Action has no structural handler");
                Err(EditError::UnknownAction)
            }
        }
    }

    fn state(&self) -> &TimelineState {
        self.tx.state()
    }

    fn track(&self, track_id: &str) -> EditResult<&Track> {
        self.state()
            .find_track(track_id)
            .ok_or_else(|| EditError::TrackNotFound(track_id.to_string()))
    }

    /// Like [`Self::track`], but a locked track is an error.
    fn unlocked(&self, track_id: &str) -> EditResult<&Track> {
        let track = self.track(track_id)?;
        if track.is_locked {
            return Err(EditError::TrackLocked(track_id.to_string()));
        }
        Ok(track)
    }

    fn ensure_unique_clip_id(&self, clip_id: &str) -> EditResult<()> {
        if self.state().find_clip(clip_id).is_some() {
            return Err(EditError::DuplicateId {
                kind: "clip",
                id: clip_id.to_string(),
            });
        }
        Ok(())
    }

    /// Write `clip` into the track, keeping clips ordered by start time.
    ///
    /// An existing clip with the same id is replaced in place when the new
    /// start keeps the order, or removed and reinserted otherwise.
    fn put_clip(&mut self, track_id: &str, clip: Clip) -> EditResult<()> {
        let track = self.track(track_id)?;
        let Some(index) = track.clip_index(&clip.id) else {
            let index = track.insertion_index(clip.start_time);
            self.tx.apply(Patch::InsertClip {
                track_id: track_id.to_string(),
                index,
                clip,
            });
            return Ok(());
        };
        if track.clips[index] == clip {
            return Ok(());
        }
        let clips = &track.clips;
        let fits_before = index == 0 || clips[index - 1].start_time <= clip.start_time;
        let fits_after = index + 1 == clips.len() || clip.start_time <= clips[index + 1].start_time;

        if fits_before && fits_after {
            self.tx.apply(Patch::ReplaceClip {
                track_id: track_id.to_string(),
                index,
                clip,
            });
        } else {
            self.tx.apply(Patch::RemoveClip {
                track_id: track_id.to_string(),
                index,
            });
            let index = self.track(track_id)?.insertion_index(clip.start_time);
            self.tx.apply(Patch::InsertClip {
                track_id: track_id.to_string(),
                index,
                clip,
            });
        }
        Ok(())
    }

    /// Drop transitions whose clips are gone or no longer adjacent, and
    /// re-centre the rest on their clip boundary.
    fn reconcile_transitions(&mut self, track_id: &str) -> EditResult<()> {
        let tolerance = self.config.transition_adjacency_tolerance;
        let track = self.track(track_id)?;
        let mut patches = Vec::new();
        let mut removed = Vec::new();

        // Highest index first so removals never shift a pending index.
        for (index, transition) in track.transitions.iter().enumerate().rev() {
            match (
                track.clip(&transition.clip_a_id),
                track.clip(&transition.clip_b_id),
            ) {
                (Some(a), Some(b)) if are_adjacent(a, b, tolerance) => {
                    let placed = transition.recentred(a, b);
                    if placed != *transition {
                        patches.push(Patch::ReplaceTransition {
                            track_id: track_id.to_string(),
                            index,
                            transition: placed,
                        });
                    }
                }
                _ => {
                    patches.push(Patch::RemoveTransition {
                        track_id: track_id.to_string(),
                        index,
                    });
                    removed.push(transition_removed(track_id, transition));
                }
            }
        }

        for patch in patches {
            self.tx.apply(patch);
        }
        for event in removed {
            tracing::debug!(track_id, "Transition dropped after clip edit");
            self.events.push(event);
        }
        Ok(())
    }

    /// Remove `clip_ids` from the clip selection, if any are selected.
    fn deselect(&mut self, clip_ids: &[&str]) {
        let current = self.state().selection.clip_ids();
        if !current.iter().any(|id| clip_ids.contains(&id.as_str())) {
            return;
        }
        let kept = current
            .iter()
            .filter(|id| !clip_ids.contains(&id.as_str()))
            .cloned()
            .collect();
        self.tx.apply(Patch::SelectClips { clip_ids: kept });
    }

    fn add_track(&mut self, track: &Track) -> EditResult<()> {
        if self.state().find_track(&track.id).is_some() {
            return Err(EditError::DuplicateId {
                kind: "track",
                id: track.id.clone(),
            });
        }
        validate_track(track)?;
        for clip in &track.clips {
            self.ensure_unique_clip_id(&clip.id)?;
        }

        let mut track = track.clone();
        track.transitions.clear();
        track.sort_clips();
        track.clips.iter_mut().for_each(Clip::normalize);

        tracing::debug!(track_id = %track.id, kind = %track.kind, "Adding track");
        let index = self.state().tracks.len();
        self.tx.apply(Patch::InsertTrack { index, track });
        Ok(())
    }

    fn update_track(&mut self, track_id: &str, updates: &TrackPatch) -> EditResult<()> {
        let current = self.track(track_id)?.settings();
        let settings = updates.apply_to(&current);
        if settings != current {
            self.tx.apply(Patch::SetTrackSettings {
                track_id: track_id.to_string(),
                settings,
            });
        }
        Ok(())
    }

    fn remove_track(&mut self, track_id: &str) -> EditResult<()> {
        let track = self.unlocked(track_id)?;
        let clip_ids: Vec<String> = track.clips.iter().map(|c| c.id.clone()).collect();
        let index = self
            .state()
            .track_index(track_id)
            .ok_or_else(|| EditError::TrackNotFound(track_id.to_string()))?;

        tracing::debug!(track_id, clips = clip_ids.len(), "Removing track");
        self.tx.apply(Patch::RemoveTrack { index });
        let ids: Vec<&str> = clip_ids.iter().map(String::as_str).collect();
        self.deselect(&ids);
        Ok(())
    }

    /// Reordering only changes track order, so it is allowed on locked tracks.
    fn move_track(&mut self, track_id: &str, to_index: usize) -> EditResult<()> {
        let from = self
            .state()
            .track_index(track_id)
            .ok_or_else(|| EditError::TrackNotFound(track_id.to_string()))?;
        let to = to_index.min(self.state().tracks.len() - 1);
        if from == to {
            return Ok(());
        }
        let track = Track::clone(&self.state().tracks[from]);
        tracing::debug!(track_id, from, to, "Moving track");
        self.tx.apply(Patch::RemoveTrack { index: from });
        self.tx.apply(Patch::InsertTrack { index: to, track });
        Ok(())
    }

    fn set_tracks(&mut self, tracks: &[Track]) -> EditResult<()> {
        let problems = validate_tracks(tracks);
        if !problems.is_empty() {
            return Err(EditError::InvalidState(problems.join("; ")));
        }
        let unchanged = tracks.len() == self.state().tracks.len()
            && tracks
                .iter()
                .zip(&self.state().tracks)
                .all(|(next, current)| next == current.as_ref());
        if unchanged {
            return Ok(());
        }

        for index in (0..self.state().tracks.len()).rev() {
            self.tx.apply(Patch::RemoveTrack { index });
        }
        for (index, track) in tracks.iter().enumerate() {
            let mut track = track.clone();
            track.clips.iter_mut().for_each(Clip::normalize);
            self.tx.apply(Patch::InsertTrack { index, track });
        }
        for track in tracks {
            self.reconcile_transitions(&track.id)?;
        }

        let missing: Vec<String> = self
            .state()
            .selection
            .clip_ids()
            .iter()
            .filter(|id| self.state().find_clip(id).is_none())
            .cloned()
            .collect();
        let missing: Vec<&str> = missing.iter().map(String::as_str).collect();
        self.deselect(&missing);
        tracing::debug!(tracks = tracks.len(), "Tracks replaced");
        Ok(())
    }

    fn add_clip(&mut self, track_id: &str, clip: &Clip) -> EditResult<()> {
        let track = self.unlocked(track_id)?;
        if !track.accepts(clip.kind()) {
            return Err(EditError::IncompatibleTrack {
                clip: clip.kind(),
                track: track.kind,
            });
        }
        validate_clip(clip)?;
        let existing = track.clip_index(&clip.id);
        let elsewhere = self
            .state()
            .tracks
            .iter()
            .any(|t| t.id != track_id && t.clip(&clip.id).is_some());
        if elsewhere {
            return Err(EditError::DuplicateId {
                kind: "clip",
                id: clip.id.clone(),
            });
        }

        // Re-adding an id replaces the clip it names.
        if let Some(index) = existing {
            self.tx.apply(Patch::RemoveClip {
                track_id: track_id.to_string(),
                index,
            });
        }
        let mut clip = clip.clone();
        clip.normalize();
        self.put_clip(track_id, clip)?;
        self.reconcile_transitions(track_id)
    }

    fn update_clip(&mut self, track_id: &str, clip_id: &str, patch: &ClipPatch) -> EditResult<()> {
        let track = self.unlocked(track_id)?;
        let current = track
            .clip(clip_id)
            .ok_or_else(|| EditError::ClipNotFound(clip_id.to_string()))?;
        let next = patch.apply_to(current);
        if next == *current {
            return Ok(());
        }
        if !track.accepts(next.kind()) {
            return Err(EditError::IncompatibleTrack {
                clip: next.kind(),
                track: track.kind,
            });
        }
        validate_clip(&next)?;
        self.put_clip(track_id, next)?;
        self.reconcile_transitions(track_id)
    }

    fn remove_clip(&mut self, track_id: &str, clip_id: &str, ripple: bool) -> EditResult<()> {
        let track = self.unlocked(track_id)?;
        let index = track
            .clip_index(clip_id)
            .ok_or_else(|| EditError::ClipNotFound(clip_id.to_string()))?;
        let removed = &track.clips[index];
        let followers = if ripple {
            edit::ripple_delete(&track.clips, removed)
        } else {
            Vec::new()
        };

        self.tx.apply(Patch::RemoveClip {
            track_id: track_id.to_string(),
            index,
        });
        for clip in followers {
            self.put_clip(track_id, clip)?;
        }
        self.reconcile_transitions(track_id)?;
        self.deselect(&[clip_id]);
        Ok(())
    }

    fn move_clip(
        &mut self,
        clip_id: &str,
        from_track_id: &str,
        to_track_id: &str,
        new_start_time: f64,
    ) -> EditResult<()> {
        let source = self.track(from_track_id)?;
        let index = source
            .clip_index(clip_id)
            .ok_or_else(|| EditError::ClipNotFound(clip_id.to_string()))?;
        let clip = source.clips[index].clone();
        self.track(to_track_id)?;
        self.unlocked(from_track_id)?;
        let destination = self.unlocked(to_track_id)?;
        if !destination.accepts(clip.kind()) {
            return Err(EditError::IncompatibleTrack {
                clip: clip.kind(),
                track: destination.kind,
            });
        }

        let moved = edit::move_clip(&clip, new_start_time)?;
        if from_track_id == to_track_id {
            self.put_clip(from_track_id, moved)?;
            return self.reconcile_transitions(from_track_id);
        }

        self.tx.apply(Patch::RemoveClip {
            track_id: from_track_id.to_string(),
            index,
        });
        self.put_clip(to_track_id, moved)?;
        self.reconcile_transitions(from_track_id)?;
        self.reconcile_transitions(to_track_id)
    }

    fn split_clip(&mut self, track_id: &str, clip_id: &str, time: f64) -> EditResult<()> {
        let track = self.unlocked(track_id)?;
        let index = track
            .clip_index(clip_id)
            .ok_or_else(|| EditError::ClipNotFound(clip_id.to_string()))?;
        let parent = track.clips[index].clone();
        let SplitResult { first, second } = edit::split_clip(&parent, time)?;
        self.ensure_unique_clip_id(&first.id)?;
        self.ensure_unique_clip_id(&second.id)?;

        // The outgoing edge now leaves from the second half, the incoming
        // edge arrives at the first.
        let track = self.track(track_id)?;
        let retargeted: Vec<(usize, Transition)> = track
            .transitions
            .iter()
            .enumerate()
            .filter(|(_, t)| t.references(&parent.id))
            .map(|(index, t)| {
                let mut t = t.clone();
                if t.clip_a_id == parent.id {
                    t.clip_a_id = second.id.clone();
                }
                if t.clip_b_id == parent.id {
                    t.clip_b_id = first.id.clone();
                }
                (index, t)
            })
            .collect();

        self.tx.apply(Patch::RemoveClip {
            track_id: track_id.to_string(),
            index,
        });
        self.put_clip(track_id, first.clone())?;
        self.put_clip(track_id, second.clone())?;
        for (index, transition) in retargeted {
            self.tx.apply(Patch::ReplaceTransition {
                track_id: track_id.to_string(),
                index,
                transition,
            });
        }
        self.reconcile_transitions(track_id)?;
        self.tx.apply(Patch::SelectClips {
            clip_ids: vec![first.id.clone()],
        });

        tracing::debug!(track_id, clip_id, split_time = time, "Clip split");
        self.events.push(TimelineEvent::ClipSplit {
            track_id: track_id.to_string(),
            original_clip_id: parent.id,
            split_time: time,
            first_clip_id: first.id.clone(),
            second_clip_id: second.id.clone(),
            first: ClipSummary::from(&first),
            second: ClipSummary::from(&second),
        });
        Ok(())
    }

    fn trim_clip(&mut self, clip_id: &str, request: TrimRequest, ripple: bool) -> EditResult<()> {
        let (track, clip) = self
            .state()
            .find_clip(clip_id)
            .ok_or_else(|| EditError::ClipNotFound(clip_id.to_string()))?;
        let track_id = track.id.clone();
        if track.is_locked {
            return Err(EditError::TrackLocked(track_id));
        }

        let outcome = edit::trim_clip(clip, request, self.config.min_clip_duration)?;
        if outcome.clip == *clip {
            return Ok(());
        }
        let mut followers = if ripple && outcome.delta != 0.0 {
            edit::ripple_shift(&track.clips, clip_id, clip.end_time, outcome.delta)
        } else {
            Vec::new()
        };
        // Moving later: shift the last clip first so each lands in place.
        if outcome.delta > 0.0 {
            followers.reverse();
        }

        tracing::debug!(
            clip_id,
            edge = ?outcome.edge,
            delta = outcome.delta,
            rippled = followers.len(),
            "Clip trimmed"
        );
        self.put_clip(&track_id, outcome.clip)?;
        for follower in followers {
            self.put_clip(&track_id, follower)?;
        }
        self.reconcile_transitions(&track_id)
    }

    fn add_transition(&mut self, spec: &TransitionSpec) -> EditResult<()> {
        if self.state().find_transition(&spec.id).is_some() {
            return Err(EditError::DuplicateId {
                kind: "transition",
                id: spec.id.clone(),
            });
        }
        let track = self
            .state()
            .tracks
            .iter()
            .find(|t| t.clip(&spec.clip_a_id).is_some() && t.clip(&spec.clip_b_id).is_some())
            .ok_or_else(|| EditError::ClipNotFound(spec.clip_a_id.clone()))?;
        if track.is_locked {
            return Err(EditError::TrackLocked(track.id.clone()));
        }
        let pair = (track.clip(&spec.clip_a_id), track.clip(&spec.clip_b_id));
        let (Some(clip_a), Some(clip_b)) = pair else {
            return Err(EditError::ClipNotFound(spec.clip_a_id.clone()));
        };
        if !are_adjacent(clip_a, clip_b, self.config.transition_adjacency_tolerance) {
            return Err(EditError::NotAdjacent {
                clip_a_id: spec.clip_a_id.clone(),
                clip_b_id: spec.clip_b_id.clone(),
            });
        }

        let requested = spec.duration.unwrap_or(self.config.default_transition_duration);
        let duration = self.config.clamp_transition_duration(requested);
        let transition = Transition::place(spec, clip_a, clip_b, duration);
        let track_id = track.id.clone();
        let index = track.transitions.len();

        self.tx.apply(Patch::InsertTransition {
            track_id: track_id.clone(),
            index,
            transition: transition.clone(),
        });
        self.events.push(TimelineEvent::TransitionAdded {
            track_id,
            transition_id: transition.id.clone(),
            transition,
        });
        Ok(())
    }

    fn update_transition(
        &mut self,
        transition_id: &str,
        patch: &TransitionPatch,
    ) -> EditResult<()> {
        let (track, current) = self
            .state()
            .find_transition(transition_id)
            .ok_or_else(|| EditError::TransitionNotFound(transition_id.to_string()))?;
        if track.is_locked {
            return Err(EditError::TrackLocked(track.id.clone()));
        }

        let mut next = current.clone();
        if let Some(kind) = patch.kind {
            next.kind = kind;
        }
        if let Some(params) = &patch.params {
            next.params.extend(params.clone());
        }
        if let Some(duration) = patch.duration {
            next.duration = self.config.clamp_transition_duration(duration);
        }
        if next.duration != current.duration {
            next = match (track.clip(&next.clip_a_id), track.clip(&next.clip_b_id)) {
                (Some(a), Some(b)) => next.recentred(a, b),
                _ => {
                    let centre = (current.start_time + current.end_time) / 2.0;
                    let half = next.duration / 2.0;
                    Transition {
                        start_time: centre - half,
                        end_time: centre + half,
                        ..next
                    }
                }
            };
        }
        if next == *current {
            return Ok(());
        }

        let track_id = track.id.clone();
        let index = track
            .transition_index(transition_id)
            .ok_or_else(|| EditError::TransitionNotFound(transition_id.to_string()))?;
        let previous_duration = current.duration;
        self.tx.apply(Patch::ReplaceTransition {
            track_id: track_id.clone(),
            index,
            transition: next.clone(),
        });
        self.events.push(TimelineEvent::TransitionUpdated {
            track_id,
            transition_id: transition_id.to_string(),
            previous_duration,
            transition: next,
        });
        Ok(())
    }

    fn remove_transition(&mut self, transition_id: &str) -> EditResult<()> {
        let (track, transition) = self
            .state()
            .find_transition(transition_id)
            .ok_or_else(|| EditError::TransitionNotFound(transition_id.to_string()))?;
        if track.is_locked {
            return Err(EditError::TrackLocked(track.id.clone()));
        }
        let event = transition_removed(&track.id, transition);
        let track_id = track.id.clone();
        let index = track
            .transition_index(transition_id)
            .ok_or_else(|| EditError::TransitionNotFound(transition_id.to_string()))?;

        self.tx.apply(Patch::RemoveTransition { track_id, index });
        self.events.push(event);
        Ok(())
    }

    fn add_marker(&mut self, marker: &Marker) -> EditResult<()> {
        if self.state().marker_index(&marker.id).is_some() {
            return Err(EditError::DuplicateId {
                kind: "marker",
                id: marker.id.clone(),
            });
        }
        if !marker.time.is_finite() {
            return Err(EditError::InvalidState(format!(
                "marker {} time must be finite",
                marker.id
            )));
        }
        let marker = Marker {
            time: marker.time.max(0.0),
            ..marker.clone()
        };
        let index = self
            .state()
            .markers
            .partition_point(|m| m.time <= marker.time);
        self.tx.apply(Patch::InsertMarker { index, marker });
        Ok(())
    }

    fn update_marker(&mut self, marker_id: &str, updates: &MarkerPatch) -> EditResult<()> {
        let index = self
            .state()
            .marker_index(marker_id)
            .ok_or_else(|| EditError::MarkerNotFound(marker_id.to_string()))?;
        let current = &self.state().markers[index];
        if updates.time.is_some_and(|t| !t.is_finite()) {
            return Err(EditError::InvalidState(format!(
                "marker {marker_id} time must be finite"
            )));
        }
        let marker = updates.apply_to(current);
        if marker != *current {
            self.tx.apply(Patch::ReplaceMarker { index, marker });
        }
        Ok(())
    }

    fn remove_marker(&mut self, marker_id: &str) -> EditResult<()> {
        let index = self
            .state()
            .marker_index(marker_id)
            .ok_or_else(|| EditError::MarkerNotFound(marker_id.to_string()))?;
        self.tx.apply(Patch::RemoveMarker { index });
        Ok(())
    }
}

fn transition_removed(track_id: &str, transition: &Transition) -> TimelineEvent {
    TimelineEvent::TransitionRemoved {
        track_id: track_id.to_string(),
        transition_id: transition.id.clone(),
        clip_a_id: transition.clip_a_id.clone(),
        clip_b_id: transition.clip_b_id.clone(),
    }
}
