//! Clip, caption, and track selection state.

use serde::{Deserialize, Serialize};

use nle_timeline::Track;
use std::sync::Arc;

/// Which clips, caption segments, and track are currently selected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionState {
    selected_clip_ids: Vec<String>,
    selected_caption_ids: Vec<String>,
    selected_track_id: Option<String>,
}

impl SelectionState {
    /// Create a new empty selection state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clip selection, dropping duplicate ids.
    pub fn select_clips(&mut self, clip_ids: &[String]) {
        self.selected_clip_ids.clear();
        for id in clip_ids {
            if !self.selected_clip_ids.contains(id) {
                self.selected_clip_ids.push(id.clone());
            }
        }
    }

    /// Store the clip ids exactly as given. Used when replaying patches so the
    /// restored selection matches the recorded one.
    pub(crate) fn set_clip_ids(&mut self, clip_ids: Vec<String>) {
        self.selected_clip_ids = clip_ids;
    }

    pub fn select_captions(&mut self, caption_ids: &[String]) {
        self.selected_caption_ids.clear();
        for id in caption_ids {
            if !self.selected_caption_ids.contains(id) {
                self.selected_caption_ids.push(id.clone());
            }
        }
    }

    pub fn select_track(&mut self, track_id: Option<&str>) {
        self.selected_track_id = track_id.map(str::to_string);
    }

    pub fn clip_ids(&self) -> &[String] {
        &self.selected_clip_ids
    }

    pub fn caption_ids(&self) -> &[String] {
        &self.selected_caption_ids
    }

    pub fn track_id(&self) -> Option<&str> {
        self.selected_track_id.as_deref()
    }

    /// Make sure the clip selection points at something that exists.
    ///
    /// Ids of clips missing from `tracks` are dropped. If nothing survives,
    /// the first clip of the first track is selected (when there is one).
    pub fn ensure_clip_exists(&mut self, tracks: &[Arc<Track>]) {
        let exists = |id: &str| tracks.iter().any(|t| t.clip(id).is_some());
        self.selected_clip_ids.retain(|id| exists(id));
        if self.selected_clip_ids.is_empty() {
            if let Some(first) = tracks.first().and_then(|t| t.clips.first()) {
                tracing::debug!(clip_id = %first.id, "Selection fell back to first clip");
                self.selected_clip_ids.push(first.id.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nle_common::MediaKind;
    use nle_timeline::{Clip, ClipPayload};

    #[test]
    fn new_selection_is_empty() {
        let sel = SelectionState::new();
        assert!(sel.clip_ids().is_empty());
        assert!(sel.caption_ids().is_empty());
        assert!(sel.track_id().is_none());
    }

    #[test]
    fn select_clips_replaces_and_dedupes() {
        let mut sel = SelectionState::new();
        sel.select_clips(&["z".into()]);
        sel.select_clips(&["a".into(), "a".into(), "b".into()]);
        assert_eq!(sel.clip_ids(), ["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn captions_and_track_are_independent_of_clips() {
        let mut sel = SelectionState::new();
        sel.select_clips(&["a".into()]);
        sel.select_captions(&["cap".into(), "cap".into()]);
        sel.select_track(Some("t1"));
        assert_eq!(sel.caption_ids(), ["cap".to_string()]);
        assert_eq!(sel.track_id(), Some("t1"));
        assert_eq!(sel.clip_ids(), ["a".to_string()]);

        sel.select_track(None);
        assert!(sel.track_id().is_none());
    }

    #[test]
    fn missing_clips_fall_back_to_first_clip() {
        let track = Track::new("t1", MediaKind::Video).with_clips(vec![
            Clip::new("first", ClipPayload::video("a.mp4"), 0.0, 1.0),
            Clip::new("second", ClipPayload::video("a.mp4"), 1.0, 2.0),
        ]);
        let tracks = vec![Arc::new(track)];

        let mut sel = SelectionState::new();
        sel.select_clips(&["gone".into()]);
        sel.ensure_clip_exists(&tracks);
        assert_eq!(sel.clip_ids(), ["first".to_string()]);

        sel.select_clips(&["second".into()]);
        sel.ensure_clip_exists(&tracks);
        assert_eq!(sel.clip_ids(), ["second".to_string()]);
    }

    #[test]
    fn fallback_on_empty_timeline_leaves_selection_empty() {
        let mut sel = SelectionState::new();
        sel.select_clips(&["gone".into()]);
        sel.ensure_clip_exists(&[]);
        assert!(sel.clip_ids().is_empty());
    }
}
