//! Tracks: a typed lane of clips kept in start-time order.

use nle_common::MediaKind;
use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::transition::Transition;

fn visible_by_default() -> bool {
    true
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Ordered by `start_time`.
    #[serde(default)]
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub transitions: Vec<Transition>,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default = "visible_by_default")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_muted: bool,
    #[serde(default)]
    pub allow_overlap: bool,
}

/// The user-editable flags of a track, without its contents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackSettings {
    pub name: String,
    pub is_locked: bool,
    pub is_visible: bool,
    pub is_muted: bool,
    pub allow_overlap: bool,
}

/// Partial update for [`TrackSettings`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackPatch {
    pub name: Option<String>,
    pub is_locked: Option<bool>,
    pub is_visible: Option<bool>,
    pub is_muted: Option<bool>,
    pub allow_overlap: Option<bool>,
}

impl TrackPatch {
    pub fn apply_to(&self, settings: &TrackSettings) -> TrackSettings {
        TrackSettings {
            name: self.name.clone().unwrap_or_else(|| settings.name.clone()),
            is_locked: self.is_locked.unwrap_or(settings.is_locked),
            is_visible: self.is_visible.unwrap_or(settings.is_visible),
            is_muted: self.is_muted.unwrap_or(settings.is_muted),
            allow_overlap: self.allow_overlap.unwrap_or(settings.allow_overlap),
        }
    }
}

impl Track {
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            kind,
            clips: Vec::new(),
            transitions: Vec::new(),
            is_locked: false,
            is_visible: true,
            is_muted: false,
            allow_overlap: false,
        }
    }

    /// Replace the clips, sorting them by start time.
    pub fn with_clips(mut self, clips: Vec<Clip>) -> Self {
        self.clips = clips;
        self.sort_clips();
        self
    }

    pub fn accepts(&self, kind: MediaKind) -> bool {
        self.kind == kind
    }

    pub fn clip_index(&self, clip_id: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.id == clip_id)
    }

    pub fn clip(&self, clip_id: &str) -> Option<&Clip> {
        self.clips.iter().find(|c| c.id == clip_id)
    }

    pub fn transition_index(&self, transition_id: &str) -> Option<usize> {
        self.transitions.iter().position(|t| t.id == transition_id)
    }

    /// Index a clip starting at `start_time` should take to keep the order.
    /// Clips with an equal start stay in front of it.
    pub fn insertion_index(&self, start_time: f64) -> usize {
        self.clips.partition_point(|c| c.start_time <= start_time)
    }

    pub fn is_sorted(&self) -> bool {
        self.clips
            .windows(2)
            .all(|pair| pair[0].start_time <= pair[1].start_time)
    }

    /// Stable sort; clips with equal start keep their relative order.
    pub fn sort_clips(&mut self) {
        self.clips.sort_by(|a, b| a.start_time.total_cmp(&b.start_time));
    }

    /// End of the last clip, or 0 for an empty track.
    pub fn content_end(&self) -> f64 {
        self.clips.iter().map(|c| c.end_time).fold(0.0, f64::max)
    }

    pub fn settings(&self) -> TrackSettings {
        TrackSettings {
            name: self.name.clone(),
            is_locked: self.is_locked,
            is_visible: self.is_visible,
            is_muted: self.is_muted,
            allow_overlap: self.allow_overlap,
        }
    }

    pub fn apply_settings(&mut self, settings: TrackSettings) {
        self.name = settings.name;
        self.is_locked = settings.is_locked;
        self.is_visible = settings.is_visible;
        self.is_muted = settings.is_muted;
        self.allow_overlap = settings.allow_overlap;
    }
}
