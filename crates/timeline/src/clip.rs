//! Clip model: shared timing fields plus a kind-specific payload.
//!
//! Timing is non-destructive. A clip shows the window
//! `[media_offset, media_offset + duration)` of a source that is
//! `media_duration` seconds long, and edits only ever move that window.

use std::collections::BTreeMap;

use nle_common::{MediaKind, TimeRange};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Frozen timing snapshot taken when a clip is created or split.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipBounds {
    pub start_time: f64,
    pub end_time: f64,
    pub media_offset: f64,
    pub media_duration: f64,
}

/// Positions within the source media where the visible window starts and ends.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Handles {
    pub start_position: f64,
    pub end_position: f64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D placement of a video clip in the frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub scale: f64,
    /// Degrees, clockwise.
    pub rotation: f64,
    pub position: Position,
    pub opacity: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation: 0.0,
            position: Position::default(),
            opacity: 1.0,
        }
    }
}

/// An effect attached to a clip. Parameters are opaque to the editor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// One timed caption segment, relative to the clip's source.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub id: String,
    pub text: String,
    pub start: f64,
    pub end: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,
}

fn unit_volume() -> f64 {
    1.0
}

/// Kind-specific clip data. Passed through edits untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClipPayload {
    Video {
        src: String,
        #[serde(default)]
        transform: Transform,
    },
    Audio {
        src: String,
        #[serde(default = "unit_volume")]
        volume: f64,
        #[serde(default)]
        is_muted: bool,
    },
    Caption {
        #[serde(default)]
        text: String,
        #[serde(default)]
        captions: Vec<CaptionSegment>,
    },
}

impl ClipPayload {
    pub fn video(src: impl Into<String>) -> Self {
        ClipPayload::Video {
            src: src.into(),
            transform: Transform::default(),
        }
    }

    pub fn audio(src: impl Into<String>) -> Self {
        ClipPayload::Audio {
            src: src.into(),
            volume: 1.0,
            is_muted: false,
        }
    }

    pub fn caption(text: impl Into<String>) -> Self {
        ClipPayload::Caption {
            text: text.into(),
            captions: Vec::new(),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            ClipPayload::Video { .. } => MediaKind::Video,
            ClipPayload::Audio { .. } => MediaKind::Audio,
            ClipPayload::Caption { .. } => MediaKind::Caption,
        }
    }
}

/// A clip placed on a track.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Timeline position in seconds.
    pub start_time: f64,
    pub end_time: f64,
    /// Seconds into the source where the visible window begins.
    #[serde(default)]
    pub media_offset: f64,
    /// Full length of the source. Never shrinks on trim.
    pub media_duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_bounds: Option<ClipBounds>,
    /// Z-order within the track. Normalized to 0 when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub effects: Vec<Effect>,
    #[serde(flatten)]
    pub payload: ClipPayload,
}

impl Clip {
    /// A clip showing its whole source from the beginning.
    pub fn new(
        id: impl Into<String>,
        payload: ClipPayload,
        start_time: f64,
        end_time: f64,
    ) -> Self {
        let id = id.into();
        let mut clip = Self {
            name: id.clone(),
            id,
            start_time,
            end_time,
            media_offset: 0.0,
            media_duration: end_time - start_time,
            initial_bounds: None,
            layer: Some(0),
            effects: Vec::new(),
            payload,
        };
        clip.initial_bounds = Some(clip.bounds());
        clip
    }

    /// Point the clip at a window of a longer source and refreeze its bounds.
    pub fn with_media(mut self, media_offset: f64, media_duration: f64) -> Self {
        self.media_offset = media_offset;
        self.media_duration = media_duration;
        self.initial_bounds = Some(self.bounds());
        self
    }

    pub fn kind(&self) -> MediaKind {
        self.payload.kind()
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    pub fn range(&self) -> TimeRange {
        TimeRange::new(self.start_time, self.end_time)
    }

    /// Source position just past the last visible frame.
    pub fn media_end(&self) -> f64 {
        self.media_offset + self.duration()
    }

    /// Derived from the current offset and duration; never stored.
    pub fn handles(&self) -> Handles {
        Handles {
            start_position: self.media_offset,
            end_position: self.media_end(),
        }
    }

    /// Current timing as a bounds record.
    pub fn bounds(&self) -> ClipBounds {
        ClipBounds {
            start_time: self.start_time,
            end_time: self.end_time,
            media_offset: self.media_offset,
            media_duration: self.media_duration,
        }
    }

    /// The bounds trims are measured against: the frozen snapshot if one
    /// exists, the current timing otherwise.
    pub fn anchor(&self) -> ClipBounds {
        self.initial_bounds.unwrap_or_else(|| self.bounds())
    }

    /// Fill in missing optional fields: `initial_bounds` and `layer`.
    pub fn normalize(&mut self) {
        if self.initial_bounds.is_none() {
            self.initial_bounds = Some(self.bounds());
        }
        if self.layer.is_none() {
            self.layer = Some(0);
        }
    }
}

/// Partial update for a clip. `None` fields are left unchanged.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipPatch {
    pub name: Option<String>,
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
    pub media_offset: Option<f64>,
    pub media_duration: Option<f64>,
    pub layer: Option<u32>,
    pub effects: Option<Vec<Effect>>,
    pub payload: Option<ClipPayload>,
}

impl ClipPatch {
    pub fn apply_to(&self, clip: &Clip) -> Clip {
        let mut next = clip.clone();
        if let Some(name) = &self.name {
            next.name = name.clone();
        }
        if let Some(start_time) = self.start_time {
            next.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            next.end_time = end_time;
        }
        if let Some(media_offset) = self.media_offset {
            next.media_offset = media_offset;
        }
        if let Some(media_duration) = self.media_duration {
            next.media_duration = media_duration;
        }
        if let Some(layer) = self.layer {
            next.layer = Some(layer);
        }
        if let Some(effects) = &self.effects {
            next.effects = effects.clone();
        }
        if let Some(payload) = &self.payload {
            next.payload = payload.clone();
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clip_covers_whole_source() {
        let clip = Clip::new("c1", ClipPayload::video("a.mp4"), 2.0, 5.0);
        assert_eq!(clip.media_offset, 0.0);
        assert!((clip.media_duration - 3.0).abs() < 1e-12);
        assert_eq!(clip.initial_bounds, Some(clip.bounds()));
        assert_eq!(clip.kind(), MediaKind::Video);
    }

    #[test]
    fn handles_follow_offset_and_duration() {
        let clip = Clip::new("c1", ClipPayload::audio("a.wav"), 1.0, 3.0).with_media(1.5, 10.0);
        let handles = clip.handles();
        assert!((handles.start_position - 1.5).abs() < 1e-12);
        assert!((handles.end_position - 3.5).abs() < 1e-12);
    }

    #[test]
    fn normalize_fills_layer_and_bounds() {
        let mut clip = Clip::new("c1", ClipPayload::caption("hi"), 0.0, 1.0);
        clip.layer = None;
        clip.initial_bounds = None;
        clip.normalize();
        assert_eq!(clip.layer, Some(0));
        assert_eq!(clip.initial_bounds, Some(clip.bounds()));
    }

    #[test]
    fn deserializes_flat_tagged_json() {
        let json = r#"{
            "id": "v1",
            "type": "video",
            "src": "clip.mp4",
            "start_time": 0.0,
            "end_time": 4.0,
            "media_duration": 10.0
        }"#;
        let clip: Clip = serde_json::from_str(json).unwrap();
        assert_eq!(clip.kind(), MediaKind::Video);
        assert_eq!(clip.layer, None);
        assert!(clip.initial_bounds.is_none());
        match &clip.payload {
            ClipPayload::Video { src, transform } => {
                assert_eq!(src, "clip.mp4");
                assert_eq!(transform, &Transform::default());
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn patch_leaves_unset_fields_alone() {
        let clip = Clip::new("c1", ClipPayload::video("a.mp4"), 0.0, 2.0).with_media(0.0, 8.0);
        let patch = ClipPatch {
            name: Some("Intro".into()),
            end_time: Some(3.0),
            ..ClipPatch::default()
        };
        let next = patch.apply_to(&clip);
        assert_eq!(next.name, "Intro");
        assert!((next.end_time - 3.0).abs() < 1e-12);
        assert_eq!(next.start_time, clip.start_time);
        assert_eq!(next.payload, clip.payload);
    }
}
