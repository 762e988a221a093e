//! Transitions between two adjacent clips on the same track.
//!
//! A transition is centred on the boundary between its clips: it begins half
//! its duration before `clip_a` ends and finishes half its duration after
//! `clip_b` starts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::clip::Clip;

/// Visual/audio style of a transition.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionType {
    #[default]
    Dissolve,
    Crossfade,
    Fade,
    Wipe,
    Slide,
    Zoom,
    Push,
}

/// A placed transition. `start_time`/`end_time` are derived from the clips.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransitionType,
    pub clip_a_id: String,
    pub clip_b_id: String,
    pub duration: f64,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
    pub start_time: f64,
    pub end_time: f64,
}

/// Request to create a transition. Placement is computed on insert.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: TransitionType,
    pub clip_a_id: String,
    pub clip_b_id: String,
    /// Falls back to the configured default when absent.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

/// Partial update for a transition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionPatch {
    #[serde(rename = "type")]
    pub kind: Option<TransitionType>,
    pub duration: Option<f64>,
    pub params: Option<BTreeMap<String, Value>>,
}

/// Default parameters: a direction for the directional styles.
pub fn default_params(kind: TransitionType) -> BTreeMap<String, Value> {
    let mut params = BTreeMap::new();
    if matches!(
        kind,
        TransitionType::Wipe | TransitionType::Slide | TransitionType::Push
    ) {
        params.insert("direction".to_string(), Value::from("right"));
    }
    params
}

/// True when `clip_b` starts within `tolerance` of `clip_a`'s end.
pub fn are_adjacent(clip_a: &Clip, clip_b: &Clip, tolerance: f64) -> bool {
    (clip_b.start_time - clip_a.end_time).abs() < tolerance
}

/// `(start_time, end_time)` of a transition centred on the clip boundary.
pub fn placement(clip_a: &Clip, clip_b: &Clip, duration: f64) -> (f64, f64) {
    let half = duration / 2.0;
    (clip_a.end_time - half, clip_b.start_time + half)
}

impl Transition {
    /// Build a placed transition; `duration` must already be clamped.
    pub fn place(spec: &TransitionSpec, clip_a: &Clip, clip_b: &Clip, duration: f64) -> Self {
        let (start_time, end_time) = placement(clip_a, clip_b, duration);
        let mut params = default_params(spec.kind);
        params.extend(spec.params.clone());
        Self {
            id: spec.id.clone(),
            kind: spec.kind,
            clip_a_id: spec.clip_a_id.clone(),
            clip_b_id: spec.clip_b_id.clone(),
            duration,
            params,
            start_time,
            end_time,
        }
    }

    pub fn references(&self, clip_id: &str) -> bool {
        self.clip_a_id == clip_id || self.clip_b_id == clip_id
    }

    /// Move the transition onto the boundary of its (possibly edited) clips.
    pub fn recentred(&self, clip_a: &Clip, clip_b: &Clip) -> Self {
        let (start_time, end_time) = placement(clip_a, clip_b, self.duration);
        Self {
            start_time,
            end_time,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipPayload;

    fn clip(id: &str, start: f64, end: f64) -> Clip {
        Clip::new(id, ClipPayload::video("a.mp4"), start, end)
    }

    #[test]
    fn adjacency_uses_tolerance() {
        let a = clip("a", 0.0, 2.0);
        assert!(are_adjacent(&a, &clip("b", 2.05, 4.0), 0.1));
        assert!(!are_adjacent(&a, &clip("b", 2.5, 4.0), 0.1));
    }

    #[test]
    fn placement_is_centred_on_boundary() {
        let a = clip("a", 0.0, 2.0);
        let b = clip("b", 2.0, 4.0);
        let (start, end) = placement(&a, &b, 1.0);
        assert!((start - 1.5).abs() < 1e-12);
        assert!((end - 2.5).abs() < 1e-12);
    }

    #[test]
    fn directional_styles_default_to_right() {
        let params = default_params(TransitionType::Wipe);
        assert_eq!(params.get("direction"), Some(&Value::from("right")));
        assert!(default_params(TransitionType::Dissolve).is_empty());
    }

    #[test]
    fn place_keeps_explicit_params() {
        let spec = TransitionSpec {
            id: "t1".into(),
            kind: TransitionType::Slide,
            clip_a_id: "a".into(),
            clip_b_id: "b".into(),
            duration: Some(2.0),
            params: BTreeMap::from([("direction".to_string(), Value::from("left"))]),
        };
        let t = Transition::place(&spec, &clip("a", 0.0, 3.0), &clip("b", 3.0, 6.0), 2.0);
        assert_eq!(t.params.get("direction"), Some(&Value::from("left")));
        assert!((t.start_time - 2.0).abs() < 1e-12);
        assert!((t.end_time - 4.0).abs() < 1e-12);
        assert!(t.references("b"));
    }
}
