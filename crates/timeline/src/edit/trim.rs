use nle_common::{EditError, EditResult};
use serde::{Deserialize, Serialize};

use crate::clip::Clip;

/// Requested edge positions. `None` leaves that edge where it is.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrimRequest {
    pub start_time: Option<f64>,
    pub end_time: Option<f64>,
}

/// Which edge a trim moved. Ripple shifts follow this edge.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimEdge {
    Start,
    End,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrimOutcome {
    pub clip: Clip,
    pub edge: TrimEdge,
    /// Signed movement of `edge`, after clamping.
    pub delta: f64,
}

/// Move a clip's edges, clamping to the available source media.
///
/// A start trim moves `media_offset` by the same amount as `start_time`. The
/// result keeps `start_time >= 0`, `media_offset >= 0` and
/// `media_offset + duration <= media_duration`, where `media_duration` is
/// taken from the clip's frozen bounds. `duration >= min_duration` holds
/// whenever the remaining source is long enough; the media bound wins
/// otherwise. `initial_bounds` is carried over untouched.
pub fn trim_clip(clip: &Clip, request: TrimRequest, min_duration: f64) -> EditResult<TrimOutcome> {
    if request.start_time.is_none() && request.end_time.is_none() {
        return Err(EditError::EmptyTrim(clip.id.clone()));
    }
    let requested = [request.start_time, request.end_time];
    if requested.iter().flatten().any(|t| !t.is_finite()) {
        return Err(EditError::InvalidClip {
            clip_id: clip.id.clone(),
            reason: "trim times must be finite".to_string(),
        });
    }

    let anchor = clip.anchor();
    let old_start = clip.start_time;
    let old_offset = clip.media_offset;
    let requested_end = request.end_time.unwrap_or(clip.end_time);

    // Earliest start is where the source begins, and never before zero.
    let start_time = request
        .start_time
        .unwrap_or(old_start)
        .min(requested_end - min_duration)
        .max(old_start - old_offset)
        .max(0.0);
    let media_offset = old_offset + (start_time - old_start);

    let media_end = start_time + (anchor.media_duration - media_offset);
    let end_time = requested_end.max(start_time + min_duration).min(media_end);

    let mut trimmed = clip.clone();
    trimmed.start_time = start_time;
    trimmed.end_time = end_time;
    trimmed.media_offset = media_offset;

    let (edge, delta) = if request.end_time.is_some() {
        (TrimEdge::End, end_time - clip.end_time)
    } else {
        (TrimEdge::Start, start_time - old_start)
    };

    Ok(TrimOutcome {
        clip: trimmed,
        edge,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipPayload;

    const MIN: f64 = 0.1;

    fn clip(start: f64, end: f64, offset: f64, media: f64) -> Clip {
        Clip::new("c", ClipPayload::video("a.mp4"), start, end).with_media(offset, media)
    }

    fn to_start(time: f64) -> TrimRequest {
        TrimRequest {
            start_time: Some(time),
            end_time: None,
        }
    }

    fn to_end(time: f64) -> TrimRequest {
        TrimRequest {
            start_time: None,
            end_time: Some(time),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn start_trim_moves_offset_with_start() {
        let c = clip(2.0, 6.0, 1.0, 10.0);
        let out = trim_clip(&c, to_start(3.0), MIN).unwrap();
        assert!(approx(out.clip.start_time, 3.0));
        assert!(approx(out.clip.media_offset, 2.0));
        assert!(approx(out.clip.end_time, 6.0));
        assert_eq!(out.edge, TrimEdge::Start);
        assert!(approx(out.delta, 1.0));
    }

    #[test]
    fn start_cannot_pass_source_beginning() {
        let c = clip(2.0, 6.0, 1.0, 10.0);
        let out = trim_clip(&c, to_start(0.0), MIN).unwrap();
        assert!(approx(out.clip.start_time, 1.0));
        assert!(approx(out.clip.media_offset, 0.0));
    }

    #[test]
    fn end_cannot_pass_source_end() {
        let c = clip(0.0, 2.0, 1.0, 5.0);
        let out = trim_clip(&c, to_end(9.0), MIN).unwrap();
        assert!(approx(out.clip.end_time, 4.0));
        assert!(approx(out.clip.media_end(), 5.0));
        assert!(approx(out.delta, 2.0));
    }

    #[test]
    fn clamps_to_minimum_duration() {
        let c = clip(0.0, 2.0, 0.0, 5.0);
        let out = trim_clip(&c, to_end(0.0), MIN).unwrap();
        assert!(approx(out.clip.duration(), MIN));

        let out = trim_clip(&c, to_start(5.0), MIN).unwrap();
        assert!(approx(out.clip.start_time, 1.9));
        assert!(approx(out.clip.duration(), MIN));
    }

    #[test]
    fn short_source_caps_minimum_duration() {
        let c = clip(0.0, 0.05, 0.0, 0.05);
        let out = trim_clip(&c, to_end(0.02), MIN).unwrap();
        assert!(approx(out.clip.end_time, 0.05));
        assert!(out.clip.media_end() <= out.clip.media_duration + 1e-9);

        let c = clip(1.0, 1.04, 0.0, 0.08);
        let out = trim_clip(&c, to_start(1.02), MIN).unwrap();
        assert!(approx(out.clip.start_time, 1.0));
        assert_eq!(out.clip.media_offset, 0.0);
        assert!(out.clip.media_end() <= out.clip.media_duration + 1e-9);
        assert!(out.clip.duration() > 0.0);
    }

    #[test]
    fn keeps_initial_bounds_and_media_duration() {
        let c = clip(1.0, 3.0, 0.5, 6.0);
        let both = TrimRequest {
            start_time: Some(1.5),
            end_time: Some(2.5),
        };
        let out = trim_clip(&c, both, MIN).unwrap();
        assert_eq!(out.clip.initial_bounds, c.initial_bounds);
        assert!(approx(out.clip.media_duration, 6.0));
        assert_eq!(out.edge, TrimEdge::End);
    }

    #[test]
    fn empty_request_is_an_error() {
        let c = clip(0.0, 2.0, 0.0, 5.0);
        assert!(matches!(
            trim_clip(&c, TrimRequest::default(), MIN),
            Err(EditError::EmptyTrim(_))
        ));
    }

    #[test]
    fn non_finite_request_is_invalid() {
        let c = clip(0.0, 2.0, 0.0, 5.0);
        let request = to_start(f64::NAN);
        assert!(matches!(
            trim_clip(&c, request, MIN),
            Err(EditError::InvalidClip { .. })
        ));
    }
}
