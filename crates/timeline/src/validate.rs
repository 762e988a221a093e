//! Pure invariant checks for clips and tracks.
//!
//! `validate_clip` and `validate_track` return the first violation as an
//! [`EditError`]; `validate_tracks` collects every problem as text, for
//! diagnostics on externally supplied timelines.

use std::collections::HashSet;

use nle_common::{EditError, EditResult, TIME_EPSILON};

use crate::clip::Clip;
use crate::track::Track;

fn invalid(clip: &Clip, reason: impl Into<String>) -> EditError {
    EditError::InvalidClip {
        clip_id: clip.id.clone(),
        reason: reason.into(),
    }
}

pub fn validate_clip(clip: &Clip) -> EditResult<()> {
    if clip.id.is_empty() {
        return Err(invalid(clip, "clip id is empty"));
    }
    let numbers = [
        clip.start_time,
        clip.end_time,
        clip.media_offset,
        clip.media_duration,
    ];
    if numbers.iter().any(|n| !n.is_finite()) {
        return Err(invalid(clip, "timing values must be finite"));
    }
    if clip.start_time < 0.0 {
        return Err(invalid(clip, "start_time is negative"));
    }
    if clip.start_time >= clip.end_time {
        return Err(invalid(clip, "start_time must be before end_time"));
    }
    if clip.media_offset < 0.0 {
        return Err(invalid(clip, "media_offset is negative"));
    }
    if clip.media_duration <= 0.0 {
        return Err(invalid(clip, "media_duration must be positive"));
    }
    if clip.duration() > clip.media_duration - clip.media_offset + TIME_EPSILON {
        return Err(invalid(
            clip,
            format!(
                "duration {:.3}s exceeds the {:.3}s of media after offset {:.3}s",
                clip.duration(),
                clip.media_duration - clip.media_offset,
                clip.media_offset
            ),
        ));
    }
    Ok(())
}

pub fn validate_track(track: &Track) -> EditResult<()> {
    let mut seen = HashSet::new();
    for clip in &track.clips {
        validate_clip(clip)?;
        if !track.accepts(clip.kind()) {
            return Err(EditError::IncompatibleTrack {
                clip: clip.kind(),
                track: track.kind,
            });
        }
        if !seen.insert(clip.id.as_str()) {
            return Err(EditError::DuplicateId {
                kind: "clip",
                id: clip.id.clone(),
            });
        }
    }
    Ok(())
}

/// Every invariant violation across `tracks`, one message each.
pub fn validate_tracks<'a>(tracks: impl IntoIterator<Item = &'a Track>) -> Vec<String> {
    let mut problems = Vec::new();
    let mut track_ids = HashSet::new();
    // Clip ids are unique across the whole timeline, not just per track.
    let mut clip_ids = HashSet::new();
    for track in tracks {
        if !track_ids.insert(track.id.as_str()) {
            problems.push(format!("Duplicate track id: {}", track.id));
        }
        if !track.is_sorted() {
            problems.push(format!("Track {} clips are not ordered by start time", track.id));
        }
        for clip in &track.clips {
            if let Err(err) = validate_clip(clip) {
                problems.push(format!("Track {}: {err}", track.id));
            }
            if !track.accepts(clip.kind()) {
                problems.push(format!(
                    "Track {}: {} clip {} on {} track",
                    track.id,
                    clip.kind(),
                    clip.id,
                    track.kind
                ));
            }
            if !clip_ids.insert(clip.id.as_str()) {
                problems.push(format!("Track {}: duplicate clip id {}", track.id, clip.id));
            }
        }
        for transition in &track.transitions {
            if track.clip(&transition.clip_a_id).is_none()
                || track.clip(&transition.clip_b_id).is_none()
            {
                problems.push(format!(
                    "Track {}: transition {} references a missing clip",
                    track.id, transition.id
                ));
            }
        }
    }
    problems
}
