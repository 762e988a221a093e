use nle_common::TIME_EPSILON;

use crate::clip::Clip;

/// Clips (other than `clip_id`) that start at or after `old_end`.
pub fn following_clips<'a>(clips: &'a [Clip], clip_id: &str, old_end: f64) -> Vec<&'a Clip> {
    clips
        .iter()
        .filter(|c| c.id != clip_id && c.start_time >= old_end - TIME_EPSILON)
        .collect()
}

/// Slide a clip along the timeline. Only `start_time`/`end_time` change.
pub fn shift_clip(clip: &Clip, delta: f64) -> Clip {
    let mut shifted = clip.clone();
    shifted.start_time += delta;
    shifted.end_time += delta;
    shifted
}

/// Shift every clip that follows `old_end` by `delta`, preserving the gaps
/// between them.
pub fn ripple_shift(clips: &[Clip], clip_id: &str, old_end: f64, delta: f64) -> Vec<Clip> {
    following_clips(clips, clip_id, old_end)
        .into_iter()
        .map(|c| shift_clip(c, delta))
        .collect()
}

/// Close the hole left by removing `removed`: every later clip moves earlier
/// by the removed clip's duration.
pub fn ripple_delete(clips: &[Clip], removed: &Clip) -> Vec<Clip> {
    ripple_shift(clips, &removed.id, removed.end_time, -removed.duration())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipPayload;

    fn clip(id: &str, start: f64, end: f64) -> Clip {
        Clip::new(id, ClipPayload::video("a.mp4"), start, end)
    }

    fn track_clips() -> Vec<Clip> {
        vec![clip("1", 0.0, 2.0), clip("2", 3.0, 5.0), clip("3", 6.0, 8.0)]
    }

    #[test]
    fn shifts_later_clips_and_keeps_gaps() {
        let shifted = ripple_shift(&track_clips(), "1", 2.0, 2.0);
        let spans: Vec<_> = shifted.iter().map(|c| (c.start_time, c.end_time)).collect();
        assert_eq!(spans, vec![(5.0, 7.0), (8.0, 10.0)]);
    }

    #[test]
    fn shift_keeps_media_fields() {
        let original = clip("x", 1.0, 2.0).with_media(3.0, 9.0);
        let moved = shift_clip(&original, 4.0);
        assert_eq!(moved.media_offset, 3.0);
        assert_eq!(moved.media_duration, 9.0);
        assert_eq!(moved.initial_bounds, original.initial_bounds);
    }

    #[test]
    fn earlier_clips_are_not_followers() {
        let clips = track_clips();
        let followers = following_clips(&clips, "2", 5.0);
        assert_eq!(followers.len(), 1);
        assert_eq!(followers[0].id, "3");
    }

    #[test]
    fn delete_pulls_followers_back() {
        let clips = track_clips();
        let shifted = ripple_delete(&clips, &clips[1]);
        assert_eq!(shifted.len(), 1);
        assert_eq!((shifted[0].start_time, shifted[0].end_time), (4.0, 6.0));
    }
}
