use nle_common::{EditError, EditResult};

use crate::clip::Clip;

/// The two halves of a split clip, in timeline order.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitResult {
    pub first: Clip,
    pub second: Clip,
}

/// Child ids derive from the parent so a replayed split yields the same ids.
pub fn split_child_ids(parent_id: &str) -> (String, String) {
    (format!("{parent_id}-1"), format!("{parent_id}-2"))
}

/// Cut `clip` at timeline `time`.
///
/// `time` must fall strictly inside the clip. Both children keep the full
/// `media_duration`; the second child's `media_offset` advances by the length
/// of the first. Each child gets freshly frozen `initial_bounds`.
pub fn split_clip(clip: &Clip, time: f64) -> EditResult<SplitResult> {
    if !clip.range().contains_interior(time) {
        return Err(EditError::SplitOutOfBounds {
            clip_id: clip.id.clone(),
            time,
            start: clip.start_time,
            end: clip.end_time,
        });
    }

    let (first_id, second_id) = split_child_ids(&clip.id);
    let first_length = time - clip.start_time;

    let mut first = clip.clone();
    first.id = first_id;
    first.end_time = time;
    first.initial_bounds = Some(first.bounds());

    let mut second = clip.clone();
    second.id = second_id;
    second.start_time = time;
    second.media_offset = clip.media_offset + first_length;
    second.initial_bounds = Some(second.bounds());

    Ok(SplitResult { first, second })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipPayload;

    fn source_clip() -> Clip {
        Clip::new("clip", ClipPayload::video("a.mp4"), 1.0, 3.0).with_media(1.0, 5.0)
    }

    #[test]
    fn splits_window_and_keeps_media_duration() {
        let SplitResult { first, second } = split_clip(&source_clip(), 2.0).unwrap();

        assert_eq!(first.id, "clip-1");
        assert_eq!((first.start_time, first.end_time), (1.0, 2.0));
        assert!((first.media_offset - 1.0).abs() < 1e-12);
        assert!((first.media_duration - 5.0).abs() < 1e-12);

        assert_eq!(second.id, "clip-2");
        assert_eq!((second.start_time, second.end_time), (2.0, 3.0));
        assert!((second.media_offset - 2.0).abs() < 1e-12);
        assert!((second.media_duration - 5.0).abs() < 1e-12);
    }

    #[test]
    fn children_get_fresh_initial_bounds() {
        let SplitResult { first, second } = split_clip(&source_clip(), 2.5).unwrap();
        assert_eq!(first.initial_bounds, Some(first.bounds()));
        assert_eq!(second.initial_bounds, Some(second.bounds()));
    }

    #[test]
    fn halves_share_a_continuous_source_window() {
        let SplitResult { first, second } = split_clip(&source_clip(), 1.7).unwrap();
        assert!((first.media_end() - second.media_offset).abs() < 1e-9);
        assert!((first.duration() + second.duration() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_time_on_or_outside_edges() {
        for time in [1.0, 3.0, 0.5, 4.0] {
            let err = split_clip(&source_clip(), time).unwrap_err();
            assert!(matches!(err, EditError::SplitOutOfBounds { .. }));
        }
    }
}
