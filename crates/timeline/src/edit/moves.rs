use nle_common::{EditError, EditResult};

use crate::clip::Clip;

/// Reposition a clip so it starts at `new_start` (clamped to zero), keeping
/// its duration and every source media field.
pub fn move_clip(clip: &Clip, new_start: f64) -> EditResult<Clip> {
    if !new_start.is_finite() {
        return Err(EditError::InvalidClip {
            clip_id: clip.id.clone(),
            reason: "new start time must be finite".to_string(),
        });
    }
    let start_time = new_start.max(0.0);
    let mut moved = clip.clone();
    moved.end_time = start_time + clip.duration();
    moved.start_time = start_time;
    Ok(moved)
}
