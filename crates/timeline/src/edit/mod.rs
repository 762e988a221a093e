//! Non-destructive edit math.
//!
//! Every function here is pure: it takes clips by reference and returns new
//! clips. Source media fields (`media_duration`, `initial_bounds`) are only
//! ever copied, never recomputed from the timeline position, except when a
//! split freezes fresh bounds for its children.

pub mod moves;
pub mod ripple;
pub mod split;
pub mod trim;

pub use moves::move_clip;
pub use ripple::{following_clips, ripple_delete, ripple_shift, shift_clip};
pub use split::{split_child_ids, split_clip, SplitResult};
pub use trim::{trim_clip, TrimEdge, TrimOutcome, TrimRequest};
