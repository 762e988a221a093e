//! `nle-timeline` -- Timeline data model and non-destructive edit math.
//!
//! - **Model**: `Clip` (shared timing + `ClipPayload`), `Track`, `Transition`, `Marker`
//! - **Validation**: invariant predicates for clips and tracks
//! - **Edit math**: pure split, trim, move and ripple functions in [`edit`]
//!
//! Nothing in this crate holds state between calls; the reducer in
//! `nle-app-state` composes these functions into state transitions.

pub mod clip;
pub mod edit;
pub mod marker;
pub mod track;
pub mod transition;
pub mod validate;

// Re-export the model at crate root
pub use clip::{
    CaptionSegment, Clip, ClipBounds, ClipPatch, ClipPayload, Effect, Handles, Position, Transform,
};
pub use marker::{Marker, MarkerPatch};
pub use track::{Track, TrackPatch, TrackSettings};
pub use transition::{Transition, TransitionPatch, TransitionSpec, TransitionType};
pub use validate::{validate_clip, validate_track, validate_tracks};
