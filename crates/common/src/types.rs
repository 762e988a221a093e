//! Shared primitive types: media kinds and timeline time ranges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tolerance used when comparing timeline positions in seconds.
pub const TIME_EPSILON: f64 = 1e-9;

/// Kind of media a clip carries and a track accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Caption,
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaKind::Video => write!(f, "video"),
            MediaKind::Audio => write!(f, "audio"),
            MediaKind::Caption => write!(f, "caption"),
        }
    }
}

/// Half-open span of timeline seconds, `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Strictly inside the range; both edges excluded.
    pub fn contains_interior(&self, time: f64) -> bool {
        time > self.start && time < self.end
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s..{:.3}s", self.start, self.end)
    }
}
