//! View and transport state: playhead, play/pause flag, zoom, scroll, and drag.
//!
//! None of this is recorded in history. The reducer updates it in place on a
//! fresh copy of the state for the SET_* view actions.

use nle_common::EditorConfig;
use serde::{Deserialize, Serialize};

/// Pointer position where a drag gesture began.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DragOrigin {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    /// Playhead position in seconds.
    pub current_time: f64,
    pub is_playing: bool,
    /// Horizontal scale factor; 1.0 is the default density.
    pub zoom: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub is_dragging: bool,
    pub drag_origin: Option<DragOrigin>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            is_playing: false,
            zoom: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            is_dragging: false,
            drag_origin: None,
        }
    }

    /// Move the playhead. Negative times clamp to zero.
    pub fn seek(&mut self, time: f64) {
        self.current_time = time.max(0.0);
        tracing::debug!(time = self.current_time, "Seeked");
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing;
        tracing::debug!(time = self.current_time, playing, "Playback toggled");
    }

    pub fn set_zoom(&mut self, zoom: f64, config: &EditorConfig) {
        self.zoom = config.clamp_zoom(zoom);
    }

    pub fn set_scroll(&mut self, x: Option<f64>, y: Option<f64>) {
        if let Some(x) = x {
            self.scroll_x = x.max(0.0);
        }
        if let Some(y) = y {
            self.scroll_y = y.max(0.0);
        }
    }

    /// Begin or end a drag gesture. The origin is dropped when dragging stops.
    pub fn set_dragging(&mut self, dragging: bool, origin: Option<DragOrigin>) {
        self.is_dragging = dragging;
        self.drag_origin = if dragging { origin } else { None };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let view = ViewState::new();
        assert_eq!(view.current_time, 0.0);
        assert_eq!(view.zoom, 1.0);
        assert!(!view.is_playing);
        assert!(view.drag_origin.is_none());
    }

    #[test]
    fn seek_clamps_negative() {
        let mut view = ViewState::new();
        view.seek(-3.0);
        assert_eq!(view.current_time, 0.0);
        view.seek(12.5);
        assert_eq!(view.current_time, 12.5);
    }

    #[test]
    fn zoom_respects_config_limits() {
        let config = EditorConfig::default();
        let mut view = ViewState::new();
        view.set_zoom(100.0, &config);
        assert_eq!(view.zoom, config.max_zoom);
        view.set_zoom(0.01, &config);
        assert_eq!(view.zoom, config.min_zoom);
    }

    #[test]
    fn ending_drag_drops_origin() {
        let mut view = ViewState::new();
        view.set_dragging(true, Some(DragOrigin { x: 4.0, y: 2.0 }));
        assert!(view.is_dragging);
        assert_eq!(view.drag_origin, Some(DragOrigin { x: 4.0, y: 2.0 }));
        view.set_dragging(false, Some(DragOrigin { x: 1.0, y: 1.0 }));
        assert!(!view.is_dragging);
        assert!(view.drag_origin.is_none());
    }

    #[test]
    fn scroll_updates_only_given_axis() {
        let mut view = ViewState::new();
        view.set_scroll(Some(30.0), None);
        view.set_scroll(None, Some(-5.0));
        assert_eq!(view.scroll_x, 30.0);
        assert_eq!(view.scroll_y, 0.0);
    }
}
