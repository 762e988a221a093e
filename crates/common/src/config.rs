//! Editor configuration: history depth, clip and transition limits, zoom range.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Tunables shared by the reducer, edit math and history manager.
///
/// Every field has a default, so a config file only needs the values it
/// overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum history entries kept before the oldest is evicted.
    pub max_history_entries: usize,
    /// Shortest clip a trim may produce, in seconds.
    pub min_clip_duration: f64,
    /// Largest gap between two clips that still counts as adjacent.
    pub transition_adjacency_tolerance: f64,
    pub min_transition_duration: f64,
    pub max_transition_duration: f64,
    pub default_transition_duration: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_entries: 100,
            min_clip_duration: 0.1,
            transition_adjacency_tolerance: 0.1,
            min_transition_duration: 0.5,
            max_transition_duration: 5.0,
            default_transition_duration: 1.0,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        tracing::debug!(path = %path.display(), "Editor config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_history_entries == 0 {
            return Err(invalid("max_history_entries", "must be at least 1"));
        }
        if !(self.min_clip_duration > 0.0) {
            return Err(invalid("min_clip_duration", "must be positive"));
        }
        if !(self.transition_adjacency_tolerance >= 0.0) {
            return Err(invalid(
                "transition_adjacency_tolerance",
                "must not be negative",
            ));
        }
        if !(self.min_transition_duration > 0.0)
            || self.min_transition_duration > self.max_transition_duration
        {
            return Err(invalid(
                "min_transition_duration",
                "must be positive and not above max_transition_duration",
            ));
        }
        if self.default_transition_duration < self.min_transition_duration
            || self.default_transition_duration > self.max_transition_duration
        {
            return Err(invalid(
                "default_transition_duration",
                "must lie within the transition duration range",
            ));
        }
        if !(self.min_zoom > 0.0) || self.min_zoom > self.max_zoom {
            return Err(invalid(
                "min_zoom",
                "must be positive and not above max_zoom",
            ));
        }
        Ok(())
    }

    pub fn clamp_transition_duration(&self, duration: f64) -> f64 {
        if !duration.is_finite() {
            return self.default_transition_duration;
        }
        duration.clamp(self.min_transition_duration, self.max_transition_duration)
    }

    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        if !zoom.is_finite() {
            return self.min_zoom.max(1.0).min(self.max_zoom);
        }
        zoom.clamp(self.min_zoom, self.max_zoom)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EditorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_history_entries, 100);
        assert!((config.min_clip_duration - 0.1).abs() < 1e-12);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json_str(r#"{"max_history_entries": 5}"#).unwrap();
        assert_eq!(config.max_history_entries, 5);
        assert!((config.max_transition_duration - 5.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_zero_history() {
        let err = EditorConfig::from_json_str(r#"{"max_history_entries": 0}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                field: "max_history_entries",
                ..
            }
        ));
    }

    #[test]
    fn rejects_inverted_transition_range() {
        let config = EditorConfig {
            min_transition_duration: 6.0,
            ..EditorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn transition_duration_is_clamped() {
        let config = EditorConfig::default();
        assert!((config.clamp_transition_duration(0.1) - 0.5).abs() < 1e-12);
        assert!((config.clamp_transition_duration(9.0) - 5.0).abs() < 1e-12);
        assert!((config.clamp_transition_duration(f64::NAN) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn zoom_is_clamped() {
        let config = EditorConfig::default();
        assert!((config.clamp_zoom(50.0) - 10.0).abs() < 1e-12);
        assert!((config.clamp_zoom(0.0) - 0.1).abs() < 1e-12);
        assert!((config.clamp_zoom(2.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = EditorConfig::load("/definitely/not/here/editor.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
