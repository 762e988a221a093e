//! `nle-common` -- Shared configuration, errors, and primitive types for the
//! timeline editing engine.
//!
//! - **Types**: `MediaKind`, `TimeRange`, the time tolerance
//! - **Errors**: `EditError` with its `Disposition`, `ConfigError` (thiserror-based)
//! - **Config**: `EditorConfig` (history depth, clip/transition/zoom limits)

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use config::EditorConfig;
pub use error::{ConfigError, Disposition, EditError, EditResult};
pub use types::{MediaKind, TimeRange, TIME_EPSILON};
