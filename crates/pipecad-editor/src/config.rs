//! Editor configuration, loadable from TOML.
//!
//! ```toml
//! placement_debounce_ms = 400
//! duplicate_offset = 0.5
//!
//! [snap]
//! snap_radius_sq = 12.25
//! ```

use pipecad_snap::SnapConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::Result;

/// Tunable editor behavior. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Socket snapping.
    pub snap: SnapConfig,
    /// Minimum interval between two placement commits, in milliseconds.
    pub placement_debounce_ms: u64,
    /// Offset applied on X and Z to duplicated parts, in meters.
    pub duplicate_offset: f64,
    /// Offset applied on X and Z to each successive paste, in meters.
    pub paste_offset: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            snap: SnapConfig::default(),
            placement_debounce_ms: 350,
            duplicate_offset: 0.5,
            paste_offset: 1.0,
        }
    }
}

impl EditorConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!("Loaded editor config from {}", path.display());
        Ok(config)
    }

    /// Debounce interval as a duration.
    pub fn placement_debounce(&self) -> Duration {
        Duration::from_millis(self.placement_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EditorError;

    #[test]
    fn test_defaults() {
        let c = EditorConfig::default();
        assert_eq!(c.snap.snap_radius_sq, 9.0);
        assert_eq!(c.placement_debounce(), Duration::from_millis(350));
        assert_eq!(c.duplicate_offset, 0.5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let c = EditorConfig::from_toml_str("placement_debounce_ms = 400\n[snap]\nsnap_radius_sq = 12.25\n").unwrap();
        assert_eq!(c.placement_debounce_ms, 400);
        assert_eq!(c.snap.snap_radius_sq, 12.25);
        assert_eq!(c.paste_offset, 1.0);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_malformed_toml() {
        let err = EditorConfig::from_toml_str("placement_debounce_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EditorConfig::load("/nonexistent/pipecad.toml").unwrap_err();
        assert!(matches!(err, EditorError::Io(_)));
    }
}
