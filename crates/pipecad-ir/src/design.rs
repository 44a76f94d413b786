//! The saved design file shape.

use serde::{Deserialize, Serialize};

use crate::ComponentInstance;

/// Current design format version.
pub const DESIGN_FORMAT_VERSION: &str = "0.1";

/// A persisted design: its name and the full scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedDesign {
    /// Format version string (e.g. "0.1").
    pub version: String,
    /// Design name shown in the title bar and exports.
    pub name: String,
    /// Scene contents in insertion order.
    pub components: Vec<ComponentInstance>,
}

impl SavedDesign {
    /// Create a design at the current format version.
    pub fn new(name: impl Into<String>, components: Vec<ComponentInstance>) -> Self {
        Self {
            version: DESIGN_FORMAT_VERSION.to_string(),
            name: name.into(),
            components,
        }
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for SavedDesign {
    fn default() -> Self {
        Self::new("Untitled", Vec::new())
    }
}
