//! Reusable part templates ("My Parts").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{new_component_id, ComponentType, Properties, Vec3};

/// One part of an assembly template, relative to the template origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePart {
    /// Library part type.
    pub component_type: ComponentType,
    /// Properties captured from the source instance.
    #[serde(default)]
    pub properties: Properties,
    /// Position in the origin part's frame.
    pub offset: Vec3,
    /// Rotation relative to the origin part, Euler degrees.
    pub rotation: Vec3,
}

/// What a template reproduces when placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TemplateShape {
    /// A single pre-configured part.
    #[serde(rename_all = "camelCase")]
    Single {
        /// Library part type.
        component_type: ComponentType,
        /// Properties to apply on placement.
        properties: Properties,
    },
    /// A rigid group of parts; the first part is the origin.
    Assembly {
        /// Parts in capture order.
        parts: Vec<TemplatePart>,
    },
}

/// A named, saved template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// When the template was captured.
    pub created_at: DateTime<Utc>,
    /// Geometry and parts.
    pub shape: TemplateShape,
}

impl Template {
    /// Create a template with a fresh id, stamped now.
    pub fn new(name: impl Into<String>, shape: TemplateShape) -> Self {
        Self {
            id: new_component_id(),
            name: name.into(),
            created_at: Utc::now(),
            shape,
        }
    }

    /// Type and properties of the part that stands in for socket geometry
    /// while placing: the single part, or the assembly origin.
    ///
    /// Returns `None` for an assembly with no parts.
    pub fn lead_part(&self) -> Option<(ComponentType, &Properties)> {
        match &self.shape {
            TemplateShape::Single {
                component_type,
                properties,
            } => Some((*component_type, properties)),
            TemplateShape::Assembly { parts } => parts
                .first()
                .map(|p| (p.component_type, &p.properties)),
        }
    }

    /// Number of instances placing this template creates.
    pub fn part_count(&self) -> usize {
        match &self.shape {
            TemplateShape::Single { .. } => 1,
            TemplateShape::Assembly { parts } => parts.len(),
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
