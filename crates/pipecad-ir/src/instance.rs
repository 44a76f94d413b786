//! Component instances: the unit of scene content.

use pipecad_math::Pose;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ComponentType, Properties, Vec3};

/// Opaque, process-unique identifier of a component instance.
pub type ComponentId = String;

/// Generate a fresh component (or assembly) identifier.
pub fn new_component_id() -> ComponentId {
    Uuid::new_v4().to_string()
}

/// A placed part in the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInstance {
    /// Unique identifier, immutable after creation.
    pub id: ComponentId,
    /// Which library part this is.
    pub component_type: ComponentType,
    /// World position in meters.
    pub position: Vec3,
    /// Intrinsic-XYZ Euler angles in degrees.
    pub rotation: Vec3,
    /// Related instance ids (reserved for pipe-network topology).
    #[serde(default)]
    pub connections: Vec<ComponentId>,
    /// Semantic attributes; unset keys fall back to type defaults.
    #[serde(default)]
    pub properties: Properties,
    /// Correlation key shared by parts placed from the same assembly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assembly_id: Option<String>,
}

impl ComponentInstance {
    /// Create an instance with a freshly generated id.
    pub fn new(component_type: ComponentType, position: Vec3, rotation: Vec3) -> Self {
        Self {
            id: new_component_id(),
            component_type,
            position,
            rotation,
            connections: Vec::new(),
            properties: Properties::new(),
            assembly_id: None,
        }
    }

    /// Builder-style property replacement.
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Builder-style assembly tag.
    pub fn with_assembly(mut self, assembly_id: impl Into<String>) -> Self {
        self.assembly_id = Some(assembly_id.into());
        self
    }

    /// An owned copy with a new identity.
    ///
    /// Connections are not carried over; they refer to the original's peers.
    pub fn fresh_copy(&self) -> Self {
        Self {
            id: new_component_id(),
            connections: Vec::new(),
            ..self.clone()
        }
    }

    /// World frame of this instance.
    pub fn pose(&self) -> Pose {
        Pose::from_degrees(self.position.to_point(), self.rotation.into())
    }

    /// Move this instance to `pose`, storing the rotation as degrees.
    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.position.into();
        self.rotation = pose.rotation_degrees().into();
    }

    /// Translate by `delta` meters.
    pub fn translate(&mut self, delta: Vec3) {
        self.position = Vec3::new(
            self.position.x + delta.x,
            self.position.y + delta.y,
            self.position.z + delta.z,
        );
    }
}
