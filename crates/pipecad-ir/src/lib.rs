#![warn(missing_docs)]

//! Data model for the pipecad piping editor.
//!
//! This crate defines the value types that make up a design: component
//! instances placed in a scene, reusable part templates, and the saved
//! design file shape. Everything here is plain data with serde support;
//! snapping and editing live in the crates built on top.
//!
//! Instances are value types: cloning one yields a fully owned copy, so
//! history snapshots and duplicates never alias scene entries.

mod design;
mod instance;
mod properties;
mod template;

pub use design::{SavedDesign, DESIGN_FORMAT_VERSION};
pub use instance::{new_component_id, ComponentId, ComponentInstance};
pub use properties::{
    Properties, DEFAULT_MATERIAL, DEFAULT_OD, DEFAULT_RADIUS_SCALE, DEFAULT_WALL_THICKNESS,
};
pub use template::{Template, TemplatePart, TemplateShape};

use pipecad_math::Point3;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 3D vector with f64 components, as stored in design files.
///
/// Positions are meters; rotations are Euler degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// All components zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Whether every component is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Interpret as a point.
    pub fn to_point(self) -> Point3 {
        Point3::new(self.x, self.y, self.z)
    }
}

impl From<pipecad_math::Vec3> for Vec3 {
    fn from(v: pipecad_math::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3> for pipecad_math::Vec3 {
    fn from(v: Vec3) -> Self {
        pipecad_math::Vec3::new(v.x, v.y, v.z)
    }
}

impl From<Point3> for Vec3 {
    fn from(p: Point3) -> Self {
        Self::new(p.x, p.y, p.z)
    }
}

/// The fixed set of component kinds in the parts library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    /// Straight pipe run.
    Straight,
    /// 90° elbow.
    Elbow,
    /// 45° elbow.
    #[serde(rename = "elbow-45")]
    Elbow45,
    /// Vertical riser pipe.
    Vertical,
    /// Tee fitting.
    TJoint,
    /// Four-way cross fitting.
    Cross,
    /// Concentric reducer.
    Reducer,
    /// Flange.
    Flange,
    /// Pipe union.
    Union,
    /// Coupling.
    Coupling,
    /// In-line valve.
    Valve,
    /// In-line filter.
    Filter,
    /// Storage tank.
    Tank,
    /// End cap.
    Cap,
    /// Plug.
    Plug,
    /// Decorative cylinder primitive.
    Cylinder,
    /// Decorative cube primitive.
    Cube,
    /// Decorative cone primitive.
    Cone,
}

impl ComponentType {
    /// Every component type, in library order.
    pub const ALL: [ComponentType; 18] = [
        ComponentType::Straight,
        ComponentType::Elbow,
        ComponentType::Elbow45,
        ComponentType::Vertical,
        ComponentType::TJoint,
        ComponentType::Cross,
        ComponentType::Reducer,
        ComponentType::Flange,
        ComponentType::Union,
        ComponentType::Coupling,
        ComponentType::Valve,
        ComponentType::Filter,
        ComponentType::Tank,
        ComponentType::Cap,
        ComponentType::Plug,
        ComponentType::Cylinder,
        ComponentType::Cube,
        ComponentType::Cone,
    ];

    /// The wire name of this type (e.g. `"t-joint"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Straight => "straight",
            ComponentType::Elbow => "elbow",
            ComponentType::Elbow45 => "elbow-45",
            ComponentType::Vertical => "vertical",
            ComponentType::TJoint => "t-joint",
            ComponentType::Cross => "cross",
            ComponentType::Reducer => "reducer",
            ComponentType::Flange => "flange",
            ComponentType::Union => "union",
            ComponentType::Coupling => "coupling",
            ComponentType::Valve => "valve",
            ComponentType::Filter => "filter",
            ComponentType::Tank => "tank",
            ComponentType::Cap => "cap",
            ComponentType::Plug => "plug",
            ComponentType::Cylinder => "cylinder",
            ComponentType::Cube => "cube",
            ComponentType::Cone => "cone",
        }
    }

    /// Whether the type stretches along its local Y axis with `length`.
    pub fn is_elongating(&self) -> bool {
        matches!(
            self,
            ComponentType::Straight | ComponentType::Vertical | ComponentType::Tank
        )
    }

    /// Default `length` for elongating types.
    pub fn default_length(&self) -> Option<f64> {
        match self {
            ComponentType::Straight | ComponentType::Vertical => Some(2.0),
            ComponentType::Tank => Some(3.0),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unrecognized component type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownComponentType(pub String);

impl fmt::Display for UnknownComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown component type: {}", self.0)
    }
}

impl std::error::Error for UnknownComponentType {}

impl FromStr for ComponentType {
    type Err = UnknownComponentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ComponentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownComponentType(s.to_string()))
    }
}
