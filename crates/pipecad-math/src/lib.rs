#![warn(missing_docs)]

//! Math types for the pipecad placement engine.
//!
//! Thin wrappers around nalgebra providing domain-specific types for
//! docking pipe components: points, vectors, directions, rotations, rigid
//! poses, rays, planes and tolerance constants.
//!
//! Angles are stored in degrees (what the editor persists and shows) and
//! converted to radians only inside the conversion functions here.

mod ray;
mod rotation;

pub use ray::{intersect_ray_with_plane, Plane, Ray};
pub use rotation::{
    align_directions, compose_quaternions, euler_degrees_to_quaternion,
    quaternion_to_euler_degrees, rotate_vector,
};

use nalgebra::{Unit, UnitQuaternion, Vector3};

/// A point in 3D space (meters).
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A rotation in 3D space.
pub type Rotation = UnitQuaternion<f64>;

/// A rigid placement: rotation followed by translation.
///
/// This is the frame in which a component instance (or an assembly origin)
/// sits in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// World position of the frame origin.
    pub position: Point3,
    /// Orientation of the frame.
    pub rotation: Rotation,
}

impl Pose {
    /// Identity pose at the world origin.
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: Rotation::identity(),
        }
    }

    /// Create a pose from a position and a rotation.
    pub fn new(position: Point3, rotation: Rotation) -> Self {
        Self { position, rotation }
    }

    /// Create a pose from a position and intrinsic-XYZ Euler angles in degrees.
    pub fn from_degrees(position: Point3, euler_degrees: Vec3) -> Self {
        Self {
            position,
            rotation: euler_degrees_to_quaternion(euler_degrees.x, euler_degrees.y, euler_degrees.z),
        }
    }

    /// Orientation as intrinsic-XYZ Euler angles in degrees.
    pub fn rotation_degrees(&self) -> Vec3 {
        quaternion_to_euler_degrees(&self.rotation)
    }

    /// Transform a point from this frame into the parent frame.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.position + self.rotation * p.coords
    }

    /// Transform a direction or offset vector (rotation only).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.rotation * v
    }

    /// Compose: `self` then `other` in `self`'s frame.
    ///
    /// `a.then(&b).apply_point(p) == a.apply_point(&b.apply_point(p))`.
    pub fn then(&self, other: &Pose) -> Self {
        Self {
            position: self.apply_point(&other.position),
            rotation: self.rotation * other.rotation,
        }
    }

    /// Inverse of this pose.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.inverse();
        Self {
            position: Point3::from(-(rotation * self.position.coords)),
            rotation,
        }
    }

    /// Express `self` in the frame of `origin`.
    pub fn relative_to(&self, origin: &Pose) -> Self {
        origin.inverse().then(self)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in meters.
    pub linear: f64,
    /// Angular tolerance in radians.
    pub angular: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 m linear, 1e-6 rad angular).
    ///
    /// The angular bound sits above the ~1e-8 rad noise of recovering an
    /// angle from a quaternion dot product after Euler round-trips.
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        angular: 1e-6,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two vectors are equal within the linear tolerance.
    pub fn vectors_equal(&self, a: &Vec3, b: &Vec3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if two rotations are equal, treating `q` and `-q` as the same.
    pub fn rotations_equal(&self, a: &Rotation, b: &Rotation) -> bool {
        a.angle_to(b) < self.angular
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
