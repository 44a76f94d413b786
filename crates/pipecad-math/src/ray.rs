//! Pointer rays and the placement planes they are intersected with.

use crate::{Dir3, Point3, Vec3};

/// A ray in 3D space defined by origin and direction.
///
/// Typically the picking ray cast from the camera through the cursor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Point3,
    /// Unit direction of the ray.
    pub direction: Dir3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// The direction will be normalized.
    pub fn new(origin: Point3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: Dir3::new_normalize(direction),
        }
    }

    /// Evaluate the ray at parameter `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f64) -> Point3 {
        self.origin + t * self.direction.as_ref()
    }

    /// Squared distance from `p` to the closest point on the ray.
    ///
    /// Points behind the origin measure against the origin itself.
    pub fn distance_squared_to_point(&self, p: &Point3) -> f64 {
        let v = p - self.origin;
        let t = v.dot(self.direction.as_ref());
        if t < 0.0 {
            return v.norm_squared();
        }
        (p - self.at(t)).norm_squared()
    }
}

/// An infinite plane given by a point on it and its unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// A point on the plane.
    pub origin: Point3,
    /// Unit normal.
    pub normal: Dir3,
}

impl Plane {
    /// Create a plane from a point and a (not necessarily unit) normal.
    pub fn new(origin: Point3, normal: Vec3) -> Self {
        Self {
            origin,
            normal: Dir3::new_normalize(normal),
        }
    }

    /// The ground plane `y = 0`.
    pub fn ground() -> Self {
        Self::new(Point3::origin(), Vec3::y())
    }

    /// The front-elevation background plane `z = 0`.
    pub fn front() -> Self {
        Self::new(Point3::origin(), Vec3::z())
    }

    /// Signed distance from `p` to the plane along the normal.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        (p - self.origin).dot(self.normal.as_ref())
    }
}

/// Intersect a ray with a plane.
///
/// Returns `None` if the ray is parallel to the plane or the intersection
/// lies behind the ray origin.
pub fn intersect_ray_with_plane(ray: &Ray, plane: &Plane) -> Option<Point3> {
    let normal = plane.normal.as_ref();
    let denom = ray.direction.as_ref().dot(normal);

    if denom.abs() < 1e-12 {
        return None;
    }

    let t = (plane.origin - ray.origin).dot(normal) / denom;
    if t < 0.0 {
        return None;
    }

    Some(ray.at(t))
}
