//! Euler/quaternion conversion and rotation helpers.
//!
//! Euler angles use the intrinsic XYZ convention: the combined rotation is
//! `Rx * Ry * Rz`, so a vector is rotated about Z first, then Y, then X.
//! Note that `UnitQuaternion::from_euler_angles` uses the opposite (ZYX)
//! composition and must not be used for stored component rotations.

use nalgebra::{Quaternion, Vector3};

use crate::{Rotation, Vec3};

/// Below this `1 + cos(angle)` the two directions are treated as antiparallel.
const ANTIPARALLEL_EPS: f64 = f64::EPSILON;

/// Below this cos(Y) the decomposition is in gimbal lock.
const GIMBAL_LOCK_COS: f64 = 1e-9;

/// Build a rotation from intrinsic-XYZ Euler angles in degrees.
pub fn euler_degrees_to_quaternion(x: f64, y: f64, z: f64) -> Rotation {
    let qx = Rotation::from_axis_angle(&Vector3::x_axis(), x.to_radians());
    let qy = Rotation::from_axis_angle(&Vector3::y_axis(), y.to_radians());
    let qz = Rotation::from_axis_angle(&Vector3::z_axis(), z.to_radians());
    qx * qy * qz
}

/// Decompose a rotation into intrinsic-XYZ Euler angles in degrees.
///
/// Inverse of [`euler_degrees_to_quaternion`]. In gimbal lock (Y at ±90°)
/// the Z angle is folded into X and reported as zero.
///
/// Y is recovered with `atan2` rather than `asin` so angles close to ±90°
/// keep full precision.
pub fn quaternion_to_euler_degrees(q: &Rotation) -> Vec3 {
    let rot = q.to_rotation_matrix();
    let m = rot.matrix();
    let cos_y = m[(0, 0)].hypot(m[(0, 1)]);
    let y = m[(0, 2)].atan2(cos_y);
    let (x, z) = if cos_y > GIMBAL_LOCK_COS {
        ((-m[(1, 2)]).atan2(m[(2, 2)]), (-m[(0, 1)]).atan2(m[(0, 0)]))
    } else {
        (m[(2, 1)].atan2(m[(1, 1)]), 0.0)
    };
    Vec3::new(x.to_degrees(), y.to_degrees(), z.to_degrees())
}

/// Rotate a direction or offset vector.
pub fn rotate_vector(v: &Vec3, q: &Rotation) -> Vec3 {
    q * v
}

/// Rotation equivalent to applying `b` inside `a`'s frame (`a * b`).
pub fn compose_quaternions(a: &Rotation, b: &Rotation) -> Rotation {
    a * b
}

/// Minimal rotation that maps direction `from` onto direction `to`.
///
/// Inputs need not be normalized. Antiparallel inputs produce a half turn
/// about an axis perpendicular to `from`.
pub fn align_directions(from: &Vec3, to: &Vec3) -> Rotation {
    let from = from.normalize();
    let to = to.normalize();
    let r = from.dot(&to) + 1.0;

    let q = if r < ANTIPARALLEL_EPS {
        if from.x.abs() > from.z.abs() {
            Quaternion::new(0.0, -from.y, from.x, 0.0)
        } else {
            Quaternion::new(0.0, 0.0, -from.z, from.y)
        }
    } else {
        let axis = from.cross(&to);
        Quaternion::new(r, axis.x, axis.y, axis.z)
    };

    Rotation::new_normalize(q)
}
