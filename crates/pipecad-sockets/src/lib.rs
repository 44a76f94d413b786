#![warn(missing_docs)]

//! Socket catalog for pipecad component types.
//!
//! A socket is a connection point on a part: a position and an outward
//! facing direction in the type's unscaled local frame. Two parts dock when
//! a socket of one coincides with a socket of the other and their
//! directions are opposite.
//!
//! The catalog is immutable and built once on first use. Per-instance
//! adjustments (pipe length, fitting scale) are applied on every lookup by
//! [`local_sockets`] and never cached on the instance.
//!
//! Local frame convention: Y is the flow axis, the first socket is the
//! inlet facing -Y. The inlet is the socket a part docks with while it is
//! being placed.

use once_cell::sync::Lazy;
use pipecad_ir::{ComponentInstance, ComponentType, Properties};
use pipecad_math::{Point3, Vec3};
use std::collections::HashMap;

/// A connection point in a component type's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Socket {
    /// Local position of the socket center.
    pub position: Vec3,
    /// Outward unit direction.
    pub direction: Vec3,
}

impl Socket {
    fn new(position: [f64; 3], direction: [f64; 3]) -> Self {
        Self {
            position: Vec3::new(position[0], position[1], position[2]),
            direction: Vec3::new(direction[0], direction[1], direction[2]).normalize(),
        }
    }
}

/// A socket resolved into world space for a placed instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldSocket {
    /// Index in the type's socket list.
    pub index: usize,
    /// World position.
    pub position: Point3,
    /// World outward unit direction.
    pub direction: Vec3,
}

const DOWN: [f64; 3] = [0.0, -1.0, 0.0];
const UP: [f64; 3] = [0.0, 1.0, 0.0];
const RIGHT: [f64; 3] = [1.0, 0.0, 0.0];
const LEFT: [f64; 3] = [-1.0, 0.0, 0.0];

/// Two opposed sockets along Y at `±half`.
fn inline_pair(half: f64) -> Vec<Socket> {
    vec![
        Socket::new([0.0, -half, 0.0], DOWN),
        Socket::new([0.0, half, 0.0], UP),
    ]
}

static CATALOG: Lazy<HashMap<ComponentType, Vec<Socket>>> = Lazy::new(|| {
    let d45 = std::f64::consts::FRAC_1_SQRT_2;
    let mut m = HashMap::new();

    m.insert(ComponentType::Straight, inline_pair(1.0));
    m.insert(ComponentType::Vertical, inline_pair(1.0));
    m.insert(ComponentType::Tank, inline_pair(1.5));

    m.insert(
        ComponentType::Elbow,
        vec![
            Socket::new([0.0, -0.5, 0.0], DOWN),
            Socket::new([0.5, 0.0, 0.0], RIGHT),
        ],
    );
    m.insert(
        ComponentType::Elbow45,
        vec![
            Socket::new([0.0, -0.5, 0.0], DOWN),
            Socket::new([0.5 * d45, 0.5 * d45, 0.0], [d45, d45, 0.0]),
        ],
    );
    m.insert(
        ComponentType::TJoint,
        vec![
            Socket::new([0.0, -0.5, 0.0], DOWN),
            Socket::new([0.0, 0.5, 0.0], UP),
            Socket::new([0.5, 0.0, 0.0], RIGHT),
        ],
    );
    m.insert(
        ComponentType::Cross,
        vec![
            Socket::new([0.0, -0.5, 0.0], DOWN),
            Socket::new([0.0, 0.5, 0.0], UP),
            Socket::new([0.5, 0.0, 0.0], RIGHT),
            Socket::new([-0.5, 0.0, 0.0], LEFT),
        ],
    );

    m.insert(ComponentType::Reducer, inline_pair(0.4));
    m.insert(ComponentType::Flange, inline_pair(0.05));
    m.insert(ComponentType::Union, inline_pair(0.15));
    m.insert(ComponentType::Coupling, inline_pair(0.2));
    m.insert(ComponentType::Valve, inline_pair(0.4));
    m.insert(ComponentType::Filter, inline_pair(0.5));

    m.insert(ComponentType::Cap, vec![Socket::new([0.0, -0.1, 0.0], DOWN)]);
    m.insert(ComponentType::Plug, vec![Socket::new([0.0, -0.1, 0.0], DOWN)]);

    // Cylinder, cube and cone are decorative and have no sockets.
    m
});

/// Catalog sockets for `ty`, unadjusted.
///
/// `None` means the type cannot snap and is placed freely.
pub fn sockets_for(ty: ComponentType) -> Option<&'static [Socket]> {
    CATALOG.get(&ty).map(Vec::as_slice)
}

/// Sockets for `ty` adjusted to an instance's properties, in local space.
///
/// Elongating types (straight, vertical, tank) move their end sockets to
/// `±length/2`; every other type scales socket positions by `radiusScale`.
pub fn local_sockets(ty: ComponentType, properties: &Properties) -> Option<Vec<Socket>> {
    let catalog = sockets_for(ty)?;

    let adjusted = match properties.length(ty) {
        Some(length) => {
            let half = length / 2.0;
            catalog
                .iter()
                .map(|s| {
                    let mut s = *s;
                    if s.position.y != 0.0 {
                        s.position.y = s.position.y.signum() * half;
                    }
                    s
                })
                .collect()
        }
        None => {
            let scale = properties.radius_scale();
            catalog
                .iter()
                .map(|s| Socket {
                    position: s.position * scale,
                    direction: s.direction,
                })
                .collect()
        }
    };

    Some(adjusted)
}

/// Sockets of a placed instance in world space, in declaration order.
///
/// Empty for types without sockets.
pub fn world_sockets(instance: &ComponentInstance) -> Vec<WorldSocket> {
    let Some(locals) = local_sockets(instance.component_type, &instance.properties) else {
        return Vec::new();
    };
    let pose = instance.pose();
    locals
        .iter()
        .enumerate()
        .map(|(index, s)| WorldSocket {
            index,
            position: pose.apply_point(&Point3::from(s.position)),
            direction: pose.apply_vec(&s.direction),
        })
        .collect()
}
