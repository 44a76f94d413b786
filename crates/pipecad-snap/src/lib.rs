#![warn(missing_docs)]

//! Snap resolver for pipecad.
//!
//! Given the pointer ray, the scene and the part about to be placed,
//! [`compute_snap_proposal`] returns where the part would land this frame:
//! docked against the nearest socket within the snap radius, or dropped on
//! the ground (or front) plane at an integer grid point.
//!
//! Everything here is a pure function of its inputs, so the preview can be
//! recomputed on every rendered frame.
//!
//! # Example
//!
//! ```
//! use pipecad_ir::ComponentType;
//! use pipecad_math::{Point3, Ray, Vec3};
//! use pipecad_snap::{compute_snap_proposal, Placing, SnapConfig, ViewMode};
//!
//! let ray = Ray::new(Point3::new(0.2, 10.0, -0.3), Vec3::new(0.0, -1.0, 0.0));
//! let placing = Placing::component(ComponentType::Straight);
//! let proposal = compute_snap_proposal(&ray, &[], &placing, ViewMode::Perspective, &SnapConfig::default());
//! assert!(proposal.valid);
//! assert_eq!(proposal.position.x, 0.0);
//! ```

use pipecad_ir::{ComponentId, ComponentInstance, ComponentType, Properties, Template, Vec3 as IrVec3};
use pipecad_math::{
    align_directions, intersect_ray_with_plane, rotate_vector, Plane, Point3, Pose, Ray, Rotation,
};
use pipecad_sockets::{local_sockets, world_sockets, Socket, WorldSocket};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Default squared snap radius (a 3 m pick radius around each socket).
pub const DEFAULT_SNAP_RADIUS_SQ: f64 = 9.0;

/// Which background plane free placement lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// 3D view: free placement on the ground plane `y = 0`.
    #[default]
    Perspective,
    /// Front elevation: free placement on the plane `z = 0`.
    Front,
}

impl ViewMode {
    /// The plane free placement intersects in this mode.
    pub fn plane(&self) -> Plane {
        match self {
            ViewMode::Perspective => Plane::ground(),
            ViewMode::Front => Plane::front(),
        }
    }
}

/// Snap tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapConfig {
    /// Maximum squared distance from the ray to a socket for it to capture.
    pub snap_radius_sq: f64,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            snap_radius_sq: DEFAULT_SNAP_RADIUS_SQ,
        }
    }
}

/// The item currently being placed.
#[derive(Debug, Clone, PartialEq)]
pub enum Placing {
    /// A single library part.
    Component {
        /// Library part type.
        component_type: ComponentType,
        /// Properties the new instance will carry.
        properties: Properties,
    },
    /// A saved template; its lead part stands in for socket geometry.
    Template(Template),
}

impl Placing {
    /// Place a library part with default properties.
    pub fn component(component_type: ComponentType) -> Self {
        Self::Component {
            component_type,
            properties: Properties::new(),
        }
    }

    /// The type and properties whose first socket docks.
    pub fn lead(&self) -> Option<(ComponentType, &Properties)> {
        match self {
            Placing::Component {
                component_type,
                properties,
            } => Some((*component_type, properties)),
            Placing::Template(t) => t.lead_part(),
        }
    }

    /// The placing socket: the lead part's first socket, adjusted.
    fn docking_socket(&self) -> Option<Socket> {
        let (ty, properties) = self.lead()?;
        local_sockets(ty, properties)?.first().copied()
    }
}

/// The socket a proposal docks against.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapTarget {
    /// Instance owning the socket.
    pub component_id: ComponentId,
    /// Index of the socket on that instance.
    pub socket_index: usize,
    /// Squared distance from the ray to the socket.
    pub distance_sq: f64,
}

/// Where the placing item would land this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapProposal {
    /// World position of the new part (or assembly origin).
    pub position: IrVec3,
    /// World rotation, intrinsic-XYZ Euler degrees.
    pub rotation: IrVec3,
    /// Whether clicking should commit.
    pub valid: bool,
    /// The socket docked against, if snapped.
    pub target: Option<SnapTarget>,
}

impl SnapProposal {
    /// A proposal that must not be committed.
    pub fn invalid() -> Self {
        Self {
            position: IrVec3::zero(),
            rotation: IrVec3::zero(),
            valid: false,
            target: None,
        }
    }

    /// The proposal as a rigid pose.
    pub fn pose(&self) -> Pose {
        Pose::from_degrees(self.position.to_point(), self.rotation.into())
    }

    /// Id of the instance docked against, if any.
    pub fn target_component_id(&self) -> Option<&str> {
        self.target.as_ref().map(|t| t.component_id.as_str())
    }
}

/// Compute this frame's placement proposal.
///
/// Sockets are scanned in scene order, then declaration order; a later
/// candidate replaces the current best only when strictly closer, so exact
/// ties go to the first one found.
pub fn compute_snap_proposal(
    ray: &Ray,
    scene: &[ComponentInstance],
    placing: &Placing,
    view: ViewMode,
    config: &SnapConfig,
) -> SnapProposal {
    if scene.is_empty() {
        return free_placement(ray, view);
    }

    // Types without sockets never snap.
    let Some(placing_socket) = placing.docking_socket() else {
        return free_placement(ray, view);
    };

    match find_nearest_socket(ray, scene, config.snap_radius_sq) {
        Some((target, socket)) => {
            let pose = dock_pose(&placing_socket, &socket);
            trace!(
                target = %target.component_id,
                socket = target.socket_index,
                distance_sq = target.distance_sq,
                "snapped to socket"
            );
            SnapProposal {
                position: pose.position.into(),
                rotation: pose.rotation_degrees().into(),
                valid: true,
                target: Some(target),
            }
        }
        None => free_placement(ray, view),
    }
}

/// Nearest world socket to the ray within `radius_sq`.
pub fn find_nearest_socket(
    ray: &Ray,
    scene: &[ComponentInstance],
    radius_sq: f64,
) -> Option<(SnapTarget, WorldSocket)> {
    let mut best: Option<(f64, &ComponentInstance, WorldSocket)> = None;

    for instance in scene {
        for socket in world_sockets(instance) {
            let d = ray.distance_squared_to_point(&socket.position);
            if d >= radius_sq {
                continue;
            }
            if best.as_ref().map_or(true, |(best_d, _, _)| d < *best_d) {
                best = Some((d, instance, socket));
            }
        }
    }

    best.map(|(distance_sq, instance, socket)| {
        (
            SnapTarget {
                component_id: instance.id.clone(),
                socket_index: socket.index,
                distance_sq,
            },
            socket,
        )
    })
}

/// Pose that puts `placing` (a local socket of the new part) onto `target`,
/// facing it.
///
/// The rotation turns the placing socket's direction onto the reverse of
/// the target's; the position then makes the two socket centers coincide.
pub fn dock_pose(placing: &Socket, target: &WorldSocket) -> Pose {
    let rotation: Rotation = align_directions(&placing.direction, &(-target.direction));
    let position = target.position - rotate_vector(&placing.position, &rotation);
    Pose::new(position, rotation)
}

/// Drop onto the view's background plane at the nearest grid point.
pub fn free_placement(ray: &Ray, view: ViewMode) -> SnapProposal {
    let Some(hit) = intersect_ray_with_plane(ray, &view.plane()) else {
        return SnapProposal::invalid();
    };

    let position = match view {
        ViewMode::Perspective => Point3::new(hit.x.round(), 0.0, hit.z.round()),
        ViewMode::Front => Point3::new(hit.x.round(), hit.y.round(), 0.0),
    };

    SnapProposal {
        position: position.into(),
        rotation: IrVec3::zero(),
        valid: true,
        target: None,
    }
}
