//! Penalty contact between body contact points and flat terrain.
//!
//! A contact point whose world height drops below a terrain top face is
//! penetrating. Penetration produces a normal force proportional to depth
//! (with damping on the approach speed, clamped so the terrain never
//! pulls), plus a friction force opposing slip and bounded by the friction
//! coefficient times the normal force. Non-penetrating points produce no
//! force at all.

use nalgebra::{DVector, Vector3};

use crate::kinematics::KinematicsCache;
use crate::spatial;
use crate::tree::{BodyIndex, RigidBodyTree, TerrainSurface};

/// Slip speeds below this are treated as sticking.
const SLIP_EPSILON: f64 = 1e-10;

/// Penalty contact coefficients. Set once after plant construction; not
/// mutable mid-simulation.
#[derive(Debug, Clone, Copy)]
pub struct ContactParameters {
    /// Normal force per unit penetration depth.
    pub stiffness: f64,
    /// Normal force per unit approach speed.
    pub damping: f64,
    /// Coulomb friction coefficient bounding tangential force.
    pub friction: f64,
}

impl Default for ContactParameters {
    fn default() -> Self {
        Self {
            stiffness: 5000.0,
            damping: 500.0,
            friction: 10.0,
        }
    }
}

/// The world-frame force one penetrating point generates.
fn point_force(
    params: &ContactParameters,
    depth: f64,
    point_velocity: &Vector3<f64>,
) -> Vector3<f64> {
    let normal = Vector3::z();
    let approach_speed = point_velocity.z;

    let normal_magnitude = (params.stiffness * depth - params.damping * approach_speed).max(0.0);

    let slip = point_velocity - normal * approach_speed;
    let slip_speed = slip.norm();
    let friction = if slip_speed > SLIP_EPSILON {
        let magnitude = (params.friction * normal_magnitude).min(params.damping * slip_speed);
        slip * (-magnitude / slip_speed)
    } else {
        Vector3::zeros()
    };

    normal * normal_magnitude + friction
}

/// Computes the generalized forces all active contacts apply.
///
/// Every body contact point is tested against every terrain surface; the
/// forces of penetrating points are mapped into joint space through the
/// point Jacobian assembled from the cached motion subspaces.
pub fn contact_forces(
    tree: &RigidBodyTree,
    cache: &KinematicsCache,
    params: &ContactParameters,
) -> DVector<f64> {
    let surfaces = tree.terrain_surfaces();
    let mut generalized = DVector::zeros(tree.num_velocities());
    if surfaces.is_empty() {
        return generalized;
    }

    for index in tree.bodies().skip(1) {
        let body = tree.body(index);
        if body.contact_points().is_empty() {
            continue;
        }
        for point in body.contact_points() {
            let point_world = cache.point_in_world(index, point);
            for surface in &surfaces {
                if let Some(depth) = penetration(surface, &point_world) {
                    let velocity = cache.point_velocity(index, &point_world);
                    let force = point_force(params, depth, &velocity);
                    apply_point_force(tree, cache, index, &point_world, &force, &mut generalized);
                }
            }
        }
    }
    generalized
}

/// Penetration depth of a point into a surface, or `None` when clear.
fn penetration(surface: &TerrainSurface, point_world: &Vector3<f64>) -> Option<f64> {
    let inside_footprint = (point_world.x - surface.center.x).abs() <= surface.half_extents.x
        && (point_world.y - surface.center.y).abs() <= surface.half_extents.y;
    let depth = surface.top - point_world.z;
    (inside_footprint && depth > 0.0).then_some(depth)
}

/// Adds `J_pᵀ · force` for a force acting at a world point on `body`.
fn apply_point_force(
    tree: &RigidBodyTree,
    cache: &KinematicsCache,
    body: BodyIndex,
    point_world: &Vector3<f64>,
    force: &Vector3<f64>,
    generalized: &mut DVector<f64>,
) {
    let mut at = body;
    loop {
        if let Some(dof) = tree.position_index(at) {
            let subspace = cache.subspace(dof);
            let point_motion =
                spatial::linear(subspace) + spatial::angular(subspace).cross(point_world);
            generalized[dof] += point_motion.dot(force);
        }
        match tree.parent(at) {
            Some(parent) => at = parent,
            None => break,
        }
    }
}
