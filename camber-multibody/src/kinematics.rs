use nalgebra::{DVector, Isometry3, Point3, Vector3};

use crate::joint::JointKind;
use crate::spatial::{self, SpatialVec};
use crate::tree::{BodyIndex, RigidBodyTree};

/// Poses, velocities, and per-DOF motion subspaces for one configuration.
///
/// All spatial quantities are expressed in world axes at the world origin.
/// The cache is rebuilt from scratch for each `(q, v)` pair; nothing in it
/// survives a configuration change.
pub struct KinematicsCache {
    body_poses: Vec<Isometry3<f64>>,
    body_velocities: Vec<SpatialVec>,
    dof_subspaces: Vec<SpatialVec>,
    dof_bias_accelerations: Vec<SpatialVec>,
    dof_bodies: Vec<usize>,
}

/// Runs the forward pass over the tree for generalized position `q` and
/// velocity `v`.
///
/// # Panics
///
/// Panics when `q` or `v` does not match the tree's coordinate counts;
/// callers validate sizes before reaching kinematics.
pub fn forward_kinematics(
    tree: &RigidBodyTree,
    q: &DVector<f64>,
    v: &DVector<f64>,
) -> KinematicsCache {
    assert_eq!(q.len(), tree.num_positions(), "generalized position size");
    assert_eq!(v.len(), tree.num_velocities(), "generalized velocity size");

    let num_bodies = tree.num_bodies();
    let mut cache = KinematicsCache {
        body_poses: vec![Isometry3::identity(); num_bodies],
        body_velocities: vec![SpatialVec::zeros(); num_bodies],
        dof_subspaces: vec![SpatialVec::zeros(); tree.num_positions()],
        dof_bias_accelerations: vec![SpatialVec::zeros(); tree.num_positions()],
        dof_bodies: vec![0; tree.num_positions()],
    };

    // Bodies are stored parent-first, so one sweep suffices.
    for index in tree.bodies().skip(1) {
        let parent = tree.parent(index).expect("non-world bodies have parents");
        let joint = tree.joint(index);
        let parent_pose = cache.body_poses[parent.index()];
        let parent_velocity = cache.body_velocities[parent.index()];

        // Pose of the joint frame before the joint's own motion.
        let joint_pose = parent_pose * joint.origin();

        match joint.kind() {
            JointKind::Fixed => {
                cache.body_poses[index.index()] = joint_pose;
                cache.body_velocities[index.index()] = parent_velocity;
            }
            JointKind::Revolute(axis) | JointKind::Prismatic(axis) => {
                let dof = tree
                    .position_index(index)
                    .expect("moving joints own a coordinate");
                let axis_world = joint_pose.rotation * axis;

                let subspace = match joint.kind() {
                    JointKind::Revolute(_) => {
                        let anchor = joint_pose.translation.vector;
                        spatial::spatial(
                            axis_world.into_inner(),
                            anchor.cross(&axis_world.into_inner()),
                        )
                    }
                    JointKind::Prismatic(_) => {
                        spatial::spatial(Vector3::zeros(), axis_world.into_inner())
                    }
                    JointKind::Fixed => unreachable!(),
                };

                let joint_rate = subspace * v[dof];
                cache.body_poses[index.index()] = joint_pose * joint.motion(q[dof]);
                cache.body_velocities[index.index()] = parent_velocity + joint_rate;
                cache.dof_subspaces[dof] = subspace;
                cache.dof_bias_accelerations[dof] =
                    spatial::cross_motion(&parent_velocity, &joint_rate);
                cache.dof_bodies[dof] = index.index();
            }
        }
    }

    cache
}

impl KinematicsCache {
    /// The world pose of a body frame.
    pub fn pose(&self, index: BodyIndex) -> &Isometry3<f64> {
        &self.body_poses[index.index()]
    }

    /// A body's spatial velocity `[ω; v]`, taken at the world origin.
    pub(crate) fn velocity(&self, index: BodyIndex) -> &SpatialVec {
        &self.body_velocities[index.index()]
    }

    /// The motion subspace of a generalized coordinate.
    pub(crate) fn subspace(&self, dof: usize) -> &SpatialVec {
        &self.dof_subspaces[dof]
    }

    /// The velocity-product acceleration of a coordinate's joint.
    pub(crate) fn bias_acceleration(&self, dof: usize) -> &SpatialVec {
        &self.dof_bias_accelerations[dof]
    }

    /// The body moved by a generalized coordinate.
    pub(crate) fn dof_body(&self, dof: usize) -> usize {
        self.dof_bodies[dof]
    }

    /// Maps a body-frame point into world coordinates.
    pub fn point_in_world(&self, index: BodyIndex, point: &Vector3<f64>) -> Vector3<f64> {
        (self.pose(index) * Point3::from(*point)).coords
    }

    /// The world velocity of a body-fixed point given in world coordinates.
    pub fn point_velocity(&self, index: BodyIndex, point_world: &Vector3<f64>) -> Vector3<f64> {
        let velocity = self.velocity(index);
        spatial::linear(velocity) + spatial::angular(velocity).cross(point_world)
    }
}
