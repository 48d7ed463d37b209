//! Joint-space dynamics: mass matrix and bias forces.
//!
//! Both passes work on 6D spatial quantities at the world origin. The mass
//! matrix comes from a composite-rigid-body sweep; the bias vector
//! (gravity, velocity products, joint damping) comes from a recursive
//! Newton-Euler sweep with zero joint accelerations and the world frame
//! accelerating opposite to gravity.

use nalgebra::{DMatrix, DVector, Matrix6, Vector3};

use crate::kinematics::KinematicsCache;
use crate::spatial::{self, SpatialVec};
use crate::tree::{BodyIndex, RigidBodyTree};

/// Standard gravity, pulling along world `-z`.
pub const GRAVITY: f64 = 9.81;

/// The spatial inertia of one body at the world origin, in world axes.
fn body_inertia(tree: &RigidBodyTree, cache: &KinematicsCache, index: BodyIndex) -> Matrix6<f64> {
    let body = tree.body(index);
    let pose = cache.pose(index);
    let rotation = pose.rotation.to_rotation_matrix().into_inner();
    let com_world = cache.point_in_world(index, body.center_of_mass());
    let inertia_world = rotation * body.inertia() * rotation.transpose();
    spatial::spatial_inertia(body.mass(), &com_world, &inertia_world)
}

/// Computes the joint-space mass matrix `M(q)`.
///
/// Composite-rigid-body pass: subtree inertias accumulate leaf-to-root,
/// then each coordinate pair on a common ancestor path is projected
/// through its motion subspaces. The result is symmetric.
pub fn mass_matrix(tree: &RigidBodyTree, cache: &KinematicsCache) -> DMatrix<f64> {
    let num_dofs = tree.num_positions();
    let num_bodies = tree.num_bodies();

    // Composite inertia of each body's subtree.
    let mut composite: Vec<Matrix6<f64>> = tree
        .bodies()
        .map(|index| {
            if index == BodyIndex::WORLD {
                Matrix6::zeros()
            } else {
                body_inertia(tree, cache, index)
            }
        })
        .collect();
    for raw in (1..num_bodies).rev() {
        let parent = tree
            .parent(BodyIndex(raw))
            .expect("non-world bodies have parents")
            .index();
        let subtree = composite[raw];
        composite[parent] += subtree;
    }

    let mut matrix = DMatrix::zeros(num_dofs, num_dofs);
    for dof in 0..num_dofs {
        let body = cache.dof_body(dof);
        let force: SpatialVec = composite[body] * cache.subspace(dof);

        // Walk the ancestor chain, filling this coordinate's row/column.
        let mut at = body;
        loop {
            if let Some(other) = tree.position_index(BodyIndex(at)) {
                let entry = cache.subspace(other).dot(&force);
                matrix[(dof, other)] = entry;
                matrix[(other, dof)] = entry;
            }
            match tree.parent(BodyIndex(at)) {
                Some(parent) => at = parent.index(),
                None => break,
            }
        }
    }
    matrix
}

/// Computes the bias vector `b(q, v)`: gravity, velocity-product forces,
/// and joint damping, so that the equations of motion read
/// `M(q)·v̇ = τ_applied − b(q, v)`.
pub fn bias_forces(tree: &RigidBodyTree, cache: &KinematicsCache, v: &DVector<f64>) -> DVector<f64> {
    let num_bodies = tree.num_bodies();

    // Accelerating the world frame by -g folds gravity into the sweep.
    let world_acceleration = spatial::spatial(Vector3::zeros(), Vector3::new(0.0, 0.0, GRAVITY));

    let mut accelerations = vec![SpatialVec::zeros(); num_bodies];
    let mut forces = vec![SpatialVec::zeros(); num_bodies];
    accelerations[0] = world_acceleration;

    for index in tree.bodies().skip(1) {
        let raw = index.index();
        let parent = tree
            .parent(index)
            .expect("non-world bodies have parents")
            .index();

        accelerations[raw] = accelerations[parent]
            + tree
                .position_index(index)
                .map_or_else(SpatialVec::zeros, |dof| *cache.bias_acceleration(dof));

        let inertia = body_inertia(tree, cache, index);
        let velocity = cache.velocity(index);
        let momentum: SpatialVec = inertia * velocity;
        forces[raw] = inertia * accelerations[raw] + spatial::cross_force(velocity, &momentum);
    }

    let mut bias = DVector::zeros(tree.num_velocities());
    for raw in (1..num_bodies).rev() {
        let index = BodyIndex(raw);
        if let Some(dof) = tree.position_index(index) {
            bias[dof] = cache.subspace(dof).dot(&forces[raw]) + tree.joint(index).damping() * v[dof];
        }
        let parent = tree
            .parent(index)
            .expect("non-world bodies have parents")
            .index();
        let subtree = forces[raw];
        forces[parent] += subtree;
    }
    bias
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use nalgebra::{Matrix3, dvector};

    use crate::body::RigidBody;
    use crate::joint::Joint;
    use crate::kinematics::forward_kinematics;

    use super::*;

    fn pendulum(damping: f64) -> RigidBodyTree {
        let mut tree = RigidBodyTree::new();
        tree.add_body(
            BodyIndex::WORLD,
            RigidBody::new("link", 2.0, Matrix3::from_diagonal_element(0.1))
                .with_center_of_mass(Vector3::new(0.0, 0.0, -0.5)),
            Joint::revolute("pivot", Vector3::y()).with_damping(damping),
        )
        .unwrap();
        tree
    }

    #[test]
    fn pendulum_mass_matrix_is_inertia_plus_offset_term() {
        let tree = pendulum(0.0);
        let cache = forward_kinematics(&tree, &dvector![0.3], &dvector![0.0]);
        let matrix = mass_matrix(&tree, &cache);

        // M = I_yy + m·r² = 0.1 + 2·0.25, independent of the angle.
        assert_eq!(matrix.shape(), (1, 1));
        assert_relative_eq!(matrix[(0, 0)], 0.6, epsilon = 1e-12);
    }

    #[test]
    fn hanging_pendulum_feels_no_gravity_torque() {
        let tree = pendulum(0.0);
        let cache = forward_kinematics(&tree, &dvector![0.0], &dvector![0.0]);
        let bias = bias_forces(&tree, &cache, &dvector![0.0]);
        assert_relative_eq!(bias[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn horizontal_pendulum_feels_full_gravity_torque() {
        let tree = pendulum(0.0);
        let q = dvector![std::f64::consts::FRAC_PI_2];
        let cache = forward_kinematics(&tree, &q, &dvector![0.0]);
        let bias = bias_forces(&tree, &cache, &dvector![0.0]);

        // m·g·r = 2 · 9.81 · 0.5, restoring the link toward hanging.
        assert_relative_eq!(bias[0], 2.0 * GRAVITY * 0.5, epsilon = 1e-9);
    }

    #[test]
    fn damping_enters_the_bias_with_the_velocity_sign() {
        let tree = pendulum(0.7);
        let cache = forward_kinematics(&tree, &dvector![0.0], &dvector![3.0]);
        let with_rate = bias_forces(&tree, &cache, &dvector![3.0]);

        let cache_rest = forward_kinematics(&tree, &dvector![0.0], &dvector![0.0]);
        let at_rest = bias_forces(&tree, &cache_rest, &dvector![0.0]);

        // Velocity products vanish for a planar pendulum about its pivot
        // axis, so the difference is the damping term alone.
        assert_relative_eq!(with_rate[0] - at_rest[0], 0.7 * 3.0, epsilon = 1e-9);
    }

    #[test]
    fn double_pendulum_mass_matrix_is_symmetric_positive() {
        let mut tree = RigidBodyTree::new();
        let upper = tree
            .add_body(
                BodyIndex::WORLD,
                RigidBody::new("upper", 1.0, Matrix3::from_diagonal_element(0.05))
                    .with_center_of_mass(Vector3::new(0.0, 0.0, -0.5)),
                Joint::revolute("shoulder", Vector3::y()),
            )
            .unwrap();
        tree.add_body(
            upper,
            RigidBody::new("lower", 1.0, Matrix3::from_diagonal_element(0.05))
                .with_center_of_mass(Vector3::new(0.0, 0.0, -0.5)),
            Joint::revolute("elbow", Vector3::y()).with_origin(nalgebra::Isometry3::translation(
                0.0, 0.0, -1.0,
            )),
        )
        .unwrap();

        let q = dvector![0.4, -0.9];
        let cache = forward_kinematics(&tree, &q, &dvector![0.0, 0.0]);
        let matrix = mass_matrix(&tree, &cache);

        assert_relative_eq!(matrix[(0, 1)], matrix[(1, 0)], epsilon = 1e-12);
        // Leading principal minors of a positive-definite matrix.
        assert!(matrix[(0, 0)] > 0.0);
        assert!(matrix[(0, 0)] * matrix[(1, 1)] - matrix[(0, 1)] * matrix[(1, 0)] > 0.0);
    }
}
