//! Rigid-body trees and the plant system built on them.
//!
//! A [`RigidBodyTree`] is a world-rooted tree of bodies connected by
//! single-degree-of-freedom joints. [`RigidBodyPlant`] wraps a tree into a
//! [`DynamicalSystem`](camber_core::DynamicalSystem) whose state is the
//! generalized position and velocity, whose input is one command per
//! registered actuator, and whose dynamics include gravity, joint damping,
//! and penalty contact against flat terrain.
//!
//! Model description parsing lives outside this crate; the [`ModelLoader`]
//! trait and [`ModelInstanceIdTable`] define the contract an external
//! loader fulfills.

mod body;
mod contact;
mod dynamics;
mod instance;
mod joint;
mod kinematics;
mod loader;
mod plant;
mod spatial;
mod tree;

pub use body::{BoxGeometry, RigidBody};
pub use contact::{ContactParameters, contact_forces};
pub use dynamics::{GRAVITY, bias_forces, mass_matrix};
pub use instance::{ModelInstanceId, ModelInstanceIdTable};
pub use joint::{Joint, JointKind};
pub use kinematics::{KinematicsCache, forward_kinematics};
pub use loader::{LoadedModels, ModelLoader};
pub use plant::{DynamicsError, RigidBodyPlant};
pub use tree::{BodyIndex, RigidBodyTree, TerrainSurface};
